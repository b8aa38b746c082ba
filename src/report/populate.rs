//! Two-phase table population: create the table, then fill its cells

use crate::error::{DeckError, DeckResult};
use crate::google::{
    CreateTableRequest, InsertTextRequest, PageElementProperties, SlideRequest, SlidesApi,
    TableCellLocation,
};
use crate::types::SummaryTable;
use tracing::{error, info};
use uuid::Uuid;

/// Fresh object id for a table element
pub fn table_object_id() -> String {
    format!("table_{}", Uuid::new_v4().simple())
}

/// Create-table request sized `(rows + 1) x columns`; row 0 is the header
pub fn create_table_request(table_id: &str, slide_id: &str, summary: &SummaryTable) -> SlideRequest {
    SlideRequest::CreateTable(CreateTableRequest {
        object_id: table_id.to_string(),
        element_properties: PageElementProperties {
            page_object_id: slide_id.to_string(),
        },
        rows: summary.num_rows() + 1,
        columns: summary.num_columns(),
    })
}

/// One insert-text request per header cell and per data cell
pub fn cell_requests(table_id: &str, summary: &SummaryTable) -> Vec<SlideRequest> {
    let columns = summary.num_columns();
    let mut requests = Vec::with_capacity(columns * (summary.num_rows() + 1));

    let insert = |row_index: usize, column_index: usize, text: String| {
        SlideRequest::InsertText(InsertTextRequest {
            object_id: table_id.to_string(),
            cell_location: TableCellLocation {
                row_index,
                column_index,
            },
            text,
        })
    };

    for (c, label) in summary.header().iter().enumerate() {
        requests.push(insert(0, c, label.to_string()));
    }

    for r in 0..summary.num_rows() {
        for c in 0..columns {
            let text = summary.cell_text(r, c).unwrap_or_default();
            requests.push(insert(r + 1, c, text));
        }
    }

    requests
}

/// Insert `summary` as a table on `slide_id`.
///
/// A failed text write leaves the empty table on the slide.
pub fn insert_table(
    slides: &dyn SlidesApi,
    presentation_id: &str,
    slide_id: &str,
    summary: &SummaryTable,
) -> DeckResult<String> {
    let table_id = table_object_id();

    slides
        .batch_update(
            presentation_id,
            &[create_table_request(&table_id, slide_id, summary)],
        )
        .map_err(|e| {
            error!("Error creating table on slide {}: {}", slide_id, e);
            DeckError::TableCreate(format!("Slide {}: {}", slide_id, e))
        })?;

    slides
        .batch_update(presentation_id, &cell_requests(&table_id, summary))
        .map_err(|e| {
            error!("Error inserting text into table {}: {}", table_id, e);
            DeckError::TableWrite(format!("Table {} on slide {}: {}", table_id, slide_id, e))
        })?;

    info!("Table inserted into slide with ID: {}", slide_id);
    Ok(table_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SummaryRow;
    use std::sync::Mutex;

    fn summary(rows: &[(&str, f64)]) -> SummaryTable {
        SummaryTable {
            group_column: "FY FQ".to_string(),
            value_column: "Opp #".to_string(),
            rows: rows
                .iter()
                .map(|(k, v)| SummaryRow {
                    key: k.to_string(),
                    value: *v,
                })
                .collect(),
        }
    }

    #[derive(Default)]
    struct RecordingSlides {
        batches: Mutex<Vec<Vec<SlideRequest>>>,
        fail_on_batch: Option<usize>,
    }

    impl SlidesApi for RecordingSlides {
        fn slide_ids(&self, _presentation_id: &str) -> DeckResult<Vec<String>> {
            Ok(Vec::new())
        }

        fn batch_update(&self, _presentation_id: &str, requests: &[SlideRequest]) -> DeckResult<()> {
            let mut batches = self.batches.lock().unwrap();
            if self.fail_on_batch == Some(batches.len()) {
                return Err(DeckError::Remote("HTTP 500".to_string()));
            }
            batches.push(requests.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_table_object_id_is_unique() {
        let a = table_object_id();
        let b = table_object_id();
        assert!(a.starts_with("table_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_create_table_dimensions() {
        let s = summary(&[("FY24 Q1", 3.0), ("FY24 Q2", 2.0), ("FY24 Q3", 1.0)]);
        match create_table_request("t", "slide", &s) {
            SlideRequest::CreateTable(req) => {
                assert_eq!(req.rows, 4);
                assert_eq!(req.columns, 2);
                assert_eq!(req.element_properties.page_object_id, "slide");
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_cell_requests_cover_header_and_data() {
        let s = summary(&[("FY24 Q1", 3.0), ("FY24 Q2", 2.0)]);
        let requests = cell_requests("t", &s);
        assert_eq!(requests.len(), s.num_columns() * (s.num_rows() + 1));

        let cells: Vec<(usize, usize, String)> = requests
            .iter()
            .map(|r| match r {
                SlideRequest::InsertText(req) => (
                    req.cell_location.row_index,
                    req.cell_location.column_index,
                    req.text.clone(),
                ),
                other => panic!("unexpected request {:?}", other),
            })
            .collect();

        assert_eq!(cells[0], (0, 0, "FY FQ".to_string()));
        assert_eq!(cells[1], (0, 1, "Opp #".to_string()));
        assert_eq!(cells[2], (1, 0, "FY24 Q1".to_string()));
        assert_eq!(cells[3], (1, 1, "3".to_string()));
        assert_eq!(cells[5], (2, 1, "2".to_string()));
    }

    #[test]
    fn test_cell_requests_empty_summary_is_header_only() {
        let s = summary(&[]);
        assert_eq!(cell_requests("t", &s).len(), 2);
    }

    #[test]
    fn test_insert_table_two_batches() {
        let slides = RecordingSlides::default();
        let s = summary(&[("A", 1.0)]);
        let table_id = insert_table(&slides, "pres", "slide", &s).unwrap();

        let batches = slides.batches.lock().unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 1);
        assert_eq!(batches[1].len(), 4);
        match &batches[0][0] {
            SlideRequest::CreateTable(req) => assert_eq!(req.object_id, table_id),
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_insert_table_create_failure() {
        let slides = RecordingSlides {
            fail_on_batch: Some(0),
            ..Default::default()
        };
        let result = insert_table(&slides, "pres", "slide", &summary(&[("A", 1.0)]));
        assert!(matches!(result, Err(DeckError::TableCreate(_))));
    }

    #[test]
    fn test_insert_table_write_failure_keeps_table() {
        let slides = RecordingSlides {
            fail_on_batch: Some(1),
            ..Default::default()
        };
        let result = insert_table(&slides, "pres", "slide", &summary(&[("A", 1.0)]));
        assert!(matches!(result, Err(DeckError::TableWrite(_))));
        // create-table went through and is not rolled back
        assert_eq!(slides.batches.lock().unwrap().len(), 1);
    }
}
