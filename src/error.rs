use thiserror::Error;

pub type DeckResult<T> = Result<T, DeckError>;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Load error: {0}")]
    Load(String),

    #[error("Aggregation error: {0}")]
    Aggregation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Copy error: {0}")]
    Copy(String),

    #[error("Table create error: {0}")]
    TableCreate(String),

    #[error("Table write error: {0}")]
    TableWrite(String),

    #[error("Service init error: {0}")]
    ServiceInit(String),

    #[error("Layout mismatch: {0}")]
    LayoutMismatch(String),

    #[error("Remote service error: {0}")]
    Remote(String),

    #[error("Export error: {0}")]
    Export(String),
}
