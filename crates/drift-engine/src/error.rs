use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("scan failed: {0}")]
    Scan(#[from] drift_scan::ScanError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("comparison task failed: {0}")]
    Task(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
