use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing step-length coefficient k")]
    MissingK,
    #[error("missing heading-correction coefficient m")]
    MissingM,
    #[error("ground-truth path must contain at least one waypoint")]
    EmptyGroundTruth,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
