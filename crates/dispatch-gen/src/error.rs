use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("zone profile parse error: {0}")]
    Parse(String),

    #[error("generator configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GenResult<T> = Result<T, GenError>;
