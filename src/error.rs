use thiserror::Error;

pub type TendencyResult<T> = Result<T, TendencyError>;

#[derive(Debug, Error)]
pub enum TendencyError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("handler `{subscriber}` failed on `{event}`: {message}")]
    HandlerFault {
        event: &'static str,
        subscriber: String,
        message: String,
    },
}
