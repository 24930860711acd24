use thiserror::Error;

pub type WaterfallResult<T> = Result<T, WaterfallError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WaterfallError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error(
        "series `{series}` shape mismatch: {values} values vs {timestamps} timestamps"
    )]
    ShapeMismatch {
        series: String,
        values: usize,
        timestamps: usize,
    },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid config: {0}")]
    Config(String),
}
