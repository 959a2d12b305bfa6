pub type CardResult<T> = Result<T, CardError>;

#[derive(thiserror::Error, Debug)]
pub enum CardError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("font load error: {0}")]
    FontLoad(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn font_load(msg: impl Into<String>) -> Self {
        Self::FontLoad(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }
}
