pub type ImfxResult<T> = Result<T, ImfxError>;

#[derive(thiserror::Error, Debug)]
pub enum ImfxError {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("illegal expression: {0}")]
    IllegalExpression(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("evaluation error: {0}")]
    Evaluation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImfxError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    pub fn illegal_expression(msg: impl Into<String>) -> Self {
        Self::IllegalExpression(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }
}
