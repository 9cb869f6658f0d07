/// Result alias that carries the custom [`BoothError`] type.
pub type Result<T> = std::result::Result<T, BoothError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum BoothError {
    /// The source bytes could not be decoded into pixel data.
    #[error("decode error: {0}")]
    Decode(String),
    /// A drawing surface of the requested size could not be allocated or
    /// encoded.
    #[error("surface error: {0}")]
    Surface(String),
    /// The external capture collaborator failed to hand over an image.
    #[error("capture error: {0}")]
    Capture(String),
    /// A develop run is already in flight; the new request was rejected.
    #[error("develop is already in progress")]
    DevelopInProgress,
    /// Invalid or unreadable configuration.
    #[error("config error: {0}")]
    Config(String),
    /// Free-form message for conditions without a dedicated variant.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl BoothError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }

    pub fn surface<T: Into<String>>(msg: T) -> Self {
        Self::Surface(msg.into())
    }

    pub fn capture<T: Into<String>>(msg: T) -> Self {
        Self::Capture(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }
}

impl From<&str> for BoothError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for BoothError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
