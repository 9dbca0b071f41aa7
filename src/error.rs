use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response body (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("server rejected the request: {}", .message.as_deref().unwrap_or("unknown error"))]
    Application { message: Option<String> },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("action cancelled")]
    Declined,

    #[error("invalid base URL: {url}")]
    InvalidUrl { url: String },

    #[error("invalid cookie header value")]
    InvalidCookie,

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },
}

impl BoardError {
    /// Message shown to the user for a failed action.
    ///
    /// Server messages are surfaced verbatim; everything else collapses to
    /// `generic` so transport details stay in the logs.
    pub fn user_message(&self, generic: &str) -> String {
        match self {
            BoardError::Application { message } => format!(
                "Error: {}",
                message.as_deref().unwrap_or("Unknown error")
            ),
            BoardError::Validation(e) => e.to_string(),
            _ => generic.to_string(),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must be at most {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("unsupported file type '{mime}', expected PNG, JPG, JPEG or GIF")]
    UnsupportedFileType { mime: String },

    #[error("file is too large ({size} bytes), maximum is {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    #[error("invalid file name '{name}'")]
    InvalidFileName { name: String },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Missing { field } | ValidationError::TooLong { field, .. } => field,
            ValidationError::UnsupportedFileType { .. } | ValidationError::FileTooLarge { .. } => {
                "file"
            }
            ValidationError::InvalidFileName { .. } => "filename",
        }
    }
}
