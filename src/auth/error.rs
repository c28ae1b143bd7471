use std::fmt;

/// Failure talking to the external auth service.
#[derive(Debug)]
pub enum AuthError {
    /// The service answered with a non-success status.
    Rejected { status: u16, message: String },
    Transport(String),
    Decode(String),
    InvalidUrl(String),
}

impl AuthError {
    /// Text shown to the user. Service rejections are passed through
    /// verbatim; local failures get a generic message.
    pub fn message(&self) -> String {
        match self {
            AuthError::Rejected { message, .. } => message.clone(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Rejected { status, message } => {
                write!(f, "Auth service rejected request ({status}): {message}")
            }
            AuthError::Transport(msg) => write!(f, "Auth service unreachable: {msg}"),
            AuthError::Decode(msg) => write!(f, "Unexpected auth service response: {msg}"),
            AuthError::InvalidUrl(msg) => write!(f, "Invalid auth service URL: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}
