use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("GitHub URL is required.")]
    MissingUrl,

    #[error("Invalid GitHub URL format. Please use \"https://github.com/owner/repo\".")]
    InvalidUrl(String),

    #[error("Failed to fetch repository details from GitHub: {0}")]
    GitHubApi(String),

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("AI did not return a valid structured response.")]
    InvalidAiResponse,

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Thumbnail generation error: {0}")]
    Thumbnail(String),

    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Proxy { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::MissingUrl | Error::InvalidUrl(_) | Error::Validation(_) => true,
            Error::Proxy { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_client_errors() {
        assert!(Error::MissingUrl.is_client_error());
        assert!(Error::InvalidUrl("nope".into()).is_client_error());
        assert!(!Error::InvalidAiResponse.is_client_error());
        assert!(!Error::GitHubApi("404 Not Found".into()).is_client_error());
    }

    #[test]
    fn test_proxy_error_displays_server_message() {
        let err = Error::Proxy {
            status: 500,
            message: "Analysis failed: boom".into(),
        };
        assert_eq!(err.to_string(), "Analysis failed: boom");
        assert!(!err.is_client_error());
    }
}
