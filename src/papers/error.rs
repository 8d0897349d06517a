use reqwest::StatusCode;
use thiserror::Error;

/// Shown whenever the repository refuses an upload, whatever it says back.
pub const REJECTION_MESSAGE: &str = "Upload failed : Hey buddy Please upload a UIET exam paper, no random stuff allowed, Limited storage :(";

/// A search that did not produce a result list.
///
/// These never reach the user; the session logs them and keeps the list it had.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search returned HTTP {0}")]
    Status(StatusCode),

    #[error("search response was not a paper list: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Why an upload attempt ended without success. `Display` is the status message.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Choose a PDF")]
    NoFile,

    #[error("File exceeds 5 MB limit")]
    TooLarge { size: u64 },

    #[error("Please fill in the {field}")]
    MissingField { field: &'static str },

    #[error("The {field} must be a whole number, got \"{value}\"")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Unknown branch \"{0}\"")]
    UnknownBranch(String),

    #[error("Unknown exam type \"{0}\"")]
    UnknownExamType(String),

    #[error("{}", REJECTION_MESSAGE)]
    Rejected { status: StatusCode },

    #[error("Upload failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upload failed: could not encode metadata: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_message_ignores_status() {
        let err = UploadError::Rejected {
            status: StatusCode::PAYLOAD_TOO_LARGE,
        };
        assert_eq!(err.to_string(), REJECTION_MESSAGE);
    }

    #[test]
    fn precondition_messages() {
        assert_eq!(UploadError::NoFile.to_string(), "Choose a PDF");
        assert_eq!(
            UploadError::TooLarge { size: 6 * 1024 * 1024 }.to_string(),
            "File exceeds 5 MB limit"
        );
    }
}
