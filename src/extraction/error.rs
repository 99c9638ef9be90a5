// src/extraction/error.rs
use thiserror::Error;

/// Categorized extraction failures. Each variant carries the message shown to
/// the recruiter so the UI can redisplay the selection screen with context.
#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type. Please upload PDF, DOCX, PNG, or JPG files.")]
    UnsupportedFileType,

    #[error("File size too large. Please upload files smaller than 10MB.")]
    FileTooLarge,

    #[error("Unable to extract meaningful content from the file. The file may be corrupted, password-protected, or contain insufficient text. Please try a different file or enter details manually.")]
    UnreadableContent,

    #[error("Please enter a valid LinkedIn profile URL. Format: https://www.linkedin.com/in/username or https://linkedin.com/in/username")]
    InvalidSourceUrl,

    #[error("Unable to access sufficient content from this LinkedIn profile. The profile may be private, have limited public information, or be temporarily unavailable. Please check the URL and ensure the profile is public.")]
    InaccessibleSourceContent,

    #[error("Failed to process the source. This could be due to network issues or a temporary service outage. Please try again or enter details manually.")]
    UpstreamServiceFailure,
}

impl ExtractionError {
    /// Stable machine-readable code for API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            ExtractionError::UnsupportedFileType => "UNSUPPORTED_FILE_TYPE",
            ExtractionError::FileTooLarge => "FILE_TOO_LARGE",
            ExtractionError::UnreadableContent => "UNREADABLE_CONTENT",
            ExtractionError::InvalidSourceUrl => "INVALID_SOURCE_URL",
            ExtractionError::InaccessibleSourceContent => "INACCESSIBLE_SOURCE_CONTENT",
            ExtractionError::UpstreamServiceFailure => "UPSTREAM_SERVICE_FAILURE",
        }
    }

    /// Recovery hints surfaced next to the error message.
    pub fn suggestions(&self) -> Vec<String> {
        let hints: &[&str] = match self {
            ExtractionError::UnsupportedFileType => &[
                "Upload a PDF, DOCX, PNG, or JPG file",
                "Export the resume to PDF and try again",
            ],
            ExtractionError::FileTooLarge => &[
                "Compress the file or remove embedded images",
                "Files must be smaller than 10MB",
            ],
            ExtractionError::UnreadableContent => &[
                "Try a different file",
                "Enter the candidate details manually",
            ],
            ExtractionError::InvalidSourceUrl => &[
                "Use the format https://www.linkedin.com/in/username",
                "Copy the URL from the candidate's profile page",
            ],
            ExtractionError::InaccessibleSourceContent => &[
                "Check that the profile is public",
                "Try again later or enter details manually",
            ],
            ExtractionError::UpstreamServiceFailure => &[
                "Try again in a few moments",
                "Enter the candidate details manually",
            ],
        };
        hints.iter().map(|s| s.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let all = [
            ExtractionError::UnsupportedFileType,
            ExtractionError::FileTooLarge,
            ExtractionError::UnreadableContent,
            ExtractionError::InvalidSourceUrl,
            ExtractionError::InaccessibleSourceContent,
            ExtractionError::UpstreamServiceFailure,
        ];
        let mut codes: Vec<&str> = all.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn test_messages_are_distinct() {
        assert_ne!(
            ExtractionError::UnsupportedFileType.to_string(),
            ExtractionError::FileTooLarge.to_string()
        );
        assert_ne!(
            ExtractionError::InvalidSourceUrl.to_string(),
            ExtractionError::InaccessibleSourceContent.to_string()
        );
    }
}
