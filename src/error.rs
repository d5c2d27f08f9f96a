//! Error types for spark-otp.
//!
//! Input rejection is not an error: invalid keystrokes are dropped and
//! reported as [`EditOutcome::Rejected`](crate::primitives::EditOutcome).
//! These variants cover misconfiguration and terminal plumbing only.

use thiserror::Error;

/// Result type alias for spark-otp operations.
pub type Result<T> = std::result::Result<T, OtpError>;

/// Main error type for spark-otp.
#[derive(Error, Debug)]
pub enum OtpError {
    /// The field was configured with a length it cannot render.
    #[error("invalid OTP length {0}: must be between 1 and {max}", max = crate::primitives::MAX_OTP_LENGTH)]
    InvalidLength(usize),

    /// Taffy could not build or compute the slot layout.
    #[error("layout error: {0}")]
    Layout(String),

    /// Terminal I/O failure.
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<taffy::TaffyError> for OtpError {
    fn from(err: taffy::TaffyError) -> Self {
        Self::Layout(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_length_message() {
        let err = OtpError::InvalidLength(0);
        assert!(err.to_string().starts_with("invalid OTP length 0"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: OtpError = io.into();
        assert!(matches!(err, OtpError::Io(_)));
        assert_eq!(err.to_string(), "terminal I/O error: boom");
    }
}
