//! # Session Error Types
//!
//! Errors for session startup and control.
//!
//! ## What Is and Is Not an Error Here
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Camera permission denied  → SessionError::CameraDenied (BLOCKING:     │
//! │                              the sampling loop never starts; the       │
//! │                              caller owns the retry affordance)         │
//! │  Camera died mid-session   → logged, session closes cleanly            │
//! │  Frame with no barcode     → steady state, not even logged             │
//! │  Provider failures         → contained inside veriscan-resolve         │
//! │  Inactivity timeout        → a designed transition, not an error       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Session-level failures.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The user (or platform) refused camera access. Not recoverable here;
    /// must be surfaced with a retry affordance and prevents the sampling
    /// loop from starting.
    #[error("Camera access denied: {0}")]
    CameraDenied(String),

    /// The camera device failed for a reason other than permissions.
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    /// The session task has already terminated.
    #[error("Session channel closed")]
    ChannelClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SessionError::CameraDenied("user dismissed the prompt".into());
        assert_eq!(
            err.to_string(),
            "Camera access denied: user dismissed the prompt"
        );
        assert_eq!(
            SessionError::ChannelClosed.to_string(),
            "Session channel closed"
        );
    }
}
