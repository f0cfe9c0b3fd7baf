//! Error classifications for version-roller.
//!
//! Everything is propagated as a `color_eyre::Report`; these variants are
//! wrapped inside it so callers can tell failures apart with
//! `report.downcast_ref::<RollerError>()`.

use thiserror::Error;

/// Error code used when an unknown release client type is requested.
pub const ERELEASE: &str = "ERELEASE";

#[derive(Error, Debug)]
pub enum RollerError {
    // Process errors
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command `{command}` exited with code {code:?}: {stderr}")]
    ProcessFailure {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    // Remote errors
    #[error("Unable to resolve git remote `{remote}`: {reason}")]
    UnresolvableRemote { remote: String, reason: String },

    // Configuration errors
    #[error("{code}: {message}")]
    Validation { code: String, message: String },

    // Forge errors
    #[error("Release creation failed for tag {tag}: {reason}")]
    ReleaseCreation { tag: String, reason: String },
}

impl RollerError {
    /// Create a validation error with a short machine readable code
    pub fn validation(code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation {
            code: code.into(),
            message: msg.into(),
        }
    }

    /// Create an unresolvable remote error
    pub fn unresolvable_remote(
        remote: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnresolvableRemote {
            remote: remote.into(),
            reason: reason.into(),
        }
    }

    pub fn release_creation(
        tag: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ReleaseCreation {
            tag: tag.into(),
            reason: reason.into(),
        }
    }

    /// Short code identifying a configuration error, if this is one
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Validation { code, .. } => Some(code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_formats() {
        let err = RollerError::validation(ERELEASE, "Invalid release client type");
        assert_eq!(err.to_string(), "ERELEASE: Invalid release client type");

        let err = RollerError::unresolvable_remote("origin", "no url");
        assert_eq!(
            err.to_string(),
            "Unable to resolve git remote `origin`: no url"
        );

        let err = RollerError::ProcessFailure {
            command: "git describe".into(),
            code: Some(128),
            stderr: "fatal: not a git repository".into(),
        };
        assert_eq!(
            err.to_string(),
            "Command `git describe` exited with code Some(128): fatal: not a git repository"
        );
    }

    #[test]
    fn test_error_helpers() {
        let err = RollerError::validation(ERELEASE, "bad");
        assert!(matches!(err, RollerError::Validation { .. }));
        assert_eq!(err.code(), Some(ERELEASE));

        let err = RollerError::release_creation("v1.0.0", "boom");
        assert!(matches!(err, RollerError::ReleaseCreation { .. }));
        assert!(err.code().is_none());
    }

    #[test]
    fn test_downcast_from_report() {
        let report: color_eyre::Report =
            RollerError::validation(ERELEASE, "bad").into();
        let err = report.downcast_ref::<RollerError>().unwrap();
        assert_eq!(err.code(), Some(ERELEASE));
    }
}
