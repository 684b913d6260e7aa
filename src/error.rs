use std::fmt;

/// Failure reported by a key-value storage backend.
///
/// These never reach the simulation: `GameStorage` logs them and falls back
/// to in-memory defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// No backend (storage disabled, private mode, no window)
    Unavailable,
    Read { key: String, reason: String },
    Write { key: String, reason: String },
    Remove { key: String, reason: String },
    /// A record could not be serialized
    Encode { key: String, reason: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::Read { key, reason } => write!(f, "could not read {key}: {reason}"),
            Self::Write { key, reason } => write!(f, "could not write {key}: {reason}"),
            Self::Remove { key, reason } => write!(f, "could not remove {key}: {reason}"),
            Self::Encode { key, reason } => write!(f, "could not encode {key}: {reason}"),
        }
    }
}

impl std::error::Error for StorageError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_key() {
        let err = StorageError::Write {
            key: "spaceDevGameSave".into(),
            reason: "QuotaExceededError".into(),
        };
        assert_eq!(
            err.to_string(),
            "could not write spaceDevGameSave: QuotaExceededError"
        );
        assert_eq!(StorageError::Unavailable.to_string(), "storage unavailable");
    }
}
