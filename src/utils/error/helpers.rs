//! Helper functions for creating specific error types

use super::types::RouterError;

impl RouterError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn persistence<S: Into<String>>(message: S) -> Self {
        Self::Persistence(message.into())
    }

    pub fn feature_extraction<S: Into<String>>(message: S) -> Self {
        Self::FeatureExtraction(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the error came from the filesystem or the on-disk format
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::Serialization(_)
                | Self::Persistence(_)
                | Self::UnsupportedSchemaVersion { .. }
        )
    }
}
