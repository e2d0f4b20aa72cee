use serde::{Deserialize, Serialize};
use shutterkit_permission::PermissionError;
use thiserror::Error;

/// Machine-readable category of a [`SaveError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// The bytes do not decode as an image.
    InvalidImage,
    /// The host lacks a required manifest entry or usage description.
    MisconfiguredHost,
    /// The user or a policy refused access.
    PermissionDenied,
    /// The target directory could not be created.
    DirectoryCreationFailed,
    /// A file with the generated name already exists.
    FileExists,
    /// The media provider returned no record.
    InsertFailed,
    /// Writing or publishing the image failed.
    WriteFailed,
    /// Gallery saves are not available on this system.
    Unsupported,
}

impl ErrorKind {
    /// Stable code for the kind, e.g. `PERMISSION_DENIED`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidImage => "INVALID_IMAGE",
            Self::MisconfiguredHost => "MISCONFIGURED_HOST",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::DirectoryCreationFailed => "DIRECTORY_CREATION_FAILED",
            Self::FileExists => "FILE_EXISTS",
            Self::InsertFailed => "INSERT_FAILED",
            Self::WriteFailed => "WRITE_FAILED",
            Self::Unsupported => "UNSUPPORTED",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Errors that can occur when saving an image to the gallery.
///
/// None of these are retried internally; a retry is a new request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    /// The bytes do not decode as an image.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The host application is missing a declaration.
    #[error("host not configured: {0}")]
    MisconfiguredHost(String),

    /// Access to storage or the photo library was refused.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The target directory could not be created.
    #[error("directory creation failed: {0}")]
    DirectoryCreationFailed(String),

    /// The generated file name is already taken.
    #[error("file exists: {0}")]
    FileExists(String),

    /// The media provider did not create a record.
    #[error("insert failed: {0}")]
    InsertFailed(String),

    /// Writing or publishing the image failed.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// Gallery saves are not available.
    #[error("not supported: {0}")]
    Unsupported(String),
}

impl SaveError {
    /// The machine-readable kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidImage(_) => ErrorKind::InvalidImage,
            Self::MisconfiguredHost(_) => ErrorKind::MisconfiguredHost,
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::DirectoryCreationFailed(_) => ErrorKind::DirectoryCreationFailed,
            Self::FileExists(_) => ErrorKind::FileExists,
            Self::InsertFailed(_) => ErrorKind::InsertFailed,
            Self::WriteFailed(_) => ErrorKind::WriteFailed,
            Self::Unsupported(_) => ErrorKind::Unsupported,
        }
    }

    /// The human-readable detail.
    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::InvalidImage(detail)
            | Self::MisconfiguredHost(detail)
            | Self::PermissionDenied(detail)
            | Self::DirectoryCreationFailed(detail)
            | Self::FileExists(detail)
            | Self::InsertFailed(detail)
            | Self::WriteFailed(detail)
            | Self::Unsupported(detail) => detail,
        }
    }
}

impl From<PermissionError> for SaveError {
    fn from(err: PermissionError) -> Self {
        match err {
            PermissionError::NotDeclared(declaration) => Self::MisconfiguredHost(format!(
                "`{declaration}` is not declared by the host application"
            )),
            PermissionError::Denied(grant) => Self::PermissionDenied(format!(
                "the app doesn't have permission to save photos to the gallery ({grant:?})"
            )),
            PermissionError::NotSupported => {
                Self::Unsupported("permission not supported on this platform".into())
            }
            PermissionError::Unknown(msg) => Self::PermissionDenied(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shutterkit_permission::CapabilityGrant;

    #[test]
    fn kind_serializes_as_its_code() {
        let json = serde_json::to_string(&ErrorKind::DirectoryCreationFailed).unwrap();
        assert_eq!(json, "\"DIRECTORY_CREATION_FAILED\"");
        assert_eq!(
            serde_json::from_str::<ErrorKind>("\"FILE_EXISTS\"").unwrap(),
            ErrorKind::FileExists
        );
    }

    #[test]
    fn permission_errors_map_to_save_kinds() {
        let missing = SaveError::from(PermissionError::NotDeclared("WRITE".into()));
        assert_eq!(missing.kind(), ErrorKind::MisconfiguredHost);
        assert!(missing.detail().contains("WRITE"));

        let denied = SaveError::from(PermissionError::Denied(CapabilityGrant::PermanentlyDenied));
        assert_eq!(denied.kind(), ErrorKind::PermissionDenied);
    }
}
