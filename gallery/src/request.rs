use std::fmt;

use crate::{AlbumHandle, SaveError};

/// An image to be saved to the gallery.
///
/// Immutable once built; each request is consumed by exactly one save.
#[derive(Clone, PartialEq, Eq)]
pub struct SaveRequest {
    image_bytes: Vec<u8>,
    display_name: String,
    file_extension: String,
    mime_type: String,
    album_name: Option<String>,
}

impl fmt::Debug for SaveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaveRequest")
            .field("image_bytes", &format_args!("{} bytes", self.image_bytes.len()))
            .field("display_name", &self.display_name)
            .field("file_extension", &self.file_extension)
            .field("mime_type", &self.mime_type)
            .field("album_name", &self.album_name)
            .finish()
    }
}

impl SaveRequest {
    /// Create a request for an image without album placement.
    pub fn new(
        image_bytes: impl Into<Vec<u8>>,
        display_name: impl Into<String>,
        file_extension: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            image_bytes: image_bytes.into(),
            display_name: display_name.into(),
            file_extension: file_extension.into(),
            mime_type: mime_type.into(),
            album_name: None,
        }
    }

    /// Place the image in the album with this exact name.
    #[must_use]
    pub fn with_album(mut self, album_name: impl Into<String>) -> Self {
        self.album_name = Some(album_name.into());
        self
    }

    /// The encoded image.
    #[must_use]
    pub fn image_bytes(&self) -> &[u8] {
        &self.image_bytes
    }

    /// Name shown in the gallery, without extension.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// File extension, without the dot.
    #[must_use]
    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    /// MIME type of the encoded image.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Requested album, if any.
    #[must_use]
    pub fn album(&self) -> Option<&str> {
        self.album_name.as_deref()
    }
}

/// A successfully saved image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    /// Where the image ended up: a file path or a provider URI.
    pub location: Option<String>,
    /// Album the image was added to through an album catalog.
    pub album: Option<AlbumHandle>,
}

/// The single terminal result of a save.
pub type SaveOutcome = Result<SavedImage, SaveError>;
