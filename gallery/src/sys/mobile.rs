//! Mobile fallback.
//!
//! `MediaStore` and `PhotoKit` are only reachable through the host
//! application, so there is no process-default gallery here: hosts build a
//! [`Gallery`] with their own primitives.

use crate::{Gallery, GalleryConfig};

pub(crate) fn default_gallery() -> Gallery {
    Gallery::builder(GalleryConfig::detect()).build()
}
