//! Public pictures directory lookup.
//!
//! Legacy gallery saves write plain files under the user's public pictures
//! folder, one subdirectory per album. This crate finds that folder and
//! maps album names onto it.

use std::path::{Component, Path, PathBuf};

/// Cross-platform pictures folder utilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShutterFs;

impl ShutterFs {
    /// Gets the user's public pictures directory.
    ///
    /// Mobile platforms keep their pictures behind a media provider, so
    /// there is no directory to return there.
    #[must_use]
    pub fn pictures_dir() -> Option<PathBuf> {
        #[cfg(any(target_os = "macos", target_os = "windows", target_os = "linux"))]
        {
            dirs::picture_dir()
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        {
            None
        }
    }

    /// Directory holding the pictures of `album` below `root`.
    ///
    /// Returns `None` unless `album` is a single, plain path component, so an
    /// album name can never point outside `root`.
    #[must_use]
    pub fn album_dir(root: &Path, album: &str) -> Option<PathBuf> {
        Self::child(root, album)
    }

    /// `root` joined with `name`, if `name` is a single plain path component.
    ///
    /// Separators, `..`, `.`, absolute paths and empty names are rejected.
    #[must_use]
    pub fn child(root: &Path, name: &str) -> Option<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Some(root.join(name)),
            _ => None,
        }
    }

    /// Relative location of `album` inside the shared pictures collection,
    /// as used by media providers (`Pictures/<album>`).
    #[must_use]
    pub fn album_relative_path(album: &str) -> String {
        format!("Pictures/{album}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn album_is_a_direct_child_of_root() {
        let root = Path::new("/home/ada/Pictures");
        assert_eq!(
            ShutterFs::album_dir(root, "Trips"),
            Some(root.join("Trips"))
        );
    }

    #[test]
    fn album_cannot_escape_root() {
        let root = Path::new("/home/ada/Pictures");
        assert_eq!(ShutterFs::album_dir(root, "../Documents"), None);
        assert_eq!(ShutterFs::album_dir(root, "a/b"), None);
        assert_eq!(ShutterFs::album_dir(root, ""), None);
        assert_eq!(ShutterFs::album_dir(root, "/etc"), None);
    }

    #[test]
    fn child_accepts_dotted_file_names_only_as_one_component() {
        let root = Path::new("/home/ada/Pictures/Trips");
        assert_eq!(
            ShutterFs::child(root, "..sunset-1-a.png"),
            Some(root.join("..sunset-1-a.png"))
        );
        assert_eq!(ShutterFs::child(root, "../sunset-1-a.png"), None);
        assert_eq!(ShutterFs::child(root, "sunset-1-a.png/../../x"), None);
    }

    #[test]
    fn relative_path_is_under_pictures() {
        assert_eq!(ShutterFs::album_relative_path("Trips"), "Pictures/Trips");
    }
}
