//! Platform-specific storage primitives.

cfg_if::cfg_if! {
    if #[cfg(any(target_os = "android", target_os = "ios"))] {
        mod mobile;
        pub(crate) use mobile::default_gallery;
    } else {
        mod desktop;
        pub use desktop::SystemFileStore;
        pub(crate) use desktop::default_gallery;
    }
}
