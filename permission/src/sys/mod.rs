//! Platform-specific permission implementations.

cfg_if::cfg_if! {
    if #[cfg(any(target_os = "android", target_os = "ios"))] {
        mod mobile;
        pub use mobile::SystemPermissions;
    } else {
        mod desktop;
        pub use desktop::SystemPermissions;
    }
}
