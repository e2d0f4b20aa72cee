//! # Shutterkit
//!
//! Save in-memory images to the operating system's photo gallery with one
//! asynchronous call, on Android, iOS, macOS and desktop.
//!
//! Shutterkit takes care of the parts every platform does differently: the
//! storage model (direct files under a public pictures folder, or a managed
//! media provider with a pending/finalize protocol), runtime permission prompts
//! that may resolve much later, and cleanup when a write fails halfway.
//!
//! ## Features
//!
//! - `gallery`: the gallery save pipeline (enabled by default).
//! - `permission`: capability grants and prompt correlation.
//! - `fs`: locating the public pictures directory.
//!
//! Use the `full` feature to enable everything.
//!
//! ## Example
//!
//! ```toml
//! [dependencies]
//! shutterkit = { version = "0.1", features = ["gallery"] }
//! ```
//!
//! ```rust,no_run
//! use shutterkit::gallery::{self, SaveRequest};
//!
//! async fn keep(bytes: Vec<u8>) {
//!     let request = SaveRequest::new(bytes, "sunset", "png", "image/png").with_album("Trips");
//!     match gallery::save_image_to_gallery(request).await {
//!         Ok(saved) => println!("saved to {:?}", saved.location),
//!         Err(err) => eprintln!("{}: {err}", err.kind().code()),
//!     }
//! }
//! ```

#[cfg(feature = "fs")]
pub use shutterkit_fs as fs;

#[cfg(feature = "gallery")]
pub use shutterkit_gallery as gallery;

#[cfg(feature = "permission")]
pub use shutterkit_permission as permission;
