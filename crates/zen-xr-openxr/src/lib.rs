//! OpenXR runtime, EGL and OpenGL ES backends for the Zen client.
//!
//! [`client::run`] is the entry point: it performs the runtime bring-up in
//! [`context`] and drives the core processors from `zen-xr` on the calling
//! thread.

pub mod actions;
pub mod client;
pub mod context;
pub mod convert;
pub mod egl;
pub mod frame;
pub mod gl;
pub mod session;

#[cfg(target_os = "android")]
pub mod android;

pub use client::run;
pub use context::OpenXrRuntime;
