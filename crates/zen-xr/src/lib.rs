//! Session and frame orchestration for the Zen HMD client.
//!
//! Everything here is independent of a concrete XR runtime: the runtime,
//! the graphics device and the platform are reached through the traits in
//! [`adapter`] and [`event_loop`], and the adapter crate supplies the real
//! implementations.

#![forbid(unsafe_code)]

pub mod action_source;
pub mod adapter;
pub mod config;
pub mod event_loop;
pub mod event_source;
pub mod frame_source;
pub mod graphics;
pub mod math;
pub mod negotiate;
pub mod renderer;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use action_source::ActionSource;
pub use adapter::{ActionBackend, FrameBackend, GraphicsDevice, SessionBackend, SwapchainImages};
pub use config::{ClientConfig, SpaceCreation};
pub use event_loop::{BusyProcessor, EventLoop, HeadlessPlatform, LoopHandle, Platform, PlatformPoll};
pub use event_source::EventSource;
pub use frame_source::{FrameOptions, FrameSource};
pub use renderer::{Camera, NullRenderer, SceneRenderer, SharedRenderer};
pub use session::{SessionContext, SessionSelection};
pub use types::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum XrError {
    #[error("runtime unavailable: {0}")]
    Unavailable(String),
    #[error("XrResult failure [{result}]\n    Origin: {origin}\n    Source: {location}")]
    Runtime {
        origin: &'static str,
        result: String,
        location: &'static str,
    },
    #[error("graphics error: {0}")]
    Graphics(String),
    #[error("negotiation failed: {0}")]
    Negotiation(String),
    #[error("invariant violated: {0}")]
    Invariant(String),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type XrResult<T> = Result<T, XrError>;

impl From<zen_common::Error> for XrError {
    fn from(err: zen_common::Error) -> Self {
        XrError::Config(err.to_string())
    }
}

/// Evaluate a runtime call, turning its error into [`XrError::Runtime`]
/// carrying the call text, the result name and the call site.
#[macro_export]
macro_rules! xr_check {
    ($call:expr) => {
        ($call).map_err(|result| $crate::XrError::Runtime {
            origin: stringify!($call),
            result: format!("{result:?}"),
            location: concat!(file!(), ":", line!()),
        })
    };
}
