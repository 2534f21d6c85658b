//! Selection rules applied while bringing up the runtime.
//!
//! Selection is exact: a desired value is accepted only if the runtime lists
//! it, and anything else fails initialisation.

use std::fmt::Display;

use tracing::info;

use crate::{
    types::{Extent2D, GraphicsRequirements, Version, ViewConfigView},
    XrError, XrResult,
};

/// Pick `accepted` from the runtime's `candidates`, logging every candidate.
pub fn select_accepted<T>(kind: &str, candidates: &[T], accepted: T) -> XrResult<T>
where
    T: Copy + PartialEq + Display,
{
    info!("available {kind}s: {}", candidates.len());
    for candidate in candidates {
        let marker = if *candidate == accepted { " (selected)" } else { "" };
        info!("  {kind} {candidate}{marker}");
    }

    if candidates.contains(&accepted) {
        Ok(accepted)
    } else {
        Err(XrError::Negotiation(format!(
            "no acceptable {kind}: wanted {accepted}, runtime offers [{}]",
            join(candidates)
        )))
    }
}

/// Check the graphics API version against the runtime's supported range.
pub fn check_graphics_version(
    requirements: &GraphicsRequirements,
    actual: Version,
) -> XrResult<()> {
    if actual < requirements.min_version || actual > requirements.max_version {
        return Err(XrError::Negotiation(format!(
            "OpenGL ES {actual} is outside the runtime range [{}, {}]",
            requirements.min_version, requirements.max_version
        )));
    }
    info!("using OpenGL ES {actual}");
    Ok(())
}

/// First runtime format (in runtime preference order) the device supports.
pub fn select_swapchain_format(runtime: &[i64], supported: &[i64]) -> Option<i64> {
    runtime.iter().copied().find(|format| supported.contains(format))
}

/// Format list with the selected entry bracketed, for logging.
pub fn describe_formats(runtime: &[i64], selected: Option<i64>) -> String {
    runtime
        .iter()
        .map(|format| {
            if Some(*format) == selected {
                format!("[{format:#x}]")
            } else {
                format!("{format:#x}")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render size for one view: the recommended size scaled by `scale`, or the
/// recommended size unchanged when either scaled dimension would exceed the
/// runtime maximum or truncate to zero.
pub fn swapchain_extent(view: &ViewConfigView, scale: f32) -> Extent2D {
    let width = (view.recommended_width as f32 * scale) as u32;
    let height = (view.recommended_height as f32 * scale) as u32;

    if width == 0 || height == 0 || width > view.max_width || height > view.max_height {
        Extent2D {
            width: view.recommended_width,
            height: view.recommended_height,
        }
    } else {
        Extent2D { width, height }
    }
}

fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
