//! Seams between the orchestration core and a concrete XR runtime / GPU.
//!
//! Runtime enumerations come back as owned vectors; any count-then-fill
//! protocol stays inside the implementation.

use crate::{
    types::{
        ActionState, EnvironmentBlendMode, Extent2D, FrameState, Hand, ProjectionLayer,
        RuntimeEvent, SessionHandle, Time, Vibration, View, ViewConfigView,
        ViewConfigurationType, ViewStateFlags,
    },
    XrResult,
};

/// Session-level runtime calls owned by [`crate::SessionContext`].
pub trait SessionBackend {
    fn session_handle(&self) -> SessionHandle;

    /// Next queued event, or `None` once the queue is empty.
    fn poll_event(&mut self) -> XrResult<Option<RuntimeEvent>>;

    fn begin(&mut self, view_configuration_type: ViewConfigurationType) -> XrResult<()>;

    fn end(&mut self) -> XrResult<()>;
}

/// Frame-loop runtime calls owned by [`crate::FrameSource`].
pub trait FrameBackend {
    type Swapchain: SwapchainImages;

    fn view_configuration_views(&self) -> XrResult<Vec<ViewConfigView>>;

    fn swapchain_formats(&self) -> XrResult<Vec<i64>>;

    fn create_swapchain(
        &mut self,
        format: i64,
        extent: Extent2D,
        sample_count: u32,
    ) -> XrResult<Self::Swapchain>;

    /// Blocks until the runtime paces the next frame.
    fn wait_frame(&mut self) -> XrResult<FrameState>;

    /// Create the rendering reference space if it does not exist yet.
    fn ensure_reference_space(&mut self, display_time: Time) -> XrResult<()>;

    fn begin_frame(&mut self) -> XrResult<()>;

    fn locate_views(&mut self, display_time: Time) -> XrResult<(ViewStateFlags, Vec<View>)>;

    /// Submit the frame. `swapchains` is indexed by
    /// [`crate::ProjectionView::swapchain_index`].
    fn end_frame(
        &mut self,
        display_time: Time,
        blend_mode: EnvironmentBlendMode,
        layer: Option<&ProjectionLayer>,
        swapchains: &[&Self::Swapchain],
    ) -> XrResult<()>;
}

pub trait SwapchainImages {
    type Image;

    fn enumerate_images(&self) -> XrResult<Vec<Self::Image>>;

    fn acquire_image(&mut self) -> XrResult<u32>;

    /// Waits without timeout.
    fn wait_image(&mut self) -> XrResult<()>;

    fn release_image(&mut self) -> XrResult<()>;
}

/// GPU operations the frame source needs around each swapchain image.
pub trait GraphicsDevice {
    type Image;
    type Framebuffer;

    /// Colour formats this device can render into, in the device's own
    /// format enumeration.
    fn supported_color_formats(&self) -> &[i64];

    /// Framebuffer with `image` as colour attachment and a fresh depth buffer.
    fn create_framebuffer(
        &mut self,
        image: &Self::Image,
        extent: Extent2D,
    ) -> XrResult<Self::Framebuffer>;

    fn destroy_framebuffer(&mut self, framebuffer: Self::Framebuffer);

    /// `None` restores the default framebuffer.
    fn bind_framebuffer(&mut self, framebuffer: Option<&Self::Framebuffer>);

    fn set_viewport(&mut self, extent: Extent2D);

    /// Clears colour and depth.
    fn clear(&mut self, color: [f32; 4]);
}

pub trait ActionBackend {
    fn sync(&mut self) -> XrResult<()>;

    fn grab_state(&mut self, hand: Hand) -> XrResult<ActionState<f32>>;

    fn vibrate(&mut self, hand: Hand, vibration: Vibration) -> XrResult<()>;
}
