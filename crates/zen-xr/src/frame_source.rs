//! Per-iteration frame submission.
//!
//! While the session runs, each call to `process` performs
//! wait → begin → render each view → end. Rendering is skipped (and an empty
//! layer list submitted) when the runtime says not to render or when the
//! tracked pose is not valid. Within a frame each view's swapchain image is
//! acquired, waited on, drawn and released before the next view starts.
//!
//! A runtime failure while rendering still ends the begun frame with no
//! layers before the loop is terminated. An invariant violation aborts
//! without ending it.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, error, info, warn};
use zen_common::{log_at, Severity};

use crate::{
    adapter::{FrameBackend, GraphicsDevice, SessionBackend, SwapchainImages},
    config::ClientConfig,
    event_loop::{BusyProcessor, LoopHandle},
    math,
    negotiate,
    renderer::{Camera, SharedRenderer},
    session::SessionContext,
    types::{
        CompositionLayerFlags, EnvironmentBlendMode, Extent2D, ProjectionLayer, ProjectionView,
        Time,
    },
    XrError, XrResult,
};

/// Rendering parameters fixed for the lifetime of a frame source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOptions {
    pub rendering_scale: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    pub clear_color: [f32; 4],
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for FrameOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            rendering_scale: config.rendering_scale,
            near_clip: config.near_clip,
            far_clip: config.far_clip,
            clear_color: config.clear_color,
        }
    }
}

/// One swapchain per view, plus a framebuffer for each of its images.
pub struct ViewSwapchain<S, Fb> {
    pub handle: S,
    pub extent: Extent2D,
    pub framebuffers: Vec<Fb>,
}

type Swapchain<F> = <F as FrameBackend>::Swapchain;

pub struct FrameSource<S, F, G>
where
    S: SessionBackend,
    F: FrameBackend,
    G: GraphicsDevice<Image = <Swapchain<F> as SwapchainImages>::Image>,
{
    context: Rc<RefCell<SessionContext<S>>>,
    loop_handle: LoopHandle,
    backend: F,
    device: G,
    renderer: SharedRenderer,
    options: FrameOptions,
    swapchains: Vec<ViewSwapchain<Swapchain<F>, G::Framebuffer>>,
}

impl<S, F, G> FrameSource<S, F, G>
where
    S: SessionBackend,
    F: FrameBackend,
    G: GraphicsDevice<Image = <Swapchain<F> as SwapchainImages>::Image>,
{
    /// Create one swapchain per configured view and a framebuffer for every
    /// swapchain image.
    pub fn new(
        context: Rc<RefCell<SessionContext<S>>>,
        loop_handle: LoopHandle,
        backend: F,
        device: G,
        renderer: SharedRenderer,
        options: FrameOptions,
    ) -> XrResult<Self> {
        let mut source = Self {
            context,
            loop_handle,
            backend,
            device,
            renderer,
            options,
            swapchains: Vec::new(),
        };
        source.create_swapchains()?;
        Ok(source)
    }

    fn create_swapchains(&mut self) -> XrResult<()> {
        let views = self.backend.view_configuration_views()?;
        if views.is_empty() {
            return Err(XrError::Negotiation(
                "runtime reported no views for the view configuration".into(),
            ));
        }

        let runtime_formats = self.backend.swapchain_formats()?;
        let selected = negotiate::select_swapchain_format(
            &runtime_formats,
            self.device.supported_color_formats(),
        );
        info!(
            "swapchain formats: {}",
            negotiate::describe_formats(&runtime_formats, selected)
        );
        let format = selected.ok_or_else(|| {
            XrError::Negotiation("no runtime swapchain format is renderable".into())
        })?;

        for (index, view) in views.iter().enumerate() {
            let extent = negotiate::swapchain_extent(view, self.options.rendering_scale);
            info!(
                "view {index}: swapchain {extent} samples={}",
                view.recommended_sample_count
            );
            let handle = self
                .backend
                .create_swapchain(format, extent, view.recommended_sample_count)?;
            let images = handle.enumerate_images()?;

            let mut framebuffers = Vec::with_capacity(images.len());
            for image in &images {
                framebuffers.push(self.device.create_framebuffer(image, extent)?);
            }

            self.swapchains.push(ViewSwapchain {
                handle,
                extent,
                framebuffers,
            });
        }
        Ok(())
    }

    pub fn swapchains(&self) -> &[ViewSwapchain<Swapchain<F>, G::Framebuffer>] {
        &self.swapchains
    }

    pub fn backend(&self) -> &F {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut F {
        &mut self.backend
    }

    fn submit_frame(&mut self) -> XrResult<()> {
        let frame_state = self.backend.wait_frame()?;
        let display_time = frame_state.predicted_display_time;
        self.backend.ensure_reference_space(display_time)?;
        self.backend.begin_frame()?;

        let blend_mode = self.context.borrow().environment_blend_mode();
        let layer = if frame_state.should_render {
            match self.render_views(display_time) {
                Ok(layer) => layer,
                Err(err @ XrError::Invariant(_)) => return Err(err),
                Err(err) => {
                    // a begun frame is always ended, with no layers
                    if let Err(end_err) = self.end_frame(display_time, blend_mode, None) {
                        warn!("failed to end frame after render failure: {end_err}");
                    }
                    return Err(err);
                }
            }
        } else {
            None
        };

        self.end_frame(display_time, blend_mode, layer.as_ref())
    }

    fn end_frame(
        &mut self,
        display_time: Time,
        blend_mode: EnvironmentBlendMode,
        layer: Option<&ProjectionLayer>,
    ) -> XrResult<()> {
        let handles: Vec<&Swapchain<F>> = self.swapchains.iter().map(|s| &s.handle).collect();
        self.backend
            .end_frame(display_time, blend_mode, layer, &handles)
    }

    fn render_views(&mut self, display_time: Time) -> XrResult<Option<ProjectionLayer>> {
        let (view_state, views) = self.backend.locate_views(display_time)?;
        if !view_state.pose_valid() {
            debug!("no valid tracking pose at {display_time}; skipping render");
            return Ok(None);
        }
        if views.len() != self.swapchains.len() {
            return Err(XrError::Invariant(format!(
                "located {} views but own {} swapchains",
                views.len(),
                self.swapchains.len()
            )));
        }

        self.renderer.borrow_mut().update_scene();

        let blend_mode = self.context.borrow().environment_blend_mode();
        let mut layer = ProjectionLayer {
            flags: CompositionLayerFlags::for_blend_mode(blend_mode),
            views: Vec::with_capacity(views.len()),
        };

        for (index, (view, swapchain)) in views.iter().zip(self.swapchains.iter_mut()).enumerate() {
            let image_index = swapchain.handle.acquire_image()?;
            if let Err(err) = swapchain.handle.wait_image() {
                if let Err(release_err) = swapchain.handle.release_image() {
                    warn!("view {index}: release after failed wait also failed: {release_err}");
                }
                return Err(err);
            }

            let Some(framebuffer) = swapchain.framebuffers.get(image_index as usize) else {
                swapchain.handle.release_image()?;
                return Err(XrError::Invariant(format!(
                    "view {index} acquired image {image_index} of {}",
                    swapchain.framebuffers.len()
                )));
            };

            self.device.bind_framebuffer(Some(framebuffer));
            self.device.set_viewport(swapchain.extent);
            self.device.clear(self.options.clear_color);

            let camera = Camera {
                view: math::view_matrix(&view.pose),
                projection: math::projection_matrix(
                    &view.fov,
                    self.options.near_clip,
                    self.options.far_clip,
                ),
            };
            self.renderer.borrow_mut().render(&camera);

            self.device.bind_framebuffer(None);
            swapchain.handle.release_image()?;

            layer.views.push(ProjectionView {
                pose: view.pose,
                fov: view.fov,
                swapchain_index: index,
                extent: swapchain.extent,
            });
        }

        Ok(Some(layer))
    }
}

impl<S, F, G> BusyProcessor for FrameSource<S, F, G>
where
    S: SessionBackend,
    F: FrameBackend,
    G: GraphicsDevice<Image = <Swapchain<F> as SwapchainImages>::Image>,
{
    fn process(&mut self) {
        if !self.context.borrow().is_running() {
            return;
        }
        match self.submit_frame() {
            Ok(()) => {}
            Err(err @ XrError::Invariant(_)) => {
                log_at(Severity::Fatal, "zen_xr::frame_source", &err.to_string());
                self.loop_handle.terminate();
            }
            Err(err) => {
                error!("frame submission failed: {err}");
                self.loop_handle.terminate();
            }
        }
    }
}

impl<S, F, G> Drop for FrameSource<S, F, G>
where
    S: SessionBackend,
    F: FrameBackend,
    G: GraphicsDevice<Image = <Swapchain<F> as SwapchainImages>::Image>,
{
    fn drop(&mut self) {
        for swapchain in self.swapchains.drain(..) {
            for framebuffer in swapchain.framebuffers {
                self.device.destroy_framebuffer(framebuffer);
            }
        }
    }
}
