use openxr as xr;

use zen_xr::{
    xr_check, CompositionLayerFlags, EnvironmentBlendMode, Extent2D, FrameBackend, FrameState,
    ProjectionLayer, ReferenceSpaceType, SwapchainImages, Time, View, ViewConfigView,
    ViewConfigurationType, ViewStateFlags, XrError, XrResult,
};

use crate::convert;

pub struct OpenXrSwapchain {
    swapchain: xr::Swapchain<xr::OpenGlEs>,
}

impl SwapchainImages for OpenXrSwapchain {
    /// GL texture name.
    type Image = u32;

    fn enumerate_images(&self) -> XrResult<Vec<u32>> {
        xr_check!(self.swapchain.enumerate_images())
    }

    fn acquire_image(&mut self) -> XrResult<u32> {
        xr_check!(self.swapchain.acquire_image())
    }

    fn wait_image(&mut self) -> XrResult<()> {
        xr_check!(self.swapchain.wait_image(xr::Duration::INFINITE))
    }

    fn release_image(&mut self) -> XrResult<()> {
        xr_check!(self.swapchain.release_image())
    }
}

/// Frame pacing, view location and submission against one session.
pub struct OpenXrFrames {
    instance: xr::Instance,
    system: xr::SystemId,
    session: xr::Session<xr::OpenGlEs>,
    frame_waiter: xr::FrameWaiter,
    frame_stream: xr::FrameStream<xr::OpenGlEs>,
    view_configuration_type: xr::ViewConfigurationType,
    reference_space_type: ReferenceSpaceType,
    reference_space: Option<xr::Space>,
}

impl OpenXrFrames {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        instance: xr::Instance,
        system: xr::SystemId,
        session: xr::Session<xr::OpenGlEs>,
        frame_waiter: xr::FrameWaiter,
        frame_stream: xr::FrameStream<xr::OpenGlEs>,
        view_configuration_type: ViewConfigurationType,
        reference_space_type: ReferenceSpaceType,
    ) -> Self {
        Self {
            instance,
            system,
            session,
            frame_waiter,
            frame_stream,
            view_configuration_type: convert::to_xr_view_configuration_type(view_configuration_type),
            reference_space_type,
            reference_space: None,
        }
    }

    /// Create the reference space now, pinned to the identity pose.
    pub(crate) fn create_reference_space(&mut self) -> XrResult<()> {
        let ty = convert::to_xr_reference_space(self.reference_space_type);
        let space = xr_check!(self.session.create_reference_space(ty, xr::Posef::IDENTITY))?;
        log::info!("created {} reference space", self.reference_space_type);
        self.reference_space = Some(space);
        Ok(())
    }

    fn reference_space(&self) -> XrResult<&xr::Space> {
        self.reference_space
            .as_ref()
            .ok_or_else(|| XrError::Invariant("reference space used before creation".into()))
    }
}

impl FrameBackend for OpenXrFrames {
    type Swapchain = OpenXrSwapchain;

    fn view_configuration_views(&self) -> XrResult<Vec<ViewConfigView>> {
        let views = xr_check!(self
            .instance
            .enumerate_view_configuration_views(self.system, self.view_configuration_type))?;
        Ok(views.iter().map(convert::to_view_config_view).collect())
    }

    fn swapchain_formats(&self) -> XrResult<Vec<i64>> {
        let formats = xr_check!(self.session.enumerate_swapchain_formats())?;
        Ok(formats.into_iter().map(i64::from).collect())
    }

    fn create_swapchain(
        &mut self,
        format: i64,
        extent: Extent2D,
        sample_count: u32,
    ) -> XrResult<OpenXrSwapchain> {
        let format = u32::try_from(format)
            .map_err(|_| XrError::Invariant(format!("{format:#x} is not a GL format")))?;
        let swapchain = xr_check!(self.session.create_swapchain(&xr::SwapchainCreateInfo {
            create_flags: xr::SwapchainCreateFlags::EMPTY,
            usage_flags: xr::SwapchainUsageFlags::COLOR_ATTACHMENT
                | xr::SwapchainUsageFlags::SAMPLED,
            format,
            sample_count,
            width: extent.width,
            height: extent.height,
            face_count: 1,
            array_size: 1,
            mip_count: 1,
        }))?;
        Ok(OpenXrSwapchain { swapchain })
    }

    fn wait_frame(&mut self) -> XrResult<FrameState> {
        let state = xr_check!(self.frame_waiter.wait())?;
        Ok(convert::to_frame_state(state))
    }

    fn ensure_reference_space(&mut self, display_time: Time) -> XrResult<()> {
        if self.reference_space.is_none() {
            log::debug!("first frame at {display_time}; creating reference space");
            self.create_reference_space()?;
        }
        Ok(())
    }

    fn begin_frame(&mut self) -> XrResult<()> {
        xr_check!(self.frame_stream.begin())?;
        Ok(())
    }

    fn locate_views(&mut self, display_time: Time) -> XrResult<(ViewStateFlags, Vec<View>)> {
        let space = self.reference_space()?;
        let (flags, views) = xr_check!(self.session.locate_views(
            self.view_configuration_type,
            convert::to_xr_time(display_time),
            space
        ))?;
        Ok((
            convert::to_view_state(flags),
            views.iter().map(convert::to_view).collect(),
        ))
    }

    fn end_frame(
        &mut self,
        display_time: Time,
        blend_mode: EnvironmentBlendMode,
        layer: Option<&ProjectionLayer>,
        swapchains: &[&OpenXrSwapchain],
    ) -> XrResult<()> {
        let time = convert::to_xr_time(display_time);
        let blend_mode = convert::to_xr_blend_mode(blend_mode);

        let Some(layer) = layer else {
            return xr_check!(self.frame_stream.end(time, blend_mode, &[]));
        };

        let space = self
            .reference_space
            .as_ref()
            .ok_or_else(|| XrError::Invariant("reference space used before creation".into()))?;
        let mut views = Vec::with_capacity(layer.views.len());
        for view in &layer.views {
            let swapchain = swapchains.get(view.swapchain_index).ok_or_else(|| {
                XrError::Invariant(format!("no swapchain {}", view.swapchain_index))
            })?;
            views.push(
                xr::CompositionLayerProjectionView::new()
                    .pose(convert::to_xr_pose(view.pose))
                    .fov(convert::to_xr_fov(view.fov))
                    .sub_image(
                        xr::SwapchainSubImage::new()
                            .swapchain(&swapchain.swapchain)
                            .image_array_index(0)
                            .image_rect(xr::Rect2Di {
                                offset: xr::Offset2Di { x: 0, y: 0 },
                                extent: xr::Extent2Di {
                                    width: view.extent.width as i32,
                                    height: view.extent.height as i32,
                                },
                            }),
                    ),
            );
        }

        let projection = xr::CompositionLayerProjection::new()
            .layer_flags(to_xr_layer_flags(layer.flags))
            .space(space)
            .views(&views);
        xr_check!(self.frame_stream.end(time, blend_mode, &[&projection]))
    }
}

fn to_xr_layer_flags(flags: CompositionLayerFlags) -> xr::CompositionLayerFlags {
    let mut out = xr::CompositionLayerFlags::EMPTY;
    if flags.contains(CompositionLayerFlags::CORRECT_CHROMATIC_ABERRATION) {
        out |= xr::CompositionLayerFlags::CORRECT_CHROMATIC_ABERRATION;
    }
    if flags.contains(CompositionLayerFlags::BLEND_TEXTURE_SOURCE_ALPHA) {
        out |= xr::CompositionLayerFlags::BLEND_TEXTURE_SOURCE_ALPHA;
    }
    if flags.contains(CompositionLayerFlags::UNPREMULTIPLIED_ALPHA) {
        out |= xr::CompositionLayerFlags::UNPREMULTIPLIED_ALPHA;
    }
    out
}
