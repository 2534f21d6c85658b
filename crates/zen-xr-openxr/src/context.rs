//! Runtime bring-up.
//!
//! Steps run in order and any failure aborts start-up: load the loader, log
//! extensions and layers, create the instance, get the HMD system, select the
//! view configuration and blend mode, create the graphics context and check
//! its version, create the session, and (in eager mode) the reference space.

use openxr as xr;

use zen_xr::negotiate::{check_graphics_version, select_accepted};
use zen_xr::{
    xr_check, ClientConfig, EnvironmentBlendMode, GraphicsRequirements, SessionSelection,
    SpaceCreation, Version, ViewConfigurationType, XrError, XrResult,
};

use crate::actions::OpenXrActions;
use crate::convert;
use crate::egl::EglContext;
use crate::frame::OpenXrFrames;
use crate::gl::GlDevice;
use crate::session::OpenXrSession;

/// Everything produced by a successful bring-up, ready to be handed to the
/// core processors.
pub struct OpenXrRuntime {
    pub selection: SessionSelection,
    pub session: OpenXrSession,
    pub frames: OpenXrFrames,
    pub actions: OpenXrActions,
    pub device: GlDevice,
}

pub fn initialize(config: &ClientConfig) -> XrResult<OpenXrRuntime> {
    let entry = load_entry()?;
    let available = log_layers_and_extensions(&entry)?;
    if !available.khr_opengl_es_enable {
        return Err(XrError::Unavailable(
            "runtime does not support XR_KHR_opengl_es_enable".into(),
        ));
    }

    let instance = create_instance(&entry, config)?;
    log_instance_info(&instance);

    let system = xr_check!(instance.system(xr::FormFactor::HEAD_MOUNTED_DISPLAY))?;
    log::info!("using system {system:?} for form factor HEAD_MOUNTED_DISPLAY");
    log_system_properties(&instance, system);

    let view_configuration_type = select_view_configuration(&instance, system)?;
    let selection = SessionSelection {
        view_configuration_type,
        environment_blend_mode: select_blend_mode(&instance, system, view_configuration_type)?,
    };

    let requirements = xr_check!(instance.graphics_requirements::<xr::OpenGlEs>(system))?;
    let graphics = EglContext::initialize()?;
    let device = GlDevice::new(&graphics);
    check_graphics_version(
        &GraphicsRequirements {
            min_version: to_version(requirements.min_api_version_supported),
            max_version: to_version(requirements.max_api_version_supported),
        },
        device.version(),
    )?;

    let binding = graphics.binding();
    // SAFETY: the EGL handles stay valid for as long as the session, which
    // `OpenXrSession` guarantees by owning both and dropping the session first.
    let (session, frame_waiter, frame_stream) = xr_check!(unsafe {
        instance.create_session::<xr::OpenGlEs>(
            system,
            &xr::opengles::SessionCreateInfo::Android {
                display: binding.display,
                config: binding.config,
                context: binding.context,
            },
        )
    })?;
    log::info!("session created");
    log_reference_spaces(&session);

    let mut frames = OpenXrFrames::new(
        instance.clone(),
        system,
        session.clone(),
        frame_waiter,
        frame_stream,
        selection.view_configuration_type,
        config.reference_space,
    );
    if config.reference_space_creation == SpaceCreation::Eager {
        frames.create_reference_space()?;
    }

    let actions = OpenXrActions::new(&instance, &session)?;

    Ok(OpenXrRuntime {
        selection,
        session: OpenXrSession::new(session, graphics, instance),
        frames,
        actions,
        device,
    })
}

fn load_entry() -> XrResult<xr::Entry> {
    let entry = unsafe { xr::Entry::load() }
        .map_err(|e| XrError::Unavailable(format!("OpenXR loader: {e}")))?;

    #[cfg(target_os = "android")]
    {
        crate::android::check_android_context()?;
        xr_check!(entry.initialize_android_loader())?;
    }

    Ok(entry)
}

fn log_layers_and_extensions(entry: &xr::Entry) -> XrResult<xr::ExtensionSet> {
    let extensions = xr_check!(entry.enumerate_extensions())?;
    log::info!("available extensions: {extensions:#?}");

    match entry.enumerate_layers() {
        Ok(layers) => {
            log::info!("available layers: {}", layers.len());
            for layer in layers {
                log::info!(
                    "  {} v{}: {}",
                    layer.layer_name,
                    layer.layer_version,
                    layer.description
                );
            }
        }
        Err(err) => log::warn!("xrEnumerateApiLayerProperties failed: {err:?}"),
    }

    Ok(extensions)
}

fn create_instance(entry: &xr::Entry, config: &ClientConfig) -> XrResult<xr::Instance> {
    let mut extensions = xr::ExtensionSet::default();
    extensions.khr_opengl_es_enable = true;
    #[cfg(target_os = "android")]
    {
        extensions.khr_android_create_instance = true;
    }

    let app_info = xr::ApplicationInfo {
        application_name: &config.application_name,
        application_version: 1,
        engine_name: "zen",
        engine_version: 1,
        api_version: xr::Version::new(1, 0, 0),
    };
    xr_check!(entry.create_instance(&app_info, &extensions, &[]))
}

fn log_instance_info(instance: &xr::Instance) {
    match instance.properties() {
        Ok(properties) => log::info!(
            "instance: runtime={} version={}",
            properties.runtime_name,
            properties.runtime_version
        ),
        Err(err) => log::warn!("xrGetInstanceProperties failed: {err:?}"),
    }
}

fn log_system_properties(instance: &xr::Instance, system: xr::SystemId) {
    let properties = match instance.system_properties(system) {
        Ok(properties) => properties,
        Err(err) => {
            log::warn!("xrGetSystemProperties failed: {err:?}");
            return;
        }
    };
    log::info!(
        "system: name={} vendor={:#x}",
        properties.system_name,
        properties.vendor_id
    );
    log::info!(
        "  graphics: max swapchain {}x{}, max layers {}",
        properties.graphics_properties.max_swapchain_image_width,
        properties.graphics_properties.max_swapchain_image_height,
        properties.graphics_properties.max_layer_count
    );
    log::info!(
        "  tracking: orientation={} position={}",
        bool::from(properties.tracking_properties.orientation_tracking),
        bool::from(properties.tracking_properties.position_tracking)
    );
}

fn select_view_configuration(
    instance: &xr::Instance,
    system: xr::SystemId,
) -> XrResult<ViewConfigurationType> {
    let candidates: Vec<ViewConfigurationType> =
        xr_check!(instance.enumerate_view_configurations(system))?
            .into_iter()
            .map(convert::to_view_configuration_type)
            .collect();

    for candidate in &candidates {
        log_view_configuration(instance, system, *candidate);
    }

    select_accepted(
        "view configuration type",
        &candidates,
        ViewConfigurationType::PRIMARY_STEREO,
    )
}

fn log_view_configuration(instance: &xr::Instance, system: xr::SystemId, ty: ViewConfigurationType) {
    let xr_ty = convert::to_xr_view_configuration_type(ty);
    match instance.view_configuration_properties(system, xr_ty) {
        Ok(properties) => log::debug!("{ty}: fov mutable={}", properties.fov_mutable),
        Err(err) => log::warn!("xrGetViewConfigurationProperties({ty}) failed: {err:?}"),
    }
    match instance.enumerate_view_configuration_views(system, xr_ty) {
        Ok(views) => {
            for (index, view) in views.iter().enumerate() {
                log::debug!(
                    "{ty} view {index}: recommended {}x{} (max {}x{}), samples {} (max {})",
                    view.recommended_image_rect_width,
                    view.recommended_image_rect_height,
                    view.max_image_rect_width,
                    view.max_image_rect_height,
                    view.recommended_swapchain_sample_count,
                    view.max_swapchain_sample_count
                );
            }
        }
        Err(err) => log::warn!("xrEnumerateViewConfigurationViews({ty}) failed: {err:?}"),
    }
}

fn select_blend_mode(
    instance: &xr::Instance,
    system: xr::SystemId,
    view_configuration_type: ViewConfigurationType,
) -> XrResult<EnvironmentBlendMode> {
    let ty = convert::to_xr_view_configuration_type(view_configuration_type);
    let candidates: Vec<EnvironmentBlendMode> =
        xr_check!(instance.enumerate_environment_blend_modes(system, ty))?
            .into_iter()
            .map(convert::to_blend_mode)
            .collect();

    select_accepted("environment blend mode", &candidates, EnvironmentBlendMode::OPAQUE)
}

fn log_reference_spaces(session: &xr::Session<xr::OpenGlEs>) {
    match session.enumerate_reference_spaces() {
        Ok(spaces) => log::info!("available reference spaces: {spaces:?}"),
        Err(err) => log::warn!("xrEnumerateReferenceSpaces failed: {err:?}"),
    }
}

fn to_version(version: xr::Version) -> Version {
    Version::new(version.major(), version.minor())
}
