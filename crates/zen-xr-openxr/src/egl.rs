//! Off-screen EGL context the runtime composites from.
//!
//! The runtime owns the presentable surface, so the context only needs a
//! 16x16 pbuffer to be made current.

use std::ffi::c_void;

use khronos_egl as egl;
use zen_xr::graphics::{choose_config, ConfigAttributes};
use zen_xr::{XrError, XrResult};

type EglInstance = egl::DynamicInstance<egl::EGL1_4>;

const EGL_OPENGL_ES3_BIT: egl::Int = 0x0040;
const PBUFFER_SIZE: egl::Int = 16;

/// Handles the runtime needs to bind a session to this context.
#[derive(Debug, Clone, Copy)]
pub struct GraphicsBinding {
    pub display: *mut c_void,
    pub config: *mut c_void,
    pub context: *mut c_void,
}

pub struct EglContext {
    egl: EglInstance,
    display: egl::Display,
    config: egl::Config,
    context: egl::Context,
    surface: egl::Surface,
}

impl EglContext {
    /// Connect to the default display, pick a config and make a GLES 3
    /// context current on the calling thread.
    pub fn initialize() -> XrResult<Self> {
        let egl = unsafe { EglInstance::load_required() }
            .map_err(|e| XrError::Unavailable(format!("libEGL load failed: {e}")))?;

        let display = unsafe { egl.get_display(egl::DEFAULT_DISPLAY) }
            .ok_or_else(|| XrError::Graphics("eglGetDisplay returned no display".into()))?;
        let (major, minor) = egl.initialize(display).map_err(egl_failure("eglInitialize"))?;
        log::info!("EGL {major}.{minor}");

        let config = choose(&egl, display)?;

        egl.bind_api(egl::OPENGL_ES_API)
            .map_err(egl_failure("eglBindAPI"))?;
        let context = egl
            .create_context(
                display,
                config,
                None,
                &[egl::CONTEXT_CLIENT_VERSION, 3, egl::NONE],
            )
            .map_err(egl_failure("eglCreateContext"))?;

        let surface = match egl.create_pbuffer_surface(
            display,
            config,
            &[egl::WIDTH, PBUFFER_SIZE, egl::HEIGHT, PBUFFER_SIZE, egl::NONE],
        ) {
            Ok(surface) => surface,
            Err(err) => {
                let _ = egl.destroy_context(display, context);
                return Err(egl_failure("eglCreatePbufferSurface")(err));
            }
        };

        let this = Self {
            egl,
            display,
            config,
            context,
            surface,
        };
        this.egl
            .make_current(display, Some(surface), Some(surface), Some(context))
            .map_err(egl_failure("eglMakeCurrent"))?;
        Ok(this)
    }

    pub fn binding(&self) -> GraphicsBinding {
        GraphicsBinding {
            display: self.display.as_ptr(),
            config: self.config.as_ptr(),
            context: self.context.as_ptr(),
        }
    }

    pub fn get_proc_address(&self, name: &str) -> *const c_void {
        self.egl
            .get_proc_address(name)
            .map_or(std::ptr::null(), |f| f as *const c_void)
    }
}

impl Drop for EglContext {
    fn drop(&mut self) {
        let _ = self.egl.make_current(self.display, None, None, None);
        let _ = self.egl.destroy_surface(self.display, self.surface);
        let _ = self.egl.destroy_context(self.display, self.context);
        let _ = self.egl.terminate(self.display);
    }
}

fn choose(egl: &EglInstance, display: egl::Display) -> XrResult<egl::Config> {
    let count = egl
        .get_config_count(display)
        .map_err(egl_failure("eglGetConfigs"))?;
    let mut configs = Vec::with_capacity(count);
    egl.get_configs(display, &mut configs)
        .map_err(egl_failure("eglGetConfigs"))?;

    let mut attributes = Vec::with_capacity(configs.len());
    for config in &configs {
        attributes.push(config_attributes(egl, display, *config)?);
    }

    choose_config(&attributes)
        .map(|index| configs[index])
        .ok_or_else(|| {
            XrError::Graphics(format!(
                "none of {} EGL configs is RGBA8/D24, single-sampled and GLES 3 renderable",
                configs.len()
            ))
        })
}

fn config_attributes(
    egl: &EglInstance,
    display: egl::Display,
    config: egl::Config,
) -> XrResult<ConfigAttributes> {
    let get = |attribute| {
        egl.get_config_attrib(display, config, attribute)
            .map_err(egl_failure("eglGetConfigAttrib"))
    };
    let renderable = get(egl::RENDERABLE_TYPE)?;
    let surface = get(egl::SURFACE_TYPE)?;

    Ok(ConfigAttributes {
        renderable_es3: renderable & EGL_OPENGL_ES3_BIT != 0,
        window_surface: surface & egl::WINDOW_BIT != 0,
        pbuffer_surface: surface & egl::PBUFFER_BIT != 0,
        red_size: get(egl::RED_SIZE)?,
        green_size: get(egl::GREEN_SIZE)?,
        blue_size: get(egl::BLUE_SIZE)?,
        alpha_size: get(egl::ALPHA_SIZE)?,
        depth_size: get(egl::DEPTH_SIZE)?,
        sample_buffers: get(egl::SAMPLE_BUFFERS)?,
        samples: get(egl::SAMPLES)?,
    })
}

fn egl_failure(call: &'static str) -> impl Fn(egl::Error) -> XrError {
    move |err| XrError::Graphics(format!("{call} failed: {}", egl_error_name(err)))
}

pub fn egl_error_name(err: egl::Error) -> &'static str {
    #[allow(unreachable_patterns)]
    match err {
        egl::Error::NotInitialized => "EGL_NOT_INITIALIZED",
        egl::Error::BadAccess => "EGL_BAD_ACCESS",
        egl::Error::BadAlloc => "EGL_BAD_ALLOC",
        egl::Error::BadAttribute => "EGL_BAD_ATTRIBUTE",
        egl::Error::BadContext => "EGL_BAD_CONTEXT",
        egl::Error::BadConfig => "EGL_BAD_CONFIG",
        egl::Error::BadCurrentSurface => "EGL_BAD_CURRENT_SURFACE",
        egl::Error::BadDisplay => "EGL_BAD_DISPLAY",
        egl::Error::BadSurface => "EGL_BAD_SURFACE",
        egl::Error::BadMatch => "EGL_BAD_MATCH",
        egl::Error::BadParameter => "EGL_BAD_PARAMETER",
        egl::Error::BadNativePixmap => "EGL_BAD_NATIVE_PIXMAP",
        egl::Error::BadNativeWindow => "EGL_BAD_NATIVE_WINDOW",
        egl::Error::ContextLost => "EGL_CONTEXT_LOST",
        _ => "EGL_UNKNOWN_ERROR",
    }
}
