use std::num::NonZeroU32;

use glow::HasContext;
use zen_common::log_at;
use zen_xr::graphics::DebugMessageType;
use zen_xr::{Extent2D, GraphicsDevice, Version, XrError, XrResult};

use crate::egl::EglContext;

const COLOR_FORMATS: [i64; 3] = [
    glow::RGBA8 as i64,
    glow::RGBA8_SNORM as i64,
    glow::SRGB8_ALPHA8 as i64,
];

/// Framebuffer wrapping one swapchain texture plus its own depth buffer.
pub struct GlFramebuffer {
    framebuffer: glow::Framebuffer,
    depth: glow::Renderbuffer,
}

pub struct GlDevice {
    gl: glow::Context,
}

impl GlDevice {
    /// Load GL entry points through EGL and install the debug-output callback.
    /// The EGL context must be current.
    pub fn new(egl: &EglContext) -> Self {
        let mut gl = unsafe { glow::Context::from_loader_function(|name| egl.get_proc_address(name)) };
        install_debug_output(&mut gl);
        Self { gl }
    }

    pub fn version(&self) -> Version {
        let (major, minor) = unsafe {
            (
                self.gl.get_parameter_i32(glow::MAJOR_VERSION),
                self.gl.get_parameter_i32(glow::MINOR_VERSION),
            )
        };
        Version::new(major.max(0) as u16, minor.max(0) as u16)
    }
}

fn install_debug_output(gl: &mut glow::Context) {
    if !gl.supports_debug() {
        log::warn!("GL debug output unavailable");
        return;
    }
    unsafe {
        gl.enable(glow::DEBUG_OUTPUT);
        gl.debug_message_callback(|_source, gltype, _id, _severity, message| {
            let kind = DebugMessageType::from_gl(gltype);
            log_at(kind.severity(), "gles", message);
        });
        for silenced in [glow::DEBUG_TYPE_PUSH_GROUP, glow::DEBUG_TYPE_POP_GROUP] {
            gl.debug_message_control(glow::DONT_CARE, silenced, glow::DONT_CARE, &[], false);
        }
    }
}

impl GraphicsDevice for GlDevice {
    type Image = u32;
    type Framebuffer = GlFramebuffer;

    fn supported_color_formats(&self) -> &[i64] {
        &COLOR_FORMATS
    }

    fn create_framebuffer(&mut self, image: &u32, extent: Extent2D) -> XrResult<GlFramebuffer> {
        let texture = NonZeroU32::new(*image)
            .map(glow::NativeTexture)
            .ok_or_else(|| XrError::Graphics("swapchain image 0 is not a texture".into()))?;
        let gl = &self.gl;

        unsafe {
            let framebuffer = gl.create_framebuffer().map_err(XrError::Graphics)?;
            let depth = match gl.create_renderbuffer() {
                Ok(depth) => depth,
                Err(err) => {
                    gl.delete_framebuffer(framebuffer);
                    return Err(XrError::Graphics(err));
                }
            };

            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(depth));
            gl.renderbuffer_storage(
                glow::RENDERBUFFER,
                glow::DEPTH_COMPONENT32F,
                extent.width as i32,
                extent.height as i32,
            );
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);

            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer));
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(texture),
                0,
            );
            gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::DEPTH_ATTACHMENT,
                glow::RENDERBUFFER,
                Some(depth),
            );
            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);

            if status != glow::FRAMEBUFFER_COMPLETE {
                gl.delete_framebuffer(framebuffer);
                gl.delete_renderbuffer(depth);
                return Err(XrError::Graphics(format!(
                    "framebuffer for image {image} incomplete: {status:#x}"
                )));
            }

            Ok(GlFramebuffer { framebuffer, depth })
        }
    }

    fn destroy_framebuffer(&mut self, framebuffer: GlFramebuffer) {
        unsafe {
            self.gl.delete_framebuffer(framebuffer.framebuffer);
            self.gl.delete_renderbuffer(framebuffer.depth);
        }
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<&GlFramebuffer>) {
        unsafe {
            self.gl
                .bind_framebuffer(glow::FRAMEBUFFER, framebuffer.map(|fb| fb.framebuffer));
        }
    }

    fn set_viewport(&mut self, extent: Extent2D) {
        unsafe {
            self.gl
                .viewport(0, 0, extent.width as i32, extent.height as i32);
        }
    }

    fn clear(&mut self, color: [f32; 4]) {
        let [r, g, b, a] = color;
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }
}
