use openxr as xr;

use zen_xr::{xr_check, RuntimeEvent, SessionBackend, SessionHandle, ViewConfigurationType, XrResult};

use crate::convert;
use crate::egl::EglContext;

/// Runtime session plus everything that must outlive it.
///
/// Fields drop in order: the session goes first, then the graphics context
/// it was bound to, then the instance.
pub struct OpenXrSession {
    session: xr::Session<xr::OpenGlEs>,
    event_buffer: xr::EventDataBuffer,
    _graphics: EglContext,
    instance: xr::Instance,
}

impl OpenXrSession {
    pub(crate) fn new(
        session: xr::Session<xr::OpenGlEs>,
        graphics: EglContext,
        instance: xr::Instance,
    ) -> Self {
        Self {
            session,
            event_buffer: xr::EventDataBuffer::new(),
            _graphics: graphics,
            instance,
        }
    }
}

impl SessionBackend for OpenXrSession {
    fn session_handle(&self) -> SessionHandle {
        convert::session_handle(&self.session)
    }

    fn poll_event(&mut self) -> XrResult<Option<RuntimeEvent>> {
        let event = xr_check!(self.instance.poll_event(&mut self.event_buffer))?;
        Ok(event.map(convert::to_runtime_event))
    }

    fn begin(&mut self, view_configuration_type: ViewConfigurationType) -> XrResult<()> {
        let ty = convert::to_xr_view_configuration_type(view_configuration_type);
        xr_check!(self.session.begin(ty))?;
        log::info!("session began ({view_configuration_type})");
        Ok(())
    }

    fn end(&mut self) -> XrResult<()> {
        xr_check!(self.session.end())?;
        log::info!("session ended");
        Ok(())
    }
}
