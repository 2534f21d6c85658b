//! Session state machine.
//!
//! `SessionContext` owns the runtime session (and, through the backend, the
//! instance and graphics context) and is the only place the session state
//! changes. Side effects happen only on entry to a state:
//! - `READY`: begin the session; on success the session is running.
//! - `STOPPING`: end the session; the session stops running.
//! - `EXITING` / `LOSS_PENDING`: stop running and terminate the loop.
//!
//! Every other state is recorded without side effects. A failing begin or end
//! is logged and terminates the loop.

use tracing::{error, info};

use crate::{
    adapter::SessionBackend,
    event_loop::LoopHandle,
    renderer::SharedRenderer,
    types::{EnvironmentBlendMode, RuntimeEvent, SessionHandle, SessionState, Time, ViewConfigurationType},
    XrResult,
};

/// View configuration and blend mode chosen at initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSelection {
    pub view_configuration_type: ViewConfigurationType,
    pub environment_blend_mode: EnvironmentBlendMode,
}

impl Default for SessionSelection {
    fn default() -> Self {
        Self {
            view_configuration_type: ViewConfigurationType::PRIMARY_STEREO,
            environment_blend_mode: EnvironmentBlendMode::OPAQUE,
        }
    }
}

pub struct SessionContext<B: SessionBackend> {
    backend: B,
    selection: SessionSelection,
    state: SessionState,
    running: bool,
    loop_handle: LoopHandle,
    renderer: Option<SharedRenderer>,
}

impl<B: SessionBackend> SessionContext<B> {
    pub fn new(backend: B, selection: SessionSelection, loop_handle: LoopHandle) -> Self {
        Self {
            backend,
            selection,
            state: SessionState::Unknown,
            running: false,
            loop_handle,
            renderer: None,
        }
    }

    /// Notify `renderer` when the session begins and ends.
    pub fn with_renderer(mut self, renderer: SharedRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True between a successful begin on `READY` and the next `STOPPING`,
    /// `EXITING` or `LOSS_PENDING`.
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn view_configuration_type(&self) -> ViewConfigurationType {
        self.selection.view_configuration_type
    }

    pub fn environment_blend_mode(&self) -> EnvironmentBlendMode {
        self.selection.environment_blend_mode
    }

    pub fn session_handle(&self) -> SessionHandle {
        self.backend.session_handle()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn poll_event(&mut self) -> XrResult<Option<RuntimeEvent>> {
        self.backend.poll_event()
    }

    /// Apply a runtime-reported state. Called only by the event source.
    pub fn update_session_state(&mut self, state: SessionState, time: Time) {
        let previous = std::mem::replace(&mut self.state, state);
        info!("session state {previous} -> {state} time={time}");
        if previous == state {
            return;
        }

        match state {
            SessionState::Ready => self.begin(),
            SessionState::Stopping => self.end(),
            SessionState::Exiting | SessionState::LossPending => {
                self.set_running(false);
                self.loop_handle.terminate();
            }
            _ => {}
        }
    }

    fn begin(&mut self) {
        match self.backend.begin(self.selection.view_configuration_type) {
            Ok(()) => self.set_running(true),
            Err(err) => {
                error!("failed to begin session: {err}");
                self.loop_handle.terminate();
            }
        }
    }

    fn end(&mut self) {
        if let Err(err) = self.backend.end() {
            error!("failed to end session: {err}");
            self.loop_handle.terminate();
        }
        self.set_running(false);
    }

    fn set_running(&mut self, running: bool) {
        if self.running == running {
            return;
        }
        self.running = running;
        if let Some(renderer) = &self.renderer {
            if running {
                renderer.borrow_mut().enable_session();
            } else {
                renderer.borrow_mut().disable_session();
            }
        }
    }
}
