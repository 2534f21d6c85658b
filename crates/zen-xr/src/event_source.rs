use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, error, warn};
use zen_common::{log_at, Severity};

use crate::{
    adapter::SessionBackend,
    event_loop::{BusyProcessor, LoopHandle},
    session::SessionContext,
    types::{RuntimeEvent, SessionHandle, SessionState, Time},
};

/// Drains the runtime event queue once per loop iteration and applies
/// session state changes.
pub struct EventSource<B: SessionBackend> {
    context: Rc<RefCell<SessionContext<B>>>,
    loop_handle: LoopHandle,
}

impl<B: SessionBackend> EventSource<B> {
    pub fn new(context: Rc<RefCell<SessionContext<B>>>, loop_handle: LoopHandle) -> Self {
        Self {
            context,
            loop_handle,
        }
    }

    fn handle_event(&mut self, event: RuntimeEvent) {
        match event {
            RuntimeEvent::InstanceLossPending { loss_time } => {
                warn!("instance loss pending at {loss_time}");
                self.loop_handle.terminate();
            }
            RuntimeEvent::SessionStateChanged {
                session,
                state,
                time,
            } => self.session_state_changed(session, state, time),
            RuntimeEvent::Other { kind } => debug!("ignoring event type {kind}"),
        }
    }

    fn session_state_changed(
        &mut self,
        session: Option<SessionHandle>,
        state: SessionState,
        time: Time,
    ) {
        let mut context = self.context.borrow_mut();
        if let Some(session) = session {
            let owned = context.session_handle();
            if session != owned {
                log_at(
                    Severity::Fatal,
                    "zen_xr::event_source",
                    &format!(
                        "state changed to {state} for unknown session {:#x} (owned {:#x})",
                        session.into_raw(),
                        owned.into_raw()
                    ),
                );
                self.loop_handle.terminate();
                return;
            }
        }
        context.update_session_state(state, time);
    }
}

impl<B: SessionBackend> BusyProcessor for EventSource<B> {
    fn process(&mut self) {
        loop {
            let polled = self.context.borrow_mut().poll_event();
            match polled {
                Ok(Some(event)) => self.handle_event(event),
                Ok(None) => break,
                Err(err) => {
                    error!("xrPollEvent failed: {err}");
                    self.loop_handle.terminate();
                    break;
                }
            }
        }
    }
}
