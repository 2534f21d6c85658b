use std::cell::RefCell;
use std::rc::Rc;

use tracing::{error, warn};

use crate::{
    adapter::{ActionBackend, SessionBackend},
    event_loop::{BusyProcessor, LoopHandle},
    session::SessionContext,
    types::{Hand, Vibration},
};

/// Grab value above which the hand gets a haptic pulse.
pub const GRAB_THRESHOLD: f32 = 0.9;

pub const GRAB_PULSE: Vibration = Vibration {
    amplitude: 0.5,
    duration_nanos: None,
    frequency_hz: None,
};

/// Syncs controller actions each iteration and pulses the haptics of any
/// hand that is squeezing.
pub struct ActionSource<S: SessionBackend, A: ActionBackend> {
    context: Rc<RefCell<SessionContext<S>>>,
    loop_handle: LoopHandle,
    backend: A,
}

impl<S: SessionBackend, A: ActionBackend> ActionSource<S, A> {
    pub fn new(context: Rc<RefCell<SessionContext<S>>>, loop_handle: LoopHandle, backend: A) -> Self {
        Self {
            context,
            loop_handle,
            backend,
        }
    }

    pub fn backend(&self) -> &A {
        &self.backend
    }

    fn update_hand(&mut self, hand: Hand) {
        let grab = match self.backend.grab_state(hand) {
            Ok(grab) => grab,
            Err(err) => {
                warn!("failed to read grab state for {hand} hand: {err}");
                return;
            }
        };

        if grab.is_active && grab.current > GRAB_THRESHOLD {
            if let Err(err) = self.backend.vibrate(hand, GRAB_PULSE) {
                warn!("failed to vibrate {hand} hand: {err}");
            }
        }
    }
}

impl<S: SessionBackend, A: ActionBackend> BusyProcessor for ActionSource<S, A> {
    fn process(&mut self) {
        if !self.context.borrow().is_running() {
            return;
        }
        if let Err(err) = self.backend.sync() {
            error!("failed to sync actions: {err}");
            self.loop_handle.terminate();
            return;
        }
        for hand in Hand::BOTH {
            self.update_hand(hand);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionSelection;
    use crate::testing::{runtime_failure, running_handle, Call, CallLog, MockActions, MockSession};
    use crate::types::{ActionState, SessionState, Time};

    fn source(log: &CallLog, handle: &LoopHandle, running: bool) -> ActionSource<MockSession, MockActions> {
        let mut context = SessionContext::new(MockSession::new(log), SessionSelection::default(), handle.clone());
        if running {
            context.update_session_state(SessionState::Ready, Time::default());
        }
        log.clear();
        ActionSource::new(Rc::new(RefCell::new(context)), handle.clone(), MockActions::new(log))
    }

    fn squeeze(value: f32, is_active: bool) -> ActionState<f32> {
        ActionState { current: value, is_active }
    }

    #[test]
    fn test_idle_when_not_running() {
        let log = CallLog::default();
        let handle = running_handle();
        let mut source = source(&log, &handle, false);

        source.process();

        assert!(log.calls().is_empty());
    }

    #[test]
    fn test_squeeze_above_threshold_vibrates() {
        let log = CallLog::default();
        let handle = running_handle();
        let mut source = source(&log, &handle, true);
        source.backend.grab = [squeeze(0.95, true), squeeze(0.5, true)];

        source.process();

        assert_eq!(
            log.calls(),
            vec![
                Call::SyncActions,
                Call::GrabState(Hand::Left),
                Call::Vibrate(Hand::Left, 0.5),
                Call::GrabState(Hand::Right),
            ]
        );
    }

    #[test]
    fn test_inactive_or_threshold_value_does_not_vibrate() {
        let log = CallLog::default();
        let handle = running_handle();
        let mut source = source(&log, &handle, true);
        source.backend.grab = [squeeze(1.0, false), squeeze(GRAB_THRESHOLD, true)];

        source.process();

        assert!(!log.calls().iter().any(|call| matches!(call, Call::Vibrate(..))));
    }

    #[test]
    fn test_sync_failure_terminates() {
        let log = CallLog::default();
        let handle = running_handle();
        let mut source = source(&log, &handle, true);
        source.backend.sync_error = Some(runtime_failure("xrSyncActions"));

        source.process();

        assert_eq!(log.calls(), vec![Call::SyncActions]);
        assert!(!handle.is_running());
    }

    #[test]
    fn test_per_hand_failure_continues() {
        let log = CallLog::default();
        let handle = running_handle();
        let mut source = source(&log, &handle, true);
        source.backend.grab = [squeeze(1.0, true), squeeze(1.0, true)];
        source.backend.failing_hand = Some(Hand::Left);

        source.process();

        assert!(log.calls().contains(&Call::Vibrate(Hand::Right, 0.5)));
        assert!(handle.is_running());
    }
}
