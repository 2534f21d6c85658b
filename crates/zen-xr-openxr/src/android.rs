//! Platform pump for a native activity.

use std::time::Duration;

use android_activity::{AndroidApp, InputStatus, MainEvent, PollEvent};
use zen_xr::{Platform, PlatformPoll, XrError, XrResult};

pub struct AndroidPlatform {
    app: AndroidApp,
    destroy_requested: bool,
}

impl AndroidPlatform {
    pub fn new(app: AndroidApp) -> Self {
        Self {
            app,
            destroy_requested: false,
        }
    }

    fn drain_input(&self) {
        match self.app.input_events_iter() {
            Ok(mut events) => while events.next(|_event| InputStatus::Unhandled) {},
            Err(err) => log::warn!("failed to read input events: {err}"),
        }
    }
}

impl Platform for AndroidPlatform {
    fn poll_once(&mut self) -> PlatformPoll {
        let mut outcome = PlatformPoll::Idle;
        let mut input_available = false;

        self.app.poll_events(Some(Duration::ZERO), |event| {
            outcome = match event {
                PollEvent::Wake | PollEvent::Timeout => PlatformPoll::Idle,
                PollEvent::Main(MainEvent::Destroy) => {
                    log::info!("activity destroy requested");
                    self.destroy_requested = true;
                    PlatformPoll::Dispatched
                }
                PollEvent::Main(MainEvent::InputAvailable) => {
                    input_available = true;
                    PlatformPoll::Dispatched
                }
                PollEvent::Main(main) => {
                    log::debug!("main event {main:?}");
                    PlatformPoll::Dispatched
                }
                _ => PlatformPoll::Dispatched,
            };
        });

        if input_available {
            self.drain_input();
        }
        outcome
    }

    fn destroy_requested(&self) -> bool {
        self.destroy_requested
    }
}

/// The OpenXR loader needs the JVM and activity registered by the glue.
pub fn check_android_context() -> XrResult<()> {
    let context = ndk_context::android_context();
    if context.vm().is_null() || context.context().is_null() {
        return Err(XrError::Unavailable(
            "Android VM/context not initialised".into(),
        ));
    }
    Ok(())
}
