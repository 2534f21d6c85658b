use std::cell::RefCell;
use std::rc::Rc;

use zen_xr::{
    ActionSource, ClientConfig, EventLoop, EventSource, FrameOptions, FrameSource, Platform,
    SessionContext, SharedRenderer, XrResult,
};

use crate::context;

/// Bring up the runtime, register the event, action and frame processors (in
/// that order) and run the loop until the session exits or the platform asks
/// to stop.
pub fn run<P: Platform>(platform: P, config: &ClientConfig, renderer: SharedRenderer) -> XrResult<()> {
    zen_common::require_logging()?;
    config.validate()?;

    let mut event_loop = EventLoop::new(platform);
    let handle = event_loop.handle();

    let runtime = context::initialize(config)?;
    let context = Rc::new(RefCell::new(
        SessionContext::new(runtime.session, runtime.selection, handle.clone())
            .with_renderer(renderer.clone()),
    ));

    let event_source = Rc::new(RefCell::new(EventSource::new(context.clone(), handle.clone())));
    let action_source = Rc::new(RefCell::new(ActionSource::new(
        context.clone(),
        handle.clone(),
        runtime.actions,
    )));
    let frame_source = Rc::new(RefCell::new(FrameSource::new(
        context.clone(),
        handle.clone(),
        runtime.frames,
        runtime.device,
        renderer,
        FrameOptions::from(config),
    )?));

    event_loop.add_busy(&event_source);
    event_loop.add_busy(&action_source);
    event_loop.add_busy(&frame_source);

    event_loop.run();

    // swapchains and framebuffers, then actions, then the session itself
    drop(frame_source);
    drop(action_source);
    drop(event_source);
    drop(context);
    log::info!("exit");
    Ok(())
}
