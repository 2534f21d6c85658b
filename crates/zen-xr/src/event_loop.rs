//! Single-threaded cooperative loop.
//!
//! Each iteration drains platform events without blocking, then runs every
//! registered busy processor once, in registration order. The loop only holds
//! weak references to processors; dropped processors are pruned at the start
//! of the next iteration.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, error, info};

/// A task run once per loop iteration.
pub trait BusyProcessor {
    fn process(&mut self);
}

/// Outcome of one zero-timeout platform poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformPoll {
    /// Nothing pending (woken or timed out).
    Idle,
    /// An event was handled; poll again.
    Dispatched,
    /// The platform poll itself failed.
    Error(String),
    /// An event arrived from a source the loop does not know.
    UnknownIdentifier(i32),
}

/// Platform event pump driven by [`EventLoop`].
pub trait Platform {
    /// Handle at most one pending event without blocking.
    fn poll_once(&mut self) -> PlatformPoll;

    fn destroy_requested(&self) -> bool;
}

/// Platform with no event source, for runtimes hosted outside an activity.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    destroy: Rc<Cell<bool>>,
}

impl HeadlessPlatform {
    /// Flag that, once set, makes the loop stop as if the platform asked.
    pub fn destroy_flag(&self) -> Rc<Cell<bool>> {
        self.destroy.clone()
    }
}

impl Platform for HeadlessPlatform {
    fn poll_once(&mut self) -> PlatformPoll {
        PlatformPoll::Idle
    }

    fn destroy_requested(&self) -> bool {
        self.destroy.get()
    }
}

/// Shared run flag. Cloned into every component that may stop the loop.
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    running: Rc<Cell<bool>>,
}

impl LoopHandle {
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Ask the loop to stop. Safe to call repeatedly and from inside a
    /// processor; an in-flight blocking call still completes first.
    pub fn terminate(&self) {
        if self.running.replace(false) {
            debug!("event loop termination requested");
        }
    }

    pub(crate) fn start(&self) {
        self.running.set(true);
    }
}

pub struct EventLoop<P: Platform> {
    platform: P,
    handle: LoopHandle,
    busy: Vec<Weak<RefCell<dyn BusyProcessor>>>,
}

impl<P: Platform> EventLoop<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            handle: LoopHandle::default(),
            busy: Vec::new(),
        }
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Register `processor` to run once per iteration after those already
    /// registered. The caller keeps ownership.
    pub fn add_busy<T: BusyProcessor + 'static>(&mut self, processor: &Rc<RefCell<T>>) {
        let processor: Rc<RefCell<dyn BusyProcessor>> = processor.clone();
        self.busy.push(Rc::downgrade(&processor));
    }

    pub fn busy_count(&self) -> usize {
        self.busy.iter().filter(|p| p.strong_count() > 0).count()
    }

    pub fn terminate(&self) {
        self.handle.terminate();
    }

    /// Run until terminated or until the platform requests destruction.
    pub fn run(&mut self) {
        self.handle.start();
        info!("event loop started with {} processors", self.busy.len());

        while self.handle.is_running() && !self.platform.destroy_requested() {
            self.drain_platform();

            self.busy.retain(|processor| processor.strong_count() > 0);
            for processor in &self.busy {
                if !self.handle.is_running() {
                    break;
                }
                if let Some(processor) = processor.upgrade() {
                    processor.borrow_mut().process();
                }
            }
        }

        self.handle.terminate();
        info!("event loop stopped");
    }

    fn drain_platform(&mut self) {
        loop {
            match self.platform.poll_once() {
                PlatformPoll::Idle => return,
                PlatformPoll::Dispatched => continue,
                PlatformPoll::Error(reason) => {
                    error!("platform poll failed: {reason}");
                    self.handle.terminate();
                    return;
                }
                PlatformPoll::UnknownIdentifier(id) => {
                    error!("unknown loop identifier {id}");
                    self.handle.terminate();
                    return;
                }
            }
        }
    }
}
