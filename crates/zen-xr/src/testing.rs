//! In-memory backends that record every call into a shared [`CallLog`].

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use glam::{Quat, Vec3};

use crate::{
    adapter::{ActionBackend, FrameBackend, GraphicsDevice, SessionBackend, SwapchainImages},
    event_loop::{LoopHandle, Platform, PlatformPoll},
    renderer::{Camera, SceneRenderer},
    types::{
        ActionState, EnvironmentBlendMode, Extent2D, Fov, FrameState, Hand, Pose,
        ProjectionLayer, RuntimeEvent, SessionHandle, Time, Vibration, View, ViewConfigView,
        ViewConfigurationType, ViewStateFlags,
    },
    XrError, XrResult,
};

pub const MOCK_SESSION: SessionHandle = SessionHandle::from_raw(0x5e55);
pub const GL_RGBA8: i64 = 0x8058;
pub const GL_SRGB8_ALPHA8: i64 = 0x8C43;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Processed(&'static str),
    BeginSession(ViewConfigurationType),
    EndSession,
    CreateSwapchain { format: i64, extent: Extent2D, samples: u32 },
    WaitFrame,
    EnsureReferenceSpace,
    BeginFrame,
    LocateViews,
    EndFrame { layer_views: Option<usize> },
    Acquire(usize),
    WaitImage(usize),
    Release(usize),
    CreateFramebuffer(u32),
    DestroyFramebuffer(u32),
    BindFramebuffer(Option<u32>),
    Viewport(Extent2D),
    Clear,
    UpdateScene,
    Render,
    EnableSession,
    DisableSession,
    SyncActions,
    GrabState(Hand),
    Vibrate(Hand, f32),
}

#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

pub fn runtime_failure(origin: &'static str) -> XrError {
    XrError::Runtime {
        origin,
        result: "ERROR_RUNTIME_FAILURE".to_string(),
        location: "mock",
    }
}

pub fn running_handle() -> LoopHandle {
    let handle = LoopHandle::default();
    handle.start();
    handle
}

#[derive(Debug, Default)]
pub struct ScriptedPlatform {
    polls: VecDeque<PlatformPoll>,
    polled: usize,
    pub destroy_after_polls: Option<usize>,
}

impl ScriptedPlatform {
    pub fn with_polls(polls: Vec<PlatformPoll>) -> Self {
        Self {
            polls: polls.into(),
            ..Self::default()
        }
    }
}

impl Platform for ScriptedPlatform {
    fn poll_once(&mut self) -> PlatformPoll {
        self.polled += 1;
        self.polls.pop_front().unwrap_or(PlatformPoll::Idle)
    }

    fn destroy_requested(&self) -> bool {
        self.destroy_after_polls.is_some_and(|limit| self.polled >= limit)
    }
}

pub struct MockSession {
    log: CallLog,
    pub events: VecDeque<XrResult<RuntimeEvent>>,
    pub begin_error: Option<XrError>,
    pub end_error: Option<XrError>,
}

impl MockSession {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            events: VecDeque::new(),
            begin_error: None,
            end_error: None,
        }
    }
}

impl SessionBackend for MockSession {
    fn session_handle(&self) -> SessionHandle {
        MOCK_SESSION
    }

    fn poll_event(&mut self) -> XrResult<Option<RuntimeEvent>> {
        self.events.pop_front().transpose()
    }

    fn begin(&mut self, view_configuration_type: ViewConfigurationType) -> XrResult<()> {
        self.log.push(Call::BeginSession(view_configuration_type));
        self.begin_error.take().map_or(Ok(()), Err)
    }

    fn end(&mut self) -> XrResult<()> {
        self.log.push(Call::EndSession);
        self.end_error.take().map_or(Ok(()), Err)
    }
}

pub struct MockFrames {
    log: CallLog,
    pub view_configs: Vec<ViewConfigView>,
    pub formats: Vec<i64>,
    pub images_per_swapchain: u32,
    pub frame_state: FrameState,
    pub wait_error: Option<XrError>,
    pub begin_error: Option<XrError>,
    pub end_error: Option<XrError>,
    pub view_state: ViewStateFlags,
    pub located: Vec<View>,
    pub submitted: Vec<(Time, EnvironmentBlendMode, Option<ProjectionLayer>)>,
    swapchains_created: usize,
}

impl MockFrames {
    /// Two views, three images per swapchain, valid tracking.
    pub fn stereo(log: &CallLog) -> Self {
        let config = ViewConfigView {
            recommended_width: 100,
            max_width: 400,
            recommended_height: 80,
            max_height: 400,
            recommended_sample_count: 1,
            max_sample_count: 4,
        };
        let eye = |offset: f32| View {
            pose: Pose {
                orientation: Quat::from_rotation_y(0.1),
                position: Vec3::new(offset, 1.6, 0.0),
            },
            fov: Fov {
                angle_left: -0.8,
                angle_right: 0.7,
                angle_up: 0.75,
                angle_down: -0.85,
            },
        };
        Self {
            log: log.clone(),
            view_configs: vec![config; 2],
            formats: vec![0x8059, GL_SRGB8_ALPHA8, GL_RGBA8],
            images_per_swapchain: 3,
            frame_state: FrameState {
                predicted_display_time: Time::from_nanos(1_000_000),
                should_render: true,
            },
            wait_error: None,
            begin_error: None,
            end_error: None,
            view_state: ViewStateFlags::ORIENTATION_VALID | ViewStateFlags::POSITION_VALID,
            located: vec![eye(-0.032), eye(0.032)],
            submitted: Vec::new(),
            swapchains_created: 0,
        }
    }
}

impl FrameBackend for MockFrames {
    type Swapchain = MockSwapchain;

    fn view_configuration_views(&self) -> XrResult<Vec<ViewConfigView>> {
        Ok(self.view_configs.clone())
    }

    fn swapchain_formats(&self) -> XrResult<Vec<i64>> {
        Ok(self.formats.clone())
    }

    fn create_swapchain(
        &mut self,
        format: i64,
        extent: Extent2D,
        sample_count: u32,
    ) -> XrResult<MockSwapchain> {
        self.log.push(Call::CreateSwapchain {
            format,
            extent,
            samples: sample_count,
        });
        let view = self.swapchains_created;
        self.swapchains_created += 1;
        Ok(MockSwapchain {
            log: self.log.clone(),
            view,
            images: (0..self.images_per_swapchain)
                .map(|i| view as u32 * 100 + i)
                .collect(),
            next: 0,
            held: false,
            acquire_error: None,
            wait_image_error: None,
            release_error: None,
        })
    }

    fn wait_frame(&mut self) -> XrResult<FrameState> {
        self.log.push(Call::WaitFrame);
        self.wait_error.take().map_or(Ok(self.frame_state), Err)
    }

    fn ensure_reference_space(&mut self, _display_time: Time) -> XrResult<()> {
        self.log.push(Call::EnsureReferenceSpace);
        Ok(())
    }

    fn begin_frame(&mut self) -> XrResult<()> {
        self.log.push(Call::BeginFrame);
        self.begin_error.take().map_or(Ok(()), Err)
    }

    fn locate_views(&mut self, _display_time: Time) -> XrResult<(ViewStateFlags, Vec<View>)> {
        self.log.push(Call::LocateViews);
        Ok((self.view_state, self.located.clone()))
    }

    fn end_frame(
        &mut self,
        display_time: Time,
        blend_mode: EnvironmentBlendMode,
        layer: Option<&ProjectionLayer>,
        swapchains: &[&MockSwapchain],
    ) -> XrResult<()> {
        self.log.push(Call::EndFrame {
            layer_views: layer.map(|layer| layer.views.len()),
        });
        if let Some(err) = self.end_error.take() {
            return Err(err);
        }
        if let Some(layer) = layer {
            for view in &layer.views {
                assert!(view.swapchain_index < swapchains.len());
            }
        }
        self.submitted.push((display_time, blend_mode, layer.cloned()));
        Ok(())
    }
}

pub struct MockSwapchain {
    log: CallLog,
    view: usize,
    images: Vec<u32>,
    next: u32,
    held: bool,
    pub acquire_error: Option<XrError>,
    pub wait_image_error: Option<XrError>,
    pub release_error: Option<XrError>,
}

impl SwapchainImages for MockSwapchain {
    type Image = u32;

    fn enumerate_images(&self) -> XrResult<Vec<u32>> {
        Ok(self.images.clone())
    }

    fn acquire_image(&mut self) -> XrResult<u32> {
        self.log.push(Call::Acquire(self.view));
        if let Some(err) = self.acquire_error.take() {
            return Err(err);
        }
        assert!(!self.held, "image acquired twice without release");
        self.held = true;
        let index = self.next;
        self.next = (self.next + 1) % self.images.len() as u32;
        Ok(index)
    }

    fn wait_image(&mut self) -> XrResult<()> {
        self.log.push(Call::WaitImage(self.view));
        assert!(self.held, "wait without acquire");
        self.wait_image_error.take().map_or(Ok(()), Err)
    }

    fn release_image(&mut self) -> XrResult<()> {
        self.log.push(Call::Release(self.view));
        assert!(self.held, "release without acquire");
        if let Some(err) = self.release_error.take() {
            return Err(err);
        }
        self.held = false;
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct MockFramebuffer(u32);

pub struct MockDevice {
    log: CallLog,
    formats: Vec<i64>,
}

impl MockDevice {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            formats: vec![GL_RGBA8, 0x8F97, GL_SRGB8_ALPHA8],
        }
    }
}

impl GraphicsDevice for MockDevice {
    type Image = u32;
    type Framebuffer = MockFramebuffer;

    fn supported_color_formats(&self) -> &[i64] {
        &self.formats
    }

    fn create_framebuffer(&mut self, image: &u32, _extent: Extent2D) -> XrResult<MockFramebuffer> {
        self.log.push(Call::CreateFramebuffer(*image));
        Ok(MockFramebuffer(*image))
    }

    fn destroy_framebuffer(&mut self, framebuffer: MockFramebuffer) {
        self.log.push(Call::DestroyFramebuffer(framebuffer.0));
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<&MockFramebuffer>) {
        self.log.push(Call::BindFramebuffer(framebuffer.map(|fb| fb.0)));
    }

    fn set_viewport(&mut self, extent: Extent2D) {
        self.log.push(Call::Viewport(extent));
    }

    fn clear(&mut self, _color: [f32; 4]) {
        self.log.push(Call::Clear);
    }
}

pub struct RecordingRenderer {
    log: CallLog,
    pub cameras: Vec<Camera>,
}

impl RecordingRenderer {
    pub fn shared(log: &CallLog) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            log: log.clone(),
            cameras: Vec::new(),
        }))
    }
}

impl SceneRenderer for RecordingRenderer {
    fn update_scene(&mut self) {
        self.log.push(Call::UpdateScene);
    }

    fn render(&mut self, camera: &Camera) {
        self.log.push(Call::Render);
        self.cameras.push(*camera);
    }

    fn enable_session(&mut self) {
        self.log.push(Call::EnableSession);
    }

    fn disable_session(&mut self) {
        self.log.push(Call::DisableSession);
    }
}

pub struct MockActions {
    log: CallLog,
    pub grab: [ActionState<f32>; 2],
    pub sync_error: Option<XrError>,
    pub failing_hand: Option<Hand>,
}

impl MockActions {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            grab: [ActionState::default(); 2],
            sync_error: None,
            failing_hand: None,
        }
    }
}

impl ActionBackend for MockActions {
    fn sync(&mut self) -> XrResult<()> {
        self.log.push(Call::SyncActions);
        self.sync_error.take().map_or(Ok(()), Err)
    }

    fn grab_state(&mut self, hand: Hand) -> XrResult<ActionState<f32>> {
        self.log.push(Call::GrabState(hand));
        if self.failing_hand == Some(hand) {
            return Err(runtime_failure("xrGetActionStateFloat"));
        }
        Ok(match hand {
            Hand::Left => self.grab[0],
            Hand::Right => self.grab[1],
        })
    }

    fn vibrate(&mut self, hand: Hand, vibration: Vibration) -> XrResult<()> {
        self.log.push(Call::Vibrate(hand, vibration.amplitude));
        Ok(())
    }
}
