use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Lifecycle state of an XR session, as reported by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Unknown,
    Idle,
    /// The runtime wants the application to begin the session.
    Ready,
    Synchronized,
    Visible,
    Focused,
    /// The runtime wants the application to end the session.
    Stopping,
    /// The instance is about to be lost; the session cannot be resumed.
    LossPending,
    /// The application should exit.
    Exiting,
}

impl SessionState {
    /// Map the runtime's raw `XrSessionState` value. Unrecognised values
    /// become `Unknown`.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => SessionState::Idle,
            2 => SessionState::Ready,
            3 => SessionState::Synchronized,
            4 => SessionState::Visible,
            5 => SessionState::Focused,
            6 => SessionState::Stopping,
            7 => SessionState::LossPending,
            8 => SessionState::Exiting,
            _ => SessionState::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Unknown => "UNKNOWN",
            SessionState::Idle => "IDLE",
            SessionState::Ready => "READY",
            SessionState::Synchronized => "SYNCHRONIZED",
            SessionState::Visible => "VISIBLE",
            SessionState::Focused => "FOCUSED",
            SessionState::Stopping => "STOPPING",
            SessionState::LossPending => "LOSS_PENDING",
            SessionState::Exiting => "EXITING",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `XrViewConfigurationType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewConfigurationType(i32);

impl ViewConfigurationType {
    pub const PRIMARY_MONO: Self = Self(1);
    pub const PRIMARY_STEREO: Self = Self(2);

    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn into_raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ViewConfigurationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::PRIMARY_MONO => f.write_str("PRIMARY_MONO"),
            Self::PRIMARY_STEREO => f.write_str("PRIMARY_STEREO"),
            Self(raw) => write!(f, "VIEW_CONFIGURATION_TYPE({raw})"),
        }
    }
}

/// `XrEnvironmentBlendMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvironmentBlendMode(i32);

impl EnvironmentBlendMode {
    pub const OPAQUE: Self = Self(1);
    pub const ADDITIVE: Self = Self(2);
    pub const ALPHA_BLEND: Self = Self(3);

    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn into_raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for EnvironmentBlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::OPAQUE => f.write_str("OPAQUE"),
            Self::ADDITIVE => f.write_str("ADDITIVE"),
            Self::ALPHA_BLEND => f.write_str("ALPHA_BLEND"),
            Self(raw) => write!(f, "ENVIRONMENT_BLEND_MODE({raw})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceSpaceType {
    View,
    Local,
    #[default]
    Stage,
}

impl ReferenceSpaceType {
    pub const fn into_raw(self) -> i32 {
        match self {
            ReferenceSpaceType::View => 1,
            ReferenceSpaceType::Local => 2,
            ReferenceSpaceType::Stage => 3,
        }
    }
}

impl fmt::Display for ReferenceSpaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReferenceSpaceType::View => "view",
            ReferenceSpaceType::Local => "local",
            ReferenceSpaceType::Stage => "stage",
        })
    }
}

impl FromStr for ReferenceSpaceType {
    type Err = crate::XrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "view" => Ok(ReferenceSpaceType::View),
            "local" => Ok(ReferenceSpaceType::Local),
            "stage" => Ok(ReferenceSpaceType::Stage),
            other => Err(crate::XrError::Config(format!(
                "unknown reference space {other}"
            ))),
        }
    }
}

/// Runtime time in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Time(i64);

impl Time {
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub const fn as_nanos(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw handle of a runtime session, used only for identity checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(u64);

impl SessionHandle {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn into_raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
}

impl Version {
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// API version range the runtime accepts for the graphics binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphicsRequirements {
    pub min_version: Version,
    pub max_version: Version,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub orientation: Quat,
    pub position: Vec3,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        orientation: Quat::IDENTITY,
        position: Vec3::ZERO,
    };
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Field-of-view half-angles in radians. Left and down are usually negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Fov {
    pub angle_left: f32,
    pub angle_right: f32,
    pub angle_up: f32,
    pub angle_down: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct View {
    pub pose: Pose,
    pub fov: Fov,
}

bitflags! {
    /// Validity of a located view set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ViewStateFlags: u64 {
        const ORIENTATION_VALID = 0x1;
        const POSITION_VALID = 0x2;
        const ORIENTATION_TRACKED = 0x4;
        const POSITION_TRACKED = 0x8;
    }
}

impl ViewStateFlags {
    /// Both position and orientation can be used for rendering.
    pub fn pose_valid(self) -> bool {
        self.contains(Self::ORIENTATION_VALID | Self::POSITION_VALID)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CompositionLayerFlags: u64 {
        const CORRECT_CHROMATIC_ABERRATION = 0x1;
        const BLEND_TEXTURE_SOURCE_ALPHA = 0x2;
        const UNPREMULTIPLIED_ALPHA = 0x4;
    }
}

impl CompositionLayerFlags {
    pub fn for_blend_mode(mode: EnvironmentBlendMode) -> Self {
        if mode == EnvironmentBlendMode::ALPHA_BLEND {
            Self::BLEND_TEXTURE_SOURCE_ALPHA | Self::UNPREMULTIPLIED_ALPHA
        } else {
            Self::empty()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameState {
    pub predicted_display_time: Time,
    pub should_render: bool,
}

/// An event read from the runtime's queue, reduced to what the client acts on.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEvent {
    InstanceLossPending {
        loss_time: Time,
    },
    SessionStateChanged {
        /// `None` when the runtime reported a null session handle.
        session: Option<SessionHandle>,
        state: SessionState,
        time: Time,
    },
    Other {
        kind: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extent2D {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Extent2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Per-view image limits reported for a view configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewConfigView {
    pub recommended_width: u32,
    pub max_width: u32,
    pub recommended_height: u32,
    pub max_height: u32,
    pub recommended_sample_count: u32,
    pub max_sample_count: u32,
}

/// One eye of a projection layer; `swapchain_index` indexes the frame source's
/// swapchains and the image rect always covers the whole swapchain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionView {
    pub pose: Pose,
    pub fov: Fov,
    pub swapchain_index: usize,
    pub extent: Extent2D,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectionLayer {
    pub flags: CompositionLayerFlags,
    pub views: Vec<ProjectionView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const BOTH: [Hand; 2] = [Hand::Left, Hand::Right];

    pub fn subaction_path(self) -> &'static str {
        match self {
            Hand::Left => "/user/hand/left",
            Hand::Right => "/user/hand/right",
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Hand::Left => "left",
            Hand::Right => "right",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActionState<T> {
    pub current: T,
    pub is_active: bool,
}

/// Haptic pulse. `None` duration means the runtime's minimum pulse and `None`
/// frequency lets the runtime choose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vibration {
    pub amplitude: f32,
    pub duration_nanos: Option<i64>,
    pub frequency_hz: Option<f32>,
}
