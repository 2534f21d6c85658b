//! Conversions between `openxr` values and the core domain types.

use glam::{Quat, Vec3};
use openxr as xr;
use xr::sys::Handle as _;

use zen_xr::{
    EnvironmentBlendMode, Fov, FrameState, Pose, ReferenceSpaceType, RuntimeEvent, SessionHandle,
    SessionState, Time, View, ViewConfigView, ViewConfigurationType, ViewStateFlags,
};

pub fn to_pose(pose: xr::Posef) -> Pose {
    Pose {
        orientation: Quat::from_xyzw(
            pose.orientation.x,
            pose.orientation.y,
            pose.orientation.z,
            pose.orientation.w,
        ),
        position: Vec3::new(pose.position.x, pose.position.y, pose.position.z),
    }
}

pub fn to_xr_pose(pose: Pose) -> xr::Posef {
    xr::Posef {
        orientation: xr::Quaternionf {
            x: pose.orientation.x,
            y: pose.orientation.y,
            z: pose.orientation.z,
            w: pose.orientation.w,
        },
        position: xr::Vector3f {
            x: pose.position.x,
            y: pose.position.y,
            z: pose.position.z,
        },
    }
}

pub fn to_fov(fov: xr::Fovf) -> Fov {
    Fov {
        angle_left: fov.angle_left,
        angle_right: fov.angle_right,
        angle_up: fov.angle_up,
        angle_down: fov.angle_down,
    }
}

pub fn to_xr_fov(fov: Fov) -> xr::Fovf {
    xr::Fovf {
        angle_left: fov.angle_left,
        angle_right: fov.angle_right,
        angle_up: fov.angle_up,
        angle_down: fov.angle_down,
    }
}

pub fn to_view(view: &xr::View) -> View {
    View {
        pose: to_pose(view.pose),
        fov: to_fov(view.fov),
    }
}

pub fn to_view_state(flags: xr::ViewStateFlags) -> ViewStateFlags {
    let mut state = ViewStateFlags::empty();
    if flags.contains(xr::ViewStateFlags::ORIENTATION_VALID) {
        state |= ViewStateFlags::ORIENTATION_VALID;
    }
    if flags.contains(xr::ViewStateFlags::POSITION_VALID) {
        state |= ViewStateFlags::POSITION_VALID;
    }
    if flags.contains(xr::ViewStateFlags::ORIENTATION_TRACKED) {
        state |= ViewStateFlags::ORIENTATION_TRACKED;
    }
    if flags.contains(xr::ViewStateFlags::POSITION_TRACKED) {
        state |= ViewStateFlags::POSITION_TRACKED;
    }
    state
}

pub fn to_view_config_view(view: &xr::ViewConfigurationView) -> ViewConfigView {
    ViewConfigView {
        recommended_width: view.recommended_image_rect_width,
        max_width: view.max_image_rect_width,
        recommended_height: view.recommended_image_rect_height,
        max_height: view.max_image_rect_height,
        recommended_sample_count: view.recommended_swapchain_sample_count,
        max_sample_count: view.max_swapchain_sample_count,
    }
}

pub fn to_frame_state(state: xr::FrameState) -> FrameState {
    FrameState {
        predicted_display_time: to_time(state.predicted_display_time),
        should_render: state.should_render,
    }
}

pub fn to_time(time: xr::Time) -> Time {
    Time::from_nanos(time.as_nanos())
}

pub fn to_xr_time(time: Time) -> xr::Time {
    xr::Time::from_nanos(time.as_nanos())
}

pub fn to_view_configuration_type(ty: xr::ViewConfigurationType) -> ViewConfigurationType {
    ViewConfigurationType::from_raw(ty.into_raw())
}

pub fn to_xr_view_configuration_type(ty: ViewConfigurationType) -> xr::ViewConfigurationType {
    xr::ViewConfigurationType::from_raw(ty.into_raw())
}

pub fn to_blend_mode(mode: xr::EnvironmentBlendMode) -> EnvironmentBlendMode {
    EnvironmentBlendMode::from_raw(mode.into_raw())
}

pub fn to_xr_blend_mode(mode: EnvironmentBlendMode) -> xr::EnvironmentBlendMode {
    xr::EnvironmentBlendMode::from_raw(mode.into_raw())
}

pub fn to_xr_reference_space(space: ReferenceSpaceType) -> xr::ReferenceSpaceType {
    xr::ReferenceSpaceType::from_raw(space.into_raw())
}

pub fn session_handle<G: xr::Graphics>(session: &xr::Session<G>) -> SessionHandle {
    SessionHandle::from_raw(session.as_raw().into_raw())
}

/// Reduce an event borrowed from the event buffer to an owned value.
pub fn to_runtime_event(event: xr::Event<'_>) -> RuntimeEvent {
    match event {
        xr::Event::InstanceLossPending(e) => RuntimeEvent::InstanceLossPending {
            loss_time: to_time(e.loss_time()),
        },
        xr::Event::SessionStateChanged(e) => {
            let raw = e.session().into_raw();
            RuntimeEvent::SessionStateChanged {
                session: (raw != 0).then(|| SessionHandle::from_raw(raw)),
                state: SessionState::from_raw(e.state().into_raw()),
                time: to_time(e.time()),
            }
        }
        xr::Event::EventsLost(_) => RuntimeEvent::Other {
            kind: "EVENTS_LOST",
        },
        xr::Event::ReferenceSpaceChangePending(_) => RuntimeEvent::Other {
            kind: "REFERENCE_SPACE_CHANGE_PENDING",
        },
        xr::Event::InteractionProfileChanged(_) => RuntimeEvent::Other {
            kind: "INTERACTION_PROFILE_CHANGED",
        },
        _ => RuntimeEvent::Other { kind: "UNRECOGNIZED" },
    }
}
