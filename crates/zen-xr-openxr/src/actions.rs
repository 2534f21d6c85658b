use openxr as xr;

use zen_xr::{xr_check, ActionBackend, ActionState, Hand, Vibration, XrResult};

const ACTION_SET: &str = "zen";
const TOUCH_PROFILE: &str = "/interaction_profiles/oculus/touch_controller";

/// Grab and haptic actions on both hands, bound to Touch controllers.
pub struct OpenXrActions {
    session: xr::Session<xr::OpenGlEs>,
    action_set: xr::ActionSet,
    grab: xr::Action<f32>,
    vibrate: xr::Action<xr::Haptic>,
    hands: [xr::Path; 2],
}

impl OpenXrActions {
    pub fn new(instance: &xr::Instance, session: &xr::Session<xr::OpenGlEs>) -> XrResult<Self> {
        let action_set = xr_check!(instance.create_action_set(ACTION_SET, ACTION_SET, 0))?;
        let hands = [
            xr_check!(instance.string_to_path(Hand::Left.subaction_path()))?,
            xr_check!(instance.string_to_path(Hand::Right.subaction_path()))?,
        ];

        let grab = xr_check!(action_set.create_action::<f32>("grab", "Grab", &hands))?;
        let vibrate =
            xr_check!(action_set.create_action::<xr::Haptic>("vibrate_hand", "Vibrate Hand", &hands))?;

        let path = |p: &str| xr_check!(instance.string_to_path(p));
        let bindings = [
            xr::Binding::new(&grab, path("/user/hand/left/input/squeeze/value")?),
            xr::Binding::new(&grab, path("/user/hand/right/input/squeeze/value")?),
            xr::Binding::new(&vibrate, path("/user/hand/left/output/haptic")?),
            xr::Binding::new(&vibrate, path("/user/hand/right/output/haptic")?),
        ];
        xr_check!(instance.suggest_interaction_profile_bindings(path(TOUCH_PROFILE)?, &bindings))?;
        xr_check!(session.attach_action_sets(&[&action_set]))?;

        Ok(Self {
            session: session.clone(),
            action_set,
            grab,
            vibrate,
            hands,
        })
    }

    fn hand_path(&self, hand: Hand) -> xr::Path {
        match hand {
            Hand::Left => self.hands[0],
            Hand::Right => self.hands[1],
        }
    }
}

impl ActionBackend for OpenXrActions {
    fn sync(&mut self) -> XrResult<()> {
        xr_check!(self
            .session
            .sync_actions(&[xr::ActiveActionSet::new(&self.action_set)]))
    }

    fn grab_state(&mut self, hand: Hand) -> XrResult<ActionState<f32>> {
        let state = xr_check!(self.grab.state(&self.session, self.hand_path(hand)))?;
        Ok(ActionState {
            current: state.current_state,
            is_active: state.is_active,
        })
    }

    fn vibrate(&mut self, hand: Hand, vibration: Vibration) -> XrResult<()> {
        let duration = vibration
            .duration_nanos
            .map_or(xr::Duration::MIN_HAPTIC, xr::Duration::from_nanos);
        // 0 Hz lets the runtime pick its optimal frequency
        let frequency = vibration.frequency_hz.unwrap_or(0.0);
        xr_check!(self.vibrate.apply_feedback(
            &self.session,
            self.hand_path(hand),
            &xr::HapticVibration::new()
                .amplitude(vibration.amplitude)
                .duration(duration)
                .frequency(frequency),
        ))
    }
}
