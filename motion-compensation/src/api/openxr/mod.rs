use crate::{MCConfig, MCError, MCPose, MCPoseSource, MCResult, MCSpace, MCTime};
use ::openxr::{Action, ActionSet, ActiveActionSet, Binding, Graphics, Instance, Path, Posef, Session, Space};
use ::openxr::{SpaceLocationFlags, Time};

const INTERACTION_PROFILE: &str = "/interaction_profiles/khr/simple_controller";

/// Binding of the controller grip pose for `side` ("left" or "right").
fn pose_binding_path(side: &str) -> String {
    format!("/user/hand/{}/input/grip/pose", side)
}

// OpenXR pose source, locating action and reference spaces of a running session
pub struct OpenXrPoseSource<G: Graphics> {
    session: Session<G>,
    action_set: ActionSet,
    pose_action: Action<Posef>,
    tracker_space: Space,
    reference_space: Space,
    view_space: Space,
}

impl<G: Graphics> OpenXrPoseSource<G> {
    /// Binds the grip pose of the controller on the configured side and
    /// attaches the action set to `session`.
    pub fn new(
        instance: &Instance,
        session: Session<G>,
        config: &dyn MCConfig,
        reference_space: Space,
        view_space: Space,
    ) -> MCResult<OpenXrPoseSource<G>> {
        let action_set = instance
            .create_action_set("motion_compensation", "Motion Compensation", 0)
            .map_err(|e| xr_error("xrCreateActionSet", e))?;
        let pose_action = action_set
            .create_action::<Posef>("tracker_pose", "Tracker Pose", &[])
            .map_err(|e| xr_error("xrCreateAction", e))?;

        let side = config.controller_side();
        let binding = pose_binding_path(&side);
        debug!("binding tracker pose to {}", binding);
        let profile = instance
            .string_to_path(INTERACTION_PROFILE)
            .map_err(|e| xr_error("xrStringToPath", e))?;
        let binding_path = instance
            .string_to_path(&binding)
            .map_err(|e| xr_error("xrStringToPath", e))?;
        instance
            .suggest_interaction_profile_bindings(profile, &[Binding::new(&pose_action, binding_path)])
            .map_err(|e| xr_error("xrSuggestInteractionProfileBindings", e))?;
        session
            .attach_action_sets(&[&action_set])
            .map_err(|e| xr_error("xrAttachSessionActionSets", e))?;

        let tracker_space = pose_action
            .create_space(session.clone(), Path::NULL, Posef::IDENTITY)
            .map_err(|e| xr_error("xrCreateActionSpace", e))?;
        Ok(OpenXrPoseSource {
            session,
            action_set,
            pose_action,
            tracker_space,
            reference_space,
            view_space,
        })
    }

    fn space(&self, space: MCSpace) -> &Space {
        match space {
            MCSpace::View => &self.view_space,
            MCSpace::Reference => &self.reference_space,
            MCSpace::Tracker => &self.tracker_space,
        }
    }

    fn locate(&self, space: MCSpace, base: MCSpace, time: MCTime) -> MCResult<MCPose> {
        let location = self
            .space(space)
            .locate(self.space(base), Time::from_nanos(time))
            .map_err(|e| MCError::SourceUnavailable(format!("xrLocateSpace failed: {:?}", e)))?;
        let valid = SpaceLocationFlags::POSITION_VALID | SpaceLocationFlags::ORIENTATION_VALID;
        if !location.location_flags.contains(valid) {
            return Err(MCError::SourceUnavailable(format!(
                "{:?} pose invalid in {:?}: {:?}",
                space, base, location.location_flags
            )));
        }
        Ok(pose_from_xr(&location.pose))
    }
}

impl<G: Graphics> MCPoseSource for OpenXrPoseSource<G> {
    fn resolve_action_pose(&mut self, time: MCTime) -> MCResult<MCPose> {
        self.session
            .sync_actions(&[ActiveActionSet::new(&self.action_set)])
            .map_err(|e| MCError::SourceUnavailable(format!("xrSyncActions failed: {:?}", e)))?;
        let active = self
            .pose_action
            .is_active(&self.session, Path::NULL)
            .map_err(|e| MCError::SourceUnavailable(format!("xrGetActionStatePose failed: {:?}", e)))?;
        if !active {
            return Err(MCError::SourceUnavailable("tracker pose action inactive".to_owned()));
        }
        self.locate(MCSpace::Tracker, MCSpace::Reference, time)
    }

    fn resolve_space_pose(&mut self, space: MCSpace, base: MCSpace, time: MCTime) -> MCResult<MCPose> {
        self.locate(space, base, time)
    }
}

fn xr_error(call: &str, result: ::openxr::sys::Result) -> MCError {
    MCError::SourceUnavailable(format!("{} failed: {:?}", call, result))
}

fn pose_from_xr(pose: &Posef) -> MCPose {
    MCPose::from_arrays(
        [pose.position.x, pose.position.y, pose.position.z],
        [pose.orientation.x, pose.orientation.y, pose.orientation.z, pose.orientation.w],
    )
}
