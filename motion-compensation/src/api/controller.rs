use crate::tracker::{MCTracker, TrackerBase};
use crate::{MCPose, MCPoseSource, MCResult, MCTime};

/// Tracker following the action-bound controller pose.
pub struct ControllerTracker {
    base: TrackerBase,
}

impl ControllerTracker {
    pub fn new() -> ControllerTracker {
        ControllerTracker {
            base: TrackerBase::new(),
        }
    }
}

impl Default for ControllerTracker {
    fn default() -> ControllerTracker {
        ControllerTracker::new()
    }
}

impl MCTracker for ControllerTracker {
    fn name(&self) -> &'static str {
        "controller"
    }

    fn base(&self) -> &TrackerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TrackerBase {
        &mut self.base
    }

    fn capture_reference_pose(&mut self, source: &mut dyn MCPoseSource, time: MCTime) -> MCResult<MCPose> {
        source.resolve_action_pose(time)
    }

    // An inactive binding fails the query, no pose is substituted.
    fn get_pose(&mut self, source: &mut dyn MCPoseSource, time: MCTime) -> MCResult<MCPose> {
        source.resolve_action_pose(time)
    }
}
