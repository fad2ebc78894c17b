use crate::{MCError, MCPose, MCPoseSource, MCResult, MCSpace, MCTime};
use std::collections::HashMap;

/// Deterministic pose source for tests and demos.
/// Poses are set by the caller; a cleared action pose behaves like an
/// inactive binding.
#[derive(Debug, Default)]
pub struct MockPoseSource {
    action_pose: Option<MCPose>,
    space_poses: HashMap<(MCSpace, MCSpace), MCPose>,
    action_queries: usize,
}

impl MockPoseSource {
    pub fn new() -> MockPoseSource {
        MockPoseSource::default()
    }

    pub fn with_action_pose(pose: MCPose) -> MockPoseSource {
        let mut source = MockPoseSource::new();
        source.set_action_pose(pose);
        source
    }

    pub fn set_action_pose(&mut self, pose: MCPose) {
        self.action_pose = Some(pose);
    }

    pub fn deactivate_action(&mut self) {
        self.action_pose = None;
    }

    pub fn set_space_pose(&mut self, space: MCSpace, base: MCSpace, pose: MCPose) {
        self.space_poses.insert((space, base), pose);
    }

    /// Number of action-pose queries served so far, failed ones included.
    pub fn action_queries(&self) -> usize {
        self.action_queries
    }
}

impl MCPoseSource for MockPoseSource {
    fn resolve_action_pose(&mut self, time: MCTime) -> MCResult<MCPose> {
        self.action_queries += 1;
        self.action_pose
            .ok_or_else(|| MCError::SourceUnavailable(format!("action pose inactive at {}", time)))
    }

    fn resolve_space_pose(&mut self, space: MCSpace, base: MCSpace, time: MCTime) -> MCResult<MCPose> {
        if space == base {
            return Ok(MCPose::identity());
        }
        if let Some(pose) = self.space_poses.get(&(space, base)) {
            return Ok(*pose);
        }
        if let Some(pose) = self.space_poses.get(&(base, space)) {
            return Ok(pose.inverse());
        }
        Err(MCError::SourceUnavailable(format!(
            "unable to locate {:?} in {:?} at {}",
            space, base, time
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MCVector;

    #[test]
    fn inactive_action_fails() {
        let mut source = MockPoseSource::new();
        assert!(source.resolve_action_pose(0).is_err());
        source.set_action_pose(MCPose::identity());
        assert_eq!(source.resolve_action_pose(1), Ok(MCPose::identity()));
        assert_eq!(source.action_queries(), 2);
    }

    #[test]
    fn reverse_location_is_inverted() {
        let mut source = MockPoseSource::new();
        let view = MCPose::from_translation(MCVector::new(0.0, 1.7, 0.0));
        source.set_space_pose(MCSpace::View, MCSpace::Reference, view);
        let reverse = source.resolve_space_pose(MCSpace::Reference, MCSpace::View, 0).unwrap();
        assert!(reverse.approx_eq(&view.inverse(), 1e-6));
        assert!(source.resolve_space_pose(MCSpace::Tracker, MCSpace::View, 0).is_err());
    }
}
