use crate::{MCPose, MCResult, MCTime};

/// Spaces the host can locate against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub enum MCSpace {
    // Headset view space
    View,
    // Application reference space the view is reported in
    Reference,
    // Space of the action-bound tracker pose
    Tracker,
}

/// Spatial-tracking query surface of the host.
/// Both calls must return promptly; they run on the frame thread.
pub trait MCPoseSource {
    /// Resolves the action-bound tracker pose in the reference space at `time`.
    /// An inactive binding or an invalid location is a `SourceUnavailable` error.
    fn resolve_action_pose(&mut self, time: MCTime) -> MCResult<MCPose>;

    /// Locates `space` relative to `base` at `time`.
    fn resolve_space_pose(&mut self, space: MCSpace, base: MCSpace, time: MCTime) -> MCResult<MCPose>;
}
