use crate::{MCPose, MCResult, MCTime};

/// Out-of-process pose feed, e.g. a motion rig publishing its platform pose
/// through shared memory. The transport layout is up to the implementation.
pub trait MCExternalFeed {
    /// Opens the feed. Called every frame until it succeeds.
    fn open(&mut self) -> MCResult<()>;

    fn is_open(&self) -> bool;

    /// Best-effort, non-blocking read of the most recent platform pose.
    fn read_pose(&mut self, time: MCTime) -> MCResult<MCPose>;
}

pub trait MCExternalFeedCreator {
    fn new_feed(&self) -> Box<dyn MCExternalFeed>;
}
