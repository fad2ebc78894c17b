use crate::sample_cache::{CachedSample, SampleCache};
use crate::tracker_manager::MCTrackerManager;
use crate::{MCPose, MCPoseSource, MCTime};

/// Tolerance used to match frame submissions to located deltas, 2 ms.
pub const DEFAULT_TOLERANCE: MCTime = 2_000_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MCDelta {
    pub pose: MCPose,
    // Last good delta reused because the tracker failed for this time
    pub stale: bool,
}

/// Applies compensation deltas to the poses reported by the host and keeps
/// the deltas per display time for the frame submission path.
pub struct MCCompensator {
    deltas: SampleCache<MCPose>,
    last_good: Option<MCPose>,
}

impl Default for MCCompensator {
    fn default() -> MCCompensator {
        MCCompensator::new(DEFAULT_TOLERANCE)
    }
}

impl MCCompensator {
    pub fn new(tolerance: MCTime) -> MCCompensator {
        MCCompensator {
            deltas: SampleCache::new(tolerance, MCPose::identity()),
            last_good: None,
        }
    }

    /// Fresh delta at `time`, or the last good one (identity before the
    /// first success) when the tracker fails.
    pub fn delta_at(
        &mut self,
        manager: &mut MCTrackerManager,
        source: &mut dyn MCPoseSource,
        time: MCTime,
    ) -> MCDelta {
        match manager.get_pose_delta(source, time) {
            Ok(delta) => {
                self.deltas.add_sample(time, delta);
                self.last_good = Some(delta);
                MCDelta {
                    pose: delta,
                    stale: false,
                }
            }
            Err(e) => {
                if e.is_recoverable() {
                    debug!("delta at {} unavailable, reusing last: {}", time, e);
                } else {
                    error!("delta at {} failed, reusing last: {}", time, e);
                }
                MCDelta {
                    pose: self.last_good.unwrap_or_else(MCPose::identity),
                    stale: true,
                }
            }
        }
    }

    pub fn cached_delta(&self, time: MCTime) -> CachedSample<MCPose> {
        self.deltas.get_sample(time)
    }

    /// View space located in the reference space.
    pub fn compensate_view(reported: &MCPose, delta: &MCPose) -> MCPose {
        reported.then(delta)
    }

    /// Reference space located in the view space.
    pub fn compensate_base(reported: &MCPose, delta: &MCPose) -> MCPose {
        reported.then(&delta.inverse())
    }

    /// Compensates a located pose depending on which side is the view space.
    /// Locations between two view spaces, or none, are returned unchanged.
    pub fn compensate_location(reported: &MCPose, space_is_view: bool, base_is_view: bool, delta: &MCPose) -> MCPose {
        match (space_is_view, base_is_view) {
            (true, false) => MCCompensator::compensate_view(reported, delta),
            (false, true) => MCCompensator::compensate_base(reported, delta),
            _ => *reported,
        }
    }

    pub fn end_frame(&mut self, time: MCTime) {
        self.deltas.clean_up(time);
    }

    pub fn cached_frames(&self) -> usize {
        self.deltas.len()
    }
}
