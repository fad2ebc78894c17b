use crate::tracker::{MCTracker, TrackerBase};
use crate::{MCConfig, MCConfigKey, MCError, MCExternalFeed, MCPose, MCPoseSource, MCResult};
use crate::{MCSpace, MCTime, MCVector};

/// Tracker driven by an out-of-process platform feed, e.g. a motion rig.
///
/// The feed pose is moved by a constant mounting offset and anchored to the
/// reference pose captured at calibration, so the tracker reports the
/// reference pose at calibration time and follows the feed afterwards.
pub struct ExternalFeedTracker {
    base: TrackerBase,
    feed: Box<dyn MCExternalFeed>,
    offset: MCPose,
    anchor: MCPose,
}

impl ExternalFeedTracker {
    pub fn new(feed: Box<dyn MCExternalFeed>) -> ExternalFeedTracker {
        ExternalFeedTracker {
            base: TrackerBase::new(),
            feed,
            offset: MCPose::identity(),
            anchor: MCPose::identity(),
        }
    }

    pub fn offset(&self) -> MCPose {
        self.offset
    }

    fn read_offset(config: &dyn MCConfig, key: MCConfigKey) -> f32 {
        match config.get_float(key) {
            Ok(value) => value,
            Err(e) => {
                error!("unable to read tracker offset {}: {}", key, e);
                0.0
            }
        }
    }
}

/// Converts the configured forward/down/right distances (cm) into a pose
/// offset in metres.
pub fn offset_pose(forward: f32, down: f32, right: f32) -> MCPose {
    MCPose::from_translation(MCVector::new(right / 100.0, -down / 100.0, -forward / 100.0))
}

impl MCTracker for ExternalFeedTracker {
    fn name(&self) -> &'static str {
        "external"
    }

    fn base(&self) -> &TrackerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TrackerBase {
        &mut self.base
    }

    fn init(&mut self, config: &dyn MCConfig) -> MCResult<()> {
        let forward = Self::read_offset(config, MCConfigKey::TrackerOffsetForward);
        let down = Self::read_offset(config, MCConfigKey::TrackerOffsetDown);
        let right = Self::read_offset(config, MCConfigKey::TrackerOffsetRight);
        self.offset = offset_pose(forward, down, right);
        debug!("external tracker offset: {:?}", self.offset.position);
        self.base.load_filters(config)
    }

    fn deferred_init(&mut self, _source: &mut dyn MCPoseSource, _time: MCTime) -> MCResult<()> {
        if self.feed.is_open() {
            return Ok(());
        }
        self.feed.open()
    }

    fn capture_reference_pose(&mut self, source: &mut dyn MCPoseSource, time: MCTime) -> MCResult<MCPose> {
        if !self.feed.is_open() {
            return Err(MCError::FeedUnavailable("feed not open".to_owned()));
        }
        let view = source.resolve_space_pose(MCSpace::View, MCSpace::Reference, time)?;
        let mut reference = self.offset.then(&view);

        // orientation is borrowed from the controller during calibration only
        match source.resolve_action_pose(time) {
            Ok(controller) => reference.orientation = controller.orientation,
            Err(e) => warn!("controller orientation unavailable, using view orientation: {}", e),
        }

        let feed = self.feed.read_pose(time)?;
        self.anchor = self.offset.then(&feed).inverse().then(&reference);
        Ok(reference)
    }

    fn get_pose(&mut self, _source: &mut dyn MCPoseSource, time: MCTime) -> MCResult<MCPose> {
        let feed = self.feed.read_pose(time)?;
        Ok(self.offset.then(&feed).then(&self.anchor))
    }
}
