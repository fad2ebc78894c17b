use crate::api::{ControllerTracker, ExternalFeedTracker};
use crate::tracker::{FilterAxis, MCTracker};
use crate::{MCConfig, MCConfigKey, MCError, MCExternalFeedCreator, MCFeedback, MCFeedbackEvent};
use crate::{MCPose, MCPoseSource, MCResult, MCTime};

#[cfg(feature = "mock")]
use crate::api::{MockFeedCreator, MockFeedRemote};

// Single entry point owning the active tracker
pub struct MCTrackerManager {
    tracker: Option<Box<dyn MCTracker>>,
    feed_creator: Box<dyn MCExternalFeedCreator>,
    enabled: bool,
}

impl MCTrackerManager {
    pub fn new(feed_creator: Box<dyn MCExternalFeedCreator>) -> MCTrackerManager {
        MCTrackerManager {
            tracker: None,
            feed_creator,
            enabled: true,
        }
    }

    // Manager whose external trackers read a mock feed
    // Useful for tests
    #[cfg(feature = "mock")]
    pub fn new_with_mock_feed() -> (MCTrackerManager, MockFeedRemote) {
        let (creator, remote) = MockFeedCreator::new_with_remote();
        (MCTrackerManager::new(creator), remote)
    }

    /// Installs the tracker named by `tracker.type`.
    ///
    /// On an unknown type, or a tracker failing `init`, the active tracker is
    /// kept. Without an active tracker the controller tracker is installed,
    /// so the manager never ends up without one. The returned error reports
    /// why the requested tracker was not installed.
    ///
    /// `startup.enabled` is read here as well; an unreadable value keeps
    /// compensation enabled.
    pub fn select_tracker(&mut self, config: &dyn MCConfig) -> MCResult<()> {
        self.enabled = match config.get_bool(MCConfigKey::Enabled) {
            Ok(enabled) => enabled,
            Err(e) => {
                warn!("unable to read enabled flag, compensation stays on: {}", e);
                true
            }
        };
        if !self.enabled {
            info!("motion compensation disabled");
        }

        let mut tracker = match self.create_tracker(config) {
            Ok(tracker) => tracker,
            Err(e) => {
                error!("unable to create tracker: {}", e);
                if self.tracker.is_none() {
                    warn!("defaulting to controller tracker");
                    let mut fallback: Box<dyn MCTracker> = Box::new(ControllerTracker::new());
                    if let Err(init_error) = fallback.init(config) {
                        error!("controller tracker init failed: {}", init_error);
                    }
                    self.tracker = Some(fallback);
                }
                return Err(e);
            }
        };

        match tracker.init(config) {
            Ok(()) => {
                info!("{} tracker selected", tracker.name());
                self.tracker = Some(tracker);
                Ok(())
            }
            Err(e) => {
                error!("{} tracker init failed: {}", tracker.name(), e);
                if self.tracker.is_none() {
                    self.tracker = Some(tracker);
                }
                Err(e)
            }
        }
    }

    fn create_tracker(&self, config: &dyn MCConfig) -> MCResult<Box<dyn MCTracker>> {
        let kind = config.get_string(MCConfigKey::TrackerType)?;
        match kind.trim() {
            "controller" => Ok(Box::new(ControllerTracker::new())),
            "yaw" | "external" => Ok(Box::new(ExternalFeedTracker::new(self.feed_creator.new_feed()))),
            other => Err(MCError::Configuration(format!("unknown tracker type: {}", other))),
        }
    }

    pub fn tracker(&self) -> Option<&dyn MCTracker> {
        match self.tracker {
            Some(ref tracker) => Some(&**tracker),
            None => None,
        }
    }

    pub fn tracker_mut(&mut self) -> Option<&mut dyn MCTracker> {
        match self.tracker {
            Some(ref mut tracker) => Some(&mut **tracker),
            None => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn active_tracker(&mut self) -> MCResult<&mut Box<dyn MCTracker>> {
        self.tracker
            .as_mut()
            .ok_or_else(|| MCError::Configuration("no tracker selected".to_owned()))
    }

    /// Completes the deferred setup of the tracker, then computes the delta.
    /// While compensation is disabled the delta is the identity and the
    /// tracker is not queried.
    pub fn get_pose_delta(&mut self, source: &mut dyn MCPoseSource, time: MCTime) -> MCResult<MCPose> {
        if !self.enabled {
            return Ok(MCPose::identity());
        }
        let tracker = self.active_tracker()?;
        if let Err(e) = tracker.lazy_init(source, time) {
            debug!("{} tracker: lazy init failed: {}", tracker.name(), e);
            return Err(e);
        }
        tracker.get_pose_delta(source, time)
    }

    pub fn request_recalibration(&mut self) -> MCResult<()> {
        self.active_tracker()?.request_recalibration();
        Ok(())
    }

    pub fn modify_filter_strength(
        &mut self,
        axis: FilterAxis,
        increase: bool,
        config: &mut dyn MCConfig,
        feedback: &mut dyn MCFeedback,
    ) -> MCResult<f32> {
        match self.tracker {
            Some(ref mut tracker) => tracker.modify_filter_strength(axis, increase, config, feedback),
            None => {
                feedback.execute(MCFeedbackEvent::Error);
                Err(MCError::Configuration("no tracker selected".to_owned()))
            }
        }
    }

    pub fn reload_filters(&mut self, config: &dyn MCConfig) -> MCResult<()> {
        self.active_tracker()?.reload_filters(config)
    }

    /// Writes the strengths currently applied by the tracker filters to
    /// `config` and acknowledges the result.
    pub fn save_config(&self, config: &mut dyn MCConfig, feedback: &mut dyn MCFeedback) -> MCResult<()> {
        let strengths = self.tracker().and_then(|tracker| {
            let base = tracker.base();
            match (
                base.filter_strength(FilterAxis::Translation),
                base.filter_strength(FilterAxis::Rotation),
            ) {
                (Some(trans), Some(rot)) => Some((trans, rot)),
                _ => None,
            }
        });
        match strengths {
            Some((trans, rot)) => {
                config.set_float(FilterAxis::Translation.strength_key(), trans);
                config.set_float(FilterAxis::Rotation.strength_key(), rot);
                info!("configuration saved: translation strength {}, rotation strength {}", trans, rot);
                feedback.execute(MCFeedbackEvent::Save);
                Ok(())
            }
            None => {
                error!("unable to save configuration: no configured tracker");
                feedback.execute(MCFeedbackEvent::Error);
                Err(MCError::Configuration("no configured tracker".to_owned()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockFeedCreator, MockPoseSource};
    use crate::tracker::TrackerStatus;
    use crate::{MCMemoryConfig, MCVector};

    fn manager() -> MCTrackerManager {
        MCTrackerManager::new(MockFeedCreator::new())
    }

    #[test]
    fn selects_configured_tracker() {
        let mut manager = manager();
        let mut config = MCMemoryConfig::with_defaults();
        assert!(manager.select_tracker(&config).is_ok());
        assert_eq!(manager.tracker().map(|t| t.name()), Some("controller"));

        config.set_value(MCConfigKey::TrackerType, "yaw");
        assert!(manager.select_tracker(&config).is_ok());
        assert_eq!(manager.tracker().map(|t| t.name()), Some("external"));
    }

    #[test]
    fn unknown_type_keeps_active_tracker() {
        let mut manager = manager();
        let mut config = MCMemoryConfig::with_defaults();
        config.set_value(MCConfigKey::TrackerType, "external");
        manager.select_tracker(&config).unwrap();

        config.set_value(MCConfigKey::TrackerType, "vive");
        assert!(manager.select_tracker(&config).is_err());
        assert_eq!(manager.tracker().map(|t| t.name()), Some("external"));
    }

    #[test]
    fn unknown_type_without_tracker_defaults_to_controller() {
        let mut manager = manager();
        let mut config = MCMemoryConfig::with_defaults();
        config.set_value(MCConfigKey::TrackerType, "vive");
        assert!(manager.select_tracker(&config).is_err());
        assert_eq!(manager.tracker().map(|t| t.name()), Some("controller"));

        let mut missing = MCMemoryConfig::with_defaults();
        missing.remove(MCConfigKey::TrackerType);
        let mut manager = self::manager();
        assert!(manager.select_tracker(&missing).is_err());
        assert_eq!(manager.tracker().map(|t| t.name()), Some("controller"));
    }

    #[test]
    fn failing_init_keeps_previous_tracker() {
        let mut manager = manager();
        let mut config = MCMemoryConfig::with_defaults();
        manager.select_tracker(&config).unwrap();

        config.set_value(MCConfigKey::TrackerType, "external");
        config.set_value(MCConfigKey::RotOrder, "4");
        match manager.select_tracker(&config) {
            Err(MCError::Configuration(_)) => {}
            other => panic!("unexpected result {:?}", other),
        }
        assert_eq!(manager.tracker().map(|t| t.name()), Some("controller"));
    }

    #[test]
    fn delta_requires_selected_tracker() {
        let mut manager = manager();
        let mut source = MockPoseSource::with_action_pose(MCPose::identity());
        assert!(manager.get_pose_delta(&mut source, 0).is_err());
        assert!(manager.request_recalibration().is_err());
    }

    #[test]
    fn controller_delta_through_manager() {
        let mut manager = manager();
        manager.select_tracker(&MCMemoryConfig::with_defaults()).unwrap();
        let mut source = MockPoseSource::with_action_pose(MCPose::from_translation(MCVector::new(0.0, 1.0, 0.0)));
        let delta = manager.get_pose_delta(&mut source, 10).unwrap();
        assert!(delta.is_identity(1e-6));
        assert_eq!(manager.tracker().map(|t| t.status()), Some(TrackerStatus::Tracking));
    }

    #[test]
    fn failed_init_blocks_delta_until_reload() {
        let mut manager = manager();
        let mut config = MCMemoryConfig::with_defaults();
        config.set_value(MCConfigKey::TransOrder, "7");
        assert!(manager.select_tracker(&config).is_err());
        assert_eq!(manager.tracker().map(|t| t.name()), Some("controller"));

        let mut source = MockPoseSource::with_action_pose(MCPose::identity());
        match manager.get_pose_delta(&mut source, 0) {
            Err(MCError::Configuration(_)) => {}
            other => panic!("unexpected result {:?}", other),
        }

        config.set_value(MCConfigKey::TransOrder, "1");
        manager.reload_filters(&config).unwrap();
        assert!(manager.get_pose_delta(&mut source, 1).unwrap().is_identity(1e-6));
    }

    #[test]
    fn disabled_manager_returns_identity() {
        let mut manager = manager();
        let mut config = MCMemoryConfig::with_defaults();
        config.set_bool(MCConfigKey::Enabled, false);
        manager.select_tracker(&config).unwrap();
        assert!(!manager.is_enabled());

        let mut source = MockPoseSource::with_action_pose(MCPose::from_translation(MCVector::new(0.0, 1.0, 0.0)));
        assert_eq!(manager.get_pose_delta(&mut source, 0), Ok(MCPose::identity()));
        assert_eq!(source.action_queries(), 0);
        assert_eq!(manager.tracker().map(|t| t.status()), Some(TrackerStatus::Calibrating));

        manager.set_enabled(true);
        manager.get_pose_delta(&mut source, 1).unwrap();
        assert!(source.action_queries() > 0);
        assert!(manager.tracker().map_or(false, |t| t.is_calibrated()));
    }

    #[test]
    fn unreadable_enabled_flag_keeps_compensation_on() {
        let mut manager = manager();
        let mut config = MCMemoryConfig::with_defaults();
        config.set_value(MCConfigKey::Enabled, "maybe");
        manager.select_tracker(&config).unwrap();
        assert!(manager.is_enabled());
    }

    #[test]
    fn save_config_reports_result() {
        let mut manager = manager();
        let mut config = MCMemoryConfig::with_defaults();
        let mut events = Vec::new();
        assert!(manager.save_config(&mut config, &mut events).is_err());

        manager.select_tracker(&config).unwrap();
        manager
            .modify_filter_strength(FilterAxis::Rotation, true, &mut config, &mut events)
            .unwrap();
        config.set_value(MCConfigKey::RotStrength, "0.1");
        manager.save_config(&mut config, &mut events).unwrap();
        let saved = config.get_float(MCConfigKey::RotStrength).unwrap();
        assert!((saved - 0.53).abs() < 1e-6);
        assert_eq!(
            events,
            vec![MCFeedbackEvent::Error, MCFeedbackEvent::StrengthChanged, MCFeedbackEvent::Save]
        );
    }
}
