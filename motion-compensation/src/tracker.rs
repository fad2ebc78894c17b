use crate::filter::{rotation_filter, translation_filter};
use crate::{strength_step, MCConfig, MCConfigKey, MCError, MCFeedback, MCFeedbackEvent, MCFilter};
use crate::{MCPose, MCPoseSource, MCResult, MCRotation, MCTime, MCVector};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerStatus {
    Uninitialized,
    Calibrating,
    Tracking,
    // Source failed on the last query
    Degraded,
}

/// Filter selected by a strength adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAxis {
    Translation,
    Rotation,
}

impl FilterAxis {
    pub fn strength_key(&self) -> MCConfigKey {
        match *self {
            FilterAxis::Translation => MCConfigKey::TransStrength,
            FilterAxis::Rotation => MCConfigKey::RotStrength,
        }
    }
}

impl fmt::Display for FilterAxis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FilterAxis::Translation => write!(f, "translation"),
            FilterAxis::Rotation => write!(f, "rotation"),
        }
    }
}

/// State shared by every tracker variant: reference pose, filters and the
/// delta memoised for the last query time.
pub struct TrackerBase {
    reference: Option<MCPose>,
    calibrated: bool,
    reset_pending: bool,
    skip_lazy_init: bool,
    status: TrackerStatus,
    last_time: Option<MCTime>,
    last_delta: MCPose,
    last_pose: Option<MCPose>,
    trans_filter: Option<Box<dyn MCFilter<MCVector>>>,
    rot_filter: Option<Box<dyn MCFilter<MCRotation>>>,
}

impl Default for TrackerBase {
    fn default() -> TrackerBase {
        TrackerBase::new()
    }
}

impl TrackerBase {
    pub fn new() -> TrackerBase {
        TrackerBase {
            reference: None,
            calibrated: false,
            reset_pending: true,
            skip_lazy_init: false,
            status: TrackerStatus::Uninitialized,
            last_time: None,
            last_delta: MCPose::identity(),
            last_pose: None,
            trans_filter: None,
            rot_filter: None,
        }
    }

    /// Builds both filters from `config`. Nothing is replaced unless both
    /// filters could be built; the previous ones stay in use on failure.
    pub fn load_filters(&mut self, config: &dyn MCConfig) -> MCResult<()> {
        let trans_order = config.get_int(MCConfigKey::TransOrder)?;
        let trans_strength = config.get_float(MCConfigKey::TransStrength)?;
        let rot_order = config.get_int(MCConfigKey::RotOrder)?;
        let rot_strength = config.get_float(MCConfigKey::RotStrength)?;

        let mut trans = translation_filter(order_from(trans_order), trans_strength)?;
        let mut rot = rotation_filter(order_from(rot_order), rot_strength)?;

        if let Some(seed) = self.last_pose.or(self.reference) {
            trans.reset(seed.position);
            rot.reset(seed.orientation);
        }
        debug!(
            "filters loaded: translation order {} strength {}, rotation order {} strength {}",
            trans.order(),
            trans.strength(),
            rot.order(),
            rot.strength()
        );
        self.trans_filter = Some(trans);
        self.rot_filter = Some(rot);
        self.last_time = None;
        if self.status == TrackerStatus::Uninitialized {
            self.status = TrackerStatus::Calibrating;
        }
        Ok(())
    }

    pub fn set_reference_pose(&mut self, pose: MCPose) {
        let pose = pose.normalized();
        if let Some(ref mut filter) = self.trans_filter {
            filter.reset(pose.position);
        }
        if let Some(ref mut filter) = self.rot_filter {
            filter.reset(pose.orientation);
        }
        self.reference = Some(pose);
        self.last_pose = Some(pose);
        self.calibrated = true;
        self.reset_pending = false;
        self.last_time = None;
        self.status = TrackerStatus::Tracking;
    }

    pub fn reference_pose(&self) -> Option<MCPose> {
        self.reference
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    pub fn is_reset_pending(&self) -> bool {
        self.reset_pending
    }

    pub fn status(&self) -> TrackerStatus {
        self.status
    }

    pub fn last_delta(&self) -> Option<(MCTime, MCPose)> {
        self.last_time.map(|time| (time, self.last_delta))
    }

    pub fn filter_strength(&self, axis: FilterAxis) -> Option<f32> {
        match axis {
            FilterAxis::Translation => self.trans_filter.as_ref().map(|f| f.strength()),
            FilterAxis::Rotation => self.rot_filter.as_ref().map(|f| f.strength()),
        }
    }

    fn request_reset(&mut self) {
        self.reset_pending = true;
        self.last_time = None;
        self.status = TrackerStatus::Calibrating;
    }

    fn calibration_failed(&mut self) {
        self.calibrated = false;
        if self.status == TrackerStatus::Uninitialized || self.status == TrackerStatus::Tracking {
            self.status = TrackerStatus::Calibrating;
        }
    }

    fn memoized(&self, time: MCTime) -> Option<MCPose> {
        match self.last_time {
            Some(last) if last == time => Some(self.last_delta),
            _ => None,
        }
    }

    fn source_failed(&mut self) {
        if self.status != TrackerStatus::Degraded {
            warn!("pose source failed, tracker degraded");
        }
        self.status = TrackerStatus::Degraded;
    }

    // Filters `pose`, derives the delta against the reference and memoises it.
    fn apply_pose(&mut self, time: MCTime, pose: MCPose) -> MCResult<MCPose> {
        let reference = self
            .reference
            .ok_or_else(|| MCError::CalibrationFailure("no reference pose captured".to_owned()))?;

        let (trans, rot) = match (self.trans_filter.as_mut(), self.rot_filter.as_mut()) {
            (Some(trans), Some(rot)) => (trans, rot),
            _ => return Err(unconfigured()),
        };
        let filtered = MCPose::new(trans.filter(pose.position), rot.filter(pose.orientation)).normalized();
        let delta = filtered.inverse().then(&reference);

        if self.status == TrackerStatus::Degraded {
            info!("pose source recovered");
        }
        self.status = if self.reset_pending {
            TrackerStatus::Calibrating
        } else {
            TrackerStatus::Tracking
        };
        self.last_pose = Some(pose);
        self.last_time = Some(time);
        self.last_delta = delta;
        Ok(delta)
    }

    fn is_configured(&self) -> bool {
        self.trans_filter.is_some() && self.rot_filter.is_some()
    }

    fn adjust_strength(&mut self, axis: FilterAxis, increase: bool) -> MCResult<(f32, bool)> {
        let result = match axis {
            FilterAxis::Translation => self.trans_filter.as_mut().map(|f| step_filter(&mut **f, increase)),
            FilterAxis::Rotation => self.rot_filter.as_mut().map(|f| step_filter(&mut **f, increase)),
        };
        result.ok_or_else(|| MCError::Configuration(format!("{} filter not configured", axis)))
    }
}

// Returns the applied strength and whether it differs from the previous one.
fn step_filter<T, F: MCFilter<T> + ?Sized>(filter: &mut F, increase: bool) -> (f32, bool) {
    let previous = filter.strength();
    let applied = filter.set_strength(strength_step(previous, increase));
    (applied, applied != previous)
}

fn unconfigured() -> MCError {
    MCError::Configuration("filters not configured".to_owned())
}

fn order_from(value: i32) -> usize {
    if value < 0 {
        0
    } else {
        value as usize
    }
}

/// Capability set of a tracker variant. Variants provide the pose source
/// specific hooks, the per-frame pipeline is shared.
pub trait MCTracker {
    fn name(&self) -> &'static str;

    fn base(&self) -> &TrackerBase;

    fn base_mut(&mut self) -> &mut TrackerBase;

    /// Captures the raw pose used as the new reference.
    fn capture_reference_pose(&mut self, source: &mut dyn MCPoseSource, time: MCTime) -> MCResult<MCPose>;

    /// Raw, unfiltered pose at `time`.
    fn get_pose(&mut self, source: &mut dyn MCPoseSource, time: MCTime) -> MCResult<MCPose>;

    /// Loads the filter configuration. Called once after construction.
    fn init(&mut self, config: &dyn MCConfig) -> MCResult<()> {
        self.base_mut().load_filters(config)
    }

    /// Deferred setup depending on an external source becoming ready.
    fn deferred_init(&mut self, _source: &mut dyn MCPoseSource, _time: MCTime) -> MCResult<()> {
        Ok(())
    }

    /// Runs `deferred_init` until it succeeds once, then does nothing.
    fn lazy_init(&mut self, source: &mut dyn MCPoseSource, time: MCTime) -> MCResult<()> {
        if self.base().skip_lazy_init {
            return Ok(());
        }
        self.deferred_init(source, time)?;
        debug!("{} tracker: lazy init done", self.name());
        self.base_mut().skip_lazy_init = true;
        Ok(())
    }

    fn reset_reference_pose(&mut self, source: &mut dyn MCPoseSource, time: MCTime) -> MCResult<()> {
        match self.capture_reference_pose(source, time) {
            Ok(pose) => {
                self.base_mut().set_reference_pose(pose);
                info!("{} tracker: reference pose set at {}", self.name(), time);
                Ok(())
            }
            Err(e) => {
                self.base_mut().calibration_failed();
                error!("{} tracker: unable to capture reference pose: {}", self.name(), e);
                Err(MCError::CalibrationFailure(e.to_string()))
            }
        }
    }

    /// Compensation delta at `time`. Repeated queries for the same time
    /// return the memoised delta without touching the filters. Fails with
    /// `MCError::Configuration` until both filters have been built.
    fn get_pose_delta(&mut self, source: &mut dyn MCPoseSource, time: MCTime) -> MCResult<MCPose> {
        if let Some(delta) = self.base().memoized(time) {
            return Ok(delta);
        }
        if !self.base().is_configured() {
            return Err(unconfigured());
        }
        if self.base().reset_pending {
            if let Err(e) = self.reset_reference_pose(source, time) {
                warn!("recalibration still pending: {}", e);
            }
        }
        if self.base().reference.is_none() {
            return Err(MCError::CalibrationFailure("tracker was never calibrated".to_owned()));
        }
        let pose = match self.get_pose(source, time) {
            Ok(pose) => pose,
            Err(e) => {
                self.base_mut().source_failed();
                return Err(match e {
                    MCError::SourceUnavailable(_) | MCError::FeedUnavailable(_) => e,
                    other => MCError::SourceUnavailable(other.to_string()),
                });
            }
        };
        self.base_mut().apply_pose(time, pose)
    }

    fn request_recalibration(&mut self) {
        info!("{} tracker: recalibration requested", self.name());
        self.base_mut().request_reset();
    }

    /// Steps the strength of one filter, persists the applied value and
    /// acknowledges through `feedback`. Returns the applied strength.
    fn modify_filter_strength(
        &mut self,
        axis: FilterAxis,
        increase: bool,
        config: &mut dyn MCConfig,
        feedback: &mut dyn MCFeedback,
    ) -> MCResult<f32> {
        let (applied, changed) = match self.base_mut().adjust_strength(axis, increase) {
            Ok(result) => result,
            Err(e) => {
                feedback.execute(MCFeedbackEvent::Error);
                return Err(e);
            }
        };
        config.set_float(axis.strength_key(), applied);
        if changed {
            info!("{} filter strength set to {}", axis, applied);
            feedback.execute(MCFeedbackEvent::StrengthChanged);
        } else {
            warn!("{} filter strength at limit: {}", axis, applied);
            feedback.execute(MCFeedbackEvent::StrengthAtLimit);
        }
        Ok(applied)
    }

    /// Rebuilds the filters from `config`, keeping the current ones on failure.
    fn reload_filters(&mut self, config: &dyn MCConfig) -> MCResult<()> {
        let result = self.base_mut().load_filters(config);
        if let Err(ref e) = result {
            error!("{} tracker: filter reload failed, keeping current filters: {}", self.name(), e);
        }
        result
    }

    fn status(&self) -> TrackerStatus {
        self.base().status()
    }

    fn is_calibrated(&self) -> bool {
        self.base().is_calibrated()
    }
}
