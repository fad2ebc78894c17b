use euclid::Angle;
use motion_compensation::api::MockPoseSource;
use motion_compensation::{FilterAxis, MCCompensator, MCConfig, MCConfigKey, MCFeedbackEvent, MCMemoryConfig};
use motion_compensation::{MCPose, MCRotation, MCSpace, MCTime, MCTrackerManager, MCVector};
use motion_compensation::{MatchQuality, SampleCache, TrackerStatus};

const MS: MCTime = 1_000_000;

fn head() -> MCPose {
    MCPose::new(MCVector::new(0.0, 1.6, 0.0), MCRotation::around_x(Angle::radians(-0.1)))
}

fn rig(heave: f32, yaw: f32) -> MCPose {
    MCPose::new(MCVector::new(0.0, heave, 0.0), MCRotation::around_y(Angle::radians(yaw)))
}

#[test]
fn cache_lookup_ladder() {
    let mut cache = SampleCache::new(20 * MS, MCPose::identity());
    cache.add_sample(0, rig(0.0, 0.0));
    cache.add_sample(50 * MS, rig(0.1, 0.0));

    let earlier = cache.get_sample(10 * MS);
    assert_eq!(earlier.time, Some(0));
    let later = cache.get_sample(40 * MS);
    assert_eq!(later.time, Some(50 * MS));
    let far = cache.get_sample(1000 * MS);
    assert_eq!(far.time, Some(50 * MS));
    assert_eq!(far.quality, MatchQuality::BestEffort);
}

#[test]
fn external_rig_motion_is_compensated() {
    let (mut manager, remote) = MCTrackerManager::new_with_mock_feed();
    let mut config = MCMemoryConfig::with_defaults();
    config.set_value(MCConfigKey::TrackerType, "yaw");
    config.set_value(MCConfigKey::TransOrder, "1");
    config.set_value(MCConfigKey::RotOrder, "1");
    manager.select_tracker(&config).unwrap();

    let mut source = MockPoseSource::with_action_pose(head());
    source.set_space_pose(MCSpace::View, MCSpace::Reference, head());
    remote.fail_opens(1);
    remote.set_pose(rig(0.0, 0.0));

    let mut compensator = MCCompensator::default();
    // feed not ready yet
    assert!(compensator.delta_at(&mut manager, &mut source, 0).stale);

    let calibrated = compensator.delta_at(&mut manager, &mut source, 11 * MS);
    assert!(!calibrated.stale);
    assert!(calibrated.pose.is_identity(1e-5));

    remote.set_pose(rig(0.05, 0.2));
    let mut delta = calibrated;
    for frame in 2..300 {
        let time = frame * 11 * MS;
        delta = compensator.delta_at(&mut manager, &mut source, time);
        compensator.end_frame(time);
    }
    assert!(!delta.stale);
    assert!(!delta.pose.is_identity(1e-3));
    assert!(compensator.cached_frames() <= 2);

    let view = MCCompensator::compensate_view(&head(), &delta.pose);
    let back = MCCompensator::compensate_base(&view, &delta.pose);
    assert!(back.approx_eq(&head(), 1e-5));

    // recentering makes the displaced rig the new rest pose
    manager.request_recalibration().unwrap();
    assert_eq!(manager.tracker().map(|t| t.status()), Some(TrackerStatus::Calibrating));
    let recentered = compensator.delta_at(&mut manager, &mut source, 400 * 11 * MS);
    assert!(recentered.pose.is_identity(1e-5));
}

#[test]
fn strength_hotkeys_and_save() {
    let mut manager = MCTrackerManager::new_with_mock_feed().0;
    let mut config = MCMemoryConfig::with_defaults();
    manager.select_tracker(&config).unwrap();
    let mut events = Vec::new();

    let mut applied = Vec::new();
    for _ in 0..3 {
        applied.push(
            manager
                .modify_filter_strength(FilterAxis::Translation, true, &mut config, &mut events)
                .unwrap(),
        );
    }
    let strength = applied[2];
    assert!(applied[0] < applied[1] && applied[1] < applied[2]);
    assert!(strength > 0.5 && strength < 1.0);
    manager.save_config(&mut config, &mut events).unwrap();
    assert_eq!(config.get_float(MCConfigKey::TransStrength), Ok(strength));
    assert_eq!(events.last(), Some(&MCFeedbackEvent::Save));
    assert!(config.values_to_save().iter().any(|(key, _)| *key == MCConfigKey::TransStrength));

    // unknown type keeps the running controller tracker
    config.set_value(MCConfigKey::TrackerType, "hovercraft");
    assert!(manager.select_tracker(&config).is_err());
    assert_eq!(manager.tracker().map(|t| t.name()), Some("controller"));
}
