extern crate euclid;
#[macro_use]
extern crate log;
extern crate thiserror;

#[cfg(feature = "serde-serialization")]
extern crate serde;
#[cfg(feature = "serde-serialization")]
#[macro_use]
extern crate serde_derive;

pub mod mc_config;
pub mod mc_error;
pub mod mc_external_feed;
pub mod mc_feedback;
pub mod mc_filter;
pub mod mc_pose;
pub mod mc_pose_source;

pub use mc_config::{MCConfig, MCConfigKey, MCMemoryConfig};
pub use mc_error::{MCError, MCResult};
pub use mc_external_feed::{MCExternalFeed, MCExternalFeedCreator};
pub use mc_feedback::{MCFeedback, MCFeedbackEvent};
pub use mc_filter::{MCFilter, MAX_STRENGTH, MIN_STRENGTH, clamp_strength, strength_step};
pub use mc_pose::{MCPose, MCRotation, MCTime, MCVector, normalize_rotation};
pub use mc_pose_source::{MCPoseSource, MCSpace};
