#[cfg(test)]
extern crate euclid;
#[macro_use]
extern crate log;
extern crate motion_compensation_api;
#[cfg(feature = "openxr")]
extern crate openxr;

pub mod api;
pub mod compensator;
pub mod filter;
pub mod sample_cache;
pub mod tracker;
mod tracker_manager;

pub use motion_compensation_api::*;
pub use compensator::{MCCompensator, MCDelta, DEFAULT_TOLERANCE};
pub use filter::{CascadeFilter, RotationFilter, Smoothable, TranslationFilter};
pub use sample_cache::{CachedSample, MatchQuality, SampleCache};
pub use tracker::{FilterAxis, MCTracker, TrackerBase, TrackerStatus};
pub use tracker_manager::MCTrackerManager;
