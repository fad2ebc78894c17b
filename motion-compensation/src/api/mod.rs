mod controller;
pub use self::controller::ControllerTracker;

mod external;
pub use self::external::ExternalFeedTracker;

#[cfg(any(test, feature = "mock"))]
mod mock;
#[cfg(any(test, feature = "mock"))]
pub use self::mock::{MockFeedCreator, MockFeedRemote, MockPoseSource};

#[cfg(feature = "openxr")]
mod openxr;
#[cfg(feature = "openxr")]
pub use self::openxr::OpenXrPoseSource;
