mod feed;
mod source;

pub use self::feed::{MockFeedCreator, MockFeedRemote};
pub use self::source::MockPoseSource;
