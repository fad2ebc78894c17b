use crate::{MCError, MCExternalFeed, MCExternalFeedCreator, MCPose, MCResult, MCTime};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct MockFeedState {
    pose: Option<MCPose>,
    // Remaining open() calls that fail before the feed becomes ready
    open_failures: u32,
    opens: u32,
}

type MockFeedStatePtr = Rc<RefCell<MockFeedState>>;

/// Creates mock feeds sharing one state, driven through a `MockFeedRemote`.
pub struct MockFeedCreator {
    state: MockFeedStatePtr,
}

impl MockFeedCreator {
    pub fn new() -> Box<dyn MCExternalFeedCreator> {
        Box::new(MockFeedCreator {
            state: MockFeedStatePtr::default(),
        })
    }

    pub fn new_with_remote() -> (Box<dyn MCExternalFeedCreator>, MockFeedRemote) {
        let state = MockFeedStatePtr::default();
        let remote = MockFeedRemote { state: state.clone() };
        (Box::new(MockFeedCreator { state }), remote)
    }
}

impl MCExternalFeedCreator for MockFeedCreator {
    fn new_feed(&self) -> Box<dyn MCExternalFeed> {
        Box::new(MockFeed {
            state: self.state.clone(),
            open: false,
        })
    }
}

/// Test-side handle to the state of every feed made by one creator.
#[derive(Clone)]
pub struct MockFeedRemote {
    state: MockFeedStatePtr,
}

impl MockFeedRemote {
    pub fn set_pose(&self, pose: MCPose) {
        self.state.borrow_mut().pose = Some(pose);
    }

    pub fn clear_pose(&self) {
        self.state.borrow_mut().pose = None;
    }

    pub fn fail_opens(&self, count: u32) {
        self.state.borrow_mut().open_failures = count;
    }

    pub fn open_count(&self) -> u32 {
        self.state.borrow().opens
    }
}

struct MockFeed {
    state: MockFeedStatePtr,
    open: bool,
}

impl MCExternalFeed for MockFeed {
    fn open(&mut self) -> MCResult<()> {
        let mut state = self.state.borrow_mut();
        state.opens += 1;
        if state.open_failures > 0 {
            state.open_failures -= 1;
            return Err(MCError::FeedUnavailable("mock feed not ready".to_owned()));
        }
        self.open = true;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn read_pose(&mut self, time: MCTime) -> MCResult<MCPose> {
        if !self.open {
            return Err(MCError::FeedUnavailable("mock feed not open".to_owned()));
        }
        self.state
            .borrow()
            .pose
            .ok_or_else(|| MCError::FeedUnavailable(format!("no mock feed data at {}", time)))
    }
}
