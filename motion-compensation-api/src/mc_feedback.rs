/// Discrete acknowledgment events for the user-facing feedback sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub enum MCFeedbackEvent {
    Save,
    Error,
    StrengthChanged,
    StrengthAtLimit,
}

/// Fire-and-forget sink for audio/visual acknowledgments.
/// Implementations must not block the frame thread.
pub trait MCFeedback {
    fn execute(&mut self, event: MCFeedbackEvent);
}

impl MCFeedback for Vec<MCFeedbackEvent> {
    fn execute(&mut self, event: MCFeedbackEvent) {
        self.push(event);
    }
}
