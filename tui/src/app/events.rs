use crate::services::preferences::Preferences;
use lastsync_shared::AggregationResult;

/// Terminal input after crossterm events are mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    InputChanged(char),
    InputBackspace,
    InputSubmitted,
    HandleEsc,
    CursorLeft,
    CursorRight,
    AttemptQuit,
    Resized(u16, u16),
}

/// A refresh the event loop must issue against the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshRequest {
    pub sequence: u64,
    pub include_system: bool,
}

/// Result of a spawned refresh task, tagged with its request sequence.
#[derive(Debug)]
pub struct RefreshCompletion {
    pub sequence: u64,
    pub outcome: Result<AggregationResult, String>,
}

/// Side effects requested by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    Refresh(RefreshRequest),
    SavePreferences(Preferences),
    AutoRefreshChanged(bool),
    Quit,
}
