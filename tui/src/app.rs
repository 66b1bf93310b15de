mod events;

pub use events::{InputEvent, OutputEvent, RefreshCompletion, RefreshRequest};

use crate::services::preferences::Preferences;
use crate::services::refresh::{RefreshTracker, RefreshTrigger};
use crate::services::table::{Page, SortField, TableQuery};
use crate::services::toast::Toast;
use chrono::{DateTime, Utc};
use lastsync_shared::AggregationResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Errored(String),
}

pub struct DashboardState {
    pub load_state: LoadState,
    pub result: Option<AggregationResult>,
    pub preferences: Preferences,
    pub query: TableQuery,
    pub search_focused: bool,
    pub toast: Option<Toast>,
    pub spinner_frame: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub server_url: String,
    refresh: RefreshTracker,
    torn_down: bool,
}

impl DashboardState {
    pub fn new(preferences: Preferences, page_size: usize, server_url: impl Into<String>) -> Self {
        Self {
            load_state: LoadState::Idle,
            result: None,
            preferences,
            query: TableQuery::with_page_size(page_size),
            search_focused: false,
            toast: None,
            spinner_frame: 0,
            last_updated: None,
            server_url: server_url.into(),
            refresh: RefreshTracker::default(),
            torn_down: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    /// True while any request is outstanding, including superseded ones.
    pub fn refresh_in_flight(&self) -> bool {
        self.refresh.is_in_flight()
    }

    /// Starts a refresh and enters `Loading`. Timer ticks are skipped while a
    /// previous request is still running.
    pub fn begin_refresh(&mut self, trigger: RefreshTrigger) -> Option<RefreshRequest> {
        if self.torn_down {
            return None;
        }
        let sequence = self.refresh.begin(trigger)?;
        self.load_state = LoadState::Loading;
        Some(RefreshRequest {
            sequence,
            include_system: self.preferences.include_system,
        })
    }

    /// Applies a finished refresh. Returns `false` when it was dropped as
    /// stale or because the dashboard is gone.
    pub fn apply_refresh(&mut self, completion: RefreshCompletion, now: DateTime<Utc>) -> bool {
        if self.torn_down || !self.refresh.complete(completion.sequence) {
            return false;
        }

        match completion.outcome {
            Ok(result) => {
                self.result = Some(result);
                self.load_state = LoadState::Loaded;
                self.last_updated = Some(now);
                self.toast = Some(Toast::success("Index information retrieved"));
            }
            Err(message) => {
                self.toast = Some(Toast::error(format!("Failed to fetch indices: {message}")));
                self.load_state = LoadState::Errored(message);
            }
        }
        true
    }

    /// Makes every later update a no-op.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.toast = None;
    }

    /// The visible page, or `None` when the table is not shown.
    pub fn page(&self) -> Option<Page<'_>> {
        if matches!(self.load_state, LoadState::Errored(_)) {
            return None;
        }
        self.result
            .as_ref()
            .map(|result| self.query.apply(&result.indices))
    }

    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Vec<OutputEvent> {
        if self.torn_down {
            return Vec::new();
        }

        if self.search_focused {
            return self.handle_search_input(event);
        }

        match event {
            InputEvent::AttemptQuit | InputEvent::InputChanged('q') => vec![OutputEvent::Quit],
            InputEvent::InputChanged('/') => {
                self.search_focused = true;
                Vec::new()
            }
            InputEvent::InputChanged('r') => self.refresh_now(),
            InputEvent::InputChanged('s') => {
                self.preferences.include_system = !self.preferences.include_system;
                let mut events = vec![OutputEvent::SavePreferences(self.preferences)];
                events.extend(self.refresh_now());
                events
            }
            InputEvent::InputChanged('h') => {
                self.preferences.include_hidden = !self.preferences.include_hidden;
                vec![OutputEvent::SavePreferences(self.preferences)]
            }
            InputEvent::InputChanged('a') => {
                self.preferences.auto_refresh = !self.preferences.auto_refresh;
                self.toast = Some(Toast::info(if self.preferences.auto_refresh {
                    "Auto refresh on"
                } else {
                    "Auto refresh off"
                }));
                vec![
                    OutputEvent::SavePreferences(self.preferences),
                    OutputEvent::AutoRefreshChanged(self.preferences.auto_refresh),
                ]
            }
            InputEvent::InputChanged(digit @ '1'..='4') => {
                let position = (digit as usize).saturating_sub('1' as usize);
                if let Some(field) = SortField::ALL.get(position) {
                    self.query.select_sort(*field);
                }
                Vec::new()
            }
            InputEvent::InputChanged('+') | InputEvent::InputChanged('=') => {
                self.query.next_page_size();
                Vec::new()
            }
            InputEvent::InputChanged('-') => {
                self.query.previous_page_size();
                Vec::new()
            }
            InputEvent::CursorLeft => {
                self.query.page_index = self.current_page_index().saturating_sub(1);
                Vec::new()
            }
            InputEvent::CursorRight => {
                let next = self.current_page_index() + 1;
                if self.page().is_some_and(|page| next < page.page_count) {
                    self.query.page_index = next;
                }
                Vec::new()
            }
            InputEvent::HandleEsc => {
                if !self.query.search.is_empty() {
                    self.query.set_search("");
                }
                Vec::new()
            }
            InputEvent::InputChanged(_)
            | InputEvent::InputBackspace
            | InputEvent::InputSubmitted
            | InputEvent::Resized(_, _) => Vec::new(),
        }
    }

    fn handle_search_input(&mut self, event: InputEvent) -> Vec<OutputEvent> {
        match event {
            InputEvent::AttemptQuit => return vec![OutputEvent::Quit],
            InputEvent::InputChanged(c) => {
                let mut search = self.query.search.clone();
                search.push(c);
                self.query.set_search(search);
            }
            InputEvent::InputBackspace => {
                let mut search = self.query.search.clone();
                search.pop();
                self.query.set_search(search);
            }
            InputEvent::InputSubmitted | InputEvent::HandleEsc => {
                self.search_focused = false;
            }
            InputEvent::CursorLeft | InputEvent::CursorRight | InputEvent::Resized(_, _) => {}
        }
        Vec::new()
    }

    fn refresh_now(&mut self) -> Vec<OutputEvent> {
        self.begin_refresh(RefreshTrigger::Manual)
            .map(OutputEvent::Refresh)
            .into_iter()
            .collect()
    }

    /// Page index after clamping against the current data.
    fn current_page_index(&self) -> usize {
        self.page()
            .map(|page| page.page_index)
            .unwrap_or(self.query.page_index)
    }
}
