mod app;
mod event;
mod event_loop;
mod services;
mod terminal;
mod view;

pub use app::{
    DashboardState, InputEvent, LoadState, OutputEvent, RefreshCompletion, RefreshRequest,
};
pub use event::map_crossterm_event_to_input_event;
pub use event_loop::{DashboardOptions, run_dashboard};
pub use services::auto_refresh::{AutoRefresh, DEFAULT_REFRESH_INTERVAL};
pub use services::preferences::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, Preferences, PreferencesError,
};
pub use services::refresh::RefreshTrigger;
pub use services::table::{DEFAULT_PAGE_SIZE, PAGE_SIZES, SortDirection, SortField, TableQuery};
pub use terminal::TerminalGuard;
pub use view::{summary_text, view};
