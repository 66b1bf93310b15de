//! Main dashboard loop: terminal input, refresh completions, the
//! auto-refresh timer and the spinner tick share one `select!`.

use crate::app::{DashboardState, InputEvent, OutputEvent, RefreshCompletion, RefreshRequest};
use crate::services::auto_refresh::AutoRefresh;
use crate::services::preferences::PreferenceStore;
use crate::services::refresh::RefreshTrigger;
use crate::services::toast::Toast;
use crate::terminal::TerminalGuard;
use crate::view::view;
use chrono::Utc;
use crossterm::{execute, terminal::EnterAlternateScreen};
use lastsync_api::LastSyncClient;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc::{self, Sender};
use tokio::time::{Duration, interval};
use tracing::{debug, info, warn};

pub struct DashboardOptions {
    pub client: LastSyncClient,
    pub store: Arc<dyn PreferenceStore>,
    pub refresh_interval: Duration,
    pub page_size: usize,
}

pub async fn run_dashboard(options: DashboardOptions) -> io::Result<()> {
    let DashboardOptions {
        client,
        store,
        refresh_interval,
        page_size,
    } = options;

    let preferences = store.load();
    let mut state = DashboardState::new(preferences, page_size, client.base_url());
    info!(
        server = %client.base_url(),
        include_system = preferences.include_system,
        auto_refresh = preferences.auto_refresh,
        "starting dashboard"
    );

    let _guard = TerminalGuard;
    crossterm::terminal::enable_raw_mode()?;
    execute!(std::io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;

    let (input_tx, mut input_rx) = mpsc::channel::<InputEvent>(100);
    std::thread::spawn(move || {
        loop {
            if let Ok(event) = crossterm::event::read()
                && let Some(event) = crate::event::map_crossterm_event_to_input_event(event)
                && input_tx.blocking_send(event).is_err()
            {
                break;
            }
        }
    });

    let (refresh_tx, mut refresh_rx) = mpsc::channel::<RefreshCompletion>(16);
    let mut spinner_interval = interval(Duration::from_millis(100));
    let mut auto_refresh = AutoRefresh::new(refresh_interval, state.preferences.auto_refresh);

    if let Some(request) = state.begin_refresh(RefreshTrigger::Manual) {
        spawn_refresh(&client, request, refresh_tx.clone());
    }

    terminal.draw(|f| view(f, &state))?;
    let mut should_quit = false;
    loop {
        tokio::select! {
            event = input_rx.recv() => {
                let Some(event) = event else {
                    should_quit = true;
                    continue;
                };
                for output in state.handle_input(event) {
                    match output {
                        OutputEvent::Quit => should_quit = true,
                        OutputEvent::Refresh(request) => {
                            spawn_refresh(&client, request, refresh_tx.clone());
                        }
                        OutputEvent::SavePreferences(preferences) => {
                            if let Err(error) = store.save(&preferences) {
                                warn!(error = %error, "failed to save preferences");
                                state.toast = Some(Toast::error("Failed to save preferences"));
                            }
                        }
                        OutputEvent::AutoRefreshChanged(enabled) => {
                            auto_refresh.set_enabled(enabled);
                        }
                    }
                }
            }
            Some(completion) = refresh_rx.recv() => {
                let sequence = completion.sequence;
                if !state.apply_refresh(completion, Utc::now()) {
                    debug!(sequence, "dropped stale refresh result");
                }
            }
            trigger = auto_refresh.tick() => {
                match state.begin_refresh(trigger) {
                    Some(request) => spawn_refresh(&client, request, refresh_tx.clone()),
                    None => debug!("auto refresh skipped; previous refresh still running"),
                }
            }
            _ = spinner_interval.tick() => {
                state.tick();
            }
        }
        if should_quit {
            break;
        }
        terminal.draw(|f| view(f, &state))?;
    }

    auto_refresh.set_enabled(false);
    state.teardown();
    // Dropping the receiver discards results of refreshes still in flight.
    drop(refresh_rx);
    info!("dashboard closed");
    Ok(())
}

fn spawn_refresh(client: &LastSyncClient, request: RefreshRequest, tx: Sender<RefreshCompletion>) {
    let client = client.clone();
    tokio::spawn(async move {
        let outcome = client
            .list_indices(request.include_system)
            .await
            .map_err(|error| error.to_string());
        if let Err(error) = &outcome {
            warn!(sequence = request.sequence, error = %error, "index refresh failed");
        }
        let _ = tx
            .send(RefreshCompletion {
                sequence: request.sequence,
                outcome,
            })
            .await;
    });
}
