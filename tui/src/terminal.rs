use crossterm::{execute, terminal::LeaveAlternateScreen};

/// Restores the terminal when the dashboard exits, including on panic or
/// early return.
pub struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = execute!(
            std::io::stdout(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        );
    }
}
