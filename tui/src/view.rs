use crate::app::{DashboardState, LoadState};
use crate::services::table::{Page, SortField};
use crate::services::toast::ToastStyle;
use chrono::{DateTime, Local, Utc};
use lastsync_shared::time::{format_count, format_last_time};
use lastsync_shared::{IndexRecord, IndexStatus};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const TITLE: &str = "Index Last Synced";

pub fn view(f: &mut Frame, state: &DashboardState) {
    view_at(f, state, Utc::now());
}

/// Renders with an explicit clock so relative times are reproducible.
pub fn view_at(f: &mut Frame, state: &DashboardState, now: DateTime<Utc>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(3), // search
            Constraint::Min(3),    // table or banner
            Constraint::Length(2), // footer
        ])
        .split(f.area());

    render_header(f, state, chunks[0]);
    render_search(f, state, chunks[1]);
    render_body(f, state, chunks[2], now);
    render_footer(f, state, chunks[3]);
    render_toast(f, state);
}

fn toggle_span(label: &str, key: char, enabled: bool) -> Vec<Span<'static>> {
    let (mark, style) = if enabled {
        ("[x]", Style::default().fg(Color::Green))
    } else {
        ("[ ]", Style::default().fg(Color::DarkGray))
    };
    vec![
        Span::styled(mark.to_string(), style),
        Span::raw(format!(" {label} ")),
        Span::styled(format!("({key})"), Style::default().fg(Color::DarkGray)),
        Span::raw("   "),
    ]
}

fn render_header(f: &mut Frame, state: &DashboardState, area: Rect) {
    let mut spans = Vec::new();
    let preferences = &state.preferences;
    spans.extend(toggle_span("Include System Indices", 's', preferences.include_system));
    spans.extend(toggle_span("Include Hidden Indices", 'h', preferences.include_hidden));
    spans.extend(toggle_span("Auto Refresh", 'a', preferences.auto_refresh));

    if state.refresh_in_flight() {
        let frame = SPINNER_FRAMES[state.spinner_frame % SPINNER_FRAMES.len()];
        spans.push(Span::styled(
            format!("{frame} Refreshing"),
            Style::default().fg(Color::Cyan),
        ));
    } else if let Some(updated) = state.last_updated {
        spans.push(Span::styled(
            format!(
                "Updated {}",
                updated.with_timezone(&Local).format("%H:%M:%S")
            ),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {TITLE} · {} ", state.server_url),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_search(f: &mut Frame, state: &DashboardState, area: Rect) {
    let border = if state.search_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let content = if state.query.search.is_empty() && !state.search_focused {
        Line::from(Span::styled(
            "Search... (/)",
            Style::default().fg(Color::DarkGray),
        ))
    } else if state.search_focused {
        Line::from(vec![
            Span::raw(state.query.search.clone()),
            Span::styled("▏", Style::default().fg(Color::Cyan)),
        ])
    } else {
        Line::from(state.query.search.clone())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border);
    f.render_widget(Paragraph::new(content).block(block), area);
}

fn render_body(f: &mut Frame, state: &DashboardState, area: Rect, now: DateTime<Utc>) {
    if let LoadState::Errored(message) = &state.load_state {
        let banner = Paragraph::new(vec![
            Line::from(Span::styled(
                "Error",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(message.clone()),
            Line::from(Span::styled(
                "Press r to retry",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
        f.render_widget(banner, area);
        return;
    }

    let Some(page) = state.page() else {
        let text = if state.is_loading() {
            let frame = SPINNER_FRAMES[state.spinner_frame % SPINNER_FRAMES.len()];
            format!("{frame} Loading indices...")
        } else {
            "Press r to load indices".to_string()
        };
        let waiting = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(waiting, area);
        return;
    };

    render_table(f, state, &page, area, now);
}

fn header_cell(state: &DashboardState, field: SortField, position: usize) -> Cell<'static> {
    let mut label = format!("{} {}", position + 1, field.label());
    if state.query.sort_field == field {
        label.push(' ');
        label.push_str(state.query.sort_direction.arrow());
    }
    Cell::from(label)
}

fn status_cell(status: &IndexStatus) -> Cell<'static> {
    let color = match status {
        IndexStatus::Open => Color::Green,
        IndexStatus::Closed => Color::Red,
        IndexStatus::Other(_) => Color::Yellow,
    };
    Cell::from(Span::styled(
        format!("● {}", status.as_str()),
        Style::default().fg(color),
    ))
}

fn record_row(record: &IndexRecord, now: DateTime<Utc>) -> Row<'static> {
    let name = if record.is_system_index() {
        Line::from(vec![
            Span::styled("🔒 ", Style::default().fg(Color::DarkGray)),
            Span::raw(record.name.clone()),
        ])
    } else {
        Line::from(record.name.clone())
    };
    let last_time = match record.last_timestamp {
        Some(timestamp) => format_last_time(timestamp, now, &Local),
        None => "N/A".to_string(),
    };

    Row::new(vec![
        Cell::from(name),
        Cell::from(last_time),
        Cell::from(format_count(record.document_count)),
        status_cell(&record.status),
    ])
}

fn render_table(
    f: &mut Frame,
    state: &DashboardState,
    page: &Page<'_>,
    area: Rect,
    now: DateTime<Utc>,
) {
    let header = Row::new(
        SortField::ALL
            .iter()
            .enumerate()
            .map(|(position, field)| header_cell(state, *field, position)),
    )
    .style(Style::default().add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    let rows: Vec<Row> = if page.rows.is_empty() {
        vec![Row::new(vec![Cell::from("No indices found.")])]
    } else {
        page.rows
            .iter()
            .map(|record| record_row(record, now))
            .collect()
    };

    let widths = [
        Constraint::Percentage(35),
        Constraint::Percentage(35),
        Constraint::Percentage(15),
        Constraint::Percentage(15),
    ];
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(table, area);
}

/// `Showing X of Y indices`, with the system count when it is relevant.
pub fn summary_text(state: &DashboardState) -> Option<String> {
    let result = state.result.as_ref()?;
    let page = state.page()?;
    if result.indices.is_empty() {
        return None;
    }

    let mut text = format!(
        "Showing {} of {} indices",
        page.rows.len(),
        result.indices.len()
    );
    if state.preferences.include_system && result.system_count > 0 {
        text.push_str(&format!(
            " (including {} system indices)",
            result.system_count
        ));
    }
    Some(text)
}

fn render_footer(f: &mut Frame, state: &DashboardState, area: Rect) {
    let mut first = Vec::new();
    if let Some(summary) = summary_text(state) {
        first.push(Span::styled(summary, Style::default().fg(Color::Gray)));
    }
    if let Some(page) = state.page() {
        first.push(Span::styled(
            format!(
                "   Page {}/{} · Rows per page: {}",
                page.page_index + 1,
                page.page_count,
                state.query.page_size
            ),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let hints = Line::from(Span::styled(
        "/ search · r refresh · 1-4 sort · ←/→ page · +/- rows · q quit",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(vec![Line::from(first), hints]), area);
}

fn render_toast(f: &mut Frame, state: &DashboardState) {
    let Some(toast) = &state.toast else {
        return;
    };

    let area = f.area();
    let width = u16::try_from(toast.message.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(4)
        .min(area.width);
    let height = 3.min(area.height);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width),
        y: area.y,
        width,
        height,
    };

    let color = match toast.style {
        ToastStyle::Success => Color::Green,
        ToastStyle::Error => Color::Red,
        ToastStyle::Info => Color::Blue,
    };
    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(toast.message.clone()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        ),
        rect,
    );
}
