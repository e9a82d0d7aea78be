//! TUI UI Rendering
//!
//! Renders the dashboard using ratatui with 3 zones:
//! - Header: exchanges, cycle counters, refresh timestamps
//! - Spreads: ranked table, strongest absolute spread first
//! - Logs: scrollable log entries

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table},
    Frame,
};

use super::app::AppState;
use crate::core::types::{SpreadAction, SpreadResult};

/// Main draw function - renders the entire UI
pub fn draw(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),      // Header
            Constraint::Percentage(60), // Spreads
            Constraint::Min(6),         // Logs
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);
    draw_spreads(frame, chunks[1], state);
    draw_logs(frame, chunks[2], state);
}

/// Spread text shown in the table, always two decimals with sign
pub fn format_spread(spread_percent: f64) -> String {
    format!("{:+.2}%", spread_percent)
}

/// Green when B trades above A, red when below
pub fn spread_color(spread_percent: f64) -> Color {
    if spread_percent > 0.0 {
        Color::Green
    } else if spread_percent < 0.0 {
        Color::Red
    } else {
        Color::White
    }
}

/// Human label for the action column
pub fn action_label(action: SpreadAction, exchange_a: &str, exchange_b: &str) -> String {
    match action {
        SpreadAction::BuyASellB => format!(
            "BUY {} / SELL {}",
            exchange_a.to_uppercase(),
            exchange_b.to_uppercase()
        ),
        SpreadAction::BuyBSellA => format!(
            "BUY {} / SELL {}",
            exchange_b.to_uppercase(),
            exchange_a.to_uppercase()
        ),
        SpreadAction::None => "-".to_string(),
    }
}

fn draw_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let snapshot = &state.snapshot;

    let (alert_text, alert_color) = if snapshot.alerts_enabled {
        ("● ALERTS ON", Color::Green)
    } else {
        ("○ ALERTS PAUSED", Color::DarkGray)
    };

    let line1 = Line::from(vec![
        Span::styled(
            format!(
                "{} ↔ {}",
                snapshot.exchange_a.to_uppercase(),
                snapshot.exchange_b.to_uppercase()
            ),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  │  Threshold: "),
        Span::styled(
            format!("{:.2}%", snapshot.threshold_percent),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  │  "),
        Span::styled(
            alert_text,
            Style::default().fg(alert_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  │  Uptime: "),
        Span::styled(state.uptime_str(), Style::default().fg(Color::Cyan)),
    ]);

    let line2 = Line::from(vec![
        Span::raw("Cycle: "),
        Span::styled(snapshot.cycle.to_string(), Style::default().fg(Color::White)),
        Span::raw("  Pairs: "),
        Span::styled(
            snapshot.pair_count.to_string(),
            Style::default().fg(Color::White),
        ),
        Span::raw("  Skipped: "),
        Span::styled(
            snapshot.quotes_skipped.to_string(),
            Style::default().fg(Color::White),
        ),
        Span::raw("  Cooldowns: "),
        Span::styled(
            snapshot.armed_cooldowns.to_string(),
            Style::default().fg(Color::White),
        ),
        Span::raw("  │  Pairs @ "),
        Span::styled(
            snapshot.pairs_refreshed_label(),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  Prices @ "),
        Span::styled(
            snapshot.prices_refreshed_label(),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(vec![line1, line2])
        .block(Block::default().borders(Borders::ALL).title("Spread Monitor"));

    frame.render_widget(header, area);
}

fn spread_row<'a>(rank: usize, result: &'a SpreadResult, exchange_a: &str, exchange_b: &str) -> Row<'a> {
    let color = spread_color(result.spread_percent);
    let row = Row::new(vec![
        Cell::from(format!("{:>3}", rank)),
        Cell::from(result.base_asset.as_str()),
        Cell::from(format!("{:.6}", result.price_a)),
        Cell::from(format!("{:.6}", result.price_b)),
        Cell::from(Span::styled(
            format_spread(result.spread_percent),
            Style::default().fg(color),
        )),
        Cell::from(action_label(result.action, exchange_a, exchange_b)),
    ]);

    if result.action.is_actionable() {
        row.style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        row
    }
}

fn draw_spreads(frame: &mut Frame, area: Rect, state: &AppState) {
    let snapshot = &state.snapshot;
    let rows: Vec<Row> = state
        .ranked_rows()
        .iter()
        .enumerate()
        .map(|(idx, result)| spread_row(idx + 1, result, &snapshot.exchange_a, &snapshot.exchange_b))
        .collect();

    let header = Row::new(vec![
        "#".to_string(),
        "Asset".to_string(),
        snapshot.exchange_a.to_uppercase(),
        snapshot.exchange_b.to_uppercase(),
        "Spread".to_string(),
        "Action".to_string(),
    ])
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let widths = [
        Constraint::Length(4),
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(10),
        Constraint::Min(20),
    ];

    let title = if rows.is_empty() {
        "Spreads (waiting for first cycle)".to_string()
    } else {
        format!("Spreads (top {} of {})", rows.len(), snapshot.results.len())
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, area);
}

/// Draw scrollable log panel
fn draw_logs(frame: &mut Frame, area: Rect, state: &AppState) {
    let log_items: Vec<ListItem> = state
        .recent_logs
        .iter()
        .rev() // Most recent first
        .skip(state.log_scroll_offset)
        .take(area.height.saturating_sub(2) as usize)
        .map(|entry| {
            let level_color = match entry.level.as_str() {
                "ERROR" => Color::Red,
                "WARN" => Color::Yellow,
                "INFO" => Color::Cyan,
                "DEBUG" => Color::DarkGray,
                _ => Color::White,
            };

            ListItem::new(Line::from(vec![
                Span::styled(&entry.timestamp, Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::styled(
                    format!("{:5}", entry.level),
                    Style::default().fg(level_color),
                ),
                Span::raw(" "),
                Span::raw(&entry.message),
            ]))
        })
        .collect();

    let debug_indicator = if state.show_debug_logs {
        " [DEBUG ON]"
    } else {
        ""
    };
    let dropped = if state.dropped_logs_count > 0 {
        format!(" [{} dropped]", state.dropped_logs_count)
    } else {
        String::new()
    };
    let title = format!("Logs (j/k scroll, L=debug){}{}", debug_indicator, dropped);

    let logs = List::new(log_items).block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(logs, area);
}
