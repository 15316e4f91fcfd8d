use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use time::{macros::format_description, OffsetDateTime};
use unicode_width::UnicodeWidthStr;

use crate::app::state::{AppState, OverlayState};
use crate::catalog::{Catalog, SoundItem};
use crate::mutation::BootstrapStatus;
use crate::notify::NotificationLevel;
use crate::units::format_number;

pub fn draw_app(frame: &mut Frame, state: &AppState, table_state: &mut TableState) {
    let toast_height = state.toasts.len() as u16;
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(toast_height),
            Constraint::Length(3),
        ])
        .split(frame.size());

    let title = Paragraph::new(Line::from(vec![
        Span::styled("Dashboard", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  {}", state.base_url),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    frame.render_widget(title, vertical[0]);

    render_sound_table(frame, state, table_state, vertical[1]);

    let pager = Paragraph::new(Line::from(vec![
        Span::styled("‹ ", Style::default().fg(Color::Cyan)),
        Span::styled(
            format!(
                "page {}/{}",
                state.catalog.current_page(),
                state.catalog.max_page()
            ),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ›", Style::default().fg(Color::Cyan)),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(pager, vertical[2]);

    render_toasts(frame, state, vertical[3]);

    let status = build_status_line(state);
    let status_paragraph = Paragraph::new(status).style(Style::default().fg(Color::Gray));
    frame.render_widget(status_paragraph, vertical[4]);

    render_overlay(frame, state);
}

fn render_sound_table(frame: &mut Frame, state: &AppState, table_state: &mut TableState, area: Rect) {
    let deleting = state.deletes.in_flight();
    let rows: Vec<Row> = state
        .visible_rows()
        .into_iter()
        .map(|(id, item)| {
            let cells = table_cells(id, item);
            Row::new(cells.into_iter().map(Cell::from))
        })
        .collect();

    let empty_label = match state.bootstrap.status() {
        BootstrapStatus::NotStarted | BootstrapStatus::Pending => "Loading sounds…",
        BootstrapStatus::Loaded { .. } | BootstrapStatus::Failed => "No sounds in the catalog.",
    };

    let block_title = match deleting {
        Some(id) => format!("Sounds (deleting {id}…)"),
        None => "Sounds".to_string(),
    };
    let block = Block::default()
        .title(block_title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if rows.is_empty() {
        let paragraph = Paragraph::new(empty_label)
            .style(Style::default().fg(Color::Gray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(50),
            Constraint::Percentage(20),
            Constraint::Percentage(30),
        ],
    )
    .header(
        Row::new(["Name", "Price", "Cooldown"])
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
    )
    .block(block)
    .highlight_style(
        Style::default()
            .bg(Color::Blue)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▸ ");
    frame.render_stateful_widget(table, area, table_state);
}

fn render_toasts(frame: &mut Frame, state: &AppState, area: Rect) {
    if state.toasts.is_empty() {
        return;
    }
    let lines: Vec<Line> = state
        .toasts
        .iter()
        .map(|toast| {
            let bg = match toast.notification.level {
                NotificationLevel::Success => Color::Green,
                NotificationLevel::Error => Color::Red,
            };
            Line::from(Span::styled(
                format!(
                    " [{}] {} ",
                    format_time_short(toast.notification.created_at),
                    toast.notification.message
                ),
                Style::default().bg(bg).fg(Color::White),
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn build_status_line(state: &AppState) -> Text<'static> {
    let total = state.catalog.len();
    let position = match state.selected_row() {
        Some(_) => format!("{}/{}", state.selected + 1, state.visible_rows().len()),
        None => "0/0".to_string(),
    };

    let mut spans = vec![
        Span::raw(format!("Total: {total} ")),
        Span::raw(" | Row: "),
        Span::styled(position, Style::default().add_modifier(Modifier::BOLD)),
    ];

    if state.is_loading() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            "loading",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ));
    }

    if let Some(id) = state.deletes.in_flight() {
        spans.push(Span::raw(" | Deleting: "));
        spans.push(Span::styled(
            id.to_string(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ));
    }

    if let Some(message) = &state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(Color::Cyan),
        ));
    }

    let keys_line1 = vec![
        Span::styled(
            "Keys: ",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "j/k move • h/l page • g/G first/last page",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    let keys_line2 = vec![Span::styled(
        "      p play • d delete • q quit",
        Style::default().fg(Color::DarkGray),
    )];

    Text::from(vec![
        Line::from(spans),
        Line::from(keys_line1),
        Line::from(keys_line2),
    ])
}

fn render_overlay(frame: &mut Frame, state: &AppState) {
    match state.overlay() {
        Some(OverlayState::DeleteSound(draft)) => {
            let area = centered_rect(60, 30, frame.size());
            frame.render_widget(Clear, area);
            let paragraph = Paragraph::new(vec![
                Line::from(Span::styled(
                    "Delete Sound",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!(
                    "Delete '{}' (price {}, cooldown {} ms)?",
                    draft.id,
                    draft.item.price,
                    format_number(draft.item.cooldown_millis)
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Enter to confirm • Esc to cancel",
                    Style::default().fg(Color::Gray),
                )),
            ])
            .block(
                Block::default()
                    .title("Confirm Delete")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            )
            .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, area);
        }
        None => {}
    }
}

fn table_cells(id: &str, item: &SoundItem) -> [String; 3] {
    [
        id.to_string(),
        item.price.to_string(),
        format_number(item.cooldown_millis),
    ]
}

/// The current page as plain text, for non-interactive output.
pub fn plain_page(catalog: &Catalog) -> String {
    let rows = catalog.visible_rows();
    let mut lines = Vec::with_capacity(rows.len() + 2);
    if rows.is_empty() {
        lines.push("No sounds in the catalog.".to_string());
    } else {
        let name_width = rows
            .iter()
            .map(|(id, _)| id.width())
            .max()
            .unwrap_or(0)
            .max("NAME".len());
        lines.push(plain_row(["NAME", "PRICE", "COOLDOWN"], name_width));
        for (id, item) in &rows {
            let [name, price, cooldown] = table_cells(id, item);
            lines.push(plain_row(
                [name.as_str(), price.as_str(), cooldown.as_str()],
                name_width,
            ));
        }
    }
    lines.push(format!(
        "‹ page {}/{} › {} sound(s)",
        catalog.current_page(),
        catalog.max_page(),
        catalog.len()
    ));
    lines.join("\n")
}

fn plain_row(cells: [&str; 3], name_width: usize) -> String {
    let [name, price, cooldown] = cells;
    let padding = name_width.saturating_sub(name.width());
    let line = format!(
        "{name}{}  {price:>8}  {cooldown:>12}",
        " ".repeat(padding)
    );
    line.trim_end().to_string()
}

fn format_time_short(dt: OffsetDateTime) -> String {
    dt.format(&format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_else(|_| dt.unix_timestamp().to_string())
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::catalog::sample_map;

    #[test]
    fn plain_page_renders_first_page() {
        let mut catalog = Catalog::new();
        catalog.merge(sample_map(&[
            "airhorn", "bonk", "crickets", "drumroll", "eagle", "fanfare",
        ]));
        insta::assert_snapshot!(plain_page(&catalog), @r###"
        NAME         PRICE      COOLDOWN
        airhorn          0         1,000
        bonk            10         1,000
        crickets        20         1,000
        drumroll        30         1,000
        eagle           40         1,000
        ‹ page 1/2 › 6 sound(s)
        "###);
    }

    #[test]
    fn plain_page_reports_empty_catalog() {
        let catalog = Catalog::new();
        assert_eq!(
            plain_page(&catalog),
            "No sounds in the catalog.\n‹ page 1/1 › 0 sound(s)"
        );
    }

    #[test]
    fn dashboard_draws_current_page() {
        let mut state = AppState::new("http://localhost:9999", std::time::Duration::from_secs(3));
        state.begin_bootstrap();
        state.apply_remote(crate::app::RemoteEvent::CatalogFetched(Ok(sample_map(&[
            "a1", "b2", "c3", "d4", "e5", "f6",
        ]))));
        state.next_page();

        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).expect("terminal");
        let mut table_state = TableState::default();
        table_state.select(Some(0));
        terminal
            .draw(|frame| draw_app(frame, &state, &mut table_state))
            .expect("draw");

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("f6"));
        assert!(!text.contains("a1"));
        assert!(text.contains("page 2/2"));
    }
}
