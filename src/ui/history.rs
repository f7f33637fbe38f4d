use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::App;
use typedojo::util::mean;

pub fn render_history(app: &mut App, f: &mut Frame) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Records table
            Constraint::Length(3), // Instructions
        ])
        .split(area);

    let records = &app.history.records;
    let scores: Vec<f64> = records.iter().map(|r| r.wpm as f64).collect();
    let title_text = match (mean(&scores), scores.iter().cloned().reduce(f64::max)) {
        (Some(avg), Some(best)) => format!(
            "{} sessions  ·  average {:.1} wpm  ·  best {} wpm",
            records.len(),
            avg,
            best
        ),
        _ => "no sessions yet".to_string(),
    };

    let title = Paragraph::new(title_text)
        .block(Block::default().borders(Borders::ALL).title("History"))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    if records.is_empty() {
        let no_data = Paragraph::new("Finish a sentence without mistakes to record a score.")
            .block(Block::default().borders(Borders::ALL).title("No Data"))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        f.render_widget(no_data, chunks[1]);
    } else {
        let table_height = chunks[1].height.saturating_sub(3) as usize;
        let max_scroll = records.len().saturating_sub(table_height);
        if app.history.scroll_offset > max_scroll {
            app.history.scroll_offset = max_scroll;
        }

        let header = Row::new(vec!["Sentence", "WPM", "Recorded"]).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = app
            .history
            .records
            .iter()
            .skip(app.history.scroll_offset)
            .take(table_height)
            .map(|r| {
                Row::new(vec![
                    Cell::from(r.sentence_id.to_string()),
                    Cell::from(r.wpm.to_string()),
                    Cell::from(r.recorded_at.format("%Y-%m-%d %H:%M").to_string()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            &[
                Constraint::Length(10),
                Constraint::Length(8),
                Constraint::Length(18),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Sessions"));
        f.render_widget(table, chunks[1]);
    }

    let instructions = Paragraph::new("↑/↓ PgUp/PgDn scroll | (F2) or (esc) back to practice")
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center);
    f.render_widget(instructions, chunks[2]);
}
