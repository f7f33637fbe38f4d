pub mod history;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::App;
use typedojo::session::Phase;

const HORIZONTAL_MARGIN: u16 = 5;

/// Spaces are drawn visibly so a missed space shows up
fn display_char(c: char) -> String {
    match c {
        ' ' => "_".to_owned(),
        c => c.to_string(),
    }
}

fn wpm_label(wpm: f64) -> String {
    if wpm.is_infinite() {
        "∞ wpm".to_owned()
    } else {
        format!("{wpm} wpm")
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let engine = &self.engine;
        let session = engine.session();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);
        let underlined_dim_bold_style = Style::default()
            .patch(dim_bold_style)
            .add_modifier(Modifier::UNDERLINED);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let magenta_style = Style::default().fg(Color::Magenta);

        let text: String = session.target().iter().collect();
        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let prompt_lines = if text.width() <= max_chars_per_line as usize {
            1
        } else {
            ((text.width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
        };
        let padding = area.height.saturating_sub(prompt_lines + 8) / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(padding),
                Constraint::Length(2),            // score
                Constraint::Length(2),            // tag
                Constraint::Length(prompt_lines), // sentence
                Constraint::Length(2),            // progress
                Constraint::Min(1),
                Constraint::Length(1), // legend
            ])
            .split(area);

        let score = if session.wpm > 0.0 {
            Span::styled(wpm_label(session.wpm), green_bold_style)
        } else {
            Span::styled("#", dim_bold_style)
        };
        Paragraph::new(score)
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        if let Some(sentence) = engine.current_sentence() {
            Paragraph::new(Span::styled(
                sentence.tag.clone(),
                magenta_style.patch(italic_style),
            ))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
        }

        let typed = session.match_results.len();
        let mut spans: Vec<Span> = session
            .target()
            .iter()
            .enumerate()
            .map(|(idx, c)| {
                let style = match session.match_results.get(idx).copied() {
                    Some(true) => green_bold_style,
                    Some(false) => red_bold_style,
                    None if idx == typed && session.is_playing => underlined_dim_bold_style,
                    None => dim_bold_style,
                };
                Span::styled(display_char(*c), style)
            })
            .collect();

        // keys typed past the end of the sentence
        let overflow: String = session
            .pressed_keys
            .iter()
            .skip(session.target_len())
            .map(|c| display_char(*c))
            .collect();
        if !overflow.is_empty() {
            spans.push(Span::styled(overflow, red_bold_style));
        }

        Paragraph::new(Line::from(spans))
            .alignment(if prompt_lines == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true })
            .render(chunks[3], buf);

        let mut status = format!(
            "sentence {}/{}",
            engine.cursor() + 1,
            engine.sentence_count()
        );
        match engine.phase() {
            Phase::Idle => status.push_str("  ·  press enter to start"),
            Phase::Playing => status.push_str("  ·  start typing"),
            Phase::Active => {
                if let Some(elapsed) = engine.elapsed() {
                    status.push_str(&format!("  ·  {:.1}s", elapsed.as_secs_f64()));
                }
            }
            Phase::Completed => status.push_str("  ·  done! (→) next"),
        }
        Paragraph::new(Span::styled(status, dim_bold_style))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);

        let mut legend = Vec::new();
        if !engine.is_first() {
            legend.push("(←) back");
        }
        legend.push("(enter) start");
        if !engine.is_last() {
            legend.push("(→) next");
        }
        legend.push("(F2) history");
        legend.push("(esc) quit");
        Paragraph::new(Span::styled(legend.join("  "), italic_style))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use typedojo::{
        clock::ManualClock,
        engine::Engine,
        sentence::{Sentence, SentenceSet},
        session::Key,
        sink::NullSink,
    };

    fn app_with(text: &str) -> App {
        let set = SentenceSet::new(vec![Sentence::new(1, text, "Greeting")]).unwrap();
        let engine = Engine::new(set, 1, Box::new(ManualClock::default()), Box::new(NullSink));
        App::new(engine, None)
    }

    fn render(app: &App) -> String {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| f.render_widget(app, f.area()))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_display_char_shows_spaces() {
        assert_eq!(display_char(' '), "_");
        assert_eq!(display_char('a'), "a");
    }

    #[test]
    fn test_wpm_label() {
        assert_eq!(wpm_label(42.0), "42 wpm");
        assert_eq!(wpm_label(f64::INFINITY), "∞ wpm");
    }

    #[test]
    fn test_idle_screen() {
        let app = app_with("hi there");
        let screen = render(&app);
        assert!(screen.contains("hi_there"));
        assert!(screen.contains("Greeting"));
        assert!(screen.contains("press enter to start"));
        // single sentence: no back or next hints
        assert!(!screen.contains("(→) next"));
        assert!(!screen.contains("(←) back"));
    }

    #[test]
    fn test_active_timer_uses_engine_clock() {
        let clock = ManualClock::default();
        let set = SentenceSet::new(vec![Sentence::new(1, "hi there", "Greeting")]).unwrap();
        let engine = Engine::new(set, 1, Box::new(clock.clone()), Box::new(NullSink));
        let mut app = App::new(engine, None);
        app.engine.start();
        app.engine.key_press(Key::Char('h'));
        clock.advance_ms(2500);

        assert!(render(&app).contains("2.5s"));
    }

    #[test]
    fn test_overflow_keys_are_drawn() {
        let mut app = app_with("ab");
        app.engine.start();
        for c in "abcd".chars() {
            app.engine.key_press(Key::Char(c));
        }
        let screen = render(&app);
        assert!(screen.contains("abcd"));
    }
}
