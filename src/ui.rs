use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::clock::Clock;
use crate::controller::Controller;
use crate::session::Phase;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const MIN_INPUT_WIDTH: u16 = 24;

impl<C: Clock> Widget for &Controller<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // buttons
                Constraint::Min(3),    // display
                Constraint::Length(3), // response input
                Constraint::Length(1), // status
                Constraint::Length(1), // legend
            ])
            .split(area);

        let button = |label: &str, enabled: bool, color: Color| {
            let style = if enabled {
                Style::default().patch(bold_style).fg(color)
            } else {
                dim_style
            };
            Span::styled(format!("[ {label} ]"), style)
        };

        Paragraph::new(Line::from(vec![
            button("Start", self.start_enabled(), Color::Green),
            Span::raw("  "),
            button("Submit", self.submit_enabled(), Color::Yellow),
            Span::raw("  "),
            button(self.mode_button_label(), true, Color::Cyan),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        // a revealed character is the only thing on screen that should stand out
        let display_style = match self.phase() {
            Phase::Revealing => Style::default().patch(bold_style).fg(Color::Magenta),
            _ => bold_style,
        };
        let display_area = chunks[1];
        let middle = Rect {
            y: display_area.y + display_area.height / 2,
            height: display_area.height.min(1),
            ..display_area
        };
        Paragraph::new(Span::styled(self.display_text(), display_style))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(middle, buf);

        if self.input_visible() {
            let text = format!("{}▏", self.input_text());
            let wanted = (text.width() as u16).saturating_add(4).max(MIN_INPUT_WIDTH);
            let width = wanted.min(chunks[2].width);
            let input_area = Rect {
                x: chunks[2].x + (chunks[2].width - width) / 2,
                width,
                ..chunks[2]
            };
            Paragraph::new(Span::styled(text, bold_style))
                .block(Block::default().borders(Borders::ALL).title("Response"))
                .alignment(Alignment::Center)
                .render(input_area, buf);
        }

        let state = self.state();
        let mut status = format!(
            "{}   stage {}   {}/{} correct   best span {}",
            state.mode, state.stage, state.rounds_correct, state.rounds_played, state.best_span
        );
        if !self.has_event_log() {
            status.push_str("   (not logging)");
        }
        Paragraph::new(Span::styled(status, dim_style))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        Paragraph::new(Span::styled(
            "(enter) start / submit   (tab) switch mode   (esc)ape",
            italic_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);
    }
}
