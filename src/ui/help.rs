use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::format::truncate_unicode;
use crate::ui::theme::Theme;

const MAX_WIDTH: u16 = 48;
const LABEL_WIDTH: usize = 8;

/// What the help overlay shows: the keybinds and where samples come from.
pub struct HelpContent<'a> {
    pub keys: &'a [(String, &'static str)],
    pub source: &'a str,
    pub refresh_rate_ms: u64,
    pub cores: usize,
}

impl HelpContent<'_> {
    fn lines(&self, theme: &Theme, text_width: usize) -> Vec<Line<'static>> {
        let heading = |title: &'static str| {
            Line::from(Span::styled(
                title,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ))
        };
        let pill = Style::default()
            .fg(theme.pill_key_fg)
            .bg(theme.pill_key_bg)
            .add_modifier(Modifier::BOLD);
        let desc = Style::default().fg(theme.pill_desc_fg);

        let mut lines = vec![heading(" Keys")];
        lines.extend(self.keys.iter().map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!(" {key:>6} "), pill),
                Span::styled(format!("  {what}"), desc),
            ])
        }));

        let value_width = text_width.saturating_sub(LABEL_WIDTH + 2);
        let sampling = [
            ("source", truncate_unicode(self.source, value_width)),
            ("every", format!("{} ms", self.refresh_rate_ms)),
            ("cores", self.cores.to_string()),
        ];
        lines.push(Line::default());
        lines.push(heading(" Sampling"));
        lines.extend(sampling.into_iter().map(|(label, value)| {
            Line::from(vec![
                Span::styled(
                    format!(" {label:<width$}", width = LABEL_WIDTH),
                    Style::default().fg(theme.text_secondary),
                ),
                Span::styled(value, Style::default().fg(theme.text_primary)),
            ])
        }));
        lines
    }
}

/// Renders the help overlay centered in `area`.
pub fn render(frame: &mut Frame, area: Rect, content: &HelpContent, theme: &Theme) {
    let width = MAX_WIDTH.min(area.width.saturating_sub(4));
    let lines = content.lines(theme, usize::from(width.saturating_sub(2)));
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));

    let overlay = centered_rect(width, height, area);
    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Help ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(overlay);

    frame.render_widget(block, overlay);
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(theme.surface_bg)),
        inner,
    );
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [vert] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [horiz] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(vert);
    horiz
}
