use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::format::format_count;
use crate::system::stat::CpuSnapshot;
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, snapshot: &CpuSnapshot, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Counters ",
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let rows = [
        ("Interrupts", snapshot.interrupts),
        ("Ctx switches", snapshot.context_switches),
        ("Processes", snapshot.processes),
        ("Running", snapshot.procs_running),
        ("Blocked", snapshot.procs_blocked),
    ];

    let lines: Vec<Line> = rows
        .iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(
                    format!(" {label:<13}"),
                    Style::default().fg(theme.text_secondary),
                ),
                Span::styled(
                    format_count(*value),
                    Style::default().fg(theme.text_primary),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
