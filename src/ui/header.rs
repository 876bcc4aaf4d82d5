use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::format::{format_uptime, truncate_unicode};
use crate::system::stat::CpuSnapshot;
use crate::ui::theme::Theme;

const MAX_OS_NAME_WIDTH: usize = 32;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    os_name: &str,
    snapshot: &CpuSnapshot,
    now: DateTime<Utc>,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (booted, uptime) = match snapshot.boot_time {
        Some(boot) => (
            boot.format("%Y-%m-%d %H:%M UTC").to_string(),
            format_uptime(now - boot),
        ),
        None => ("-".to_string(), "-".to_string()),
    };

    let spans = vec![
        Span::styled(
            " ptop ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            truncate_unicode(os_name, MAX_OS_NAME_WIDTH),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Booted {booted}"),
            Style::default().fg(theme.text_secondary),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Up {uptime}"),
            Style::default().fg(theme.text_secondary),
        ),
    ];

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}
