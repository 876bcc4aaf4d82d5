use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Gauge, LineGauge};

use crate::app::CoreUsage;
use crate::ui::theme::Theme;

/// Package gauge on top, one line gauge per populated core below it.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    package: Option<f64>,
    cores: &[CoreUsage],
    show_cores: bool,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            format!(" CPU ({} cores) ", cores.len()),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    render_package(frame, chunks[0], package, theme);
    if show_cores {
        render_cores(frame, chunks[1], cores, theme);
    }
}

fn render_package(frame: &mut Frame, area: Rect, usage: Option<f64>, theme: &Theme) {
    let percent = usage.unwrap_or(0.0);
    let label = match usage {
        Some(p) => format!("Package {p:5.1}%"),
        None => "Package   --".to_string(),
    };
    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(theme.heat(percent))
                .bg(theme.gauge_unfilled),
        )
        .ratio(ratio(percent))
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_cores(frame: &mut Frame, area: Rect, cores: &[CoreUsage], theme: &Theme) {
    if area.height == 0 || cores.is_empty() {
        return;
    }

    // Two columns once there are more cores than rows.
    let columns: u16 = if cores.len() > usize::from(area.height) { 2 } else { 1 };
    let col_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, u32::from(columns)); usize::from(columns)])
        .split(area);

    let per_column = usize::from(area.height);
    for (col_idx, col_area) in col_areas.iter().enumerate() {
        let start = col_idx * per_column;
        for (row, core) in cores.iter().skip(start).take(per_column).enumerate() {
            let row_area = Rect {
                x: col_area.x,
                y: col_area.y + row as u16,
                width: col_area.width,
                height: 1,
            };
            frame.render_widget(core_gauge(core, theme), row_area);
        }
    }
}

fn core_gauge<'a>(core: &CoreUsage, theme: &Theme) -> LineGauge<'a> {
    let percent = core.percent.unwrap_or(0.0);
    let label = match core.percent {
        Some(p) => format!("cpu{:<3} {p:5.1}%", core.id),
        None => format!("cpu{:<3}    --", core.id),
    };
    LineGauge::default()
        .filled_style(Style::default().fg(theme.heat(percent)))
        .unfilled_style(Style::default().fg(theme.gauge_unfilled))
        .ratio(ratio(percent))
        .label(label)
}

fn ratio(percent: f64) -> f64 {
    (percent / 100.0).clamp(0.0, 1.0)
}
