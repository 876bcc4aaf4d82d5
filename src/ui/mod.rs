pub mod counters;
pub mod cpu;
pub mod header;
pub mod help;
pub mod statusbar;
pub mod theme;

use chrono::Utc;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;

const COUNTERS_WIDTH: u16 = 30;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(
        frame,
        chunks[0],
        &app.os_name,
        app.snapshot(),
        Utc::now(),
        &app.theme,
    );

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(COUNTERS_WIDTH)])
        .split(chunks[1]);

    cpu::render(
        frame,
        body[0],
        app.package_usage(),
        &app.core_usages(),
        app.show_cores,
        &app.theme,
    );
    counters::render(frame, body[1], app.snapshot(), &app.theme);

    statusbar::render(
        frame,
        chunks[2],
        app.status_message.as_deref(),
        &app.keybinds,
        &app.theme,
    );

    // Help overlay is drawn last so it sits on top
    if app.show_help {
        let keys = app.help_entries();
        let content = help::HelpContent {
            keys: &keys,
            source: app.sampler.label(),
            refresh_rate_ms: app.refresh_rate_ms,
            cores: app.snapshot().populated_cores().count(),
        };
        help::render(frame, frame.area(), &content, &app.theme);
    }
}
