use std::fs::File;

use chrono::{DateTime, TimeDelta, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::Action;
use crate::config::{Config, KeybindsConfig, parse_key};
use crate::system::error::StatError;
use crate::system::stat::{CpuSnapshot, StatSampler};
use crate::ui::theme::Theme;

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub refresh: KeyCode,
    pub toggle_cores: KeyCode,
    pub help: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
            toggle_cores: parse_key(&kb.toggle_cores).unwrap_or(KeyCode::Char('c')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
        }
    }

    /// Returns (key_label, description) pairs for all configurable keybinds.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.refresh), "Refresh now"),
            (key_label(self.toggle_cores), "Toggle per-core view"),
            (key_label(self.help), "Toggle help"),
            ("Ctrl+C".to_string(), "Quit (always)"),
        ]
    }
}

pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        _ => "?".to_string(),
    }
}

/// Utilization of one core over the last interval. `None` until two
/// consistent samples exist for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreUsage {
    pub id: usize,
    pub percent: Option<f64>,
}

pub struct App {
    pub running: bool,
    pub sampler: StatSampler<File>,
    pub os_name: String,
    pub show_cores: bool,
    pub show_help: bool,
    pub refresh_rate_ms: u64,
    pub theme: Theme,
    pub keybinds: ResolvedKeybinds,
    /// Last cycle error shown in the status bar.
    pub status_message: Option<String>,
    /// Set when the source itself failed; ends the loop.
    pub fatal: Option<StatError>,
    previous: Option<CpuSnapshot>,
    consistent: bool,
}

impl App {
    pub fn new(config: &Config, sampler: StatSampler<File>, os_name: String) -> Self {
        App {
            running: true,
            sampler,
            os_name,
            show_cores: config.general.show_cores,
            show_help: false,
            refresh_rate_ms: config.general.refresh_rate_ms,
            theme: Theme::from_config(&config.colors.theme),
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            status_message: None,
            fatal: None,
            previous: None,
            consistent: false,
        }
    }

    pub fn snapshot(&self) -> &CpuSnapshot {
        self.sampler.snapshot()
    }

    /// Runs one update cycle.
    ///
    /// A parse failure leaves the snapshot partially refreshed, so the
    /// utilization baseline is dropped until the next good cycle.
    pub fn refresh_data(&mut self) {
        let before = self.sampler.snapshot().clone();
        match self.sampler.update() {
            Ok(()) => {
                self.previous = self.consistent.then_some(before);
                self.consistent = true;
                self.status_message = None;
            }
            Err(err) if err.is_fatal_to_loop() => {
                tracing::error!(%err, "stat source failed, stopping");
                self.status_message = Some(err.to_string());
                self.fatal = Some(err);
                self.running = false;
            }
            Err(err) => {
                tracing::warn!(%err, "update cycle failed, snapshot may be stale");
                self.status_message = Some(err.to_string());
                self.previous = None;
                self.consistent = false;
            }
        }
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }
        if self.show_help {
            return match key.code {
                code if code == self.keybinds.quit => Action::Quit,
                KeyCode::Esc => Action::ToggleHelp,
                code if code == self.keybinds.help => Action::ToggleHelp,
                _ => Action::None,
            };
        }
        match key.code {
            code if code == self.keybinds.quit => Action::Quit,
            code if code == self.keybinds.refresh => Action::Refresh,
            code if code == self.keybinds.toggle_cores => Action::ToggleCores,
            code if code == self.keybinds.help => Action::ToggleHelp,
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Refresh => self.refresh_data(),
            Action::ToggleCores => self.show_cores = !self.show_cores,
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::None => {}
        }
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }

    pub fn package_usage(&self) -> Option<f64> {
        let now = self.snapshot().package.as_ref()?;
        let before = self.previous.as_ref()?.package.as_ref()?;
        Some(now.usage_since(before))
    }

    pub fn core_usages(&self) -> Vec<CoreUsage> {
        self.snapshot()
            .populated_cores()
            .map(|(id, now)| {
                let percent = self
                    .previous
                    .as_ref()
                    .and_then(|prev| prev.cores.get(id))
                    .and_then(Option::as_ref)
                    .map(|before| now.usage_since(before));
                CoreUsage { id, percent }
            })
            .collect()
    }

    pub fn uptime(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.snapshot().boot_time.map(|boot| now - boot)
    }
}
