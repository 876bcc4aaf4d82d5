use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Dark,
    Light,
}

impl ThemeKind {
    pub fn from_config_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "light" => ThemeKind::Light,
            _ => ThemeKind::Dark,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub kind: ThemeKind,
    pub header_accent_fg: Color,
    pub header_accent_bg: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub overlay_border: Color,
    pub accent: Color,
    pub heat_low: Color,
    pub heat_mid: Color,
    pub heat_high: Color,
    pub gauge_unfilled: Color,
    pub statusbar_bg: Color,
    pub surface_bg: Color,
    pub status_err: Color,
    pub pill_key_fg: Color,
    pub pill_key_bg: Color,
    pub pill_desc_fg: Color,
}

impl Theme {
    pub fn from_config(name: &str) -> Self {
        match ThemeKind::from_config_str(name) {
            ThemeKind::Dark => Self::dark(),
            ThemeKind::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Theme {
            kind: ThemeKind::Dark,
            header_accent_fg: Color::Rgb(17, 17, 27),
            header_accent_bg: Color::Rgb(137, 180, 250),
            text_primary: Color::Rgb(205, 214, 244),
            text_secondary: Color::Rgb(166, 173, 200),
            overlay_border: Color::Rgb(88, 91, 112),
            accent: Color::Rgb(203, 166, 247),
            heat_low: Color::Rgb(166, 227, 161),
            heat_mid: Color::Rgb(249, 226, 175),
            heat_high: Color::Rgb(243, 139, 168),
            gauge_unfilled: Color::Rgb(49, 50, 68),
            statusbar_bg: Color::Rgb(24, 24, 37),
            surface_bg: Color::Rgb(30, 30, 46),
            status_err: Color::Rgb(243, 139, 168),
            pill_key_fg: Color::Rgb(17, 17, 27),
            pill_key_bg: Color::Rgb(137, 180, 250),
            pill_desc_fg: Color::Rgb(205, 214, 244),
        }
    }

    pub fn light() -> Self {
        Theme {
            kind: ThemeKind::Light,
            header_accent_fg: Color::Rgb(239, 241, 245),
            header_accent_bg: Color::Rgb(30, 102, 245),
            text_primary: Color::Rgb(76, 79, 105),
            text_secondary: Color::Rgb(108, 111, 133),
            overlay_border: Color::Rgb(172, 176, 190),
            accent: Color::Rgb(136, 57, 239),
            heat_low: Color::Rgb(64, 160, 43),
            heat_mid: Color::Rgb(223, 142, 29),
            heat_high: Color::Rgb(210, 15, 57),
            gauge_unfilled: Color::Rgb(204, 208, 218),
            statusbar_bg: Color::Rgb(230, 233, 239),
            surface_bg: Color::Rgb(239, 241, 245),
            status_err: Color::Rgb(210, 15, 57),
            pill_key_fg: Color::Rgb(239, 241, 245),
            pill_key_bg: Color::Rgb(30, 102, 245),
            pill_desc_fg: Color::Rgb(76, 79, 105),
        }
    }

    /// Gauge color for a utilization percentage.
    pub fn heat(&self, percent: f64) -> Color {
        if percent >= 80.0 {
            self.heat_high
        } else if percent >= 50.0 {
            self.heat_mid
        } else {
            self.heat_low
        }
    }
}
