use ratatui::style::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub title: Color,
    pub today: Color,
    pub hour_label: Color,
    pub grid_line: Color,
    pub event_bg: Color,
    pub event_fg: Color,
    pub band_bg: Color,
    pub now_marker: Color,
    pub dialog_border: Color,
    pub status_bar: Color,
    pub error: Color,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            name: "default".to_string(),
            title: Color::Cyan,
            today: Color::Green,
            hour_label: Color::Yellow,
            grid_line: Color::DarkGray,
            event_bg: Color::Blue,
            event_fg: Color::White,
            band_bg: Color::Magenta,
            now_marker: Color::Red,
            dialog_border: Color::Cyan,
            status_bar: Color::White,
            error: Color::Red,
        }
    }

    pub fn gruvbox() -> Self {
        Self {
            name: "gruvbox".to_string(),
            title: Color::Rgb(251, 184, 108),
            today: Color::Rgb(184, 187, 38),
            hour_label: Color::Rgb(254, 128, 25),
            grid_line: Color::Rgb(80, 73, 69),
            event_bg: Color::Rgb(69, 133, 136),
            event_fg: Color::Rgb(235, 219, 178),
            band_bg: Color::Rgb(177, 98, 134),
            now_marker: Color::Rgb(251, 73, 52),
            dialog_border: Color::Rgb(251, 184, 108),
            status_bar: Color::Rgb(235, 219, 178),
            error: Color::Rgb(251, 73, 52),
        }
    }

    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            title: Color::Rgb(136, 192, 208),
            today: Color::Rgb(163, 190, 140),
            hour_label: Color::Rgb(235, 203, 139),
            grid_line: Color::Rgb(67, 76, 94),
            event_bg: Color::Rgb(94, 129, 172),
            event_fg: Color::Rgb(236, 239, 244),
            band_bg: Color::Rgb(180, 142, 173),
            now_marker: Color::Rgb(191, 97, 106),
            dialog_border: Color::Rgb(136, 192, 208),
            status_bar: Color::Rgb(216, 222, 233),
            error: Color::Rgb(191, 97, 106),
        }
    }

    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            title: Color::Rgb(139, 233, 253),
            today: Color::Rgb(80, 250, 123),
            hour_label: Color::Rgb(241, 250, 140),
            grid_line: Color::Rgb(68, 71, 90),
            event_bg: Color::Rgb(98, 114, 164),
            event_fg: Color::Rgb(248, 248, 242),
            band_bg: Color::Rgb(189, 147, 249),
            now_marker: Color::Rgb(255, 85, 85),
            dialog_border: Color::Rgb(255, 121, 198),
            status_bar: Color::Rgb(248, 248, 242),
            error: Color::Rgb(255, 85, 85),
        }
    }

    pub fn get_by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "gruvbox" => Self::gruvbox(),
            "nord" => Self::nord(),
            "dracula" => Self::dracula(),
            _ => Self::default_theme(),
        }
    }

    pub fn available_themes() -> Vec<&'static str> {
        vec!["default", "gruvbox", "nord", "dracula"]
    }

    /// Background for an event block: its own `#rrggbb` colour when it has
    /// a parsable one, the theme colour otherwise.
    pub fn event_color(&self, color: Option<&str>) -> Color {
        color.and_then(parse_hex_color).unwrap_or(self.event_bg)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_theme_falls_back_to_default() {
        assert_eq!(Theme::get_by_name("sepia"), Theme::default_theme());
    }

    #[test]
    fn theme_lookup_ignores_case() {
        assert_eq!(Theme::get_by_name("Nord").name, "nord");
    }

    #[test]
    fn every_listed_theme_resolves_to_itself() {
        for name in Theme::available_themes() {
            assert_eq!(Theme::get_by_name(name).name, name);
        }
    }

    #[test]
    fn hex_colors_parse_to_rgb() {
        assert_eq!(parse_hex_color("#ab2d2d"), Some(Color::Rgb(0xab, 0x2d, 0x2d)));
        assert_eq!(parse_hex_color("ab2d2d"), None);
        assert_eq!(parse_hex_color("#abc"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn event_color_falls_back_to_theme() {
        let theme = Theme::default_theme();

        assert_eq!(theme.event_color(None), Color::Blue);
        assert_eq!(theme.event_color(Some("red")), Color::Blue);
        assert_eq!(theme.event_color(Some("#000000")), Color::Rgb(0, 0, 0));
    }
}
