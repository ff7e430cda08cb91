use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

/// All available built-in theme names.
pub const BUILTIN_THEME_NAMES: &[&str] = &["default", "gruvbox", "nord"];

/// Data-driven theme: every color in one struct.
/// Constructed from built-in presets or loaded from TOML files.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // ── Brand / Primary ──────────────────────────────────────
    pub accent: Color,
    pub accent_secondary: Color,
    pub bg_dark: Color,

    // ── Text ─────────────────────────────────────────────────
    pub text_primary: Color,
    pub text_dim: Color,
    pub text_muted: Color,

    // ── Semantic ─────────────────────────────────────────────
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub info: Color,

    // ── Borders ──────────────────────────────────────────────
    pub border: Color,

    // ── Charts ───────────────────────────────────────────────
    pub bar: Color,
    pub bar_highlight: Color,
    pub heart_line: Color,
    pub weight_line: Color,
    pub zone_line: Color,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────

    /// Default dark palette.
    pub fn default_dark() -> Self {
        Self {
            name: "default".to_string(),
            accent: Color::Rgb(99, 179, 237),
            accent_secondary: Color::Rgb(129, 230, 217),
            bg_dark: Color::Rgb(22, 22, 30),
            text_primary: Color::Rgb(220, 220, 235),
            text_dim: Color::Rgb(120, 120, 145),
            text_muted: Color::Rgb(80, 80, 100),
            success: Color::Rgb(72, 199, 142),
            warning: Color::Rgb(255, 193, 69),
            danger: Color::Rgb(255, 85, 85),
            info: Color::Rgb(99, 179, 237),
            border: Color::Rgb(55, 55, 75),
            bar: Color::Rgb(255, 110, 110),
            bar_highlight: Color::Rgb(255, 193, 69),
            heart_line: Color::Rgb(255, 215, 90),
            weight_line: Color::Rgb(129, 230, 217),
            zone_line: Color::Rgb(80, 80, 100),
        }
    }

    /// Gruvbox dark palette.
    pub fn gruvbox() -> Self {
        Self {
            name: "gruvbox".to_string(),
            accent: Color::Rgb(215, 153, 33),            // yellow
            accent_secondary: Color::Rgb(142, 192, 124), // green
            bg_dark: Color::Rgb(40, 40, 40),             // bg0
            text_primary: Color::Rgb(235, 219, 178),     // fg
            text_dim: Color::Rgb(168, 153, 132),         // fg4
            text_muted: Color::Rgb(102, 92, 84),         // bg4
            success: Color::Rgb(142, 192, 124),
            warning: Color::Rgb(250, 189, 47),
            danger: Color::Rgb(251, 73, 52),
            info: Color::Rgb(131, 165, 152),
            border: Color::Rgb(80, 73, 69),
            bar: Color::Rgb(251, 73, 52),
            bar_highlight: Color::Rgb(250, 189, 47),
            heart_line: Color::Rgb(254, 128, 25),
            weight_line: Color::Rgb(131, 165, 152),
            zone_line: Color::Rgb(102, 92, 84),
        }
    }

    /// Nord palette.
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            accent: Color::Rgb(136, 192, 208),           // nord8 frost
            accent_secondary: Color::Rgb(143, 188, 187), // nord7
            bg_dark: Color::Rgb(46, 52, 64),             // nord0
            text_primary: Color::Rgb(229, 233, 240),     // nord5
            text_dim: Color::Rgb(182, 191, 204),
            text_muted: Color::Rgb(107, 112, 127),
            success: Color::Rgb(163, 190, 140), // nord14
            warning: Color::Rgb(235, 203, 139), // nord13
            danger: Color::Rgb(191, 97, 106),   // nord11
            info: Color::Rgb(129, 161, 193),    // nord9
            border: Color::Rgb(76, 86, 106),    // nord3
            bar: Color::Rgb(191, 97, 106),
            bar_highlight: Color::Rgb(235, 203, 139),
            heart_line: Color::Rgb(208, 135, 112), // nord12
            weight_line: Color::Rgb(143, 188, 187),
            zone_line: Color::Rgb(76, 86, 106),
        }
    }

    /// Look up a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default_dark()),
            "gruvbox" => Some(Self::gruvbox()),
            "nord" => Some(Self::nord()),
            _ => None,
        }
    }

    /// Cycle to the next built-in theme.
    pub fn next_builtin(&self) -> Self {
        let idx = BUILTIN_THEME_NAMES
            .iter()
            .position(|&n| n == self.name)
            .unwrap_or(0);
        let next_idx = (idx + 1) % BUILTIN_THEME_NAMES.len();
        Self::by_name(BUILTIN_THEME_NAMES[next_idx]).unwrap_or_default()
    }

    /// Load a custom theme from a TOML file, falling back to default for missing fields.
    pub fn from_toml_file(path: &std::path::Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        let file: ThemeFile = toml::from_str(&content).ok()?;
        Some(
            file.into_theme(
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("custom"),
            ),
        )
    }

    /// Built-in theme by name, then `~/.config/vitus/themes/<name>.toml`,
    /// then the default palette.
    pub fn resolve(name: &str) -> Self {
        Self::by_name(name)
            .or_else(|| Self::from_toml_file(&crate::constants::custom_theme_path(name)))
            .unwrap_or_default()
    }

    // ── Computed Styles ──────────────────────────────────────

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_active_style(&self) -> Style {
        Style::default()
            .fg(self.bg_dark)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive_style(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_highlight_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Border style for a pane, highlighted when it owns focus.
    pub fn pane_border(&self, focused: bool) -> Style {
        if focused {
            self.border_highlight_style()
        } else {
            self.border_style()
        }
    }

    pub fn bar_style(&self) -> Style {
        Style::default().fg(self.bar)
    }

    pub fn bar_highlight_style(&self) -> Style {
        Style::default()
            .fg(self.bar_highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Plain readings in side panels.
    pub fn value_style(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    /// Aggregates such as a day's step total.
    pub fn total_style(&self) -> Style {
        Style::default()
            .fg(self.accent_secondary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.danger).add_modifier(Modifier::BOLD)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.text_dim)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}

// ── TOML deserialization for custom themes ──────────────────

/// Intermediate struct for parsing theme TOML files.
/// All fields are optional; missing fields inherit from the default theme.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ThemeFile {
    accent: Option<String>,
    accent_secondary: Option<String>,
    bg_dark: Option<String>,
    text_primary: Option<String>,
    text_dim: Option<String>,
    text_muted: Option<String>,
    success: Option<String>,
    warning: Option<String>,
    danger: Option<String>,
    info: Option<String>,
    border: Option<String>,
    bar: Option<String>,
    bar_highlight: Option<String>,
    heart_line: Option<String>,
    weight_line: Option<String>,
    zone_line: Option<String>,
}

impl ThemeFile {
    fn into_theme(self, name: &str) -> Theme {
        let base = Theme::default_dark();
        Theme {
            name: name.to_string(),
            accent: parse_color(&self.accent).unwrap_or(base.accent),
            accent_secondary: parse_color(&self.accent_secondary).unwrap_or(base.accent_secondary),
            bg_dark: parse_color(&self.bg_dark).unwrap_or(base.bg_dark),
            text_primary: parse_color(&self.text_primary).unwrap_or(base.text_primary),
            text_dim: parse_color(&self.text_dim).unwrap_or(base.text_dim),
            text_muted: parse_color(&self.text_muted).unwrap_or(base.text_muted),
            success: parse_color(&self.success).unwrap_or(base.success),
            warning: parse_color(&self.warning).unwrap_or(base.warning),
            danger: parse_color(&self.danger).unwrap_or(base.danger),
            info: parse_color(&self.info).unwrap_or(base.info),
            border: parse_color(&self.border).unwrap_or(base.border),
            bar: parse_color(&self.bar).unwrap_or(base.bar),
            bar_highlight: parse_color(&self.bar_highlight).unwrap_or(base.bar_highlight),
            heart_line: parse_color(&self.heart_line).unwrap_or(base.heart_line),
            weight_line: parse_color(&self.weight_line).unwrap_or(base.weight_line),
            zone_line: parse_color(&self.zone_line).unwrap_or(base.zone_line),
        }
    }
}

/// Parse a hex color string like "#FF8800" or "FF8800" into a ratatui Color.
fn parse_color(opt: &Option<String>) -> Option<Color> {
    let s = opt.as_ref()?;
    let hex = s.trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── parse_color ───────────────────────────────────────────────

    #[test]
    fn parse_color_with_and_without_hash() {
        assert_eq!(parse_color(&Some("#FF8800".to_string())), Some(Color::Rgb(255, 136, 0)));
        assert_eq!(parse_color(&Some("ff8800".to_string())), Some(Color::Rgb(255, 136, 0)));
    }

    #[test]
    fn parse_color_rejects_bad_input() {
        assert_eq!(parse_color(&None), None);
        assert_eq!(parse_color(&Some("#FFF".to_string())), None);
        assert_eq!(parse_color(&Some("#GGHHII".to_string())), None);
    }

    #[test]
    fn parse_color_rejects_multibyte_input() {
        // Six bytes, but not six characters.
        assert_eq!(parse_color(&Some("aééb".to_string())), None);
        assert_eq!(parse_color(&Some("#ff€f".to_string())), None);
    }

    // ── by_name / cycling ─────────────────────────────────────────

    #[test]
    fn by_name_all_builtins() {
        for &name in BUILTIN_THEME_NAMES {
            let theme = Theme::by_name(name);
            assert!(theme.is_some(), "Theme '{}' should exist", name);
            assert_eq!(theme.unwrap().name, name);
        }
        assert!(Theme::by_name("Gruvbox").is_some());
        assert!(Theme::by_name("nonexistent").is_none());
    }

    #[test]
    fn next_builtin_wraps_around() {
        let mut theme = Theme::default_dark();
        for _ in 0..BUILTIN_THEME_NAMES.len() {
            theme = theme.next_builtin();
        }
        assert_eq!(theme.name, "default");
    }

    #[test]
    fn panel_styles_use_palette() {
        let theme = Theme::by_name("gruvbox").unwrap();
        assert_eq!(theme.value_style().fg, Some(theme.text_primary));
        assert_eq!(theme.total_style().fg, Some(theme.accent_secondary));
    }

    // ── Custom themes ─────────────────────────────────────────────

    #[test]
    fn toml_theme_overrides_and_inherits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sunset.toml");
        std::fs::write(&path, "bar = \"#112233\"\naccent = \"#abcdef\"\n").unwrap();

        let theme = Theme::from_toml_file(&path).unwrap();
        let base = Theme::default_dark();
        assert_eq!(theme.name, "sunset");
        assert_eq!(theme.bar, Color::Rgb(0x11, 0x22, 0x33));
        assert_eq!(theme.accent, Color::Rgb(0xab, 0xcd, 0xef));
        assert_eq!(theme.heart_line, base.heart_line);
    }

    #[test]
    fn toml_theme_with_multibyte_color_keeps_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "bar = \"aééb\"\n").unwrap();

        let theme = Theme::from_toml_file(&path).unwrap();
        assert_eq!(theme.bar, Theme::default_dark().bar);
    }

    #[test]
    fn resolve_unknown_falls_back_to_default() {
        assert_eq!(Theme::resolve("no-such-theme-anywhere").name, "default");
        assert_eq!(Theme::resolve("nord").name, "nord");
    }

    #[test]
    fn pane_border_highlights_focus() {
        let t = Theme::default_dark();
        assert_eq!(t.pane_border(true), t.border_highlight_style());
        assert_eq!(t.pane_border(false), t.border_style());
    }
}
