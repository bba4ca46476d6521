use tui::style::{Color, Modifier, Style};

/// Semantic colors used across the bracket and scoreboard views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiColor {
    /// Active player / live match accents.
    Primary,
    /// Headers and prompts.
    Accent,
    /// Connectors, placeholders, secondary text.
    Dim,
    /// Decided winners and checkout banners.
    Winner,
    /// Bust notifications and errors.
    Danger,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum UiTheme {
    #[default]
    Dark,
}

pub fn resolve(color: UiColor, _theme: UiTheme) -> Style {
    match color {
        UiColor::Primary => Style::default().fg(Color::Rgb(0, 160, 90)),
        UiColor::Accent => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        UiColor::Dim => Style::default().fg(Color::Indexed(240)),
        UiColor::Winner => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        UiColor::Danger => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}
