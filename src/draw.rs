use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::bracket::{BracketGrid, BracketTreeView};
use crate::components::theme::{UiColor, UiTheme, resolve};
use crate::state::app_state::{ScoreEntry, SeedingMode};
use crate::ui::layout::LayoutAreas;
use darts_engine::{GamePlayerState, GameState, round_name};

static TABS: &[&str; 3] = &["Bracket", "Game", "Players"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    terminal
        .draw(|f| {
            if app.state.show_intro {
                draw_intro(f, f.area());
                return;
            }

            layout.update(f.area(), app.settings.full_screen);

            if !app.settings.full_screen {
                draw_tabs(f, layout.tab_bar, app);
            }

            match app.state.active_tab {
                MenuItem::Bracket => draw_bracket(f, layout.main, app),
                MenuItem::Game => draw_game(f, layout.main, app),
                MenuItem::Players => draw_players(f, layout.main, app),
                MenuItem::Help => draw_help(f, layout.main),
            }

            if app.state.show_logs {
                draw_logs(f, layout.main);
            }

            draw_status(f, layout.status, app);
        })
        .unwrap();
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

// ---------------------------------------------------------------------------
// Intro / chrome
// ---------------------------------------------------------------------------

const INTRO_TITLE: &str = r"
 ____    _    ____ _____ _____ _   _ ___
|  _ \  / \  |  _ \_   _|_   _| | | |_ _|
| | | |/ _ \ | |_) || |   | | | | | || |
| |_| / ___ \|  _ < | |   | | | |_| || |
|____/_/   \_\_| \_\|_|   |_|  \___/|___|
";

fn draw_intro(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" darttui ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [_top_pad, title_area, tagline_area, prompt_area, _bottom_pad] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(6),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    f.render_widget(
        Paragraph::new(INTRO_TITLE)
            .style(resolve(UiColor::Primary, UiTheme::Dark))
            .alignment(Alignment::Center),
        title_area,
    );
    f.render_widget(
        Paragraph::new("brackets and 301/501 scoring at the terminal oche")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        tagline_area,
    );
    f.render_widget(
        Paragraph::new("Press Enter to start")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        prompt_area,
    );
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Bracket | MenuItem::Help => 0,
        MenuItem::Game => 1,
        MenuItem::Players => 2,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 {
        return;
    }
    if let Some(toast) = &app.state.toast {
        f.render_widget(
            Paragraph::new(toast.message.as_str())
                .style(resolve(toast.color, UiTheme::Dark))
                .alignment(Alignment::Center),
            area,
        );
        return;
    }
    let hint = match (app.state.active_tab, app.state.bracket.in_setup()) {
        (MenuItem::Bracket, true) => {
            "j/k=move  Space=pick  a/n=all/none  s=shuffle  m=mode  Enter=generate  ?=help"
        }
        (MenuItem::Bracket, false) => "h/j/k/l=navigate  1/2=winner  r=new draw  ?=help  q=quit",
        (MenuItem::Game, _) => "digits+s/d/t+Enter=dart  b/o/m=bull/25/miss  u=undo  ?=help",
        (MenuItem::Players, _) => "j/k=move  a=add  d=remove  ?=help  q=quit",
        (MenuItem::Help, _) => "Esc=back",
    };
    f.render_widget(
        Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = "\
Tabs        1=Bracket  2=Game  3=Players  Tab=cycle  ?=help  q=quit

Bracket     setup: j/k move, Space pick, a/n all/none, s shuffle,
            m seeding mode, c clear pairings, Enter generate
            live:  h/l round, j/k match, 1/2 pick winner,
            Ctrl-d/Ctrl-u scroll, r back to setup

Scores      after 1/2: type winner legs, Tab, loser legs, Enter
            (Enter with empty fields records the win without a score)

Game        setup: j/k move, Space assign player, h/l variant, Enter start
            live:  type segment digits, s/d/t multiplier, Enter register,
            b=bullseye  o=outer bull  m=miss  u=undo  n=new game

Players     j/k move, a add custom player, d remove (custom only)

Global      f=fullscreen  \"=logs";
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Gray)),
        inner,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let [_, logs] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(10)]).areas(area);
    f.render_widget(Clear, logs);
    let widget = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(widget, logs);
}

// ---------------------------------------------------------------------------
// Bracket tab
// ---------------------------------------------------------------------------

fn draw_bracket(f: &mut Frame, area: Rect, app: &App) {
    if app.state.bracket.in_setup() {
        draw_bracket_setup(f, area, app);
    } else {
        draw_bracket_live(f, area, app);
    }
}

fn draw_bracket_setup(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Bracket - New Tournament ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [list_area, side_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(inner);

    let setup = &app.state.bracket;
    let roster = &app.state.players.roster;

    let mut lines = Vec::with_capacity(roster.players.len());
    for (idx, player) in roster.players.iter().enumerate() {
        let cursor = if idx == setup.setup_cursor { '>' } else { ' ' };
        let mark = match setup.seeding {
            SeedingMode::Random => {
                if setup.selected_entrants.contains(&idx) {
                    "[x]"
                } else {
                    "[ ]"
                }
            }
            SeedingMode::Custom => {
                if setup.custom_picked(&player.name) {
                    "[#]"
                } else {
                    "[ ]"
                }
            }
        };
        let style = if idx == setup.setup_cursor {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(
            format!("{cursor} {mark} {} ({})", player.name, player.country),
            style,
        )));
    }
    let visible = list_area.height as usize;
    let offset = setup.setup_cursor.saturating_sub(visible.saturating_sub(1));
    let window: Vec<Line> = lines.into_iter().skip(offset).take(visible).collect();
    f.render_widget(Paragraph::new(window), list_area);

    let mut side = Vec::new();
    let mode = match setup.seeding {
        SeedingMode::Random => "random draw",
        SeedingMode::Custom => "custom pairings",
    };
    side.push(Line::from(format!("Seeding: {mode}  (m to switch)")));
    match setup.seeding {
        SeedingMode::Random => {
            side.push(Line::from(format!(
                "Shuffle: {}  (s to toggle)",
                if setup.shuffle_enabled { "on" } else { "off" }
            )));
            side.push(Line::from(format!(
                "Entrants: {}",
                setup.selected_entrants.len()
            )));
        }
        SeedingMode::Custom => {
            side.push(Line::from(format!("Pairings: {}", setup.matchups.len())));
            for m in &setup.matchups {
                side.push(Line::from(Span::styled(
                    format!("  {} vs {}", m.player1, m.player2),
                    Style::default().fg(Color::Gray),
                )));
            }
            if let Some(pending) = &setup.pending_pick {
                side.push(Line::from(Span::styled(
                    format!("  {pending} vs ..."),
                    resolve(UiColor::Accent, UiTheme::Dark),
                )));
            }
        }
    }
    side.push(Line::from(""));
    side.push(Line::from(Span::styled(
        "Enter generates the bracket",
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(Paragraph::new(side), side_area);
}

fn draw_bracket_live(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Bracket ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(bs) = app.state.bracket.bracket.as_ref() else {
        return;
    };

    let [header, content] =
        Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);

    let (total, completed) = bs.match_stats();
    let selected = app.state.bracket.selected;
    let generated = app.state.bracket.generated_at.as_deref().unwrap_or("--:--");
    let header_text = format!(
        "{} entrants | {} | {completed}/{total} matches decided | drawn {generated}",
        bs.entrant_names.len(),
        round_name(selected.round, bs.total_rounds),
    );
    f.render_widget(Paragraph::new(header_text), header);

    let grid = BracketGrid::compute(bs.total_rounds, content.width);
    f.render_widget(
        BracketTreeView {
            state: bs,
            grid: &grid,
            selected,
            scroll_offset: app.state.bracket.scroll_offset,
            theme: UiTheme::Dark,
        },
        content,
    );

    if let Some(entry) = &app.state.bracket.score_entry {
        draw_score_entry_modal(f, inner, entry);
    }
    if let Some(champion) = app.state.bracket.champion.as_deref() {
        draw_champion_overlay(f, inner, champion);
    }
}

fn draw_score_entry_modal(f: &mut Frame, area: Rect, entry: &ScoreEntry) {
    let modal = centered_rect(area, 40, 8);
    f.render_widget(Clear, modal);
    let block = default_border(Color::Yellow).title(" Record Result ");
    let inner = block.inner(modal);
    f.render_widget(block, modal);

    let active = resolve(UiColor::Accent, UiTheme::Dark);
    let idle = Style::default().fg(Color::Gray);

    let lines = vec![
        Line::from(Span::styled(
            format!("{} beats {}", entry.winner_name, entry.loser_name),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} legs: {}_", entry.winner_name, entry.winner_score),
            if entry.editing_loser { idle } else { active },
        )),
        Line::from(Span::styled(
            format!("{} legs: {}_", entry.loser_name, entry.loser_score),
            if entry.editing_loser { active } else { idle },
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Tab=switch  Enter=save  Esc=cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_champion_overlay(f: &mut Frame, area: Rect, champion: &str) {
    let modal = centered_rect(area, 44, 7);
    f.render_widget(Clear, modal);
    let block = default_border(Color::Green).title(" Champion ");
    let inner = block.inner(modal);
    f.render_widget(block, modal);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("🏆  {champion}  🏆"),
            resolve(UiColor::Winner, UiTheme::Dark),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter=close  r=new tournament",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        inner,
    );
}

// ---------------------------------------------------------------------------
// Game tab
// ---------------------------------------------------------------------------

fn draw_game(f: &mut Frame, area: Rect, app: &App) {
    match app.state.game.game.as_ref() {
        None => draw_game_setup(f, area, app),
        Some(game) => draw_game_live(f, area, app, game),
    }
}

fn draw_game_setup(f: &mut Frame, area: Rect, app: &App) {
    let tab = &app.state.game;
    let block =
        default_border(Color::White).title(format!(" Game - {} ", tab.variant.label()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [list_area, side_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(inner);

    let roster = &app.state.players.roster;
    let mut lines = Vec::with_capacity(roster.players.len());
    for (idx, player) in roster.players.iter().enumerate() {
        let cursor = if idx == tab.setup_cursor { '>' } else { ' ' };
        let slot = if tab.pick1 == Some(idx) {
            "(1)"
        } else if tab.pick2 == Some(idx) {
            "(2)"
        } else {
            "   "
        };
        let style = if idx == tab.setup_cursor {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(
            format!("{cursor} {slot} {}", player.name),
            style,
        )));
    }
    let visible = list_area.height as usize;
    let offset = tab.setup_cursor.saturating_sub(visible.saturating_sub(1));
    let window: Vec<Line> = lines.into_iter().skip(offset).take(visible).collect();
    f.render_widget(Paragraph::new(window), list_area);

    let pick = |p: Option<usize>| {
        p.and_then(|i| roster.players.get(i))
            .map(|p| p.name.as_str())
            .unwrap_or("---")
            .to_string()
    };
    let side = vec![
        Line::from(format!("Variant: {}  (h/l to switch)", tab.variant.label())),
        Line::from(""),
        Line::from(format!("Player 1: {}", pick(tab.pick1))),
        Line::from(format!("Player 2: {}", pick(tab.pick2))),
        Line::from(""),
        Line::from(Span::styled(
            "Space assigns, Enter throws the first dart",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(side), side_area);
}

fn draw_game_live(f: &mut Frame, area: Rect, app: &App, game: &GameState) {
    let block = default_border(Color::White).title(format!(
        " {} - round {} ",
        game.variant.label(),
        game.round_number
    ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [panels, keypad] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(inner);
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(panels);

    draw_player_panel(f, left, game, 0);
    draw_player_panel(f, right, game, 1);
    draw_keypad(f, keypad, app, game);

    if app.state.game.show_winner
        && let Some(winner) = game.winner_name.as_deref()
    {
        let modal = centered_rect(inner, 44, 7);
        f.render_widget(Clear, modal);
        let block = default_border(Color::Green).title(" Game Shot ");
        let modal_inner = block.inner(modal);
        f.render_widget(block, modal);
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{winner} takes it"),
                resolve(UiColor::Winner, UiTheme::Dark),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Enter=close  n=new game  u=undo last dart",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), modal_inner);
    }
}

fn draw_player_panel(f: &mut Frame, area: Rect, game: &GameState, idx: usize) {
    let player: &GamePlayerState = &game.players[idx];
    let at_oche = game.current_player == idx && !game.is_finished;
    let border = if at_oche {
        resolve(UiColor::Primary, UiTheme::Dark)
            .fg
            .unwrap_or(Color::Green)
    } else {
        Color::DarkGray
    };
    let block = default_border(border).title(format!(" {} ", player.name));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{:>5}", player.score),
            Style::default()
                .fg(if at_oche { Color::White } else { Color::Gray })
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("darts   {}", player.darts_thrown)),
        Line::from(format!("3-dart  {:.2}", player.average())),
    ];
    if at_oche {
        let mut turn = String::from("turn    ");
        for d in &game.turn_darts {
            turn.push_str(&d.label);
            turn.push(' ');
        }
        for _ in game.turn_darts.len()..3 {
            turn.push_str("_ ");
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{turn} ({})", game.turn_total()),
            Style::default().fg(Color::White),
        )));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_keypad(f: &mut Frame, area: Rect, app: &App, game: &GameState) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if game.is_finished {
        f.render_widget(
            Paragraph::new("game over - n starts a new one, u undoes the checkout")
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let tab = &app.state.game;
    let input = if tab.number_input.is_empty() {
        "_".to_string()
    } else {
        tab.number_input.clone()
    };
    let line = Line::from(vec![
        Span::styled("next dart: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{}{input}", tab.multiplier.prefix()),
            resolve(UiColor::Accent, UiTheme::Dark),
        ),
        Span::styled(
            format!(
                "   dart {}/3   s/d/t multiplier, Enter registers",
                game.current_dart + 1
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(line), inner);
}

// ---------------------------------------------------------------------------
// Players tab
// ---------------------------------------------------------------------------

fn draw_players(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Players ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [list_area, input_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(2)]).areas(inner);

    let tab = &app.state.players;
    let mut lines = Vec::with_capacity(tab.roster.players.len());
    for (idx, player) in tab.roster.players.iter().enumerate() {
        let cursor = if idx == tab.selected { '>' } else { ' ' };
        let tag = if player.is_custom { "custom" } else { "pro" };
        let style = if idx == tab.selected {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(
            format!("{cursor} {:<28} {}  {tag}", player.name, player.country),
            style,
        )));
    }
    let visible = list_area.height as usize;
    let offset = tab.selected.saturating_sub(visible.saturating_sub(1));
    let window: Vec<Line> = lines.into_iter().skip(offset).take(visible).collect();
    f.render_widget(Paragraph::new(window), list_area);

    let input = if tab.adding {
        format!("new player: {}_", tab.input)
    } else {
        "a adds a custom player, d removes one".to_string()
    };
    let input_style = if tab.adding {
        resolve(UiColor::Accent, UiTheme::Dark)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    f.render_widget(Paragraph::new(input).style(input_style), input_area);
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}
