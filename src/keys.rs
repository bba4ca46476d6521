use crate::app::{App, MenuItem};
use crate::components::bracket::BracketGrid;
use crate::state::app_state::SeedingMode;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use darts_engine::{Dart, Multiplier, Side};
use std::sync::Arc;
use tokio::sync::Mutex;

pub async fn handle_key_bindings(key_event: KeyEvent, app: &Arc<Mutex<App>>) {
    let mut guard = app.lock().await;

    if guard.state.show_intro {
        match (key_event.code, key_event.modifiers) {
            (KeyCode::Enter, _) => guard.dismiss_intro(),
            (Char('q'), _) | (Char('c'), KeyModifiers::CONTROL) => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            _ => {}
        }
        return;
    }

    // Text-entry modals swallow everything except their own keys, so typed
    // letters never trigger bindings underneath.
    if guard.state.players.adding {
        match key_event.code {
            KeyCode::Enter => guard.commit_add_player(),
            KeyCode::Esc => guard.cancel_add_player(),
            KeyCode::Backspace => {
                guard.state.players.input.pop();
            }
            Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                guard.state.players.input.push(c);
            }
            _ => {}
        }
        return;
    }

    if guard.state.bracket.score_entry.is_some() {
        match key_event.code {
            KeyCode::Enter => guard.confirm_score_entry(),
            KeyCode::Esc => guard.cancel_score_entry(),
            KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
                if let Some(entry) = &mut guard.state.bracket.score_entry {
                    entry.toggle_field();
                }
            }
            KeyCode::Backspace => {
                if let Some(entry) = &mut guard.state.bracket.score_entry {
                    entry.backspace();
                }
            }
            Char(c) if c.is_ascii_digit() => {
                if let Some(entry) = &mut guard.state.bracket.score_entry {
                    entry.push_digit(c);
                }
            }
            _ => {}
        }
        return;
    }

    if guard.state.bracket.champion.is_some() && guard.state.active_tab == MenuItem::Bracket {
        match key_event.code {
            KeyCode::Enter | KeyCode::Esc => guard.dismiss_champion(),
            Char('q') => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            Char('r') => {
                guard.dismiss_champion();
                guard.reset_bracket();
            }
            _ => {}
        }
        return;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Globals that must stay reachable even mid-game
        (_, KeyCode::Tab, _) => {
            let next = match guard.state.active_tab {
                MenuItem::Bracket => MenuItem::Game,
                MenuItem::Game => MenuItem::Players,
                MenuItem::Players | MenuItem::Help => MenuItem::Bracket,
            };
            guard.update_tab(next);
        }
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        // Live-game keypad and winner overlay. These arms sit above the
        // number-key tab switching so digits reach the scorer.
        (MenuItem::Game, code, modifiers) if !guard.state.game.in_setup() => {
            handle_live_game_key(&mut guard, code, modifiers);
        }

        // Live-bracket winner picking: 1/2 decide the selected match.
        (MenuItem::Bracket, Char('1'), _) if !guard.state.bracket.in_setup() => {
            guard.pick_winner(Side::One)
        }
        (MenuItem::Bracket, Char('2'), _) if !guard.state.bracket.in_setup() => {
            guard.pick_winner(Side::Two)
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Bracket),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Game),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Players),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Bracket setup: entrant selection and seeding controls
        (MenuItem::Bracket, Char('j') | KeyCode::Down, _) if guard.state.bracket.in_setup() => {
            let len = guard.state.players.roster.players.len();
            guard.state.bracket.setup_cursor_down(len);
        }
        (MenuItem::Bracket, Char('k') | KeyCode::Up, _) if guard.state.bracket.in_setup() => {
            guard.state.bracket.setup_cursor_up();
        }
        (MenuItem::Bracket, Char(' '), _) if guard.state.bracket.in_setup() => {
            match guard.state.bracket.seeding {
                SeedingMode::Random => {
                    let cursor = guard.state.bracket.setup_cursor;
                    guard.state.bracket.toggle_entrant(cursor);
                }
                SeedingMode::Custom => guard.custom_pick_under_cursor(),
            }
        }
        (MenuItem::Bracket, Char('a'), _) if guard.state.bracket.in_setup() => {
            let len = guard.state.players.roster.players.len();
            guard.state.bracket.select_all(len);
        }
        (MenuItem::Bracket, Char('n'), _) if guard.state.bracket.in_setup() => {
            guard.state.bracket.select_none();
        }
        (MenuItem::Bracket, Char('s'), _) if guard.state.bracket.in_setup() => {
            guard.toggle_shuffle();
        }
        (MenuItem::Bracket, Char('m'), _) if guard.state.bracket.in_setup() => {
            guard.toggle_seeding_mode();
        }
        (MenuItem::Bracket, Char('c'), _) if guard.state.bracket.in_setup() => {
            guard.state.bracket.clear_custom_picks();
        }
        (MenuItem::Bracket, KeyCode::Enter, _) if guard.state.bracket.in_setup() => {
            guard.generate_bracket();
        }

        // Live bracket navigation
        (MenuItem::Bracket, Char('l') | KeyCode::Right, _) => {
            guard.state.bracket.select_round_next()
        }
        (MenuItem::Bracket, Char('h') | KeyCode::Left, _) => {
            guard.state.bracket.select_round_prev()
        }
        (MenuItem::Bracket, Char('j') | KeyCode::Down, _) => {
            guard.state.bracket.select_next_in_round()
        }
        (MenuItem::Bracket, Char('k') | KeyCode::Up, _) => {
            guard.state.bracket.select_prev_in_round()
        }
        (MenuItem::Bracket, Char('d'), KeyModifiers::CONTROL) => {
            let max = bracket_scroll_max(&guard);
            for _ in 0..3 {
                guard.state.bracket.scroll_down(max);
            }
        }
        (MenuItem::Bracket, Char('u'), KeyModifiers::CONTROL) => {
            for _ in 0..3 {
                guard.state.bracket.scroll_up();
            }
        }
        (MenuItem::Bracket, Char('r'), _) => guard.reset_bracket(),

        // Game setup: pick two players and a variant
        (MenuItem::Game, Char('j') | KeyCode::Down, _) => {
            let len = guard.state.players.roster.players.len();
            guard.state.game.setup_cursor_down(len);
        }
        (MenuItem::Game, Char('k') | KeyCode::Up, _) => guard.state.game.setup_cursor_up(),
        (MenuItem::Game, Char('h') | Char('l') | KeyCode::Left | KeyCode::Right, _) => {
            guard.toggle_variant()
        }
        (MenuItem::Game, Char(' '), _) => {
            // Space fills the first empty oche slot.
            if guard.state.game.pick1.is_none() {
                guard.assign_game_pick(Side::One);
            } else {
                guard.assign_game_pick(Side::Two);
            }
        }
        (MenuItem::Game, KeyCode::Enter, _) => guard.start_game(),

        // Players roster
        (MenuItem::Players, Char('j') | KeyCode::Down, _) => guard.state.players.cursor_down(),
        (MenuItem::Players, Char('k') | KeyCode::Up, _) => guard.state.players.cursor_up(),
        (MenuItem::Players, Char('a'), _) => guard.open_add_player(),
        (MenuItem::Players, Char('d') | KeyCode::Delete, _) => guard.delete_selected_player(),

        _ => {}
    }
}

/// Keypad for a running 301/501 game. Digits build the segment number,
/// s/d/t set the multiplier, Enter registers the dart.
fn handle_live_game_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if app.state.game.show_winner {
        match code {
            KeyCode::Enter | KeyCode::Esc => app.state.game.show_winner = false,
            Char('n') => app.reset_game(),
            Char('u') => app.undo_throw(),
            _ => {}
        }
        return;
    }

    match (code, modifiers) {
        (Char(c), _) if c.is_ascii_digit() => app.state.game.push_digit(c),
        (KeyCode::Backspace, _) => app.state.game.backspace(),
        (Char('s'), _) => app.set_multiplier(Multiplier::Single),
        (Char('d'), _) => app.set_multiplier(Multiplier::Double),
        (Char('t'), _) => app.set_multiplier(Multiplier::Treble),
        (KeyCode::Enter, _) => app.commit_number_throw(),
        (Char('b'), _) => app.register_throw(Dart::Bull),
        (Char('o'), _) => app.register_throw(Dart::OuterBull),
        (Char('m'), _) => app.register_throw(Dart::Miss),
        (Char('u'), _) => app.undo_throw(),
        (Char('n'), _) => app.reset_game(),
        _ => {}
    }
}

fn bracket_scroll_max(app: &App) -> u16 {
    app.state
        .bracket
        .bracket
        .as_ref()
        .map(|bs| {
            BracketGrid::compute(bs.total_rounds, u16::MAX)
                .total_height
                .saturating_sub(1)
        })
        .unwrap_or(0)
}
