use crate::components::theme::UiColor;
use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, ScoreEntry, SeedingMode, Toast};
use darts_engine::{
    BracketState, Dart, GameState, Multiplier, RecordOutcome, Rejection, Side, ThrowOutcome,
};
use log::{debug, info};
use std::time::{Duration, Instant};

/// How long a toast stays on screen.
const TOAST_TTL: Duration = Duration::from_millis(2500);

/// Pause between the final being decided and the champion overlay, so the
/// last score lands visually before the banner covers it.
const CHAMPION_REVEAL_DELAY: Duration = Duration::from_millis(300);

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Bracket,
    Game,
    Players,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();

        let app = Self {
            state: AppState::new(),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn dismiss_intro(&mut self) {
        self.state.show_intro = false;
    }

    // -----------------------------------------------------------------------
    // Toast + timers — driven by the UiEvent::Tick timer
    // -----------------------------------------------------------------------

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.show_colored_toast(message, UiColor::Accent);
    }

    /// Busts and other bad news get the red treatment.
    pub fn show_danger_toast(&mut self, message: impl Into<String>) {
        self.show_colored_toast(message, UiColor::Danger);
    }

    fn show_colored_toast(&mut self, message: impl Into<String>, color: UiColor) {
        self.state.toast = Some(Toast {
            message: message.into(),
            color,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn show_rejection(&mut self, rejection: Rejection) {
        debug!("rejected: {rejection}");
        self.show_toast(rejection.to_string());
    }

    /// Expire the toast and promote a decided final to the champion overlay
    /// once its reveal delay has passed.
    pub fn advance_timers(&mut self) {
        let now = Instant::now();
        if self
            .state
            .toast
            .as_ref()
            .is_some_and(|t| now >= t.expires_at)
        {
            self.state.toast = None;
        }
        if let Some((winner, decided_at)) = &self.state.bracket.pending_champion
            && now.duration_since(*decided_at) >= CHAMPION_REVEAL_DELAY
        {
            self.state.bracket.champion = Some(winner.clone());
            self.state.bracket.pending_champion = None;
        }
    }

    // -----------------------------------------------------------------------
    // Bracket tab actions
    // -----------------------------------------------------------------------

    pub fn toggle_seeding_mode(&mut self) {
        let bracket = &mut self.state.bracket;
        bracket.seeding = match bracket.seeding {
            SeedingMode::Random => SeedingMode::Custom,
            SeedingMode::Custom => SeedingMode::Random,
        };
        bracket.pending_pick = None;
    }

    pub fn toggle_shuffle(&mut self) {
        self.state.bracket.shuffle_enabled = !self.state.bracket.shuffle_enabled;
    }

    /// Enter on the setup screen: build the bracket from the current picks.
    pub fn generate_bracket(&mut self) {
        let built = match self.state.bracket.seeding {
            SeedingMode::Random => {
                let roster = &self.state.players.roster;
                let names: Vec<String> = self
                    .state
                    .bracket
                    .selected_entrants
                    .iter()
                    .filter_map(|&i| roster.players.get(i).map(|p| p.name.clone()))
                    .collect();
                BracketState::build(&names, self.state.bracket.shuffle_enabled)
            }
            SeedingMode::Custom => BracketState::build_from_matchups(&self.state.bracket.matchups),
        };
        match built {
            Ok(bracket) => {
                info!(
                    "bracket generated: {} entrants, {} rounds",
                    bracket.entrant_names.len(),
                    bracket.total_rounds
                );
                self.state.bracket.install(bracket);
            }
            Err(e) => self.show_rejection(e),
        }
    }

    pub fn reset_bracket(&mut self) {
        self.state.bracket.reset();
    }

    /// '1' / '2' on a live match: open the score-entry modal for that side's
    /// player, or toast why the match can't be decided yet.
    pub fn pick_winner(&mut self, side: Side) {
        let id = self.state.bracket.selected;
        let opened = match &self.state.bracket.bracket {
            None => return,
            Some(bs) => match bs.find(id) {
                None => Err(Rejection::MatchNotFound(id)),
                Some(m) if !m.is_contestable() => Err(Rejection::MatchNotContestable(id)),
                Some(m) => {
                    let (winner_name, loser_name) = match side {
                        Side::One => (m.player1.clone(), m.player2.clone()),
                        Side::Two => (m.player2.clone(), m.player1.clone()),
                    };
                    Ok(ScoreEntry {
                        match_id: id,
                        winner_side: side,
                        winner_name: winner_name.unwrap_or_default(),
                        loser_name: loser_name.unwrap_or_default(),
                        winner_score: String::new(),
                        loser_score: String::new(),
                        editing_loser: false,
                    })
                }
            },
        };
        match opened {
            Ok(entry) => self.state.bracket.score_entry = Some(entry),
            Err(e) => self.show_rejection(e),
        }
    }

    /// Enter in the score modal: record the result, with or without a score
    /// label. A decided final is parked until the reveal delay runs out.
    pub fn confirm_score_entry(&mut self) {
        let Some(entry) = self.state.bracket.score_entry.take() else {
            return;
        };
        let Some(bs) = &mut self.state.bracket.bracket else {
            return;
        };
        match bs.record_result(entry.match_id, entry.winner_side, entry.label()) {
            Ok(RecordOutcome::Advanced) => {
                info!("{} advances from {}", entry.winner_name, entry.match_id);
            }
            Ok(RecordOutcome::TournamentComplete { winner }) => {
                info!("tournament decided: {winner}");
                self.state.bracket.pending_champion = Some((winner, Instant::now()));
            }
            Err(e) => self.show_rejection(e),
        }
    }

    pub fn cancel_score_entry(&mut self) {
        self.state.bracket.score_entry = None;
    }

    pub fn dismiss_champion(&mut self) {
        self.state.bracket.champion = None;
    }

    /// Space in custom seeding mode: put the player under the cursor into
    /// the pairing being built.
    pub fn custom_pick_under_cursor(&mut self) {
        let Some(player) = self
            .state
            .players
            .roster
            .players
            .get(self.state.bracket.setup_cursor)
        else {
            return;
        };
        let name = player.name.clone();
        if self.state.bracket.custom_picked(&name) {
            return self.show_toast(format!("{name} is already paired"));
        }
        if let Err(e) = self.state.bracket.push_custom_pick(&name) {
            self.show_rejection(e);
        }
    }

    // -----------------------------------------------------------------------
    // Game tab actions
    // -----------------------------------------------------------------------

    pub fn assign_game_pick(&mut self, side: Side) {
        let cursor = self.state.game.setup_cursor;
        if cursor >= self.state.players.roster.players.len() {
            return;
        }
        match side {
            Side::One => self.state.game.pick1 = Some(cursor),
            Side::Two => self.state.game.pick2 = Some(cursor),
        }
    }

    pub fn toggle_variant(&mut self) {
        self.state.game.variant = self.state.game.variant.toggled();
    }

    pub fn start_game(&mut self) {
        let roster = &self.state.players.roster;
        let name = |pick: Option<usize>| {
            pick.and_then(|i| roster.players.get(i))
                .map(|p| p.name.clone())
                .unwrap_or_default()
        };
        let p1 = name(self.state.game.pick1);
        let p2 = name(self.state.game.pick2);
        match GameState::start(p1, p2, self.state.game.variant) {
            Ok(game) => {
                info!(
                    "{} game: {} vs {}",
                    game.variant.label(),
                    game.players[0].name,
                    game.players[1].name
                );
                self.state.game.install(game);
            }
            Err(e) => self.show_rejection(e),
        }
    }

    pub fn reset_game(&mut self) {
        self.state.game.reset();
    }

    pub fn set_multiplier(&mut self, multiplier: Multiplier) {
        self.state.game.multiplier = multiplier;
    }

    /// Enter on the keypad: register `number_input` under the active
    /// multiplier as one dart.
    pub fn commit_number_throw(&mut self) {
        let Some(number) = self.state.game.pending_number() else {
            self.state.game.number_input.clear();
            return self.show_toast("segments run 1-20");
        };
        let dart = Dart::Number(number, self.state.game.multiplier);
        self.register_throw(dart);
    }

    pub fn register_throw(&mut self, dart: Dart) {
        let Some(game) = &mut self.state.game.game else {
            return;
        };
        match game.throw(dart) {
            Ok(ThrowOutcome::Scored) | Ok(ThrowOutcome::TurnComplete) => {}
            Ok(ThrowOutcome::Bust { reverted_to }) => {
                self.show_danger_toast(format!("BUST - back to {reverted_to}"));
            }
            Ok(ThrowOutcome::Checkout { winner }) => {
                info!("checkout: {winner}");
                self.state.game.show_winner = true;
            }
            Err(e) => return self.show_rejection(e),
        }
        self.state.game.clear_input();
    }

    pub fn undo_throw(&mut self) {
        let Some(game) = &mut self.state.game.game else {
            return;
        };
        match game.undo() {
            Ok(throw) => {
                self.state.game.show_winner = false;
                self.show_toast(format!("undid {}", throw.label));
            }
            Err(e) => self.show_rejection(e),
        }
    }

    // -----------------------------------------------------------------------
    // Players tab actions
    // -----------------------------------------------------------------------

    pub fn open_add_player(&mut self) {
        self.state.players.adding = true;
        self.state.players.input.clear();
    }

    pub fn commit_add_player(&mut self) {
        let name = self.state.players.input.trim().to_string();
        self.state.players.adding = false;
        self.state.players.input.clear();
        if name.is_empty() {
            return;
        }
        if self.state.players.roster.add_custom(&name) {
            self.show_toast(format!("added {name}"));
        } else {
            self.show_toast(format!("{name} is already on the roster"));
        }
    }

    pub fn cancel_add_player(&mut self) {
        self.state.players.adding = false;
        self.state.players.input.clear();
    }

    pub fn delete_selected_player(&mut self) {
        let idx = self.state.players.selected;
        let players = &mut self.state.players;
        if players.roster.remove(idx) {
            players.selected = players.selected.min(players.roster.players.len().saturating_sub(1));
            self.show_toast("player removed");
        } else {
            self.show_toast("only custom players can be removed");
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use darts_engine::MatchId;

    fn app_with_entrants(count: usize) -> App {
        let mut app = App::new();
        for i in 0..count {
            app.state.bracket.selected_entrants.insert(i);
        }
        app
    }

    #[test]
    fn test_generate_bracket_needs_two_entrants() {
        let mut app = app_with_entrants(1);
        app.generate_bracket();
        assert!(app.state.bracket.in_setup());
        assert!(app.state.toast.is_some());
    }

    #[test]
    fn test_generate_and_decide_bracket() {
        let mut app = app_with_entrants(2);
        app.generate_bracket();
        assert!(!app.state.bracket.in_setup());

        app.pick_winner(Side::One);
        assert!(app.state.bracket.score_entry.is_some());
        app.confirm_score_entry();

        // A two-entrant bracket is decided by its only match; the champion
        // waits out the reveal delay.
        assert!(app.state.bracket.pending_champion.is_some());
        assert!(app.state.bracket.champion.is_none());
        std::thread::sleep(CHAMPION_REVEAL_DELAY);
        app.advance_timers();
        assert!(app.state.bracket.champion.is_some());
    }

    #[test]
    fn test_pick_winner_on_waiting_match_toasts() {
        let mut app = app_with_entrants(4);
        app.generate_bracket();
        app.state.bracket.selected = MatchId::new(1, 0);
        app.pick_winner(Side::One);
        assert!(app.state.bracket.score_entry.is_none());
        assert!(app.state.toast.is_some());
    }

    #[test]
    fn test_start_game_needs_two_picks() {
        let mut app = App::new();
        app.state.game.pick1 = Some(0);
        app.start_game();
        assert!(app.state.game.in_setup());
        assert!(app.state.toast.is_some());
    }

    #[test]
    fn test_keypad_throw_resets_input() {
        let mut app = App::new();
        app.state.game.pick1 = Some(0);
        app.state.game.pick2 = Some(1);
        app.start_game();

        app.set_multiplier(Multiplier::Treble);
        app.state.game.push_digit('2');
        app.state.game.push_digit('0');
        app.commit_number_throw();

        let game = app.state.game.game.as_ref().unwrap();
        assert_eq!(game.players[0].score, game.variant.starting_score() - 60);
        assert!(app.state.game.number_input.is_empty());
        assert_eq!(app.state.game.multiplier, Multiplier::Single);
    }

    #[test]
    fn test_bust_shows_danger_toast() {
        let mut app = App::new();
        app.state.game.pick1 = Some(0);
        app.state.game.pick2 = Some(1);
        app.start_game();

        {
            let game = app.state.game.game.as_mut().unwrap();
            game.players[0].score = 32;
            game.turn_score_snapshot = 32;
        }
        app.register_throw(Dart::Bull); // 50 overshoots 32

        let toast = app.state.toast.as_ref().unwrap();
        assert!(toast.message.starts_with("BUST"));
        assert_eq!(toast.color, UiColor::Danger);
        let game = app.state.game.game.as_ref().unwrap();
        assert_eq!(game.players[0].score, 32);
        assert_eq!(game.current_player, 1);
    }

    #[test]
    fn test_invalid_segment_toasts() {
        let mut app = App::new();
        app.state.game.pick1 = Some(0);
        app.state.game.pick2 = Some(1);
        app.start_game();

        app.state.game.push_digit('2');
        app.state.game.push_digit('5');
        app.commit_number_throw();
        assert!(app.state.toast.is_some());
        let game = app.state.game.game.as_ref().unwrap();
        assert_eq!(game.players[0].darts_thrown, 0);
    }
}
