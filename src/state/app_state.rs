use crate::app::MenuItem;
use crate::components::theme::UiColor;
use crate::state::roster::Roster;
use chrono::Local;
use darts_engine::{
    BracketState, GameState, GameVariant, MatchId, Matchup, Multiplier, Rejection, Side,
};
use std::collections::BTreeSet;
use std::time::Instant;

// ---------------------------------------------------------------------------
// Toast state
// ---------------------------------------------------------------------------

/// A transient status line shown at the bottom of the screen.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub color: UiColor,
    pub expires_at: Instant,
}

// ---------------------------------------------------------------------------
// Bracket tab state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedingMode {
    /// Pick entrants from the roster; pairings come from list order or a
    /// shuffle.
    #[default]
    Random,
    /// Build explicit pairings player by player.
    Custom,
}

/// The score-entry modal opened after picking a match winner. The scores are
/// kept as digit strings while editing; `label()` renders the committed
/// form.
#[derive(Debug, Clone)]
pub struct ScoreEntry {
    pub match_id: MatchId,
    pub winner_side: Side,
    pub winner_name: String,
    pub loser_name: String,
    pub winner_score: String,
    pub loser_score: String,
    /// Which field the digits go to.
    pub editing_loser: bool,
}

impl ScoreEntry {
    pub fn push_digit(&mut self, c: char) {
        let field = if self.editing_loser {
            &mut self.loser_score
        } else {
            &mut self.winner_score
        };
        if field.len() < 2 {
            field.push(c);
        }
    }

    pub fn backspace(&mut self) {
        let field = if self.editing_loser {
            &mut self.loser_score
        } else {
            &mut self.winner_score
        };
        field.pop();
    }

    pub fn toggle_field(&mut self) {
        self.editing_loser = !self.editing_loser;
    }

    /// `"3 : 1"` when both fields are filled in, `None` for a skipped entry.
    pub fn label(&self) -> Option<String> {
        if self.winner_score.is_empty() || self.loser_score.is_empty() {
            return None;
        }
        Some(format!("{} : {}", self.winner_score, self.loser_score))
    }
}

#[derive(Debug, Default)]
pub struct BracketTabState {
    pub bracket: Option<BracketState>,
    // --- setup phase ---
    pub seeding: SeedingMode,
    pub shuffle_enabled: bool,
    /// Roster indices ticked for the draw (random mode).
    pub selected_entrants: BTreeSet<usize>,
    pub setup_cursor: usize,
    /// Explicit pairings built so far (custom mode).
    pub matchups: Vec<Matchup>,
    /// First half of a pairing being built, waiting for its opponent.
    pub pending_pick: Option<String>,
    // --- live bracket ---
    pub selected: MatchId,
    pub scroll_offset: u16,
    pub score_entry: Option<ScoreEntry>,
    pub champion: Option<String>,
    /// A decided final waiting out the short pause before the champion
    /// overlay appears.
    pub pending_champion: Option<(String, Instant)>,
    /// `HH:MM` the bracket was generated, for the header.
    pub generated_at: Option<String>,
}

impl BracketTabState {
    pub fn in_setup(&self) -> bool {
        self.bracket.is_none()
    }

    /// Install a freshly built bracket and reset the live-view cursor.
    pub fn install(&mut self, bracket: BracketState) {
        self.selected = first_visible_match(&bracket);
        self.scroll_offset = 0;
        self.score_entry = None;
        self.champion = None;
        self.pending_champion = None;
        self.generated_at = Some(Local::now().format("%H:%M").to_string());
        self.bracket = Some(bracket);
    }

    /// Drop the bracket and go back to entrant selection. The setup picks
    /// are kept so a re-roll is one keypress away.
    pub fn reset(&mut self) {
        self.bracket = None;
        self.score_entry = None;
        self.champion = None;
        self.pending_champion = None;
        self.generated_at = None;
        self.scroll_offset = 0;
    }

    // --- setup navigation ---

    pub fn setup_cursor_down(&mut self, roster_len: usize) {
        if self.setup_cursor + 1 < roster_len {
            self.setup_cursor += 1;
        }
    }

    pub fn setup_cursor_up(&mut self) {
        self.setup_cursor = self.setup_cursor.saturating_sub(1);
    }

    pub fn toggle_entrant(&mut self, index: usize) {
        if !self.selected_entrants.remove(&index) {
            self.selected_entrants.insert(index);
        }
    }

    pub fn select_all(&mut self, roster_len: usize) {
        self.selected_entrants = (0..roster_len).collect();
    }

    pub fn select_none(&mut self) {
        self.selected_entrants.clear();
    }

    /// Add a name to the custom pairing being built. The first pick is held
    /// until its opponent arrives; the second completes a matchup.
    pub fn push_custom_pick(&mut self, name: &str) -> Result<(), Rejection> {
        match self.pending_pick.take() {
            None => {
                self.pending_pick = Some(name.to_string());
                Ok(())
            }
            Some(first) => match Matchup::new(first.clone(), name) {
                Ok(m) => {
                    self.matchups.push(m);
                    Ok(())
                }
                Err(e) => {
                    self.pending_pick = Some(first);
                    Err(e)
                }
            },
        }
    }

    /// Names already placed in a custom pairing (or held pending).
    pub fn custom_picked(&self, name: &str) -> bool {
        self.pending_pick.as_deref() == Some(name)
            || self
                .matchups
                .iter()
                .any(|m| m.player1 == name || m.player2 == name)
    }

    pub fn clear_custom_picks(&mut self) {
        self.matchups.clear();
        self.pending_pick = None;
    }

    // --- live bracket navigation ---

    pub fn select_next_in_round(&mut self) {
        let Some(bs) = &self.bracket else { return };
        let mut slot = self.selected.slot;
        loop {
            slot += 1;
            let id = MatchId::new(self.selected.round, slot);
            match bs.find(id) {
                Some(m) if is_visible(m) => {
                    self.selected = id;
                    return;
                }
                Some(_) => continue,
                None => return,
            }
        }
    }

    pub fn select_prev_in_round(&mut self) {
        let Some(bs) = &self.bracket else { return };
        let mut slot = self.selected.slot;
        while slot > 0 {
            slot -= 1;
            let id = MatchId::new(self.selected.round, slot);
            if bs.find(id).is_some_and(is_visible) {
                self.selected = id;
                return;
            }
        }
    }

    /// Move the cursor one round toward the final, landing near the
    /// corresponding slot.
    pub fn select_round_next(&mut self) {
        let Some(bs) = &self.bracket else { return };
        if self.selected.round + 1 >= bs.total_rounds {
            return;
        }
        let target = MatchId::new(self.selected.round + 1, self.selected.slot / 2);
        if let Some(id) = nearest_visible(bs, target) {
            self.selected = id;
        }
    }

    pub fn select_round_prev(&mut self) {
        let Some(bs) = &self.bracket else { return };
        if self.selected.round == 0 {
            return;
        }
        let target = MatchId::new(self.selected.round - 1, self.selected.slot * 2);
        if let Some(id) = nearest_visible(bs, target) {
            self.selected = id;
        }
    }

    pub fn scroll_down(&mut self, max: u16) {
        if self.scroll_offset < max {
            self.scroll_offset += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }
}

/// Anything but a blank padding slot is selectable and drawn.
fn is_visible(m: &darts_engine::BracketMatch) -> bool {
    !(m.is_placeholder() && m.score_label.is_none())
}

/// First drawable match in round 0. Slot 0 always holds real entrants
/// because padding fills the tail.
fn first_visible_match(bs: &BracketState) -> MatchId {
    bs.matches()
        .find(|m| is_visible(m))
        .map(|m| m.id)
        .unwrap_or(MatchId::new(0, 0))
}

/// The visible match closest to `target` within its round, preferring lower
/// slots (padding sits at the tail).
fn nearest_visible(bs: &BracketState, target: MatchId) -> Option<MatchId> {
    let round_len = bs.rounds.get(target.round)?.len();
    let start = target.slot.min(round_len.saturating_sub(1));
    for slot in (0..=start).rev() {
        let id = MatchId::new(target.round, slot);
        if bs.find(id).is_some_and(is_visible) {
            return Some(id);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Game tab state
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct GameTabState {
    pub game: Option<GameState>,
    // --- setup phase ---
    pub variant: GameVariant,
    /// Roster indices assigned to the two oche slots.
    pub pick1: Option<usize>,
    pub pick2: Option<usize>,
    pub setup_cursor: usize,
    // --- live game input ---
    pub multiplier: Multiplier,
    /// Pending segment number, 1-2 digits.
    pub number_input: String,
    pub show_winner: bool,
}

impl Default for GameTabState {
    fn default() -> Self {
        Self {
            game: None,
            variant: GameVariant::FiveOhOne,
            pick1: None,
            pick2: None,
            setup_cursor: 0,
            multiplier: Multiplier::Single,
            number_input: String::new(),
            show_winner: false,
        }
    }
}

impl GameTabState {
    pub fn in_setup(&self) -> bool {
        self.game.is_none()
    }

    pub fn setup_cursor_down(&mut self, roster_len: usize) {
        if self.setup_cursor + 1 < roster_len {
            self.setup_cursor += 1;
        }
    }

    pub fn setup_cursor_up(&mut self) {
        self.setup_cursor = self.setup_cursor.saturating_sub(1);
    }

    pub fn install(&mut self, game: GameState) {
        self.multiplier = Multiplier::Single;
        self.number_input.clear();
        self.show_winner = false;
        self.game = Some(game);
    }

    /// Drop the game and go back to player selection, keeping the picks.
    pub fn reset(&mut self) {
        self.game = None;
        self.multiplier = Multiplier::Single;
        self.number_input.clear();
        self.show_winner = false;
    }

    pub fn push_digit(&mut self, c: char) {
        if self.number_input.len() < 2 {
            self.number_input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.number_input.pop();
    }

    /// The segment number typed so far, if it names a real board segment.
    pub fn pending_number(&self) -> Option<u8> {
        let n: u8 = self.number_input.parse().ok()?;
        (1..=20).contains(&n).then_some(n)
    }

    /// Reset the keypad after a registered throw.
    pub fn clear_input(&mut self) {
        self.number_input.clear();
        self.multiplier = Multiplier::Single;
    }
}

// ---------------------------------------------------------------------------
// Players tab state
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct PlayersTabState {
    pub roster: Roster,
    pub selected: usize,
    /// The add-player input line is open.
    pub adding: bool,
    pub input: String,
}

impl Default for PlayersTabState {
    fn default() -> Self {
        Self {
            roster: Roster::default(),
            selected: 0,
            adding: false,
            input: String::new(),
        }
    }
}

impl PlayersTabState {
    pub fn cursor_down(&mut self) {
        if self.selected + 1 < self.roster.players.len() {
            self.selected += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_intro: bool,
    pub show_logs: bool,
    pub toast: Option<Toast>,
    pub bracket: BracketTabState,
    pub game: GameTabState,
    pub players: PlayersTabState,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            show_intro: true,
            players: PlayersTabState {
                roster: Roster::load(),
                ..PlayersTabState::default()
            },
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fresh_tab_starts_at_opening_match() {
        let tab = BracketTabState::default();
        assert!(tab.in_setup());
        assert_eq!(tab.selected, MatchId::new(0, 0));
        assert_eq!(tab.scroll_offset, 0);
    }

    #[test]
    fn test_install_selects_first_match() {
        let mut tab = BracketTabState::default();
        let bs = BracketState::build(&names(&["A", "B", "C", "D"]), false).unwrap();
        tab.install(bs);
        assert_eq!(tab.selected, MatchId::new(0, 0));
        assert!(tab.generated_at.is_some());
        assert!(!tab.in_setup());
    }

    #[test]
    fn test_round_navigation_skips_padding() {
        let mut tab = BracketTabState::default();
        let bs = BracketState::build(&names(&["A", "B", "C", "D", "E"]), false).unwrap();
        tab.install(bs);

        // Round 0 has pairings in slots 0-2 and pure padding in slot 3.
        tab.select_next_in_round();
        tab.select_next_in_round();
        assert_eq!(tab.selected, MatchId::new(0, 2));
        tab.select_next_in_round();
        assert_eq!(tab.selected, MatchId::new(0, 2));

        tab.select_round_next();
        assert_eq!(tab.selected.round, 1);
    }

    #[test]
    fn test_custom_picks_pair_up() {
        let mut tab = BracketTabState::default();
        tab.push_custom_pick("A").unwrap();
        assert_eq!(tab.pending_pick.as_deref(), Some("A"));
        tab.push_custom_pick("B").unwrap();
        assert!(tab.pending_pick.is_none());
        assert_eq!(tab.matchups.len(), 1);

        // Pairing a player with themselves is rejected; the pending pick
        // survives.
        tab.push_custom_pick("C").unwrap();
        assert_eq!(
            tab.push_custom_pick("C"),
            Err(Rejection::DuplicateOrMissingSelection)
        );
        assert_eq!(tab.pending_pick.as_deref(), Some("C"));
        assert!(tab.custom_picked("A"));
        assert!(tab.custom_picked("C"));
        assert!(!tab.custom_picked("D"));
    }

    #[test]
    fn test_score_entry_label() {
        let mut entry = ScoreEntry {
            match_id: MatchId::new(0, 0),
            winner_side: Side::One,
            winner_name: "A".to_string(),
            loser_name: "B".to_string(),
            winner_score: String::new(),
            loser_score: String::new(),
            editing_loser: false,
        };
        assert_eq!(entry.label(), None);
        entry.push_digit('3');
        entry.toggle_field();
        entry.push_digit('1');
        assert_eq!(entry.label(), Some("3 : 1".to_string()));
    }

    #[test]
    fn test_pending_number_validates_segment() {
        let mut tab = GameTabState::default();
        tab.push_digit('2');
        tab.push_digit('0');
        assert_eq!(tab.pending_number(), Some(20));
        tab.push_digit('5'); // third digit ignored
        assert_eq!(tab.pending_number(), Some(20));
        tab.clear_input();
        tab.push_digit('0');
        assert_eq!(tab.pending_number(), None);
    }
}
