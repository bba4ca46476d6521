use serde::{Deserialize, Serialize};

use crate::Rejection;

// ---------------------------------------------------------------------------
// Throw input types
// ---------------------------------------------------------------------------

/// Game variant, named by its starting score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameVariant {
    #[default]
    ThreeOhOne,
    FiveOhOne,
}

impl GameVariant {
    pub fn starting_score(self) -> u16 {
        match self {
            GameVariant::ThreeOhOne => 301,
            GameVariant::FiveOhOne => 501,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GameVariant::ThreeOhOne => "301",
            GameVariant::FiveOhOne => "501",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            GameVariant::ThreeOhOne => GameVariant::FiveOhOne,
            GameVariant::FiveOhOne => GameVariant::ThreeOhOne,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Multiplier {
    #[default]
    Single,
    Double,
    Treble,
}

impl Multiplier {
    pub fn factor(self) -> u16 {
        match self {
            Multiplier::Single => 1,
            Multiplier::Double => 2,
            Multiplier::Treble => 3,
        }
    }

    /// The S/D/T prefix used in throw labels like "T20".
    pub fn prefix(self) -> &'static str {
        match self {
            Multiplier::Single => "S",
            Multiplier::Double => "D",
            Multiplier::Treble => "T",
        }
    }
}

/// One dart as entered at the keypad: a numbered segment with a multiplier,
/// or one of the fixed-value targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dart {
    /// Segment 1-20 with single/double/treble.
    Number(u8, Multiplier),
    /// Inner bullseye, 50.
    Bull,
    /// Outer bull, 25.
    OuterBull,
    /// Off the board, 0.
    Miss,
}

impl Dart {
    pub fn value(self) -> u16 {
        match self {
            Dart::Number(n, m) => u16::from(n) * m.factor(),
            Dart::Bull => 50,
            Dart::OuterBull => 25,
            Dart::Miss => 0,
        }
    }

    pub fn label(self) -> String {
        match self {
            Dart::Number(n, m) => format!("{}{}", m.prefix(), n),
            Dart::Bull => "BULL".to_string(),
            Dart::OuterBull => "25".to_string(),
            Dart::Miss => "MISS".to_string(),
        }
    }
}

/// A registered throw: resolved point value plus its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DartThrow {
    pub value: u16,
    pub label: String,
}

// ---------------------------------------------------------------------------
// Player and history state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamePlayerState {
    pub name: String,
    /// Remaining points.
    pub score: u16,
    /// Darts charged against the player, including busted turns.
    pub darts_thrown: u32,
    /// Points scored across the whole game, for the 3-dart average.
    pub total_points_scored: u32,
}

impl GamePlayerState {
    fn new(name: String, score: u16) -> Self {
        Self {
            name,
            score,
            darts_thrown: 0,
            total_points_scored: 0,
        }
    }

    /// 3-dart average: `total / (darts / 3)`, 0.0 before any dart is thrown.
    pub fn average(&self) -> f64 {
        if self.darts_thrown == 0 {
            return 0.0;
        }
        f64::from(self.total_points_scored) / (f64::from(self.darts_thrown) / 3.0)
    }
}

/// Everything `undo` needs to roll back exactly one throw, captured before
/// the throw is applied. Undo works at single-throw granularity and may cross
/// a turn boundary, switching the active player back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveHistoryEntry {
    pub player_idx: usize,
    pub dart_idx: u8,
    /// The throw that was applied on top of this snapshot.
    pub dart: DartThrow,
    pub prev_score: u16,
    pub prev_darts: u32,
    pub prev_total: u32,
    pub prev_round: u32,
    pub prev_turn_darts: Vec<DartThrow>,
    pub prev_turn_snapshot: u16,
}

/// What a successful throw did, for the caller to surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThrowOutcome {
    /// Score decremented, turn continues.
    Scored,
    /// Third dart registered; play passed to the other player.
    TurnComplete,
    /// The throw would leave a negative score or exactly 1: the whole turn is
    /// voided and play passes. `reverted_to` is the restored score.
    Bust { reverted_to: u16 },
    /// Score hit exactly 0 — game over.
    Checkout { winner: String },
}

// ---------------------------------------------------------------------------
// Game state
// ---------------------------------------------------------------------------

/// A 301/501 game between two players, mutated dart-by-dart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub variant: GameVariant,
    pub players: [GamePlayerState; 2],
    /// Index of the player at the oche (0 or 1).
    pub current_player: usize,
    pub round_number: u32,
    /// Darts already registered this turn (0-3).
    pub current_dart: u8,
    pub turn_darts: Vec<DartThrow>,
    /// The active player's score when their turn started; a bust reverts to
    /// this.
    pub turn_score_snapshot: u16,
    pub move_history: Vec<MoveHistoryEntry>,
    pub is_finished: bool,
    pub winner_name: Option<String>,
}

impl GameState {
    /// Start a game. Rejects empty or identical player names.
    pub fn start(
        player1: impl Into<String>,
        player2: impl Into<String>,
        variant: GameVariant,
    ) -> Result<Self, Rejection> {
        let player1 = player1.into();
        let player2 = player2.into();
        if player1.is_empty() || player2.is_empty() || player1 == player2 {
            return Err(Rejection::DuplicateOrMissingSelection);
        }
        let start = variant.starting_score();
        Ok(Self {
            variant,
            players: [
                GamePlayerState::new(player1, start),
                GamePlayerState::new(player2, start),
            ],
            current_player: 0,
            round_number: 1,
            current_dart: 0,
            turn_darts: Vec::new(),
            turn_score_snapshot: start,
            move_history: Vec::new(),
            is_finished: false,
            winner_name: None,
        })
    }

    pub fn current_player_state(&self) -> &GamePlayerState {
        &self.players[self.current_player]
    }

    /// Points registered so far this turn.
    pub fn turn_total(&self) -> u16 {
        self.turn_darts.iter().map(|d| d.value).sum()
    }

    pub fn can_undo(&self) -> bool {
        !self.move_history.is_empty()
    }

    /// Register one dart for the active player.
    ///
    /// Rejected with `TurnAlreadyComplete` once three darts are registered or
    /// the game is over. Otherwise applies the bust / checkout / normal rules
    /// and always pushes an undo snapshot first.
    pub fn throw(&mut self, dart: Dart) -> Result<ThrowOutcome, Rejection> {
        if self.is_finished || self.current_dart >= 3 {
            return Err(Rejection::TurnAlreadyComplete);
        }

        let value = dart.value();
        let throw = DartThrow {
            value,
            label: dart.label(),
        };
        let idx = self.current_player;

        self.move_history.push(MoveHistoryEntry {
            player_idx: idx,
            dart_idx: self.current_dart,
            dart: throw.clone(),
            prev_score: self.players[idx].score,
            prev_darts: self.players[idx].darts_thrown,
            prev_total: self.players[idx].total_points_scored,
            prev_round: self.round_number,
            prev_turn_darts: self.turn_darts.clone(),
            prev_turn_snapshot: self.turn_score_snapshot,
        });

        let new_score = i32::from(self.players[idx].score) - i32::from(value);

        // Bust: going below zero, or landing on 1 (no double-out from 1).
        // The whole turn is voided and all three darts are still charged.
        if new_score < 0 || new_score == 1 {
            let reverted_to = self.turn_score_snapshot;
            let turn_points = u32::from(self.turn_total());
            let player = &mut self.players[idx];
            player.score = reverted_to;
            player.darts_thrown += u32::from(3 - self.current_dart);
            player.total_points_scored -= turn_points;
            self.end_turn();
            return Ok(ThrowOutcome::Bust { reverted_to });
        }

        // Checkout: exactly zero wins the game. Play does not pass.
        if new_score == 0 {
            let player = &mut self.players[idx];
            player.score = 0;
            player.darts_thrown += 1;
            player.total_points_scored += u32::from(value);
            let winner = player.name.clone();
            self.turn_darts.push(throw);
            self.current_dart += 1;
            self.is_finished = true;
            self.winner_name = Some(winner.clone());
            return Ok(ThrowOutcome::Checkout { winner });
        }

        let player = &mut self.players[idx];
        player.score = new_score as u16;
        player.darts_thrown += 1;
        player.total_points_scored += u32::from(value);
        self.turn_darts.push(throw);
        self.current_dart += 1;

        if self.current_dart >= 3 {
            self.end_turn();
            return Ok(ThrowOutcome::TurnComplete);
        }
        Ok(ThrowOutcome::Scored)
    }

    /// Roll back the most recent throw. Restores score, darts, totals, turn
    /// list, dart index, active player and round, and clears any finish.
    pub fn undo(&mut self) -> Result<DartThrow, Rejection> {
        let last = self.move_history.pop().ok_or(Rejection::NothingToUndo)?;
        let player = &mut self.players[last.player_idx];
        player.score = last.prev_score;
        player.darts_thrown = last.prev_darts;
        player.total_points_scored = last.prev_total;
        self.current_player = last.player_idx;
        self.current_dart = last.dart_idx;
        self.round_number = last.prev_round;
        self.turn_darts = last.prev_turn_darts;
        self.turn_score_snapshot = last.prev_turn_snapshot;
        self.is_finished = false;
        self.winner_name = None;
        Ok(last.dart)
    }

    /// Pass play to the other player. Round number bumps when play comes
    /// back around to player 0.
    fn end_turn(&mut self) {
        self.turn_darts.clear();
        self.current_dart = 0;
        self.current_player = 1 - self.current_player;
        self.turn_score_snapshot = self.players[self.current_player].score;
        if self.current_player == 0 {
            self.round_number += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn game(variant: GameVariant) -> GameState {
        GameState::start("Ann", "Ben", variant).unwrap()
    }

    #[test]
    fn test_start_rejects_bad_selections() {
        assert_eq!(
            GameState::start("Ann", "Ann", GameVariant::ThreeOhOne),
            Err(Rejection::DuplicateOrMissingSelection)
        );
        assert_eq!(
            GameState::start("", "Ben", GameVariant::ThreeOhOne),
            Err(Rejection::DuplicateOrMissingSelection)
        );
        assert_eq!(
            GameState::start("Ann", "", GameVariant::FiveOhOne),
            Err(Rejection::DuplicateOrMissingSelection)
        );
    }

    #[test]
    fn test_start_initial_state() {
        let gs = game(GameVariant::FiveOhOne);
        assert_eq!(gs.players[0].score, 501);
        assert_eq!(gs.players[1].score, 501);
        assert_eq!(gs.current_player, 0);
        assert_eq!(gs.round_number, 1);
        assert_eq!(gs.current_dart, 0);
        assert_eq!(gs.turn_score_snapshot, 501);
        assert!(!gs.is_finished);
    }

    #[test]
    fn test_dart_values_and_labels() {
        assert_eq!(Dart::Number(20, Multiplier::Treble).value(), 60);
        assert_eq!(Dart::Number(20, Multiplier::Treble).label(), "T20");
        assert_eq!(Dart::Number(5, Multiplier::Double).value(), 10);
        assert_eq!(Dart::Number(5, Multiplier::Double).label(), "D5");
        assert_eq!(Dart::Number(19, Multiplier::Single).label(), "S19");
        assert_eq!(Dart::Bull.value(), 50);
        assert_eq!(Dart::OuterBull.value(), 25);
        assert_eq!(Dart::Miss.value(), 0);
    }

    #[test]
    fn test_three_trebles_from_301() {
        let mut gs = game(GameVariant::ThreeOhOne);
        let t20 = Dart::Number(20, Multiplier::Treble);
        assert_eq!(gs.throw(t20), Ok(ThrowOutcome::Scored));
        assert_eq!(gs.throw(t20), Ok(ThrowOutcome::Scored));
        assert_eq!(gs.throw(t20), Ok(ThrowOutcome::TurnComplete));
        assert_eq!(gs.players[0].score, 301 - 180);
        assert_eq!(gs.players[0].darts_thrown, 3);
        assert_eq!(gs.players[0].total_points_scored, 180);
        // Turn passed to the other player, fresh snapshot.
        assert_eq!(gs.current_player, 1);
        assert_eq!(gs.current_dart, 0);
        assert!(gs.turn_darts.is_empty());
        assert_eq!(gs.turn_score_snapshot, 301);
    }

    #[test]
    fn test_round_increments_when_play_returns_to_player_zero() {
        let mut gs = game(GameVariant::ThreeOhOne);
        let d = Dart::Number(1, Multiplier::Single);
        for _ in 0..3 {
            gs.throw(d).unwrap();
        }
        assert_eq!(gs.round_number, 1);
        for _ in 0..3 {
            gs.throw(d).unwrap();
        }
        assert_eq!(gs.current_player, 0);
        assert_eq!(gs.round_number, 2);
    }

    #[test]
    fn test_bust_on_one_reverts_score_and_charges_three_darts() {
        let mut gs = game(GameVariant::ThreeOhOne);
        // Ann: 60 + 60 + 60 = 121 left after turn 1.
        let t20 = Dart::Number(20, Multiplier::Treble);
        for _ in 0..3 {
            gs.throw(t20).unwrap();
        }
        // Ben passes his turn with three misses.
        for _ in 0..3 {
            gs.throw(Dart::Miss).unwrap();
        }
        // Ann: 60 + 60 leaves 1 → bust on the second dart.
        assert_eq!(gs.throw(t20), Ok(ThrowOutcome::Scored)); // 61
        let outcome = gs.throw(t20); // would leave 1
        assert_eq!(outcome, Ok(ThrowOutcome::Bust { reverted_to: 121 }));
        assert_eq!(gs.players[0].score, 121);
        // 3 darts from turn 1 + all 3 charged for the busted turn.
        assert_eq!(gs.players[0].darts_thrown, 6);
        // The busted turn's 60 points were subtracted back out.
        assert_eq!(gs.players[0].total_points_scored, 180);
        assert_eq!(gs.current_player, 1);
        assert!(gs.turn_darts.is_empty());
    }

    #[test]
    fn test_bust_on_negative_score() {
        let mut gs = game(GameVariant::ThreeOhOne);
        let t20 = Dart::Number(20, Multiplier::Treble);
        for _ in 0..3 {
            gs.throw(t20).unwrap(); // Ann 121
        }
        for _ in 0..3 {
            gs.throw(Dart::Miss).unwrap(); // Ben
        }
        gs.throw(t20).unwrap(); // 61
        gs.throw(Dart::Number(19, Multiplier::Treble)).unwrap(); // 4
        let outcome = gs.throw(t20); // 4 - 60 < 0
        assert_eq!(outcome, Ok(ThrowOutcome::Bust { reverted_to: 121 }));
        assert_eq!(gs.players[0].score, 121);
        assert_eq!(gs.players[0].darts_thrown, 6);
    }

    #[test]
    fn test_checkout_finishes_game() {
        let mut gs = game(GameVariant::ThreeOhOne);
        let t20 = Dart::Number(20, Multiplier::Treble);
        // Ann to 121, Ben idles, Ann to 40 via T20 + S20 + S1.
        for _ in 0..3 {
            gs.throw(t20).unwrap();
        }
        for _ in 0..3 {
            gs.throw(Dart::Miss).unwrap();
        }
        gs.throw(t20).unwrap(); // 61
        gs.throw(Dart::Number(20, Multiplier::Single)).unwrap(); // 41
        gs.throw(Dart::Number(1, Multiplier::Single)).unwrap(); // 40, turn ends
        for _ in 0..3 {
            gs.throw(Dart::Miss).unwrap(); // Ben
        }

        let darts_before = gs.players[0].darts_thrown;
        let total_before = gs.players[0].total_points_scored;
        let outcome = gs.throw(Dart::Number(20, Multiplier::Double)); // D20 = 40
        assert_eq!(
            outcome,
            Ok(ThrowOutcome::Checkout {
                winner: "Ann".to_string()
            })
        );
        assert!(gs.is_finished);
        assert_eq!(gs.winner_name.as_deref(), Some("Ann"));
        assert_eq!(gs.players[0].score, 0);
        assert_eq!(gs.players[0].darts_thrown, darts_before + 1);
        assert_eq!(gs.players[0].total_points_scored, total_before + 40);
        // Play did not pass.
        assert_eq!(gs.current_player, 0);
    }

    #[test]
    fn test_throw_rejected_after_finish() {
        let mut gs = game(GameVariant::ThreeOhOne);
        let t20 = Dart::Number(20, Multiplier::Treble);
        for _ in 0..3 {
            gs.throw(t20).unwrap(); // 121
        }
        for _ in 0..3 {
            gs.throw(Dart::Miss).unwrap();
        }
        gs.throw(t20).unwrap(); // 61
        gs.throw(Dart::Number(1, Multiplier::Single)).unwrap(); // 60
        gs.throw(t20).unwrap(); // checkout
        assert!(gs.is_finished);
        let before = gs.clone();
        assert_eq!(gs.throw(Dart::Miss), Err(Rejection::TurnAlreadyComplete));
        assert_eq!(gs, before);
    }

    #[test]
    fn test_undo_restores_prethrow_state() {
        let mut gs = game(GameVariant::ThreeOhOne);
        let before = gs.clone();
        gs.throw(Dart::Number(19, Multiplier::Treble)).unwrap();
        let undone = gs.undo().unwrap();
        assert_eq!(undone.label, "T19");
        // History aside, everything matches the pre-throw snapshot.
        let mut restored = gs.clone();
        restored.move_history.clear();
        assert_eq!(restored, before);
    }

    #[test]
    fn test_undo_crosses_turn_boundary() {
        let mut gs = game(GameVariant::ThreeOhOne);
        let s5 = Dart::Number(5, Multiplier::Single);
        for _ in 0..3 {
            gs.throw(s5).unwrap();
        }
        assert_eq!(gs.current_player, 1);
        gs.undo().unwrap();
        // Back to Ann's third dart.
        assert_eq!(gs.current_player, 0);
        assert_eq!(gs.current_dart, 2);
        assert_eq!(gs.turn_darts.len(), 2);
        assert_eq!(gs.players[0].score, 301 - 10);
    }

    #[test]
    fn test_undo_clears_finish() {
        let mut gs = game(GameVariant::ThreeOhOne);
        let t20 = Dart::Number(20, Multiplier::Treble);
        for _ in 0..3 {
            gs.throw(t20).unwrap(); // 121
        }
        for _ in 0..3 {
            gs.throw(Dart::Miss).unwrap();
        }
        gs.throw(t20).unwrap(); // 61
        gs.throw(Dart::Number(1, Multiplier::Single)).unwrap(); // 60
        gs.throw(t20).unwrap(); // checkout
        assert!(gs.is_finished);

        gs.undo().unwrap();
        assert!(!gs.is_finished);
        assert_eq!(gs.winner_name, None);
        assert_eq!(gs.players[0].score, 60);
        assert_eq!(gs.current_dart, 2);
    }

    #[test]
    fn test_undo_empty_history_rejected() {
        let mut gs = game(GameVariant::ThreeOhOne);
        assert_eq!(gs.undo(), Err(Rejection::NothingToUndo));
    }

    #[test]
    fn test_average() {
        let mut p = GamePlayerState::new("Ann".to_string(), 301);
        assert_eq!(p.average(), 0.0);
        p.darts_thrown = 9;
        p.total_points_scored = 180;
        assert!((p.average() - 60.0).abs() < f64::EPSILON);
        // Scoreboards show two decimals.
        assert_eq!(format!("{:.2}", p.average()), "60.00");
    }

    #[test]
    fn test_snapshot_round_trips_through_serde() {
        let mut gs = game(GameVariant::FiveOhOne);
        gs.throw(Dart::Number(20, Multiplier::Treble)).unwrap();
        gs.throw(Dart::Bull).unwrap();
        let json = serde_json::to_string(&gs).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, gs);
    }
}
