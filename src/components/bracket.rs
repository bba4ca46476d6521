use darts_engine::{BracketMatch, BracketState, MatchId, Side};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

use crate::components::theme::{UiColor, UiTheme, resolve};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Rows per match cell: player1 line, score/status line, player2 line.
pub const MATCH_HEIGHT: u16 = 3;

/// Width of the connector zone drawn between adjacent round columns.
pub const CONNECTOR_WIDTH: u16 = 3;

/// Maximum match cell width in wider terminals.
const CELL_W_FULL: u16 = 22;

/// Rows spanned by one subtree at the given depth.
/// `SH[0] = MATCH_HEIGHT; SH[d] = 2 * SH[d-1] + 1`, which closes to
/// `(MATCH_HEIGHT + 1) * 2^d - 1`.
fn slot_height(depth: usize) -> u16 {
    (MATCH_HEIGHT + 1) * (1 << depth) - 1
}

// ---------------------------------------------------------------------------
// MatchCell / BracketGrid — layout engine
// ---------------------------------------------------------------------------

/// Pre-computed position for one match within the bracket grid.
#[derive(Debug, Clone)]
pub struct MatchCell {
    /// Row index of the score/status line (center of the 3-row cell),
    /// relative to the bracket origin. Not scroll-adjusted.
    pub center_row: u16,
    /// Starting x-column for this cell within the grid (origin-relative).
    pub col: u16,
    pub cell_width: u16,
    pub round: usize,
    pub slot: usize,
}

/// Pre-computed layout for a whole bracket, first round on the left and the
/// final on the right. The column count follows the tournament size, so
/// everything is derived from `total_rounds` rather than fixed tables.
///
/// Center rows follow `center[d][i] = SH[d]/2 + i * (MATCH_HEIGHT+1) * 2^d`,
/// which keeps every parent's center at the midpoint of its two children.
#[derive(Debug, Clone)]
pub struct BracketGrid {
    /// All cells in round-major order: round 0 first.
    pub cells: Vec<MatchCell>,
    /// Starting x-column for each round column.
    pub round_cols: Vec<u16>,
    /// Cell index where each round's run starts (one extra entry at the end).
    round_offsets: Vec<usize>,
    pub total_rounds: usize,
    pub total_width: u16,
    pub total_height: u16,
    pub cell_width: u16,
}

impl BracketGrid {
    /// Compute the layout for `total_rounds` rounds in the given terminal
    /// width. The cell width shrinks so all columns plus connectors fit,
    /// capped at CELL_W_FULL.
    pub fn compute(total_rounds: usize, terminal_width: u16) -> Self {
        let rounds = total_rounds.max(1);
        let connector_total = CONNECTOR_WIDTH * (rounds as u16 - 1);
        let per_col = terminal_width.saturating_sub(connector_total) / rounds as u16;
        let cell_width = per_col.max(1).min(CELL_W_FULL);
        let stride = cell_width + CONNECTOR_WIDTH;

        let round_cols: Vec<u16> = (0..rounds).map(|d| stride * d as u16).collect();
        let total_width = stride * (rounds as u16 - 1) + cell_width;
        let total_height = slot_height(rounds - 1);

        let first_round_matches = 1usize << (rounds - 1);
        let mut cells = Vec::new();
        let mut round_offsets = Vec::with_capacity(rounds + 1);
        for d in 0..rounds {
            round_offsets.push(cells.len());
            let count = first_round_matches >> d;
            let first_center = slot_height(d) / 2;
            let spacing = (MATCH_HEIGHT + 1) * (1 << d);
            for i in 0..count {
                cells.push(MatchCell {
                    center_row: first_center + i as u16 * spacing,
                    col: round_cols[d],
                    cell_width,
                    round: d,
                    slot: i,
                });
            }
        }
        round_offsets.push(cells.len());

        Self {
            cells,
            round_cols,
            round_offsets,
            total_rounds: rounds,
            total_width,
            total_height,
            cell_width,
        }
    }

    pub fn cells_for_round(&self, round: usize) -> &[MatchCell] {
        &self.cells[self.round_offsets[round]..self.round_offsets[round + 1]]
    }
}

// ---------------------------------------------------------------------------
// BracketTreeView widget
// ---------------------------------------------------------------------------

/// Renders the whole bracket tree from an engine snapshot.
pub struct BracketTreeView<'a> {
    pub state: &'a BracketState,
    /// Pre-computed layout. Rebuild on terminal resize or bracket reset.
    pub grid: &'a BracketGrid,
    /// The highlighted match.
    pub selected: MatchId,
    /// Vertical scroll offset in terminal rows.
    pub scroll_offset: u16,
    pub theme: UiTheme,
}

impl<'a> Widget for BracketTreeView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 12 || area.height < MATCH_HEIGHT {
            return;
        }

        // Pass 1: match cells.
        for cell in &self.grid.cells {
            let id = MatchId::new(cell.round, cell.slot);
            let Some(m) = self.state.find(id) else {
                continue;
            };
            let selected = id == self.selected;
            draw_match_cell(
                self.state,
                m,
                cell,
                selected,
                area,
                self.scroll_offset,
                self.theme,
                buf,
            );
        }

        // Pass 2: connectors. Each parent at round d+1 joins its two
        // children at round d.
        for d in 0..self.grid.total_rounds.saturating_sub(1) {
            let children = self.grid.cells_for_round(d);
            let parents = self.grid.cells_for_round(d + 1);
            let conn_x = area.x + self.grid.round_cols[d] + self.grid.cell_width;
            for (j, parent) in parents.iter().enumerate() {
                draw_connector(
                    children[2 * j].center_row,
                    parent.center_row,
                    children[2 * j + 1].center_row,
                    conn_x,
                    area,
                    self.scroll_offset,
                    self.theme,
                    buf,
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Drawing helpers
// ---------------------------------------------------------------------------

/// Convert a bracket-relative row to an absolute screen y, applying scroll
/// and area bounds. Returns `None` if the row is off-screen.
fn screen_y(bracket_row: u16, scroll: u16, area: Rect) -> Option<u16> {
    if bracket_row < scroll {
        return None;
    }
    let rel = bracket_row - scroll;
    if rel >= area.height {
        return None;
    }
    Some(area.y + rel)
}

#[derive(Clone, Copy)]
enum CellLine {
    Player(Side),
    Status,
}

#[allow(clippy::too_many_arguments)]
fn draw_match_cell(
    state: &BracketState,
    m: &BracketMatch,
    cell: &MatchCell,
    selected: bool,
    area: Rect,
    scroll: u16,
    theme: UiTheme,
    buf: &mut Buffer,
) {
    // Pure padding slots stay blank.
    if m.is_placeholder() && m.score_label.is_none() {
        return;
    }

    let winner_style = resolve(UiColor::Winner, theme);
    let dim = resolve(UiColor::Dim, theme);

    let x = area.x + cell.col;
    if x >= area.x + area.width {
        return;
    }
    let avail_w = (area.x + area.width).saturating_sub(x) as usize;

    let base_style = if selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let lines = [
        (cell.center_row - 1, CellLine::Player(Side::One)),
        (cell.center_row, CellLine::Status),
        (cell.center_row + 1, CellLine::Player(Side::Two)),
    ];

    for (bracket_row, line) in lines {
        let Some(sy) = screen_y(bracket_row, scroll, area) else {
            continue;
        };

        let content = match line {
            CellLine::Player(side) => {
                format_player_line(state, m, side, cell.cell_width as usize)
            }
            CellLine::Status => {
                let raw = format!(" {}", m.score_label.as_deref().unwrap_or(""));
                pad_to(&raw, cell.cell_width as usize)
            }
        };
        let text: String = content.chars().take(avail_w).collect();

        let style = match line {
            CellLine::Status => dim,
            CellLine::Player(side) => {
                let is_winner = m
                    .player(side)
                    .is_some_and(|p| m.winner.as_deref() == Some(p));
                if is_winner {
                    winner_style.add_modifier(Modifier::BOLD)
                } else {
                    base_style
                }
            }
        };

        buf.set_string(x, sy, &text, style);
    }
}

/// Player line: the name, `TBD` for an undecided feeder, or `-` for an
/// absent padding slot, padded to the cell width.
fn format_player_line(state: &BracketState, m: &BracketMatch, side: Side, width: usize) -> String {
    let text = match m.player(side) {
        Some(name) => name,
        None => match feeder_slot(m, side) {
            Some(slot) if !state.subtree_is_padding(m.id.round - 1, slot) => "TBD",
            _ => "-",
        },
    };
    let truncated: String = text.chars().take(width.saturating_sub(1)).collect();
    pad_to(&format!(" {truncated}"), width)
}

/// Previous-round slot feeding this side of the match, if any.
fn feeder_slot(m: &BracketMatch, side: Side) -> Option<usize> {
    let [a, b] = m.source_slots?;
    Some(match side {
        Side::One => a,
        Side::Two => b,
    })
}

fn pad_to(s: &str, width: usize) -> String {
    let mut out: String = s.chars().take(width).collect();
    while out.chars().count() < width {
        out.push(' ');
    }
    out
}

/// Draw box-drawing connectors between one parent and its two children.
///
/// ```text
///  child_top  ──┐         (col_a='─'  col_b='┐')
///               │         (col_b='│')
///  parent     ──├──       (col_a='─'  col_b='├'  col_c='─')
///               │         (col_b='│')
///  child_bot  ──┘         (col_a='─'  col_b='┘')
/// ```
#[allow(clippy::too_many_arguments)]
fn draw_connector(
    r_top: u16,
    r_mid: u16,
    r_bot: u16,
    conn_base_x: u16,
    area: Rect,
    scroll: u16,
    theme: UiTheme,
    buf: &mut Buffer,
) {
    let style = resolve(UiColor::Dim, theme);
    let col_a = conn_base_x;
    let col_b = conn_base_x + 1;
    let col_c = conn_base_x + 2;
    let limit_x = area.x + area.width;

    let mut put = |x: u16, row: u16, ch: char| {
        if x < limit_x {
            if let Some(sy) = screen_y(row, scroll, area) {
                put_char(buf, x, sy, ch, style);
            }
        }
    };

    put(col_a, r_top, '─');
    put(col_b, r_top, '┐');
    for row in (r_top + 1)..r_mid {
        put(col_b, row, '│');
    }
    put(col_a, r_mid, '─');
    put(col_b, r_mid, '├');
    put(col_c, r_mid, '─');
    for row in (r_mid + 1)..r_bot {
        put(col_b, row, '│');
    }
    put(col_a, r_bot, '─');
    put(col_b, r_bot, '┘');
}

fn put_char(buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_heights() {
        assert_eq!(slot_height(0), 3);
        assert_eq!(slot_height(1), 7);
        assert_eq!(slot_height(2), 15);
        assert_eq!(slot_height(3), 31);
    }

    #[test]
    fn test_grid_cell_count_three_rounds() {
        let grid = BracketGrid::compute(3, 80);
        assert_eq!(grid.cells.len(), 7); // 4 + 2 + 1
        assert_eq!(grid.total_height, 15);
    }

    #[test]
    fn test_first_round_centers() {
        let grid = BracketGrid::compute(3, 80);
        let centers: Vec<u16> = grid
            .cells_for_round(0)
            .iter()
            .map(|c| c.center_row)
            .collect();
        assert_eq!(centers, vec![1, 5, 9, 13]);
    }

    #[test]
    fn test_later_round_centers() {
        let grid = BracketGrid::compute(3, 80);
        let second: Vec<u16> = grid
            .cells_for_round(1)
            .iter()
            .map(|c| c.center_row)
            .collect();
        assert_eq!(second, vec![3, 11]);
        let last: Vec<u16> = grid
            .cells_for_round(2)
            .iter()
            .map(|c| c.center_row)
            .collect();
        assert_eq!(last, vec![7]);
    }

    #[test]
    fn test_parent_center_is_midpoint_of_children() {
        let grid = BracketGrid::compute(4, 120);
        for depth in 0..3usize {
            let children = grid.cells_for_round(depth);
            let parents = grid.cells_for_round(depth + 1);
            for (j, parent) in parents.iter().enumerate() {
                let c_top = children[2 * j].center_row;
                let c_bot = children[2 * j + 1].center_row;
                assert_eq!(
                    parent.center_row,
                    (c_top + c_bot) / 2,
                    "depth={depth} parent={j}"
                );
            }
        }
    }

    #[test]
    fn test_cell_width_shrinks_to_fit() {
        let width: u16 = 50;
        let grid = BracketGrid::compute(3, width);
        let expected = (width - CONNECTOR_WIDTH * 2) / 3;
        assert_eq!(grid.cell_width, expected.min(CELL_W_FULL));
        assert!(grid.total_width <= width);
    }

    #[test]
    fn test_cell_width_caps_at_full_limit() {
        let grid = BracketGrid::compute(2, 200);
        assert_eq!(grid.cell_width, CELL_W_FULL);
    }

    #[test]
    fn test_single_round_grid() {
        let grid = BracketGrid::compute(1, 80);
        assert_eq!(grid.cells.len(), 1);
        assert_eq!(grid.total_height, 3);
        assert_eq!(grid.cells[0].center_row, 1);
    }

    #[test]
    fn test_player_line_marks_absent_and_tbd() {
        let names: Vec<String> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let bs = BracketState::build(&names, false).unwrap();

        // Round 0 bye pairing: E present, padding side absent.
        let bye = bs.find(MatchId::new(0, 2)).unwrap();
        assert!(format_player_line(&bs, bye, Side::One, 10).contains('E'));
        assert_eq!(format_player_line(&bs, bye, Side::Two, 10).trim(), "-");

        // Final: player1 undecided (live half of the draw), shown as TBD.
        let final_match = bs.find(MatchId::new(2, 0)).unwrap();
        assert_eq!(
            format_player_line(&bs, final_match, Side::One, 10).trim(),
            "TBD"
        );
    }
}
