use crate::{
    core::{
        board::{Board, Player, Position, TileType},
        move_table::MoveTable,
        moves::{Move, MoveList},
    },
    engine::game_state::{GameState, Outcome},
};

/// Legal moves for the player to move.
#[must_use]
pub fn legal_moves(state: &GameState) -> MoveList {
    legal_moves_for(state, state.current_player())
}

/// Legal moves `player` would have if it were their turn.
#[must_use]
pub fn legal_moves_for(state: &GameState, player: Player) -> MoveList {
    let mut out = MoveList::new();
    legal_moves_into(state, player, &mut out);
    out
}

/// Fills `out` with the legal moves of `player`, reusing its allocation.
///
/// Every base move comes first without a tile, then once for each cell that
/// is free of pieces and tiles after the relocation, with a black tile (if
/// the player holds one) and then with a gray tile (likewise).
pub fn legal_moves_into(state: &GameState, player: Player, out: &mut MoveList) {
    out.clear();
    let board = state.board();
    let inventory = state.inventory(player);
    let tiles: Vec<TileType> = [TileType::Black, TileType::Gray]
        .into_iter()
        .filter(|tile| inventory.has(*tile))
        .collect();

    for base in base_moves_for(board, player) {
        out.push(base);
        for &tile in &tiles {
            for pos in placement_cells(board, &base) {
                out.push(base.with_placement(pos, tile));
            }
        }
    }
}

/// Tile-free relocations available to `player`.
///
/// Walks each ray from the piece outwards: an empty neighbour is a one-step
/// move, a run of own pieces is jumped to the first empty cell behind it, and
/// an opponent's piece closes the ray.
#[must_use]
pub fn base_moves(state: &GameState, player: Player) -> MoveList {
    base_moves_for(state.board(), player)
}

fn base_moves_for(board: &Board, player: Player) -> MoveList {
    let table = MoveTable::standard();
    let mut moves = MoveList::new();

    for from in board.pieces(player) {
        let tile = board.cell(from).tile;
        let entry = table.entry(tile, usize::from(from.x), usize::from(from.y));
        for ray in entry.rays() {
            for offset in ray.offsets() {
                let Some(to) = offset.apply(from) else {
                    break;
                };
                match board.cell(to).occupant {
                    None => {
                        moves.push(Move::step(from, to));
                        break;
                    }
                    Some(occupant) if occupant == player => {}
                    Some(_) => break,
                }
            }
        }
    }

    moves
}

/// Cells where a tile may be placed together with `base`: no tile, and no
/// piece once the mover has left `from` and arrived at `to`.
fn placement_cells<'a>(board: &'a Board, base: &'a Move) -> impl Iterator<Item = Position> + 'a {
    board.cells().iter().enumerate().filter_map(move |(i, cell)| {
        let pos = Position::from_index(i);
        let occupied = if pos == base.from {
            false
        } else {
            pos == base.to || cell.occupant.is_some()
        };
        (cell.tile.is_none() && !occupied).then_some(pos)
    })
}

/// `true` if `player` has a piece on their goal row.
#[must_use]
pub fn is_win(state: &GameState, player: Player) -> bool {
    let board = state.board();
    let y = player.goal_row();
    (0..board.width()).any(|x| board.at(x, y).occupant == Some(player))
}

/// `true` if `player` has no legal move.
#[must_use]
pub fn is_loss(state: &GameState, player: Player) -> bool {
    base_moves(state, player).is_empty()
}

impl GameState {
    /// Returns how the game ended, or `None` while it is still in progress.
    ///
    /// Goal rows are checked first (Black, then White); otherwise the player to
    /// move loses if they cannot move.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        if let Some(player) = Player::ALL.into_iter().find(|p| is_win(self, *p)) {
            return Some(Outcome::GoalReached(player));
        }
        let mover = self.current_player();
        is_loss(self, mover).then_some(Outcome::NoMoves(mover))
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }
}
