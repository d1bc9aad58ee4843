use crate::{
    Board, CellIndex, Coordinate, BASE_POINT_VALUE, COLLECTIBLE_BANK_VALUE, MAX_NORMAL_VALUE,
};
use derive_more::Display;
use num_derive::FromPrimitive;
use rand::distributions::{Distribution, Standard};
use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;
use tracing::trace;

/// Identifies a [piece](Piece) for as long as it stays in the game, through merges and moves.
/// Issued by [GameState](crate::GameState) when the piece enters the game.
pub type PieceId = u64;

/// Describes how a [mobile](PieceKind::Mobile) piece behaves when it
/// [takes its turn](Piece::take_turn).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, FromPrimitive)]
pub enum Movement {
    /// Moves to a random open neighbour. Stays put when trapped.
    Wander = 0,
    /// Moves to a random open neighbour. Becomes a [normal](PieceKind::Normal) piece when trapped.
    Settle = 1,
}

impl Movement {
    /// The number of [`Movement`] variants.
    pub const MOVEMENTS_LEN: usize = 2;

    /// # Returns
    ///
    /// An array of all [`Movement`] variants in order.
    #[inline]
    pub fn movements() -> [Movement; Movement::MOVEMENTS_LEN] {
        [Movement::Wander, Movement::Settle]
    }
}

impl Distribution<Movement> for Standard {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Movement {
        let index = rng.gen_range(0..Movement::MOVEMENTS_LEN);
        num_traits::FromPrimitive::from_usize(index).unwrap_or_else(|| {
            unreachable!(
                "index ({:?}) should be matched since movements cover all indexes \
                in range 0..Movement::MOVEMENTS_LEN (0..{:?}).",
                index,
                Movement::MOVEMENTS_LEN
            );
        })
    }
}

/// The closed set of piece variants. Every capability of a [piece](Piece) is decided by
/// matching on its kind.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PieceKind {
    /// Merges with equal values and may be placed anywhere open.
    Normal,
    /// Takes the value of the highest adjacent group and must merge to be placed.
    Wildcard,
    /// Merges like a normal piece but moves at the end of every turn.
    Mobile(Movement),
    /// Never merges. Harvested into the bank by touching it.
    Collectible,
    /// Never placed. Clears the occupied cell it is used on.
    RemoveTool,
}

/// Identifies what kind of piece was placed for statistics.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Display)]
pub enum StatsKey {
    /// A [normal](PieceKind::Normal) piece of the given value.
    #[display("normal_{_0}")]
    Normal(u32),
    /// A [wildcard](PieceKind::Wildcard) piece.
    #[display("wildcard")]
    Wildcard,
    /// A [mobile](PieceKind::Mobile) piece of the given value.
    #[display("mobile_{_0}")]
    Mobile(u32),
    /// A [collectible](PieceKind::Collectible) piece.
    #[display("collectible")]
    Collectible,
    /// A [remove tool](PieceKind::RemoveTool).
    #[display("remove_tool")]
    RemoveTool,
}

/// What a [piece](Piece) wants to do with its turn. Applied by the controller, never by
/// the piece itself.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum TurnAction {
    /// Nothing changes.
    Stay,
    /// Move to the given open neighbouring [coordinate](Coordinate).
    MoveTo(Coordinate),
    /// Replace the piece in place.
    Become(Piece),
}

/// A game token with a value and kind specific behaviour. Held as the current piece,
/// the stashed piece, or by exactly one [cell](crate::Cell).
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Piece {
    kind: PieceKind,
    value: u32,
    added: u64,
    id: PieceId,
    cell: Option<CellIndex>,
}

impl Piece {
    /// # Arguments
    ///
    /// * `kind`: Decides every capability of the piece.
    /// * `value`: The merge strength of the piece.
    ///
    /// # Returns
    ///
    /// A new piece not yet issued an id nor held by any cell.
    pub fn new(kind: PieceKind, value: u32) -> Piece {
        Piece {
            kind,
            value,
            added: 0,
            id: 0,
            cell: None,
        }
    }

    /// A new [normal](PieceKind::Normal) piece.
    #[inline]
    pub fn normal(value: u32) -> Piece {
        Piece::new(PieceKind::Normal, value)
    }

    /// A new [wildcard](PieceKind::Wildcard) piece.
    #[inline]
    pub fn wildcard() -> Piece {
        Piece::new(PieceKind::Wildcard, 0)
    }

    /// A new [mobile](PieceKind::Mobile) piece.
    #[inline]
    pub fn mobile(movement: Movement, value: u32) -> Piece {
        Piece::new(PieceKind::Mobile(movement), value)
    }

    /// A new [collectible](PieceKind::Collectible) piece.
    #[inline]
    pub fn collectible(value: u32) -> Piece {
        Piece::new(PieceKind::Collectible, value)
    }

    /// A new [remove tool](PieceKind::RemoveTool).
    #[inline]
    pub fn remove_tool() -> Piece {
        Piece::new(PieceKind::RemoveTool, 0)
    }

    /// The kind of the piece.
    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// The merge strength of the piece.
    #[inline]
    pub fn value(&self) -> u32 {
        self.value
    }

    /// The turn on which the piece was last placed or merged. Used to pick the focus of
    /// a chain merge.
    #[inline]
    pub fn added(&self) -> u64 {
        self.added
    }

    /// The id issued to the piece when it entered the game.
    #[inline]
    pub fn id(&self) -> PieceId {
        self.id
    }

    /// The index of the [cell](crate::Cell) holding the piece, if any. Maintained by
    /// the [board](Board).
    #[inline]
    pub fn cell(&self) -> Option<CellIndex> {
        self.cell
    }

    #[inline]
    pub(crate) fn set_id(&mut self, id: PieceId) {
        self.id = id;
    }

    #[inline]
    pub(crate) fn set_cell(&mut self, cell: Option<CellIndex>) {
        self.cell = cell;
    }

    /// Whether the piece may be harvested by touching it.
    #[inline]
    pub fn is_collectible(&self) -> bool {
        self.kind == PieceKind::Collectible
    }

    /// Whether the piece clears cells instead of being placed.
    #[inline]
    pub fn is_remove_tool(&self) -> bool {
        self.kind == PieceKind::RemoveTool
    }

    /// Whether the piece can take part in a merge, either as the placed piece or as
    /// a neighbour.
    #[inline]
    pub fn can_merge(&self) -> bool {
        matches!(
            self.kind,
            PieceKind::Normal | PieceKind::Wildcard | PieceKind::Mobile(_)
        )
    }

    /// Whether this piece, while occupying a cell, lets `candidate` target that cell.
    /// Only a [remove tool](PieceKind::RemoveTool) may target an occupied cell.
    #[inline]
    pub fn will_accept(&self, candidate: &Piece) -> bool {
        candidate.is_remove_tool()
    }

    /// Whether the piece may be dropped on an open cell with no merge partner.
    #[inline]
    pub fn can_place_without_merge(&self) -> bool {
        matches!(
            self.kind,
            PieceKind::Normal | PieceKind::Mobile(_) | PieceKind::Collectible
        )
    }

    /// Turns the piece into the result of a merge whose highest merged value is `max_value`.
    /// The result is one value higher, keeps the same id, and is
    /// [normal](PieceKind::Normal) unless it passes [MAX_NORMAL_VALUE], in which case it
    /// evolves into a [collectible](PieceKind::Collectible). A remove tool is returned as is.
    ///
    /// # Arguments
    ///
    /// * `max_value`: The highest value among the merged pieces.
    /// * `turn`: The current turn, recorded as [added](Piece::added).
    pub fn was_placed_with_merge(self, max_value: u32, turn: u64) -> Piece {
        if self.is_remove_tool() {
            return self;
        }

        let value = max_value.saturating_add(1);
        let kind = if value > MAX_NORMAL_VALUE {
            PieceKind::Collectible
        } else {
            PieceKind::Normal
        };
        trace!(id = self.id, ?kind, value, "piece merged");

        Piece {
            kind,
            value,
            added: turn,
            ..self
        }
    }

    /// Records that the piece was placed on `turn` without merging.
    #[inline]
    pub fn was_placed_without_merge(&mut self, turn: u64) {
        self.added = turn;
    }

    /// Decides what the piece does with its turn. Only [mobile](PieceKind::Mobile) pieces do
    /// anything, so the result for every other kind is [TurnAction::Stay].
    ///
    /// # Arguments
    ///
    /// * `board`: The board holding the piece.
    /// * `coordinate`: Where the piece is on the board.
    /// * `rng`: Picks among open neighbours.
    pub fn take_turn<R: Rng + ?Sized>(
        &self,
        board: &Board,
        coordinate: Coordinate,
        rng: &mut R,
    ) -> TurnAction {
        let PieceKind::Mobile(movement) = self.kind else {
            return TurnAction::Stay;
        };

        let open: SmallVec<[Coordinate; 6]> = board
            .neighbors(coordinate)
            .into_iter()
            .filter(|&neighbor| board.is_open(neighbor))
            .collect();

        match (open.choose(rng), movement) {
            (Some(&to), _) => TurnAction::MoveTo(to),
            (None, Movement::Wander) => TurnAction::Stay,
            (None, Movement::Settle) => TurnAction::Become(Piece {
                kind: PieceKind::Normal,
                ..self.clone()
            }),
        }
    }

    /// Consumes a harvested piece.
    ///
    /// # Returns
    ///
    /// The number of points paid into the bank, [COLLECTIBLE_BANK_VALUE] for a collectible
    /// and `0` for anything else.
    pub fn was_collected(self) -> u64 {
        trace!(id = self.id, kind = ?self.kind, "piece collected");
        if self.is_collectible() {
            COLLECTIBLE_BANK_VALUE
        } else {
            0
        }
    }

    /// Consumes a piece erased by a remove tool.
    pub fn was_removed(self) {
        trace!(id = self.id, kind = ?self.kind, "piece removed");
    }

    /// # Returns
    ///
    /// The points the piece is worth, [BASE_POINT_VALUE] doubled once per value.
    /// A remove tool is worth nothing.
    pub fn point_value(&self) -> u64 {
        if self.is_remove_tool() {
            return 0;
        }
        let multiplier = 1_u64.checked_shl(self.value).unwrap_or(u64::MAX);
        BASE_POINT_VALUE.saturating_mul(multiplier)
    }

    /// # Returns
    ///
    /// The key under which placing the piece is counted.
    pub fn stats_key(&self) -> StatsKey {
        match self.kind {
            PieceKind::Normal => StatsKey::Normal(self.value),
            PieceKind::Wildcard => StatsKey::Wildcard,
            PieceKind::Mobile(_) => StatsKey::Mobile(self.value),
            PieceKind::Collectible => StatsKey::Collectible,
            PieceKind::RemoveTool => StatsKey::RemoveTool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rand::Rng;

    #[test]
    fn movements_no_duplicates() {
        assert_eq!(0, Movement::movements().into_iter().duplicates().count());
    }

    #[test]
    fn movement_as_usize() {
        for (index, movement) in Movement::movements().into_iter().enumerate() {
            assert_eq!(index, movement as usize);
        }
    }

    #[test]
    fn merge_increments_value() {
        let value = rand::thread_rng().gen_range(0..MAX_NORMAL_VALUE);
        let merged = Piece::normal(value).was_placed_with_merge(value, 7);

        assert_eq!(PieceKind::Normal, merged.kind());
        assert_eq!(value + 1, merged.value());
        assert_eq!(7, merged.added());
    }

    #[test]
    fn merge_uses_max_value() {
        let merged = Piece::normal(1).was_placed_with_merge(4, 1);
        assert_eq!(5, merged.value());
    }

    #[test]
    fn merge_keeps_id() {
        let mut piece = Piece::normal(0);
        piece.set_id(42);
        assert_eq!(42, piece.was_placed_with_merge(0, 1).id());
    }

    #[test]
    fn merge_past_max_value_evolves() {
        let merged = Piece::normal(MAX_NORMAL_VALUE).was_placed_with_merge(MAX_NORMAL_VALUE, 1);
        assert!(merged.is_collectible());
        assert_eq!(MAX_NORMAL_VALUE + 1, merged.value());
    }

    #[test]
    fn merged_wildcard_and_mobile_settle() {
        let movement = rand::thread_rng().gen();
        for piece in [Piece::wildcard(), Piece::mobile(movement, 2)] {
            assert_eq!(PieceKind::Normal, piece.was_placed_with_merge(2, 1).kind());
        }
    }

    #[test]
    fn remove_tool_never_merges() {
        let tool = Piece::remove_tool();
        assert_eq!(tool.clone(), tool.was_placed_with_merge(3, 1));
    }

    #[test]
    fn placed_without_merge_records_turn() {
        let mut piece = Piece::normal(3);
        piece.was_placed_without_merge(9);
        assert_eq!(9, piece.added());
        assert_eq!(3, piece.value());
    }

    #[test]
    fn acceptance() {
        let occupant = Piece::normal(1);
        assert!(occupant.will_accept(&Piece::remove_tool()));
        assert!(!occupant.will_accept(&Piece::normal(1)));
        assert!(!occupant.will_accept(&Piece::wildcard()));
    }

    #[test]
    fn placement_without_merge() {
        assert!(Piece::normal(0).can_place_without_merge());
        assert!(Piece::mobile(Movement::Wander, 0).can_place_without_merge());
        assert!(Piece::collectible(8).can_place_without_merge());
        assert!(!Piece::wildcard().can_place_without_merge());
        assert!(!Piece::remove_tool().can_place_without_merge());
    }

    #[test]
    fn stationary_pieces_stay() {
        let mut rng = rand::thread_rng();
        let mut board = Board::new(3, 3).unwrap();
        board.insert((1, 1), Piece::normal(0)).unwrap();
        for piece in [
            Piece::normal(0),
            Piece::wildcard(),
            Piece::collectible(8),
            Piece::remove_tool(),
        ] {
            assert_eq!(TurnAction::Stay, piece.take_turn(&board, (1, 1), &mut rng));
        }
    }

    #[test]
    fn wander_moves_to_open_neighbor() {
        let mut rng = rand::thread_rng();
        let mut board = Board::new(3, 3).unwrap();
        board.insert((0, 0), Piece::normal(0)).unwrap();
        board.insert((1, 0), Piece::mobile(Movement::Wander, 0)).unwrap();
        let piece = board.piece((1, 0)).unwrap().clone();

        let TurnAction::MoveTo(to) = piece.take_turn(&board, (1, 0), &mut rng) else {
            panic!("a wandering piece with open neighbours should move");
        };
        assert!(board.neighbors((1, 0)).contains(&to));
        assert!(board.is_open(to));
    }

    #[test]
    fn trapped_wander_stays() {
        let mut rng = rand::thread_rng();
        let mut board = Board::new(2, 1).unwrap();
        board.insert((0, 0), Piece::mobile(Movement::Wander, 1)).unwrap();
        board.insert((1, 0), Piece::normal(3)).unwrap();
        let piece = board.piece((0, 0)).unwrap().clone();

        assert_eq!(TurnAction::Stay, piece.take_turn(&board, (0, 0), &mut rng));
    }

    #[test]
    fn trapped_settle_becomes_normal() {
        let mut rng = rand::thread_rng();
        let mut board = Board::new(1, 1).unwrap();
        board.insert((0, 0), Piece::mobile(Movement::Settle, 2)).unwrap();
        let piece = board.piece((0, 0)).unwrap().clone();

        let TurnAction::Become(settled) = piece.take_turn(&board, (0, 0), &mut rng) else {
            panic!("a trapped settling piece should become a normal piece");
        };
        assert_eq!(PieceKind::Normal, settled.kind());
        assert_eq!(2, settled.value());
    }

    #[test]
    fn point_value_doubles() {
        assert_eq!(BASE_POINT_VALUE, Piece::normal(0).point_value());
        assert_eq!(BASE_POINT_VALUE * 8, Piece::normal(3).point_value());
        assert_eq!(0, Piece::remove_tool().point_value());
    }

    #[test]
    fn collected_reward() {
        assert_eq!(COLLECTIBLE_BANK_VALUE, Piece::collectible(8).was_collected());
        assert_eq!(0, Piece::normal(1).was_collected());
    }

    #[test]
    fn stats_keys() {
        assert_eq!("normal_3", Piece::normal(3).stats_key().to_string());
        assert_eq!("mobile_1", Piece::mobile(Movement::Settle, 1).stats_key().to_string());
        assert_eq!("remove_tool", Piece::remove_tool().stats_key().to_string());
    }
}
