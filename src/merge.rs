use crate::{Board, BoardError, Coordinate, Piece, PieceKind, MERGE_CAPACITY};
use map_macro::hash_set;
use smallvec::SmallVec;
use std::cmp::Reverse;
use std::collections::HashSet;
use tracing::debug;

/// A set of [coordinates](Coordinate) holding pieces that merge together, in scan order.
pub type MergeSet = SmallVec<[Coordinate; MERGE_CAPACITY]>;

/// What a single merge, or a placement without one, did to the board.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct MergeRecord {
    /// Where the resulting piece is.
    pub coordinate: Coordinate,
    /// The pieces taken off the board, in scan order. Excludes the placed piece or merge focus.
    pub consumed: Vec<Piece>,
    /// The piece left at `coordinate`.
    pub result: Piece,
}

impl MergeRecord {
    /// The number of pieces that went into the merge, counting the placed piece or
    /// merge focus.
    #[inline]
    pub fn merged_count(&self) -> usize {
        self.consumed.len() + 1
    }

    /// See [merge_multiplier].
    #[inline]
    pub fn multiplier(&self) -> u64 {
        merge_multiplier(self.merged_count())
    }

    /// The points earned by the merge, the [point value](Piece::point_value) of
    /// the result scaled by the [multiplier](merge_multiplier).
    #[inline]
    pub fn points(&self) -> u64 {
        self.result.point_value().saturating_mul(self.multiplier())
    }
}

/// # Returns
///
/// `max(1, merged_count - 1)`. A placement merging with `k` neighbours consumes `k + 1`
/// pieces, so it earns `k` times the [point value](Piece::point_value). A placement without
/// a merge earns it once.
#[inline]
pub fn merge_multiplier(merged_count: usize) -> u64 {
    merged_count.saturating_sub(1).max(1) as u64
}

/// Finds the pieces that would merge if `candidate` were placed at `target`. The result is
/// the connected group of mergeable pieces sharing the candidate's value reachable from the
/// neighbours of `target`. A [wildcard](PieceKind::Wildcard) takes the highest value among
/// its mergeable neighbours. Nothing is mutated.
///
/// # Arguments
///
/// * `board`: The board being aimed at.
/// * `target`: Where the candidate would be placed.
/// * `candidate`: The piece being placed.
///
/// # Returns
///
/// The merging [coordinates](Coordinate) in scan order, empty when the candidate cannot
/// merge, when there are no partners, or when `target` is out of bounds.
pub fn would_merge_with(board: &Board, target: Coordinate, candidate: &Piece) -> MergeSet {
    if !candidate.can_merge() || board.cell(target).is_none() {
        return MergeSet::new();
    }

    let neighbors = board.neighbors(target);
    let value = match candidate.kind() {
        PieceKind::Wildcard => {
            let highest = neighbors
                .iter()
                .filter_map(|&neighbor| board.piece(neighbor))
                .filter(|piece| piece.can_merge())
                .map(Piece::value)
                .max();
            match highest {
                Some(value) => value,
                None => return MergeSet::new(),
            }
        }
        _ => candidate.value(),
    };

    let mut visited = hash_set! { target };
    connected_group(board, value, &mut visited, neighbors.into_vec())
}

/// Scans the board for the first connected group of more than one mergeable piece of equal
/// value. Groups are discovered from the first member in scan order.
///
/// # Returns
///
/// The group's [coordinates](Coordinate) in scan order, or [None] when the board is
/// quiescent.
pub fn first_merge(board: &Board) -> Option<MergeSet> {
    let mut grouped = HashSet::new();

    for cell in board.occupied_cells() {
        let coordinate = cell.coordinate();
        let Some(piece) = cell.piece() else {
            continue;
        };
        if !piece.can_merge() || grouped.contains(&coordinate) {
            continue;
        }

        let mut visited = HashSet::new();
        let group = connected_group(board, piece.value(), &mut visited, vec![coordinate]);
        if group.len() > 1 {
            return Some(group);
        }
        grouped.extend(group);
    }

    None
}

/// Drops `piece` at the open `target`. With a non-empty `merging` set, every merging piece is
/// taken off the board and `piece` becomes the result of the
/// [merge](Piece::was_placed_with_merge). Otherwise the piece is
/// [placed as is](Piece::was_placed_without_merge).
///
/// # Arguments
///
/// * `board`: The board being placed on.
/// * `target`: Where `piece` goes.
/// * `piece`: The piece being placed.
/// * `merging`: Usually [would_merge_with] for the same `target` and `piece`.
/// * `turn`: The current turn.
///
/// # Errors
///
/// * [BoardError::OutOfBounds] When `target` is not on the board.
/// * [BoardError::Occupied] When `target` already holds a piece.
///
/// Nothing is mutated on error.
pub fn resolve_placement(
    board: &mut Board,
    target: Coordinate,
    piece: Piece,
    merging: &MergeSet,
    turn: u64,
) -> Result<MergeRecord, BoardError> {
    if board.cell(target).is_none() {
        return Err(BoardError::OutOfBounds { coordinate: target });
    }
    if !board.is_open(target) {
        return Err(BoardError::Occupied { coordinate: target });
    }

    let consumed: Vec<Piece> = merging
        .iter()
        .filter_map(|&coordinate| board.take(coordinate))
        .collect();
    let result = match consumed.iter().map(Piece::value).max() {
        Some(max_value) => piece.was_placed_with_merge(max_value, turn),
        None => {
            let mut piece = piece;
            piece.was_placed_without_merge(turn);
            piece
        }
    };
    board.insert(target, result)?;

    let result = board
        .piece(target)
        .cloned()
        .unwrap_or_else(|| unreachable!("{:?} was just inserted into.", target));
    Ok(MergeRecord {
        coordinate: target,
        consumed,
        result,
    })
}

/// Repeatedly merges the [first group](first_merge) on the board until none is left.
/// The surviving piece of each group, the merge focus, is the member with the highest
/// [added](Piece::added) turn, ties going to the first in scan order. Every other member
/// is taken off the board, and the focus is replaced in place by the result of the merge.
///
/// Every cycle takes at least one piece off the board, so the loop ends after at most as
/// many cycles as there were pieces.
///
/// # Returns
///
/// A record per resolved group, in resolution order.
pub fn resolve_chain(board: &mut Board, turn: u64) -> Vec<MergeRecord> {
    let bound = board.occupied_len();
    let mut records = Vec::new();

    while let Some(group) = first_merge(board) {
        debug_assert!(
            records.len() < bound,
            "chain resolution should remove a piece every cycle."
        );

        let focus = group
            .iter()
            .copied()
            .min_by_key(|&coordinate| Reverse(board.piece(coordinate).map_or(0, Piece::added)))
            .unwrap_or_else(|| unreachable!("merge groups should hold more than one piece."));
        let max_value = group
            .iter()
            .filter_map(|&coordinate| board.piece(coordinate))
            .map(Piece::value)
            .max()
            .unwrap_or_default();

        let consumed: Vec<Piece> = group
            .iter()
            .filter(|&&coordinate| coordinate != focus)
            .filter_map(|&coordinate| board.take(coordinate))
            .collect();
        let Some(survivor) = board.take(focus) else {
            unreachable!("{:?} should hold the merge focus.", focus);
        };
        board
            .insert(focus, survivor.was_placed_with_merge(max_value, turn))
            .unwrap_or_else(|error| unreachable!("{:?} was just emptied: {}", focus, error));
        let result = board
            .piece(focus)
            .cloned()
            .unwrap_or_else(|| unreachable!("{:?} was just inserted into.", focus));

        debug!(?focus, consumed = consumed.len(), value = result.value(), "chain merge");
        records.push(MergeRecord {
            coordinate: focus,
            consumed,
            result,
        });
    }

    records
}

/// Flood fills from `frontier` through mergeable pieces of `value`, never entering
/// `visited` [coordinates](Coordinate).
fn connected_group(
    board: &Board,
    value: u32,
    visited: &mut HashSet<Coordinate>,
    mut frontier: Vec<Coordinate>,
) -> MergeSet {
    let mut group = MergeSet::new();

    while let Some(coordinate) = frontier.pop() {
        if !visited.insert(coordinate) {
            continue;
        }
        let merges = board
            .piece(coordinate)
            .map_or(false, |piece| piece.can_merge() && piece.value() == value);
        if merges {
            group.push(coordinate);
            frontier.extend(board.neighbors(coordinate));
        }
    }

    group.sort_unstable_by_key(|&(x, y)| (y, x));
    group
}
