use crate::{
    would_merge_with, Board, Cell, Coordinate, Movement, Piece, MOAT_UNLOCK_SCORE,
    PIT_UNLOCK_SCORE,
};
use derive_more::{Display, Error};
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// The maps a game can be played on. Ordered by when they unlock.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum LevelId {
    /// The starting map. Always unlocked.
    Hexagon,
    /// Unlocked by scoring [PIT_UNLOCK_SCORE] on [the hexagon](LevelId::Hexagon).
    Pit,
    /// Unlocked by scoring [MOAT_UNLOCK_SCORE] on [the pit](LevelId::Pit).
    Moat,
}

impl LevelId {
    /// The number of [`LevelId`] variants.
    pub const LEVELS_LEN: usize = 3;

    /// # Returns
    ///
    /// An array of all [`LevelId`] variants in unlock order.
    #[inline]
    pub fn levels() -> [LevelId; LevelId::LEVELS_LEN] {
        [LevelId::Hexagon, LevelId::Pit, LevelId::Moat]
    }

    /// # Returns
    ///
    /// The level unlocked while playing this one and the score needed to unlock it,
    /// or [None] for the last level.
    pub fn unlocks(self) -> Option<(LevelId, u64)> {
        match self {
            LevelId::Hexagon => Some((LevelId::Pit, PIT_UNLOCK_SCORE)),
            LevelId::Pit => Some((LevelId::Moat, MOAT_UNLOCK_SCORE)),
            LevelId::Moat => None,
        }
    }

    /// The default board width and height of the level.
    pub fn dimensions(self) -> (usize, usize) {
        match self {
            LevelId::Hexagon => (7, 7),
            LevelId::Pit => (8, 8),
            LevelId::Moat => (9, 9),
        }
    }
}

/// Runtime settings for starting a level.
///
/// # See Also
///
/// * [PlayingState::new](crate::PlayingState::new)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LevelConfig {
    /// The level being played.
    pub level: LevelId,
    /// The number of columns on the board.
    pub width: usize,
    /// The number of rows on the board.
    pub height: usize,
    /// Seeds every random choice of the game when present. Otherwise, the game is seeded
    /// from entropy.
    pub seed: Option<u64>,
}

impl LevelConfig {
    /// A config with the level's [default dimensions](LevelId::dimensions) and no seed.
    pub fn new(level: LevelId) -> LevelConfig {
        let (width, height) = level.dimensions();
        LevelConfig {
            level,
            width,
            height,
            seed: None,
        }
    }

    /// Overrides the board dimensions.
    #[inline]
    pub fn with_dimensions(self, width: usize, height: usize) -> LevelConfig {
        LevelConfig {
            width,
            height,
            ..self
        }
    }

    /// Makes every random choice of the game reproducible.
    #[inline]
    pub fn with_seed(self, seed: u64) -> LevelConfig {
        LevelConfig {
            seed: Some(seed),
            ..self
        }
    }
}

/// Supplies the pieces a level is played with.
pub trait PieceSupply {
    /// # Returns
    ///
    /// The next piece the player will hold.
    fn random_piece<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Piece;

    /// Lays out the starting pieces of the level on an empty board.
    fn init_level<R: Rng + ?Sized>(&mut self, board: &mut Board, rng: &mut R);
}

/// Describes the reason why a [WeightedSupply] could not be created.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Display, Error)]
pub enum SupplyError {
    /// Attempting to create a supply with no pieces.
    #[display("the supply has no pieces")]
    EmptyTable,
    /// Attempting to create a supply where every weight is zero or there are too many pieces.
    #[display("the supply weights are invalid")]
    InvalidWeights,
}

impl From<WeightedError> for SupplyError {
    fn from(error: WeightedError) -> Self {
        match error {
            WeightedError::NoItem => SupplyError::EmptyTable,
            _ => SupplyError::InvalidWeights,
        }
    }
}

/// The default [PieceSupply]. Draws pieces from a weighted table and starts each level with
/// a scattering of low value pieces that do not merge with each other.
#[derive(Debug, Clone)]
pub struct WeightedSupply {
    pieces: Vec<Piece>,
    weights: WeightedIndex<u32>,
    starting_pieces: usize,
}

impl WeightedSupply {
    /// # Arguments
    ///
    /// * `table`: Pieces paired with their relative weights.
    /// * `starting_pieces`: The number of pieces [laid out](PieceSupply::init_level) at
    /// the start of the level. At least one cell is always left open.
    ///
    /// # Errors
    ///
    /// * [SupplyError::EmptyTable] When `table` is empty.
    /// * [SupplyError::InvalidWeights] When every weight is zero.
    pub fn new(
        table: Vec<(Piece, u32)>,
        starting_pieces: usize,
    ) -> Result<WeightedSupply, SupplyError> {
        let weights = WeightedIndex::new(table.iter().map(|(_, weight)| *weight))?;
        let pieces = table.into_iter().map(|(piece, _)| piece).collect();

        Ok(WeightedSupply {
            pieces,
            weights,
            starting_pieces,
        })
    }

    /// The default supply of `level`.
    pub fn for_level(level: LevelId) -> WeightedSupply {
        let (table, starting_pieces) = match level {
            LevelId::Hexagon => (
                vec![
                    (Piece::normal(0), 550),
                    (Piece::normal(1), 250),
                    (Piece::normal(2), 80),
                    (Piece::mobile(Movement::Wander, 0), 60),
                    (Piece::wildcard(), 30),
                    (Piece::remove_tool(), 30),
                ],
                6,
            ),
            LevelId::Pit => (
                vec![
                    (Piece::normal(0), 500),
                    (Piece::normal(1), 250),
                    (Piece::normal(2), 80),
                    (Piece::mobile(Movement::Wander, 0), 60),
                    (Piece::mobile(Movement::Settle, 1), 40),
                    (Piece::wildcard(), 40),
                    (Piece::remove_tool(), 30),
                ],
                8,
            ),
            LevelId::Moat => (
                vec![
                    (Piece::normal(0), 450),
                    (Piece::normal(1), 250),
                    (Piece::normal(2), 100),
                    (Piece::mobile(Movement::Wander, 1), 60),
                    (Piece::mobile(Movement::Settle, 1), 60),
                    (Piece::wildcard(), 50),
                    (Piece::remove_tool(), 30),
                ],
                10,
            ),
        };

        WeightedSupply::new(table, starting_pieces)
            .unwrap_or_else(|error| unreachable!("default tables should be valid: {}", error))
    }

    /// The number of pieces laid out at the start of the level.
    #[inline]
    pub fn starting_pieces(&self) -> usize {
        self.starting_pieces
    }
}

impl PieceSupply for WeightedSupply {
    fn random_piece<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Piece {
        self.pieces[self.weights.sample(rng)].clone()
    }

    fn init_level<R: Rng + ?Sized>(&mut self, board: &mut Board, rng: &mut R) {
        let mut open: Vec<Coordinate> = board.open_cells().map(Cell::coordinate).collect();
        open.shuffle(rng);
        let limit = self.starting_pieces.min(open.len().saturating_sub(1));

        let mut placed = 0;
        for coordinate in open {
            if placed == limit {
                break;
            }
            let piece = Piece::normal(rng.gen_range(0..=2));
            if !would_merge_with(board, coordinate, &piece).is_empty() {
                continue;
            }
            if board.insert(coordinate, piece).is_ok() {
                placed += 1;
            }
        }

        debug!(placed, "level laid out");
    }
}
