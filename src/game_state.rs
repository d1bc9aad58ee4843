use crate::{Board, LevelId, Piece, PieceId, BANK_PERCENT};
use map_macro::btree_set;
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::mem;
use tracing::{debug, trace};

/// Everything that outlives a single level: the best score, the bank and the unlocked levels.
/// Returned when [exiting a level](crate::PlayingState::exit_level) and passed in when
/// [starting one](crate::PlayingState::new).
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Progress {
    /// The highest score reached on any level.
    pub high_score: u64,
    /// Points available to [purchase](crate::PlayingState::purchase) pieces with.
    pub bank_points: u64,
    /// The levels that may be started.
    pub unlocked: BTreeSet<LevelId>,
}

impl Default for Progress {
    /// No points and only [the hexagon](LevelId::Hexagon) unlocked.
    fn default() -> Self {
        Progress {
            high_score: 0,
            bank_points: 0,
            unlocked: btree_set! { LevelId::Hexagon },
        }
    }
}

/// The complete state of a game in progress. Cloning it captures everything needed to
/// [undo](crate::PlayingState::undo) a transaction or [save](crate::PlayingState::save) the game.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct GameState {
    board: Board,
    current: Piece,
    stash: Option<Piece>,
    score: u64,
    bank_points: u64,
    high_score: u64,
    last_placed: Option<PieceId>,
    unlocked: BTreeSet<LevelId>,
    level: LevelId,
    turn: u64,
    next_id: PieceId,
}

impl GameState {
    /// Issues ids to every piece on `board` and then to `current`.
    ///
    /// # Arguments
    ///
    /// * `level`: The level being played.
    /// * `board`: The laid out board.
    /// * `current`: The first piece the player holds.
    /// * `progress`: Carried over from earlier levels.
    pub fn new(level: LevelId, board: Board, current: Piece, progress: Progress) -> GameState {
        let mut game = GameState {
            board,
            current,
            stash: None,
            score: 0,
            bank_points: progress.bank_points,
            high_score: progress.high_score,
            last_placed: None,
            unlocked: progress.unlocked,
            level,
            turn: 0,
            next_id: 1,
        };
        game.issue_board_ids();
        let current = game.current.clone();
        game.current = game.issue(current);
        game
    }

    /// The board being played on.
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The piece the player will place next.
    #[inline]
    pub fn current(&self) -> &Piece {
        &self.current
    }

    /// The piece set aside for later, if any.
    #[inline]
    pub fn stash(&self) -> Option<&Piece> {
        self.stash.as_ref()
    }

    /// The points earned on this level.
    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Points available to [purchase](crate::PlayingState::purchase) pieces with. Every award
    /// banks [BANK_PERCENT] percent of its points.
    #[inline]
    pub fn bank_points(&self) -> u64 {
        self.bank_points
    }

    /// The highest score reached on any level.
    #[inline]
    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// The id of the last piece placed on the board, if any.
    #[inline]
    pub fn last_placed(&self) -> Option<PieceId> {
        self.last_placed
    }

    /// The levels that may be started.
    #[inline]
    pub fn unlocked(&self) -> &BTreeSet<LevelId> {
        &self.unlocked
    }

    /// The level being played.
    #[inline]
    pub fn level(&self) -> LevelId {
        self.level
    }

    /// The number of transactions played on this level.
    #[inline]
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// # Returns
    ///
    /// The parts of the game that outlive the level.
    pub fn progress(&self) -> Progress {
        Progress {
            high_score: self.high_score,
            bank_points: self.bank_points,
            unlocked: self.unlocked.clone(),
        }
    }

    #[inline]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Gives `piece` the next unused id.
    pub(crate) fn issue(&mut self, mut piece: Piece) -> Piece {
        piece.set_id(self.next_id);
        self.next_id += 1;
        piece
    }

    /// Gives every piece on the board the next unused ids in scan order.
    pub(crate) fn issue_board_ids(&mut self) {
        let mut next_id = self.next_id;
        for piece in self.board.pieces_mut() {
            piece.set_id(next_id);
            next_id += 1;
        }
        self.next_id = next_id;
    }

    /// Advances the turn counter.
    ///
    /// # Returns
    ///
    /// The new turn.
    pub(crate) fn next_turn(&mut self) -> u64 {
        self.turn += 1;
        self.turn
    }

    /// Adds `points` to the score and a share of them to the bank, raises the high score, and
    /// unlocks the next level once its score is reached.
    ///
    /// # Returns
    ///
    /// The level unlocked by this award, if any.
    pub(crate) fn award_points(&mut self, points: u64) -> Option<LevelId> {
        self.score = self.score.saturating_add(points);
        self.bank_points = self
            .bank_points
            .saturating_add(points.saturating_mul(BANK_PERCENT) / 100);
        self.high_score = self.high_score.max(self.score);
        trace!(points, score = self.score, "points awarded");

        let (next, threshold) = self.level.unlocks()?;
        if self.score >= threshold && self.unlocked.insert(next) {
            debug!(level = ?next, "level unlocked");
            return Some(next);
        }
        None
    }

    #[inline]
    pub(crate) fn add_bank_points(&mut self, points: u64) {
        self.bank_points = self.bank_points.saturating_add(points);
    }

    /// Takes `cost` out of the bank.
    ///
    /// # Returns
    ///
    /// Whether the bank held enough points. Nothing is taken otherwise.
    pub(crate) fn spend(&mut self, cost: u64) -> bool {
        match self.bank_points.checked_sub(cost) {
            Some(remaining) => {
                self.bank_points = remaining;
                true
            }
            None => false,
        }
    }

    /// # Returns
    ///
    /// The piece that was current.
    #[inline]
    pub(crate) fn replace_current(&mut self, piece: Piece) -> Piece {
        mem::replace(&mut self.current, piece)
    }

    #[inline]
    pub(crate) fn replace_stash(&mut self, piece: Option<Piece>) -> Option<Piece> {
        mem::replace(&mut self.stash, piece)
    }

    #[inline]
    pub(crate) fn set_last_placed(&mut self, id: Option<PieceId>) {
        self.last_placed = id;
    }

    /// Empties the board and stash and zeroes the score. Progress and the turn counter
    /// are kept.
    pub(crate) fn restart(&mut self) {
        self.board.clear();
        self.stash = None;
        self.score = 0;
        self.last_placed = None;
    }
}

/// A deep copy of a [GameState] taken before a transaction mutates it. At most one is kept
/// and [undoing](crate::PlayingState::undo) consumes it.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct UndoSnapshot(GameState);

impl UndoSnapshot {
    /// Copies `game`.
    #[inline]
    pub fn capture(game: &GameState) -> UndoSnapshot {
        UndoSnapshot(game.clone())
    }

    /// The copied state.
    #[inline]
    pub fn game(&self) -> &GameState {
        &self.0
    }

    /// Gives back the copied state.
    #[inline]
    pub fn into_game(self) -> GameState {
        self.0
    }
}

/// Stores and restores a [GameState]. The game only depends on this contract, never on
/// a storage format.
///
/// # See Also
///
/// * [PlayingState::save](crate::PlayingState::save)
/// * [PlayingState::resume](crate::PlayingState::resume)
pub trait Persistence {
    /// What a stored game looks like.
    type Blob;
    /// Why storing or restoring failed.
    type Error;

    /// # Errors
    ///
    /// When the state could not be stored.
    fn snapshot(&self, game: &GameState) -> Result<Self::Blob, Self::Error>;

    /// # Errors
    ///
    /// When `blob` does not hold a state.
    fn restore(&self, blob: &Self::Blob) -> Result<GameState, Self::Error>;
}

/// A [Persistence] keeping states in memory as [snapshots](UndoSnapshot). Never fails.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct ClonePersistence;

impl Persistence for ClonePersistence {
    type Blob = UndoSnapshot;
    type Error = Infallible;

    fn snapshot(&self, game: &GameState) -> Result<UndoSnapshot, Infallible> {
        Ok(UndoSnapshot::capture(game))
    }

    fn restore(&self, blob: &UndoSnapshot) -> Result<GameState, Infallible> {
        Ok(blob.game().clone())
    }
}
