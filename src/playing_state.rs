use crate::{
    resolve_chain, Board, Coordinate, GameEvent, GameOverState, GameState, LevelConfig, LevelId,
    Observer, Persistence, PieceId, PieceSupply, Progress, TurnAction, UndoSnapshot, BOARD_LIMIT,
};
use derive_more::{Display, Error};
use either::Either;
use map_macro::hash_set;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use tracing::{debug, trace};

pub use playing_act::*;
pub use playing_collect::*;
pub use playing_place::*;
pub use playing_remove::*;
pub use playing_stash::*;
pub use playing_view::*;

mod playing_act;
mod playing_collect;
mod playing_place;
mod playing_remove;
mod playing_stash;
mod playing_undo;
mod playing_view;
#[cfg(test)]
mod test_setup;

/// The state a transaction leaves the game in: still [playing](PlayingState) or
/// [over](GameOverState).
pub type Outcome<S, O> = Either<PlayingState<S, O>, GameOverState<S, O>>;

/// The collaborators a game is played with. Owned by whichever state the game is in.
#[derive(Debug)]
pub(crate) struct Context<S, O> {
    pub(crate) supply: S,
    pub(crate) observer: O,
    pub(crate) rng: StdRng,
}

impl<S: PieceSupply, O: Observer> Context<S, O> {
    fn new(supply: S, observer: O, seed: Option<u64>) -> Context<S, O> {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Context {
            supply,
            observer,
            rng,
        }
    }

    #[inline]
    pub(crate) fn notify(&mut self, event: GameEvent) {
        self.observer.notify(&event);
    }
}

/// Owns the game while it awaits the player's next action. Every transaction either
/// returns the untouched state alongside an error or runs to completion, leaving the board
/// consistent. Created from [PlayingState::new] or [PlayingState::resume].
#[derive(Debug)]
pub struct PlayingState<S, O> {
    /// Everything undo and saving capture.
    game: GameState,
    /// The piece supply, observer, and random number generator.
    context: Context<S, O>,
    /// The state before the last undoable transaction.
    undo: Option<UndoSnapshot>,
    /// An open cell near the last placed piece.
    staged: Option<Coordinate>,
}

/// Describes the reason why [PlayingState] could not be created.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum NewError {
    /// Attempting [to start](PlayingState::new) a level with no cells.
    EmptyBoard {
        /// The requested number of columns.
        width: usize,
        /// The requested number of rows.
        height: usize,
    },
    /// Attempting [to start](PlayingState::new) a level wider or taller than
    /// the [board limit](BOARD_LIMIT).
    BoardTooLarge {
        /// The requested number of columns.
        width: usize,
        /// The requested number of rows.
        height: usize,
    },
    /// Attempting [to start](PlayingState::new) a level that has not been unlocked.
    LevelLocked {
        /// The requested level.
        level: LevelId,
    },
    /// The [piece supply](PieceSupply::init_level) left no open cell to play on.
    BoardFull,
}

/// Describes the reason why a saved game could not be [resumed](PlayingState::resume).
/// The caller should start a new level instead.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Display, Error)]
pub enum ResumeError<E> {
    /// The [persistence](Persistence) could not restore the state.
    #[display("could not restore the game: {_0}")]
    Restore(#[error(source)] E),
    /// The restored board does not have the configured dimensions.
    #[display(
        "expected a {}x{} board but restored a {}x{} board",
        expected.0,
        expected.1,
        actual.0,
        actual.1
    )]
    DimensionMismatch {
        /// The configured width and height.
        expected: (usize, usize),
        /// The restored width and height.
        actual: (usize, usize),
    },
    /// The restored game was played on another level.
    #[display("expected {expected:?} but restored {actual:?}")]
    LevelMismatch {
        /// The configured level.
        expected: LevelId,
        /// The restored level.
        actual: LevelId,
    },
}

impl<S: PieceSupply, O: Observer> PlayingState<S, O> {
    /// Checks that the configured board has between one and [BOARD_LIMIT] cells on a side and
    /// that the level is unlocked, then lays out the level and draws the first current piece.
    ///
    /// # Arguments
    ///
    /// * `config`: The level, board dimensions and seed.
    /// * `progress`: Carried over from earlier levels.
    /// * `supply`: Lays out the level and supplies every piece.
    /// * `observer`: Receives every event of the game.
    ///
    /// # Errors
    ///
    /// * [NewError::EmptyBoard] When either dimension is `0`.
    /// * [NewError::BoardTooLarge] When either dimension is greater than [BOARD_LIMIT].
    /// * [NewError::LevelLocked] When the level is not in `progress`.
    /// * [NewError::BoardFull] When the supply leaves no open cell.
    pub fn new(
        config: LevelConfig,
        progress: Progress,
        supply: S,
        observer: O,
    ) -> Result<PlayingState<S, O>, HashSet<NewError>> {
        let LevelConfig {
            level,
            width,
            height,
            seed,
        } = config;

        let mut errors = HashSet::new();
        if width == 0 || height == 0 {
            errors.insert(NewError::EmptyBoard { width, height });
        }
        if width > BOARD_LIMIT || height > BOARD_LIMIT {
            errors.insert(NewError::BoardTooLarge { width, height });
        }
        if !progress.unlocked.contains(&level) {
            errors.insert(NewError::LevelLocked { level });
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let mut board = Board::new(width, height)
            .unwrap_or_else(|error| unreachable!("dimensions were checked: {}", error));
        let mut context = Context::new(supply, observer, seed);
        context.supply.init_level(&mut board, &mut context.rng);
        if board.is_full() {
            return Err(hash_set! { NewError::BoardFull });
        }

        let current = context.supply.random_piece(&mut context.rng);
        let game = GameState::new(level, board, current, progress);
        debug!(?level, width, height, "level started");

        let mut playing_state = PlayingState {
            game,
            context,
            undo: None,
            staged: None,
        };
        playing_state.stage();
        Ok(playing_state)
    }

    /// Restores a saved game. A restored game with a full board is already over.
    ///
    /// # Arguments
    ///
    /// * `persistence`: Restores the state.
    /// * `blob`: From an earlier [save](PlayingState::save).
    /// * `config`: The level and board dimensions the game must match. The seed reseeds
    /// the game.
    /// * `supply`: Supplies every piece from here on.
    /// * `observer`: Receives every event from here on.
    ///
    /// # Errors
    ///
    /// * [ResumeError::Restore] When `persistence` fails.
    /// * [ResumeError::DimensionMismatch] When the restored board has other dimensions.
    /// * [ResumeError::LevelMismatch] When the restored game is on another level.
    pub fn resume<P: Persistence>(
        persistence: &P,
        blob: &P::Blob,
        config: LevelConfig,
        supply: S,
        observer: O,
    ) -> Result<Outcome<S, O>, ResumeError<P::Error>> {
        let game = persistence.restore(blob).map_err(ResumeError::Restore)?;

        let expected = (config.width, config.height);
        let actual = game.board().dimensions();
        if expected != actual {
            return Err(ResumeError::DimensionMismatch { expected, actual });
        }
        if config.level != game.level() {
            return Err(ResumeError::LevelMismatch {
                expected: config.level,
                actual: game.level(),
            });
        }

        debug!(level = ?game.level(), score = game.score(), "game resumed");
        let context = Context::new(supply, observer, config.seed);
        Ok(PlayingState::from_parts(game, context))
    }

    /// Stores the game with `persistence`. The stored state can be
    /// [resumed](PlayingState::resume) later.
    ///
    /// # Errors
    ///
    /// When `persistence` fails.
    pub fn save<P: Persistence>(&self, persistence: &P) -> Result<P::Blob, P::Error> {
        persistence.snapshot(&self.game)
    }

    /// Starts the level over: the board is laid out again, a new current piece is drawn, and
    /// the stash, score and undo snapshot are cleared. Progress is kept.
    ///
    /// # Returns
    ///
    /// Either the [playing state](PlayingState) or, if the supply left no open cell,
    /// the [game over state](GameOverState).
    pub fn reset(self) -> Outcome<S, O> {
        PlayingState::restart(self.game, self.context)
    }

    /// Leaves the level.
    ///
    /// # Returns
    ///
    /// The high score, bank and unlocked levels to start the next level with.
    pub fn exit_level(self) -> Progress {
        self.game.progress()
    }

    /// The state undo and saving capture.
    #[inline]
    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// The board being played on.
    #[inline]
    pub fn board(&self) -> &Board {
        self.game.board()
    }

    /// The observer receiving the game's events.
    #[inline]
    pub fn observer(&self) -> &O {
        &self.context.observer
    }

    /// Lays out the level again on an emptied board.
    pub(crate) fn restart(mut game: GameState, mut context: Context<S, O>) -> Outcome<S, O> {
        game.restart();
        context
            .supply
            .init_level(game.board_mut(), &mut context.rng);
        game.issue_board_ids();
        let current = context.supply.random_piece(&mut context.rng);
        let current = game.issue(current);
        game.replace_current(current);
        debug!(level = ?game.level(), "level restarted");

        PlayingState::from_parts(game, context)
    }

    /// Wraps `game` in the state matching its board, without an undo snapshot. A full board
    /// reports the game as over.
    pub(crate) fn from_parts(game: GameState, mut context: Context<S, O>) -> Outcome<S, O> {
        if game.board().is_full() {
            let score = game.score();
            debug!(score, "game over");
            context.notify(GameEvent::GameOver { score });
            return Either::Right(GameOverState::new(game, context));
        }

        let mut playing_state = PlayingState {
            game,
            context,
            undo: None,
            staged: None,
        };
        playing_state.stage();
        Either::Left(playing_state)
    }

    /// Saves the state for undo, overwriting any earlier snapshot.
    #[inline]
    fn capture(&mut self) {
        self.undo = Some(UndoSnapshot::capture(&self.game));
    }

    /// Replaces the current piece with a new one from the supply.
    fn generate_current_piece(&mut self) {
        let piece = self.context.supply.random_piece(&mut self.context.rng);
        let piece = self.game.issue(piece);
        self.game.replace_current(piece);
    }

    /// Adds `points` to the score and reports it along with any unlocked level.
    fn award(&mut self, points: u64) {
        let unlocked = self.game.award_points(points);
        self.context.notify(GameEvent::PointsAwarded {
            points,
            score: self.game.score(),
        });
        if let Some(level) = unlocked {
            self.context.notify(GameEvent::LevelUnlocked { level });
        }
    }

    /// Gives every piece on the board its turn, in scan order captured once beforehand, then
    /// resolves chain merges until the board is quiescent. A captured cell whose piece has
    /// since changed is skipped, so no piece acts twice.
    fn turn_did_end(&mut self, turn: u64) {
        let captured: Vec<(Coordinate, PieceId)> = self
            .game
            .board()
            .occupied_cells()
            .filter_map(|cell| cell.piece().map(|piece| (cell.coordinate(), piece.id())))
            .collect();

        for (coordinate, id) in captured {
            let action = match self.game.board().piece(coordinate) {
                Some(piece) if piece.id() == id => {
                    piece.take_turn(self.game.board(), coordinate, &mut self.context.rng)
                }
                _ => continue,
            };

            match action {
                TurnAction::Stay => {}
                TurnAction::MoveTo(to) => {
                    if let Err(error) = self.game.board_mut().move_piece(coordinate, to) {
                        unreachable!("pieces should only move to open neighbours: {}", error);
                    }
                    trace!(?coordinate, ?to, "piece moved");
                    self.context.notify(GameEvent::PieceMoved {
                        from: coordinate,
                        to,
                    });
                }
                TurnAction::Become(piece) => {
                    if let Err(error) = self.game.board_mut().replace(coordinate, piece.clone()) {
                        unreachable!("{:?} should be on the board: {}", coordinate, error);
                    }
                    self.context
                        .notify(GameEvent::PieceChanged { coordinate, piece });
                }
            }
        }

        for record in resolve_chain(self.game.board_mut(), turn) {
            let points = record.points();
            self.context.notify(GameEvent::MergeResolved {
                coordinate: record.coordinate,
                consumed: record.consumed,
                result: record.result,
            });
            self.award(points);
        }

        self.context.notify(GameEvent::TurnEnded {
            score: self.game.score(),
        });
    }

    /// Picks the open cell nearest the last placed piece, or nearest the center of the board
    /// when there is none.
    fn stage(&mut self) {
        let board = self.game.board();
        let target = self
            .game
            .last_placed()
            .and_then(|id| board.find(id))
            .unwrap_or_else(|| board.center());
        self.staged = board.random_open_cell_near(target, &mut self.context.rng);
    }

    /// Ends a transaction that ran the turn: a full board ends the game and clears undo.
    fn finish(mut self) -> Outcome<S, O> {
        if self.game.board().is_full() {
            let score = self.game.score();
            debug!(score, "game over");
            self.context.notify(GameEvent::GameOver { score });
            return Either::Right(GameOverState::new(self.game, self.context));
        }

        self.stage();
        Either::Left(self)
    }
}
