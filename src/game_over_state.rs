use crate::playing_state::Context;
use crate::{
    Board, GameState, LevelId, Observer, Outcome, Persistence, PieceSupply, PlayingState, Progress,
};

/// Owns the game after the board filled up. Nothing can be placed anymore; the level can only
/// be [started over](GameOverState::reset) or [left](GameOverState::exit_level). Created from
/// any transaction of [PlayingState] that ends the turn.
#[derive(Debug)]
pub struct GameOverState<S, O> {
    /// The final state of the game.
    game: GameState,
    /// The piece supply, observer, and random number generator.
    context: Context<S, O>,
}

/// Immutably borrows properties from [`GameOverState`].
#[derive(Debug)]
pub struct GameOverView<'a> {
    /// The full board.
    pub board: &'a Board,
    /// The final score.
    pub score: u64,
    /// The highest score reached on any level.
    pub high_score: u64,
    /// Points available to spend.
    pub bank_points: u64,
    /// The level that was played.
    pub level: LevelId,
}

impl<S, O> GameOverState<S, O> {
    /// # Arguments
    ///
    /// * `game`: The final state of the game.
    /// * `context`: Carried over from the [playing state](PlayingState).
    ///
    /// # Returns
    ///
    /// A [`GameOverState`] struct with properties owned from arguments.
    pub(crate) fn new(game: GameState, context: Context<S, O>) -> GameOverState<S, O> {
        GameOverState { game, context }
    }

    /// # Returns
    ///
    /// A new [`GameOverView`] struct, which immutably borrows properties from
    /// [`GameOverState`].
    pub fn game_over_view(&self) -> GameOverView<'_> {
        GameOverView {
            board: self.game.board(),
            score: self.game.score(),
            high_score: self.game.high_score(),
            bank_points: self.game.bank_points(),
            level: self.game.level(),
        }
    }

    /// The final state of the game.
    #[inline]
    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// The observer that received the game's events.
    #[inline]
    pub fn observer(&self) -> &O {
        &self.context.observer
    }

    /// Stores the finished game with `persistence`. Resuming it gives back
    /// a [`GameOverState`].
    ///
    /// # Errors
    ///
    /// When `persistence` fails.
    pub fn save<P: Persistence>(&self, persistence: &P) -> Result<P::Blob, P::Error> {
        persistence.snapshot(&self.game)
    }

    /// Leaves the level.
    ///
    /// # Returns
    ///
    /// The high score, bank and unlocked levels to start the next level with.
    pub fn exit_level(self) -> Progress {
        self.game.progress()
    }
}

impl<S: PieceSupply, O: Observer> GameOverState<S, O> {
    /// Starts the level over. See [PlayingState::reset].
    pub fn reset(self) -> Outcome<S, O> {
        PlayingState::restart(self.game, self.context)
    }
}
