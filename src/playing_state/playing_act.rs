use crate::{
    CollectError, Coordinate, Observer, Outcome, PieceSupply, PlaceError, PlayingState,
    RemoveError,
};
use derive_more::{Display, Error, From};
use either::Either;

/// Describes the reason why a touch could not be [acted on](PlayingState::act).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Display, Error, From)]
pub enum ActionError {
    /// The touch was a [placement](PlayingState::place).
    #[display("{_0}")]
    Place(PlaceError),
    /// The touch was a [removal](PlayingState::remove).
    #[display("{_0}")]
    Remove(RemoveError),
    /// The touch was a [collection](PlayingState::collect).
    #[display("{_0}")]
    Collect(CollectError),
}

impl<S: PieceSupply, O: Observer> PlayingState<S, O> {
    /// Acts on the player releasing a touch at `target`. Holding a
    /// [remove tool](crate::PieceKind::RemoveTool) [removes](PlayingState::remove), touching
    /// a [collectible](crate::PieceKind::Collectible) [collects](PlayingState::collect) it,
    /// and anything else [places](PlayingState::place) the current piece.
    ///
    /// # Errors
    ///
    /// * [ActionError::Place] When the placement is illegal.
    /// * [ActionError::Remove] When the removal is illegal.
    /// * [ActionError::Collect] When the collection is illegal.
    ///
    /// # Returns
    ///
    /// Either the [playing state](PlayingState) or the [game over state](crate::GameOverState).
    pub fn act(mut self, target: Coordinate) -> Result<Outcome<S, O>, (Self, ActionError)> {
        if self.game.current().is_remove_tool() {
            return self
                .remove(target)
                .map_err(|(playing_state, error)| (playing_state, error.into()));
        }

        let collectible = self
            .game
            .board()
            .piece(target)
            .map_or(false, |piece| piece.is_collectible());
        if collectible {
            return match self.collect(target) {
                Ok(_) => Ok(Either::Left(self)),
                Err(error) => Err((self, error.into())),
            };
        }

        self.place(target)
            .map_err(|(playing_state, error)| (playing_state, error.into()))
    }
}
