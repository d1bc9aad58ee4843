use crate::{Coordinate, GameEvent, Observer, Outcome, PieceSupply, PlayingState};
use derive_more::{Display, Error};
use tracing::{debug, instrument};

/// Describes the reason why a piece could not be [removed](PlayingState::remove).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Display, Error)]
pub enum RemoveError {
    /// Attempting [to remove](PlayingState::remove) without holding
    /// a [remove tool](crate::PieceKind::RemoveTool).
    #[display("the current piece is not a remove tool")]
    NotRemoveTool,
    /// Attempting [to remove](PlayingState::remove) outside the board.
    #[display("{coordinate:?} is outside the board")]
    OutOfBounds {
        /// The targeted [coordinate](Coordinate).
        coordinate: Coordinate,
    },
    /// Attempting [to remove](PlayingState::remove) from an open cell.
    #[display("{coordinate:?} holds no piece")]
    Open {
        /// The targeted [coordinate](Coordinate).
        coordinate: Coordinate,
    },
}

impl<S: PieceSupply, O: Observer> PlayingState<S, O> {
    /// Uses the current [remove tool](crate::PieceKind::RemoveTool) on the piece at `target`.
    /// Saves the state for undo, erases the piece, draws a new current piece, and ends
    /// the turn. No points are awarded for the removal itself.
    ///
    /// # Arguments
    ///
    /// * `target`: The occupied cell to clear.
    ///
    /// # Errors
    ///
    /// * [RemoveError::NotRemoveTool] Attempting to remove without holding a remove tool.
    /// * [RemoveError::OutOfBounds] Attempting to remove outside the board.
    /// * [RemoveError::Open] Attempting to remove from an open cell.
    ///
    /// # Returns
    ///
    /// Either the [playing state](PlayingState) or, if the turn filled the board,
    /// the [game over state](crate::GameOverState).
    #[instrument(level = "debug", skip(self))]
    pub fn remove(mut self, target: Coordinate) -> Result<Outcome<S, O>, (Self, RemoveError)> {
        if let Err(error) = self.check_remove(target) {
            return Err((self, error));
        }

        self.capture();
        let turn = self.game.next_turn();
        let Some(piece) = self.game.board_mut().take(target) else {
            unreachable!("{:?} was checked to be occupied.", target);
        };
        debug!(id = piece.id(), "piece removed");
        self.context.notify(GameEvent::PieceRemoved {
            coordinate: target,
            piece: piece.clone(),
        });
        piece.was_removed();

        self.generate_current_piece();
        self.turn_did_end(turn);
        Ok(self.finish())
    }

    fn check_remove(&self, target: Coordinate) -> Result<(), RemoveError> {
        if !self.game.current().is_remove_tool() {
            return Err(RemoveError::NotRemoveTool);
        }
        let cell = self
            .game
            .board()
            .cell(target)
            .ok_or(RemoveError::OutOfBounds { coordinate: target })?;
        if cell.is_open() {
            return Err(RemoveError::Open { coordinate: target });
        }
        Ok(())
    }
}
