use crate::{Coordinate, GameEvent, Observer, PieceSupply, PlayingState};
use derive_more::{Display, Error};
use tracing::{debug, instrument};

/// Describes the reason why a piece could not be [collected](PlayingState::collect).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Display, Error)]
pub enum CollectError {
    /// Attempting [to collect](PlayingState::collect) outside the board.
    #[display("{coordinate:?} is outside the board")]
    OutOfBounds {
        /// The targeted [coordinate](Coordinate).
        coordinate: Coordinate,
    },
    /// Attempting [to collect](PlayingState::collect) from a cell not holding
    /// a [collectible](crate::PieceKind::Collectible).
    #[display("{coordinate:?} holds no collectible")]
    NotCollectible {
        /// The targeted [coordinate](Coordinate).
        coordinate: Coordinate,
    },
}

impl<S: PieceSupply, O: Observer> PlayingState<S, O> {
    /// Harvests the [collectible](crate::PieceKind::Collectible) at `target` into the bank.
    /// Saves the state for undo and clears the cell. The turn does not end and the current
    /// piece is kept.
    ///
    /// # Arguments
    ///
    /// * `target`: The cell holding the collectible.
    ///
    /// # Errors
    ///
    /// * [CollectError::OutOfBounds] Attempting to collect outside the board.
    /// * [CollectError::NotCollectible] Attempting to collect from a cell not holding
    /// a collectible.
    ///
    /// # Returns
    ///
    /// The number of points paid into the bank.
    #[instrument(level = "debug", skip(self))]
    pub fn collect(&mut self, target: Coordinate) -> Result<u64, CollectError> {
        let board = self.game.board();
        if board.cell(target).is_none() {
            return Err(CollectError::OutOfBounds { coordinate: target });
        }
        if !board.piece(target).map_or(false, |piece| piece.is_collectible()) {
            return Err(CollectError::NotCollectible { coordinate: target });
        }

        self.capture();
        let Some(piece) = self.game.board_mut().take(target) else {
            unreachable!("{:?} was checked to hold a collectible.", target);
        };
        let bank_points = piece.clone().was_collected();
        self.game.add_bank_points(bank_points);
        debug!(bank_points, "piece collected");
        self.context.notify(GameEvent::PieceCollected {
            coordinate: target,
            piece,
            bank_points,
        });

        self.stage();
        Ok(bank_points)
    }
}
