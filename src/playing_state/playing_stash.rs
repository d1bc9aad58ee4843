use crate::{GameEvent, Observer, Piece, PieceSupply, PlayingState};
use derive_more::{Display, Error};
use tracing::debug;

/// Describes the reason why a piece could not be [purchased](PlayingState::purchase).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Display, Error)]
pub enum PurchaseError {
    /// Attempting [to purchase](PlayingState::purchase) a piece costing more than the bank
    /// holds.
    #[display("the piece costs {cost} but the bank holds {bank_points}")]
    InsufficientBankPoints {
        /// The price of the piece.
        cost: u64,
        /// The points in the bank.
        bank_points: u64,
    },
}

impl<S: PieceSupply, O: Observer> PlayingState<S, O> {
    /// Swaps the current piece with the stash. When the stash is empty, the current piece is
    /// stashed and a new current piece is drawn. The swap is not saved for undo.
    pub fn swap_stash(&mut self) {
        let current = match self.game.replace_stash(None) {
            Some(stashed) => stashed,
            None => {
                let piece = self.context.supply.random_piece(&mut self.context.rng);
                self.game.issue(piece)
            }
        };
        let stashed = self.game.replace_current(current);
        self.game.replace_stash(Some(stashed));
        self.context.notify(GameEvent::StashSwapped);
    }

    /// Spends `cost` bank points to replace the current piece with `piece`. The purchase is
    /// saved for undo, which refunds it.
    ///
    /// # Errors
    ///
    /// * [PurchaseError::InsufficientBankPoints] When the bank holds less than `cost`.
    pub fn purchase(&mut self, piece: Piece, cost: u64) -> Result<(), PurchaseError> {
        let bank_points = self.game.bank_points();
        if bank_points < cost {
            return Err(PurchaseError::InsufficientBankPoints { cost, bank_points });
        }

        self.capture();
        if !self.game.spend(cost) {
            unreachable!("the bank was checked to hold {} points.", cost);
        }
        let piece = self.game.issue(piece);
        debug!(cost, kind = ?piece.kind(), "piece purchased");
        self.game.replace_current(piece);
        Ok(())
    }
}
