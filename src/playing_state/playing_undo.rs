use crate::{GameEvent, Observer, PieceSupply, PlayingState};
use tracing::debug;

impl<S: PieceSupply, O: Observer> PlayingState<S, O> {
    /// Rolls the game back to how it was before the last placement, removal, collection or
    /// purchase. Only one step is kept, so a second undo in a row does nothing.
    ///
    /// # Returns
    ///
    /// Whether there was anything to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo.take() else {
            return false;
        };

        self.game = snapshot.into_game();
        debug!(turn = self.game.turn(), "undone");
        self.context.notify(GameEvent::Undone);
        self.stage();
        true
    }

    /// Whether [undo](PlayingState::undo) would do anything.
    #[inline]
    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }
}
