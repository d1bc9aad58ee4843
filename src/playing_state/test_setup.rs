use crate::{
    fill_board_without_merges, Coordinate, EventLog, GameEvent, GameState, LevelConfig, LevelId,
    Piece, PlayingState, Progress, ScriptedSupply,
};
use rand::Rng;
use std::iter;

impl PlayingState<ScriptedSupply, EventLog> {
    /// Generates a [PlayingState] on an empty [hexagon](LevelId::Hexagon) board with default
    /// [progress](Progress).
    ///
    /// # Arguments
    ///
    /// * `width`: The number of columns.
    /// * `height`: The number of rows.
    /// * `current`: The first current piece.
    /// * `upcoming`: The pieces drawn after `current`, in order. Once they run out,
    /// [ScriptedSupply] draws normal value `0` pieces.
    pub fn scripted(
        width: usize,
        height: usize,
        current: Piece,
        upcoming: Vec<Piece>,
    ) -> PlayingState<ScriptedSupply, EventLog> {
        let config = LevelConfig::new(LevelId::Hexagon)
            .with_dimensions(width, height)
            .with_seed(rand::thread_rng().gen());
        let supply = ScriptedSupply::new(iter::once(current).chain(upcoming).collect());

        PlayingState::new(config, Progress::default(), supply, EventLog::new())
            .unwrap_or_else(|errors| panic!("scripted states should be valid: {:?}", errors))
    }

    /// Inserts `piece` at `coordinate` with a fresh id, as if it were laid out with the level.
    ///
    /// # Panics
    ///
    /// If `coordinate` is out of bounds or occupied.
    pub fn put(&mut self, coordinate: Coordinate, piece: Piece) {
        let piece = self.game.issue(piece);
        self.game
            .board_mut()
            .insert(coordinate, piece)
            .unwrap_or_else(|error| panic!("{}", error));
    }

    /// Clears the board and then fills every cell except those in `except` with normal pieces
    /// that do not merge with each other.
    pub fn fill_without_merges(&mut self, base: u32, except: &[Coordinate]) {
        let board = self.game.board_mut();
        board.clear();
        fill_board_without_merges(board, base, except);
        self.game.issue_board_ids();
    }

    /// Picks the staged cell again after the board was changed directly.
    pub fn restage(&mut self) {
        self.stage();
    }

    /// A mutable reference to `self.game`.
    pub fn mut_game(&mut self) -> &mut GameState {
        &mut self.game
    }

    /// A mutable reference to the piece supply.
    pub fn mut_supply(&mut self) -> &mut ScriptedSupply {
        &mut self.context.supply
    }

    /// Every event received so far, oldest first.
    pub fn events(&self) -> &[GameEvent] {
        self.context.observer.events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_draws_in_order() {
        let mut playing_state = PlayingState::scripted(
            3,
            3,
            Piece::normal(4),
            vec![Piece::wildcard(), Piece::remove_tool()],
        );
        assert_eq!(4, playing_state.game().current().value());

        playing_state.swap_stash();
        assert_eq!(Piece::wildcard().kind(), playing_state.game().current().kind());
        playing_state.swap_stash();
        assert_eq!(4, playing_state.game().current().value());
    }

    #[test]
    fn scripted_board_is_empty() {
        let playing_state = PlayingState::scripted(4, 2, Piece::normal(0), vec![]);
        assert_eq!(8, playing_state.board().open_len());
        assert!(playing_state.events().is_empty());
    }

    #[test]
    fn put_issues_ids() {
        let mut playing_state = PlayingState::scripted(3, 3, Piece::normal(0), vec![]);
        playing_state.put((0, 0), Piece::normal(1));
        playing_state.put((1, 0), Piece::normal(2));

        let board = playing_state.board();
        let first = board.piece((0, 0)).unwrap().id();
        let second = board.piece((1, 0)).unwrap().id();
        assert_ne!(first, second);
        assert_ne!(playing_state.game().current().id(), first);
    }

    #[test]
    fn fill_without_merges_leaves_exceptions() {
        let mut playing_state = PlayingState::scripted(4, 4, Piece::normal(0), vec![]);

        playing_state.fill_without_merges(1, &[(3, 3), (0, 2)]);

        let board = playing_state.board();
        assert_eq!(2, board.open_len());
        assert!(board.is_open((3, 3)));
        assert!(board.is_open((0, 2)));
        assert_eq!(None, crate::first_merge(board));
    }
}
