use crate::{Board, Coordinate, LevelId, Piece, PlayingState};

/// Immutably borrows properties from [`PlayingState`].
#[derive(Debug)]
pub struct PlayingView<'a> {
    /// The board being played on.
    pub board: &'a Board,
    /// The piece the player will place next.
    pub current: &'a Piece,
    /// The piece set aside for later, if any.
    pub stash: Option<&'a Piece>,
    /// The points earned on this level.
    pub score: u64,
    /// Points available to spend.
    pub bank_points: u64,
    /// The highest score reached on any level.
    pub high_score: u64,
    /// The level being played.
    pub level: LevelId,
    /// An open cell near the last placed piece, or [None] when the board is full.
    pub staged: Option<Coordinate>,
    /// Whether the last transaction can be undone.
    pub can_undo: bool,
}

impl<S, O> PlayingState<S, O> {
    /// # Returns
    ///
    /// A new [`PlayingView`] struct, which immutably borrows properties from [`PlayingState`].
    pub fn playing_view(&self) -> PlayingView<'_> {
        let game = &self.game;
        PlayingView {
            board: game.board(),
            current: game.current(),
            stash: game.stash(),
            score: game.score(),
            bank_points: game.bank_points(),
            high_score: game.high_score(),
            level: game.level(),
            staged: self.staged,
            can_undo: self.undo.is_some(),
        }
    }
}
