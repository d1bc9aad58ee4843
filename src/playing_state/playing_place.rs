use crate::{
    resolve_placement, would_merge_with, Coordinate, GameEvent, MergeSet, Observer, Outcome,
    PieceSupply, PlayingState,
};
use derive_more::{Display, Error};
use tracing::{debug, instrument};

/// Describes the reason why the current piece could not be [placed](PlayingState::place).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Display, Error)]
pub enum PlaceError {
    /// Attempting [to place](PlayingState::place) outside the board.
    #[display("{coordinate:?} is outside the board")]
    OutOfBounds {
        /// The targeted [coordinate](Coordinate).
        coordinate: Coordinate,
    },
    /// Attempting [to place](PlayingState::place) a [remove tool](crate::PieceKind::RemoveTool),
    /// which can only [remove](PlayingState::remove).
    #[display("a remove tool cannot be placed")]
    RemoveToolPlacement,
    /// Attempting [to place](PlayingState::place) on a cell that refuses the current piece.
    #[display("{coordinate:?} does not accept the current piece")]
    NotAccepted {
        /// The targeted [coordinate](Coordinate).
        coordinate: Coordinate,
    },
    /// Attempting [to place](PlayingState::place) a piece that must merge where it would not.
    #[display("the current piece would not merge at {coordinate:?}")]
    MergeRequired {
        /// The targeted [coordinate](Coordinate).
        coordinate: Coordinate,
    },
}

impl<S: PieceSupply, O: Observer> PlayingState<S, O> {
    /// Checks that the current piece may be placed at `target`, then saves the state for undo,
    /// drops the piece merging with every piece [it would merge with](would_merge_with),
    /// awards points, draws a new current piece, and ends the turn.
    ///
    /// # Points Calculation
    ///
    /// The placement earns the [point value](crate::Piece::point_value) of the resulting
    /// piece times the [merge multiplier](crate::merge_multiplier): a piece merging with `k`
    /// neighbours earns `k` times its point value, and a piece placed without a merge earns it
    /// once. Every chain merge during the turn earns the point value of its result times
    /// one less than the size of its group. A share of every award is
    /// [banked](crate::GameState::bank_points).
    ///
    /// # Arguments
    ///
    /// * `target`: Where the current piece goes.
    ///
    /// # Errors
    ///
    /// * [PlaceError::OutOfBounds] Attempting to place outside the board.
    /// * [PlaceError::RemoveToolPlacement] Attempting to place a remove tool.
    /// * [PlaceError::NotAccepted] Attempting to place on a cell that refuses the piece.
    /// * [PlaceError::MergeRequired] Attempting to place a piece that must merge where it
    /// would not.
    ///
    /// # Returns
    ///
    /// Either the [playing state](PlayingState) or, if the board filled up,
    /// the [game over state](crate::GameOverState).
    #[instrument(level = "debug", skip(self))]
    pub fn place(mut self, target: Coordinate) -> Result<Outcome<S, O>, (Self, PlaceError)> {
        let merging = match self.check_place(target) {
            Ok(merging) => merging,
            Err(error) => return Err((self, error)),
        };

        self.capture();
        let turn = self.game.next_turn();
        let piece = self.game.current().clone();
        let record = resolve_placement(self.game.board_mut(), target, piece, &merging, turn)
            .unwrap_or_else(|error| unreachable!("the placement was checked: {}", error));
        debug!(
            merged = record.consumed.len(),
            value = record.result.value(),
            "piece placed"
        );

        let points = record.points();
        self.game.set_last_placed(Some(record.result.id()));
        self.context
            .observer
            .increment_counter(record.result.stats_key());
        self.context.notify(GameEvent::PiecePlaced {
            coordinate: target,
            piece: record.result.clone(),
        });
        if !record.consumed.is_empty() {
            self.context.notify(GameEvent::MergeResolved {
                coordinate: target,
                consumed: record.consumed,
                result: record.result,
            });
        }
        self.award(points);

        self.generate_current_piece();
        self.turn_did_end(turn);
        Ok(self.finish())
    }

    /// The pieces that would merge if the current piece were placed at `target`. Empty when
    /// the cell refuses the current piece.
    pub fn preview(&self, target: Coordinate) -> MergeSet {
        let current = self.game.current();
        match self.game.board().cell(target) {
            Some(cell) if cell.will_accept(current) => {
                would_merge_with(self.game.board(), target, current)
            }
            _ => MergeSet::new(),
        }
    }

    /// # Returns
    ///
    /// The pieces the placement would merge with, or why it is illegal.
    fn check_place(&self, target: Coordinate) -> Result<MergeSet, PlaceError> {
        let board = self.game.board();
        let current = self.game.current();
        let cell = board
            .cell(target)
            .ok_or(PlaceError::OutOfBounds { coordinate: target })?;
        if current.is_remove_tool() {
            return Err(PlaceError::RemoveToolPlacement);
        }
        if !cell.will_accept(current) {
            return Err(PlaceError::NotAccepted { coordinate: target });
        }

        let merging = would_merge_with(board, target, current);
        if merging.is_empty() && !current.can_place_without_merge() {
            return Err(PlaceError::MergeRequired { coordinate: target });
        }
        Ok(merging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        coloring_value, EventLog, LevelId, Movement, Piece, PieceKind, ScriptedSupply, StatsKey,
        BANK_PERCENT, PIT_UNLOCK_SCORE,
    };
    use either::Either;

    type Scripted = PlayingState<ScriptedSupply, EventLog>;

    fn three_twos(current: Piece) -> Scripted {
        let mut playing_state = PlayingState::scripted(3, 3, current, vec![Piece::normal(0)]);
        playing_state.put((0, 0), Piece::normal(2));
        playing_state.put((1, 0), Piece::normal(2));
        playing_state.put((0, 1), Piece::normal(2));
        playing_state
    }

    fn placed(outcome: Outcome<ScriptedSupply, EventLog>) -> Scripted {
        match outcome {
            Either::Left(playing_state) => playing_state,
            Either::Right(_) => panic!("the game should not be over"),
        }
    }

    fn place_error(playing_state: Scripted, target: Coordinate) -> (Scripted, PlaceError) {
        match playing_state.place(target) {
            Ok(_) => panic!("the placement at {:?} should fail", target),
            Err(error) => error,
        }
    }

    #[test]
    fn place_out_of_bounds() {
        let playing_state = PlayingState::scripted(3, 3, Piece::normal(0), vec![]);
        let before = playing_state.game().clone();

        let (playing_state, error) = place_error(playing_state, (3, 0));

        assert_eq!(PlaceError::OutOfBounds { coordinate: (3, 0) }, error);
        assert_eq!(&before, playing_state.game());
        assert!(!playing_state.can_undo());
        assert!(playing_state.events().is_empty());
    }

    #[test]
    fn place_remove_tool() {
        let playing_state = PlayingState::scripted(3, 3, Piece::remove_tool(), vec![]);
        let (_, error) = place_error(playing_state, (1, 1));
        assert_eq!(PlaceError::RemoveToolPlacement, error);
    }

    #[test]
    fn place_occupied() {
        let mut playing_state = PlayingState::scripted(3, 3, Piece::normal(0), vec![]);
        playing_state.put((1, 1), Piece::normal(3));
        let before = playing_state.game().clone();

        let (playing_state, error) = place_error(playing_state, (1, 1));

        assert_eq!(PlaceError::NotAccepted { coordinate: (1, 1) }, error);
        assert_eq!(&before, playing_state.game());
    }

    #[test]
    fn place_wildcard_without_merge() {
        let mut playing_state = PlayingState::scripted(3, 3, Piece::wildcard(), vec![]);
        playing_state.put((0, 0), Piece::normal(3));

        let (playing_state, error) = place_error(playing_state, (2, 2));

        assert_eq!(PlaceError::MergeRequired { coordinate: (2, 2) }, error);
        assert!(!playing_state.can_undo());
    }

    #[test]
    fn place_without_merge() {
        let playing_state = PlayingState::scripted(3, 3, Piece::normal(1), vec![Piece::normal(4)]);

        let playing_state = placed(playing_state.place((2, 2)).unwrap());

        let game = playing_state.game();
        let piece = game.board().piece((2, 2)).unwrap();
        assert_eq!(PieceKind::Normal, piece.kind());
        assert_eq!(1, piece.value());
        assert_eq!(1, piece.added());
        assert_eq!(Piece::normal(1).point_value(), game.score());
        assert_eq!(4, game.current().value());
        assert_eq!(Some(piece.id()), game.last_placed());
        assert_eq!(1, game.turn());
        assert!(playing_state.can_undo());
    }

    #[test]
    fn place_merges_three() {
        let playing_state = three_twos(Piece::normal(2));

        let playing_state = placed(playing_state.place((1, 1)).unwrap());

        let game = playing_state.game();
        let expected_points = Piece::normal(3).point_value() * 3;
        assert_eq!(1, game.board().occupied_len());
        assert_eq!(3, game.board().piece((1, 1)).unwrap().value());
        assert_eq!(expected_points, game.score());
        assert_eq!(expected_points * BANK_PERCENT / 100, game.bank_points());
        assert_eq!(expected_points, game.high_score());
    }

    #[test]
    fn place_merge_events() {
        let playing_state = three_twos(Piece::normal(2));

        let playing_state = placed(playing_state.place((1, 1)).unwrap());

        let events = playing_state.events();
        let GameEvent::PiecePlaced { coordinate, piece } = &events[0] else {
            panic!("the first event should be the placement");
        };
        assert_eq!((1, 1), *coordinate);
        assert_eq!(3, piece.value());
        let GameEvent::MergeResolved { consumed, .. } = &events[1] else {
            panic!("the second event should be the merge");
        };
        assert_eq!(3, consumed.len());
        assert!(matches!(events[2], GameEvent::PointsAwarded { .. }));
        assert!(matches!(events.last(), Some(GameEvent::TurnEnded { .. })));
        assert_eq!(1, playing_state.observer().counter(StatsKey::Normal(3)));
    }

    #[test]
    fn place_wildcard_merges() {
        let mut playing_state = PlayingState::scripted(3, 3, Piece::wildcard(), vec![]);
        playing_state.put((1, 0), Piece::normal(1));
        playing_state.put((2, 1), Piece::normal(3));

        let playing_state = placed(playing_state.place((1, 1)).unwrap());

        let board = playing_state.board();
        let merged = board.piece((1, 1)).unwrap();
        assert_eq!(PieceKind::Normal, merged.kind());
        assert_eq!(4, merged.value());
        assert!(board.is_open((2, 1)));
        assert_eq!(1, board.piece((1, 0)).unwrap().value());
    }

    #[test]
    fn place_triggers_chain() {
        let mut playing_state = PlayingState::scripted(3, 3, Piece::normal(1), vec![]);
        playing_state.put((1, 0), Piece::normal(1));
        playing_state.put((0, 1), Piece::normal(2));

        let playing_state = placed(playing_state.place((0, 0)).unwrap());

        let game = playing_state.game();
        let merged = game.board().piece((0, 0)).unwrap();
        assert_eq!(3, merged.value());
        assert_eq!(1, game.board().occupied_len());
        assert_eq!(
            Piece::normal(2).point_value() + Piece::normal(3).point_value(),
            game.score()
        );
    }

    #[test]
    fn place_moves_mobile_pieces() {
        let mut playing_state = PlayingState::scripted(3, 3, Piece::normal(0), vec![]);
        playing_state.put((0, 0), Piece::mobile(Movement::Wander, 5));

        let playing_state = placed(playing_state.place((2, 2)).unwrap());

        let board = playing_state.board();
        assert!(board.is_open((0, 0)));
        assert_eq!(2, board.occupied_len());
        assert!(playing_state
            .events()
            .iter()
            .any(|event| matches!(event, GameEvent::PieceMoved { from: (0, 0), .. })));
    }

    #[test]
    fn place_settles_trapped_pieces() {
        let mut playing_state = PlayingState::scripted(2, 1, Piece::normal(0), vec![]);
        playing_state.put((0, 0), Piece::mobile(Movement::Settle, 5));

        let outcome = playing_state.place((1, 0)).unwrap();

        let Either::Right(game_over_state) = outcome else {
            panic!("the board should be full");
        };
        let settled = game_over_state.game().board().piece((0, 0)).unwrap();
        assert_eq!(PieceKind::Normal, settled.kind());
        assert_eq!(5, settled.value());
    }

    #[test]
    fn place_last_open_cell_ends_game() {
        let base = 0;
        let current = Piece::normal(coloring_value((2, 2), base));
        let mut playing_state = PlayingState::scripted(3, 3, current, vec![]);
        playing_state.fill_without_merges(base, &[(2, 2)]);

        let outcome = playing_state.place((2, 2)).unwrap();

        let Either::Right(game_over_state) = outcome else {
            panic!("the board should be full");
        };
        assert!(game_over_state.game().board().is_full());
        assert!(matches!(
            game_over_state.observer().events().last(),
            Some(GameEvent::GameOver { .. })
        ));
    }

    #[test]
    fn place_unlocks_level() {
        let mut playing_state = PlayingState::scripted(3, 3, Piece::normal(0), vec![]);
        playing_state
            .mut_game()
            .award_points(PIT_UNLOCK_SCORE - 1);

        let playing_state = placed(playing_state.place((0, 0)).unwrap());

        assert!(playing_state.game().unlocked().contains(&LevelId::Pit));
        assert!(playing_state
            .events()
            .contains(&GameEvent::LevelUnlocked { level: LevelId::Pit }));
    }

    #[test]
    fn preview_matches_placement() {
        let playing_state = three_twos(Piece::normal(2));
        assert_eq!(
            vec![(0, 0), (1, 0), (0, 1)],
            playing_state.preview((1, 1)).into_vec()
        );
        assert!(playing_state.preview((0, 0)).is_empty());
        assert!(playing_state.preview((5, 5)).is_empty());
    }

    #[test]
    fn staged_near_last_placed() {
        let playing_state = PlayingState::scripted(5, 5, Piece::normal(0), vec![]);

        let playing_state = placed(playing_state.place((0, 0)).unwrap());

        let staged = playing_state.playing_view().staged.unwrap();
        assert!(playing_state.board().neighbors((0, 0)).contains(&staged));
    }
}
