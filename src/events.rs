use crate::{Coordinate, LevelId, Piece, StatsKey};
use std::collections::HashMap;

/// A discrete notification emitted while a transaction runs. Events are fire and forget:
/// the game never waits on an [observer](Observer) before moving on.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum GameEvent {
    /// A piece was dropped on the board, after any merge it made.
    PiecePlaced {
        /// Where the piece is.
        coordinate: Coordinate,
        /// The piece as it is on the board.
        piece: Piece,
    },
    /// Pieces merged into one.
    MergeResolved {
        /// Where the resulting piece is.
        coordinate: Coordinate,
        /// The pieces taken off the board.
        consumed: Vec<Piece>,
        /// The resulting piece.
        result: Piece,
    },
    /// Points were added to the score.
    PointsAwarded {
        /// The number of points awarded.
        points: u64,
        /// The score after the award.
        score: u64,
    },
    /// A mobile piece moved during its turn.
    PieceMoved {
        /// Where the piece was.
        from: Coordinate,
        /// Where the piece is.
        to: Coordinate,
    },
    /// A piece turned into another piece during its turn.
    PieceChanged {
        /// Where the piece is.
        coordinate: Coordinate,
        /// The new piece.
        piece: Piece,
    },
    /// A collectible was harvested.
    PieceCollected {
        /// Where the piece was.
        coordinate: Coordinate,
        /// The harvested piece.
        piece: Piece,
        /// The number of points paid into the bank.
        bank_points: u64,
    },
    /// A piece was erased by a remove tool.
    PieceRemoved {
        /// Where the piece was.
        coordinate: Coordinate,
        /// The erased piece.
        piece: Piece,
    },
    /// Every piece took its turn and the board is quiescent.
    TurnEnded {
        /// The score at the end of the turn.
        score: u64,
    },
    /// The board filled up.
    GameOver {
        /// The final score.
        score: u64,
    },
    /// A new level became playable.
    LevelUnlocked {
        /// The unlocked level.
        level: LevelId,
    },
    /// The last transaction was rolled back.
    Undone,
    /// The current piece was swapped with the stash.
    StashSwapped,
}

/// Receives [events](GameEvent) and statistics from the game. Both methods do nothing unless
/// overridden.
pub trait Observer {
    /// Called once per [event](GameEvent), in the order events happen.
    fn notify(&mut self, _event: &GameEvent) {}

    /// Called once per placement with the key of the placed piece.
    fn increment_counter(&mut self, _key: StatsKey) {}
}

impl Observer for () {}

impl<O: Observer + ?Sized> Observer for &mut O {
    #[inline]
    fn notify(&mut self, event: &GameEvent) {
        (**self).notify(event);
    }

    #[inline]
    fn increment_counter(&mut self, key: StatsKey) {
        (**self).increment_counter(key);
    }
}

/// An [Observer] that records everything it receives.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct EventLog {
    events: Vec<GameEvent>,
    counters: HashMap<StatsKey, u64>,
}

impl EventLog {
    /// An empty log.
    #[inline]
    pub fn new() -> EventLog {
        EventLog::default()
    }

    /// Every event received, oldest first.
    #[inline]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// # Returns
    ///
    /// The number of times `key` was counted.
    #[inline]
    pub fn counter(&self, key: StatsKey) -> u64 {
        self.counters.get(&key).copied().unwrap_or_default()
    }

    /// Forgets every event received so far. Counters are kept.
    #[inline]
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl Observer for EventLog {
    fn notify(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }

    fn increment_counter(&mut self, key: StatsKey) {
        *self.counters.entry(key).or_default() += 1;
    }
}
