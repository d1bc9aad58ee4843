use crate::{
    find_coordinates_by_minimum_distance, neighbor_coordinates, Coordinate, Piece, PieceId,
    BOARD_LIMIT,
};
use derive_more::{Display, Error};
use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;

/// The position of a [cell](Cell) in the board's row-major storage. Pieces use it as
/// a back-reference to the cell holding them.
pub type CellIndex = usize;

/// A single addressable slot on the board, holding at most one [piece](Piece).
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Cell {
    coordinate: Coordinate,
    piece: Option<Piece>,
}

impl Cell {
    /// Where the cell is on the board.
    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// The piece occupying the cell, if any.
    #[inline]
    pub fn piece(&self) -> Option<&Piece> {
        self.piece.as_ref()
    }

    /// Whether no piece occupies the cell.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.piece.is_none()
    }

    /// Whether the cell is a legal target for `candidate`. An open cell accepts anything,
    /// an occupied cell defers to its [piece](Piece::will_accept).
    pub fn will_accept(&self, candidate: &Piece) -> bool {
        match &self.piece {
            None => true,
            Some(occupant) => occupant.will_accept(candidate),
        }
    }
}

/// Describes the reason why the [board](Board) could not be created or changed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Display, Error)]
pub enum BoardError {
    /// Attempting [to create](Board::new) a board with no cells or with more than
    /// [BOARD_LIMIT] cells on a side.
    #[display("a {width}x{height} board is not between 1x1 and the board limit")]
    InvalidDimensions {
        /// The requested number of columns.
        width: usize,
        /// The requested number of rows.
        height: usize,
    },
    /// Attempting to address a [coordinate](Coordinate) outside the board.
    #[display("{coordinate:?} is outside the board")]
    OutOfBounds {
        /// The offending [coordinate](Coordinate).
        coordinate: Coordinate,
    },
    /// Attempting to put a [piece](Piece) in a cell that already holds one.
    #[display("{coordinate:?} is already occupied")]
    Occupied {
        /// The offending [coordinate](Coordinate).
        coordinate: Coordinate,
    },
    /// Attempting to move a [piece](Piece) out of an open cell.
    #[display("{coordinate:?} is open")]
    Open {
        /// The offending [coordinate](Coordinate).
        coordinate: Coordinate,
    },
}

/// A fixed-size rectangle of [cells](Cell) on an offset hex grid. The board is the only owner
/// of cell-to-piece associations and keeps every piece's [back-reference](Piece::cell) current.
///
/// Cells are stored and scanned in row-major order: row by row from the top, left to right
/// within a row. Every ordered query follows this scan order, which in turn decides the order
/// in which pieces take their turns and which piece wins a chain merge tie.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// # Arguments
    ///
    /// * `width`: The number of columns.
    /// * `height`: The number of rows.
    ///
    /// # Errors
    ///
    /// * [BoardError::InvalidDimensions] When either dimension is `0` or greater than
    /// [BOARD_LIMIT].
    ///
    /// # Returns
    ///
    /// A board of open cells.
    pub fn new(width: usize, height: usize) -> Result<Board, BoardError> {
        if width == 0 || height == 0 || width > BOARD_LIMIT || height > BOARD_LIMIT {
            return Err(BoardError::InvalidDimensions { width, height });
        }

        // dimensions are bounded by BOARD_LIMIT, so they fit in an isize
        let cells = (0..height as isize)
            .flat_map(|y| (0..width as isize).map(move |x| (x, y)))
            .map(|coordinate| Cell {
                coordinate,
                piece: None,
            })
            .collect();

        Ok(Board {
            width,
            height,
            cells,
        })
    }

    /// The number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// The number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The number of columns and rows.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// The number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`, since a board has at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// # Returns
    ///
    /// The index of the cell at `coordinate`, or [None] if out of bounds.
    pub fn index_of(&self, (x, y): Coordinate) -> Option<CellIndex> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(y * self.width + x)
    }

    /// # Returns
    ///
    /// The cell at `coordinate`, or [None] if out of bounds.
    #[inline]
    pub fn cell(&self, coordinate: Coordinate) -> Option<&Cell> {
        self.index_of(coordinate).map(|index| &self.cells[index])
    }

    /// # Returns
    ///
    /// The piece at `coordinate`, or [None] if the cell is open or out of bounds.
    #[inline]
    pub fn piece(&self, coordinate: Coordinate) -> Option<&Piece> {
        self.cell(coordinate).and_then(Cell::piece)
    }

    /// Whether `coordinate` is on the board and its cell holds no piece.
    #[inline]
    pub fn is_open(&self, coordinate: Coordinate) -> bool {
        self.cell(coordinate).map_or(false, Cell::is_open)
    }

    /// Every cell in scan order.
    #[inline]
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Every cell holding no piece, in scan order.
    #[inline]
    pub fn open_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| cell.is_open())
    }

    /// Every cell holding a piece, in scan order.
    #[inline]
    pub fn occupied_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| !cell.is_open())
    }

    /// The number of cells holding no piece.
    #[inline]
    pub fn open_len(&self) -> usize {
        self.open_cells().count()
    }

    /// The number of cells holding a piece.
    #[inline]
    pub fn occupied_len(&self) -> usize {
        self.occupied_cells().count()
    }

    /// Whether every cell holds a piece, which ends the game.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.open_cells().next().is_none()
    }

    /// # Returns
    ///
    /// The neighbours of `coordinate` that are on the board, in scan order.
    pub fn neighbors(&self, coordinate: Coordinate) -> SmallVec<[Coordinate; 6]> {
        neighbor_coordinates(coordinate)
            .into_iter()
            .filter(|&neighbor| self.index_of(neighbor).is_some())
            .collect()
    }

    /// The cell in the middle of the board.
    #[inline]
    pub fn center(&self) -> Coordinate {
        ((self.width / 2) as isize, (self.height / 2) as isize)
    }

    /// # Returns
    ///
    /// Where the piece with `id` is on the board, or [None] if it is not on the board.
    pub fn find(&self, id: PieceId) -> Option<Coordinate> {
        self.occupied_cells()
            .find(|cell| cell.piece().map_or(false, |piece| piece.id() == id))
            .map(Cell::coordinate)
    }

    /// Picks a random open cell among those closest to `target`, which may be `target` itself.
    ///
    /// # Returns
    ///
    /// An open [coordinate](Coordinate), or [None] when the board is full.
    pub fn random_open_cell_near<R: Rng + ?Sized>(
        &self,
        target: Coordinate,
        rng: &mut R,
    ) -> Option<Coordinate> {
        find_coordinates_by_minimum_distance(target, self.open_cells().map(Cell::coordinate))
            .choose(rng)
            .copied()
    }

    /// Puts `piece` into the open cell at `coordinate` and points the piece back at it.
    ///
    /// # Errors
    ///
    /// * [BoardError::OutOfBounds] When `coordinate` is not on the board.
    /// * [BoardError::Occupied] When the cell already holds a piece.
    pub fn insert(&mut self, coordinate: Coordinate, mut piece: Piece) -> Result<(), BoardError> {
        let index = self
            .index_of(coordinate)
            .ok_or(BoardError::OutOfBounds { coordinate })?;
        let cell = &mut self.cells[index];
        if cell.piece.is_some() {
            return Err(BoardError::Occupied { coordinate });
        }

        piece.set_cell(Some(index));
        cell.piece = Some(piece);
        Ok(())
    }

    /// Empties the cell at `coordinate`.
    ///
    /// # Returns
    ///
    /// The piece that was in the cell, no longer pointing at it, or [None] if the cell was
    /// open or out of bounds.
    pub fn take(&mut self, coordinate: Coordinate) -> Option<Piece> {
        let index = self.index_of(coordinate)?;
        self.cells[index].piece.take().map(|mut piece| {
            piece.set_cell(None);
            piece
        })
    }

    /// Swaps `piece` into the cell at `coordinate`, whether open or not.
    ///
    /// # Errors
    ///
    /// * [BoardError::OutOfBounds] When `coordinate` is not on the board.
    ///
    /// # Returns
    ///
    /// The piece that was in the cell, if any.
    pub fn replace(
        &mut self,
        coordinate: Coordinate,
        piece: Piece,
    ) -> Result<Option<Piece>, BoardError> {
        let previous = self.take(coordinate);
        self.insert(coordinate, piece)?;
        Ok(previous)
    }

    /// Moves the piece at `from` into the open cell at `to`.
    ///
    /// # Errors
    ///
    /// * [BoardError::OutOfBounds] When either [coordinate](Coordinate) is not on the board.
    /// * [BoardError::Open] When there is no piece at `from`.
    /// * [BoardError::Occupied] When `to` already holds a piece.
    pub fn move_piece(&mut self, from: Coordinate, to: Coordinate) -> Result<(), BoardError> {
        if self.index_of(to).is_none() {
            return Err(BoardError::OutOfBounds { coordinate: to });
        }
        if !self.is_open(to) {
            return Err(BoardError::Occupied { coordinate: to });
        }
        if self.index_of(from).is_none() {
            return Err(BoardError::OutOfBounds { coordinate: from });
        }
        let piece = self
            .take(from)
            .ok_or(BoardError::Open { coordinate: from })?;
        self.insert(to, piece)
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.piece = None;
        }
    }

    /// Every piece on the board in scan order.
    pub(crate) fn pieces_mut(&mut self) -> impl Iterator<Item = &mut Piece> {
        self.cells.iter_mut().filter_map(|cell| cell.piece.as_mut())
    }
}
