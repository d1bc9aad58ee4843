use crate::{to_cube, Board, Coordinate, Piece, PieceSupply};
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use std::collections::VecDeque;

/// A random, small, non-zero number of columns and rows.
pub fn random_dimensions<R: Rng + ?Sized>(rng: &mut R) -> (usize, usize) {
    let possible_dimensions = Uniform::from(1..=8);
    (possible_dimensions.sample(rng), possible_dimensions.sample(rng))
}

/// A value between `base` and `base + 2` inclusive for the piece at `coordinate`. Neighbouring
/// cells never share a value, so a board colored this way has nothing to merge.
pub fn coloring_value(coordinate: Coordinate, base: u32) -> u32 {
    let (cube_x, cube_y, _) = to_cube(coordinate);
    (cube_x - cube_y).rem_euclid(3) as u32 + base
}

/// Inserts a [colored](coloring_value) normal piece into every open cell except those
/// in `except`.
pub fn fill_board_without_merges(board: &mut Board, base: u32, except: &[Coordinate]) {
    let open: Vec<Coordinate> = board
        .open_cells()
        .map(|cell| cell.coordinate())
        .filter(|coordinate| !except.contains(coordinate))
        .collect();
    for coordinate in open {
        board
            .insert(coordinate, Piece::normal(coloring_value(coordinate, base)))
            .unwrap_or_else(|error| panic!("{}", error));
    }
}

/// Draws pieces in a fixed order and lays out a fixed board. Once the queue runs out, it draws
/// normal value `0` pieces.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSupply {
    pieces: VecDeque<Piece>,
    layout: Vec<(Coordinate, Piece)>,
}

impl ScriptedSupply {
    /// # Arguments
    ///
    /// * `pieces`: The pieces to draw, first drawn first.
    pub fn new(pieces: Vec<Piece>) -> ScriptedSupply {
        ScriptedSupply {
            pieces: pieces.into(),
            layout: Vec::new(),
        }
    }

    /// Replaces the pieces laid out at the start of every level.
    pub fn with_layout(self, layout: Vec<(Coordinate, Piece)>) -> ScriptedSupply {
        ScriptedSupply { layout, ..self }
    }
}

impl PieceSupply for ScriptedSupply {
    fn random_piece<R: Rng + ?Sized>(&mut self, _: &mut R) -> Piece {
        self.pieces.pop_front().unwrap_or_else(|| Piece::normal(0))
    }

    fn init_level<R: Rng + ?Sized>(&mut self, board: &mut Board, _: &mut R) {
        for (coordinate, piece) in &self.layout {
            let _ = board.insert(*coordinate, piece.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::first_merge;
    use tap::Tap;

    #[test]
    fn random_dimensions_in_range() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let (width, height) = random_dimensions(&mut rng);
            assert!((1..=8).contains(&width));
            assert!((1..=8).contains(&height));
        }
    }

    #[test]
    fn coloring_value_differs_from_neighbors() {
        for y in -3..=3 {
            for x in -3..=3 {
                let value = coloring_value((x, y), 2);
                assert!((2..=4).contains(&value));
                for neighbor in crate::neighbor_coordinates((x, y)) {
                    assert_ne!(value, coloring_value(neighbor, 2));
                }
            }
        }
    }

    #[test]
    fn fill_board_without_merges_random_board() {
        let mut rng = rand::thread_rng();
        let (width, height) = random_dimensions(&mut rng);
        let board = Board::new(width, height)
            .unwrap()
            .tap_mut(|board| fill_board_without_merges(board, 0, &[]));

        assert!(board.is_full());
        assert_eq!(None, first_merge(&board));
    }

    #[test]
    fn scripted_supply_runs_out() {
        let mut rng = rand::thread_rng();
        let mut supply = ScriptedSupply::new(vec![Piece::wildcard()]);

        assert_eq!(Piece::wildcard().kind(), supply.random_piece(&mut rng).kind());
        assert_eq!(Piece::normal(0), supply.random_piece(&mut rng));
    }

    #[test]
    fn scripted_supply_layout() {
        let mut supply =
            ScriptedSupply::default().with_layout(vec![((1, 2), Piece::normal(5))]);

        let board = Board::new(3, 3)
            .unwrap()
            .tap_mut(|board| supply.init_level(board, &mut rand::thread_rng()));

        assert_eq!(1, board.occupied_len());
        assert_eq!(Some(5), board.piece((1, 2)).map(Piece::value));
    }
}
