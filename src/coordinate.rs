use smallvec::SmallVec;

/// A tuple with two integer components for horizontal and vertical position on the board.
/// The second component is the row. Odd rows are shifted half a cell to the right of even rows,
/// which is why the [neighbours](neighbor_coordinates) of a cell depend on the parity of its row.
///
/// # See Also
///
/// * [Board](crate::Board)
/// * [neighbor_coordinates]
pub type Coordinate = (isize, isize);

/// A tuple with three integer components `(x, y, z)` where `x + y + z == 0`.
///
/// # See Also
///
/// * [to_cube]
/// * [distance]
pub type Cube = (isize, isize, isize);

/// # Returns
///
/// Whether the row of the [coordinate](Coordinate) is odd and therefore shifted right.
#[inline]
pub fn is_odd_row((_, y): Coordinate) -> bool {
    y.rem_euclid(2) == 1
}

/// Finds the adjacent [coordinates](Coordinate) of the argument [coordinate](Coordinate)
/// where adjacent is 6 directional on the offset hex grid. The result is not clipped
/// to any board, see [Board::neighbors](crate::Board::neighbors) for that.
///
/// # Arguments
///
/// * `x`: The x component
/// * `y`: The y component
///
/// # See Also
///
/// * [Board::neighbors](crate::Board::neighbors)
/// * [would_merge_with](crate::would_merge_with)
///
/// # Returns
///
/// An array of 6 [coordinates](Coordinate) in row-major order: the row above, the same row,
/// then the row below, left before right.
pub fn neighbor_coordinates((x, y): Coordinate) -> [Coordinate; 6] {
    if is_odd_row((x, y)) {
        [
            (x, y - 1),
            (x + 1, y - 1),
            (x - 1, y),
            (x + 1, y),
            (x, y + 1),
            (x + 1, y + 1),
        ]
    } else {
        [
            (x - 1, y - 1),
            (x, y - 1),
            (x - 1, y),
            (x + 1, y),
            (x - 1, y + 1),
            (x, y + 1),
        ]
    }
}

/// Converts an offset [coordinate](Coordinate) to [cube coordinates](Cube).
pub fn to_cube((x, y): Coordinate) -> Cube {
    let cube_x = x - (y - y.rem_euclid(2)) / 2;
    let cube_z = y;
    (cube_x, -cube_x - cube_z, cube_z)
}

/// # Returns
///
/// The number of single steps between two cells on the hex grid.
pub fn distance(from: Coordinate, to: Coordinate) -> usize {
    let (from_x, from_y, from_z) = to_cube(from);
    let (to_x, to_y, to_z) = to_cube(to);

    from_x
        .abs_diff(to_x)
        .max(from_y.abs_diff(to_y))
        .max(from_z.abs_diff(to_z))
}

/// Finds every [coordinate](Coordinate) tied for the minimum [distance] from `target`,
/// keeping their iteration order. If `coordinates` is empty, the result is empty.
///
/// # Arguments
///
/// * `target`: The [coordinate](Coordinate) being approached.
/// * `coordinates`: An [iterator](Iterator) of candidate [coordinates](Coordinate).
///
/// # See Also
///
/// * [Board::random_open_cell_near](crate::Board::random_open_cell_near)
pub fn find_coordinates_by_minimum_distance(
    target: Coordinate,
    coordinates: impl Iterator<Item = Coordinate>,
) -> SmallVec<[Coordinate; 6]> {
    let mut nearest = SmallVec::new();
    let mut minimum_distance = usize::MAX;

    for coordinate in coordinates {
        let other_distance = distance(target, coordinate);
        if other_distance < minimum_distance {
            minimum_distance = other_distance;
            nearest.clear();
        }
        if other_distance == minimum_distance {
            nearest.push(coordinate);
        }
    }

    nearest
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::iter;

    #[test]
    fn neighbors_even_row() {
        let actual_neighbors = neighbor_coordinates((2, 2));
        let expected_neighbors = [(1, 1), (2, 1), (1, 2), (3, 2), (1, 3), (2, 3)];
        assert_eq!(expected_neighbors, actual_neighbors);
    }

    #[test]
    fn neighbors_odd_row() {
        let actual_neighbors = neighbor_coordinates((2, 1));
        let expected_neighbors = [(2, 0), (3, 0), (1, 1), (3, 1), (2, 2), (3, 2)];
        assert_eq!(expected_neighbors, actual_neighbors);
    }

    #[test]
    fn neighbors_negative_odd_row() {
        assert!(is_odd_row((0, -1)));
        assert_eq!(
            [(0, -2), (1, -2), (-1, -1), (1, -1), (0, 0), (1, 0)],
            neighbor_coordinates((0, -1))
        );
    }

    #[test]
    fn neighbors_are_symmetric() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let coordinate = (rng.gen_range(-20..20), rng.gen_range(-20..20));
            for neighbor in neighbor_coordinates(coordinate) {
                assert!(neighbor_coordinates(neighbor).contains(&coordinate));
            }
        }
    }

    #[test]
    fn neighbors_are_one_step_away() {
        let mut rng = rand::thread_rng();
        let coordinate = (rng.gen_range(-20..20), rng.gen_range(-20..20));
        for neighbor in neighbor_coordinates(coordinate) {
            assert_eq!(1, distance(coordinate, neighbor));
        }
    }

    #[test]
    fn cube_components_sum_to_zero() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let (x, y, z) = to_cube((rng.gen_range(-50..50), rng.gen_range(-50..50)));
            assert_eq!(0, x + y + z);
        }
    }

    #[test]
    fn distance_to_self() {
        let coordinate = rand::thread_rng().gen_range(-50..50);
        assert_eq!(0, distance((coordinate, coordinate), (coordinate, coordinate)));
    }

    #[test]
    fn distance_across_rows() {
        assert_eq!(2, distance((0, 0), (1, 2)));
        assert_eq!(3, distance((0, 0), (3, 0)));
        assert_eq!(3, distance((0, 0), (1, 3)));
    }

    #[test]
    fn minimum_distance_empty() {
        assert!(find_coordinates_by_minimum_distance((0, 0), iter::empty()).is_empty());
    }

    #[test]
    fn minimum_distance_keeps_ties_in_order() {
        let coordinates = [(0, 0), (3, 2), (5, 5), (1, 2)];
        let nearest = find_coordinates_by_minimum_distance((2, 2), coordinates.into_iter());
        assert_eq!(vec![(3, 2), (1, 2)], nearest.into_vec());
    }
}
