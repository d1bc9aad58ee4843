use konst::primitive::{parse_u32, parse_u64, parse_usize};
use konst::{option, result};

/// The maximum width and height of a [board](crate::Board). If the environment variable
/// named `BOARD_LIMIT` is present at compile time and is able to be parsed into a `usize`,
/// set to the value of the environment variable. Otherwise, it is set to `64`.
///
/// # See Also
///
/// * [Board::new](crate::Board::new)
/// * [NewError::BoardTooLarge](crate::NewError::BoardTooLarge)
pub const BOARD_LIMIT: usize = option::unwrap_or!(
    option::and_then!(option_env!("BOARD_LIMIT"), |str| result::ok!(parse_usize(
        str
    ))),
    64
);
const _: () = assert!(BOARD_LIMIT > 0);
// cell indexes and coordinates must both fit in an isize
const _: () = assert!((isize::MAX as usize) / BOARD_LIMIT >= BOARD_LIMIT);
/// The highest value a merge can produce while staying a [normal](crate::PieceKind::Normal)
/// piece. Merging past it evolves the result into a
/// [collectible](crate::PieceKind::Collectible). If the environment variable named
/// `MAX_NORMAL_VALUE` is present at compile time and is able to be parsed into a `u32`,
/// set to the value of the environment variable. Otherwise, it is set to `7`.
///
/// # See Also
///
/// * [Piece::was_placed_with_merge](crate::Piece::was_placed_with_merge)
pub const MAX_NORMAL_VALUE: u32 = option::unwrap_or!(
    option::and_then!(option_env!("MAX_NORMAL_VALUE"), |str| result::ok!(
        parse_u32(str)
    )),
    7
);
// point values are computed as BASE_POINT_VALUE << value
const _: () = assert!(MAX_NORMAL_VALUE < 48);
/// The number of points a value `0` piece is worth. Each value doubles it. If the environment
/// variable named `BASE_POINT_VALUE` is present at compile time and is able to be parsed into
/// a `u64`, set to the value of the environment variable. Otherwise, it is set to `10`.
///
/// # See Also
///
/// * [Piece::point_value](crate::Piece::point_value)
pub const BASE_POINT_VALUE: u64 = option::unwrap_or!(
    option::and_then!(option_env!("BASE_POINT_VALUE"), |str| result::ok!(
        parse_u64(str)
    )),
    10
);
/// The percentage of every award that is also added to the bank. If the environment variable
/// named `BANK_PERCENT` is present at compile time and is able to be parsed into a `u64`,
/// set to the value of the environment variable. Otherwise, it is set to `5`.
///
/// # See Also
///
/// * [GameState::bank_points](crate::GameState::bank_points)
pub const BANK_PERCENT: u64 = option::unwrap_or!(
    option::and_then!(option_env!("BANK_PERCENT"), |str| result::ok!(parse_u64(
        str
    ))),
    5
);
const _: () = assert!(BANK_PERCENT <= 100);
/// The number of bank points paid out when a [collectible](crate::PieceKind::Collectible)
/// is collected. If the environment variable named `COLLECTIBLE_BANK_VALUE` is present at
/// compile time and is able to be parsed into a `u64`, set to the value of the environment
/// variable. Otherwise, it is set to `1_000`.
///
/// # See Also
///
/// * [Piece::was_collected](crate::Piece::was_collected)
pub const COLLECTIBLE_BANK_VALUE: u64 = option::unwrap_or!(
    option::and_then!(option_env!("COLLECTIBLE_BANK_VALUE"), |str| result::ok!(
        parse_u64(str)
    )),
    1_000
);
/// The score that unlocks [the pit](crate::LevelId::Pit) while playing
/// [the hexagon](crate::LevelId::Hexagon). `500_000` unless overridden at compile time by
/// the environment variable named `PIT_UNLOCK_SCORE`.
///
/// # See Also
///
/// * [LevelId::unlocks](crate::LevelId::unlocks)
pub const PIT_UNLOCK_SCORE: u64 = option::unwrap_or!(
    option::and_then!(option_env!("PIT_UNLOCK_SCORE"), |str| result::ok!(
        parse_u64(str)
    )),
    500_000
);
/// The score that unlocks [the moat](crate::LevelId::Moat) while playing
/// [the pit](crate::LevelId::Pit). `1_000_000` unless overridden at compile time by
/// the environment variable named `MOAT_UNLOCK_SCORE`.
///
/// # See Also
///
/// * [LevelId::unlocks](crate::LevelId::unlocks)
pub const MOAT_UNLOCK_SCORE: u64 = option::unwrap_or!(
    option::and_then!(option_env!("MOAT_UNLOCK_SCORE"), |str| result::ok!(
        parse_u64(str)
    )),
    1_000_000
);
/// Merge sets are stored on the stack until they hold more than `MERGE_CAPACITY`
/// [coordinates](crate::Coordinate). Six covers every neighbour of a single cell.
///
/// # See Also
///
/// * [MergeSet](crate::MergeSet)
pub const MERGE_CAPACITY: usize = 6;
