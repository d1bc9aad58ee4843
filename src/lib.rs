//! Concrete structs to represent and protect the state of a hex tile-merging puzzle with methods
//! to progress through the game.
//!
//! ## Summary
//!
//! The game is played on a rectangular board of hexagonal cells. Each turn the player places the
//! current piece on an open cell. When a placed piece touches pieces of the same value, they
//! merge into a single piece one value higher, worth more points. Merges can cascade into chain
//! merges elsewhere on the board. Special pieces wander, settle into other pieces, are collected
//! for bank points, or remove pieces. Scores bank a share of their points and unlock bigger levels.
//! The game ends when the board fills up.
//!
//! ## What are the states of the game?
//!
//! * `Playing`: The board has at least one open cell and the player can act. Represented by
//! [PlayingState](PlayingState).
//! * `GameOver`: The board is full. Represented by [GameOverState](GameOverState).
//!
//! Every transaction of [PlayingState] returns an [Outcome], either the next [PlayingState] or
//! a [GameOverState]. Illegal transactions return the untouched state alongside an error.
//!
//! ## How is the game created?
//!
//! [PlayingState::new] starts a level from a [LevelConfig], the player's [Progress], a
//! [PieceSupply], and an [Observer]. [PlayingState::resume] continues a game stored by
//! some [Persistence].
//!
//! ## How is the game advanced?
//!
//! * [Placing](PlayingState::place) the current piece merges it with every
//! [connected piece of the same value](would_merge_with), ends the turn, and draws a new
//! current piece.
//! * [Removing](PlayingState::remove) takes a piece off the board with a remove tool.
//! * [Collecting](PlayingState::collect) trades a collectible for bank points.
//! * [Acting](PlayingState::act) picks one of the above from where the player touched.
//! * [Swapping](PlayingState::swap_stash) and [purchasing](PlayingState::purchase) change
//! the current piece.
//! * [Undo](PlayingState::undo) rolls back the last transaction.
//!
//! ### What happens at the end of a turn?
//!
//! Every [mobile](PieceKind::Mobile) piece on the board [takes its turn](Piece::take_turn),
//! then [chain merges](resolve_chain) resolve until the board is stable.
//!
//! ## How are points calculated?
//!
//! Every merge earns the [point value](Piece::point_value) of the resulting piece times
//! its [merge multiplier](merge_multiplier). A share of every award is
//! [banked](BANK_PERCENT). Passing an unlock score [unlocks](LevelId::unlocks) the next level.
//!
//! ## How is the game viewed?
//!
//! [PlayingState::playing_view] and [GameOverState::game_over_view] borrow everything a
//! presentation layer needs. Each change is also reported to the [Observer] as a [GameEvent].
//!
//! ## How are game states tested when properties are private?
//!
//! The `test` build configuration adds many required methods for testing. [PlayingState]
//! implements methods to get mutable references to its properties, to lay out pieces directly,
//! and to script the pieces drawn.

// Document!
#![forbid(
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::bare_urls
)]
// Don't leave a build in a half finished state!
#![deny(
    future_incompatible,
    nonstandard_style,
    rust_2018_compatibility,
    rust_2018_idioms,
    rust_2021_compatibility,
    unreachable_pub,
    missing_debug_implementations,
    unsafe_code
)]
#![warn(unused)]

pub use board::*;
pub use consts::*;
pub use coordinate::*;
pub use events::*;
pub use game_over_state::*;
pub use game_state::*;
pub use level::*;
pub use merge::*;
pub use piece::*;
pub use playing_state::*;
#[cfg(test)]
pub use random::*;

mod board;
mod consts;
mod coordinate;
mod events;
mod game_over_state;
mod game_state;
mod level;
mod merge;
mod piece;
mod playing_state;
#[cfg(test)]
mod random;
