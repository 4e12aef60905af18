//! # Match-3 Engine Library
//!
//! This library provides the core rules of a swap-based match-3 game: match
//! detection on a rectangular grid with blocked cells, super-match merging,
//! gravity with refill, and a turn controller that serializes player swaps and
//! runs cascades to completion.
//!
//! It is used by two binaries:
//! - `human_player`: Allows interactive gameplay via the command line.
//! - `autoplay`: Plays seeded boards by always taking the first available hint,
//!   then reports points, moves and cascade waves per board.
//!
//! ## Modules
//! - `grid`: Piece kinds, positions, the board mask (`Layout`) and the arena-backed `Grid`.
//! - `matcher`: Directional scans, single-piece match detection and the full-board pass.
//! - `super_match`: Merges a perpendicular run of two or more into an L/T super match.
//! - `cascade`: Removal, gravity and refill.
//! - `turn`: The `TurnController` state machine.
//! - `source`, `scoreboard`, `motion`: Collaborators for new pieces, scoring and movement.
//! - `hints`: Enumerates swaps that would produce a match.
//! - `config`, `error`: Engine configuration and the error type.
//! - `utils`: Parses boards from text rows.

pub mod cascade;
pub mod config;
pub mod error;
pub mod grid;
pub mod hints;
pub mod matcher;
pub mod motion;
pub mod scoreboard;
pub mod source;
pub mod super_match;
pub mod turn;
pub mod utils;

// Items are reached through their module path, e.g. `match3_engine::turn::TurnController`.
