//! Pure warehouse layout logic for Stockroom.
//!
//! A footwear warehouse is a grid of storage bays zoned by category and
//! gender. This crate compiles declarative layout rules into that grid,
//! routes a picker to the best bay for each requested category, counts the
//! trips a capacity-limited picker needs, and compares two layouts with a
//! seeded Monte Carlo run. No rendering, no persistence, no globals: every
//! function takes plain data and returns results.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Immutable warehouse config, reference layouts, validation |
//! | [`constants`] | Reference dimensions, penalties and category names |
//! | [`layout`] | Rule list to bay grid compiler (first match wins) |
//! | [`routing`] | Nearest-bay scoring with entry and ladder penalties |
//! | [`picker`] | Capacity-limited trip accounting as a state transition |
//! | [`simulation`] | Seeded Monte Carlo comparison of two layouts |

pub mod config;
pub mod constants;
pub mod layout;
pub mod picker;
pub mod routing;
pub mod simulation;
