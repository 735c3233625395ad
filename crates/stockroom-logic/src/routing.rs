//! Nearest-bay routing heuristic.
//!
//! For a requested category, every matching bay is scored against every
//! entry point and the lowest score wins:
//!
//! ```text
//! score = manhattan(entry, bay) * (entry_zero_factor if entry index == 0)
//!       + (ladder if bay needs a ladder)
//! ```
//!
//! Gender is not considered. Ties keep the first pair seen, scanning bays
//! row-major and entry points in order. An unknown category resolves to
//! [`DEFAULT_BAY`] rather than an error.
//!
//! ```
//! use stockroom_logic::config::WarehouseConfig;
//! use stockroom_logic::layout::{Coord, Grid};
//! use stockroom_logic::routing::{locate, DEFAULT_BAY};
//!
//! let config = WarehouseConfig::reference();
//! let grid = Grid::compile(&config, &config.layout_b.rules);
//! let at = locate(&grid, "Lifestyle", &config.entry_points, &config.penalties);
//! assert_eq!(at, Coord::new(0, 0));
//! let missing = locate(&grid, "Sandals", &config.entry_points, &config.penalties);
//! assert_eq!(missing, DEFAULT_BAY);
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::penalties;
use crate::layout::{Coord, Grid};

/// Where a picker goes when no bay stocks the requested category.
pub const DEFAULT_BAY: Coord = Coord::new(0, 0);

/// Distance penalties applied while scoring bays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Penalties {
    /// Multiplier on distances measured from entry point 0.
    pub entry_zero_factor: f64,
    /// Flat cost of a bay that needs a ladder.
    pub ladder: f64,
}

impl Default for Penalties {
    fn default() -> Self {
        Self {
            entry_zero_factor: penalties::ENTRY_ZERO_FACTOR,
            ladder: penalties::LADDER,
        }
    }
}

/// A chosen bay and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Located {
    pub coord: Coord,
    pub score: f64,
}

/// Score one (bay, entry point) pair.
pub fn score(
    bay: Coord,
    requires_ladder: bool,
    entry_index: usize,
    entry: Coord,
    penalties: &Penalties,
) -> f64 {
    let mut distance = entry.manhattan(bay) as f64;
    if entry_index == 0 {
        distance *= penalties.entry_zero_factor;
    }
    if requires_ladder {
        distance += penalties.ladder;
    }
    distance
}

/// Best-scoring bay for `category`, or `None` when nothing stocks it.
pub fn best_bay(
    grid: &Grid,
    category: &str,
    entry_points: &[Coord],
    penalties: &Penalties,
) -> Option<Located> {
    let mut best: Option<Located> = None;
    for (coord, bay) in grid.iter() {
        if bay.category != category {
            continue;
        }
        for (entry_index, &entry) in entry_points.iter().enumerate() {
            let s = score(coord, bay.requires_ladder, entry_index, entry, penalties);
            // strict: earlier pair keeps a tie
            if best.map_or(true, |b| s < b.score) {
                best = Some(Located { coord, score: s });
            }
        }
    }
    best
}

/// Coordinate of the best bay for `category`, [`DEFAULT_BAY`] if none match.
pub fn locate(grid: &Grid, category: &str, entry_points: &[Coord], penalties: &Penalties) -> Coord {
    match best_bay(grid, category, entry_points, penalties) {
        Some(found) => found.coord,
        None => {
            log::debug!("no bay stocks '{}', using default bay", category);
            DEFAULT_BAY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Gender, LayoutRule, WarehouseConfig};
    use crate::constants::categories;
    use crate::layout::compile;

    fn unit_weight(_: &str) -> u32 {
        1
    }

    fn reference_grids() -> (WarehouseConfig, Grid, Grid) {
        let config = WarehouseConfig::reference();
        let a = Grid::compile(&config, &config.layout_a.rules);
        let b = Grid::compile(&config, &config.layout_b.rules);
        (config, a, b)
    }

    #[test]
    fn entry_zero_penalty_scales_distance() {
        let p = Penalties::default();
        let s = score(Coord::new(3, 1), false, 0, Coord::new(0, 0), &p);
        assert!((s - 4.6).abs() < 1e-9, "got {s}");
        // no multiplier on later entry points
        let s = score(Coord::new(30, 0), false, 1, Coord::new(34, 0), &p);
        assert_eq!(s, 4.0);
    }

    #[test]
    fn ladder_penalty_adds_flat_cost() {
        let p = Penalties::default();
        let entry = Coord::new(34, 0);
        let low = score(Coord::new(30, 0), false, 1, entry, &p);
        let high = score(Coord::new(30, 0), true, 1, entry, &p);
        assert!(high > low);
        assert_eq!(high - low, 5.0);
    }

    #[test]
    fn unknown_category_goes_to_default_bay() {
        let (config, a, b) = reference_grids();
        for grid in [&a, &b] {
            for name in ["Sandals", "roadrunners", ""] {
                let at = locate(grid, name, &config.entry_points, &config.penalties);
                assert_eq!(at, DEFAULT_BAY);
            }
        }
        assert!(best_bay(&a, "Sandals", &config.entry_points, &config.penalties).is_none());
    }

    #[test]
    fn unstocked_category_goes_to_default_bay() {
        // Lifestyle has no rows in the current layout
        let (config, a, _) = reference_grids();
        let at = locate(&a, categories::LIFESTYLE, &config.entry_points, &config.penalties);
        assert_eq!(at, DEFAULT_BAY);
    }

    #[test]
    fn no_entry_points_means_no_match() {
        let (config, a, _) = reference_grids();
        assert_eq!(
            locate(&a, categories::ROAD_RUNNERS, &[], &config.penalties),
            DEFAULT_BAY
        );
    }

    #[test]
    fn picks_nearest_bay_in_current_layout() {
        let (config, a, _) = reference_grids();
        let e = &config.entry_points;
        let p = &config.penalties;
        // MidHikers at rows 33-34, right next to the back entrance
        assert_eq!(locate(&a, categories::MID_HIKERS, e, p), Coord::new(34, 0));
        // RoadRunners rows 3-8: front entrance scores 3*1.15 = 3.45
        assert_eq!(locate(&a, categories::ROAD_RUNNERS, e, p), Coord::new(3, 0));
        // LowHikers rows 30-32 from the back: 34-32 = 2 vs 22*1.15 from the front
        assert_eq!(locate(&a, categories::LOW_HIKERS, e, p), Coord::new(32, 0));
        assert_eq!(
            locate(&a, categories::BLUNDSTONES, e, p),
            Coord::new(29, 0)
        );
    }

    #[test]
    fn picks_nearest_bay_in_alternate_layout() {
        let (config, _, b) = reference_grids();
        let e = &config.entry_points;
        let p = &config.penalties;
        let found = best_bay(&b, categories::MID_HIKERS, e, p).unwrap();
        assert_eq!(found.coord, Coord::new(34, 0));
        assert_eq!(found.score, 0.0);
        // TrailRunners rows 14-20: front 14*1.15 = 16.1, back 34-20 = 14
        let found = best_bay(&b, categories::TRAIL_RUNNERS, e, p).unwrap();
        assert_eq!(found.coord, Coord::new(20, 0));
        assert_eq!(found.score, 14.0);
    }

    #[test]
    fn tie_keeps_first_scanned_bay() {
        // Rows 1 and 3 are equidistant from an entry on row 2
        let rules = vec![
            LayoutRule::new(1..2, "A", Gender::Men),
            LayoutRule::new(3..4, "A", Gender::Women),
        ];
        let grid = compile(&rules, 4, 1, unit_weight);
        let p = Penalties {
            entry_zero_factor: 1.0,
            ladder: 5.0,
        };
        let found = best_bay(&grid, "A", &[Coord::new(2, 0)], &p).unwrap();
        assert_eq!(found.coord, Coord::new(1, 0));
        assert_eq!(found.score, 1.0);
    }

    #[test]
    fn tie_across_entries_keeps_earlier_bay() {
        // Row 1 scores 1 from the front entry, row 4 scores 1 from the back
        let rules = vec![
            LayoutRule::new(1..2, "A", Gender::Men),
            LayoutRule::new(4..5, "A", Gender::Men),
        ];
        let grid = compile(&rules, 6, 1, unit_weight);
        let p = Penalties {
            entry_zero_factor: 1.0,
            ladder: 5.0,
        };
        let back_first = [Coord::new(5, 0), Coord::new(0, 0)];
        let found = best_bay(&grid, "A", &back_first, &p).unwrap();
        assert_eq!(found.coord, Coord::new(1, 0));
        assert_eq!(found.score, 1.0);

        let front_first = [Coord::new(0, 0), Coord::new(5, 0)];
        assert_eq!(locate(&grid, "A", &front_first, &p), Coord::new(1, 0));
    }

    #[test]
    fn ladder_bay_loses_to_floor_bay() {
        // Same row: column 3 is one step further and needs a ladder
        let rules = vec![LayoutRule::new(0..1, "A", Gender::Unisex)];
        let grid = compile(&rules, 1, 5, unit_weight);
        let p = Penalties::default();
        let at = locate(&grid, "A", &[Coord::new(0, 4)], &p);
        // col 4: 0 + 5 = 5; col 2: 2 * 1.15 = 2.3
        assert_eq!(at, Coord::new(0, 2));
    }

    #[test]
    fn gender_is_ignored() {
        let rules = vec![
            LayoutRule::new(1..2, "A", Gender::Women),
            LayoutRule::new(2..3, "A", Gender::Men),
        ];
        let grid = compile(&rules, 3, 1, unit_weight);
        let at = locate(&grid, "A", &[Coord::new(0, 0)], &Penalties::default());
        assert_eq!(at, Coord::new(1, 0));
        assert_eq!(grid.bay(at).unwrap().gender, Gender::Women);
    }

    #[test]
    fn locate_is_deterministic() {
        let (config, a, b) = reference_grids();
        for grid in [&a, &b] {
            for category in &config.categories {
                let first = locate(grid, category, &config.entry_points, &config.penalties);
                let again = locate(grid, category, &config.entry_points, &config.penalties);
                assert_eq!(first, again);
            }
        }
    }
}
