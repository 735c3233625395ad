//! Layout compiler: turns an ordered rule list into a concrete bay grid.
//!
//! Each row takes the zone of the first rule whose row range contains it.
//! Rows no rule covers become "Uncategorized" / `Unspecified`. Overlapping or
//! gapped rules are never rejected; list order decides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{Gender, LayoutRule, WarehouseConfig};
use crate::constants::{categories, dimensions};

/// A (row, col) position on the warehouse floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan(self, other: Coord) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// A single storage slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bay {
    pub category: String,
    pub gender: Gender,
    /// Row-major, 1-based: `row * cols + col + 1`.
    pub id: u32,
    /// Sales weight of the bay's category.
    pub weight: u32,
    pub requires_ladder: bool,
}

/// Immutable rows x cols grid of bays, stored row-major.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    bays: Vec<Bay>,
}

impl Grid {
    /// Compile one of the config's layouts.
    pub fn compile(config: &WarehouseConfig, rules: &[LayoutRule]) -> Self {
        compile(rules, config.rows, config.cols, |category| {
            config.sales_weight(category)
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.bays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bays.is_empty()
    }

    pub fn bay(&self, at: Coord) -> Option<&Bay> {
        if at.row >= self.rows || at.col >= self.cols {
            return None;
        }
        self.bays.get(at.row * self.cols + at.col)
    }

    /// All bays in row-major order with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Bay)> + '_ {
        let cols = self.cols;
        self.bays
            .iter()
            .enumerate()
            .map(move |(i, bay)| (Coord::new(i / cols, i % cols), bay))
    }

    /// Number of bays stocking `category`.
    pub fn bays_for(&self, category: &str) -> usize {
        self.bays.iter().filter(|b| b.category == category).count()
    }

    /// Rows allotted to each category (every bay in a row shares its zone).
    pub fn category_rows(&self) -> BTreeMap<String, usize> {
        let mut rows: BTreeMap<String, usize> = BTreeMap::new();
        for bay in self.bays.iter().step_by(self.cols.max(1)) {
            *rows.entry(bay.category.clone()).or_default() += 1;
        }
        rows
    }
}

/// Compile `rules` into a `rows` x `cols` grid.
///
/// `weight_of` supplies each bay's sales weight from its category. Bay ids
/// are `u32`, so `rows * cols` must fit in one; `validate_config` rejects
/// larger grids.
pub fn compile<F>(rules: &[LayoutRule], rows: usize, cols: usize, weight_of: F) -> Grid
where
    F: Fn(&str) -> u32,
{
    let mut bays = Vec::with_capacity(rows.saturating_mul(cols));
    let mut next_id: u32 = 0;
    for r in 0..rows {
        let (category, gender) = rules
            .iter()
            .find(|rule| rule.covers(r))
            .map(|rule| (rule.category.as_str(), rule.gender))
            .unwrap_or((categories::UNCATEGORIZED, Gender::Unspecified));
        let weight = weight_of(category);
        for c in 0..cols {
            next_id = next_id.wrapping_add(1);
            bays.push(Bay {
                category: category.to_string(),
                gender,
                id: next_id,
                weight,
                requires_ladder: c > dimensions::LADDER_COLUMN_THRESHOLD,
            });
        }
    }
    Grid { rows, cols, bays }
}
