//! Warehouse configuration: dimensions, entry points, the two candidate
//! layouts, picker capacity and routing penalties.
//!
//! The whole configuration is one immutable value built once and handed to
//! the compiler and the simulation driver. `WarehouseConfig::reference()`
//! reproduces the reference store; JSON files can override any field.
//!
//! ```
//! use stockroom_logic::config::{validate_config, WarehouseConfig};
//!
//! let config = WarehouseConfig::reference();
//! assert!(validate_config(&config).is_empty());
//! assert_eq!(config.rows * config.cols, 175);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{categories, dimensions, picking};
use crate::layout::Coord;
use crate::routing::Penalties;

/// Gender zone of a row. `Unspecified` only comes from the compiler fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Men,
    Women,
    Unisex,
    Unspecified,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gender::Men => "Men",
            Gender::Women => "Women",
            Gender::Unisex => "Unisex",
            Gender::Unspecified => "Unspecified",
        };
        f.write_str(label)
    }
}

/// Maps a half-open row interval to a (category, gender) zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRule {
    pub row_range: Range<usize>,
    pub category: String,
    pub gender: Gender,
}

impl LayoutRule {
    pub fn new(row_range: Range<usize>, category: &str, gender: Gender) -> Self {
        Self {
            row_range,
            category: category.to_string(),
            gender,
        }
    }

    pub fn covers(&self, row: usize) -> bool {
        self.row_range.contains(&row)
    }
}

/// A named, ordered rule list. First matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub name: String,
    pub rules: Vec<LayoutRule>,
}

/// How fetch requests are drawn from the category list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RequestSampling {
    /// Every category equally likely.
    #[default]
    Uniform,
    /// Categories drawn in proportion to their sales weight.
    SalesWeighted,
}

/// Complete, immutable description of the warehouse and the experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    /// Requestable categories.
    pub categories: Vec<String>,
    pub rows: usize,
    pub cols: usize,
    /// Index 0 carries the entry penalty factor.
    pub entry_points: Vec<Coord>,
    pub layout_a: Layout,
    pub layout_b: Layout,
    /// Boxes carried per trip.
    pub capacity: usize,
    pub penalties: Penalties,
    /// Items per generated request.
    pub request_length: usize,
    pub sampling: RequestSampling,
    /// Relative demand per category; missing categories weigh 1.
    pub sales_weights: BTreeMap<String, u32>,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self::reference()
    }
}

impl WarehouseConfig {
    /// The reference store: 35x5 bays, two entrances on the left wall.
    pub fn reference() -> Self {
        let rows = dimensions::ROWS;
        Self {
            categories: categories::ALL.iter().map(|c| c.to_string()).collect(),
            rows,
            cols: dimensions::COLS,
            entry_points: vec![Coord::new(0, 0), Coord::new(rows - 1, 0)],
            layout_a: current_layout(),
            layout_b: alternate_layout(),
            capacity: picking::CAPACITY,
            penalties: Penalties::default(),
            request_length: picking::REQUEST_LENGTH,
            sampling: RequestSampling::Uniform,
            sales_weights: [
                (categories::LIFESTYLE, 3),
                (categories::ROAD_RUNNERS, 5),
                (categories::TRAIL_RUNNERS, 4),
                (categories::LOW_HIKERS, 2),
                (categories::MID_HIKERS, 1),
            ]
            .into_iter()
            .map(|(c, w)| (c.to_string(), w))
            .collect(),
        }
    }

    /// Parse a config from JSON. Omitted fields keep their reference values.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Sales weight of a category, 1 when not listed.
    pub fn sales_weight(&self, category: &str) -> u32 {
        self.sales_weights.get(category).copied().unwrap_or(1)
    }

    pub fn layouts(&self) -> [&Layout; 2] {
        [&self.layout_a, &self.layout_b]
    }
}

/// Layout currently used on the floor. Rows 0..3 are left unassigned and
/// the last rule overruns the grid.
pub fn current_layout() -> Layout {
    use categories::*;
    use Gender::*;
    Layout {
        name: "current".to_string(),
        rules: vec![
            LayoutRule::new(3..9, ROAD_RUNNERS, Women),
            LayoutRule::new(9..12, TRAIL_RUNNERS, Women),
            LayoutRule::new(12..18, ROAD_RUNNERS, Men),
            LayoutRule::new(18..22, TRAIL_RUNNERS, Men),
            LayoutRule::new(22..25, LOW_HIKERS, Women),
            LayoutRule::new(25..29, MID_HIKERS, Women),
            LayoutRule::new(29..30, BLUNDSTONES, Unisex),
            LayoutRule::new(30..33, LOW_HIKERS, Men),
            LayoutRule::new(33..38, MID_HIKERS, Men),
        ],
    }
}

/// Proposed layout. The Women rules repeat the Men ranges, so under
/// first-match resolution they never apply.
pub fn alternate_layout() -> Layout {
    use categories::*;
    use Gender::*;
    Layout {
        name: "alternate".to_string(),
        rules: vec![
            LayoutRule::new(0..7, LIFESTYLE, Men),
            LayoutRule::new(7..14, ROAD_RUNNERS, Men),
            LayoutRule::new(14..21, TRAIL_RUNNERS, Men),
            LayoutRule::new(21..28, LOW_HIKERS, Men),
            LayoutRule::new(28..35, MID_HIKERS, Men),
            LayoutRule::new(0..7, MID_HIKERS, Women),
            LayoutRule::new(7..14, LOW_HIKERS, Women),
            LayoutRule::new(14..21, TRAIL_RUNNERS, Women),
            LayoutRule::new(21..28, ROAD_RUNNERS, Women),
            LayoutRule::new(28..35, LIFESTYLE, Women),
        ],
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid must have at least one row")]
    ZeroRows,
    #[error("grid must have at least one column")]
    ZeroCols,
    #[error("grid of {rows}x{cols} bays exceeds the bay id range")]
    GridTooLarge { rows: usize, cols: usize },
    #[error("category list is empty")]
    NoCategories,
    #[error("picker capacity must be positive")]
    ZeroCapacity,
    #[error("at least one entry point is required")]
    NoEntryPoints,
    #[error("entry point ({row}, {col}) is outside the grid")]
    EntryPointOutOfBounds { row: usize, col: usize },
    #[error("entry penalty factor {0} must be finite and non-negative")]
    InvalidPenaltyFactor(f64),
    #[error("ladder penalty {0} must be finite and non-negative")]
    InvalidLadderPenalty(f64),
    #[error("layout name is empty")]
    EmptyLayoutName,
    #[error("rule {index} of layout '{layout}' has an empty row range")]
    EmptyRuleRange { layout: String, index: usize },
    #[error("sales-weighted sampling needs at least one category with positive weight")]
    NoSamplingWeight,
}

/// Validate a warehouse configuration, returning all errors found.
pub fn validate_config(config: &WarehouseConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.rows == 0 {
        errors.push(ConfigError::ZeroRows);
    }
    if config.cols == 0 {
        errors.push(ConfigError::ZeroCols);
    }
    let bays = config.rows.checked_mul(config.cols);
    if bays.map_or(true, |n| u32::try_from(n).is_err()) {
        errors.push(ConfigError::GridTooLarge {
            rows: config.rows,
            cols: config.cols,
        });
    }
    if config.categories.is_empty() {
        errors.push(ConfigError::NoCategories);
    }
    if config.capacity == 0 {
        errors.push(ConfigError::ZeroCapacity);
    }

    if config.entry_points.is_empty() {
        errors.push(ConfigError::NoEntryPoints);
    }
    for entry in &config.entry_points {
        if entry.row >= config.rows || entry.col >= config.cols {
            errors.push(ConfigError::EntryPointOutOfBounds {
                row: entry.row,
                col: entry.col,
            });
        }
    }

    let factor = config.penalties.entry_zero_factor;
    if !factor.is_finite() || factor < 0.0 {
        errors.push(ConfigError::InvalidPenaltyFactor(factor));
    }
    let ladder = config.penalties.ladder;
    if !ladder.is_finite() || ladder < 0.0 {
        errors.push(ConfigError::InvalidLadderPenalty(ladder));
    }

    for layout in config.layouts() {
        if layout.name.trim().is_empty() {
            errors.push(ConfigError::EmptyLayoutName);
        }
        for (index, rule) in layout.rules.iter().enumerate() {
            if rule.row_range.is_empty() {
                errors.push(ConfigError::EmptyRuleRange {
                    layout: layout.name.clone(),
                    index,
                });
            }
        }
    }

    if config.sampling == RequestSampling::SalesWeighted
        && !config.categories.is_empty()
        && config
            .categories
            .iter()
            .all(|c| config.sales_weight(c) == 0)
    {
        errors.push(ConfigError::NoSamplingWeight);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_config_is_valid() {
        let config = WarehouseConfig::reference();
        let errors = validate_config(&config);
        assert!(errors.is_empty(), "reference config should be valid: {errors:?}");
    }

    #[test]
    fn zero_dimensions_rejected() {
        let mut config = WarehouseConfig::reference();
        config.rows = 0;
        config.cols = 0;
        let errors = validate_config(&config);
        assert!(errors.contains(&ConfigError::ZeroRows));
        assert!(errors.contains(&ConfigError::ZeroCols));
    }

    #[test]
    fn oversized_grid_rejected() {
        let mut config = WarehouseConfig::reference();
        config.rows = usize::MAX / 2;
        config.cols = 5;
        assert_eq!(
            validate_config(&config),
            vec![ConfigError::GridTooLarge {
                rows: usize::MAX / 2,
                cols: 5
            }]
        );

        config.rows = u32::MAX as usize;
        config.cols = 1;
        assert!(validate_config(&config).is_empty());
        config.cols = 2;
        assert!(matches!(
            validate_config(&config).as_slice(),
            [ConfigError::GridTooLarge { .. }]
        ));
    }

    #[test]
    fn empty_categories_rejected() {
        let mut config = WarehouseConfig::reference();
        config.categories.clear();
        assert!(validate_config(&config).contains(&ConfigError::NoCategories));
    }

    #[test]
    fn zero_capacity_rejected() {
        let mut config = WarehouseConfig::reference();
        config.capacity = 0;
        assert_eq!(validate_config(&config), vec![ConfigError::ZeroCapacity]);
    }

    #[test]
    fn entry_points_checked() {
        let mut config = WarehouseConfig::reference();
        config.entry_points = vec![Coord::new(35, 0)];
        assert!(validate_config(&config)
            .contains(&ConfigError::EntryPointOutOfBounds { row: 35, col: 0 }));
        config.entry_points.clear();
        assert!(validate_config(&config).contains(&ConfigError::NoEntryPoints));
    }

    #[test]
    fn bad_penalties_rejected() {
        let mut config = WarehouseConfig::reference();
        config.penalties.entry_zero_factor = -1.0;
        config.penalties.ladder = f64::NAN;
        let errors = validate_config(&config);
        assert!(errors.contains(&ConfigError::InvalidPenaltyFactor(-1.0)));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidLadderPenalty(v) if v.is_nan())));
    }

    #[test]
    fn empty_rule_range_reported_with_position() {
        let mut config = WarehouseConfig::reference();
        config
            .layout_b
            .rules
            .push(LayoutRule::new(10..10, categories::LIFESTYLE, Gender::Men));
        let errors = validate_config(&config);
        assert_eq!(
            errors,
            vec![ConfigError::EmptyRuleRange {
                layout: "alternate".to_string(),
                index: 10,
            }]
        );
    }

    #[test]
    fn weighted_sampling_needs_weight() {
        let mut config = WarehouseConfig::reference();
        config.sampling = RequestSampling::SalesWeighted;
        assert!(validate_config(&config).is_empty());
        for weight in config.sales_weights.values_mut() {
            *weight = 0;
        }
        assert_eq!(validate_config(&config), vec![ConfigError::NoSamplingWeight]);
    }

    #[test]
    fn all_errors_collected() {
        let mut config = WarehouseConfig::reference();
        config.rows = 0;
        config.categories.clear();
        config.capacity = 0;
        // (0,0) and (34,0) both fall outside a zero-row grid
        assert_eq!(validate_config(&config).len(), 5);
    }

    #[test]
    fn sales_weight_defaults_to_one() {
        let config = WarehouseConfig::reference();
        assert_eq!(config.sales_weight(categories::ROAD_RUNNERS), 5);
        assert_eq!(config.sales_weight(categories::BLUNDSTONES), 1);
    }

    #[test]
    fn json_round_trip() {
        let config = WarehouseConfig::reference();
        let json = config.to_json().unwrap();
        let parsed = WarehouseConfig::from_json(&json).unwrap();
        assert_eq!(parsed.layout_a, config.layout_a);
        assert_eq!(parsed.layout_b, config.layout_b);
        assert_eq!(parsed.entry_points, config.entry_points);
        assert_eq!(parsed.sales_weights, config.sales_weights);
    }

    #[test]
    fn partial_json_keeps_reference_values() {
        let config = WarehouseConfig::from_json(r#"{ "capacity": 6, "sampling": "SalesWeighted" }"#)
            .unwrap();
        assert_eq!(config.capacity, 6);
        assert_eq!(config.sampling, RequestSampling::SalesWeighted);
        assert_eq!(config.rows, dimensions::ROWS);
        assert_eq!(config.layout_a, current_layout());
    }

    #[test]
    fn partial_penalties_keep_reference_values() {
        let config = WarehouseConfig::from_json(r#"{ "penalties": { "ladder": 3.0 } }"#).unwrap();
        assert_eq!(config.penalties.ladder, 3.0);
        assert_eq!(config.penalties.entry_zero_factor, 1.15);
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn rule_json_shape() {
        let json = r#"{ "row_range": { "start": 2, "end": 4 }, "category": "Lifestyle", "gender": "Unisex" }"#;
        let rule: LayoutRule = serde_json::from_str(json).unwrap();
        assert!(rule.covers(2));
        assert!(rule.covers(3));
        assert!(!rule.covers(4));
        assert_eq!(rule.gender, Gender::Unisex);
    }
}
