//! Reference warehouse constants: dimensions, penalties, category names.
//!
//! These seed `WarehouseConfig::reference()`. Everything here can be
//! overridden through the config; nothing in the logic reads these directly
//! except the fallback labels.

pub mod dimensions {
    /// Storage rows in the reference warehouse (kids' rows excluded).
    pub const ROWS: usize = 35;
    pub const COLS: usize = 5;
    /// Bays in columns above this index need a ladder.
    pub const LADDER_COLUMN_THRESHOLD: usize = 2;
}

pub mod penalties {
    /// Distance multiplier applied to entry point 0.
    pub const ENTRY_ZERO_FACTOR: f64 = 1.15;
    /// Flat distance added for bays that need a ladder.
    pub const LADDER: f64 = 5.0;
}

pub mod picking {
    /// Boxes a picker can carry at once.
    pub const CAPACITY: usize = 4;
    /// Items per randomly generated fetch request.
    pub const REQUEST_LENGTH: usize = 10;
    pub const DEFAULT_TRIALS: u32 = 10_000;
    pub const DEFAULT_SEED: u64 = 42;
}

pub mod categories {
    pub const LIFESTYLE: &str = "Lifestyle";
    pub const ROAD_RUNNERS: &str = "RoadRunners";
    pub const TRAIL_RUNNERS: &str = "TrailRunners";
    pub const LOW_HIKERS: &str = "LowHikers";
    pub const MID_HIKERS: &str = "MidHikers";
    /// Only stocked by the current layout; never requested.
    pub const BLUNDSTONES: &str = "Blundstones";
    /// Category given to rows no layout rule covers.
    pub const UNCATEGORIZED: &str = "Uncategorized";

    /// Requestable categories, in sampling order.
    pub const ALL: [&str; 5] = [LIFESTYLE, ROAD_RUNNERS, TRAIL_RUNNERS, LOW_HIKERS, MID_HIKERS];
}
