//! Picker trip accounting.
//!
//! The core is [`step`], a pure transition `(state, request) -> (state, trips)`:
//!
//! 1. Trips start at zero for every call.
//! 2. Each requested category is routed to a bay. If the picker still has
//!    room the item joins the load; otherwise the full load is delivered
//!    (one trip) and the item starts a new load.
//! 3. Whatever is still in hand is delivered once at the end (one trip).
//!
//! [`Picker`] wraps the transition for callers that want to watch a picker
//! walk: it keeps the current position, the load and an append-only path.
//!
//! ```
//! use stockroom_logic::config::WarehouseConfig;
//! use stockroom_logic::layout::Grid;
//! use stockroom_logic::picker::Picker;
//!
//! let config = WarehouseConfig::reference();
//! let grid = Grid::compile(&config, &config.layout_a.rules);
//! let mut picker = Picker::new(&config, &grid);
//! assert_eq!(picker.fetch(&["RoadRunners"; 5]), 2);
//! assert_eq!(picker.path().len(), 5);
//! ```

use crate::config::WarehouseConfig;
use crate::layout::{Coord, Grid};
use crate::routing::{best_bay, Penalties, DEFAULT_BAY};

/// Boxes currently carried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickerState {
    pub load: Vec<String>,
}

impl PickerState {
    pub fn is_empty(&self) -> bool {
        self.load.is_empty()
    }
}

/// Where one requested item was picked from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visit {
    pub coord: Coord,
    /// Routing score of the chosen bay, `None` when the default bay was used.
    pub score: Option<f64>,
}

/// Read-only inputs shared by every step of one picker.
#[derive(Debug, Clone, Copy)]
pub struct PickContext<'a> {
    pub grid: &'a Grid,
    pub entry_points: &'a [Coord],
    pub penalties: &'a Penalties,
    pub capacity: usize,
}

impl<'a> PickContext<'a> {
    pub fn new(config: &'a WarehouseConfig, grid: &'a Grid) -> Self {
        Self {
            grid,
            entry_points: &config.entry_points,
            penalties: &config.penalties,
            capacity: config.capacity,
        }
    }
}

/// Process one request. `on_visit` sees the bay chosen for every item in
/// request order; unstocked categories resolve to [`DEFAULT_BAY`].
///
/// The returned state is always empty: the final flush delivers the load.
pub fn step<S, F>(
    state: PickerState,
    request: &[S],
    ctx: &PickContext<'_>,
    mut on_visit: F,
) -> (PickerState, u32)
where
    S: AsRef<str>,
    F: FnMut(Visit),
{
    let mut load = state.load;
    let mut trips = 0u32;

    for item in request {
        let category = item.as_ref();
        let found = best_bay(ctx.grid, category, ctx.entry_points, ctx.penalties);
        on_visit(Visit {
            coord: found.map_or(DEFAULT_BAY, |f| f.coord),
            score: found.map(|f| f.score),
        });

        if load.len() < ctx.capacity {
            load.push(category.to_string());
        } else {
            trips += 1;
            load.clear();
            load.push(category.to_string());
        }
    }

    // single final flush
    if !load.is_empty() {
        trips += 1;
        load.clear();
    }

    (PickerState { load }, trips)
}

/// Trips needed for `request`, starting empty-handed.
pub fn trips_for<S: AsRef<str>>(request: &[S], ctx: &PickContext<'_>) -> u32 {
    step(PickerState::default(), request, ctx, |_| {}).1
}

/// A single picker with observable position, load and path.
#[derive(Debug, Clone)]
pub struct Picker<'a> {
    ctx: PickContext<'a>,
    state: PickerState,
    trips: u32,
    position: Coord,
    path: Vec<Coord>,
}

impl<'a> Picker<'a> {
    pub fn new(config: &'a WarehouseConfig, grid: &'a Grid) -> Self {
        Self::with_context(PickContext::new(config, grid))
    }

    /// Starts at the first entry point.
    pub fn with_context(ctx: PickContext<'a>) -> Self {
        let position = ctx.entry_points.first().copied().unwrap_or(DEFAULT_BAY);
        Self {
            ctx,
            state: PickerState::default(),
            trips: 0,
            position,
            path: Vec::new(),
        }
    }

    /// Fetch every item in `request`, returning the trips this call took.
    pub fn fetch<S: AsRef<str>>(&mut self, request: &[S]) -> u32 {
        let state = std::mem::take(&mut self.state);
        let position = &mut self.position;
        let path = &mut self.path;
        let (next, trips) = step(state, request, &self.ctx, |visit| {
            *position = visit.coord;
            path.push(visit.coord);
        });
        self.state = next;
        self.trips = trips;
        log::trace!("fetched {} items in {} trips", request.len(), trips);
        trips
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn load(&self) -> &[String] {
        &self.state.load
    }

    pub fn load_len(&self) -> usize {
        self.state.load.len()
    }

    /// Every bay visited so far, oldest first.
    pub fn path(&self) -> &[Coord] {
        &self.path
    }

    /// Trips taken by the most recent fetch.
    pub fn trips(&self) -> u32 {
        self.trips
    }

    pub fn capacity(&self) -> usize {
        self.ctx.capacity
    }
}
