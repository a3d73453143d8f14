// Grid arithmetic for section and item placement
//
// Sections span the full board width and stack vertically. Items fill a
// section left-to-right in rows of GRID_COLUMNS cells.

/// Number of item cells per section row.
pub const GRID_COLUMNS: i64 = 6;

/// Width of one item cell in grid units.
pub const ITEM_WIDTH: i64 = 2;

/// Height of one item cell in grid units.
pub const ITEM_HEIGHT: i64 = 1;

/// Width of a section in grid units (GRID_COLUMNS * ITEM_WIDTH).
pub const SECTION_WIDTH: i64 = GRID_COLUMNS * ITEM_WIDTH;

/// Rectangle in layout coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// Rows needed to hold `app_count` items.
pub fn section_height(app_count: usize) -> i64 {
    (app_count as i64 + GRID_COLUMNS - 1) / GRID_COLUMNS
}

/// Cell of the k-th placed item inside its section (0-indexed).
pub fn item_cell(index: usize) -> Placement {
    let index = index as i64;
    Placement {
        x: (index % GRID_COLUMNS) * ITEM_WIDTH,
        y: index / GRID_COLUMNS,
        width: ITEM_WIDTH,
        height: ITEM_HEIGHT,
    }
}

/// Hands out item cells in placement order.
#[derive(Debug, Default)]
pub struct GridCursor {
    placed: usize,
}

impl GridCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next free cell.
    pub fn next_cell(&mut self) -> Placement {
        let cell = item_cell(self.placed);
        self.placed += 1;
        cell
    }

    pub fn placed(&self) -> usize {
        self.placed
    }
}

/// Stacks sections vertically without overlap.
#[derive(Debug, Default)]
pub struct SectionStack {
    next_y: i64,
}

impl SectionStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a full-width section tall enough for `app_count` items.
    pub fn push(&mut self, app_count: usize) -> Placement {
        let height = section_height(app_count);
        let placement = Placement {
            x: 0,
            y: self.next_y,
            width: SECTION_WIDTH,
            height,
        };
        self.next_y += height;
        placement
    }
}
