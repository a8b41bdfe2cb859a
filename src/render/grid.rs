use super::{CELL_SIZE, MARGIN, OVERSCAN, rng::RandomSource};

/// Spread of per-cell reveal delays, in milliseconds.
pub const REVEAL_WINDOW_MS: f32 = 100.0;

/// Per-cell fade duration during the reveal sweep, in milliseconds.
pub const REVEAL_FADE_MS: f32 = 520.0;

// Delays are squared-biased toward the start of the window and shifted so a
// slice of cells begins fading before the sweep clock reaches zero.
const REVEAL_HEAD_START_MS: f32 = 20.0;

/// Static per-cell attributes, fixed between layouts.
#[derive(Debug, Clone)]
pub struct Cell {
    pub column: u16,
    pub row: u16,
    /// Pixel-space center; negative near the lattice edges because the grid
    /// over-fills the viewport by the wrap margin.
    pub center_x: f32,
    pub center_y: f32,
    /// Ambient brightness in [0, 1], brighter toward the top.
    pub base_brightness: f32,
    /// Brightness offset applied before shading quantization.
    pub noise_jitter: f32,
    /// Ramp-index offset in [-1, 1]; breaks up banding at equal brightness.
    pub palette_bias: f32,
    /// Offset into the reveal sweep, in milliseconds. May be negative.
    pub reveal_delay: f32,
}

impl Cell {
    /// Center in lattice units, matching blob coordinate space.
    #[must_use]
    pub fn lattice_x(&self) -> f32 {
        f32::from(self.column) + 0.5
    }

    #[must_use]
    pub fn lattice_y(&self) -> f32 {
        f32::from(self.row) + 0.5
    }
}

/// The fixed cell lattice for one viewport size.
#[derive(Debug)]
pub struct CellGrid {
    pub columns: u16,
    pub rows: u16,
    /// Edge length of one cell in device pixels (`CELL_SIZE * scale`).
    pub cell_px: f32,
    pub cells: Vec<Cell>,
}

impl CellGrid {
    /// Derives the lattice from a viewport and allocates every cell's static
    /// attributes in one pass. Re-running fully replaces prior state; lattice
    /// geometry depends only on the arguments, randomized attributes on the
    /// supplied source.
    #[must_use]
    pub fn layout(
        viewport_w: f32,
        viewport_h: f32,
        scale: f32,
        rng: &mut dyn RandomSource,
    ) -> Self {
        // Nearest-integer cell counts; the overscan absorbs the sub-cell
        // remainder either way (800x600 comes out at 63x49).
        let columns = (viewport_w / CELL_SIZE).round() as u16 + OVERSCAN;
        let rows = (viewport_h / CELL_SIZE).round() as u16 + OVERSCAN;
        let cell_px = CELL_SIZE * scale.max(0.1);

        let mut cells = Vec::with_capacity(usize::from(columns) * usize::from(rows));
        for row in 0..rows {
            let row_t = f32::from(row) / f32::from(rows.max(1));
            for column in 0..columns {
                let gradient = 0.05 + 0.08 * (1.0 - row_t);
                cells.push(Cell {
                    column,
                    row,
                    center_x: (f32::from(column) + 0.5 - f32::from(MARGIN)) * cell_px,
                    center_y: (f32::from(row) + 0.5 - f32::from(MARGIN)) * cell_px,
                    base_brightness: (gradient + rng.range(0.0, 0.03)).clamp(0.0, 1.0),
                    noise_jitter: rng.range(-0.06, 0.06),
                    palette_bias: rng.range(-1.0, 1.0),
                    reveal_delay: rng.next_f32().powi(2) * REVEAL_WINDOW_MS
                        - REVEAL_HEAD_START_MS,
                });
            }
        }

        Self {
            columns,
            rows,
            cell_px,
            cells,
        }
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}
