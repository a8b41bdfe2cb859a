use ratatui::{buffer::Buffer, layout::Rect, style::Color};

use super::{
    RAMP,
    atlas::GlyphAtlas,
    blob::{Blob, SpawnMode, population_for},
    compositor::{self, BlobFrame},
    field::FalloffTable,
    grid::{CellGrid, REVEAL_FADE_MS, REVEAL_WINDOW_MS},
    rng::RandomSource,
};

/// Minimum gap between composited frames (~22 fps). The simulation itself
/// ticks at whatever cadence the host drives.
pub const FRAME_INTERVAL_MS: f64 = 45.0;

/// Elapsed-time clamp per tick; a backgrounded tab must not explode the
/// simulation when it wakes up.
pub const TICK_CLAMP_MS: f64 = 120.0;

/// Quiet window after the last resize notification before relayout runs.
pub const RESIZE_DEBOUNCE_MS: f64 = 180.0;

/// Full reveal sweep: the delay window plus one cell fade. Blob motion ramps
/// up over the same span so the opening does not jump to full speed.
pub const REVEAL_RAMP_MS: f32 = REVEAL_WINDOW_MS + REVEAL_FADE_MS;

#[derive(Debug, Clone, Copy)]
struct PendingResize {
    viewport_w: f32,
    viewport_h: f32,
    requested_at_ms: f64,
}

/// The whole screensaver: grid, atlas, falloff table, blob population, and
/// timing, owned as one instance so several can coexist (tests run many).
///
/// Single-threaded by construction; the host calls `tick` then `render`
/// from one loop and nothing here is shared.
#[derive(Debug)]
pub struct Screensaver {
    grid: CellGrid,
    atlas: GlyphAtlas,
    field: FalloffTable,
    blobs: Vec<Blob>,
    frames: Vec<BlobFrame>,
    rng: Box<dyn RandomSource>,
    glyph_dim: Color,
    glyph_bright: Color,
    viewport_w: f32,
    viewport_h: f32,
    scale: f32,
    reveal_started_at_ms: f64,
    last_tick_at_ms: f64,
    last_composite_at_ms: f64,
    pending_resize: Option<PendingResize>,
}

impl Screensaver {
    /// Lays out the grid, builds the atlas, and spawns a warm-started
    /// population, entering the running state immediately.
    #[must_use]
    pub fn new(
        viewport_w: f32,
        viewport_h: f32,
        scale: f32,
        glyph_dim: Color,
        glyph_bright: Color,
        mut rng: Box<dyn RandomSource>,
        now_ms: f64,
    ) -> Self {
        let grid = CellGrid::layout(viewport_w, viewport_h, scale, rng.as_mut());
        let atlas = GlyphAtlas::build(scale, &RAMP, glyph_dim, glyph_bright, rng.as_mut());
        let population = population_for(viewport_w);
        let blobs = (0..population)
            .map(|_| Blob::spawn(SpawnMode::Initial, grid.columns, grid.rows, rng.as_mut()))
            .collect();

        Self {
            grid,
            atlas,
            field: FalloffTable::new(),
            blobs,
            frames: Vec::with_capacity(population),
            rng,
            glyph_dim,
            glyph_bright,
            viewport_w,
            viewport_h,
            scale,
            reveal_started_at_ms: now_ms,
            last_tick_at_ms: now_ms,
            // First tick composites right away.
            last_composite_at_ms: now_ms - FRAME_INTERVAL_MS,
            pending_resize: None,
        }
    }

    /// Records a resize; relayout happens on a later tick once no further
    /// notification has arrived for the debounce window.
    pub fn notify_resize(&mut self, viewport_w: f32, viewport_h: f32, now_ms: f64) {
        self.pending_resize = Some(PendingResize {
            viewport_w,
            viewport_h,
            requested_at_ms: now_ms,
        });
    }

    /// Discards everything derived from the old viewport and replays the
    /// reveal sweep at the current size.
    pub fn restart(&mut self, now_ms: f64) {
        self.relayout(self.viewport_w, self.viewport_h, now_ms);
    }

    /// One simulation tick. Returns true when a frame is due for
    /// compositing; callers skip drawing otherwise.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if let Some(pending) = self.pending_resize
            && now_ms - pending.requested_at_ms >= RESIZE_DEBOUNCE_MS
        {
            self.relayout(pending.viewport_w, pending.viewport_h, now_ms);
        }

        let delta_ms = (now_ms - self.last_tick_at_ms).clamp(0.0, TICK_CLAMP_MS);
        self.last_tick_at_ms = now_ms;

        // Motion ramps up with the reveal so clouds ease into drift instead
        // of arriving at full speed mid-sweep.
        let ramp = (self.reveal_elapsed_ms(now_ms) as f32 / REVEAL_RAMP_MS).clamp(0.0, 1.0);
        let sim_delta = delta_ms as f32 * ramp;

        let (columns, rows) = (self.grid.columns, self.grid.rows);
        for blob in &mut self.blobs {
            blob.advance(sim_delta, columns, rows, now_ms);
            if blob.dead() {
                *blob = Blob::spawn(SpawnMode::Recycled, columns, rows, self.rng.as_mut());
            }
        }

        if now_ms - self.last_composite_at_ms >= FRAME_INTERVAL_MS {
            self.last_composite_at_ms = now_ms;
            true
        } else {
            false
        }
    }

    /// Composites the current state over `area`. The background underneath
    /// is whatever the caller painted before this pass.
    pub fn render(&mut self, buf: &mut Buffer, area: Rect, now_ms: f64) {
        compositor::capture_blob_frames(&self.blobs, now_ms, &mut self.frames);
        compositor::composite(
            buf,
            area,
            &self.grid,
            &self.frames,
            &self.atlas,
            &self.field,
            self.reveal_elapsed_ms(now_ms) as f32,
        );
    }

    fn relayout(&mut self, viewport_w: f32, viewport_h: f32, now_ms: f64) {
        self.viewport_w = viewport_w;
        self.viewport_h = viewport_h;
        self.grid = CellGrid::layout(viewport_w, viewport_h, self.scale, self.rng.as_mut());
        self.atlas = GlyphAtlas::build(
            self.scale,
            &RAMP,
            self.glyph_dim,
            self.glyph_bright,
            self.rng.as_mut(),
        );
        let population = population_for(viewport_w);
        self.blobs = (0..population)
            .map(|_| {
                Blob::spawn(
                    SpawnMode::Initial,
                    self.grid.columns,
                    self.grid.rows,
                    self.rng.as_mut(),
                )
            })
            .collect();
        self.reveal_started_at_ms = now_ms;
        self.last_composite_at_ms = now_ms - FRAME_INTERVAL_MS;
        self.pending_resize = None;
    }

    #[must_use]
    pub fn reveal_elapsed_ms(&self, now_ms: f64) -> f64 {
        now_ms - self.reveal_started_at_ms
    }

    #[must_use]
    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    #[must_use]
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    #[must_use]
    pub fn resize_pending(&self) -> bool {
        self.pending_resize.is_some()
    }
}
