use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
};

use super::{
    MARGIN,
    atlas::GlyphAtlas,
    blob::Blob,
    field::FalloffTable,
    grid::{CellGrid, REVEAL_FADE_MS},
    smoothstep01,
};
use crate::ui::theme::mix;

/// Opacity never falls below this for a revealed, lit cell.
pub const OPACITY_FLOOR: f32 = 0.1;

/// Draws cheaper to skip than to blend below this.
const OPACITY_EPSILON: f32 = 0.02;

/// Weight of the per-cell palette bias in shading quantization. Tunable; the
/// value is inherited, not derived.
pub const PALETTE_BIAS_WEIGHT: f32 = 0.6;

/// Per-blob values hoisted out of the per-cell loop: rotation trig, pulsed
/// inverse radii, and the intensity-times-envelope weight.
#[derive(Debug, Clone, Copy)]
pub struct BlobFrame {
    pub x: f32,
    pub y: f32,
    pub cos_rot: f32,
    pub sin_rot: f32,
    pub inv_radius_x: f32,
    pub inv_radius_y: f32,
    pub weight: f32,
}

impl BlobFrame {
    #[must_use]
    pub fn capture(blob: &Blob, now_ms: f64) -> Self {
        let (radius_x, radius_y) = blob.pulsed_radii(now_ms);
        let (sin_rot, cos_rot) = blob.rotation.sin_cos();
        Self {
            x: blob.x,
            y: blob.y,
            cos_rot,
            sin_rot,
            inv_radius_x: 1.0 / radius_x,
            inv_radius_y: 1.0 / radius_y,
            weight: blob.intensity * blob.envelope(),
        }
    }

    /// Squared normalized distance from the blob center to a lattice point,
    /// in the blob's rotated anisotropic frame.
    #[must_use]
    fn distance_sq(&self, x: f32, y: f32) -> f32 {
        let dx = x - self.x;
        let dy = y - self.y;
        let local_x = dx * self.cos_rot + dy * self.sin_rot;
        let local_y = dy * self.cos_rot - dx * self.sin_rot;
        let nx = local_x * self.inv_radius_x;
        let ny = local_y * self.inv_radius_y;
        nx * nx + ny * ny
    }
}

/// Refills the reused per-blob buffer for this frame.
pub fn capture_blob_frames(blobs: &[Blob], now_ms: f64, frames: &mut Vec<BlobFrame>) {
    frames.clear();
    frames.extend(blobs.iter().map(|blob| BlobFrame::capture(blob, now_ms)));
}

/// Eased reveal factor for one cell: 0 before its delay, 1 once the 520 ms
/// fade has run, smoothstepped between.
#[must_use]
pub fn reveal_progress(reveal_elapsed_ms: f32, reveal_delay_ms: f32) -> f32 {
    smoothstep01((reveal_elapsed_ms - reveal_delay_ms) / REVEAL_FADE_MS)
}

/// Quantizes brightness to a ramp level. Nearest-integer rounding, so
/// boundary cells snap to the closer level; jitter and bias keep equal
/// brightness from producing flat bands.
#[must_use]
pub fn shading_index(brightness: f32, jitter: f32, bias: f32, levels: usize) -> usize {
    let top = levels.saturating_sub(1) as f32;
    let scaled = (brightness + jitter).clamp(0.0, 1.0) * top;
    (scaled + bias * PALETTE_BIAS_WEIGHT).round().clamp(0.0, top) as usize
}

/// Composites one frame over the already-painted background.
///
/// Accumulates every blob's field contribution per revealed cell, quantizes
/// to a ramp level, and writes the atlas glyph into the terminal cell with
/// its foreground blended toward the cell background by the computed
/// opacity. Blank levels, degraded atlas entries, and sub-epsilon opacities
/// are skipped.
pub fn composite(
    buf: &mut Buffer,
    area: Rect,
    grid: &CellGrid,
    frames: &[BlobFrame],
    atlas: &GlyphAtlas,
    field: &FalloffTable,
    reveal_elapsed_ms: f32,
) {
    for cell in &grid.cells {
        let reveal = reveal_progress(reveal_elapsed_ms, cell.reveal_delay);
        if reveal <= 0.0 {
            continue;
        }

        // The lattice over-fills the area by MARGIN on every side.
        let Some(x) = terminal_coord(cell.column, area.x, area.right()) else {
            continue;
        };
        let Some(y) = terminal_coord(cell.row, area.y, area.bottom()) else {
            continue;
        };

        let mut brightness = cell.base_brightness;
        for frame in frames {
            brightness +=
                field.eval(frame.distance_sq(cell.lattice_x(), cell.lattice_y())) * frame.weight;
        }
        let brightness = brightness.clamp(0.0, 1.0);

        let opacity = (OPACITY_FLOOR + (1.0 - OPACITY_FLOOR) * brightness) * reveal;
        if opacity < OPACITY_EPSILON {
            continue;
        }

        let level = shading_index(
            brightness * reveal,
            cell.noise_jitter,
            cell.palette_bias,
            atlas.levels(),
        );
        let Some(entry) = atlas.entry(level) else {
            continue;
        };

        if let Some(target) = buf.cell_mut((x, y)) {
            let fg = mix(target.bg, entry.color, opacity);
            target.set_char(entry.symbol).set_fg(fg);
            if entry.bloom && opacity > 0.75 {
                target.modifier.insert(Modifier::BOLD);
            }
        }
    }
}

fn terminal_coord(lattice: u16, origin: u16, limit: u16) -> Option<u16> {
    let shifted = i32::from(lattice) - i32::from(MARGIN) + i32::from(origin);
    if shifted < i32::from(origin) || shifted >= i32::from(limit) {
        return None;
    }
    Some(shifted as u16)
}
