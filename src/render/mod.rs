pub mod atlas;
pub mod blob;
pub mod compositor;
pub mod field;
pub mod grid;
pub mod rng;
pub mod saver;

/// Pixel size of one lattice cell at scale 1.0.
pub const CELL_SIZE: f32 = 14.0;

/// Extra columns/rows beyond the viewport so blob motion never exposes a bare edge.
pub const OVERSCAN: u16 = 6;

/// Half the overscan: the lattice starts this many cells before the viewport origin.
pub const MARGIN: u16 = OVERSCAN / 2;

/// Shading ramp, blank to densest. Twelve levels.
pub const RAMP: [char; 12] = [' ', '·', ':', ';', '=', '+', 'x', '%', '░', '▒', '▓', '█'];

/// Hermite ramp clamped to [0, 1].
#[must_use]
pub fn smoothstep01(x: f32) -> f32 {
    let t = x.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
