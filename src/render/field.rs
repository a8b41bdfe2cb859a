/// Squared-distance cutoff beyond which a blob contributes nothing.
pub const FIELD_CUTOFF: f32 = 8.0;

/// Gaussian steepness; `exp(-d² * k)` with `d` normalized to the ellipse boundary.
const STEEPNESS: f32 = 1.05;

const TABLE_LEN: usize = 1024;

/// Precomputed radial falloff table.
///
/// Replaces the `exp` call in the innermost per-cell-per-blob loop with an
/// index lookup over [0, `FIELD_CUTOFF`].
#[derive(Debug, Clone)]
pub struct FalloffTable {
    entries: Vec<f32>,
    index_scale: f32,
}

impl FalloffTable {
    #[must_use]
    pub fn new() -> Self {
        let index_scale = TABLE_LEN as f32 / FIELD_CUTOFF;
        let entries = (0..TABLE_LEN)
            .map(|i| (-(i as f32 / index_scale) * STEEPNESS).exp())
            .collect();
        Self {
            entries,
            index_scale,
        }
    }

    /// Falloff weight in [0, 1] for a squared normalized distance.
    ///
    /// `eval(0.0)` is exactly 1.0; anything at or past the cutoff is 0.0
    /// without touching the table.
    #[must_use]
    pub fn eval(&self, d_sq: f32) -> f32 {
        if d_sq >= FIELD_CUTOFF {
            return 0.0;
        }
        let index = (d_sq * self.index_scale) as usize;
        self.entries[index.min(TABLE_LEN - 1)]
    }
}

impl Default for FalloffTable {
    fn default() -> Self {
        Self::new()
    }
}
