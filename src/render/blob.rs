use std::f32::consts::TAU;

use super::{rng::RandomSource, smoothstep01};

/// Pulsed radii never shrink below this, keeping the field non-degenerate.
pub const MIN_RADIUS: f32 = 12.0;

/// Lattice cells outside the grid before life drains faster.
pub const WRAP_BOUND: f32 = 6.0;

/// Lattice cells outside the grid before life drains much faster.
pub const SPAWN_BOUND: f32 = 14.0;

const NEAR_DRAIN: f32 = 1.45;
const FAR_DRAIN: f32 = 3.5;

/// Envelope ramps as fractions of lifespan.
const FADE_IN_FRACTION: f32 = 0.18;
const FADE_OUT_FRACTION: f32 = 0.25;

// Spawn ranges. Literal tunables, not derived from anything.
const SPAWN_OFFSET: (f32, f32) = (2.0, 10.0);
const RADIUS: (f32, f32) = (14.0, 30.0);
const ASPECT: (f32, f32) = (0.55, 0.95);
const HEADING_JITTER: f32 = 0.35;
const SPEED: (f32, f32) = (0.004, 0.009);
const ROTATION_SPEED: (f32, f32) = (-0.000_4, 0.000_4);
const WOBBLE_AMP: (f32, f32) = (0.10, 0.28);
const WOBBLE_SPEED: (f32, f32) = (0.000_6, 0.001_6);
const INTENSITY: (f32, f32) = (0.55, 1.0);
const LIFESPAN_MS: (f32, f32) = (9_000.0, 16_000.0);
const INTERIOR_INSET: (f32, f32) = (0.18, 0.82);
const WARM_START_LIFE: (f32, f32) = (0.25, 0.95);

/// How a blob enters the population.
///
/// The very first population is pre-aged so the opening frame shows clouds
/// mid-life; every later replacement starts at full life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnMode {
    Initial,
    Recycled,
}

/// One elliptical cloud emitter. Positions and radii are in lattice units.
#[derive(Debug, Clone)]
pub struct Blob {
    pub x: f32,
    pub y: f32,
    pub radius_x: f32,
    pub radius_y: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Lattice units per millisecond.
    pub vx: f32,
    pub vy: f32,
    pub wobble_amp: f32,
    pub wobble_speed: f32,
    pub wobble_phase: f32,
    /// Peak field contribution.
    pub intensity: f32,
    /// Remaining milliseconds.
    pub life: f32,
    pub max_life: f32,
}

impl Blob {
    /// Spawns at a random point just past one of the four lattice edges, with
    /// a velocity aimed loosely at a random interior target.
    #[must_use]
    pub fn spawn(mode: SpawnMode, columns: u16, rows: u16, rng: &mut dyn RandomSource) -> Self {
        let cols = f32::from(columns);
        let grid_rows = f32::from(rows);

        let offset = rng.range(SPAWN_OFFSET.0, SPAWN_OFFSET.1);
        let edge = (rng.next_f32() * 4.0) as u8;
        let (x, y) = match edge {
            0 => (rng.range(0.0, cols), -offset),
            1 => (cols + offset, rng.range(0.0, grid_rows)),
            2 => (rng.range(0.0, cols), grid_rows + offset),
            _ => (-offset, rng.range(0.0, grid_rows)),
        };

        let target_x = cols * rng.range(INTERIOR_INSET.0, INTERIOR_INSET.1);
        let target_y = grid_rows * rng.range(INTERIOR_INSET.0, INTERIOR_INSET.1);
        let heading =
            (target_y - y).atan2(target_x - x) + rng.range(-HEADING_JITTER, HEADING_JITTER);
        let speed = rng.range(SPEED.0, SPEED.1);

        let radius = rng.range(RADIUS.0, RADIUS.1);
        let aspect = rng.range(ASPECT.0, ASPECT.1);

        let max_life = rng.range(LIFESPAN_MS.0, LIFESPAN_MS.1);
        let life = match mode {
            SpawnMode::Initial => max_life * rng.range(WARM_START_LIFE.0, WARM_START_LIFE.1),
            SpawnMode::Recycled => max_life,
        };

        Self {
            x,
            y,
            radius_x: radius.max(MIN_RADIUS),
            radius_y: (radius * aspect).max(MIN_RADIUS),
            rotation: rng.range(0.0, TAU),
            rotation_speed: rng.range(ROTATION_SPEED.0, ROTATION_SPEED.1),
            vx: heading.cos() * speed,
            vy: heading.sin() * speed,
            wobble_amp: rng.range(WOBBLE_AMP.0, WOBBLE_AMP.1),
            wobble_speed: rng.range(WOBBLE_SPEED.0, WOBBLE_SPEED.1),
            wobble_phase: rng.range(0.0, TAU),
            intensity: rng.range(INTENSITY.0, INTENSITY.1),
            life,
            max_life,
        }
    }

    /// One simulation step. Drift speed breathes with wall-clock time, and
    /// life drains faster the further the center wanders outside the lattice.
    pub fn advance(&mut self, delta_ms: f32, columns: u16, rows: u16, now_ms: f64) {
        let drift = drift_modulation(now_ms);
        self.x += self.vx * delta_ms * drift;
        self.y += self.vy * delta_ms * drift;
        self.rotation += self.rotation_speed * delta_ms;

        let excess = self.bounds_excess(columns, rows);
        let drain = if excess > SPAWN_BOUND {
            FAR_DRAIN
        } else if excess > WRAP_BOUND {
            NEAR_DRAIN
        } else {
            1.0
        };
        self.life -= delta_ms * drain;
    }

    /// Distance in lattice cells from the center to the grid rectangle; zero
    /// when inside.
    #[must_use]
    pub fn bounds_excess(&self, columns: u16, rows: u16) -> f32 {
        let dx = (-self.x).max(self.x - f32::from(columns)).max(0.0);
        let dy = (-self.y).max(self.y - f32::from(rows)).max(0.0);
        dx.max(dy)
    }

    #[must_use]
    pub fn dead(&self) -> bool {
        self.life <= 0.0
    }

    /// Fade-in over the first 18% of life times fade-out over the final 25%.
    #[must_use]
    pub fn envelope(&self) -> f32 {
        let age_fraction = ((self.max_life - self.life) / self.max_life).clamp(0.0, 1.0);
        let life_fraction = (self.life / self.max_life).clamp(0.0, 1.0);
        smoothstep01(age_fraction / FADE_IN_FRACTION)
            * smoothstep01(life_fraction / FADE_OUT_FRACTION)
    }

    /// Radii scaled by the wobble pulse, floored at `MIN_RADIUS`.
    #[must_use]
    pub fn pulsed_radii(&self, now_ms: f64) -> (f32, f32) {
        let pulse =
            1.0 + self.wobble_amp * (self.wobble_phase + now_ms as f32 * self.wobble_speed).sin();
        (
            (self.radius_x * pulse).max(MIN_RADIUS),
            (self.radius_y * pulse).max(MIN_RADIUS),
        )
    }
}

/// Slowly breathing drift multiplier: two low-frequency sinusoids of
/// wall-clock time, so travel speed swells and eases instead of staying
/// constant. Always positive.
#[must_use]
pub fn drift_modulation(now_ms: f64) -> f32 {
    let t = now_ms as f32;
    1.0 + 0.35 * (t * 0.000_21).sin() + 0.2 * (t * 0.000_47).sin()
}

/// Concurrent blob count for a viewport width in pixels.
#[must_use]
pub fn population_for(viewport_w: f32) -> usize {
    if viewport_w < 520.0 {
        2
    } else if viewport_w < 900.0 {
        3
    } else if viewport_w < 1_320.0 {
        4
    } else {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::rng::SequenceSource;

    fn spawn_fixed(mode: SpawnMode) -> Blob {
        let mut rng = SequenceSource::new(vec![0.3, 0.8, 0.1, 0.6, 0.45, 0.9, 0.2, 0.7]);
        Blob::spawn(mode, 63, 49, &mut rng)
    }

    #[test]
    fn spawn_starts_outside_the_lattice() {
        for first in [0.0, 0.3, 0.6, 0.9] {
            let mut rng = SequenceSource::new(vec![0.5, first, 0.5, 0.5, 0.5, 0.5]);
            let blob = Blob::spawn(SpawnMode::Recycled, 63, 49, &mut rng);
            assert!(
                blob.x < 0.0 || blob.x > 63.0 || blob.y < 0.0 || blob.y > 49.0,
                "spawned inside at ({}, {})",
                blob.x,
                blob.y
            );
        }
    }

    #[test]
    fn recycled_spawn_starts_at_full_life() {
        let blob = spawn_fixed(SpawnMode::Recycled);
        assert!((blob.life - blob.max_life).abs() < f32::EPSILON);
    }

    #[test]
    fn initial_spawn_is_pre_aged() {
        let blob = spawn_fixed(SpawnMode::Initial);
        assert!(blob.life > 0.0);
        assert!(blob.life < blob.max_life);
    }

    #[test]
    fn radii_respect_the_floor() {
        let blob = spawn_fixed(SpawnMode::Recycled);
        assert!(blob.radius_x >= MIN_RADIUS);
        assert!(blob.radius_y >= MIN_RADIUS);
        let (rx, ry) = blob.pulsed_radii(123_456.0);
        assert!(rx >= MIN_RADIUS);
        assert!(ry >= MIN_RADIUS);
    }

    #[test]
    fn far_out_of_bounds_drains_at_triple_rate() {
        let mut blob = spawn_fixed(SpawnMode::Recycled);
        blob.x = -40.0;
        blob.y = 10.0;
        blob.vx = 0.0;
        blob.vy = 0.0;
        blob.life = 50.0;
        blob.max_life = 10_000.0;
        blob.advance(100.0, 63, 49, 0.0);
        assert!(blob.life <= 50.0 - 100.0 * 3.5);
        assert!(blob.dead());
    }

    #[test]
    fn near_bound_drains_at_intermediate_rate() {
        let mut blob = spawn_fixed(SpawnMode::Recycled);
        blob.x = -8.0;
        blob.y = 10.0;
        blob.vx = 0.0;
        blob.vy = 0.0;
        blob.life = 1_000.0;
        blob.advance(100.0, 63, 49, 0.0);
        assert!((blob.life - (1_000.0 - 145.0)).abs() < 0.5);
    }

    #[test]
    fn inside_the_lattice_drains_at_unit_rate() {
        let mut blob = spawn_fixed(SpawnMode::Recycled);
        blob.x = 30.0;
        blob.y = 20.0;
        blob.vx = 0.0;
        blob.vy = 0.0;
        blob.life = 1_000.0;
        blob.advance(100.0, 63, 49, 0.0);
        assert!((blob.life - 900.0).abs() < 0.5);
    }

    #[test]
    fn envelope_is_zero_at_both_ends_and_full_mid_life() {
        let mut blob = spawn_fixed(SpawnMode::Recycled);
        blob.max_life = 10_000.0;

        blob.life = 10_000.0;
        assert!(blob.envelope() < 1e-6);

        blob.life = 5_000.0;
        assert!((blob.envelope() - 1.0).abs() < 1e-6);

        blob.life = 0.0;
        assert!(blob.envelope() < 1e-6);
    }

    #[test]
    fn drift_modulation_stays_positive() {
        let mut t = 0.0f64;
        while t < 600_000.0 {
            assert!(drift_modulation(t) > 0.0);
            t += 97.0;
        }
    }

    #[test]
    fn population_scales_with_viewport_width() {
        assert_eq!(population_for(320.0), 2);
        assert_eq!(population_for(519.0), 2);
        assert_eq!(population_for(520.0), 3);
        assert_eq!(population_for(899.0), 3);
        assert_eq!(population_for(1_000.0), 4);
        assert_eq!(population_for(1_920.0), 5);
    }
}
