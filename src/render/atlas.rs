use ratatui::style::Color;

use super::rng::RandomSource;
use crate::ui::theme::mix;

// Fraction of the ramp (from the top) that gets the bloom treatment.
const BLOOM_THRESHOLD: f32 = 0.78;

// Chance that the whole ramp mapping shifts up by one glyph.
const INDEX_BIAS_CHANCE: f32 = 0.35;

/// One prerendered shading level: the glyph plus the styling the compositor
/// applies when it lands in a terminal cell. The original rasterized each
/// level into a bitmap; a terminal cell only needs symbol and color, with
/// opacity blended in at draw time.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphEntry {
    pub symbol: char,
    pub color: Color,
    /// Brightest levels render bold so they visually bloom.
    pub bloom: bool,
}

/// Styled glyphs for every shading level, built once per layout pass.
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    /// Device pixel ratio the atlas was built for; a layout at a different
    /// scale must rebuild.
    pub scale: f32,
    entries: Vec<Option<GlyphEntry>>,
}

impl GlyphAtlas {
    /// Builds entries for each ramp level, shading from `dim` to `bright`.
    ///
    /// A small index bias, drawn once per build, can shift which literal
    /// character maps to which level. Whitespace glyphs become `None`
    /// entries: nothing to draw, and the compositor skips them outright.
    #[must_use]
    pub fn build(
        scale: f32,
        ramp: &[char],
        dim: Color,
        bright: Color,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let bias = usize::from(rng.next_f32() < INDEX_BIAS_CHANCE);
        let top = ramp.len().saturating_sub(1).max(1);

        let entries = (0..ramp.len())
            .map(|level| {
                let symbol = ramp[(level + if level > 0 { bias } else { 0 }).min(top)];
                if symbol.is_whitespace() {
                    return None;
                }
                let t = level as f32 / top as f32;
                Some(GlyphEntry {
                    symbol,
                    color: mix(dim, bright, t),
                    bloom: t > BLOOM_THRESHOLD,
                })
            })
            .collect();

        Self { scale, entries }
    }

    /// Entry for a shading level; `None` for blank or degraded levels.
    #[must_use]
    pub fn entry(&self, level: usize) -> Option<&GlyphEntry> {
        self.entries.get(level).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn levels(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RAMP;
    use crate::render::rng::SequenceSource;

    fn build_unbiased() -> GlyphAtlas {
        let mut rng = SequenceSource::constant(0.9);
        GlyphAtlas::build(
            1.0,
            &RAMP,
            Color::Rgb(60, 70, 90),
            Color::Rgb(230, 240, 255),
            &mut rng,
        )
    }

    #[test]
    fn blank_level_has_no_entry() {
        let atlas = build_unbiased();
        assert!(atlas.entry(0).is_none());
    }

    #[test]
    fn every_other_level_is_drawable() {
        let atlas = build_unbiased();
        assert_eq!(atlas.levels(), RAMP.len());
        for level in 1..atlas.levels() {
            let entry = atlas.entry(level).expect("non-blank level");
            assert!(!entry.symbol.is_whitespace());
        }
    }

    #[test]
    fn out_of_range_level_is_none() {
        let atlas = build_unbiased();
        assert!(atlas.entry(RAMP.len()).is_none());
        assert!(atlas.entry(usize::MAX).is_none());
    }

    #[test]
    fn index_bias_shifts_glyphs_but_keeps_blank() {
        let mut rng = SequenceSource::constant(0.0);
        let biased = GlyphAtlas::build(1.0, &RAMP, Color::Black, Color::White, &mut rng);
        assert!(biased.entry(0).is_none());
        assert_eq!(biased.entry(1).unwrap().symbol, RAMP[2]);
        // Top level clamps instead of running off the ramp.
        assert_eq!(
            biased.entry(RAMP.len() - 1).unwrap().symbol,
            RAMP[RAMP.len() - 1]
        );
    }

    #[test]
    fn only_the_brightest_levels_bloom() {
        let atlas = build_unbiased();
        assert!(!atlas.entry(1).unwrap().bloom);
        assert!(atlas.entry(RAMP.len() - 1).unwrap().bloom);
    }
}
