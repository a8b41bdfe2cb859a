use ratatui::style::Color;

use crate::cli::{Cli, ColorArg, ThemeArg};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCapability {
    TrueColor,
    Xterm256,
    Basic16,
}

/// Palette for one run: background gradient endpoints, the glyph shading
/// range handed to the atlas, and chrome text.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub top: Color,
    pub bottom: Color,
    pub glyph_dim: Color,
    pub glyph_bright: Color,
    pub text: Color,
}

pub fn detect_color_capability() -> ColorCapability {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorCapability::Basic16;
    }

    let colorterm = std::env::var("COLORTERM")
        .unwrap_or_default()
        .to_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorCapability::TrueColor;
    }

    let term = std::env::var("TERM").unwrap_or_default().to_lowercase();
    if term.contains("256color") {
        ColorCapability::Xterm256
    } else {
        ColorCapability::Basic16
    }
}

pub fn theme_for(cli: &Cli, capability: ColorCapability) -> Theme {
    if cli.effective_color_mode() == ColorArg::Never {
        return monochrome();
    }
    if capability == ColorCapability::Basic16 && cli.effective_color_mode() != ColorArg::Always {
        return monochrome();
    }

    let (top, bottom, dim, bright) = match cli.theme {
        ThemeArg::Nebula => ((9, 14, 32), (22, 32, 58), (82, 98, 140), (214, 226, 255)),
        ThemeArg::Ember => ((24, 10, 8), (48, 22, 14), (132, 70, 44), (255, 196, 130)),
        ThemeArg::Glacier => ((8, 22, 28), (16, 44, 54), (64, 118, 132), (206, 244, 252)),
        ThemeArg::Mono => return monochrome(),
    };

    Theme {
        top: rgb(top),
        bottom: rgb(bottom),
        glyph_dim: rgb(dim),
        glyph_bright: rgb(bright),
        text: Color::Gray,
    }
}

fn monochrome() -> Theme {
    Theme {
        top: Color::Reset,
        bottom: Color::Reset,
        glyph_dim: Color::DarkGray,
        glyph_bright: Color::White,
        text: Color::Gray,
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// Linear blend from `a` to `b`; non-RGB inputs degrade through
/// `color_to_rgb`'s named-gray mapping.
#[must_use]
pub fn mix(a: Color, b: Color, t: f32) -> Color {
    let a = color_to_rgb(a);
    let b = color_to_rgb(b);
    let t = t.clamp(0.0, 1.0);
    Color::Rgb(
        lerp_channel(a.0, b.0, t),
        lerp_channel(a.1, b.1, t),
        lerp_channel(a.2, b.2, t),
    )
}

fn lerp_channel(a: f32, b: f32, t: f32) -> u8 {
    (a + (b - a) * t).clamp(0.0, 255.0) as u8
}

fn color_to_rgb(c: Color) -> (f32, f32, f32) {
    match c {
        Color::Rgb(r, g, b) => (f32::from(r), f32::from(g), f32::from(b)),
        Color::Black | Color::Reset => (0., 0., 0.),
        Color::DarkGray => (85., 85., 85.),
        Color::Gray => (170., 170., 170.),
        Color::White => (255., 255., 255.),
        _ => (0., 0., 0.),
    }
}
