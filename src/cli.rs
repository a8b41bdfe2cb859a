use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum ThemeArg {
    #[default]
    Nebula,
    Ember,
    Glacier,
    Mono,
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "terminal-drift",
    version,
    about = "Drifting ASCII cloud screensaver for the terminal"
)]
pub struct Cli {
    /// Simulation tick rate (15..60); compositing stays throttled separately
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u8).range(15..=60))]
    pub fps: u8,

    /// Seed the random source for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Palette
    #[arg(long, value_enum, default_value_t = ThemeArg::Nebula)]
    pub theme: ThemeArg,

    /// Color output policy
    #[arg(long, value_enum, default_value_t = ColorArg::Auto, conflicts_with = "no_color")]
    pub color: ColorArg,

    /// Alias for --color never
    #[arg(long, conflicts_with = "color")]
    pub no_color: bool,

    /// Quit automatically after this many seconds
    #[arg(long)]
    pub exit_after: Option<u64>,
}

impl Cli {
    #[must_use]
    pub fn effective_color_mode(&self) -> ColorArg {
        if self.no_color {
            ColorArg::Never
        } else {
            self.color
        }
    }
}
