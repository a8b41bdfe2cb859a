use std::time::Instant;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEventKind};
use tokio::sync::mpsc;

use crate::{
    app::events::{AppEvent, start_frame_task},
    cli::Cli,
    render::{
        CELL_SIZE,
        rng::{RandomSource, SeededSource, ThreadSource},
        saver::Screensaver,
    },
    ui::theme::{self, Theme},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Running,
    Quit,
}

/// Everything the event loop owns: the screensaver instance, the palette,
/// and the monotonic clock origin all frame times are measured against.
#[derive(Debug)]
pub struct AppState {
    pub mode: AppMode,
    pub running: bool,
    pub theme: Theme,
    pub saver: Screensaver,
    started_at: Instant,
    draw_due: bool,
    exit_deadline_ms: Option<f64>,
}

impl AppState {
    #[must_use]
    pub fn new(cli: &Cli, terminal_cols: u16, terminal_rows: u16) -> Self {
        let theme = theme::theme_for(cli, theme::detect_color_capability());
        let rng: Box<dyn RandomSource> = match cli.seed {
            Some(seed) => Box::new(SeededSource::from_seed(seed)),
            None => Box::new(ThreadSource::new()),
        };
        let saver = Screensaver::new(
            viewport_px(terminal_cols),
            viewport_px(terminal_rows),
            1.0,
            theme.glyph_dim,
            theme.glyph_bright,
            rng,
            0.0,
        );

        Self {
            mode: AppMode::Running,
            running: true,
            theme,
            saver,
            started_at: Instant::now(),
            draw_due: true,
            exit_deadline_ms: cli.exit_after.map(|secs| secs as f64 * 1_000.0),
        }
    }

    /// Milliseconds since startup; the wall clock every subsystem shares.
    #[must_use]
    pub fn now_ms(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64() * 1_000.0
    }

    /// True at most once per due frame; drawing is skipped otherwise.
    pub fn take_draw_due(&mut self) -> bool {
        std::mem::take(&mut self.draw_due)
    }

    pub async fn handle_event(
        &mut self,
        event: AppEvent,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        match event {
            AppEvent::Bootstrap => {
                start_frame_task(tx.clone(), cli.fps);
            }
            AppEvent::TickFrame => {
                let now = self.now_ms();
                if self.saver.tick(now) {
                    self.draw_due = true;
                }
                if let Some(deadline) = self.exit_deadline_ms
                    && now >= deadline
                {
                    self.mode = AppMode::Quit;
                }
            }
            AppEvent::Input(event) => self.handle_input(event, tx).await?,
            AppEvent::Quit => {
                self.mode = AppMode::Quit;
            }
        }

        Ok(())
    }

    async fn handle_input(&mut self, event: Event, tx: &mpsc::Sender<AppEvent>) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => {
                    tx.send(AppEvent::Quit).await?;
                }
                KeyCode::Char('r') => {
                    self.saver.restart(self.now_ms());
                    self.draw_due = true;
                }
                _ => {}
            },
            Event::Resize(cols, rows) => {
                self.saver
                    .notify_resize(viewport_px(cols), viewport_px(rows), self.now_ms());
            }
            _ => {}
        }

        Ok(())
    }
}

/// One lattice cell maps onto one terminal cell, so a terminal dimension in
/// cells becomes a virtual viewport dimension in pixels.
fn viewport_px(cells: u16) -> f32 {
    f32::from(cells) * CELL_SIZE
}
