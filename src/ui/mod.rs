pub mod theme;

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    app::state::AppState,
    ui::theme::{Theme, mix},
};

const MIN_WIDTH: u16 = 20;
const MIN_HEIGHT: u16 = 8;

/// Paints the gradient backdrop and composites the screensaver over it.
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let warning = Paragraph::new(format!(
            "Terminal too small. Resize to at least {MIN_WIDTH}x{MIN_HEIGHT}."
        ))
        .block(Block::default().borders(Borders::ALL).title("terminal-drift"));
        frame.render_widget(warning, area);
        return;
    }

    let theme = state.theme;
    let now_ms = state.now_ms();
    let buf = frame.buffer_mut();
    paint_gradient(area, buf, &theme);
    state.saver.render(buf, area, now_ms);
}

fn paint_gradient(area: Rect, buf: &mut Buffer, theme: &Theme) {
    // Monochrome runs keep the terminal's own background.
    if matches!((theme.top, theme.bottom), (Color::Reset, Color::Reset)) {
        return;
    }
    for y in area.top()..area.bottom() {
        let t = gradient_ratio(area, y);
        let color = mix(theme.top, theme.bottom, t);
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(' ').set_bg(color);
            }
        }
    }
}

fn gradient_ratio(area: Rect, y: u16) -> f32 {
    if area.height <= 1 {
        0.0
    } else {
        f32::from(y - area.top()) / f32::from(area.height - 1)
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::Color;

    use super::*;

    #[test]
    fn gradient_ratio_spans_zero_to_one() {
        let area = Rect::new(0, 0, 40, 10);
        assert!((gradient_ratio(area, 0) - 0.0).abs() < f32::EPSILON);
        assert!((gradient_ratio(area, 9) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn gradient_ratio_degenerate_height() {
        let area = Rect::new(0, 0, 40, 1);
        assert!((gradient_ratio(area, 0) - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn paint_gradient_fills_every_cell() {
        let area = Rect::new(0, 0, 8, 4);
        let mut buf = Buffer::empty(area);
        let theme = Theme {
            top: Color::Rgb(10, 10, 10),
            bottom: Color::Rgb(40, 40, 40),
            glyph_dim: Color::DarkGray,
            glyph_bright: Color::White,
            text: Color::Gray,
        };
        paint_gradient(area, &mut buf, &theme);
        for y in 0..4 {
            for x in 0..8 {
                assert!(matches!(buf[(x, y)].bg, Color::Rgb(..)));
            }
        }
        assert_ne!(buf[(0, 0)].bg, buf[(0, 3)].bg);
    }
}
