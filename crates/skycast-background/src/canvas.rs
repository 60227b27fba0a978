//! Paints a recorded frame into a ratatui buffer.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        Widget,
        canvas::{Canvas, Context, Line as CanvasLine},
    },
};
use skycast_core::Viewport;

use crate::surface::{DrawCommand, DrawList};

/// Widget drawing a [`DrawList`] over the theme backdrop.
///
/// The draw list uses device pixels with y growing downwards; the canvas is
/// bounded to the viewport the list was recorded for and scales it to the
/// widget area. Full-surface fills tint the background instead of being
/// rasterized, which is how the lightning flash shows up in a terminal.
#[derive(Debug, Clone, Copy)]
pub struct BackgroundCanvas<'a> {
    list: &'a DrawList,
    viewport: Viewport,
    backdrop: Color,
}

impl<'a> BackgroundCanvas<'a> {
    pub fn new(list: &'a DrawList, viewport: Viewport, backdrop: Color) -> Self {
        Self {
            list,
            viewport,
            backdrop,
        }
    }

    /// Backdrop after every recorded full-surface fill has been composited.
    pub fn background(&self) -> Color {
        self.list
            .commands()
            .iter()
            .fold(self.backdrop, |base, command| match command {
                DrawCommand::Rect { color, .. } => color.over(base),
                _ => base,
            })
    }
}

impl Widget for BackgroundCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let background = self.background();
        let height = self.viewport.height;
        let list = self.list;

        Canvas::default()
            .marker(Marker::Braille)
            .background_color(background)
            .x_bounds([0.0, self.viewport.width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                for command in list.commands() {
                    paint_command(ctx, command, height, background);
                }
            })
            .render(area, buf);
    }
}

fn paint_command(ctx: &mut Context<'_>, command: &DrawCommand, height: f64, background: Color) {
    // Canvas y grows upwards.
    let flip = |(x, y): (f64, f64)| (x, height - y);

    match command {
        DrawCommand::Circle {
            x,
            y,
            radius,
            color,
        } => {
            let color = color.over(background);
            let (cx, cy) = flip((*x, *y));
            let mut dy = -radius;
            while dy <= *radius {
                let half = (radius * radius - dy * dy).max(0.0).sqrt();
                ctx.draw(&CanvasLine::new(cx - half, cy + dy, cx + half, cy + dy, color));
                dy += 1.0;
            }
        }
        DrawCommand::Line { from, to, stroke } => {
            let (x1, y1) = flip(*from);
            let (x2, y2) = flip(*to);
            ctx.draw(&CanvasLine::new(x1, y1, x2, y2, stroke.color.over(background)));
        }
        DrawCommand::Polyline { points, stroke } => {
            let color = stroke.color.over(background);
            for pair in points.windows(2) {
                let (x1, y1) = flip(pair[0]);
                let (x2, y2) = flip(pair[1]);
                ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color));
            }
        }
        DrawCommand::Rect { .. } => {}
    }
}
