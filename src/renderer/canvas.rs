//! Canvas 2D playback of draw commands (wasm only)

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::commands::{Color, DrawCommand};

pub struct CanvasRenderer {
    ctx: Option<CanvasRenderingContext2d>,
    /// Backing-store pixels per arena pixel
    scale: f64,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    /// Without a 2D context every draw is skipped
    pub fn new(canvas: &HtmlCanvasElement, scale: f64) -> Self {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok());
        if ctx.is_none() {
            log::warn!("No 2D canvas context - rendering disabled");
        }
        Self {
            ctx,
            scale,
            width: canvas.width() as f64 / scale,
            height: canvas.height() as f64 / scale,
        }
    }

    pub fn draw(&self, commands: &[DrawCommand]) {
        let Some(ctx) = &self.ctx else { return };
        ctx.set_transform(self.scale, 0.0, 0.0, self.scale, 0.0, 0.0)
            .ok();

        for cmd in commands {
            match cmd {
                DrawCommand::Clear(color) => {
                    ctx.set_fill_style_str(&color.css());
                    ctx.fill_rect(0.0, 0.0, self.width, self.height);
                }
                DrawCommand::Circle {
                    center,
                    radius,
                    fill,
                    stroke,
                } => {
                    ctx.begin_path();
                    if ctx
                        .arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)
                        .is_err()
                    {
                        continue;
                    }
                    ctx.set_fill_style_str(&fill.css());
                    ctx.fill();
                    if let Some((color, width)) = stroke {
                        Self::stroke(ctx, color, *width);
                        ctx.stroke();
                    }
                }
                DrawCommand::Rect { rect, fill, stroke } => {
                    let size = rect.size();
                    let (x, y, w, h) = (
                        rect.min.x as f64,
                        rect.min.y as f64,
                        size.x as f64,
                        size.y as f64,
                    );
                    ctx.set_fill_style_str(&fill.css());
                    ctx.fill_rect(x, y, w, h);
                    if let Some((color, width)) = stroke {
                        Self::stroke(ctx, color, *width);
                        ctx.stroke_rect(x, y, w, h);
                    }
                }
                DrawCommand::Text {
                    pos,
                    text,
                    size,
                    color,
                    align,
                } => {
                    ctx.set_font(&format!("bold {}px sans-serif", size));
                    ctx.set_text_align(align.css());
                    ctx.set_text_baseline("middle");
                    ctx.set_fill_style_str(&color.css());
                    ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
                }
            }
        }
    }

    fn stroke(ctx: &CanvasRenderingContext2d, color: &Color, width: f32) {
        ctx.set_stroke_style_str(&color.css());
        ctx.set_line_width(width as f64);
    }
}
