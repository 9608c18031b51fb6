//! Backend-agnostic drawing commands

use glam::Vec2;

use crate::sim::Rect;

/// RGBA color, channels in 0-255 with float alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::hex(0xffffff);
    pub const BLACK: Color = Color::hex(0x000000);

    /// Opaque color from 0xRRGGBB
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: 1.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS color string for Canvas 2D
    pub fn css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub fn css(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

/// One drawing operation in canvas-local pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole arena
    Clear(Color),
    Circle {
        center: Vec2,
        radius: f32,
        fill: Color,
        /// Outline color and width
        stroke: Option<(Color, f32)>,
    },
    Rect {
        rect: Rect,
        fill: Color,
        stroke: Option<(Color, f32)>,
    },
    /// Text anchored at its baseline-middle
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Color,
        align: Align,
    },
}
