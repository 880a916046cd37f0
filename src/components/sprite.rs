use bevy_ecs::prelude::Component;

/// Source rectangle in sheet pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct SourceRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Renderable side of a Memao character. The host renderer draws
/// `frame` of the texture `tex_key` at (`x`, `y`) with the pivot at
/// `origin` (bottom-center of the cell), scaled by `scale`.
/// `crisp` asks for nearest-neighbour sampling and whole-pixel placement.
#[derive(Component, Clone, Debug)]
pub struct Sprite {
    pub tex_key: String,
    pub width: f32,
    pub height: f32,
    pub frame: SourceRect,
    pub origin: (f32, f32),
    pub x: f32,
    pub y: f32,
    pub z: i32,
    pub scale: f32,
    pub crisp: bool,
    pub visible: bool,
    pub opacity: u8,
}

impl Sprite {
    pub fn new(tex_key: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            tex_key: tex_key.into(),
            width,
            height,
            frame: SourceRect {
                x: 0.0,
                y: 0.0,
                width,
                height,
            },
            origin: (width * 0.5, height),
            x: 0.0,
            y: 0.0,
            z: 0,
            scale: 1.0,
            crisp: false,
            visible: true,
            opacity: 255,
        }
    }

    pub fn with_scale(mut self, scale: f32, crisp: bool) -> Self {
        self.scale = scale;
        self.crisp = crisp;
        self
    }

    /// Select the 1-based (`row`, `col`) cell of the sheet.
    pub fn set_cell(&mut self, row: u32, col: u32) {
        self.frame = SourceRect {
            x: col.saturating_sub(1) as f32 * self.width,
            y: row.saturating_sub(1) as f32 * self.height,
            width: self.width,
            height: self.height,
        };
    }
}
