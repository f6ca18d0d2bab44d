use std::path::Path;
use std::sync::Arc;

use image::ImageReader;
use pixels::{Error, Pixels, SurfaceTexture};
use thiserror::Error as ThisError;
use tracing::warn;
use winit::window::Window;

use crate::app::frame::{
    FrameComposition, SpriteDraw, FADE_LEVEL_MAX, GRID_COLS, GRID_ROWS, LOGICAL_HEIGHT,
    LOGICAL_WIDTH, TILE_SIZE_PX,
};

use super::{integer_placement, Viewport};

const BACKDROP_COLOR: [u8; 4] = [12, 12, 20, 255];
const LETTERBOX_COLOR: [u8; 4] = [0, 0, 0, 255];
const SPRITE_PALETTE_COLORS: [[u8; 4]; 4] = [
    [228, 228, 236, 255],
    [120, 200, 248, 255],
    [248, 120, 88, 255],
    [252, 224, 112, 255],
];
const ATLAS_SIDE_PX: u32 = 128;
const ATLAS_TILES_PER_ROW: u32 = ATLAS_SIDE_PX / TILE_SIZE_PX;
const SPRITE_ALPHA_CUTOFF: u8 = 128;

const LOGICAL_BYTES: usize = (LOGICAL_WIDTH * LOGICAL_HEIGHT * 4) as usize;

#[derive(Debug, ThisError)]
pub(crate) enum AtlasLoadError {
    #[error("failed to open atlas image: {0}")]
    Open(#[source] std::io::Error),
    #[error("failed to decode atlas image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("atlas must be {expected}x{expected} pixels, got {width}x{height}")]
    Dimensions {
        expected: u32,
        width: u32,
        height: u32,
    },
}

/// 16x16 bank of 8x8 tiles decoded from a PNG; tile index = row * 16 + col.
struct TileAtlas {
    rgba: Vec<u8>,
}

impl TileAtlas {
    fn load(path: &Path) -> Result<Self, AtlasLoadError> {
        let image = ImageReader::open(path)
            .map_err(AtlasLoadError::Open)?
            .decode()
            .map_err(AtlasLoadError::Decode)?
            .to_rgba8();
        if image.width() != ATLAS_SIDE_PX || image.height() != ATLAS_SIDE_PX {
            return Err(AtlasLoadError::Dimensions {
                expected: ATLAS_SIDE_PX,
                width: image.width(),
                height: image.height(),
            });
        }
        Ok(Self {
            rgba: image.into_raw(),
        })
    }

    fn texel(&self, tile: u8, tx: u32, ty: u32) -> [u8; 4] {
        let tile_col = tile as u32 % ATLAS_TILES_PER_ROW;
        let tile_row = tile as u32 / ATLAS_TILES_PER_ROW;
        let px = tile_col * TILE_SIZE_PX + tx;
        let py = tile_row * TILE_SIZE_PX + ty;
        let offset = ((py * ATLAS_SIDE_PX + px) * 4) as usize;
        [
            self.rgba[offset],
            self.rgba[offset + 1],
            self.rgba[offset + 2],
            self.rgba[offset + 3],
        ]
    }
}

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    atlas: Option<TileAtlas>,
    logical: Vec<u8>,
}

impl Renderer {
    pub fn new(window: Arc<Window>, atlas_path: Option<&Path>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        let atlas = atlas_path.and_then(|path| match TileAtlas::load(path) {
            Ok(atlas) => Some(atlas),
            Err(error) => {
                warn!(path = %path.display(), error = %error, "atlas_load_failed");
                None
            }
        });
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
            atlas,
            logical: vec![0; LOGICAL_BYTES],
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub fn present(&mut self, frame_plan: &FrameComposition) -> Result<(), Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(());
        }
        rasterize(frame_plan, self.atlas.as_ref(), &mut self.logical);
        let out = self.pixels.frame_mut();
        for chunk in out.chunks_exact_mut(4) {
            chunk.copy_from_slice(&LETTERBOX_COLOR);
        }
        if let Some(placement) = integer_placement(self.viewport) {
            blit_scaled(&self.logical, out, self.viewport, placement);
        }
        self.pixels.render()
    }
}

/// Draw one frame plan into the 256x240 logical buffer.
fn rasterize(frame_plan: &FrameComposition, atlas: Option<&TileAtlas>, out: &mut [u8]) {
    for chunk in out.chunks_exact_mut(4) {
        chunk.copy_from_slice(&BACKDROP_COLOR);
    }

    for row in 0..GRID_ROWS {
        for col in 0..GRID_COLS {
            let Some(tile) = frame_plan.background.tile_at(col, row) else {
                continue;
            };
            draw_background_tile(
                out,
                atlas,
                tile,
                (col * TILE_SIZE_PX) as i32,
                (row * TILE_SIZE_PX) as i32,
            );
        }
    }

    // Behind-priority sprites sit under front sprites, never under tiles;
    // true background masking is not modeled.
    for sprite in frame_plan.sprites_used().iter().filter(|s| s.attr.behind) {
        draw_sprite(out, atlas, sprite);
    }
    for sprite in frame_plan.sprites_used().iter().filter(|s| !s.attr.behind) {
        draw_sprite(out, atlas, sprite);
    }

    apply_fade(out, frame_plan.fade.level());
    if frame_plan.flash {
        apply_flash(out);
    }
}

fn draw_background_tile(out: &mut [u8], atlas: Option<&TileAtlas>, tile: u8, x: i32, y: i32) {
    match atlas {
        Some(atlas) => {
            for ty in 0..TILE_SIZE_PX {
                for tx in 0..TILE_SIZE_PX {
                    let texel = atlas.texel(tile, tx, ty);
                    put_pixel(out, x + tx as i32, y + ty as i32, texel);
                }
            }
        }
        None => {
            if tile == 0 {
                return;
            }
            let color = fallback_tile_rgba(tile);
            for ty in 0..TILE_SIZE_PX {
                for tx in 0..TILE_SIZE_PX {
                    put_pixel(out, x + tx as i32, y + ty as i32, color);
                }
            }
        }
    }
}

fn draw_sprite(out: &mut [u8], atlas: Option<&TileAtlas>, sprite: &SpriteDraw) {
    match atlas {
        Some(atlas) => {
            for ty in 0..TILE_SIZE_PX {
                for tx in 0..TILE_SIZE_PX {
                    let source_x = if sprite.attr.flip_h {
                        TILE_SIZE_PX - 1 - tx
                    } else {
                        tx
                    };
                    let texel = atlas.texel(sprite.tile, source_x, ty);
                    if texel[3] < SPRITE_ALPHA_CUTOFF {
                        continue;
                    }
                    put_pixel(
                        out,
                        sprite.x as i32 + tx as i32,
                        sprite.y as i32 + ty as i32,
                        texel,
                    );
                }
            }
        }
        None => {
            let color = SPRITE_PALETTE_COLORS[(sprite.attr.palette & 3) as usize];
            for ty in 0..TILE_SIZE_PX {
                for tx in 0..TILE_SIZE_PX {
                    put_pixel(
                        out,
                        sprite.x as i32 + tx as i32,
                        sprite.y as i32 + ty as i32,
                        color,
                    );
                }
            }
        }
    }
}

fn put_pixel(out: &mut [u8], x: i32, y: i32, rgba: [u8; 4]) {
    if x < 0 || y < 0 || x >= LOGICAL_WIDTH as i32 || y >= LOGICAL_HEIGHT as i32 {
        return;
    }
    let offset = ((y as u32 * LOGICAL_WIDTH + x as u32) * 4) as usize;
    out[offset..offset + 4].copy_from_slice(&rgba);
}

/// Deterministic per-index color used when no atlas is available.
fn fallback_tile_rgba(tile: u8) -> [u8; 4] {
    let t = tile as u32;
    [
        (40 + (t * 37) % 160) as u8,
        (40 + (t * 59) % 160) as u8,
        (56 + (t * 83) % 160) as u8,
        255,
    ]
}

fn apply_fade(out: &mut [u8], level: u8) {
    if level >= FADE_LEVEL_MAX {
        return;
    }
    let level = level as u16;
    for chunk in out.chunks_exact_mut(4) {
        for channel in chunk.iter_mut().take(3) {
            *channel = ((*channel as u16 * level) / FADE_LEVEL_MAX as u16) as u8;
        }
    }
}

fn apply_flash(out: &mut [u8]) {
    for chunk in out.chunks_exact_mut(4) {
        for channel in chunk.iter_mut().take(3) {
            *channel = (*channel / 2).saturating_add(128);
        }
    }
}

fn blit_scaled(logical: &[u8], out: &mut [u8], viewport: Viewport, placement: super::ScalePlacement) {
    let scale = placement.scale;
    for ly in 0..LOGICAL_HEIGHT {
        for lx in 0..LOGICAL_WIDTH {
            let source = ((ly * LOGICAL_WIDTH + lx) * 4) as usize;
            let rgba = &logical[source..source + 4];
            for sy in 0..scale {
                let oy = placement.offset_y + ly * scale + sy;
                let row_base = (oy * viewport.width + placement.offset_x + lx * scale) as usize * 4;
                for sx in 0..scale {
                    let offset = row_base + (sx * 4) as usize;
                    out[offset..offset + 4].copy_from_slice(rgba);
                }
            }
        }
    }
}
