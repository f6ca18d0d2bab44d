/// Writes ASCII text into a background row; the font bank is ASCII-aligned,
/// so the tile index is the byte value. Unmappable bytes become spaces.
fn write_text_row(frame: &mut FrameComposition, row: u32, col: u32, text: &str) {
    for (offset, byte) in text.bytes().enumerate() {
        let tile = if (0x20..0x60).contains(&byte) {
            byte
        } else if byte.is_ascii_lowercase() {
            byte - 0x20
        } else {
            0x20
        };
        frame.background.set_tile(col + offset as u32, row, tile);
    }
}

fn soul_meter_tile(soul: u8) -> u8 {
    let quartile = (soul as u32 * (HUD_SOUL_TILES.len() as u32 - 1)) / MAX_SOUL as u32;
    HUD_SOUL_TILES[quartile as usize]
}

/// HUD overlay: one mask glyph per remaining life plus the soul meter,
/// recomposed from live counters every frame.
fn compose_hud(frame: &mut FrameComposition, lives: u8, soul: u8) {
    for index in 0..lives {
        frame.push_sprite(SpriteDraw {
            x: 8 + index as i16 * 10,
            y: 8,
            tile: HUD_LIFE_TILE,
            attr: SpriteAttr {
                palette: HUD_PALETTE,
                ..SpriteAttr::default()
            },
        });
    }
    frame.push_sprite(SpriteDraw {
        x: 8,
        y: 18,
        tile: soul_meter_tile(soul),
        attr: SpriteAttr {
            palette: HUD_PALETTE,
            ..SpriteAttr::default()
        },
    });
}

/// 2x2 metasprite helper: base, base+1 on the top row and base+16, base+17 on
/// the bottom row, with columns swapped when flipped.
fn push_metasprite(frame: &mut FrameComposition, x: i32, y: i32, base: u8, flip_h: bool, palette: u8) {
    let tiles = [base, base.wrapping_add(1), base.wrapping_add(16), base.wrapping_add(17)];
    let offsets: [(i16, i16); 4] = if flip_h {
        [(8, 0), (0, 0), (8, 8), (0, 8)]
    } else {
        [(0, 0), (8, 0), (0, 8), (8, 8)]
    };
    for (tile, (dx, dy)) in tiles.iter().zip(offsets.iter()) {
        frame.push_sprite(SpriteDraw {
            x: x as i16 + dx,
            y: y as i16 + dy,
            tile: *tile,
            attr: SpriteAttr {
                flip_h,
                palette,
                behind: false,
            },
        });
    }
}
