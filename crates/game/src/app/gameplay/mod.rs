use std::collections::{HashMap, HashSet};

use engine::{
    AudioEvent, AudioSink, BackgroundGrid, Cartridge, FadeLevel, FrameComposition, InputSnapshot,
    MusicTrack, PadButton, SpriteAttr, SpriteDraw, TickCommand, GRID_COLS, GRID_ROWS,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

// Playfield geometry. Rooms are one screen of 8x8 tiles; rows at and below
// PLAYFIELD_BOTTOM are outside the walkable area.
const TILE_SIZE: i32 = 8;
const ROOM_COLS: u32 = GRID_COLS;
const ROOM_ROWS: u32 = GRID_ROWS;
const ROOM_TILE_COUNT: usize = (ROOM_COLS * ROOM_ROWS) as usize;
const ROOM_PIXEL_WIDTH: i32 = ROOM_COLS as i32 * TILE_SIZE;
const PLAYFIELD_BOTTOM: i32 = 224;

// Fixed-point motion: velocities are signed subpixel units per frame,
// sixteen subpixels to the pixel.
const SUBPIXEL_UNIT: i16 = 16;
const WALK_MAX_SPEED: i16 = 24;
const WALK_ACCEL: i16 = 3;
const WALK_DECEL: i16 = 4;
const JUMP_IMPULSE: i16 = -52;
const GRAVITY_HELD: i16 = 2;
const GRAVITY_FALL: i16 = 5;
const FALL_MAX_SPEED: i16 = 64;

// Collision hitbox insets into the 16x16 player sprite. The side probes use
// row 15 so a grounded player does not read the floor as a wall; the foot
// probe sits one pixel below the sprite so standing contact holds.
const PLAYER_SPRITE_SIZE: i32 = 16;
const HITBOX_LEFT_INSET: i32 = 6;
const HITBOX_RIGHT_INSET: i32 = 10;
const HITBOX_TOP_INSET: i32 = 4;
const HITBOX_SIDE_BOTTOM: i32 = 15;
const HITBOX_FOOT: i32 = 16;

// Frame timers. Landing cooldown gates re-jump; damage cooldown gates repeat
// damage. They overlap in feel but never share a counter.
const STATE_DWELL_MIN: u8 = 5;
const JUMP_COOLDOWN_FRAMES: u8 = 10;
const DAMAGE_COOLDOWN_FRAMES: u8 = 60;
const DAMAGE_FLASH_FRAMES: u8 = 6;
const STRIKE_COOLDOWN_FRAMES: u8 = 14;
const STUN_FRAMES: u8 = 20;
const ATTACK_DURATION_FRAMES: u8 = 12;
const ATTACK_TRIGGER_FRAME: u8 = 4;
const ATTACK_COOLDOWN_FRAMES: u8 = 16;
const HEAL_DURATION_FRAMES: u8 = 40;
const DEATH_DURATION_FRAMES: u8 = 90;
const SOUL_EFFECT_FRAMES: u8 = 24;

// Resources.
const MAX_LIVES: u8 = 5;
const MAX_SOUL: u8 = 99;
const SOUL_PER_STRIKE: u8 = 11;
const HEAL_SOUL_COST: u8 = 33;
const STRIKE_DAMAGE: u8 = 1;
const ENEMY_MAX_HP: u8 = 2;
const ENEMY_WALK_SPEED: i16 = 8;
const ENEMY_SPRITE_SIZE: i32 = 16;

// Screen transitions.
const EDGE_MARGIN: i32 = 2;
const ENTRY_INSET: i32 = 8;
const FADE_STEP_FRAMES: u8 = 4;
const SEAM_KICK_VELOCITY: i16 = -40;

// Sprite bank layout: metasprites are 2x2 tiles at base, base+1, base+16,
// base+17. Text tiles are ASCII-aligned.
const PLAYER_IDLE_BASES: [u8; 2] = [0xD0, 0xD2];
const PLAYER_RUN_BASES: [u8; 4] = [0xD4, 0xD6, 0xD8, 0xD6];
const PLAYER_JUMP_BASES: [u8; 1] = [0xDA];
const PLAYER_FALL_BASES: [u8; 1] = [0xDC];
const PLAYER_ATTACK_BASES: [u8; 1] = [0xDE];
const PLAYER_SIT_BASES: [u8; 1] = [0xB0];
const PLAYER_HEAL_BASES: [u8; 2] = [0xB2, 0xB2];
const PLAYER_DEATH_BASES: [u8; 2] = [0xB6, 0xB8];
const ANIM_DELAY_IDLE: u8 = 32;
const ANIM_DELAY_RUN: u8 = 5;
const ANIM_DELAY_SINGLE: u8 = 16;
const ANIM_DELAY_DEATH: u8 = 12;
const ENEMY_FRAME_BASES: [u8; 2] = [0xC0, 0xC2];
const ENEMY_ANIM_DELAY: u8 = 8;
const SLASH_TILE_FORWARD: u8 = 0xA9;
const SLASH_TILE_UP: u8 = 0xAA;
const SLASH_TILE_DOWN: u8 = 0xAB;
const SOUL_EFFECT_TILE: u8 = 0xA8;
const HUD_LIFE_TILE: u8 = 0x68;
const HUD_SOUL_TILES: [u8; 4] = [0x6A, 0x6B, 0x6C, 0x6D];
const PLAYER_PALETTE: u8 = 0;
const ENEMY_PALETTE: u8 = 2;
const EFFECT_PALETTE: u8 = 1;
const HUD_PALETTE: u8 = 3;

include!("motion.rs");
include!("types.rs");
include!("tiles.rs");
include!("resolve.rs");
include!("player.rs");
include!("combat.rs");
include!("rooms.rs");
include!("hud.rs");
include!("content.rs");
include!("world.rs");
include!("scene_impl.rs");

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
