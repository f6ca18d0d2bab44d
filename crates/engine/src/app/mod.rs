mod audio;
mod cartridge;
mod frame;
mod input;
mod loop_runner;
mod metrics;
mod rendering;

pub use audio::{AudioEvent, AudioSink, LogAudioSink, MusicTrack};
pub use cartridge::{Cartridge, TickCommand};
pub use frame::{
    BackgroundGrid, BackgroundGridError, FadeLevel, FrameComposition, SpriteAttr, SpriteDraw,
    GRID_COLS, GRID_ROWS, LOGICAL_HEIGHT, LOGICAL_WIDTH, SPRITE_SLOTS, TILE_SIZE_PX,
};
pub use input::{InputSnapshot, PadButton};
pub use loop_runner::{run_app, AppError, LoopConfig, ATLAS_ENV_VAR};
pub use rendering::Renderer;
