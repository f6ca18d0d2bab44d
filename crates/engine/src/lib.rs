pub mod app;

pub use app::{
    run_app, AppError, AudioEvent, AudioSink, BackgroundGrid, BackgroundGridError, Cartridge,
    FadeLevel, FrameComposition, InputSnapshot, LogAudioSink, LoopConfig, MusicTrack, PadButton,
    Renderer, SpriteAttr, SpriteDraw, TickCommand, ATLAS_ENV_VAR, GRID_COLS, GRID_ROWS,
    LOGICAL_HEIGHT, LOGICAL_WIDTH, SPRITE_SLOTS, TILE_SIZE_PX,
};
