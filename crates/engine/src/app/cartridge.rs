use super::audio::AudioSink;
use super::frame::FrameComposition;
use super::input::InputSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickCommand {
    Continue,
    Quit,
}

/// The game the loop runner drives. One `update` per fixed tick; `compose`
/// resolves the frame the renderer presents; `drain_audio` flushes the tick's
/// fire-and-forget triggers.
pub trait Cartridge {
    fn reset(&mut self);
    fn update(&mut self, input: &InputSnapshot) -> TickCommand;
    fn compose(&mut self, frame: &mut FrameComposition);
    fn drain_audio(&mut self, sink: &mut dyn AudioSink);
}
