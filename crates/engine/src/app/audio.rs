use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    Jump,
    Strike,
    Hurt,
    HealCast,
    SoulPickup,
    MenuSelect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Menu,
    Gameplay,
    Death,
}

/// Fire-and-forget audio interface. The core emits discrete trigger events
/// and a track selection per game state; playback lives behind this trait.
pub trait AudioSink {
    fn play(&mut self, event: AudioEvent);
    fn set_track(&mut self, track: MusicTrack);
}

/// Default sink: logs triggers instead of playing them.
#[derive(Debug, Default)]
pub struct LogAudioSink {
    current_track: Option<MusicTrack>,
}

impl AudioSink for LogAudioSink {
    fn play(&mut self, event: AudioEvent) {
        debug!(event = ?event, "audio_trigger");
    }

    fn set_track(&mut self, track: MusicTrack) {
        if self.current_track == Some(track) {
            return;
        }
        self.current_track = Some(track);
        debug!(track = ?track, "music_track");
    }
}
