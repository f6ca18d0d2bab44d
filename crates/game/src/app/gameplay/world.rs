/// The whole mutable game state, single-writer per tick. Everything the
/// update pipeline touches hangs off this aggregate; static content stays in
/// `content` and is never mutated.
#[derive(Debug)]
struct GameWorld {
    content: GameContent,
    policy: CornerPolicy,
    mode: GameMode,
    player: Player,
    enemies: Vec<Enemy>,
    soul_effects: Vec<SoulEffect>,
    defeated: HashSet<(RoomCoord, usize)>,
    current_room: RoomCoord,
    transition: Option<RoomTransition>,
    fade: FadeLevel,
    dialogue_cursor: Option<DialogueCursor>,
    strike_cooldown: u8,
    death_timer: u8,
    frame_counter: u32,
    audio_events: Vec<AudioEvent>,
    pending_track: Option<MusicTrack>,
}

impl GameWorld {
    fn new(content: GameContent) -> Self {
        let start_room = content.start_room;
        let player = Player::spawn_at(content.start_x, content.start_y);
        let mut world = Self {
            content,
            policy: CornerPolicy::LargerVelocity,
            mode: GameMode::Menu,
            player,
            enemies: Vec::new(),
            soul_effects: Vec::new(),
            defeated: HashSet::new(),
            current_room: start_room,
            transition: None,
            fade: FadeLevel::FULL,
            dialogue_cursor: None,
            strike_cooldown: 0,
            death_timer: 0,
            frame_counter: 0,
            audio_events: Vec::new(),
            pending_track: None,
        };
        world.spawn_room_enemies();
        world
    }

    fn enter_menu(&mut self) {
        self.mode = GameMode::Menu;
        self.fade = FadeLevel::FULL;
        self.pending_track = Some(MusicTrack::Menu);
    }

    /// Fresh Playing session: full resources, pristine enemy roster, start
    /// room. Nothing from a previous session survives.
    fn reset_session(&mut self) {
        self.player = Player::spawn_at(self.content.start_x, self.content.start_y);
        self.defeated.clear();
        self.current_room = self.content.start_room;
        self.transition = None;
        self.fade = FadeLevel::FULL;
        self.dialogue_cursor = None;
        self.strike_cooldown = 0;
        self.death_timer = 0;
        self.soul_effects.clear();
        self.spawn_room_enemies();
        info!(
            room_x = self.current_room.x,
            room_y = self.current_room.y,
            "session_started"
        );
    }

    /// Rebuilds the roster from the current room's spawn table, skipping
    /// spawns already defeated this session.
    fn spawn_room_enemies(&mut self) {
        self.enemies.clear();
        let Some(room) = self.content.rooms.room(self.current_room) else {
            return;
        };
        for (spawn_index, spawn) in room.spawns.iter().enumerate() {
            if self.defeated.contains(&(self.current_room, spawn_index)) {
                continue;
            }
            self.enemies.push(Enemy::from_spawn(spawn_index, spawn));
        }
    }

    fn push_audio(&mut self, event: AudioEvent) {
        self.audio_events.push(event);
    }
}
