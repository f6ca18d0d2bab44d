pub(crate) struct GameplayCartridge {
    world: GameWorld,
}

impl GameplayCartridge {
    pub(crate) fn new() -> Result<Self, ContentError> {
        Ok(Self::from_content(GameContent::load_embedded()?))
    }

    fn from_content(content: GameContent) -> Self {
        Self {
            world: GameWorld::new(content),
        }
    }
}

impl Cartridge for GameplayCartridge {
    fn reset(&mut self) {
        self.world.enter_menu();
    }

    fn update(&mut self, input: &InputSnapshot) -> TickCommand {
        if input.quit_requested() {
            return TickCommand::Quit;
        }
        self.world.frame_counter = self.world.frame_counter.wrapping_add(1);
        match self.world.mode {
            GameMode::Menu => update_menu(&mut self.world, input),
            GameMode::Playing => update_playing(&mut self.world, input),
            GameMode::Dying => update_dying(&mut self.world),
            GameMode::GameOver => update_game_over(&mut self.world, input),
        }
        TickCommand::Continue
    }

    fn compose(&mut self, frame: &mut FrameComposition) {
        frame.clear_sprites();
        frame.fade = self.world.fade;
        frame.flash = false;
        match self.world.mode {
            GameMode::Menu => compose_menu(&self.world, frame),
            GameMode::Playing | GameMode::Dying => compose_playing(&self.world, frame),
            GameMode::GameOver => compose_game_over(frame),
        }
    }

    fn drain_audio(&mut self, sink: &mut dyn AudioSink) {
        for event in self.world.audio_events.drain(..) {
            sink.play(event);
        }
        if let Some(track) = self.world.pending_track.take() {
            sink.set_track(track);
        }
    }
}

fn update_menu(world: &mut GameWorld, input: &InputSnapshot) {
    if input.just_pressed(PadButton::Start) {
        world.reset_session();
        world.mode = GameMode::Playing;
        world.pending_track = Some(MusicTrack::Gameplay);
        world.push_audio(AudioEvent::MenuSelect);
    }
}

fn update_dying(world: &mut GameWorld) {
    world.player.anim.advance();
    world.death_timer = world.death_timer.saturating_sub(1);
    if world.death_timer == 0 {
        world.mode = GameMode::GameOver;
    }
}

fn update_game_over(world: &mut GameWorld, input: &InputSnapshot) {
    if input.just_pressed(PadButton::Start) {
        world.enter_menu();
        world.push_audio(AudioEvent::MenuSelect);
    }
}

/// One gameplay tick: input guards, integration, collision, commit, state
/// re-evaluation, combat and hazards, then boundary checks. An active screen
/// transition owns the whole tick; gameplay input is not sampled under a
/// fade.
fn update_playing(world: &mut GameWorld, input: &InputSnapshot) {
    if world.transition.is_some() {
        advance_transition(world);
        return;
    }

    tick_world_timers(world);
    refresh_interactive_flags(world);
    handle_control(world, input);
    let contacts = integrate_and_resolve(world, input);
    reevaluate_state(world);
    update_combat(world, contacts);
    if world.mode == GameMode::Playing {
        check_room_boundary(world);
    }
}

fn tick_world_timers(world: &mut GameWorld) {
    world.player.tick_timers();
    world.strike_cooldown = world.strike_cooldown.saturating_sub(1);
    world.soul_effects.retain_mut(|effect| {
        effect.timer = effect.timer.saturating_sub(1);
        effect.timer > 0
    });
}

/// Interactive affordances come from the player's current position, never the
/// proposed one, so the indicators cannot go stale mid-move.
fn refresh_interactive_flags(world: &mut GameWorld) {
    let contacts = {
        let Some(view) = world.content.view_of(world.current_room) else {
            warn!(
                room_x = world.current_room.x,
                room_y = world.current_room.y,
                "active room missing"
            );
            return;
        };
        sample_side_probes(view, world.player.x, world.player.y)
    };
    world.player.sit_eligible = contacts.bench;
    world.player.talk_eligible = contacts.npc;
}

fn handle_control(world: &mut GameWorld, input: &InputSnapshot) {
    match world.player.state {
        PlayerState::Sit => {
            world.player.vx = 0;
            if input.just_pressed(PadButton::Down) || input.just_pressed(PadButton::Jump) {
                world.player.enter_state(PlayerState::Idle);
            }
        }
        PlayerState::Dialogue => {
            world.player.vx = 0;
            if input.just_pressed(PadButton::Jump) || input.just_pressed(PadButton::Attack) {
                advance_dialogue(world);
            }
        }
        PlayerState::Heal => {}
        _ => {
            if input.just_pressed(PadButton::Attack)
                && !world.player.state.is_attacking()
                && world.player.attack_cooldown == 0
            {
                let direction = world.player.attack_direction(input);
                world.player.attack_timer = 0;
                world.player.attack_cooldown = ATTACK_COOLDOWN_FRAMES;
                world.player.enter_state(PlayerState::Attack(direction));
                world.push_audio(AudioEvent::Strike);
            } else if world.player.state == PlayerState::Idle
                && input.just_pressed(PadButton::Down)
                && world.player.grounded
            {
                if world.player.sit_eligible {
                    world.player.vx = 0;
                    world.player.enter_state(PlayerState::Sit);
                } else if world.player.lives < MAX_LIVES && world.player.soul >= HEAL_SOUL_COST {
                    world.player.soul -= HEAL_SOUL_COST;
                    world.player.lives += 1;
                    world.player.vx = 0;
                    world.player.vy = 0;
                    world.player.heal_timer = HEAL_DURATION_FRAMES;
                    world.player.enter_state(PlayerState::Heal);
                    world.push_audio(AudioEvent::HealCast);
                }
            } else if world.player.state == PlayerState::Idle
                && input.just_pressed(PadButton::Up)
                && world.player.talk_eligible
            {
                start_dialogue(world);
            }

            movement_and_jump(world, input);
        }
    }
}

fn movement_and_jump(world: &mut GameWorld, input: &InputSnapshot) {
    let player = &mut world.player;
    if player.state.locks_control() {
        return;
    }

    let left = input.is_down(PadButton::Left);
    let right = input.is_down(PadButton::Right);
    if left != right {
        let target = if right { WALK_MAX_SPEED } else { -WALK_MAX_SPEED };
        player.vx = accelerate_toward(player.vx, target, WALK_ACCEL);
        player.facing = if right { Facing::Right } else { Facing::Left };
    } else {
        player.vx = decelerate_to_zero(player.vx, WALK_DECEL);
    }

    if input.just_pressed(PadButton::Jump) && player.jump_ready() {
        player.vy = JUMP_IMPULSE;
        player.grounded = false;
        player.jump_cooldown = JUMP_COOLDOWN_FRAMES;
        player.enter_state(PlayerState::Jump);
        world.audio_events.push(AudioEvent::Jump);
    }
}

/// Gravity, subpixel integration, collision resolution and position commit.
/// Returns the frame's tile contacts for the combat phase.
fn integrate_and_resolve(world: &mut GameWorld, input: &InputSnapshot) -> ContactSet {
    let player = &mut world.player;

    if player.grounded {
        player.vy = 0;
        player.subpixel_y.reset();
    } else {
        let rising_held = player.vy < 0 && input.is_down(PadButton::Jump);
        let gravity = if rising_held { GRAVITY_HELD } else { GRAVITY_FALL };
        player.vy = apply_gravity(player.vy, gravity, FALL_MAX_SPEED);
    }

    let dx = player.subpixel_x.integrate(player.vx);
    let dy = if player.grounded {
        0
    } else {
        player.subpixel_y.integrate(player.vy)
    };

    let current = (player.x, player.y);
    let proposed = (player.x + dx, player.y + dy);
    let Some(view) = world.content.view_of(world.current_room) else {
        return ContactSet::default();
    };
    let outcome = resolve(view, current, proposed, (player.vx, player.vy), world.policy);

    let was_grounded = player.grounded;
    player.x = outcome.x;
    player.y = outcome.y;
    if outcome.collided_x {
        player.vx = 0;
        player.subpixel_x.reset();
    }
    if outcome.collided_y {
        player.vy = 0;
        player.subpixel_y.reset();
    }
    player.grounded = outcome.grounded || player.state == PlayerState::Sit;
    if player.grounded && !was_grounded {
        // Landing side effects fire only on the airborne-to-grounded frame.
        player.jump_cooldown = JUMP_COOLDOWN_FRAMES;
    }

    outcome.contacts
}

fn reevaluate_state(world: &mut GameWorld) {
    let player = &mut world.player;
    match player.state {
        PlayerState::Attack(_) => {
            player.attack_timer = player.attack_timer.saturating_add(1);
            if player.attack_timer >= ATTACK_DURATION_FRAMES {
                player.enter_state(player.natural_state());
            }
        }
        PlayerState::Heal => {
            player.heal_timer = player.heal_timer.saturating_sub(1);
            if player.heal_timer == 0 {
                player.enter_state(PlayerState::Idle);
            }
        }
        PlayerState::Sit | PlayerState::Dialogue => {}
        _ => {
            let desired = player.natural_state();
            player.request_state(desired);
        }
    }
    player.anim.advance();
}

fn update_combat(world: &mut GameWorld, contacts: ContactSet) {
    if let PlayerState::Attack(direction) = world.player.state {
        if world.player.attack_timer == ATTACK_TRIGGER_FRAME && world.strike_cooldown == 0 {
            let hitbox = world.player.strike_hitbox(direction);
            let report = apply_strike(
                &mut world.enemies,
                hitbox,
                &mut world.soul_effects,
                &mut world.defeated,
                world.current_room,
            );
            if report.enemies_hit > 0 {
                world.strike_cooldown = STRIKE_COOLDOWN_FRAMES;
                for _ in 0..report.enemies_hit {
                    world.player.soul = grant_soul(world.player.soul, SOUL_PER_STRIKE);
                }
                for _ in 0..report.enemies_killed {
                    world.audio_events.push(AudioEvent::SoulPickup);
                }
                debug!(
                    hit = report.enemies_hit,
                    killed = report.enemies_killed,
                    "strike_landed"
                );
            }
        }
    }

    if let Some(view) = world.content.view_of(world.current_room) {
        for enemy in world.enemies.iter_mut() {
            enemy.update(view);
        }
    }

    let player_hitbox = world.player.hitbox();
    let enemy_contact = world
        .enemies
        .iter()
        .any(|enemy| enemy.alive && enemy.hitbox().overlaps(&player_hitbox));
    if contacts.hazard || enemy_contact {
        apply_player_damage(world);
    }
}

fn apply_player_damage(world: &mut GameWorld) {
    if world.player.damage_cooldown > 0 {
        return;
    }
    world.player.damage_cooldown = DAMAGE_COOLDOWN_FRAMES;
    world.player.lives = world.player.lives.saturating_sub(1);
    world.push_audio(AudioEvent::Hurt);
    info!(lives = world.player.lives, "player_damaged");
    if world.player.lives == 0 {
        world.mode = GameMode::Dying;
        world.death_timer = DEATH_DURATION_FRAMES;
        world.pending_track = Some(MusicTrack::Death);
        world.player.anim.retarget(Some(&ANIM_DEATH));
    }
}

fn check_room_boundary(world: &mut GameWorld) {
    let Some(direction) = edge_crossed(&world.player) else {
        return;
    };
    match world.content.rooms.neighbor(world.current_room, direction) {
        Some(target) => {
            world.transition = Some(RoomTransition {
                direction,
                target,
                phase: TransitionPhase::FadeOut,
                step_timer: 0,
            });
            info!(
                from_x = world.current_room.x,
                from_y = world.current_room.y,
                to_x = target.x,
                to_y = target.y,
                "room_transition_started"
            );
        }
        None => clamp_to_edge(&mut world.player, direction),
    }
}

/// Advances the fade one discrete step per tick; the room swap happens at the
/// dark midpoint.
fn advance_transition(world: &mut GameWorld) {
    let Some(mut transition) = world.transition else {
        return;
    };
    transition.step_timer += 1;
    if transition.step_timer >= FADE_STEP_FRAMES {
        transition.step_timer = 0;
        match transition.phase {
            TransitionPhase::FadeOut => {
                world.fade = world.fade.darker();
                if world.fade == FadeLevel::DARK {
                    swap_room(world, transition.direction, transition.target);
                    transition.phase = TransitionPhase::FadeIn;
                }
            }
            TransitionPhase::FadeIn => {
                world.fade = world.fade.brighter();
                if world.fade == FadeLevel::FULL {
                    world.transition = None;
                    return;
                }
            }
        }
    }
    world.transition = Some(transition);
}

fn swap_room(world: &mut GameWorld, direction: EdgeDirection, target: RoomCoord) {
    world.current_room = target;
    reposition_for_entry(&mut world.player, direction);
    world.spawn_room_enemies();
    world.soul_effects.clear();
    world.dialogue_cursor = None;
    info!(
        room_x = target.x,
        room_y = target.y,
        "room_entered"
    );
}

fn start_dialogue(world: &mut GameWorld) {
    let line = world
        .content
        .rooms
        .room(world.current_room)
        .and_then(|room| room.npc_dialogue);
    let Some(line) = line else {
        return;
    };
    world.dialogue_cursor = Some(DialogueCursor { line });
    world.player.vx = 0;
    world.player.enter_state(PlayerState::Dialogue);
    world.push_audio(AudioEvent::MenuSelect);
}

fn advance_dialogue(world: &mut GameWorld) {
    let Some(cursor) = world.dialogue_cursor else {
        world.player.enter_state(PlayerState::Idle);
        return;
    };
    world.push_audio(AudioEvent::MenuSelect);
    match world.content.dialogue[cursor.line].next {
        Some(next) => world.dialogue_cursor = Some(DialogueCursor { line: next }),
        None => {
            world.dialogue_cursor = None;
            world.player.enter_state(PlayerState::Idle);
        }
    }
}

fn compose_menu(world: &GameWorld, frame: &mut FrameComposition) {
    frame.background.fill(0);
    write_text_row(frame, 10, 11, "KNIGHTFALL");
    if (world.frame_counter / 32) % 2 == 0 {
        write_text_row(frame, 16, 10, "PRESS START");
    }
}

fn compose_game_over(frame: &mut FrameComposition) {
    frame.background.fill(0);
    write_text_row(frame, 12, 11, "GAME OVER");
    write_text_row(frame, 16, 10, "PRESS START");
}

fn compose_playing(world: &GameWorld, frame: &mut FrameComposition) {
    match world.content.rooms.room(world.current_room) {
        Some(room) => match BackgroundGrid::from_tiles(&room.tiles) {
            Ok(grid) => frame.background = grid,
            Err(error) => warn!(error = %error, "room_background_invalid"),
        },
        None => frame.background.fill(0),
    }

    if let Some(cursor) = world.dialogue_cursor {
        write_text_row(frame, 26, 2, &world.content.dialogue[cursor.line].text);
    }

    compose_hud(frame, world.player.lives, world.player.soul);

    let blink_hidden = world.mode == GameMode::Playing
        && world.player.damage_cooldown > 0
        && (world.player.damage_cooldown / 2) % 2 == 1;
    if !blink_hidden {
        push_metasprite(
            frame,
            world.player.x,
            world.player.y,
            world.player.anim.current_base(),
            world.player.facing == Facing::Left,
            PLAYER_PALETTE,
        );
    }

    if let PlayerState::Attack(direction) = world.player.state {
        if world.player.attack_timer >= ATTACK_TRIGGER_FRAME
            && world.player.attack_timer < ATTACK_TRIGGER_FRAME + 4
        {
            let hitbox = world.player.strike_hitbox(direction);
            let tile = match direction {
                AttackDirection::Up => SLASH_TILE_UP,
                AttackDirection::Down => SLASH_TILE_DOWN,
                AttackDirection::Forward => SLASH_TILE_FORWARD,
            };
            frame.push_sprite(SpriteDraw {
                x: hitbox.x as i16 + 2,
                y: hitbox.y as i16 + 1,
                tile,
                attr: SpriteAttr {
                    flip_h: world.player.facing == Facing::Left,
                    palette: EFFECT_PALETTE,
                    behind: false,
                },
            });
        }
    }

    for enemy in world.enemies.iter().filter(|enemy| enemy.alive) {
        push_metasprite(
            frame,
            enemy.x,
            enemy.y,
            enemy.current_base(),
            enemy.facing == Facing::Left,
            ENEMY_PALETTE,
        );
    }

    for effect in &world.soul_effects {
        frame.push_sprite(SpriteDraw {
            x: effect.x as i16,
            y: effect.y as i16,
            tile: SOUL_EFFECT_TILE,
            attr: SpriteAttr {
                flip_h: false,
                palette: EFFECT_PALETTE,
                behind: false,
            },
        });
    }

    frame.flash = world.mode == GameMode::Playing
        && world.player.damage_cooldown > DAMAGE_COOLDOWN_FRAMES - DAMAGE_FLASH_FRAMES;
}
