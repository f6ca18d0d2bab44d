/// Patrol mob. Bound to the room it spawned in; walks its floor, reverses at
/// walls and ledges, and never respawns once defeated within a session.
#[derive(Debug)]
struct Enemy {
    spawn_index: usize,
    x: i32,
    y: i32,
    subpixel_x: SubpixelAxis,
    facing: Facing,
    hp: u8,
    alive: bool,
    stun: u8,
    anim_frame: u8,
    anim_delay: u8,
}

impl Enemy {
    fn from_spawn(spawn_index: usize, spawn: &EnemySpawn) -> Self {
        Self {
            spawn_index,
            x: spawn.x,
            y: spawn.y,
            subpixel_x: SubpixelAxis::default(),
            facing: spawn.facing,
            hp: ENEMY_MAX_HP,
            alive: true,
            stun: 0,
            anim_frame: 0,
            anim_delay: 0,
        }
    }

    fn hitbox(&self) -> Rect {
        Rect {
            x: self.x + 2,
            y: self.y + 2,
            w: ENEMY_SPRITE_SIZE - 4,
            h: ENEMY_SPRITE_SIZE - 3,
        }
    }

    /// Leading-edge probes: a wall at body height or missing floor one tile
    /// ahead turns the patrol around.
    fn should_reverse(&self, view: RoomView<'_>) -> bool {
        let lead_x = match self.facing {
            Facing::Right => self.x + ENEMY_SPRITE_SIZE - 2,
            Facing::Left => self.x + 1,
        };
        let wall_ahead = view.is_solid(lead_x, self.y + ENEMY_SPRITE_SIZE / 2);
        let floor_ahead = view.is_solid(lead_x, self.y + ENEMY_SPRITE_SIZE + 1);
        wall_ahead || !floor_ahead
    }

    fn update(&mut self, view: RoomView<'_>) {
        if !self.alive {
            return;
        }
        if self.stun > 0 {
            self.stun -= 1;
            return;
        }
        if self.should_reverse(view) {
            self.facing = self.facing.flip();
            self.subpixel_x.reset();
        }
        let velocity = ENEMY_WALK_SPEED * self.facing.sign();
        self.x += self.subpixel_x.integrate(velocity);

        if self.anim_delay == 0 {
            self.anim_frame = (self.anim_frame + 1) % ENEMY_FRAME_BASES.len() as u8;
        }
        self.anim_delay = (self.anim_delay + 1) % ENEMY_ANIM_DELAY;
    }

    fn current_base(&self) -> u8 {
        ENEMY_FRAME_BASES[self.anim_frame as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StrikeReport {
    enemies_hit: u32,
    enemies_killed: u32,
}

/// Applies one swing's hitbox to every live enemy. The caller gates this on
/// the trigger frame and the global strike cooldown, so a single swing can
/// never multi-hit.
fn apply_strike(
    enemies: &mut [Enemy],
    hitbox: Rect,
    soul_effects: &mut Vec<SoulEffect>,
    defeated: &mut HashSet<(RoomCoord, usize)>,
    room: RoomCoord,
) -> StrikeReport {
    let mut report = StrikeReport {
        enemies_hit: 0,
        enemies_killed: 0,
    };
    for enemy in enemies.iter_mut() {
        if !enemy.alive || !hitbox.overlaps(&enemy.hitbox()) {
            continue;
        }
        enemy.hp = enemy.hp.saturating_sub(STRIKE_DAMAGE);
        enemy.stun = STUN_FRAMES;
        report.enemies_hit += 1;
        if enemy.hp == 0 {
            enemy.alive = false;
            defeated.insert((room, enemy.spawn_index));
            soul_effects.push(SoulEffect {
                x: enemy.x + ENEMY_SPRITE_SIZE / 2 - TILE_SIZE / 2,
                y: enemy.y,
                timer: SOUL_EFFECT_FRAMES,
            });
            report.enemies_killed += 1;
        }
    }
    report
}

fn grant_soul(soul: u8, amount: u8) -> u8 {
    soul.saturating_add(amount).min(MAX_SOUL)
}
