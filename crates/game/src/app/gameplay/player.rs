/// One animation: metasprite base tiles per frame plus the per-frame delay.
#[derive(Debug, PartialEq, Eq)]
struct AnimSeq {
    bases: &'static [u8],
    delay: u8,
}

static ANIM_IDLE: AnimSeq = AnimSeq {
    bases: &PLAYER_IDLE_BASES,
    delay: ANIM_DELAY_IDLE,
};
static ANIM_RUN: AnimSeq = AnimSeq {
    bases: &PLAYER_RUN_BASES,
    delay: ANIM_DELAY_RUN,
};
static ANIM_JUMP: AnimSeq = AnimSeq {
    bases: &PLAYER_JUMP_BASES,
    delay: ANIM_DELAY_SINGLE,
};
static ANIM_FALL: AnimSeq = AnimSeq {
    bases: &PLAYER_FALL_BASES,
    delay: ANIM_DELAY_SINGLE,
};
static ANIM_ATTACK: AnimSeq = AnimSeq {
    bases: &PLAYER_ATTACK_BASES,
    delay: ANIM_DELAY_SINGLE,
};
static ANIM_SIT: AnimSeq = AnimSeq {
    bases: &PLAYER_SIT_BASES,
    delay: ANIM_DELAY_SINGLE,
};
static ANIM_HEAL: AnimSeq = AnimSeq {
    bases: &PLAYER_HEAL_BASES,
    delay: ANIM_DELAY_SINGLE,
};
static ANIM_DEATH: AnimSeq = AnimSeq {
    bases: &PLAYER_DEATH_BASES,
    delay: ANIM_DELAY_DEATH,
};

/// Sequence for a player state. Returns None for a state with no mapping so
/// the cursor can keep its previous sequence instead of faulting.
fn sequence_for_state(state: PlayerState) -> Option<&'static AnimSeq> {
    match state {
        PlayerState::Idle => Some(&ANIM_IDLE),
        PlayerState::Run => Some(&ANIM_RUN),
        PlayerState::Jump => Some(&ANIM_JUMP),
        PlayerState::Fall => Some(&ANIM_FALL),
        PlayerState::Attack(_) => Some(&ANIM_ATTACK),
        PlayerState::Heal => Some(&ANIM_HEAL),
        PlayerState::Sit => Some(&ANIM_SIT),
        PlayerState::Dialogue => Some(&ANIM_IDLE),
    }
}

#[derive(Debug)]
struct AnimationCursor {
    seq: &'static AnimSeq,
    frame: u8,
    delay_counter: u8,
}

impl Default for AnimationCursor {
    fn default() -> Self {
        Self {
            seq: &ANIM_IDLE,
            frame: 0,
            delay_counter: 0,
        }
    }
}

impl AnimationCursor {
    /// Switches sequence. Frame and delay reset only when the sequence
    /// reference actually changes, so re-selecting the current sequence does
    /// not restart it.
    fn retarget(&mut self, new_seq: Option<&'static AnimSeq>) {
        let Some(new_seq) = new_seq else {
            debug_assert!(false, "player state has no animation mapping");
            warn!("missing animation mapping; keeping previous sequence");
            return;
        };
        if !std::ptr::eq(self.seq, new_seq) {
            self.seq = new_seq;
            self.frame = 0;
            self.delay_counter = 0;
        }
    }

    fn advance(&mut self) {
        if self.delay_counter == 0 {
            self.frame = (self.frame + 1) % self.seq.bases.len() as u8;
        }
        self.delay_counter = (self.delay_counter + 1) % self.seq.delay;
    }

    fn current_base(&self) -> u8 {
        self.seq.bases[self.frame as usize]
    }
}

#[derive(Debug)]
struct Player {
    x: i32,
    y: i32,
    subpixel_x: SubpixelAxis,
    subpixel_y: SubpixelAxis,
    vx: i16,
    vy: i16,
    facing: Facing,
    grounded: bool,
    state: PlayerState,
    dwell: u8,
    anim: AnimationCursor,
    lives: u8,
    soul: u8,
    jump_cooldown: u8,
    damage_cooldown: u8,
    attack_cooldown: u8,
    attack_timer: u8,
    heal_timer: u8,
    sit_eligible: bool,
    talk_eligible: bool,
}

impl Player {
    fn spawn_at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            subpixel_x: SubpixelAxis::default(),
            subpixel_y: SubpixelAxis::default(),
            vx: 0,
            vy: 0,
            facing: Facing::Right,
            grounded: false,
            state: PlayerState::Idle,
            dwell: STATE_DWELL_MIN,
            anim: AnimationCursor::default(),
            lives: MAX_LIVES,
            soul: 0,
            jump_cooldown: 0,
            damage_cooldown: 0,
            attack_cooldown: 0,
            attack_timer: 0,
            heal_timer: 0,
            sit_eligible: false,
            talk_eligible: false,
        }
    }

    fn hitbox(&self) -> Rect {
        Rect {
            x: self.x + HITBOX_LEFT_INSET,
            y: self.y + HITBOX_TOP_INSET,
            w: HITBOX_RIGHT_INSET - HITBOX_LEFT_INSET + 1,
            h: HITBOX_SIDE_BOTTOM - HITBOX_TOP_INSET + 1,
        }
    }

    fn jump_ready(&self) -> bool {
        self.grounded && self.jump_cooldown == 0
    }

    /// Interrupt-class entry: takes effect immediately, resets the dwell
    /// guard, and retargets the animation.
    fn enter_state(&mut self, state: PlayerState) {
        self.state = state;
        self.dwell = 0;
        self.anim.retarget(sequence_for_state(state));
    }

    /// Rate-limited entry used by the grounded/airborne re-evaluation; a
    /// change is honored only once the dwell guard has elapsed.
    fn request_state(&mut self, state: PlayerState) {
        if state == self.state {
            return;
        }
        if self.dwell < STATE_DWELL_MIN {
            return;
        }
        self.enter_state(state);
    }

    fn tick_timers(&mut self) {
        self.dwell = self.dwell.saturating_add(1);
        self.jump_cooldown = self.jump_cooldown.saturating_sub(1);
        self.damage_cooldown = self.damage_cooldown.saturating_sub(1);
        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);
    }

    /// The state that the grounded/airborne rules ask for, ignoring the
    /// interrupt-class states.
    fn natural_state(&self) -> PlayerState {
        if !self.grounded {
            if self.vy < 0 {
                PlayerState::Jump
            } else {
                PlayerState::Fall
            }
        } else if self.vx != 0 {
            PlayerState::Run
        } else {
            PlayerState::Idle
        }
    }

    fn attack_direction(&self, input: &InputSnapshot) -> AttackDirection {
        if input.is_down(PadButton::Up) {
            AttackDirection::Up
        } else if input.is_down(PadButton::Down) {
            AttackDirection::Down
        } else {
            AttackDirection::Forward
        }
    }

    fn strike_hitbox(&self, direction: AttackDirection) -> Rect {
        match direction {
            AttackDirection::Up => Rect {
                x: self.x + 2,
                y: self.y - 12,
                w: 12,
                h: 12,
            },
            AttackDirection::Down => Rect {
                x: self.x + 2,
                y: self.y + PLAYER_SPRITE_SIZE,
                w: 12,
                h: 12,
            },
            AttackDirection::Forward => match self.facing {
                Facing::Right => Rect {
                    x: self.x + PLAYER_SPRITE_SIZE,
                    y: self.y + 4,
                    w: 12,
                    h: 10,
                },
                Facing::Left => Rect {
                    x: self.x - 12,
                    y: self.y + 4,
                    w: 12,
                    h: 10,
                },
            },
        }
    }
}
