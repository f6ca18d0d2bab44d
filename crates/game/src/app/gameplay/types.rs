#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameMode {
    Menu,
    Playing,
    Dying,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Facing {
    Left,
    Right,
}

impl Facing {
    fn flip(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    fn sign(self) -> i16 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttackDirection {
    Up,
    Down,
    Forward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayerState {
    Idle,
    Run,
    Jump,
    Fall,
    Attack(AttackDirection),
    Heal,
    Sit,
    Dialogue,
}

impl PlayerState {
    fn is_attacking(self) -> bool {
        matches!(self, PlayerState::Attack(_))
    }

    /// Sit, Dialogue and Heal own the player exclusively: movement, jump and
    /// attack input are ignored while one of them is active.
    fn locks_control(self) -> bool {
        matches!(
            self,
            PlayerState::Sit | PlayerState::Dialogue | PlayerState::Heal
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
struct RoomCoord {
    x: i8,
    y: i8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl RoomCoord {
    fn neighbor(self, direction: EdgeDirection) -> Option<RoomCoord> {
        let (dx, dy) = match direction {
            EdgeDirection::Left => (-1, 0),
            EdgeDirection::Right => (1, 0),
            EdgeDirection::Up => (0, -1),
            EdgeDirection::Down => (0, 1),
        };
        Some(RoomCoord {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TileClass {
    None,
    Solid,
    Hazard,
    Bench,
    Npc,
}

/// Union of tile classes touched by a set of probes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ContactSet {
    solid: bool,
    hazard: bool,
    bench: bool,
    npc: bool,
}

impl ContactSet {
    fn insert(&mut self, class: TileClass) {
        match class {
            TileClass::None => {}
            TileClass::Solid => self.solid = true,
            TileClass::Hazard => self.hazard = true,
            TileClass::Bench => self.bench = true,
            TileClass::Npc => self.npc = true,
        }
    }

    fn merge(&mut self, other: ContactSet) {
        self.solid |= other.solid;
        self.hazard |= other.hazard;
        self.bench |= other.bench;
        self.npc |= other.npc;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

impl Rect {
    fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// Corner tie-break when one frame collides on both axes. `LargerVelocity`
/// snaps the axis with more speed and nudges the other one pixel back toward
/// where it came from; ties fall to the vertical axis. `VerticalFirst` always
/// snaps vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CornerPolicy {
    LargerVelocity,
    VerticalFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransitionPhase {
    FadeOut,
    FadeIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RoomTransition {
    direction: EdgeDirection,
    target: RoomCoord,
    phase: TransitionPhase,
    step_timer: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SoulEffect {
    x: i32,
    y: i32,
    timer: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DialogueCursor {
    line: usize,
}
