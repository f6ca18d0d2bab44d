#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MoveOutcome {
    x: i32,
    y: i32,
    collided_x: bool,
    collided_y: bool,
    grounded: bool,
    contacts: ContactSet,
}

/// Side probes: both hitbox edges at head and body height. Uses row 15, not
/// the foot row, so standing on a floor never reads as a wall hit.
fn sample_side_probes(view: RoomView<'_>, x: i32, y: i32) -> ContactSet {
    let mut contacts = ContactSet::default();
    for probe_x in [x + HITBOX_LEFT_INSET, x + HITBOX_RIGHT_INSET] {
        for probe_y in [y + HITBOX_TOP_INSET, y + HITBOX_SIDE_BOTTOM] {
            contacts.insert(view.classify(probe_x, probe_y));
        }
    }
    contacts
}

/// Vertical probes: head row plus the foot row one pixel below the sprite,
/// which keeps standing contact latched while the player is at rest.
fn sample_vertical_probes(view: RoomView<'_>, x: i32, y: i32) -> ContactSet {
    let mut contacts = ContactSet::default();
    for probe_x in [x + HITBOX_LEFT_INSET, x + HITBOX_RIGHT_INSET] {
        for probe_y in [y + HITBOX_TOP_INSET, y + HITBOX_FOOT] {
            contacts.insert(view.classify(probe_x, probe_y));
        }
    }
    contacts
}

fn snap_x_for_travel(proposed_x: i32, vx: i16) -> i32 {
    if vx > 0 {
        let probe = proposed_x + HITBOX_RIGHT_INSET;
        (probe / TILE_SIZE) * TILE_SIZE - 1 - HITBOX_RIGHT_INSET
    } else {
        let probe = proposed_x + HITBOX_LEFT_INSET;
        (probe / TILE_SIZE) * TILE_SIZE + TILE_SIZE - HITBOX_LEFT_INSET
    }
}

fn snap_y_for_travel(proposed_y: i32, vy: i16) -> i32 {
    if vy >= 0 {
        let probe = proposed_y + HITBOX_FOOT;
        (probe / TILE_SIZE) * TILE_SIZE - HITBOX_FOOT
    } else {
        let probe = proposed_y + HITBOX_TOP_INSET;
        (probe / TILE_SIZE) * TILE_SIZE + TILE_SIZE - HITBOX_TOP_INSET
    }
}

fn nudge_back(proposed: i32, velocity: i16) -> i32 {
    proposed - velocity.signum() as i32
}

/// Axis-separated collision against the active room. Horizontal is sampled at
/// the proposed X against the current Y; vertical is sampled at the resolved
/// X against the proposed Y. When both axes hit solid in the same frame the
/// corner policy picks one axis to snap and nudges the other a pixel back out
/// of the pocket. Hazard and interactive contacts are unioned across both
/// passes and reported regardless of the solid outcome.
fn resolve(
    view: RoomView<'_>,
    current: (i32, i32),
    proposed: (i32, i32),
    velocity: (i16, i16),
    policy: CornerPolicy,
) -> MoveOutcome {
    let (current_x, current_y) = current;
    let (proposed_x, proposed_y) = proposed;
    let (vx, vy) = velocity;

    let side_contacts = sample_side_probes(view, proposed_x, current_y);
    let hit_x = side_contacts.solid && proposed_x != current_x;
    let resolved_x = if hit_x {
        snap_x_for_travel(proposed_x, vx)
    } else {
        proposed_x
    };

    let vertical_contacts = sample_vertical_probes(view, resolved_x, proposed_y);
    let hit_y = vertical_contacts.solid;

    let mut contacts = side_contacts;
    contacts.merge(vertical_contacts);

    let mut outcome = MoveOutcome {
        x: resolved_x,
        y: proposed_y,
        collided_x: hit_x,
        collided_y: hit_y,
        grounded: false,
        contacts,
    };

    if hit_x && hit_y {
        let vertical_wins = match policy {
            CornerPolicy::VerticalFirst => true,
            CornerPolicy::LargerVelocity => vy.unsigned_abs() >= vx.unsigned_abs(),
        };
        if vertical_wins {
            outcome.x = nudge_back(proposed_x, vx);
            outcome.collided_x = false;
            outcome.y = snap_y_for_travel(proposed_y, vy);
            outcome.grounded = vy >= 0;
        } else {
            outcome.x = snap_x_for_travel(proposed_x, vx);
            outcome.y = nudge_back(proposed_y, vy);
            outcome.collided_y = false;
        }
        return outcome;
    }

    if hit_y {
        outcome.y = snap_y_for_travel(proposed_y, vy);
        outcome.grounded = vy >= 0;
    }

    outcome
}
