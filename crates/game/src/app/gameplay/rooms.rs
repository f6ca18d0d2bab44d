/// Which edge, if any, the player has pushed past this frame.
fn edge_crossed(player: &Player) -> Option<EdgeDirection> {
    if player.x < EDGE_MARGIN && player.vx < 0 {
        return Some(EdgeDirection::Left);
    }
    if player.x + PLAYER_SPRITE_SIZE > ROOM_PIXEL_WIDTH - EDGE_MARGIN && player.vx > 0 {
        return Some(EdgeDirection::Right);
    }
    if player.y < EDGE_MARGIN && player.vy < 0 {
        return Some(EdgeDirection::Up);
    }
    if player.y + PLAYER_SPRITE_SIZE > PLAYFIELD_BOTTOM - EDGE_MARGIN && player.vy > 0 {
        return Some(EdgeDirection::Down);
    }
    None
}

/// Clamp applied when an edge has no neighboring room.
fn clamp_to_edge(player: &mut Player, direction: EdgeDirection) {
    match direction {
        EdgeDirection::Left => player.x = EDGE_MARGIN,
        EdgeDirection::Right => player.x = ROOM_PIXEL_WIDTH - EDGE_MARGIN - PLAYER_SPRITE_SIZE,
        EdgeDirection::Up => player.y = EDGE_MARGIN,
        EdgeDirection::Down => player.y = PLAYFIELD_BOTTOM - EDGE_MARGIN - PLAYER_SPRITE_SIZE,
    }
}

/// Places the player on the opposite edge of the room being entered. Entering
/// from below keeps the jump alive with an upward kick across the seam.
fn reposition_for_entry(player: &mut Player, direction: EdgeDirection) {
    match direction {
        EdgeDirection::Right => player.x = ENTRY_INSET,
        EdgeDirection::Left => player.x = ROOM_PIXEL_WIDTH - PLAYER_SPRITE_SIZE - ENTRY_INSET,
        EdgeDirection::Up => {
            player.y = PLAYFIELD_BOTTOM - PLAYER_SPRITE_SIZE - ENTRY_INSET;
            player.vy = SEAM_KICK_VELOCITY;
            player.grounded = false;
        }
        EdgeDirection::Down => player.y = ENTRY_INSET,
    }
    player.subpixel_x.reset();
    player.subpixel_y.reset();
}
