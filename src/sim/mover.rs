//! Per-tick entity movement and off-field culling

use super::state::Session;
use crate::consts::*;

/// Extra fall speed every asteroid gets after `elapsed_ms` of play
#[inline]
pub fn speed_ramp(elapsed_ms: u64) -> f32 {
    elapsed_ms as f32 / SPEED_RAMP_MS
}

/// Advance every entity by one tick. No clamping: entities leave the field
/// freely and are dealt with by [`cull`].
pub fn advance(session: &mut Session) {
    let ramp = speed_ramp(session.elapsed_ms());

    for (_, package) in session.packages.iter_mut() {
        package.rect.pos.y += PACKAGE_SPEED;
    }
    for (_, asteroid) in session.asteroids.iter_mut() {
        asteroid.rect.pos.y += asteroid.speed + ramp;
        asteroid.angle += asteroid.spin;
    }
    for (_, bullet) in session.bullets.iter_mut() {
        bullet.rect.pos.y -= BULLET_SPEED;
    }

    session.rotation_offset += ROTATION_OFFSET_STEP;
}

/// Free slots whose entities can no longer collide or score:
/// bullets well above the field, packages below the lowest reach of the
/// ship, and counted asteroids below that same line. Entities only fall,
/// so nothing past the line can touch the ship again. Returns the number
/// of slots freed.
pub fn cull(session: &mut Session) -> usize {
    let bullets = session
        .bullets
        .retain(|b| b.rect.bottom() >= -BULLET_CULL_MARGIN);
    let packages = session.packages.retain(|p| p.rect.y() < PLAYER_MAX_BOTTOM);
    let asteroids = session
        .asteroids
        .retain(|a| a.visible || a.rect.y() < PLAYER_MAX_BOTTOM);
    bullets + packages + asteroids
}
