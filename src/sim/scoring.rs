//! Dodge scoring

use super::state::Session;

/// Count every still-visible asteroid whose row is now below the player's
/// row, clearing its visibility so it can never count twice.
/// Returns the points awarded this tick.
pub fn award_dodges(session: &mut Session) -> u32 {
    let player_row = session.player.rect.y();
    let mut awarded = 0;

    for (_, asteroid) in session.asteroids.iter_mut() {
        if asteroid.visible && asteroid.rect.y() > player_row {
            asteroid.visible = false;
            awarded += 1;
        }
    }

    session.score += awarded;
    awarded
}
