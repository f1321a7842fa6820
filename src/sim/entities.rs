//! Entity types: player, asteroids, bullets and packages

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Visual variety for asteroids. Renderers map each variant to their own
/// drawable; gameplay never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AsteroidVariant {
    #[default]
    Rocky,
    Cratered,
    Jagged,
    Icy,
    Metallic,
    Dusty,
    Cracked,
    Molten,
    Ringed,
}

impl AsteroidVariant {
    pub const ALL: [AsteroidVariant; 9] = [
        AsteroidVariant::Rocky,
        AsteroidVariant::Cratered,
        AsteroidVariant::Jagged,
        AsteroidVariant::Icy,
        AsteroidVariant::Metallic,
        AsteroidVariant::Dusty,
        AsteroidVariant::Cracked,
        AsteroidVariant::Molten,
        AsteroidVariant::Ringed,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Hit points for an asteroid of the given side length
pub fn hit_points_for_size(size: f32) -> u8 {
    if size > HEAVY_ASTEROID_SIZE { 2 } else { 1 }
}

/// A falling asteroid
#[derive(Debug, Clone, Default)]
pub struct Asteroid {
    pub rect: Rect,
    /// Base fall speed (pixels per tick)
    pub speed: f32,
    /// Not yet counted by the scorer
    pub visible: bool,
    pub hp: u8,
    /// Took at least one bullet (drawn translucent)
    pub hit: bool,
    /// Own rotation (degrees)
    pub angle: f32,
    /// Rotation per tick (degrees)
    pub spin: f32,
    pub variant: AsteroidVariant,
}

impl Asteroid {
    pub fn new(x: f32, y: f32, size: f32, speed: f32) -> Self {
        Self {
            rect: Rect::square(x, y, size),
            speed,
            visible: true,
            hp: hit_points_for_size(size),
            hit: false,
            angle: 0.0,
            spin: 0.0,
            variant: AsteroidVariant::default(),
        }
    }

    /// Destroyed asteroids have been collapsed to zero area
    pub fn is_destroyed(&self) -> bool {
        self.rect.is_empty()
    }

    /// Take one bullet. Returns true if that brought HP to zero.
    pub fn strike(&mut self) -> bool {
        self.hp = self.hp.saturating_sub(1);
        self.hit = true;
        self.hp == 0
    }
}

/// A player bullet travelling up
#[derive(Debug, Clone, Default)]
pub struct Bullet {
    pub rect: Rect,
}

impl Bullet {
    /// Bullet centered on the player's top edge
    pub fn fired_from(player: &Player) -> Self {
        let x = (player.rect.x() + PLAYER_WIDTH / 2.0 - BULLET_SIZE / 2.0).trunc();
        let y = player.rect.y().trunc();
        Self {
            rect: Rect::square(x, y, BULLET_SIZE),
        }
    }
}

/// An ammo package falling toward the player
#[derive(Debug, Clone, Default)]
pub struct Package {
    pub rect: Rect,
}

impl Package {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: Rect::square(x, y, PACKAGE_SIZE),
        }
    }
}

/// Held movement keys for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Steering {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            rect: Rect::new(
                FIELD_WIDTH / 2.0,
                FIELD_HEIGHT - PLAYER_START_OFFSET,
                PLAYER_WIDTH,
                PLAYER_HEIGHT,
            ),
        }
    }
}

impl Player {
    /// Apply one tick of steering. The ship stays in the lower half of the
    /// field; each bound is checked before the step, so it may overshoot an
    /// edge by less than one step.
    pub fn steer(&mut self, keys: Steering) {
        let vertical = keys.up || keys.down;
        let horizontal = keys.left || keys.right;
        let speed = if vertical && horizontal {
            PLAYER_SPEED.sqrt()
        } else {
            PLAYER_SPEED
        };

        let r = &mut self.rect;
        if keys.up && r.y() > FIELD_HEIGHT / 2.0 {
            r.pos.y -= speed;
        }
        if keys.down && r.bottom() <= FIELD_HEIGHT {
            r.pos.y += speed;
        }
        if keys.left && r.x() > 0.0 {
            r.pos.x -= speed;
        }
        if keys.right && r.right() <= FIELD_WIDTH {
            r.pos.x += speed;
        }
    }
}
