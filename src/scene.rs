//! Backend-neutral draw list
//!
//! [`Scene::build`] turns the frame controller's state into an ordered list
//! of [`DrawCmd`]s in field coordinates (origin top-left, y down, 800x800).
//! Each frontend rasterizes the list its own way; none of them look at the
//! simulation directly.

use glam::Vec2;

use crate::consts::*;
use crate::frame::{FrameController, MenuItem, OptionsItem, Screen};
use crate::sim::{AsteroidVariant, Rect, Session};

/// RGBA, each channel 0.0 - 1.0
pub type Color = [f32; 4];

/// Colors for every screen
pub mod colors {
    use super::Color;

    pub const MENU_BACKGROUND: Color = [108.0 / 255.0, 1.0, 235.0 / 255.0, 1.0];
    pub const GAME_BACKGROUND: Color = [96.0 / 255.0, 128.0 / 255.0, 1.0, 1.0];
    pub const GAME_OVER_BACKGROUND: Color = [1.0, 0.0, 0.0, 1.0];
    /// Mid-field line marking how far up the ship may fly
    pub const GUIDE_LINE: Color = [1.0, 0.0, 0.0, 128.0 / 255.0];
    pub const HUD_BAR: Color = [0.0, 0.0, 0.0, 1.0];
    pub const HUD_TEXT: Color = [1.0, 1.0, 1.0, 1.0];
    pub const MENU_TEXT: Color = [0.0, 0.0, 0.0, 1.0];
    pub const GAME_OVER_TEXT: Color = [0.0, 0.0, 0.0, 1.0];
}

/// Opacity of an asteroid that has taken a bullet
pub const HIT_ALPHA: f32 = 170.0 / 255.0;

/// Height of the black status bar behind the HUD line
pub const HUD_BAR_HEIGHT: f32 = 40.0;

/// Arrow drawn in front of the selected menu line
pub const MENU_ARROW: &str = "->";

/// What a sprite depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Player,
    Asteroid(AsteroidVariant),
    Bullet,
    Package,
}

/// Where a text label belongs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    /// HUD line across the top
    Status,
    /// Menu or options entry, top to bottom
    MenuLine(usize),
    /// Centered game-over captions, top to bottom
    Banner(usize),
}

/// One drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Fill the whole field
    Clear(Color),
    FillRect {
        rect: Rect,
        color: Color,
    },
    Sprite {
        kind: SpriteKind,
        rect: Rect,
        /// Clockwise rotation about the center (degrees)
        angle_deg: f32,
        /// Mirrored on both axes
        flip: bool,
        alpha: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
    },
    Text {
        role: TextRole,
        text: String,
        color: Color,
        /// Under the menu cursor
        selected: bool,
        /// Marks the active choice (current difficulty)
        highlighted: bool,
    },
}

/// Menu text color: red when selected, blue when it is the active choice
pub fn menu_color(selected: bool, highlighted: bool) -> Color {
    let mut color = colors::MENU_TEXT;
    if selected {
        color[0] = 1.0;
    }
    if highlighted {
        color[2] = 1.0;
    }
    color
}

/// Menu line text with the arrow marker or matching padding
pub fn menu_label(label: &str, selected: bool) -> String {
    let marker = if selected { MENU_ARROW } else { "  " };
    format!("{} {}", marker, label)
}

/// HUD status line
pub fn status_line(session: &Session) -> String {
    format!(
        "Time: {}   Score: {}   Bullets: {}",
        session.elapsed_secs(),
        session.score,
        session.ammo
    )
}

/// A frame's worth of draw commands, in painting order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub commands: Vec<DrawCmd>,
}

impl Scene {
    pub fn build(fc: &FrameController) -> Self {
        let mut scene = Scene::default();
        match fc.screen() {
            Screen::Menu => {
                scene.push(DrawCmd::Clear(colors::MENU_BACKGROUND));
                scene.asteroids(fc.attract());
                let cursor = fc.menu_cursor().index();
                for (i, item) in MenuItem::ALL.iter().enumerate() {
                    scene.menu_line(i, item.label(), i == cursor, false);
                }
            }
            Screen::Options => {
                scene.push(DrawCmd::Clear(colors::MENU_BACKGROUND));
                scene.asteroids(fc.attract());
                let cursor = fc.options_cursor().index();
                let current = fc.settings().difficulty;
                for (i, item) in OptionsItem::ALL.iter().enumerate() {
                    let active = matches!(item, OptionsItem::Difficulty(d) if *d == current);
                    scene.menu_line(i, item.label(), i == cursor, active);
                }
            }
            Screen::Playing => scene.playing(fc.session()),
            Screen::GameOver { .. } => {
                scene.push(DrawCmd::Clear(colors::GAME_OVER_BACKGROUND));
                let summary = format!("Time: {}   Score: {}", fc.final_secs(), fc.session().score);
                for (i, text) in ["GAME OVER".to_string(), summary].into_iter().enumerate() {
                    scene.push(DrawCmd::Text {
                        role: TextRole::Banner(i),
                        text,
                        color: colors::GAME_OVER_TEXT,
                        selected: false,
                        highlighted: false,
                    });
                }
            }
        }
        scene
    }

    fn push(&mut self, cmd: DrawCmd) {
        self.commands.push(cmd);
    }

    fn menu_line(&mut self, index: usize, label: &str, selected: bool, highlighted: bool) {
        self.push(DrawCmd::Text {
            role: TextRole::MenuLine(index),
            text: menu_label(label, selected),
            color: menu_color(selected, highlighted),
            selected,
            highlighted,
        });
    }

    fn asteroids(&mut self, session: &Session) {
        for (_, asteroid) in session.asteroids.iter() {
            if asteroid.is_destroyed() {
                continue;
            }
            self.push(DrawCmd::Sprite {
                kind: SpriteKind::Asteroid(asteroid.variant),
                rect: asteroid.rect,
                angle_deg: session.rotation_offset + asteroid.angle,
                flip: true,
                alpha: if asteroid.hit { HIT_ALPHA } else { 1.0 },
            });
        }
    }

    fn playing(&mut self, session: &Session) {
        self.push(DrawCmd::Clear(colors::GAME_BACKGROUND));
        self.asteroids(session);

        for (_, bullet) in session.bullets.iter() {
            self.push(sprite(SpriteKind::Bullet, bullet.rect));
        }
        for (_, package) in session.packages.iter() {
            self.push(sprite(SpriteKind::Package, package.rect));
        }

        self.push(DrawCmd::FillRect {
            rect: Rect::new(0.0, 0.0, FIELD_WIDTH, HUD_BAR_HEIGHT),
            color: colors::HUD_BAR,
        });
        self.push(DrawCmd::Text {
            role: TextRole::Status,
            text: status_line(session),
            color: colors::HUD_TEXT,
            selected: false,
            highlighted: false,
        });

        self.push(sprite(SpriteKind::Player, session.player.rect));

        let mid = FIELD_HEIGHT / 2.0;
        self.push(DrawCmd::Line {
            from: Vec2::new(0.0, mid),
            to: Vec2::new(FIELD_WIDTH, mid),
            color: colors::GUIDE_LINE,
        });
    }

    /// Text labels in painting order
    pub fn texts(&self) -> impl Iterator<Item = (TextRole, &str)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCmd::Text { role, text, .. } => Some((*role, text.as_str())),
            _ => None,
        })
    }
}

fn sprite(kind: SpriteKind, rect: Rect) -> DrawCmd {
    DrawCmd::Sprite {
        kind,
        rect,
        angle_deg: 0.0,
        flip: false,
        alpha: 1.0,
    }
}
