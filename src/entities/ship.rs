use color_eyre::Result;

use crate::assets::SHIP;
use crate::geometry::Rect;
use crate::scene::{NodeId, Scene};

/// The player's ship. Movement limits are enforced by the session's
/// boundary walls, not here.
#[derive(Debug, Clone)]
pub struct Ship {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    node: Option<NodeId>,
}

impl Ship {
    pub fn new(scene: &Scene) -> Result<Self> {
        let asset = scene.asset(SHIP)?;
        Ok(Self {
            x: 0.0,
            y: 0.0,
            width: asset.width,
            height: asset.height,
            node: None,
        })
    }

    /// Puts the ship on screen at the given position, replacing any previous sprite.
    pub fn show_at(&mut self, scene: &mut Scene, x: f64, y: f64) -> Result<()> {
        self.hide(scene);
        self.x = x;
        self.y = y;
        self.node = Some(scene.add_sprite(SHIP, x, y)?);
        Ok(())
    }

    pub fn hide(&mut self, scene: &mut Scene) {
        if let Some(node) = self.node.take() {
            scene.remove(node);
        }
    }

    pub fn is_shown(&self) -> bool {
        self.node.is_some()
    }

    pub fn move_by(&mut self, scene: &mut Scene, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
        if let Some(node) = self.node {
            scene.set_position(node, self.x, self.y);
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
