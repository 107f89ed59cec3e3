use color_eyre::Result;

use crate::assets::MISSILE;
use crate::geometry::Rect;
use crate::scene::{NodeId, Scene};

pub const MISSILE_SPEED: f64 = 5.0;

/// Player projectile. Flies straight up until it leaves the screen or hits.
#[derive(Debug, Clone)]
pub struct Missile {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    node: NodeId,
}

impl Missile {
    /// Spawns centred on `origin` and a third of its height above it.
    pub fn fire(scene: &mut Scene, origin: Rect) -> Result<Self> {
        let x = origin.x + origin.width / 2.0 - 2.0;
        let y = origin.y - origin.height / 3.0;
        let node = scene.add_sprite(MISSILE, x, y)?;
        let asset = scene.asset(MISSILE)?;

        Ok(Self {
            x,
            y,
            width: asset.width,
            height: asset.height,
            node,
        })
    }

    pub fn advance(&mut self, scene: &mut Scene) {
        self.y -= MISSILE_SPEED;
        scene.set_position(self.node, self.x, self.y);
    }

    pub fn is_off_screen(&self) -> bool {
        self.y < 0.0
    }

    pub fn destroy(&self, scene: &mut Scene) {
        scene.remove(self.node);
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missile_spawns_above_origin_center() {
        let mut scene = Scene::default();
        let missile = Missile::fire(&mut scene, Rect::new(100.0, 600.0, 40.0, 30.0)).unwrap();
        assert_eq!(missile.x, 118.0);
        assert_eq!(missile.y, 590.0);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_missile_moves_up() {
        let mut scene = Scene::default();
        let mut missile = Missile::fire(&mut scene, Rect::new(0.0, 30.0, 40.0, 30.0)).unwrap();
        missile.advance(&mut scene);
        assert_eq!(missile.y, 15.0);
        assert!(!missile.is_off_screen());
    }

    #[test]
    fn test_missile_off_screen_only_below_zero() {
        let mut scene = Scene::default();
        let mut missile = Missile::fire(&mut scene, Rect::new(0.0, 15.0, 40.0, 30.0)).unwrap();
        assert_eq!(missile.y, 5.0);
        missile.advance(&mut scene);
        assert_eq!(missile.y, 0.0);
        assert!(!missile.is_off_screen());
        missile.advance(&mut scene);
        assert!(missile.is_off_screen());
    }

    #[test]
    fn test_destroy_removes_sprite() {
        let mut scene = Scene::default();
        let missile = Missile::fire(&mut scene, Rect::new(0.0, 300.0, 40.0, 30.0)).unwrap();
        missile.destroy(&mut scene);
        assert!(scene.is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_missile_y_strictly_decreases(
                origin_x in 0.0f64..660.0,
                origin_y in 50.0f64..660.0,
                ticks in 1usize..200,
            ) {
                let mut scene = Scene::default();
                let mut missile = Missile::fire(&mut scene, Rect::new(origin_x, origin_y, 40.0, 40.0)).unwrap();
                for _ in 0..ticks {
                    if missile.is_off_screen() {
                        break;
                    }
                    let before = missile.y;
                    missile.advance(&mut scene);
                    prop_assert!(missile.y < before);
                }
            }
        }
    }
}
