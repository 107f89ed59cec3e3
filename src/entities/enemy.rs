use color_eyre::Result;
use rand::Rng;

use super::pose::PoseCycle;
use crate::geometry::Rect;
use crate::scene::{NodeId, Scene};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyKind {
    /// Wave enemy: one hit, snakes down the screen
    Metroid,
    /// Boss: several hits, wanders side to side
    Boss,
}

impl EnemyKind {
    pub fn initial_health(&self) -> i32 {
        match self {
            EnemyKind::Metroid => 1,
            EnemyKind::Boss => 5,
        }
    }

    pub fn speed(&self) -> f64 {
        match self {
            EnemyKind::Metroid => 2.5,
            EnemyKind::Boss => 2.5,
        }
    }

    pub fn total_poses(&self) -> u32 {
        match self {
            EnemyKind::Metroid => 2,
            EnemyKind::Boss => 3,
        }
    }

    /// Per-frame chance of a spontaneous direction flip.
    pub fn direction_change_chance(&self) -> f64 {
        match self {
            EnemyKind::Metroid => 0.0,
            EnemyKind::Boss => 0.02,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub x: f64,
    pub y: f64,
    /// +1 moving right, -1 moving left
    pub direction: f64,
    pub health: i32,
    pub width: f64,
    pub height: f64,
    pose: PoseCycle,
    node: Option<NodeId>,
}

impl Enemy {
    /// Puts the enemy on screen. The image name must follow the
    /// `<base>_<pose><ext>` convention so the pose can be cycled later.
    pub fn spawn(scene: &mut Scene, kind: EnemyKind, x: f64, y: f64, image: &str) -> Result<Self> {
        let pose = PoseCycle::from_image(image, kind.total_poses())?;
        let node = scene.add_sprite(image, x, y)?;
        let asset = scene.asset(image)?;

        Ok(Self {
            kind,
            x,
            y,
            direction: 1.0,
            health: kind.initial_health(),
            width: asset.width,
            height: asset.height,
            pose,
            node: Some(node),
        })
    }

    pub fn pose(&self) -> &PoseCycle {
        &self.pose
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Swaps to the next animation frame in place.
    pub fn advance_pose(&mut self, scene: &mut Scene) -> Result<()> {
        let Some(old) = self.node else {
            return Ok(());
        };
        self.pose.advance();
        let image = self.pose.image();
        let node = scene.add_sprite(&image, self.x, self.y)?;
        scene.remove(old);
        self.node = Some(node);

        let asset = scene.asset(&image)?;
        self.width = asset.width;
        self.height = asset.height;
        Ok(())
    }

    /// One hit. Returns whether the enemy survived; a dead enemy is already
    /// off screen and only needs dropping from its collection.
    pub fn apply_damage(&mut self, scene: &mut Scene) -> bool {
        self.health -= 1;
        if self.health <= 0 {
            self.remove(scene);
            return false;
        }
        true
    }

    pub fn reverse_direction(&mut self) {
        self.direction = -self.direction;
    }

    pub fn remove(&mut self, scene: &mut Scene) {
        if let Some(node) = self.node.take() {
            scene.remove(node);
        }
    }

    pub fn set_x(&mut self, scene: &mut Scene, x: f64) {
        self.x = x;
        self.sync(scene);
    }

    /// Metroid drift.
    pub fn update_position_horizontal(&mut self, scene: &mut Scene) {
        self.x += self.direction * self.kind.speed();
        self.sync(scene);
    }

    /// Metroid wall response: drop one sprite height and turn around.
    pub fn update_position_vertical(&mut self, scene: &mut Scene) {
        self.y += self.height;
        self.sync(scene);
        self.reverse_direction();
    }

    /// Boss movement with a random chance of turning around.
    pub fn update_position<R: Rng>(&mut self, scene: &mut Scene, rng: &mut R) {
        self.x += self.direction * self.kind.speed();
        self.sync(scene);
        if rng.random_bool(self.kind.direction_change_chance()) {
            self.reverse_direction();
        }
    }

    fn sync(&self, scene: &mut Scene) {
        if let Some(node) = self.node {
            scene.set_position(node, self.x, self.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{BOSS, METROID_DARK, METROID_LIGHT};
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_enemy_health_by_kind() {
        let mut scene = Scene::default();
        let metroid = Enemy::spawn(&mut scene, EnemyKind::Metroid, 0.0, 0.0, METROID_LIGHT).unwrap();
        assert_eq!(metroid.health, 1);

        let boss = Enemy::spawn(&mut scene, EnemyKind::Boss, 0.0, 0.0, BOSS).unwrap();
        assert_eq!(boss.health, 5);
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_spawn_rejects_names_without_pose() {
        let mut scene = Scene::default();
        assert!(Enemy::spawn(&mut scene, EnemyKind::Metroid, 0.0, 0.0, "missile.png").is_err());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_boss_dies_after_exactly_five_hits() {
        let mut scene = Scene::default();
        let mut boss = Enemy::spawn(&mut scene, EnemyKind::Boss, 350.0, 0.0, BOSS).unwrap();
        for _ in 0..4 {
            assert!(boss.apply_damage(&mut scene));
        }
        assert!(boss.is_alive());
        assert_eq!(scene.len(), 1);

        assert!(!boss.apply_damage(&mut scene));
        assert!(!boss.is_alive());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_advance_pose_swaps_sprite_in_place() {
        let mut scene = Scene::default();
        let mut metroid =
            Enemy::spawn(&mut scene, EnemyKind::Metroid, 60.0, 70.0, METROID_DARK).unwrap();
        let before = metroid.node().unwrap();

        metroid.advance_pose(&mut scene).unwrap();

        let after = metroid.node().unwrap();
        assert_ne!(before, after);
        assert!(!scene.contains(before));
        assert_eq!(metroid.pose().current(), 1);
        assert_eq!(scene.bounds(after).unwrap().x, 60.0);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_metroid_drops_and_reverses() {
        let mut scene = Scene::default();
        let mut metroid =
            Enemy::spawn(&mut scene, EnemyKind::Metroid, 100.0, 50.0, METROID_LIGHT).unwrap();
        metroid.update_position_horizontal(&mut scene);
        assert_eq!(metroid.x, 102.5);

        metroid.update_position_vertical(&mut scene);
        assert_eq!(metroid.y, 50.0 + metroid.height);
        assert_eq!(metroid.direction, -1.0);

        metroid.update_position_horizontal(&mut scene);
        assert_eq!(metroid.x, 100.0);
        assert_eq!(scene.bounds(metroid.node().unwrap()).unwrap().y, metroid.y);
    }

    #[test]
    fn test_boss_moves_horizontally_only() {
        let mut scene = Scene::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut boss = Enemy::spawn(&mut scene, EnemyKind::Boss, 350.0, 0.0, BOSS).unwrap();
        for _ in 0..100 {
            let x = boss.x;
            boss.update_position(&mut scene, &mut rng);
            assert_eq!((boss.x - x).abs(), 2.5);
            assert_eq!(boss.y, 0.0);
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_enemy_survives_fewer_hits_than_health(
                kind in prop::sample::select(vec![EnemyKind::Metroid, EnemyKind::Boss]),
                missing in 1i32..5,
            ) {
                let mut scene = Scene::default();
                let image = match kind {
                    EnemyKind::Metroid => METROID_LIGHT,
                    EnemyKind::Boss => BOSS,
                };
                let mut enemy = Enemy::spawn(&mut scene, kind, 0.0, 0.0, image).unwrap();
                let hits = (kind.initial_health() - missing).max(0);
                for _ in 0..hits {
                    enemy.apply_damage(&mut scene);
                }
                prop_assert!(enemy.is_alive());
                prop_assert_eq!(scene.len(), 1);
            }
        }
    }
}
