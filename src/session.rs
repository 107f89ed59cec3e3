use color_eyre::Result;
use rand::{SeedableRng, rngs::StdRng};
use std::collections::BTreeSet;
use tracing::{debug, info, trace};

use crate::assets::{AssetCatalog, BLASTER, BOSS, GAME_WON, METROID_DARK, METROID_LIGHT};
use crate::config::{Cheats, GameConfig};
use crate::entities::{AttackStatus, AttackTiming, BossAttack, Enemy, EnemyKind, Missile, Ship};
use crate::geometry::Rect;
use crate::scene::{Fill, NodeId, Scene};
use crate::timer::IntervalTimer;

const BORDER_THICKNESS: f64 = 5.0;
/// Gap between the wave's first column/row and the screen edge
const WAVE_OFFSET: f64 = 50.0;
/// Ship starts this far above the bottom of the screen in the wave level
const SHIP_BOTTOM_MARGIN: f64 = 50.0;
const WIN_TEXT: &str = "YOU WIN!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Rows of metroids
    Wave,
    Boss,
    /// Nothing left to fight on this screen
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Lost,
    Won,
}

/// Buttons the player may use while the loop is frozen or the wave is cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub proceed_to_boss: bool,
    pub restart: bool,
}

/// Walls the ship cannot cross, plus the off-screen side walls enemies
/// bounce off.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Boundaries {
    pub top: Rect,
    pub bottom: Rect,
    pub left: Rect,
    pub right: Rect,
    pub wall_left: Rect,
    pub wall_right: Rect,
}

impl Boundaries {
    /// `offset` insets the ship's box from the screen edges and
    /// `top_multiplier` places its ceiling as a fraction of the height.
    pub fn new(width: f64, height: f64, offset: f64, top_multiplier: f64) -> Self {
        let top_y = top_multiplier * height;
        let bottom_y = height - offset - BORDER_THICKNESS;
        let box_height = bottom_y - top_y;
        let box_width = width - 2.0 * offset;
        let right_x = width - offset - BORDER_THICKNESS;

        Self {
            top: Rect::new(offset, top_y, box_width, BORDER_THICKNESS),
            bottom: Rect::new(offset, bottom_y, box_width, BORDER_THICKNESS),
            left: Rect::new(offset, top_y, BORDER_THICKNESS, box_height),
            right: Rect::new(right_x, top_y, BORDER_THICKNESS, box_height),
            wall_left: Rect::new(-BORDER_THICKNESS, 0.0, BORDER_THICKNESS, height),
            wall_right: Rect::new(width, 0.0, BORDER_THICKNESS, height),
        }
    }
}

/// One run of the game: everything on screen and every rule that moves it.
/// Call [`GameSession::step`] once per tick.
pub struct GameSession {
    config: GameConfig,
    cheats: Cheats,
    scene: Scene,
    ship: Ship,
    metroids: Vec<Enemy>,
    boss: Option<Enemy>,
    missiles: Vec<Missile>,
    attacks: Vec<BossAttack>,
    /// Key names currently held down
    held: BTreeSet<String>,
    bounds: Boundaries,
    bound_nodes: Vec<NodeId>,
    overlay: Vec<NodeId>,
    level: Level,
    outcome: Outcome,
    /// False once the game is won or lost; `step` is then a no-op
    running: bool,
    controls: Controls,
    clock_ms: u64,
    fire_timer: IntervalTimer,
    attack_timer: IntervalTimer,
    boss_pose_timer: IntervalTimer,
    metroid_pose_timer: IntervalTimer,
    rng: StdRng,
}

impl GameSession {
    /// Builds the session and sets up the wave level.
    pub fn new(config: GameConfig, cheats: Cheats) -> Result<Self> {
        let scene = Scene::new(AssetCatalog::builtin());
        let ship = Ship::new(&scene)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut session = Self {
            fire_timer: IntervalTimer::new(config.missile_interval_ms),
            attack_timer: IntervalTimer::new(config.attack_interval_ms),
            boss_pose_timer: IntervalTimer::new(config.boss_pose_interval_ms),
            metroid_pose_timer: IntervalTimer::new(config.metroid_pose_interval_ms),
            bounds: Boundaries::new(config.width, config.height, 0.0, 0.8),
            config,
            cheats: Cheats::default(),
            scene,
            ship,
            metroids: Vec::new(),
            boss: None,
            missiles: Vec::new(),
            attacks: Vec::new(),
            held: BTreeSet::new(),
            bound_nodes: Vec::new(),
            overlay: Vec::new(),
            level: Level::Wave,
            outcome: Outcome::InProgress,
            running: true,
            controls: Controls::default(),
            clock_ms: 0,
            rng,
        };
        session.set_cheats(cheats);
        session.setup_wave_level()?;
        Ok(session)
    }

    pub fn set_cheats(&mut self, cheats: Cheats) {
        self.cheats = cheats;
        self.fire_timer.interval_ms = if cheats.rapid_fire {
            self.config.rapid_fire_interval_ms
        } else {
            self.config.missile_interval_ms
        };
        if cheats.rapid_fire || cheats.invincible {
            info!(?cheats, "cheats active");
        }
    }

    pub fn key_pressed(&mut self, key: &str) {
        if !self.held.contains(key) {
            self.held.insert(key.to_string());
        }
    }

    pub fn key_released(&mut self, key: &str) {
        self.held.remove(key);
    }

    /// "First Level Again". Only available after a loss.
    pub fn restart(&mut self) -> Result<bool> {
        if !self.controls.restart {
            return Ok(false);
        }
        self.setup_wave_level()?;
        Ok(true)
    }

    /// "Boss Stage". Available once the wave is cleared, or after losing to the boss.
    pub fn proceed_to_boss(&mut self) -> Result<bool> {
        if !self.controls.proceed_to_boss {
            return Ok(false);
        }
        self.setup_boss_level()?;
        Ok(true)
    }

    /// Advances the game by one tick.
    pub fn step(&mut self) -> Result<()> {
        if !self.running {
            return Ok(());
        }
        self.clock_ms += self.config.tick_millis;

        self.update_missiles();
        self.check_bounding_box();
        self.update_ship()?;

        match self.level {
            Level::Wave => self.move_metroids()?,
            Level::Boss => {
                self.attack()?;
                self.move_boss()?;
            }
            Level::Cleared => {}
        }

        match self.level {
            Level::Wave => {
                self.check_metroid_top_collision();
                self.check_metroid_missile_collision();
            }
            Level::Boss => {
                self.check_attack_collision();
                self.check_boss_missile_collision();
            }
            Level::Cleared => {}
        }

        self.check_level_progression();
        self.check_game_condition()
    }

    fn setup_wave_level(&mut self) -> Result<()> {
        self.tear_down();
        self.reset_round();

        let x = self.config.width / 2.0 - self.ship.width / 2.0;
        let y = self.config.height - self.ship.height - SHIP_BOTTOM_MARGIN;
        self.ship.show_at(&mut self.scene, x, y)?;

        self.create_bounds(0.0, 4.0 / 5.0);
        self.spawn_metroids()?;
        self.level = Level::Wave;
        info!(metroids = self.metroids.len(), "wave level started");
        Ok(())
    }

    fn setup_boss_level(&mut self) -> Result<()> {
        self.tear_down();
        self.reset_round();

        let x = self.config.width / 2.0 - self.ship.width / 2.0;
        let y = self.config.height / 2.0 - self.ship.height / 2.0;
        self.ship.show_at(&mut self.scene, x, y)?;

        self.create_bounds(60.0, 1.0 / 4.0);
        self.boss = Some(Enemy::spawn(
            &mut self.scene,
            EnemyKind::Boss,
            self.config.width / 2.0,
            0.0,
            BOSS,
        )?);
        self.level = Level::Boss;
        info!("boss level started");
        Ok(())
    }

    fn reset_round(&mut self) {
        self.running = true;
        self.outcome = Outcome::InProgress;
        self.attack_timer.reset();
        self.boss_pose_timer.reset();
        self.metroid_pose_timer.reset();
    }

    fn spawn_metroids(&mut self) -> Result<()> {
        let mut spawn_y = WAVE_OFFSET;
        for row in 0..self.config.enemy_rows {
            let image = if row % 2 == 0 {
                METROID_LIGHT
            } else {
                METROID_DARK
            };
            let mut spawn_x = WAVE_OFFSET;
            let mut row_height = 0.0;
            for _ in 0..self.config.enemy_columns {
                let metroid =
                    Enemy::spawn(&mut self.scene, EnemyKind::Metroid, spawn_x, spawn_y, image)?;
                spawn_x += metroid.width;
                row_height = metroid.height;
                self.metroids.push(metroid);
            }
            spawn_y += row_height * 2.0;
        }
        Ok(())
    }

    fn create_bounds(&mut self, offset: f64, top_multiplier: f64) {
        for node in self.bound_nodes.drain(..) {
            self.scene.remove(node);
        }
        self.bounds = Boundaries::new(self.config.width, self.config.height, offset, top_multiplier);
        for rect in [
            self.bounds.top,
            self.bounds.bottom,
            self.bounds.left,
            self.bounds.right,
        ] {
            self.bound_nodes.push(self.scene.add_shape(rect, Fill::Boundary));
        }
    }

    /// Removes every entity, wall and overlay from the screen.
    fn tear_down(&mut self) {
        for metroid in &mut self.metroids {
            metroid.remove(&mut self.scene);
        }
        self.metroids.clear();

        for missile in self.missiles.drain(..) {
            missile.destroy(&mut self.scene);
        }

        if let Some(mut boss) = self.boss.take() {
            boss.remove(&mut self.scene);
        }

        for mut attack in self.attacks.drain(..) {
            attack.clean_up(&mut self.scene);
        }

        self.ship.hide(&mut self.scene);
        for node in self.bound_nodes.drain(..).chain(self.overlay.drain(..)) {
            self.scene.remove(node);
        }
        self.controls = Controls::default();
    }

    fn update_missiles(&mut self) {
        let scene = &mut self.scene;
        for missile in &mut self.missiles {
            missile.advance(scene);
        }
        self.missiles.retain(|missile| {
            if missile.is_off_screen() {
                missile.destroy(scene);
                return false;
            }
            true
        });
    }

    /// A held direction key is dropped as soon as the ship touches the wall it
    /// points at; the player has to press it again after backing off.
    fn check_bounding_box(&mut self) {
        let ship = self.ship.bounds();
        let keys = &self.config.keys;
        for (bound, key) in [
            (self.bounds.top, &keys.up),
            (self.bounds.bottom, &keys.down),
            (self.bounds.left, &keys.left),
            (self.bounds.right, &keys.right),
        ] {
            if bound.intersects(&ship) {
                self.held.remove(key.as_str());
            }
        }
    }

    fn update_ship(&mut self) -> Result<()> {
        let speed = self.config.ship_speed;
        let keys = &self.config.keys;
        let mut dx = 0.0;
        let mut dy = 0.0;
        if self.held.contains(&keys.up) {
            dy -= speed;
        }
        if self.held.contains(&keys.left) {
            dx -= speed;
        }
        if self.held.contains(&keys.down) {
            dy += speed;
        }
        if self.held.contains(&keys.right) {
            dx += speed;
        }
        if dx != 0.0 || dy != 0.0 {
            self.ship.move_by(&mut self.scene, dx, dy);
        }

        if self.held.contains(&keys.fire) && self.fire_timer.try_fire(self.clock_ms) {
            let missile = Missile::fire(&mut self.scene, self.ship.bounds())?;
            trace!(x = missile.x, y = missile.y, "missile fired");
            self.missiles.push(missile);
        }
        Ok(())
    }

    fn move_metroids(&mut self) -> Result<()> {
        for metroid in &mut self.metroids {
            let bounds = metroid.bounds();
            if bounds.intersects(&self.bounds.wall_left) || bounds.intersects(&self.bounds.wall_right)
            {
                metroid.update_position_vertical(&mut self.scene);
            }
            metroid.update_position_horizontal(&mut self.scene);
        }

        if self.metroid_pose_timer.try_fire(self.clock_ms) {
            for metroid in &mut self.metroids {
                metroid.advance_pose(&mut self.scene)?;
            }
        }
        Ok(())
    }

    fn attack(&mut self) -> Result<()> {
        if self.attacks.len() < self.config.max_concurrent_attacks
            && self.attack_timer.try_fire(self.clock_ms)
        {
            let timing = AttackTiming {
                delay_ms: self.config.beam_delay_ms,
                duration_ms: self.config.beam_duration_ms,
                thickness: self.config.beam_thickness,
            };
            let mut attack =
                BossAttack::new(&self.scene, self.ship.y, self.config.width, BLASTER, timing)?;
            attack.begin(&mut self.scene, self.clock_ms)?;
            debug!(y = self.ship.y, live = self.attacks.len() + 1, "boss attack started");
            self.attacks.push(attack);
        }

        let mut finished = Vec::new();
        for (idx, attack) in self.attacks.iter_mut().enumerate() {
            if attack.progress(&mut self.scene, self.clock_ms)? == AttackStatus::Finished {
                finished.push(idx);
            }
        }
        for idx in finished.into_iter().rev() {
            self.attacks.remove(idx);
        }
        Ok(())
    }

    fn move_boss(&mut self) -> Result<()> {
        let Some(boss) = self.boss.as_mut() else {
            return Ok(());
        };

        if boss.bounds().intersects(&self.bounds.wall_left) {
            boss.set_x(&mut self.scene, 1.0);
            boss.reverse_direction();
        }
        if boss.bounds().intersects(&self.bounds.wall_right) {
            let x = self.config.width - boss.width - 1.0;
            boss.set_x(&mut self.scene, x);
            boss.reverse_direction();
        }

        boss.update_position(&mut self.scene, &mut self.rng);

        if self.boss_pose_timer.try_fire(self.clock_ms) {
            boss.advance_pose(&mut self.scene)?;
        }
        Ok(())
    }

    fn check_attack_collision(&mut self) {
        let ship = self.ship.bounds();
        for attack in &mut self.attacks {
            if let Some(beam) = attack.beam_bounds()
                && beam.intersects(&ship)
            {
                attack.set_beam_red(&mut self.scene);
                if self.cheats.invincible {
                    continue;
                }
                if self.outcome != Outcome::Lost {
                    info!("ship hit by boss beam");
                }
                self.outcome = Outcome::Lost;
            }
        }
    }

    fn check_metroid_top_collision(&mut self) {
        if self
            .metroids
            .iter()
            .any(|metroid| metroid.bounds().intersects(&self.bounds.top))
        {
            info!("metroids reached the ship");
            self.outcome = Outcome::Lost;
        }
    }

    /// Resolves at most one metroid/missile hit per tick; further overlaps
    /// are picked up on the following ticks.
    fn check_metroid_missile_collision(&mut self) {
        let hit = self.metroids.iter().enumerate().find_map(|(m_idx, metroid)| {
            let bounds = metroid.bounds();
            self.missiles
                .iter()
                .position(|missile| missile.bounds().intersects(&bounds))
                .map(|p_idx| (m_idx, p_idx))
        });
        let Some((m_idx, p_idx)) = hit else {
            return;
        };

        if !self.metroids[m_idx].apply_damage(&mut self.scene) {
            self.metroids.remove(m_idx);
        }
        let missile = self.missiles.remove(p_idx);
        missile.destroy(&mut self.scene);
        debug!(left = self.metroids.len(), "metroid destroyed");
    }

    fn check_boss_missile_collision(&mut self) {
        let Some(boss) = self.boss.as_mut() else {
            return;
        };
        let boss_bounds = boss.bounds();

        let mut missiles_to_remove = Vec::new();
        for (idx, missile) in self.missiles.iter().enumerate() {
            if missile.bounds().intersects(&boss_bounds) {
                missiles_to_remove.push(idx);
            }
        }

        for idx in missiles_to_remove.into_iter().rev() {
            let missile = self.missiles.remove(idx);
            missile.destroy(&mut self.scene);
            if boss.is_alive() {
                boss.apply_damage(&mut self.scene);
                debug!(health = boss.health, "boss hit");
            }
        }
    }

    fn check_level_progression(&mut self) {
        match self.level {
            Level::Wave if self.metroids.is_empty() => {
                self.level = Level::Cleared;
                self.controls.proceed_to_boss = true;
                info!("wave cleared");
            }
            // A kill landing on the same tick a beam hits the ship still wins.
            Level::Boss if self.boss.as_ref().is_some_and(|boss| !boss.is_alive()) => {
                self.level = Level::Cleared;
                for mut attack in self.attacks.drain(..) {
                    attack.clean_up(&mut self.scene);
                }
                self.outcome = Outcome::Won;
            }
            _ => {}
        }
    }

    fn check_game_condition(&mut self) -> Result<()> {
        match self.outcome {
            Outcome::Lost => {
                self.running = false;
                if self.level == Level::Boss {
                    self.controls.proceed_to_boss = true;
                }
                self.controls.restart = true;
                info!(level = ?self.level, clock_ms = self.clock_ms, "game lost");
            }
            Outcome::Won => {
                self.running = false;
                self.tear_down();
                self.overlay.push(self.scene.add_sprite(GAME_WON, 0.0, 0.0)?);
                self.overlay.push(self.scene.add_label(
                    WIN_TEXT,
                    self.config.width / 2.0,
                    6.0 / 7.0 * self.config.height,
                ));
                info!(clock_ms = self.clock_ms, "game won");
            }
            Outcome::InProgress => {}
        }
        Ok(())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn cheats(&self) -> Cheats {
        self.cheats
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn metroids(&self) -> &[Enemy] {
        &self.metroids
    }

    pub fn boss(&self) -> Option<&Enemy> {
        self.boss.as_ref()
    }

    pub fn missiles(&self) -> &[Missile] {
        &self.missiles
    }

    pub fn attacks(&self) -> &[BossAttack] {
        &self.attacks
    }

    pub fn held_keys(&self) -> &BTreeSet<String> {
        &self.held
    }

    pub fn boundaries(&self) -> &Boundaries {
        &self.bounds
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }
}
