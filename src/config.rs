/// Key names the session understands for ship control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub up: String,
    pub left: String,
    pub down: String,
    pub right: String,
    pub fire: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: "W".to_string(),
            left: "A".to_string(),
            down: "S".to_string(),
            right: "D".to_string(),
            fire: "J".to_string(),
        }
    }
}

/// Tunables for one game session. The defaults are the shipped game; tests
/// shrink or stretch them to reach a scenario quickly.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// World size in world units (the terminal is scaled to fit)
    pub width: f64,
    pub height: f64,
    /// Length of one step in milliseconds (60 FPS)
    pub tick_millis: u64,
    pub enemy_rows: usize,
    pub enemy_columns: usize,
    pub ship_speed: f64,
    pub missile_interval_ms: u64,
    pub rapid_fire_interval_ms: u64,
    pub max_concurrent_attacks: usize,
    pub attack_interval_ms: u64,
    pub boss_pose_interval_ms: u64,
    pub metroid_pose_interval_ms: u64,
    pub beam_delay_ms: u64,
    pub beam_duration_ms: u64,
    pub beam_thickness: f64,
    /// Seed for the boss's random direction changes; `None` seeds from the OS
    pub seed: Option<u64>,
    pub keys: KeyBindings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 700.0,
            height: 700.0,
            tick_millis: 1000 / 60,
            enemy_rows: 2,
            enemy_columns: 9,
            ship_speed: 3.0,
            missile_interval_ms: 600,
            rapid_fire_interval_ms: 50,
            // The session spawns while fewer than this many attacks are live.
            max_concurrent_attacks: 4,
            attack_interval_ms: 700,
            boss_pose_interval_ms: 300,
            metroid_pose_interval_ms: 500,
            beam_delay_ms: 650,
            beam_duration_ms: 600,
            beam_thickness: 16.0,
            seed: None,
            keys: KeyBindings::default(),
        }
    }
}

/// Cheats unlocked on the title screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cheats {
    /// "BULLET": machine-gun fire rate
    pub rapid_fire: bool,
    /// "NOHIT": boss beams never end the game
    pub invincible: bool,
}
