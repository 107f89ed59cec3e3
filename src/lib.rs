// Library exports for the binary and integration tests
pub use app::{App, Screen};
pub use assets::{AssetCatalog, SpriteName};
pub use audio::{AudioManager, DEFAULT_MUSIC};
pub use config::{Cheats, GameConfig, KeyBindings};
pub use entities::{
    AttackPhase, AttackStatus, AttackTiming, BossAttack, Enemy, EnemyKind, Missile, PoseCycle,
    Ship,
};
pub use geometry::Rect;
pub use input::{InputAction, InputManager};
pub use menu::TopMenu;
pub use scene::{Fill, Node, NodeId, Scene};
pub use session::{Boundaries, Controls, GameSession, Level, Outcome};
pub use timer::IntervalTimer;

pub mod app;
pub mod assets;
pub mod audio;
pub mod config;
pub mod entities;
pub mod geometry;
pub mod input;
pub mod menu;
pub mod renderer;
pub mod scene;
pub mod session;
pub mod timer;
