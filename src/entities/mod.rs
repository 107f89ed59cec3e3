mod boss_attack;
mod enemy;
mod missile;
mod pose;
mod ship;

// Re-export all public types
pub use boss_attack::{AttackPhase, AttackStatus, AttackTiming, BossAttack};
pub use enemy::{Enemy, EnemyKind};
pub use missile::{MISSILE_SPEED, Missile};
pub use pose::PoseCycle;
pub use ship::Ship;
