use tracing::info;

use crate::config::Cheats;

pub const TITLE: &str = "MEGA INVADERS";
pub const INSTRUCTIONS: &str =
    "Move with the WASD keys\nand fire missiles using J.\nShoot all the enemies!";
pub const START_BUTTON: &str = "Start Game";

const RAPID_FIRE_CODE: &str = "BULLET";
const INVINCIBLE_CODE: &str = "NOHIT";

/// Colour of a cheat confirmation marker drawn in the corner of the title screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Red,
    Blue,
}

/// Title screen. Every key typed here is remembered so cheat words can be
/// spelled out before starting.
#[derive(Debug, Clone, Default)]
pub struct TopMenu {
    keys_entered: String,
    cheats: Cheats,
}

impl TopMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one key name and unlocks any cheat the typed keys now spell.
    /// Returns true when this key unlocked something new.
    pub fn key_entered(&mut self, key: &str) -> bool {
        self.keys_entered.push_str(key);
        let before = self.cheats;

        if self.keys_entered.contains(RAPID_FIRE_CODE) {
            self.cheats.rapid_fire = true;
        }
        if self.keys_entered.contains(INVINCIBLE_CODE) {
            self.cheats.invincible = true;
        }

        if self.cheats != before {
            info!(cheats = ?self.cheats, "cheat unlocked");
            return true;
        }
        false
    }

    pub fn cheats(&self) -> Cheats {
        self.cheats
    }

    pub fn keys_entered(&self) -> &str {
        &self.keys_entered
    }

    /// Markers in the order they are drawn, left to right.
    pub fn confirmations(&self) -> Vec<Marker> {
        let mut markers = Vec::new();
        if self.cheats.rapid_fire {
            markers.push(Marker::Red);
        }
        if self.cheats.invincible {
            markers.push(Marker::Blue);
        }
        markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_word(menu: &mut TopMenu, word: &str) {
        for c in word.chars() {
            menu.key_entered(&c.to_string());
        }
    }

    #[test]
    fn test_fresh_menu_has_no_cheats() {
        let menu = TopMenu::new();
        assert_eq!(menu.cheats(), Cheats::default());
        assert!(menu.confirmations().is_empty());
    }

    #[test]
    fn test_bullet_unlocks_rapid_fire() {
        let mut menu = TopMenu::new();
        type_word(&mut menu, "XXBULLE");
        assert!(!menu.cheats().rapid_fire);
        assert!(menu.key_entered("T"));
        assert!(menu.cheats().rapid_fire);
        assert!(!menu.cheats().invincible);
        assert_eq!(menu.confirmations(), vec![Marker::Red]);
    }

    #[test]
    fn test_both_cheats_unlock_independently() {
        let mut menu = TopMenu::new();
        type_word(&mut menu, "NOHITBULLET");
        assert!(menu.cheats().rapid_fire);
        assert!(menu.cheats().invincible);
        assert_eq!(menu.confirmations(), vec![Marker::Red, Marker::Blue]);
    }

    #[test]
    fn test_repeating_a_cheat_reports_nothing_new() {
        let mut menu = TopMenu::new();
        type_word(&mut menu, "NOHIT");
        type_word(&mut menu, "NOHI");
        assert!(!menu.key_entered("T"));
        assert_eq!(menu.keys_entered(), "NOHITNOHIT");
    }

    #[test]
    fn test_interrupted_word_does_not_unlock() {
        let mut menu = TopMenu::new();
        type_word(&mut menu, "NOHXIT");
        assert!(!menu.cheats().invincible);
    }
}
