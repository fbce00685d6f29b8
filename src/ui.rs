//! HUD state driven purely by simulation events
//!
//! The core never queries the UI; the HUD folds `GameEvent`s into whatever
//! the host overlay needs to show.

use crate::palette;
use crate::sim::GameEvent;

/// Which overlay screen should be visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Hud,
    Pause,
    GameOver,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score: u64,
    pub weapon_level: u32,
    pub shielded: bool,
    pub screen: Screen,
    /// Score shown on the game over screen
    pub final_score: Option<u64>,
}

impl Default for Hud {
    fn default() -> Self {
        Self {
            score: 0,
            weapon_level: 1,
            shielded: false,
            screen: Screen::Start,
            final_score: None,
        }
    }
}

impl Hud {
    pub fn apply(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::Started => {
                *self = Self {
                    screen: Screen::Hud,
                    ..Self::default()
                };
            }
            GameEvent::Paused => self.screen = Screen::Pause,
            GameEvent::Resumed => self.screen = Screen::Hud,
            GameEvent::GameOver { score } => {
                self.screen = Screen::GameOver;
                self.final_score = Some(score);
            }
            GameEvent::ScoreChanged { score } => self.score = score,
            GameEvent::WeaponLevelChanged { level } => self.weapon_level = level,
            GameEvent::ShieldChanged { active } => self.shielded = active,
            GameEvent::Sound { .. } => {}
        }
    }

    pub fn apply_all(&mut self, events: &[GameEvent]) {
        for event in events {
            self.apply(event);
        }
    }

    /// Label for the weapon level readout
    pub fn weapon_label(&self) -> String {
        format!("LV.{}", self.weapon_level)
    }

    /// Weapon label color tier
    pub fn weapon_color(&self) -> u32 {
        match self.weapon_level {
            0..5 => palette::WHITE,
            5..10 => palette::CYAN,
            10..20 => palette::PURPLE,
            _ => palette::YELLOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_flow() {
        let mut hud = Hud::default();
        assert_eq!(hud.screen, Screen::Start);

        hud.apply_all(&[
            GameEvent::Started,
            GameEvent::ScoreChanged { score: 12 },
            GameEvent::WeaponLevelChanged { level: 6 },
            GameEvent::Paused,
        ]);
        assert_eq!(hud.screen, Screen::Pause);
        assert_eq!(hud.score, 12);
        assert_eq!(hud.weapon_label(), "LV.6");

        hud.apply_all(&[GameEvent::Resumed, GameEvent::GameOver { score: 12 }]);
        assert_eq!(hud.screen, Screen::GameOver);
        assert_eq!(hud.final_score, Some(12));

        hud.apply(&GameEvent::Started);
        assert_eq!(hud.score, 0);
        assert_eq!(hud.final_score, None);
    }

    #[test]
    fn test_weapon_color_tiers() {
        let mut hud = Hud::default();
        let cases = [(1, palette::WHITE), (5, palette::CYAN), (10, palette::PURPLE), (20, palette::YELLOW)];
        for (level, color) in cases {
            hud.weapon_level = level;
            assert_eq!(hud.weapon_color(), color, "level {level}");
        }
    }
}
