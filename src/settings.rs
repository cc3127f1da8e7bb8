//! Display settings and preferences
//!
//! Owned by the world so input toggles can flip them mid-run; the host
//! decides whether and where to persist them.

use serde::{Deserialize, Serialize};

/// Display settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // === HUD ===
    /// Show score, combo, and effect timers
    pub show_hud: bool,

    // === Visual Effects ===
    /// Screen shake intensity (0.0 - 1.0)
    pub screen_shake: f32,

    // === Accessibility ===
    /// Reduced motion (suppresses shake)
    pub reduced_motion: bool,
    /// High contrast mode
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_hud: true,
            screen_shake: 1.0,
            reduced_motion: false,
            high_contrast: false,
        }
    }
}

impl Settings {
    /// Shake scale after accessibility settings are applied
    pub fn effective_screen_shake(&self) -> f32 {
        if self.reduced_motion {
            0.0
        } else {
            self.screen_shake.clamp(0.0, 1.0)
        }
    }
}
