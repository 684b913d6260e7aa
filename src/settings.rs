//! Player preferences
//!
//! Persisted separately from session saves, under their own key.

use serde::{Deserialize, Serialize};

use crate::sim::state::EffectToggles;

/// How much explosion debris the device can afford
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Live debris particles allowed at once
    pub fn particle_budget(self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 250,
            QualityPreset::High => 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub quality: QualityPreset,
    /// Shake the view when a bug reaches the rocket
    pub screen_shake: bool,
    /// Explosion debris on kills and hits
    pub particles: bool,
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub muted: bool,
    /// Overrides `screen_shake`
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::default(),
            screen_shake: true,
            particles: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn shake_enabled(&self) -> bool {
        !self.reduced_motion && self.screen_shake
    }

    /// Zero when debris is switched off
    pub fn particle_cap(&self) -> usize {
        match self.particles {
            true => self.quality.particle_budget(),
            false => 0,
        }
    }

    /// Gain applied to every sound effect
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Cosmetic switches handed to the simulation
    pub fn effect_toggles(&self) -> EffectToggles {
        EffectToggles {
            screen_shake: self.shake_enabled(),
            max_particles: self.particle_cap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_disables_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effect_toggles().screen_shake);
    }

    #[test]
    fn test_particles_off_means_zero_cap() {
        let settings = Settings {
            particles: false,
            quality: QualityPreset::High,
            ..Default::default()
        };
        assert_eq!(settings.particle_cap(), 0);
    }

    #[test]
    fn test_volume() {
        let mut settings = Settings::default();
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_partial_record_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"quality":"high"}"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::High);
        assert!(settings.screen_shake);
        assert_eq!(settings.particle_cap(), 400);
    }
}
