//! Data-driven movement and world balance
//!
//! Loaded from JSON at startup so numbers can be iterated on without a
//! recompile. Missing fields fall back to the compiled-in defaults.

use serde::{Deserialize, Serialize};

use crate::sim::player::ColliderShape;

/// All gameplay tunables in one place
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Locomotion ===
    /// Cruise speed along the travel axis once the run starts
    pub forward_speed: f32,
    /// Lateral interpolation rate toward the target rail (per second)
    pub horizontal_speed: f32,
    /// Upward impulse applied on jump
    pub jump_force: f32,
    /// Extra downward acceleration while airborne
    pub extra_gravity: f32,
    /// Lateral offset of the side rails from the middle one
    pub lane_spacing: f32,
    /// Seconds before a slide's collision envelope is restored
    pub slide_duration: f32,

    // === Collider ===
    /// Capsule while running upright
    pub run_collider: ColliderShape,
    /// Capsule while sliding
    pub slide_collider: ColliderShape,

    // === World ===
    /// Travel-axis distance between segment origins
    pub segment_length: f32,
    /// Pre-placed segments seeding the active window
    pub initial_segments: usize,
    /// Distinct segment prefab variants in rotation
    pub segment_variants: usize,
    /// Instances pre-built per prop kind
    pub prop_pool_size: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            forward_speed: 50.0,
            horizontal_speed: 10.0,
            jump_force: 25.0,
            extra_gravity: 40.0,
            lane_spacing: 1.6,
            slide_duration: 1.0,

            run_collider: ColliderShape {
                center_y: 0.5,
                height: 1.7,
            },
            slide_collider: ColliderShape {
                center_y: 0.35,
                height: 0.8,
            },

            segment_length: 90.0,
            initial_segments: 3,
            segment_variants: 5,
            prop_pool_size: 5,
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file, falling back to defaults if the file
    /// is missing or malformed
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(err) => {
                    log::warn!("Malformed tuning file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No tuning file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write the current tuning to a JSON file
    pub fn save_to(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Tuning saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let tuning = Tuning::default();
        assert!(tuning.forward_speed > 0.0);
        assert!(tuning.slide_duration > 0.0);
        assert!(tuning.slide_collider.height < tuning.run_collider.height);
        assert!(tuning.segment_variants > 0);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{ "forward_speed": 72.0 }"#).unwrap();
        assert_eq!(tuning.forward_speed, 72.0);
        assert_eq!(tuning.segment_length, Tuning::default().segment_length);
    }
}
