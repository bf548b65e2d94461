//! Agent collision settings

use serde::{Deserialize, Serialize};

use crate::config::Config;
use super::collider::ColliderError;

/// Capsule envelope and push-out tuning for one agent.
///
/// Plain value type: copied and read per query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionSettings {
    /// Capsule radius (> 0)
    pub radius: f32,
    /// Height of the capsule segment's top above the agent origin (> 0)
    pub height: f32,
    /// Scale applied to each push-out (>= 0, normally 1.0)
    pub push_out_multiplier: f32,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            radius: 0.8,
            height: 1.6,
            push_out_multiplier: 1.0,
        }
    }
}

impl Config for CollisionSettings {}

impl CollisionSettings {
    /// Create settings with the default push-out multiplier
    pub fn new(radius: f32, height: f32) -> Self {
        Self {
            radius,
            height,
            ..Default::default()
        }
    }

    /// Set the push-out multiplier
    pub fn with_push_out_multiplier(mut self, multiplier: f32) -> Self {
        self.push_out_multiplier = multiplier;
        self
    }

    /// Reject values that would make the resolver produce NaNs or nonsense
    pub fn validate(&self) -> Result<(), ColliderError> {
        require_positive("radius", self.radius)?;
        require_positive("height", self.height)?;
        if !self.push_out_multiplier.is_finite() || self.push_out_multiplier < 0.0 {
            return Err(ColliderError::InvalidSettings {
                field: "push_out_multiplier",
                value: self.push_out_multiplier,
            });
        }
        if self.height < self.radius {
            log::debug!(
                "Capsule height {} is below radius {}; segment points downward",
                self.height,
                self.radius
            );
        }
        Ok(())
    }
}

/// Check that a setting is finite and strictly positive
pub(crate) fn require_positive(field: &'static str, value: f32) -> Result<(), ColliderError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ColliderError::InvalidSettings { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = CollisionSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.radius, 0.8);
        assert_eq!(settings.push_out_multiplier, 1.0);
    }

    #[test]
    fn test_validate_rejects_degenerate_values() {
        let err = CollisionSettings::new(0.0, 1.6).validate().unwrap_err();
        assert!(matches!(err, ColliderError::InvalidSettings { field: "radius", .. }));

        let err = CollisionSettings::new(0.5, -1.0).validate().unwrap_err();
        assert!(matches!(err, ColliderError::InvalidSettings { field: "height", .. }));

        let err = CollisionSettings::new(f32::NAN, 1.0).validate().unwrap_err();
        assert!(matches!(err, ColliderError::InvalidSettings { field: "radius", .. }));

        let err = CollisionSettings::default()
            .with_push_out_multiplier(-0.5)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ColliderError::InvalidSettings { field: "push_out_multiplier", .. }));
    }

    #[test]
    fn test_settings_round_trip_ron_and_toml() {
        let settings = CollisionSettings::new(1.2, 2.0).with_push_out_multiplier(1.5);

        let ron_text = settings.to_string_as(ConfigFormat::Ron).unwrap();
        assert_eq!(CollisionSettings::from_str_as(&ron_text, ConfigFormat::Ron).unwrap(), settings);

        let partial = CollisionSettings::from_str_as("radius = 0.5\n", ConfigFormat::Toml).unwrap();
        assert_eq!(partial.radius, 0.5);
        assert_eq!(partial.height, 1.6);
    }

    #[test]
    fn test_settings_file_io() {
        let path = std::env::temp_dir().join(format!("arcade_collision_settings_{}.toml", std::process::id()));
        let settings = CollisionSettings::new(0.6, 1.4);
        settings.save_to_file(&path).unwrap();
        let loaded = CollisionSettings::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, settings);
    }
}
