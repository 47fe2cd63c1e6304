//! Tracer and integrator settings.

use serde::{Deserialize, Serialize};

/// Path integrator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    /// Maximum number of surface interactions per path
    pub max_bounces: u32,
    /// Reflect with Fresnel probability before the material branches
    pub fresnel_reflection: bool,
    /// Sample lights directly on rough metal bounces
    pub specular_light_sampling: bool,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            max_bounces: 5,
            fresnel_reflection: false,
            specular_light_sampling: false,
        }
    }
}

/// Tracer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Render worker threads
    pub workers: usize,
    /// Base seed for the worker generators; entropy when unset
    pub seed: Option<u64>,
    pub integrator: IntegratorConfig,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            workers: 8,
            seed: None,
            integrator: IntegratorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: TracerConfig =
            serde_json::from_str(r#"{ "width": 64, "integrator": { "max_bounces": 2 } }"#)
                .expect("valid config");
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 400);
        assert_eq!(config.workers, 8);
        assert_eq!(config.seed, None);
        assert_eq!(config.integrator.max_bounces, 2);
        assert!(!config.integrator.fresnel_reflection);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = TracerConfig {
            seed: Some(7),
            ..TracerConfig::default()
        };
        let json = serde_json::to_string(&config).expect("serializable");
        let back: TracerConfig = serde_json::from_str(&json).expect("parses back");
        assert_eq!(back, config);
    }
}
