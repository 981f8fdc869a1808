//! Engine configuration
//!
//! Layered configuration in the usual order: hard defaults, then an optional
//! `biblioteca.toml` in the working directory, then `BIBLIOTECA__*`
//! environment variables (e.g. `BIBLIOTECA__SIMULATION__READERS=25`).
//!
//! The simulation core assumes validated positive parameters; `load()` runs
//! [`EngineConfig::validate`] so nothing downstream has to re-check.

use crate::utils::errors::{EngineError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Simulation population and pool dimensions
    pub simulation: SimulationSettings,

    /// Hold (reading) duration settings
    pub hold: HoldSettings,

    /// Trace pipeline settings
    pub trace: TraceSettings,
}

/// Population and pool dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Number of concurrent readers (N)
    pub readers: usize,

    /// Number of libraries (M)
    pub libraries: usize,

    /// Book copies per library (K); also the per-reader cycle target
    pub books_per_library: usize,
}

/// Randomized hold interval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldSettings {
    /// Minimum hold duration in seconds
    pub min_secs: f64,

    /// Maximum hold duration in seconds
    pub max_secs: f64,

    /// Optional RNG seed for reproducible runs
    pub seed: Option<u64>,
}

/// Trace pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceSettings {
    /// Path of the JSONL trace file (overwritten each run)
    pub path: PathBuf,

    /// Capacity of the in-memory event queue
    pub queue_capacity: usize,

    /// Background writer flush interval in milliseconds
    pub flush_interval_ms: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            readers: 10,
            libraries: 3,
            books_per_library: 5,
        }
    }
}

impl Default for HoldSettings {
    fn default() -> Self {
        Self {
            min_secs: 1.0,
            max_secs: 3.0,
            seed: None,
        }
    }
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("biblioteca-trace.jsonl"),
            queue_capacity: 65_536,
            flush_interval_ms: 100,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationSettings::default(),
            hold: HoldSettings::default(),
            trace: TraceSettings::default(),
        }
    }
}

impl HoldSettings {
    /// Minimum hold as a [`Duration`]
    pub fn min(&self) -> Duration {
        Duration::from_secs_f64(self.min_secs)
    }

    /// Maximum hold as a [`Duration`]
    pub fn max(&self) -> Duration {
        Duration::from_secs_f64(self.max_secs)
    }
}

impl EngineConfig {
    /// Load configuration from defaults, optional file, and environment
    pub fn load() -> Result<Self> {
        Self::load_from("biblioteca")
    }

    /// Load with an explicit file stem (without extension)
    pub fn load_from(file_stem: &str) -> Result<Self> {
        let defaults = EngineConfig::default();

        let cfg = Config::builder()
            .set_default("simulation.readers", defaults.simulation.readers as u64)?
            .set_default("simulation.libraries", defaults.simulation.libraries as u64)?
            .set_default(
                "simulation.books_per_library",
                defaults.simulation.books_per_library as u64,
            )?
            .set_default("hold.min_secs", defaults.hold.min_secs)?
            .set_default("hold.max_secs", defaults.hold.max_secs)?
            .set_default(
                "trace.path",
                defaults.trace.path.to_string_lossy().to_string(),
            )?
            .set_default("trace.queue_capacity", defaults.trace.queue_capacity as u64)?
            .set_default("trace.flush_interval_ms", defaults.trace.flush_interval_ms)?
            .add_source(File::with_name(file_stem).required(false))
            .add_source(Environment::with_prefix("BIBLIOTECA").separator("__"))
            .build()?;

        let config: EngineConfig = cfg.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Validate dimensions and the hold interval
    pub fn validate(&self) -> Result<()> {
        if self.simulation.readers == 0 {
            return Err(EngineError::InvalidConfig(
                "simulation.readers must be at least 1".to_string(),
            ));
        }
        if self.simulation.libraries == 0 {
            return Err(EngineError::InvalidConfig(
                "simulation.libraries must be at least 1".to_string(),
            ));
        }
        if self.simulation.books_per_library == 0 {
            return Err(EngineError::InvalidConfig(
                "simulation.books_per_library must be at least 1".to_string(),
            ));
        }
        if self.hold.min_secs < 0.0 {
            return Err(EngineError::InvalidConfig(
                "hold.min_secs must not be negative".to_string(),
            ));
        }
        if self.hold.max_secs < self.hold.min_secs {
            return Err(EngineError::InvalidConfig(format!(
                "hold interval is inverted: min_secs={} > max_secs={}",
                self.hold.min_secs, self.hold.max_secs
            )));
        }
        if self.trace.queue_capacity == 0 {
            return Err(EngineError::InvalidConfig(
                "trace.queue_capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.simulation.readers, 10);
        assert_eq!(config.simulation.libraries, 3);
        assert_eq!(config.simulation.books_per_library, 5);
        assert_eq!(config.hold.min_secs, 1.0);
        assert_eq!(config.hold.max_secs, 3.0);
        assert!(config.hold.seed.is_none());
    }

    #[test]
    fn test_defaults_validate() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_readers_rejected() {
        let mut config = EngineConfig::default();
        config.simulation.readers = 0;
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_inverted_hold_interval_rejected() {
        let mut config = EngineConfig::default();
        config.hold.min_secs = 5.0;
        config.hold.max_secs = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_width_hold_interval_accepted() {
        let mut config = EngineConfig::default();
        config.hold.min_secs = 0.0;
        config.hold.max_secs = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = EngineConfig::load_from("does-not-exist").unwrap();
        assert_eq!(config.simulation.readers, 10);
    }

    #[test]
    fn test_hold_durations() {
        let hold = HoldSettings {
            min_secs: 0.5,
            max_secs: 2.5,
            seed: None,
        };
        assert_eq!(hold.min(), Duration::from_millis(500));
        assert_eq!(hold.max(), Duration::from_millis(2500));
    }
}
