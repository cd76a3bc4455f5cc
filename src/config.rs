use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::plan::{
    PlanOptions, TimeLimits, YearRange, DEFAULT_BLITZ_LIMIT, DEFAULT_SPEED_LIMIT,
    DEFAULT_TIMED_QUESTIONS,
};

/// Setup defaults remembered between launches.
///
/// Only these options are ever written. Session results never are.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub century: i32,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub speed_questions: u32,
    pub blitz_questions: u32,
    pub speed_limit_ms: u64,
    pub blitz_limit_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            century: 1900,
            year_from: None,
            year_to: None,
            speed_questions: DEFAULT_TIMED_QUESTIONS,
            blitz_questions: DEFAULT_TIMED_QUESTIONS,
            speed_limit_ms: DEFAULT_SPEED_LIMIT.as_millis() as u64,
            blitz_limit_ms: DEFAULT_BLITZ_LIMIT.as_millis() as u64,
        }
    }
}

impl Config {
    pub fn limits(&self) -> TimeLimits {
        let limits = TimeLimits {
            speed: Duration::from_millis(self.speed_limit_ms),
            blitz: Duration::from_millis(self.blitz_limit_ms),
        };
        match limits.validate() {
            Ok(()) => limits,
            Err(e) => {
                log::warn!("{}; using default time limits", e);
                TimeLimits::default()
            }
        }
    }

    pub fn plan_options(&self) -> PlanOptions {
        let bounds = YearRange::century(self.century);
        let year_range = YearRange::new(
            self.year_from.unwrap_or(bounds.min()),
            self.year_to.unwrap_or(bounds.max()),
        );
        PlanOptions {
            bounds,
            year_range,
            custom_date: None,
            speed_questions: self.speed_questions,
            blitz_questions: self.blitz_questions,
            limits: self.limits(),
        }
    }
}

impl From<&PlanOptions> for Config {
    fn from(opts: &PlanOptions) -> Self {
        let narrowed = opts.year_range != opts.bounds;
        Self {
            century: opts.bounds.min(),
            year_from: narrowed.then(|| opts.year_range.min()),
            year_to: narrowed.then(|| opts.year_range.max()),
            speed_questions: opts.speed_questions,
            blitz_questions: opts.blitz_questions,
            speed_limit_ms: opts.limits.speed.as_millis() as u64,
            blitz_limit_ms: opts.limits.blitz.as_millis() as u64,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "dowquiz") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("dowquiz_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice::<Config>(&bytes).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable config {}: {}", self.path.display(), e);
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn saved_file_holds_only_setup_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        store.save(&Config::default()).unwrap();

        let value: serde_json::Value =
            serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "blitz_limit_ms",
                "blitz_questions",
                "century",
                "speed_limit_ms",
                "speed_questions",
                "year_from",
                "year_to",
            ]
        );
    }

    #[test]
    fn missing_or_corrupt_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());

        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "century": 2000, "blitz_questions": 25 }"#).unwrap();
        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.century, 2000);
        assert_eq!(cfg.blitz_questions, 25);
        assert_eq!(cfg.speed_questions, DEFAULT_TIMED_QUESTIONS);
    }

    #[test]
    fn plan_options_from_config() {
        let cfg = Config {
            century: 1800,
            year_from: Some(1850),
            year_to: Some(1820),
            ..Default::default()
        };
        let opts = cfg.plan_options();
        assert_eq!(opts.bounds, YearRange::new(1800, 1899));
        assert_eq!(opts.year_range, YearRange::new(1820, 1850));
        assert_eq!(opts.limits, TimeLimits::default());
    }

    #[test]
    fn invalid_limits_fall_back_to_defaults() {
        let cfg = Config {
            speed_limit_ms: 4000,
            blitz_limit_ms: 8000,
            ..Default::default()
        };
        assert_eq!(cfg.limits(), TimeLimits::default());

        let cfg = Config {
            blitz_limit_ms: 0,
            ..Default::default()
        };
        assert_eq!(cfg.limits(), TimeLimits::default());

        let cfg = Config {
            speed_limit_ms: 20_000,
            blitz_limit_ms: 3_000,
            ..Default::default()
        };
        assert_eq!(cfg.limits().blitz, Duration::from_millis(3_000));
    }

    #[test]
    fn config_from_plan_options_roundtrips() {
        let cfg = Config {
            century: 2000,
            year_from: Some(2010),
            year_to: Some(2020),
            speed_questions: 30,
            blitz_questions: 12,
            speed_limit_ms: 20_000,
            blitz_limit_ms: 4_000,
        };
        assert_eq!(Config::from(&cfg.plan_options()), cfg);
        assert_eq!(
            Config::from(&Config::default().plan_options()),
            Config::default()
        );
    }
}
