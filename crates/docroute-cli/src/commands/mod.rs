//! Subcommands and the helpers they share.

pub mod analyze;
pub mod batch;
pub mod config;
pub mod organize;
pub mod route;

use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, SubsecRound};
use tracing::debug;

use docroute_core::DocrouteConfig;

/// `<config dir>/docroute/config.json`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docroute")
        .join("config.json")
}

/// Load the configuration from `config_path`, else from the default
/// location when present, else use the defaults.
pub fn load_config(config_path: Option<&Path>) -> anyhow::Result<DocrouteConfig> {
    if let Some(path) = config_path {
        return Ok(DocrouteConfig::from_file(path)?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(DocrouteConfig::from_file(&path)?)
    } else {
        Ok(DocrouteConfig::default())
    }
}

/// Replace the destination root, resolving relative paths against the
/// working directory.
pub fn override_base_path(config: &mut DocrouteConfig, base_path: Option<PathBuf>) -> anyhow::Result<()> {
    if let Some(path) = base_path {
        config.routing.base_path = if path.is_absolute() {
            path
        } else {
            std::env::current_dir()?.join(path)
        };
        config.validate()?;
    }
    Ok(())
}

/// Processing time: the given date at the current wall-clock time, or now.
pub fn processing_time(date: Option<NaiveDate>) -> NaiveDateTime {
    let now = Local::now().naive_local();
    match date {
        Some(date) => date.and_time(now.time()),
        None => now,
    }
}

/// Processing times for a run over many documents.
///
/// Every tick reads the wall clock again, at whole-second precision, and is
/// strictly later than the previous one. Documents that share a canonical
/// name therefore get distinct `_HHMMSS` retry names.
pub struct ProcessingClock {
    date: Option<NaiveDate>,
    last: Option<NaiveDateTime>,
}

impl ProcessingClock {
    pub fn new(date: Option<NaiveDate>) -> Self {
        Self { date, last: None }
    }

    pub fn tick(&mut self) -> NaiveDateTime {
        let mut now = processing_time(self.date).trunc_subsecs(0);
        if let Some(last) = self.last {
            if now <= last {
                now = last + Duration::seconds(1);
            }
        }
        self.last = Some(now);
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_ticks_are_strictly_increasing() {
        let mut clock = ProcessingClock::new(None);
        let ticks: Vec<NaiveDateTime> = (0..5).map(|_| clock.tick()).collect();
        for pair in ticks.windows(2) {
            assert!(pair[1] > pair[0], "{:?}", pair);
            assert_ne!(pair[1].format("%H%M%S").to_string(), pair[0].format("%H%M%S").to_string());
        }
    }

    #[test]
    fn test_clock_keeps_given_date() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap();
        let mut clock = ProcessingClock::new(Some(date));
        assert_eq!(clock.tick().date(), date);
    }
}
