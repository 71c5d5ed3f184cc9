//! Host configuration: environment defaults overridden by command-line flags.

use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};

/// Default store file, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "super-capy.json";

#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    /// Raw level request; parsed leniently by the session.
    pub level: Option<String>,
    pub seed: u32,
    /// `None` runs with persistence unavailable.
    pub store_path: Option<PathBuf>,
    pub speed: f32,
    pub log_path: Option<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            level: None,
            seed: clock_seed(),
            store_path: Some(PathBuf::from(DEFAULT_STORE_PATH)),
            speed: 1.0,
            log_path: None,
        }
    }
}

impl HostConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests pass a closure over a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let level = lookup("SUPER_CAPY_LEVEL").and_then(non_empty);

        let seed = lookup("SUPER_CAPY_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.seed);

        let store_path = match lookup("SUPER_CAPY_STORE_PATH") {
            Some(s) => non_empty(s).map(PathBuf::from),
            None => defaults.store_path,
        };

        let speed = lookup("SUPER_CAPY_SPEED")
            .and_then(|s| s.trim().parse().ok())
            .filter(|v: &f32| v.is_finite() && *v > 0.0)
            .unwrap_or(defaults.speed);

        let log_path = lookup("SUPER_CAPY_LOG_PATH")
            .and_then(non_empty)
            .map(PathBuf::from);

        Self {
            level,
            seed,
            store_path,
            speed,
            log_path,
        }
    }

    /// Apply command-line flags (without the program name) on top of `self`.
    pub fn apply_args<I, S>(mut self, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::<String>::into);
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| anyhow!("missing value for {flag}"))
            };
            match arg.as_str() {
                "--level" => self.level = Some(value("--level")?),
                "--seed" => {
                    let raw = value("--seed")?;
                    self.seed = raw
                        .parse()
                        .map_err(|_| anyhow!("invalid --seed value: {raw}"))?;
                }
                "--store" => self.store_path = Some(PathBuf::from(value("--store")?)),
                "--no-store" => self.store_path = None,
                "--speed" => {
                    let raw = value("--speed")?;
                    let speed: f32 = raw
                        .parse()
                        .map_err(|_| anyhow!("invalid --speed value: {raw}"))?;
                    if !speed.is_finite() || speed <= 0.0 {
                        return Err(anyhow!("--speed must be a positive number, got {raw}"));
                    }
                    self.speed = speed;
                }
                "--log" => self.log_path = Some(PathBuf::from(value("--log")?)),
                other => return Err(anyhow!("unknown argument: {other}")),
            }
        }
        Ok(self)
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32 ^ d.subsec_nanos())
        .unwrap_or(1)
}
