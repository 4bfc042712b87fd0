use std::time::Duration;

use anyhow::{bail, Context, Result};
use winit::dpi::LogicalSize;

use crate::lifecycle::FramePacing;

pub const SEED_VAR: &str = "NOISE_QUAD_SEED";
pub const PACING_VAR: &str = "NOISE_QUAD_PACING";

/// Everything the program needs to know before it opens its window.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub size: LogicalSize<f64>,
    pub tint: [f32; 3],

    /// Texture seed. `None` seeds from the clock at setup time.
    pub seed: Option<u64>,
    pub pacing: FramePacing,

    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "LearnOpenGL".to_string(),
            size: LogicalSize::new(800.0, 600.0),
            tint: [0.8, 0.4, 1.0],
            seed: None,
            pacing: FramePacing::WaitForEvents,
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::from_lookup(|name| std::env::var(name).ok())?;

        if let Some(backends) = wgpu::util::backend_bits_from_env() {
            config.backends = backends;
        }
        if let Some(power_preference) = wgpu::util::power_preference_from_env() {
            config.power_preference = power_preference;
        }

        Ok(config)
    }

    /// Builds a config from the defaults plus whatever `lookup` returns for
    /// the program's own variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(SEED_VAR) {
            let seed = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{SEED_VAR}={raw:?} is not an unsigned integer"))?;
            config.seed = Some(seed);
        }

        if let Some(raw) = lookup(PACING_VAR) {
            config.pacing =
                parse_pacing(&raw).with_context(|| format!("{PACING_VAR}={raw:?} is invalid"))?;
        }

        Ok(config)
    }
}

fn parse_pacing(raw: &str) -> Result<FramePacing> {
    match raw.trim() {
        "wait" => Ok(FramePacing::WaitForEvents),
        "poll" => Ok(FramePacing::Poll),
        other => {
            let millis: u64 = other
                .parse()
                .context("expected `wait`, `poll` or a timeout in milliseconds")?;
            if millis == 0 {
                bail!("idle timeout must be positive; use `poll` to never block");
            }
            Ok(FramePacing::IdleTimeout(Duration::from_millis(millis)))
        }
    }
}
