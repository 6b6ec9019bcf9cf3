use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "GeneralConfig::default_seed")]
    pub seed: u64,
    #[serde(default = "GeneralConfig::default_out_dir")]
    pub out_dir: PathBuf,
}

impl GeneralConfig {
    fn default_seed() -> u64 {
        42
    }
    fn default_out_dir() -> PathBuf {
        PathBuf::from(".")
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            seed: Self::default_seed(),
            out_dir: Self::default_out_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochConfig {
    #[serde(default = "EpochConfig::default_plot_stride")]
    pub plot_stride: usize,
    #[serde(default = "EpochConfig::default_convergence_threshold")]
    pub convergence_threshold: f64,
    #[serde(default = "EpochConfig::default_tail_start_round")]
    pub tail_start_round: usize,
    #[serde(default = "EpochConfig::default_write_csv")]
    pub write_csv: bool,
}

impl EpochConfig {
    fn default_plot_stride() -> usize {
        2
    }
    fn default_convergence_threshold() -> f64 {
        90.0
    }
    fn default_tail_start_round() -> usize {
        80
    }
    fn default_write_csv() -> bool {
        true
    }
}

impl Default for EpochConfig {
    fn default() -> Self {
        Self {
            plot_stride: Self::default_plot_stride(),
            convergence_threshold: Self::default_convergence_threshold(),
            tail_start_round: Self::default_tail_start_round(),
            write_csv: Self::default_write_csv(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "RenderConfig::default_enabled")]
    pub png: bool,
    #[serde(default = "RenderConfig::default_enabled")]
    pub svg: bool,
    #[serde(default = "RenderConfig::default_epoch_size")]
    pub epoch_size: (u32, u32),
    #[serde(default = "RenderConfig::default_attack_size")]
    pub attack_size: (u32, u32),
}

impl RenderConfig {
    fn default_enabled() -> bool {
        true
    }
    fn default_epoch_size() -> (u32, u32) {
        (1680, 600)
    }
    fn default_attack_size() -> (u32, u32) {
        (1200, 700)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            png: Self::default_enabled(),
            svg: Self::default_enabled(),
            epoch_size: Self::default_epoch_size(),
            attack_size: Self::default_attack_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FigureConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub epoch: EpochConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

impl FigureConfig {
    /// Loads `path`, or writes the defaults there as commented lines if it does not exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => {
                        debug!(path = %path.display(), "loaded config");
                        return cfg;
                    }
                    Err(err) => {
                        warn!("Failed to parse config {}: {err}. Using defaults.", path.display());
                    }
                },
                Err(err) => {
                    warn!("Failed to read config {}: {err}. Using defaults.", path.display());
                }
            }
            return Self::default();
        }

        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                if let Err(err) = fs::write(path, comment_out(&text)) {
                    warn!("Failed to write default config to {}: {err}", path.display());
                }
            }
            Err(err) => warn!("Failed to serialize default config: {err}"),
        }
        default_cfg
    }
}

/// Comments every key line, keeping section headers live.
fn comment_out(text: &str) -> String {
    let mut commented = String::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || (trimmed.starts_with('[') && !trimmed.contains('=')) {
            commented.push_str(line);
        } else {
            commented.push_str("# ");
            commented.push_str(line);
        }
        commented.push('\n');
    }
    commented
}
