// src/config.rs

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// What to do with a source line that does not match its grammar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Fail the run on the first bad line.
    #[default]
    Abort,
    /// Log the line and carry on.
    Skip,
}

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub food_des: PathBuf,
    pub fd_group: PathBuf,
    pub output_dir: PathBuf,
    pub on_malformed: MalformedPolicy,
    pub manifest: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            food_des: PathBuf::from("FOOD_DES.txt"),
            fd_group: PathBuf::from("FD_GROUP.txt"),
            output_dir: PathBuf::from("modifiers_by_food"),
            on_malformed: MalformedPolicy::Abort,
            manifest: None,
        }
    }
}

/// Optional YAML settings file. Every key may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub food_des: Option<PathBuf>,
    pub fd_group: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub on_malformed: Option<MalformedPolicy>,
    pub manifest: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}

/// Build per-category food modifier lists from a USDA nutrient export
#[derive(Debug, Default, Parser)]
#[command(name = "foodfacets", version, long_about = None)]
pub struct Cli {
    /// YAML file with default settings (flags still win)
    #[arg(long, env = "FOODFACETS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Food description file
    #[arg(long, env = "FOODFACETS_FOOD_DES")]
    pub food_des: Option<PathBuf>,

    /// Food group file
    #[arg(long, env = "FOODFACETS_FD_GROUP")]
    pub fd_group: Option<PathBuf>,

    /// Directory receiving one `<LABEL>.txt` per category
    #[arg(long, env = "FOODFACETS_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Handling of lines that do not match the source format
    #[arg(long, value_enum, env = "FOODFACETS_ON_MALFORMED")]
    pub on_malformed: Option<MalformedPolicy>,

    /// Also write a JSON manifest of the generated files here
    #[arg(long, env = "FOODFACETS_MANIFEST")]
    pub manifest: Option<PathBuf>,
}

impl Cli {
    /// Layer defaults, the optional YAML file and the flags, in that order.
    pub fn resolve(self) -> Result<Config> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        let config = merge(file, self);
        debug!(?config, "resolved configuration");
        Ok(config)
    }
}

fn merge(file: FileConfig, cli: Cli) -> Config {
    let d = Config::default();
    Config {
        food_des: cli.food_des.or(file.food_des).unwrap_or(d.food_des),
        fd_group: cli.fd_group.or(file.fd_group).unwrap_or(d.fd_group),
        output_dir: cli.output_dir.or(file.output_dir).unwrap_or(d.output_dir),
        on_malformed: cli
            .on_malformed
            .or(file.on_malformed)
            .unwrap_or(d.on_malformed),
        manifest: cli.manifest.or(file.manifest).or(d.manifest),
    }
}
