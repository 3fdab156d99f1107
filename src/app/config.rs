use crate::app::cli::Cli;
use crate::app::error::TreeHashError;
use crate::app::models::{FilterSet, RuntimeConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default)]
struct PresetConfig {
    exts: Option<Vec<String>>,
    ignores: Option<Vec<String>>,
    follow_symlinks: Option<bool>,
}

fn presets_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("treehash").join("presets.toml"))
}

fn load_presets_file(path: &Path) -> Result<HashMap<String, PresetConfig>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let content =
        fs::read_to_string(path).context(format!("Failed to read config at {:?}", path))?;

    parse_presets(&content)
}

fn parse_presets(content: &str) -> Result<HashMap<String, PresetConfig>> {
    let parsed: PresetsFile = toml::from_str(content).context("Failed to parse presets.toml")?;
    Ok(parsed.presets)
}

fn merge_vecs(preset_vec: Option<Vec<String>>, cli_vec: Option<Vec<String>>) -> Vec<String> {
    let mut combined = preset_vec.unwrap_or_default();
    if let Some(mut cli_items) = cli_vec {
        combined.append(&mut cli_items);
    }
    // Deduplicate while keeping order
    let mut seen = std::collections::HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

/// Resolves the base directory; it must exist.
fn resolve_base(base: Option<PathBuf>) -> Result<PathBuf> {
    let base = match base {
        Some(base) => base,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    if !base.is_dir() {
        return Err(TreeHashError::BaseNotDirectory(base).into());
    }
    base.canonicalize()
        .context(format!("Failed to resolve base path {:?}", base))
}

pub fn resolve_config(cli: Cli) -> Result<RuntimeConfig> {
    let presets = load_presets_file(&presets_path()?)?;
    let base = resolve_base(cli.base.clone())?;
    build_config(cli, base, &presets)
}

fn build_config(
    cli: Cli,
    base: PathBuf,
    presets: &HashMap<String, PresetConfig>,
) -> Result<RuntimeConfig> {
    // Determine preset to use: CLI flag > base folder name > None
    let project_name = base.file_name().and_then(|n| n.to_str());
    let preset_key = cli.preset.as_deref().or(project_name);
    let preset = preset_key
        .and_then(|k| presets.get(k))
        .cloned()
        .unwrap_or_default();

    if let Some(name) = cli.preset.as_deref() {
        if !presets.contains_key(name) {
            log::warn!("Preset \"{}\" not found; using command-line filters only.", name);
        }
    }

    Ok(RuntimeConfig {
        defaults: FilterSet::new(
            merge_vecs(preset.exts, cli.exts),
            merge_vecs(preset.ignores, cli.ignores),
        ),
        follow_symlinks: cli.follow_symlinks || preset.follow_symlinks.unwrap_or(false),
        base,
        inputs: cli.inputs,
        scanner: cli.scanner,
        verbose: cli.verbose,
        print_time: cli.time,
    })
}
