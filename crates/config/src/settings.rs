// User settings
// Loaded from ~/.config/rollcall/settings.json

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides the settings directory.
pub const CONFIG_DIR_ENV: &str = "ROLLCALL_CONFIG_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Minimum summed minutes for a participant to count as present
    #[serde(rename = "recon.thresholdMinutes")]
    pub threshold_minutes: f64,

    /// Where output CSVs go when a run names no directory. None = next to the
    /// registration file
    #[serde(rename = "output.dir")]
    pub output_dir: Option<String>,

    /// Program value meaning "no program filter"
    #[serde(rename = "program.allLabel")]
    pub program_all_label: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold_minutes: 60.0,
            output_dir: None,
            program_all_label: "All".to_string(),
        }
    }
}

const DEFAULT_CONFIG: &str = r#"{
    // Minutes a participant must attend (summed over rejoins) to be marked Y
    "recon.thresholdMinutes": 60,

    // Output directory for annotated rosters (null = the registration file's directory)
    "output.dir": null,

    // Program value that selects every program
    "program.allLabel": "All"
}
"#;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rollcall"),
        };
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(&path);
            return settings;
        }

        Self::load_from(&path)
    }

    /// Read a settings file. Lines starting with `//` are ignored; any read or
    /// parse error yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let cleaned: String = contents
                    .lines()
                    .filter(|line| !line.trim().starts_with("//"))
                    .collect::<Vec<_>>()
                    .join("\n");

                match serde_json::from_str(&cleaned) {
                    Ok(settings) => {
                        debug!("loaded settings from {}", path.display());
                        settings
                    }
                    Err(e) => {
                        warn!("error parsing {}: {}; using default settings", path.display(), e);
                        Self::default()
                    }
                }
            }
            Err(e) => {
                warn!("error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Create default settings file with comments
    fn create_default_file(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("error creating config directory: {}", e);
                return;
            }
        }

        if let Err(e) = fs::write(path, DEFAULT_CONFIG) {
            warn!("error writing default settings.json: {}", e);
        }
    }

    /// True when `program` is the configured "every program" label.
    pub fn is_all_programs(&self, program: &str) -> bool {
        program.trim().eq_ignore_ascii_case(self.program_all_label.trim())
    }

    /// Get the config file path for display
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}
