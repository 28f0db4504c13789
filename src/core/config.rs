use crate::config::{Config, migrate};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    pub fn print(cfg: &Config) -> AppResult<()> {
        let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
        println!("📄 Current configuration:\n");
        println!("{yaml}");
        Ok(())
    }

    /// Report (and add) keys missing from the configuration file.
    pub fn check(path: &Path) -> AppResult<()> {
        if !path.exists() {
            warning(format!(
                "No configuration file at {}; run `labtally init` first.",
                path.display()
            ));
            return Ok(());
        }

        let added = migrate::add_missing_fields(path)?;
        if added.is_empty() {
            success("Configuration file is complete.");
        } else {
            for key in &added {
                info(format!("Added missing key: {key}"));
            }
            success(format!("{} key(s) added to {}", added.len(), path.display()));
        }
        Ok(())
    }

    /// Open the file in `editor`, `$EDITOR`, `$VISUAL` or a platform default.
    pub fn edit(path: &Path, editor: Option<&str>) -> AppResult<()> {
        let ed = editor
            .map(str::to_string)
            .or_else(|| std::env::var("EDITOR").ok())
            .or_else(|| std::env::var("VISUAL").ok())
            .unwrap_or_else(|| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            });

        let status = Command::new(&ed)
            .arg(path)
            .status()
            .map_err(|e| AppError::Config(format!("cannot start '{ed}': {e}")))?;

        if !status.success() {
            return Err(AppError::Config(format!("editor '{ed}' exited with {status}")));
        }

        success(format!("Configuration file edited using '{ed}'"));
        Ok(())
    }
}
