use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::Datelike;
use directories::ProjectDirs;
use serde::Deserialize;

use crate::domain::entities::status::UserRole;
use crate::usecase::services::browser::{BrowseContext, Viewer};

pub const MAX_PAGE_SIZE: u32 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub username: String,
    pub role: UserRole,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            role: UserRole::Admin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub db_path: Option<PathBuf>,
    pub page_size: u32,
    pub debounce_ms: u64,
    pub year: Option<i32>,
    pub install_procedures: bool,
    pub viewer: ViewerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            page_size: crate::DEFAULT_PAGE_SIZE,
            debounce_ms: crate::DEFAULT_DEBOUNCE_MS,
            year: None,
            install_procedures: true,
            viewer: ViewerConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            anyhow::bail!(
                "page_size must be between 1 and {MAX_PAGE_SIZE} (got {})",
                self.page_size
            )
        }
        Ok(())
    }

    pub fn resolve_db_path(&self) -> Result<PathBuf> {
        match &self.db_path {
            Some(path) => Ok(path.clone()),
            None => default_db_path(),
        }
    }

    pub fn reporting_year(&self) -> i32 {
        self.year.unwrap_or_else(|| chrono::Local::now().year())
    }

    pub fn browse_context(&self) -> BrowseContext {
        BrowseContext {
            year: Some(self.reporting_year()),
            viewer: Some(Viewer {
                username: self.viewer.username.clone(),
                role: self.viewer.role,
            }),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("id", "bps", "ubinan-portal")
        .ok_or_else(|| anyhow!("unable to resolve application directories"))
}

pub fn default_db_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().join("ubinan.sqlite"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

pub fn default_webview_data_dir() -> Result<PathBuf> {
    let dir = project_dirs()?.data_local_dir().join("webview");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create webview data dir: {}", dir.display()))?;
    Ok(dir)
}

pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config: AppConfig = toml::from_str(&text)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
