// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub storage_path: PathBuf,
    pub database_path: PathBuf,
    pub ai_service_url: String,
    pub auth_project_id: String,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl EnvironmentConfig {
    /// Load configuration based on environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        Self::load_from_file(&environment)
    }

    fn get_environment() -> String {
        std::env::var("CANDI_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(environment: &str) -> Result<Self> {
        let config_path = PathBuf::from("config.yaml");
        if !config_path.exists() {
            anyhow::bail!("config.yaml not found in current directory. Server cannot start without configuration.");
        }

        let config_content =
            std::fs::read_to_string(&config_path).context("Failed to read config.yaml")?;

        let config_file: ConfigFile =
            serde_yaml::from_str(&config_content).context("Failed to parse config.yaml")?;

        let env_config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        // Make paths absolute
        Ok(Self {
            storage_path: Self::resolve_path(&env_config.storage_path)?,
            database_path: Self::resolve_path(&env_config.database_path)?,
            ai_service_url: env_config.ai_service_url,
            auth_project_id: env_config.auth_project_id,
        })
    }

    fn resolve_path(path: &PathBuf) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.clone())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }

    /// Ensure all configured directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        if !self.storage_path.exists() {
            tokio::fs::create_dir_all(&self.storage_path)
                .await
                .with_context(|| {
                    format!(
                        "Failed to create storage directory: {}",
                        self.storage_path.display()
                    )
                })?;
        }

        // Don't create the database file, just its parent directory.
        if let Some(db_parent) = self.database_path.parent() {
            tokio::fs::create_dir_all(db_parent)
                .await
                .with_context(|| {
                    format!(
                        "Failed to create database directory: {}",
                        db_parent.display()
                    )
                })?;
        }

        info!("All configured directories ensured to exist");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_parses_both_environments() {
        let yaml = r#"
local:
  storage_path: ./data/storage
  database_path: ./data/candi.db
  ai_service_url: http://localhost:5001
  auth_project_id: candi-local
production:
  storage_path: /var/lib/candi/storage
  database_path: /var/lib/candi/candi.db
  ai_service_url: https://ai.internal.example.com
  auth_project_id: candi-prod
"#;
        let parsed: ConfigFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed.local.auth_project_id, "candi-local");
        assert!(parsed.production.storage_path.is_absolute());
    }

    #[test]
    fn test_resolve_path_keeps_absolute() {
        let path = PathBuf::from("/var/lib/candi");
        assert_eq!(EnvironmentConfig::resolve_path(&path).unwrap(), path);
    }
}
