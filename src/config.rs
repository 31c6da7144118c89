use std::path::{Path, PathBuf};

use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::cli::Command;
use crate::error::{Error, Result};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE", global = true)]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT", global = true)]
    pub port: Option<u16>,

    /// Catalog API key
    #[arg(long, env = "CATALOG_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Meal plan file
    #[arg(long = "meal-plan", env = "MEAL_PLAN_PATH", global = true)]
    pub meal_plan_path: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Deserialize, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key: String,
    /// Base for recipe detail-page links.
    pub site_url: String,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("site_url", &self.site_url)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub meal_plan_path: PathBuf,
}

impl AppConfig {
    /// Parse `args` as a command line and assemble the configuration.
    pub fn load_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)
            .map_err(|e| Error::Config(config::ConfigError::Message(e.to_string())))?;
        Self::from_cli(&cli)
    }

    /// Priority: CLI flag > CLI env var > `RECIPE_` env > config file > defaults.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("catalog.base_url", "https://api.spoonacular.com")?
            .set_default("catalog.api_key", "")?
            .set_default("catalog.site_url", "https://spoonacular.com/recipes/")?
            .set_default("storage.meal_plan_path", "meal_plan.json")?;

        // An explicit file must exist; ./config.yaml is picked up when present.
        builder = match &cli.config {
            Some(path) => builder.add_source(File::from(Path::new(path)).required(true)),
            None => builder.add_source(File::new("config.yaml", FileFormat::Yaml).required(false)),
        };

        // E.g. RECIPE_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("RECIPE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(key) = &cli.api_key {
            builder = builder.set_override("catalog.api_key", key.as_str())?;
        }
        if let Some(path) = &cli.meal_plan_path {
            builder = builder.set_override("storage.meal_plan_path", path.as_str())?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }
}
