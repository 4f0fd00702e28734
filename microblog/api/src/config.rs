use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use common::config::{deserialize_duration, DatabaseConfig, LoggingConfig};
use microblog_core::DefaultBefore;

#[derive(Debug, clap::Parser)]
#[command(version, about = "Microblog API server")]
struct Cli {
	/// Path to a config file, overrides MICROBLOG_CONFIG_FILE
	#[arg(long = "config", short = 'c')]
	config_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
/// The microblog API server
pub struct AppConfig {
	/// The path to the config file that was loaded
	pub config_file: Option<String>,

	/// Name of this instance
	pub name: String,

	/// The logging config
	pub logging: LoggingConfig,

	/// API Config
	pub api: ApiConfig,

	/// Database Config, a `postgres://` uri or `memory://`
	pub database: DatabaseConfig,

	/// Engine timeouts
	pub core: CoreConfig,

	/// Timeline Config
	pub timeline: TimelineConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ApiConfig {
	/// Bind address for the API
	pub bind_address: SocketAddr,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct CoreConfig {
	/// How long the user existence checks before a mutation may take
	#[serde(deserialize_with = "deserialize_duration")]
	pub existence_check_timeout: Duration,

	/// How long a background last post update may take
	#[serde(deserialize_with = "deserialize_duration")]
	pub denormalize_timeout: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
	/// Cursor used when a request has no `before`, either `now` or an offset
	/// into the past such as `3d`
	pub default_before: DefaultBefore,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			config_file: None,
			name: "microblog-api".to_string(),
			logging: LoggingConfig::default(),
			api: ApiConfig::default(),
			database: DatabaseConfig::default(),
			core: CoreConfig::default(),
			timeline: TimelineConfig::default(),
		}
	}
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			bind_address: "[::]:8080".parse().expect("failed to parse bind address"),
		}
	}
}

impl Default for CoreConfig {
	fn default() -> Self {
		let options = microblog_core::Options::default();

		Self {
			existence_check_timeout: options.existence_check_timeout,
			denormalize_timeout: options.denormalize_timeout,
		}
	}
}

impl AppConfig {
	pub fn parse() -> Result<Self> {
		let cli = <Cli as clap::Parser>::parse();

		Self::load(cli.config_file.as_deref())
	}

	/// Layers the file, if any, under `MICROBLOG_*` environment variables.
	pub fn load(config_file: Option<&str>) -> Result<Self> {
		let (mut config, config_file): (Self, _) = common::config::parse("MICROBLOG", config_file)?;

		config.config_file = config_file;

		Ok(config)
	}

	pub fn core_options(&self) -> microblog_core::Options {
		microblog_core::Options {
			existence_check_timeout: self.core.existence_check_timeout,
			denormalize_timeout: self.core.denormalize_timeout,
			default_before: self.timeline.default_before,
		}
	}
}
