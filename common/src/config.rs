use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::logging;

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
	/// The log level to use, this is a tracing env filter
	pub level: String,

	/// What logging mode we should use
	pub mode: logging::Mode,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			mode: logging::Mode::Default,
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
	/// The database URL to use
	pub uri: String,

	/// Upper bound on pooled connections
	pub max_connections: u32,

	/// Run the embedded migrations on startup
	pub migrate: bool,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			uri: "postgres://localhost:5432/microblog".to_string(),
			max_connections: 10,
			migrate: false,
		}
	}
}

/// Loads a config from an optional file overlaid with `{prefix}_*`
/// environment variables. Nested keys are separated by `__`, so
/// `{prefix}_LOGGING__LEVEL` sets `logging.level`.
///
/// The file is named by `config_file`, falling back to `{prefix}_CONFIG_FILE`,
/// and must exist when named. Returns the canonical path of the loaded file.
pub fn parse<C: DeserializeOwned>(prefix: &str, config_file: Option<&str>) -> Result<(C, Option<String>), config::ConfigError> {
	let env_file = std::env::var(format!("{prefix}_CONFIG_FILE")).ok().filter(|p| !p.is_empty());

	let mut builder = config::Config::builder();

	let mut config_path = None;
	if let Some(path) = config_file.filter(|p| !p.is_empty()).or(env_file.as_deref()) {
		let path = std::fs::canonicalize(Path::new(path))
			.map_err(|err| config::ConfigError::Foreign(Box::new(err)))?;

		builder = builder.add_source(config::File::from(path.as_path()).required(true));
		config_path = Some(path.display().to_string());
	}

	let config = builder
		.add_source(
			config::Environment::with_prefix(prefix)
				.prefix_separator("_")
				.separator("__")
				.try_parsing(true),
		)
		.build()?
		.try_deserialize()?;

	Ok((config, config_path))
}

/// Deserializes a [`Duration`] from a humantime string such as `"5s"` or
/// `"3days"`, or from a bare integer number of milliseconds.
pub fn deserialize_duration<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
	#[derive(serde::Deserialize)]
	#[serde(untagged)]
	enum Raw {
		Millis(u64),
		Text(String),
	}

	match serde::Deserialize::deserialize(deserializer)? {
		Raw::Millis(ms) => Ok(Duration::from_millis(ms)),
		Raw::Text(text) => humantime::parse_duration(text.trim()).map_err(serde::de::Error::custom),
	}
}
