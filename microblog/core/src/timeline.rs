use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use common::database::Ulid;

use crate::database::{Database, Post};
use crate::error::{Error, Result};

/// A page size that has already been validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PageLimit(u32);

impl PageLimit {
	pub const MIN: u32 = 1;
	pub const MAX: u32 = 100;
	pub const DEFAULT: Self = Self(50);

	pub fn new(limit: u32) -> Option<Self> {
		(Self::MIN..=Self::MAX).contains(&limit).then_some(Self(limit))
	}

	/// Anything missing, unparsable or out of range falls back to the default.
	pub fn parse_or_default(text: Option<&str>) -> Self {
		text.and_then(|text| text.trim().parse().ok())
			.and_then(Self::new)
			.unwrap_or_default()
	}

	pub fn get(self) -> u32 {
		self.0
	}
}

impl Default for PageLimit {
	fn default() -> Self {
		Self::DEFAULT
	}
}

/// Where a timeline starts when the caller gives no `before` cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultBefore {
	#[default]
	Now,
	/// A fixed offset into the past from the time of the request.
	Ago(Duration),
}

impl DefaultBefore {
	pub fn resolve(self, now: DateTime<Utc>) -> DateTime<Utc> {
		match self {
			Self::Now => now,
			Self::Ago(offset) => chrono::Duration::from_std(offset)
				.ok()
				.and_then(|offset| now.checked_sub_signed(offset))
				.unwrap_or(DateTime::<Utc>::MIN_UTC),
		}
	}
}

impl FromStr for DefaultBefore {
	type Err = humantime::DurationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"" | "now" => Ok(Self::Now),
			offset => humantime::parse_duration(offset).map(Self::Ago),
		}
	}
}

impl fmt::Display for DefaultBefore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Now => f.write_str("now"),
			Self::Ago(offset) => write!(f, "{}", humantime::format_duration(*offset)),
		}
	}
}

impl<'de> serde::Deserialize<'de> for DefaultBefore {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		String::deserialize(deserializer)?.parse().map_err(serde::de::Error::custom)
	}
}

/// Assembles a user's timeline from the posts of everyone they follow.
pub struct Timeline<D> {
	db: Arc<D>,
	default_before: DefaultBefore,
}

impl<D: Database> Timeline<D> {
	pub fn new(db: Arc<D>, default_before: DefaultBefore) -> Self {
		Self { db, default_before }
	}

	pub fn default_before(&self) -> DefaultBefore {
		self.default_before
	}

	#[tracing::instrument(skip(self, limit), fields(limit = limit.get()))]
	pub async fn get_timeline(&self, user_id: Ulid, limit: PageLimit, before: Option<DateTime<Utc>>) -> Result<Vec<Post>> {
		let before = before.unwrap_or_else(|| self.default_before.resolve(Utc::now()));

		let posts = self
			.db
			.followed_posts(user_id, before, limit.get())
			.await
			.map_err(|err| {
				tracing::error!(error = %err, "failed to assemble timeline");
				Error::TimelineUnavailable(err)
			})?;

		tracing::debug!(%before, count = posts.len(), "assembled timeline");

		Ok(posts)
	}
}
