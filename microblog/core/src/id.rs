use common::database::Ulid;

use crate::error::{Error, Result};

/// Parses a textual id in either ULID or UUID form.
pub fn parse_id(text: &str) -> Result<Ulid> {
	text.parse().map_err(|_| Error::InvalidId(text.to_string()))
}

/// Hands out post ids that sort in creation order, even within the same
/// millisecond.
pub(crate) struct IdGenerator(std::sync::Mutex<ulid::Generator>);

impl IdGenerator {
	pub fn new() -> Self {
		Self(std::sync::Mutex::new(ulid::Generator::new()))
	}

	pub fn generate(&self) -> Ulid {
		let mut generator = self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
		// Only fails when the random part overflows within a single millisecond.
		generator.generate().map(Ulid::from).unwrap_or_else(|_| Ulid::new())
	}
}

/// Current time at the precision Postgres stores, so values read back compare
/// equal to the ones written.
pub(crate) fn now() -> chrono::DateTime<chrono::Utc> {
	use chrono::SubsecRound;

	chrono::Utc::now().trunc_subsecs(6)
}
