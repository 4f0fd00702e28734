use std::str::FromStr;

/// An identifier generated as a ULID and stored in Postgres as a `UUID`.
///
/// The textual form is the 26 character Crockford encoding, but parsing also
/// accepts the hyphenated UUID form so ids read back from the database can be
/// passed around in either shape.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Ulid(pub ulid::Ulid);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier: {0:?}")]
pub struct UlidParseError(String);

impl Ulid {
	pub fn new() -> Self {
		Self(ulid::Ulid::new())
	}

	pub const fn nil() -> Self {
		Self(ulid::Ulid::nil())
	}

	pub fn is_nil(&self) -> bool {
		self.0.is_nil()
	}

	pub fn to_uuid(self) -> uuid::Uuid {
		self.0.into()
	}
}

impl FromStr for Ulid {
	type Err = UlidParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();

		if let Ok(id) = ulid::Ulid::from_string(s) {
			return Ok(Self(id));
		}

		uuid::Uuid::parse_str(s)
			.map(Self::from)
			.map_err(|_| UlidParseError(s.to_string()))
	}
}

impl std::fmt::Display for Ulid {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.0.to_string().fmt(f)
	}
}

impl std::fmt::Debug for Ulid {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.0.fmt(f)
	}
}

impl serde::Serialize for Ulid {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(&self.0)
	}
}

impl<'de> serde::Deserialize<'de> for Ulid {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
		s.parse().map_err(serde::de::Error::custom)
	}
}

impl sqlx::postgres::PgHasArrayType for Ulid {
	fn array_type_info() -> sqlx::postgres::PgTypeInfo {
		<uuid::Uuid as sqlx::postgres::PgHasArrayType>::array_type_info()
	}

	fn array_compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
		<uuid::Uuid as sqlx::postgres::PgHasArrayType>::array_compatible(ty)
	}
}

impl sqlx::Type<sqlx::Postgres> for Ulid {
	fn type_info() -> sqlx::postgres::PgTypeInfo {
		<uuid::Uuid as sqlx::Type<sqlx::Postgres>>::type_info()
	}
}

impl sqlx::Decode<'_, sqlx::Postgres> for Ulid {
	fn decode(value: sqlx::postgres::PgValueRef<'_>) -> Result<Self, sqlx::error::BoxDynError> {
		<uuid::Uuid as sqlx::Decode<'_, sqlx::Postgres>>::decode(value).map(Self::from)
	}
}

impl sqlx::Encode<'_, sqlx::Postgres> for Ulid {
	fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
		<uuid::Uuid as sqlx::Encode<'_, sqlx::Postgres>>::encode_by_ref(&self.to_uuid(), buf)
	}
}

impl From<Ulid> for ulid::Ulid {
	fn from(id: Ulid) -> Self {
		id.0
	}
}

impl From<ulid::Ulid> for Ulid {
	fn from(id: ulid::Ulid) -> Self {
		Self(id)
	}
}

impl From<uuid::Uuid> for Ulid {
	fn from(id: uuid::Uuid) -> Self {
		Self(ulid::Ulid::from(id))
	}
}

impl From<Ulid> for uuid::Uuid {
	fn from(id: Ulid) -> Self {
		id.0.into()
	}
}
