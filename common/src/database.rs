mod ulid;

pub use self::ulid::{Ulid, UlidParseError};
