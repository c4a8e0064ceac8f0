/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Entity identifiers are opaque strings at every layer boundary.
///
/// The in-memory store issues `<prefix>_<time>_<random>` values, the
/// PostgreSQL store surfaces its `BIGSERIAL` keys in decimal.
pub type EntityId = String;
