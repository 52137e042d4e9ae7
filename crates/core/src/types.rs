/// Listing ids are opaque strings (UUIDv7 for new records, legacy records may
/// carry timestamp-derived ids).
pub type RecordId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh listing id.
///
/// UUIDv7 embeds the creation time in its leading bits, so ids sort in
/// creation order even in the file backend where no timestamp column exists.
pub fn generate_record_id() -> RecordId {
    uuid::Uuid::now_v7().to_string()
}
