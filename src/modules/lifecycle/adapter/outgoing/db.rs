use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::DbErr;

use crate::modules::lifecycle::application::ports::outgoing::StoreError;

pub fn map_db_err(e: DbErr) -> StoreError {
    StoreError::Database(e.to_string())
}

/// Like `map_db_err`, but a unique violation becomes a conflict on the first
/// listed field named in the error (constraint names embed the column).
pub fn map_write_err(e: DbErr, unique_fields: &[&str]) -> StoreError {
    let err_str = e.to_string().to_lowercase();
    let is_unique_violation = err_str.contains("23505")
        || err_str.contains("duplicate key")
        || err_str.contains("unique constraint");

    if !is_unique_violation {
        return StoreError::Database(e.to_string());
    }

    let field = unique_fields
        .iter()
        .find(|field| err_str.contains(&field.to_lowercase()))
        .or_else(|| unique_fields.first())
        .copied()
        .unwrap_or("record");
    StoreError::Conflict(field.to_string())
}

pub fn to_utc(value: DateTimeWithTimeZone) -> DateTime<Utc> {
    value.with_timezone(&Utc)
}
