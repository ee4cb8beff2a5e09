//! Resident model.

use opvang_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `residents` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Resident {
    pub id: DbId,
    pub badge: i32,
    pub first_name: String,
    pub last_name: String,
    pub room: Option<String>,
    pub nationality: Option<String>,
    pub ov_number: Option<String>,
    pub register_number: Option<String>,
    pub date_of_birth: Option<Date>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub reference_person: Option<String>,
    pub date_in: Option<Date>,
    pub date_out: Option<Date>,
    pub days_of_stay: Option<i32>,
    pub status: Option<String>,
    pub remarks: Option<String>,
    pub room_remarks: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Resident {
    /// `"{first} {last}"`, trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// DTO for creating a resident.
///
/// Required fields default to empty so handlers can answer with a
/// validation error instead of a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateResident {
    #[serde(default)]
    pub badge: i32,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub room: Option<String>,
    pub nationality: Option<String>,
    pub ov_number: Option<String>,
    pub register_number: Option<String>,
    pub date_of_birth: Option<Date>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub reference_person: Option<String>,
    pub date_in: Option<Date>,
    pub date_out: Option<Date>,
    pub days_of_stay: Option<i32>,
    pub status: Option<String>,
    pub remarks: Option<String>,
    pub room_remarks: Option<String>,
    pub photo_url: Option<String>,
}

/// DTO for a partial resident update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateResident {
    pub badge: Option<i32>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub room: Option<String>,
    pub nationality: Option<String>,
    pub ov_number: Option<String>,
    pub register_number: Option<String>,
    pub date_of_birth: Option<Date>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub reference_person: Option<String>,
    pub date_in: Option<Date>,
    pub date_out: Option<Date>,
    pub days_of_stay: Option<i32>,
    pub status: Option<String>,
    pub remarks: Option<String>,
    pub room_remarks: Option<String>,
    pub photo_url: Option<String>,
}
