//! Payload rules for the staff assignment grid ("toewijzingen").
//!
//! The grid assigns residents to staff columns per day. Cells are keyed by
//! `(assignment_date, row_number, column_number)`; staff members by
//! `(assignment_date, position)`.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::CoreError;

/// Integer that clients send either as a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LooseInt {
    Int(i32),
    Text(String),
}

impl LooseInt {
    fn parse(&self, field: &str) -> Result<i32, CoreError> {
        match self {
            Self::Int(v) => Ok(*v),
            Self::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| CoreError::Validation(format!("{field} must be a number"))),
        }
    }
}

/// Grid cell as received from a client.
#[derive(Debug, Clone, Deserialize)]
pub struct GridCellInput {
    pub row_number: Option<LooseInt>,
    pub column_number: Option<LooseInt>,
    pub resident_name: Option<String>,
    pub color_status: Option<String>,
    pub assignment_date: Option<NaiveDate>,
}

/// A cleaned grid cell ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub assignment_date: NaiveDate,
    pub row_number: i32,
    pub column_number: i32,
    pub resident_name: String,
    pub color_status: Option<String>,
}

impl GridCell {
    /// No resident and no colour: nothing worth keeping.
    pub fn is_empty(&self) -> bool {
        self.resident_name.is_empty() && self.color_status.is_none()
    }
}

/// Trim the name, coerce coordinates and default the date to `today`.
pub fn sanitize_cell(input: GridCellInput, today: NaiveDate) -> Result<GridCell, CoreError> {
    let coordinate = |value: Option<LooseInt>, field: &str| -> Result<i32, CoreError> {
        let n = value
            .ok_or_else(|| CoreError::Validation(format!("Missing required field: {field}")))?
            .parse(field)?;
        if n < 0 {
            return Err(CoreError::Validation(format!("{field} must not be negative")));
        }
        Ok(n)
    };

    Ok(GridCell {
        row_number: coordinate(input.row_number, "row_number")?,
        column_number: coordinate(input.column_number, "column_number")?,
        resident_name: input
            .resident_name
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        color_status: input.color_status.filter(|c| !c.trim().is_empty()),
        assignment_date: input.assignment_date.unwrap_or(today),
    })
}

/// Staff header entry as received from a client.
#[derive(Debug, Clone, Deserialize)]
pub struct StaffInput {
    pub position: Option<LooseInt>,
    pub name: Option<String>,
    pub assignment_date: Option<NaiveDate>,
}

/// A validated staff assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffAssignment {
    pub assignment_date: NaiveDate,
    pub position: i32,
    pub name: String,
}

pub fn validate_staff(input: StaffInput, today: NaiveDate) -> Result<StaffAssignment, CoreError> {
    let position = input
        .position
        .ok_or_else(|| CoreError::Validation("Missing required field: position".into()))?
        .parse("position")?;
    if position < 1 {
        return Err(CoreError::Validation("position must be at least 1".into()));
    }

    let name = input.name.map(|n| n.trim().to_string()).unwrap_or_default();
    if name.is_empty() {
        return Err(CoreError::Validation("Missing required field: name".into()));
    }

    Ok(StaffAssignment {
        assignment_date: input.assignment_date.unwrap_or(today),
        position,
        name,
    })
}
