//! Youth-overview roster rules: tab location, editable columns and moves.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Which tab of the roster a record is listed under.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TabLocation {
    #[default]
    In,
    Out,
}

impl TabLocation {
    /// Strict parse; the roster only knows `IN` and `OUT`.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "IN" => Ok(Self::In),
            "OUT" => Ok(Self::Out),
            _ => Err(CoreError::Validation(
                r#"Invalid tab. Must be "IN" or "OUT""#.into(),
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }
}

impl std::fmt::Display for TabLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Columns a client may write. `badge` is the key and never editable.
pub const EDITABLE_FIELDS: &[&str] = &[
    "naam",
    "voornaam",
    "geboortedatum",
    "leeftijd",
    "todos",
    "aandachtspunten",
    "datum_in",
    "intake",
    "referent",
    "gb",
    "nb",
    "back_up",
    "hr",
    "procedure",
    "voogd",
    "advocaat",
    "twijfel",
    "uitnodiging",
    "test",
    "resultaat",
    "opvolging_door",
    "betekening",
    "wijziging_match_it",
    "scan_dv",
    "versie",
    "voorlopige_versie_klaar",
    "voorlopige_versie_verzonden",
    "definitieve_versie",
    "procedureles",
    "og",
    "mdo",
    "mdo2",
    "bxl_uitstap",
    "context",
    "opbouw_context",
    "specificaties",
    "stavaza",
    "autonomie",
    "context2",
    "medisch",
    "pleegzorg",
    "aanmelding_nodig",
    "vist_adoc",
    "datum_transfer",
    "transferdossier_verzonden",
    "out_status",
    "tab_location",
];

/// `resultaat` values reported by the age-verification view.
pub const AGE_VERIFICATION_RESULTS: &[&str] = &["Meerderjarig", "Minderjarig"];

/// Reject columns outside [`EDITABLE_FIELDS`].
pub fn validate_field(name: &str) -> Result<&'static str, CoreError> {
    EDITABLE_FIELDS
        .iter()
        .find(|f| **f == name)
        .copied()
        .ok_or_else(|| CoreError::Validation(format!("Unknown field: {name}")))
}

/// A validated column assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: &'static str,
    pub value: Option<String>,
}

/// Validate every `(field, value)` pair; `tab_location` must be present and parse.
pub fn validate_changes<I>(changes: I) -> Result<Vec<FieldChange>, CoreError>
where
    I: IntoIterator<Item = (String, Option<String>)>,
{
    changes
        .into_iter()
        .map(|(name, value)| {
            let field = validate_field(&name)?;
            if field == "tab_location" {
                match &value {
                    Some(v) => {
                        TabLocation::parse(v)?;
                    }
                    None => {
                        return Err(CoreError::Validation(
                            "tab_location cannot be empty".into(),
                        ))
                    }
                }
            }
            Ok(FieldChange { field, value })
        })
        .collect()
}

/// Optional columns carried along with a tab move.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoveExtras {
    pub datum_transfer: Option<String>,
    pub transferdossier_verzonden: Option<String>,
    pub out_status: Option<String>,
}

/// Column assignments for moving a record to `tab` on `today`.
///
/// Moving to OUT without a transfer date stamps `today` as `YYYY-MM-DD`.
/// Empty strings count as absent.
pub fn move_changes(tab: TabLocation, extras: MoveExtras, today: NaiveDate) -> Vec<FieldChange> {
    let present = |v: Option<String>| v.filter(|s| !s.is_empty());

    let mut changes = vec![FieldChange {
        field: "tab_location",
        value: Some(tab.as_str().to_string()),
    }];

    let datum_transfer = present(extras.datum_transfer).or_else(|| {
        (tab == TabLocation::Out).then(|| today.format("%Y-%m-%d").to_string())
    });
    if let Some(v) = datum_transfer {
        changes.push(FieldChange {
            field: "datum_transfer",
            value: Some(v),
        });
    }
    if let Some(v) = present(extras.transferdossier_verzonden) {
        changes.push(FieldChange {
            field: "transferdossier_verzonden",
            value: Some(v),
        });
    }
    if let Some(v) = present(extras.out_status) {
        changes.push(FieldChange {
            field: "out_status",
            value: Some(v),
        });
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 3).unwrap()
    }

    #[test]
    fn tab_parse_is_strict() {
        assert_eq!(TabLocation::parse("OUT").unwrap(), TabLocation::Out);
        assert_matches!(TabLocation::parse("out"), Err(CoreError::Validation(m)) if m.contains("Invalid tab"));
    }

    #[test]
    fn badge_is_not_editable() {
        assert!(validate_field("referent").is_ok());
        assert_matches!(validate_field("badge"), Err(CoreError::Validation(_)));
        assert_matches!(validate_field("naam; DROP TABLE"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn changes_validate_tab_values() {
        let ok = validate_changes([("tab_location".to_string(), Some("OUT".to_string()))]);
        assert_eq!(ok.unwrap().len(), 1);
        let bad = validate_changes([("tab_location".to_string(), Some("ELSEWHERE".to_string()))]);
        assert_matches!(bad, Err(CoreError::Validation(_)));
        let cleared = validate_changes([("tab_location".to_string(), None)]);
        assert_matches!(cleared, Err(CoreError::Validation(_)));
    }

    #[test]
    fn move_out_stamps_today() {
        let changes = move_changes(TabLocation::Out, MoveExtras::default(), day());
        assert_eq!(changes[0].value.as_deref(), Some("OUT"));
        assert_eq!(
            changes[1],
            FieldChange {
                field: "datum_transfer",
                value: Some("2024-11-03".into())
            }
        );
    }

    #[test]
    fn move_out_keeps_explicit_date() {
        let extras = MoveExtras {
            datum_transfer: Some("2024-10-01".into()),
            out_status: Some("Transfer".into()),
            ..Default::default()
        };
        let changes = move_changes(TabLocation::Out, extras, day());
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[1].value.as_deref(), Some("2024-10-01"));
        assert_eq!(changes[2].field, "out_status");
    }

    #[test]
    fn move_in_has_no_transfer_date() {
        let changes = move_changes(TabLocation::In, MoveExtras::default(), day());
        assert_eq!(changes.len(), 1);
    }
}
