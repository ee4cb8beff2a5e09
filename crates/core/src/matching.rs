//! Fuzzy filename-to-resident matching for document synchronization.
//!
//! Files dropped into a document bucket rarely follow a naming scheme.
//! A file is attributed to a resident when its name contains the
//! resident's (accent-folded) name, or when its path contains the badge
//! number in one of a few common spellings.

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::types::DbId;

/// Name candidates shorter than this are too ambiguous to match on.
const MIN_NAME_CANDIDATE_LEN: usize = 3;

/// Badge candidates shorter than this are too ambiguous to match on.
const MIN_BADGE_CANDIDATE_LEN: usize = 2;

/// Badges need at least this many characters for digits-only matching.
const MIN_DIGITS_BADGE_LEN: usize = 4;

/// Lowercase, fold accents and keep only `[a-z0-9]`.
///
/// ```
/// use opvang_core::matching::normalize_text;
///
/// assert_eq!(normalize_text("Zoë Ñúñez-O'Hara"), "zoenunezohara");
/// ```
pub fn normalize_text(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// A stored file considered for matching.
#[derive(Debug, Clone)]
pub struct FileRef<'a> {
    /// Last path segment.
    pub name: &'a str,
    /// Path inside the bucket.
    pub full_path: &'a str,
}

/// The resident fields the matcher looks at.
#[derive(Debug, Clone)]
pub struct ResidentRef<'a> {
    pub id: DbId,
    pub badge: String,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

/// Why a file was attributed to a resident. Ordered weakest first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "candidate", rename_all = "snake_case")]
pub enum MatchReason {
    Digits(String),
    Badge(String),
    Name(String),
}

impl MatchReason {
    fn strength(&self) -> u8 {
        match self {
            Self::Digits(_) => 1,
            Self::Badge(_) => 2,
            Self::Name(_) => 3,
        }
    }
}

impl std::fmt::Display for MatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(c) => write!(f, "Name match: {c}"),
            Self::Badge(c) => write!(f, "Badge match: {c}"),
            Self::Digits(c) => write!(f, "Digits match: {c}"),
        }
    }
}

/// A resident the file matched, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResidentMatch {
    pub resident_id: DbId,
    pub badge: String,
    pub reason: MatchReason,
}

/// Outcome of picking one resident for a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Unique(ResidentMatch),
    Ambiguous(Vec<ResidentMatch>),
    NoMatch,
}

/// Test a single file against a single resident.
pub fn match_file(file: &FileRef<'_>, resident: &ResidentRef<'_>) -> Option<MatchReason> {
    if let Some(reason) = match_by_name(file, resident) {
        return Some(reason);
    }
    match_by_badge(file, resident)
}

fn match_by_name(file: &FileRef<'_>, resident: &ResidentRef<'_>) -> Option<MatchReason> {
    let first = normalize_text(resident.first_name);
    let last = normalize_text(resident.last_name);
    if first.is_empty() && last.is_empty() {
        return None;
    }

    let file_name = normalize_text(file.name);
    let candidates = [
        first.clone(),
        last.clone(),
        format!("{first}{last}"),
        format!("{last}{first}"),
    ];

    candidates
        .into_iter()
        .filter(|c| c.len() >= MIN_NAME_CANDIDATE_LEN)
        .find(|c| file_name.contains(c.as_str()))
        .map(MatchReason::Name)
}

fn match_by_badge(file: &FileRef<'_>, resident: &ResidentRef<'_>) -> Option<MatchReason> {
    let badge = resident.badge.trim();
    if badge.is_empty() {
        return None;
    }

    let lower = badge.to_lowercase();
    let stripped = badge.trim_start_matches('0').to_lowercase();
    let full_path = file.full_path.to_lowercase();
    let file_name = file.name.to_lowercase();

    let candidates = [
        lower.clone(),
        stripped.clone(),
        format!("badge{lower}"),
        format!("badge{stripped}"),
        format!("{lower}_"),
        format!("_{lower}"),
        format!("{stripped}_"),
        format!("_{stripped}"),
    ];

    if let Some(hit) = candidates
        .into_iter()
        .filter(|c| c.len() >= MIN_BADGE_CANDIDATE_LEN)
        .find(|c| full_path.contains(c.as_str()) || file_name.contains(c.as_str()))
    {
        return Some(MatchReason::Badge(hit));
    }

    if badge.len() >= MIN_DIGITS_BADGE_LEN {
        let digits: String = file.full_path.chars().filter(char::is_ascii_digit).collect();
        if digits.contains(badge) {
            return Some(MatchReason::Digits(badge.to_string()));
        }
    }

    None
}

/// Every resident `file` matches, in input order.
pub fn find_matches(file: &FileRef<'_>, residents: &[ResidentRef<'_>]) -> Vec<ResidentMatch> {
    residents
        .iter()
        .filter_map(|resident| {
            match_file(file, resident).map(|reason| ResidentMatch {
                resident_id: resident.id,
                badge: resident.badge.clone(),
                reason,
            })
        })
        .collect()
}

/// Pick the single resident with the strongest match.
///
/// Name beats badge beats digits. When several residents share the
/// strongest reason, the file is ambiguous and no one is picked.
pub fn best_match(file: &FileRef<'_>, residents: &[ResidentRef<'_>]) -> MatchOutcome {
    let matches = find_matches(file, residents);
    let Some(top) = matches.iter().map(|m| m.reason.strength()).max() else {
        return MatchOutcome::NoMatch;
    };

    let mut strongest: Vec<ResidentMatch> = matches
        .into_iter()
        .filter(|m| m.reason.strength() == top)
        .collect();

    if strongest.len() == 1 {
        MatchOutcome::Unique(strongest.remove(0))
    } else {
        MatchOutcome::Ambiguous(strongest)
    }
}
