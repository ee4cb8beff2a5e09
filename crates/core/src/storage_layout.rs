//! Resident folder layout inside the document buckets.
//!
//! Documents live at `{IN|OUT}/{badge}_{First}_{Last}/{file}` in the bucket
//! of their direction. The helpers here build, parse and recognise that
//! layout, and derive the descriptions written on transferred documents.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::document_kind::DocumentType;

/// Folder name for a resident: `{badge}_{sanitized name}`.
///
/// Characters other than ASCII letters, digits and whitespace are dropped;
/// whitespace runs become a single `_`.
///
/// ```
/// use opvang_core::storage_layout::resident_folder_name;
///
/// assert_eq!(resident_folder_name("24191", "John Doe"), "24191_John_Doe");
/// assert_eq!(resident_folder_name("7", "Zoë  O'Brien"), "7_Zo_OBrien");
/// ```
pub fn resident_folder_name(badge: &str, full_name: &str) -> String {
    let kept: String = full_name
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    let sanitized = kept.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{}_{}", badge.trim(), sanitized)
}

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Storage path of a document inside its bucket:
/// `{IN|OUT}/{folder}/{sanitized file name}`.
pub fn organized_storage_path(
    badge: &str,
    full_name: &str,
    file_name: &str,
    kind: DocumentType,
) -> String {
    format!(
        "{}/{}",
        resident_folder_prefix(badge, full_name, kind),
        sanitize_file_name(file_name)
    )
}

/// Prefix under which all of a resident's documents of one direction live.
pub fn resident_folder_prefix(badge: &str, full_name: &str, kind: DocumentType) -> String {
    format!("{}/{}", kind.as_str(), resident_folder_name(badge, full_name))
}

/// Split a folder name back into `(badge, name)`.
///
/// Returns `None` when the folder has no `_` separator. Underscores in the
/// name part become spaces.
pub fn parse_resident_folder_name(folder: &str) -> Option<(String, String)> {
    let (badge, rest) = folder.split_once('_')?;
    if badge.is_empty() {
        return None;
    }
    Some((badge.to_string(), rest.replace('_', " ")))
}

fn folder_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9A-Za-z]+_[A-Za-z0-9_]+$").expect("valid regex"))
}

fn organized_segment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+_[A-Za-z0-9_]+$").expect("valid regex"))
}

/// Whether `folder` follows the `Badge_Name` format.
pub fn is_valid_resident_folder_name(folder: &str) -> bool {
    folder_name_regex().is_match(folder)
}

/// Whether any segment of `path` is a numeric-badge resident folder.
pub fn is_organized_path(path: &str) -> bool {
    path.split('/')
        .any(|segment| organized_segment_regex().is_match(segment))
}

/// Storage path of a document given whatever was recorded in `file_path`.
///
/// Public URLs of the form `…/object/public/{bucket}/{path}` yield `path`.
/// Other absolute URLs fall back to their last segment (flat legacy
/// uploads). Anything else is already a storage path.
pub fn extract_storage_path(file_path: &str, bucket: &str) -> String {
    let marker = format!("/object/public/{bucket}/");
    if let Some((_, tail)) = file_path.split_once(&marker) {
        return tail.to_string();
    }
    if file_path.starts_with("http://") || file_path.starts_with("https://") {
        return file_path
            .rsplit('/')
            .next()
            .unwrap_or(file_path)
            .to_string();
    }
    file_path.trim_start_matches('/').to_string()
}

/// Description written on a document copied into a resident's OUT dossier.
pub fn document_description(original: &str, folder: &str, date: NaiveDate) -> String {
    let date_str = date.format("%-d-%-m-%Y");
    if original.trim().is_empty() {
        format!("Document voor bewoner {folder} (Overgedragen: {date_str})")
    } else {
        format!("{original} (Bewoner: {folder}, Overgedragen: {date_str})")
    }
}

/// Lowercase extension of `file_name`, or an empty string.
pub fn file_extension(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    }
}

/// Prefix `label` onto a file name unless the base name already carries it.
pub fn standardized_file_name(original: &str, label: &str) -> String {
    let (base, ext) = match original.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() => (base, Some(ext)),
        _ => (original, None),
    };

    if base.to_lowercase().contains(&label.to_lowercase()) {
        return original.to_string();
    }

    match ext {
        Some(ext) => format!("{label}_{base}.{ext}"),
        None => format!("{label}_{base}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_name_strips_specials() {
        assert_eq!(resident_folder_name("24191", "John Doe"), "24191_John_Doe");
        assert_eq!(
            resident_folder_name("100", "  Ana-Maria   da Silva "),
            "100_AnaMaria_da_Silva"
        );
        assert_eq!(resident_folder_name("5", "Élodie"), "5_lodie");
    }

    #[test]
    fn organized_path_layout() {
        assert_eq!(
            organized_storage_path("24191", "John Doe", "bijlage 26.pdf", DocumentType::Out),
            "OUT/24191_John_Doe/bijlage_26.pdf"
        );
        assert_eq!(
            organized_storage_path("24191", "John Doe", "scan.pdf", DocumentType::In),
            "IN/24191_John_Doe/scan.pdf"
        );
    }

    #[test]
    fn parse_folder_round_trip() {
        let folder = resident_folder_name("24191", "John Doe");
        let (badge, name) = parse_resident_folder_name(&folder).unwrap();
        assert_eq!(badge, "24191");
        assert_eq!(name, "John Doe");
    }

    #[test]
    fn parse_folder_without_separator() {
        assert!(parse_resident_folder_name("24191").is_none());
        assert!(parse_resident_folder_name("_John").is_none());
    }

    #[test]
    fn validity_checks() {
        assert!(is_valid_resident_folder_name("24191_John_Doe"));
        assert!(!is_valid_resident_folder_name("24191 John"));
        assert!(!is_valid_resident_folder_name("John"));
    }

    #[test]
    fn organized_path_detection() {
        assert!(is_organized_path("IN/24191_John_Doe/scan.pdf"));
        assert!(!is_organized_path("scan.pdf"));
        assert!(!is_organized_path("IN/scans/scan.pdf"));
    }

    #[test]
    fn extract_from_public_url() {
        let url = "https://x.example.co/storage/v1/object/public/administrative-documents/IN/1_A_B/f.pdf";
        assert_eq!(
            extract_storage_path(url, "administrative-documents"),
            "IN/1_A_B/f.pdf"
        );
    }

    #[test]
    fn extract_from_foreign_url_takes_last_segment() {
        assert_eq!(
            extract_storage_path("https://cdn.example.com/a/b/f.pdf", "administrative-documents"),
            "f.pdf"
        );
    }

    #[test]
    fn extract_keeps_plain_paths() {
        assert_eq!(
            extract_storage_path("IN/1_A_B/f.pdf", "administrative-documents"),
            "IN/1_A_B/f.pdf"
        );
        assert_eq!(extract_storage_path("/f.pdf", "administrative-documents"), "f.pdf");
    }

    #[test]
    fn description_formats() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            document_description("Bijlage 26", "1_A_B", date),
            "Bijlage 26 (Bewoner: 1_A_B, Overgedragen: 7-3-2024)"
        );
        assert_eq!(
            document_description("", "1_A_B", date),
            "Document voor bewoner 1_A_B (Overgedragen: 7-3-2024)"
        );
    }

    #[test]
    fn extension_and_standardized_names() {
        assert_eq!(file_extension("scan.PDF"), "pdf");
        assert_eq!(file_extension("README"), "");
        assert_eq!(file_extension(".hidden"), "");
        assert_eq!(standardized_file_name("scan.pdf", "bijlage26"), "bijlage26_scan.pdf");
        assert_eq!(
            standardized_file_name("Bijlage26_scan.pdf", "bijlage26"),
            "Bijlage26_scan.pdf"
        );
        assert_eq!(standardized_file_name("scan", "passport"), "passport_scan");
    }
}
