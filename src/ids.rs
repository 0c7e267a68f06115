use once_cell::sync::Lazy;
use regex::Regex;

static ENTITY_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:MRBTS-|BSC-)(\d+)").expect("entity id pattern"));

/// Extracts the canonical entity id from a free-form managed-object path.
///
/// The canonical id is the numeric token of the first `MRBTS-<n>` or
/// `BSC-<n>` segment, e.g. `"PLMN-PLMN/MRBTS-1900/EQM_R-4/..."` -> `"1900"`.
/// Absence is a valid terminal classification (an unmatchable alarm), not an
/// error.
pub fn resolve(raw_object_path: &str) -> Option<String> {
    ENTITY_ID_PATTERN
        .captures(raw_object_path)
        .map(|captures| captures[1].to_string())
}

/// Normalizes a KPI-side entity identifier to the canonical id used as the
/// join key: `"MRBTS-1900"` -> `"1900"`, while an already-canonical `"1900"`
/// passes through unchanged.
pub fn normalize_entity(entity: &str) -> String {
    let trimmed = entity.trim();
    match ENTITY_ID_PATTERN.captures(trimmed) {
        Some(captures) => captures[1].to_string(),
        None => trimmed.to_string(),
    }
}
