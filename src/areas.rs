use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Area;

static NON_ALNUM_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid canonicalization regex"));

/// Collapses an area identifier to a comparable key. URL slugs, display
/// names, and ampersand-vs-"and" variants all land on the same form:
/// `arts-and-culture`, `Arts & Culture`, and `ARTS AND CULTURE` each become
/// `arts and culture`.
pub fn canonical_area_key(input: &str) -> String {
    let lowered = input.to_lowercase().replace('&', " and ");
    NON_ALNUM_RUN
        .replace_all(&lowered, " ")
        .trim()
        .to_string()
}

/// Finds the area matching a free-form identifier. Match tiers, first hit
/// wins: exact canonical match, then candidate-starts-with-input, then
/// input-starts-with-candidate. No match is not an error; the caller shows
/// an empty listing. New areas in the store need no code change here.
pub fn resolve_area<'a>(identifier: &str, candidates: &'a [Area]) -> Option<&'a Area> {
    let key = canonical_area_key(identifier);
    if key.is_empty() {
        return None;
    }

    let keyed: Vec<(String, &Area)> = candidates
        .iter()
        .map(|area| (canonical_area_key(&area.name), area))
        .filter(|(candidate_key, _)| !candidate_key.is_empty())
        .collect();

    if let Some((_, area)) = keyed.iter().find(|(candidate, _)| *candidate == key) {
        return Some(area);
    }
    if let Some((_, area)) = keyed.iter().find(|(candidate, _)| candidate.starts_with(&key)) {
        return Some(area);
    }
    if let Some((_, area)) = keyed
        .iter()
        .find(|(candidate, _)| key.starts_with(candidate.as_str()))
    {
        return Some(area);
    }
    None
}
