use crate::common_types::normalize_plate;
use std::collections::HashSet;

/// Reduces candidates to unique normalized plates, keeping the order in which
/// they were first seen. The first entry is the one worth looking up.
pub fn dedupe<I, S>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .map(|candidate| normalize_plate(candidate.as_ref()))
        .filter(|plate| !plate.is_empty() && seen.insert(plate.clone()))
        .collect()
}
