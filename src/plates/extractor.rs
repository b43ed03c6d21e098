use crate::common_types::normalize_plate;
use crate::ocr::TextAnnotation;
use crate::plates::patterns::{classify, PlateFormat};
use regex::Regex;
use std::fmt::Display;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    FullTextRegex,
    SingleFragment,
    TwoFragmentCombination,
    ThreeFragmentCombination,
}

impl Display for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionStrategy::FullTextRegex => write!(f, "full-text-regex"),
            ExtractionStrategy::SingleFragment => write!(f, "single-fragment"),
            ExtractionStrategy::TwoFragmentCombination => write!(f, "two-fragment-combination"),
            ExtractionStrategy::ThreeFragmentCombination => {
                write!(f, "three-fragment-combination")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlateCandidate {
    pub plate: String,
    pub strategy: ExtractionStrategy,
}

impl AsRef<str> for PlateCandidate {
    fn as_ref(&self) -> &str {
        &self.plate
    }
}

static FULL_TEXT_PLATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]{2}\s?[0-9]{2}\s?[A-Z]{3}").unwrap());

/// Runs every extraction strategy and returns the candidates in strategy order:
/// full text matches, single fragments, fragment pairs, fragment triples.
/// The result may hold the same plate more than once; see [`super::dedupe`].
pub fn extract(annotations: &[TextAnnotation]) -> Vec<PlateCandidate> {
    let Some((full_text, fragments)) = annotations.split_first() else {
        return Vec::new();
    };
    let fragments: Vec<&str> = fragments.iter().map(|a| a.text.as_str()).collect();

    let mut candidates = extract_from_full_text(&full_text.text);
    candidates.extend(extract_single_fragments(&fragments));
    candidates.extend(extract_fragment_pairs(&fragments));
    candidates.extend(extract_fragment_triples(&fragments));
    candidates
}

fn extract_from_full_text(full_text: &str) -> Vec<PlateCandidate> {
    let full_text = full_text.replace(['\r', '\n'], " ");
    FULL_TEXT_PLATE_REGEX
        .find_iter(&full_text)
        .map(|found| PlateCandidate {
            plate: normalize_plate(found.as_str()),
            strategy: ExtractionStrategy::FullTextRegex,
        })
        .collect()
}

fn extract_single_fragments(fragments: &[&str]) -> Vec<PlateCandidate> {
    fragments
        .iter()
        .filter_map(|fragment| complete_plate(fragment.trim(), ExtractionStrategy::SingleFragment))
        .collect()
}

fn extract_fragment_pairs(fragments: &[&str]) -> Vec<PlateCandidate> {
    fragments
        .windows(2)
        .filter_map(|pair| {
            complete_plate(
                &format!("{} {}", pair[0], pair[1]),
                ExtractionStrategy::TwoFragmentCombination,
            )
        })
        .collect()
}

// Region code and age identifier tend to come back glued together while the
// three random letters stay separate, hence the asymmetric join.
fn extract_fragment_triples(fragments: &[&str]) -> Vec<PlateCandidate> {
    fragments
        .windows(3)
        .filter_map(|triple| {
            complete_plate(
                &format!("{}{} {}", triple[0], triple[1], triple[2]),
                ExtractionStrategy::ThreeFragmentCombination,
            )
        })
        .collect()
}

// Fragments may pass the matcher on a partial shape, those are dropped here.
fn complete_plate(text: &str, strategy: ExtractionStrategy) -> Option<PlateCandidate> {
    let plate = normalize_plate(text);
    classify(&plate)
        .filter(PlateFormat::is_complete)
        .map(|_| PlateCandidate { plate, strategy })
}
