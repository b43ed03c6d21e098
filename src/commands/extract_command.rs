use crate::ocr::load_annotations;
use crate::plates::{classify, dedupe, extract, PlateCandidate};
use crate::reporter::AppReporter;
use crate::AppResult;
use console::{pad_str, Alignment, Style, Term};
use std::path::Path;
use tracing::debug;

pub struct ExtractCommandResult {
    pub license_plates: Vec<String>,
}

pub async fn command_extract(term: &Term, input: &Path) -> AppResult<ExtractCommandResult> {
    let bold_style = Style::new().bold();
    let dimmed_style = Style::new().dim();
    let reporter = AppReporter::from(term);

    let annotations = load_annotations(input).await?;
    reporter.report(format!(
        "Read {} OCR annotations from {}.",
        bold_style.apply_to(annotations.len()),
        bold_style.clone().white().apply_to(input.display())
    ))?;

    let candidates = extract(&annotations);
    debug!(candidates = candidates.len(), "Extracted plate candidates");
    let license_plates = dedupe(&candidates);

    if !license_plates.is_empty() {
        reporter.report(format!(
            "\n  {} {} {}",
            dimmed_style.apply_to(pad_str("Plate", 12, Alignment::Left, None)),
            dimmed_style.apply_to(pad_str("Format", 12, Alignment::Left, None)),
            dimmed_style.apply_to("Found by")
        ))?;
        for plate in &license_plates {
            let format = classify(plate)
                .map(|format| format.to_string())
                .unwrap_or_default();
            reporter.report(format!(
                "  {} {} {}",
                bold_style
                    .clone()
                    .green()
                    .apply_to(pad_str(plate, 12, Alignment::Left, None)),
                pad_str(&format, 12, Alignment::Left, None),
                strategies_for(plate, &candidates)
            ))?;
        }
    }

    Ok(ExtractCommandResult { license_plates })
}

fn strategies_for(plate: &str, candidates: &[PlateCandidate]) -> String {
    candidates
        .iter()
        .filter(|candidate| candidate.plate == plate)
        .map(|candidate| candidate.strategy.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
