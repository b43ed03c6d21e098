use crate::lookup::{LookupConfig, LookupStatus, PlateLookup, PlateLookupResponse};
use crate::ocr::load_annotations;
use crate::registry::VehicleRegistry;
use crate::reporter::AppReporter;
use crate::AppResult;
use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct LookupCommandOptions {
    pub pretty: bool,
}

pub async fn command_lookup(
    term: &Term,
    input: &Path,
    options: LookupCommandOptions,
    config: LookupConfig,
) -> AppResult<PlateLookupResponse> {
    let plate_lookup = PlateLookup::from_config(&config)?;
    lookup_with_registry(term, input, options, &plate_lookup).await
}

pub async fn lookup_with_registry<R: VehicleRegistry>(
    term: &Term,
    input: &Path,
    options: LookupCommandOptions,
    plate_lookup: &PlateLookup<R>,
) -> AppResult<PlateLookupResponse> {
    let annotations = load_annotations(input).await?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let reporter = AppReporter::from(&spinner);
    reporter.set_status(format!(
        "Looking up plates in {} OCR annotations...",
        annotations.len()
    ));

    let response = plate_lookup.process(annotations).await;
    spinner.finish_and_clear();

    let status_style = match response.status {
        LookupStatus::VehicleFound => Style::new().bold().green(),
        LookupStatus::VehicleNotFound | LookupStatus::NoValidPlateFound => {
            Style::new().bold().yellow()
        }
        LookupStatus::NoTextDetected => Style::new().bold().dim(),
        LookupStatus::RegistryLookupFailed => Style::new().bold().red(),
    };
    term.write_line(
        format!("{}", status_style.apply_to(&response.message)).as_str(),
    )?;

    let json = if options.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{json}");

    Ok(response)
}
