use clap::Parser;
use console::{Style, Term};
use tracing_subscriber::EnvFilter;

use std::error::Error;

mod args;
use crate::commands::*;
use crate::errors::AppError;
use args::*;

mod reporter;

mod errors;

mod commands;

mod common_types;

mod lookup;

mod ocr;

mod plates;

mod registry;

pub type AppResult<T> = Result<T, AppError>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let term = Term::stderr();
    let bold_style = Style::new().bold();

    term.write_line(
        format!(
            "{} v{}",
            bold_style.clone().green().apply_to("Plate lookup"),
            bold_style.apply_to(env!("CARGO_PKG_VERSION"))
        )
        .as_str(),
    )?;

    let cli = CliArgs::parse();
    if let Err(err) = handle_args(cli, &term).await {
        term.write_line(
            format!(
                "{}: {}\nDetails: {:?}",
                bold_style.clone().red().apply_to("Error"),
                err,
                err.source()
            )
            .as_str(),
        )?;
        std::process::exit(1);
    }

    Ok(())
}

async fn handle_args(cli: CliArgs, term: &Term) -> AppResult<()> {
    let bold_style = Style::new().bold();

    match cli.command {
        CliCommand::Extract { input } => {
            let extract_result = command_extract(term, &input).await?;
            if extract_result.license_plates.is_empty() {
                term.write_line(
                    format!("{}", Style::new().yellow().apply_to("No license plate detected."))
                        .as_str(),
                )?;
            } else {
                term.write_line(
                    format!(
                        "\n{} license plates found.",
                        bold_style
                            .clone()
                            .green()
                            .apply_to(extract_result.license_plates.len())
                    )
                    .as_str(),
                )?;
            }
        }
        CliCommand::Lookup {
            input,
            pretty,
            registry_args,
        } => {
            command_lookup(
                term,
                &input,
                LookupCommandOptions { pretty },
                registry_args.try_into()?,
            )
            .await?;
        }
    }

    Ok(())
}
