//! Print the Foodgram OpenAPI document to stdout.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use clap::{Parser, ValueEnum};
use foodgram::ApiDoc;
use utoipa::OpenApi;

/// Output encoding for the dumped document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum Format {
    #[default]
    Json,
    Yaml,
}

/// `openapi-dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "openapi-dump", about = "Print the OpenAPI document", version)]
struct CliArgs {
    /// Output encoding.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

fn render(format: Format) -> color_eyre::Result<String> {
    let doc = ApiDoc::openapi();
    let rendered = match format {
        Format::Json => doc.to_pretty_json()?,
        Format::Yaml => doc.to_yaml()?,
    };
    Ok(rendered)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    println!("{}", render(args.format)?);
    Ok(())
}
