//! Print the OpenAPI document as JSON.

use clap::Parser;
use color_eyre::eyre::Result;
use users_api::doc::ApiDoc;
use utoipa::OpenApi;

/// `openapi-dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "openapi-dump",
    about = "Print the Users API OpenAPI document to stdout",
    version
)]
struct CliArgs {
    /// Emit single-line JSON instead of pretty-printed output.
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let doc = ApiDoc::openapi();
    let json = if args.compact {
        doc.to_json()?
    } else {
        doc.to_pretty_json()?
    };
    println!("{json}");
    Ok(())
}
