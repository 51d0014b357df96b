//! CLI logic for the seqscript diagram tool.
//!
//! This module reads a seqscript file, parses it, and writes the diagram
//! as an outline or as JSON.

pub mod error_adapter;

mod args;
mod config;
mod error;
mod outline;

pub use args::Args;
pub use config::{AppConfig, ConfigError, OutputFormat, load_config};
pub use error::CliError;
pub use outline::render as render_outline;

use std::{
    fs,
    io::{self, Write},
};

use log::info;

use seqscript_core::semantic::Diagram;

/// Run the seqscript CLI application
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - JSON serialization errors
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Processing diagram"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;

    // Read input file
    let source = fs::read_to_string(&args.input)?;

    // Parse, labelling errors with the input path
    let parse_config = app_config.parser().clone().with_source_name(&args.input);
    let diagram = seqscript_parser::parse(&source, parse_config)
        .map_err(|err| CliError::new_parse_error(err, &source))?;

    let format = args.format.unwrap_or(app_config.output().format());
    let rendered = render(&diagram, format)?;

    // Write output
    match &args.output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!(output_file = path.as_str(), format:?; "Diagram written");
        }
        None => io::stdout().lock().write_all(rendered.as_bytes())?,
    }

    Ok(())
}

/// Render a diagram in the requested format.
///
/// # Errors
///
/// Returns `CliError::Json` if JSON serialization fails.
pub fn render(diagram: &Diagram, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Outline => Ok(outline::render(diagram)),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(diagram)?;
            json.push('\n');
            Ok(json)
        }
    }
}
