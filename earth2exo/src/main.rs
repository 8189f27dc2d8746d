//! earth2exo: convert corner-point reservoir earth models to Exodus II
//! meshes.
//!
//! The input format is chosen by file extension (`.grdecl` for ECLIPSE,
//! none for Leapfrog) unless `--filetype` overrides it; the mesh is built
//! by the matching reader and written to `<basename>.e`.

use clap::Parser;
use earth2exo::cli::{Cli, ConvertError, FileType, Result};
use earth2exo::model::ConvertOptions;
use earth2exo::{readers, writer};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            println!("Exodus file written to {}", output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("earth2exo: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<PathBuf> {
    if cli.use_official_api {
        return Err(ConvertError::OfficialApiUnavailable);
    }

    let filetype = detect_filetype(cli)?;
    let options = ConvertOptions::from(cli);

    let model = match filetype {
        FileType::Eclipse => readers::eclipse::parse(&cli.filename, &options)?,
        FileType::Leapfrog => readers::leapfrog::parse(&cli.filename, &options)?,
    };

    let output = cli.filename.with_extension("e");
    if output.exists() {
        if cli.force {
            std::fs::remove_file(&output)?;
        } else {
            return Err(ConvertError::OutputExists(output.display().to_string()));
        }
    }

    let title = format!("Converted from {} by earth2exo", cli.filename.display());
    if let Err(err) = writer::write_model(&model, &output, &title) {
        // Don't leave a half-written mesh behind.
        let _ = std::fs::remove_file(&output);
        return Err(err);
    }

    Ok(output)
}

/// Map the input extension to a reader, unless `--filetype` decides.
fn detect_filetype(cli: &Cli) -> Result<FileType> {
    if let Some(filetype) = cli.filetype {
        return Ok(filetype);
    }
    match cli.filename.extension().and_then(|ext| ext.to_str()) {
        Some("grdecl") => Ok(FileType::Eclipse),
        None => Ok(FileType::Leapfrog),
        Some(other) => Err(ConvertError::UnsupportedExtension(format!(".{}", other))),
    }
}
