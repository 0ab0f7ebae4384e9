//! Print the descriptive metadata of font files.
//!
//! Each input is gated on its extension (`.ttf`, `.otf`, `.woff`, `.woff2`)
//! and size, then read and printed as a single JSON object, with `null` for
//! any field the font does not provide.
//!
//! A file that is not a readable font exits with status 1; I/O and other
//! unexpected failures exit with status 2. Set `RUST_LOG=debug` to see
//! which name records and tables were skipped.

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use font_metadata::{
    DecodeError, FontContainer, FontExtension, FontMetadata, UnsupportedExtension,
};

/// 32 MiB
const DEFAULT_MAX_SIZE: u64 = 32 * 1024 * 1024;

const SERVICE_NAME: &str = "Font Parser Service";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The font files to read.
    #[arg(required_unless_present = "info")]
    files: Vec<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Reject files larger than this many bytes
    #[arg(long, default_value_t = DEFAULT_MAX_SIZE)]
    max_size: u64,

    /// Validate table checksums, logging any mismatches as warnings
    #[arg(long)]
    check_checksums: bool,

    /// Print the service identity record and exit
    #[arg(long)]
    info: bool,
}

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error(transparent)]
    UnsupportedExtension(#[from] UnsupportedExtension),
    #[error("File too large: {size} bytes, the limit is {max}")]
    TooLarge { size: u64, max: u64 },
    #[error("Failed to parse font file: {0}")]
    Decode(#[from] DecodeError),
    #[error("Internal error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Problems with the input are 1, problems with us are 2.
    fn exit_code(&self) -> u8 {
        match self {
            Error::UnsupportedExtension(_) | Error::TooLarge { .. } | Error::Decode(_) => 1,
            Error::Io(_) | Error::Json(_) => 2,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if args.info {
        println!("{}", service_info());
        return ExitCode::SUCCESS;
    }

    let mut status = 0;
    for path in &args.files {
        let result =
            read_metadata(path, &args).and_then(|metadata| to_json(&metadata, args.pretty));
        match result {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                status = e.exit_code().max(status);
            }
        }
    }
    ExitCode::from(status)
}

fn service_info() -> serde_json::Value {
    serde_json::json!({
        "service": SERVICE_NAME,
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    })
}

fn read_metadata(path: &Path, args: &Args) -> Result<FontMetadata, Error> {
    // gate before touching the file contents
    let extension = FontExtension::from_path(path)?;
    let size = fs::metadata(path)?.len();
    if size > args.max_size {
        return Err(Error::TooLarge {
            size,
            max: args.max_size,
        });
    }
    let bytes = fs::read(path)?;
    log::debug!("read {} ({size} bytes)", path.display());
    extract(&bytes, extension, args.check_checksums)
}

fn extract(
    bytes: &[u8],
    extension: FontExtension,
    check_checksums: bool,
) -> Result<FontMetadata, Error> {
    if !check_checksums {
        return Ok(font_metadata::parse_font(bytes, extension.as_str())?);
    }
    let font = FontContainer::read(bytes)?;
    let mismatches = font.validate_checksums();
    if !mismatches.is_empty() {
        log::warn!(
            "{} of {} tables failed checksum validation",
            mismatches.len(),
            font.len()
        );
    }
    Ok(font.metadata())
}

fn to_json(metadata: &FontMetadata, pretty: bool) -> Result<String, Error> {
    let json = if pretty {
        serde_json::to_string_pretty(metadata)?
    } else {
        serde_json::to_string(metadata)?
    };
    Ok(json)
}
