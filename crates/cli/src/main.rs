use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use faceblur_core::config::{INPUT_MODE_VAR, OUTPUT_MODE_VAR, QUERY_VAR};
use faceblur_core::shared::constants::DEFAULT_CASCADE_PATH;
use faceblur_core::{BlurImageUseCase, HandlerConfig};

/// Blur faces in one image per invocation.
///
/// Reads the request body from stdin and writes the response body to stdout.
#[derive(Parser)]
#[command(name = "faceblur")]
struct Cli {
    /// Read the request body from this file instead of stdin.
    #[arg(long)]
    input: Option<PathBuf>,

    /// "url" to download the image named by the body; anything else decodes the body.
    #[arg(long, env = INPUT_MODE_VAR)]
    input_mode: Option<String>,

    /// "image" or "json_image"; overrides the query's `output` parameter.
    #[arg(long, env = OUTPUT_MODE_VAR)]
    output_mode: Option<String>,

    /// Raw request query string.
    #[arg(long, env = QUERY_VAR)]
    query: Option<String>,

    /// Pre-trained face cascade.
    #[arg(long, env = "cascade_path", default_value = DEFAULT_CASCADE_PATH)]
    cascade: PathBuf,
}

fn main() {
    env_logger::init();

    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    }
}

/// Returns whether the invocation succeeded.
fn run() -> Result<bool, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let request = read_request(&cli)?;
    let config = HandlerConfig::resolve(
        cli.input_mode.as_deref(),
        cli.output_mode.as_deref(),
        cli.query.as_deref(),
    );

    let use_case = BlurImageUseCase::with_cascade(&cli.cascade);
    let response = use_case.handle(&request, &config);

    log::info!(
        "{} {} ({} bytes)",
        response.status,
        response.content_type().unwrap_or("-"),
        response.body.len()
    );

    let mut stdout = io::stdout().lock();
    stdout.write_all(&response.body)?;
    stdout.flush()?;

    Ok(response.is_success())
}

fn read_request(cli: &Cli) -> io::Result<Vec<u8>> {
    match &cli.input {
        Some(path) => fs::read(path),
        None => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}
