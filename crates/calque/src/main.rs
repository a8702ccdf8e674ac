//! Command-line entry point: read a template, convert, write it back out.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use calque::{ng_module, noscript_module, convert_str, Converter};

#[derive(Parser)]
#[command(name = "calque")]
#[command(about = "Rewrite client-side templates into server-side templates", long_about = None)]
#[command(version)]
struct Cli {
    /// Input file (defaults to stdin)
    #[arg(short, long)]
    infile: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    outfile: Option<PathBuf>,

    /// Increase log verbosity (repeat for more: -v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Start from an empty registry instead of the built-in modules
    #[arg(long)]
    no_ng: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let input = match read_input(cli.infile.as_deref()) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("calque: failed to read input: {err}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        from = %cli.infile.as_deref().map_or_else(|| "<stdin>".into(), |p| p.display().to_string()),
        to = %cli.outfile.as_deref().map_or_else(|| "<stdout>".into(), |p| p.display().to_string()),
        "converting"
    );

    let modules = if cli.no_ng {
        vec![]
    } else {
        vec![ng_module(), noscript_module()]
    };
    let converter = Converter::new(modules);
    let output = convert_str(&input, &converter);

    if let Err(err) = write_output(cli.outfile.as_deref(), &output) {
        eprintln!("calque: failed to write output: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn read_input(path: Option<&std::path::Path>) -> std::io::Result<String> {
    match path {
        // `-` is the conventional stdin spelling.
        Some(path) if path != std::path::Path::new("-") => std::fs::read_to_string(path),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&std::path::Path>, output: &str) -> std::io::Result<()> {
    match path {
        Some(path) if path != std::path::Path::new("-") => std::fs::write(path, output),
        _ => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes())
        }
    }
}
