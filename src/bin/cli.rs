use schedule_import::{ProjectDocument, SourceFormat, import_project, save_project_to_json};
use std::env;
use std::fs;
use std::process::ExitCode;
use std::str::FromStr;

const USAGE: &str = "usage: cli <input> [--format gan|msproject|json] [--out <path>]";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let mut input: Option<&str> = None;
    let mut format: Option<SourceFormat> = None;
    let mut output: Option<&str> = None;

    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--format" => {
                index += 1;
                let value = args.get(index).ok_or("--format requires a value")?;
                format = Some(SourceFormat::from_str(value)?);
            }
            "--out" => {
                index += 1;
                output = Some(args.get(index).ok_or("--out requires a value")?);
            }
            "--help" | "-h" => {
                println!("{USAGE}");
                return Ok(());
            }
            other if input.is_none() => input = Some(other),
            other => return Err(format!("unexpected argument '{other}'")),
        }
        index += 1;
    }

    let Some(input) = input else {
        return Err(USAGE.to_string());
    };
    let format = match format {
        Some(format) => format,
        None => SourceFormat::from_path(input)
            .ok_or_else(|| format!("cannot sniff format from '{input}', pass --format"))?,
    };

    let bytes = fs::read(input).map_err(|err| format!("cannot read '{input}': {err}"))?;
    let document = import_project(&bytes, format).map_err(|err| err.to_string())?;

    match output {
        Some(path) => {
            save_project_to_json(&document, path).map_err(|err| err.to_string())?;
            println!("Project written to {path}.");
            Ok(())
        }
        None => print_document(&document),
    }
}

fn print_document(document: &ProjectDocument) -> Result<(), String> {
    let rendered = serde_json::to_string_pretty(document).map_err(|err| err.to_string())?;
    println!("{rendered}");
    Ok(())
}
