//! `css-prefixer`: add and remove vendor prefixes in a stylesheet.

mod args;

use anyhow::{Context as _, Result};
use args::{Args, USAGE};
use css_prefixer::{DiagnosticRecord, Engine, Options};
use env_logger::{Builder, Env};
use log::info;
use std::env;
use std::fs;
use std::io::{Read as _, Write as _, stderr, stdin, stdout};
use std::path::Path;

fn read_input(input: Option<&Path>) -> Result<(String, String)> {
    match input {
        Some(path) if path != Path::new("-") => {
            let css = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
            Ok((path.display().to_string(), css))
        }
        _ => {
            let mut css = String::new();
            stdin().read_to_string(&mut css).context("failed to read stdin")?;
            Ok(("<stdin>".to_owned(), css))
        }
    }
}

fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, text).with_context(|| format!("failed to write {}", path.display())),
        None => stdout().write_all(text.as_bytes()).context("failed to write stdout"),
    }
}

fn print_info(engine: &mut Engine, args: &Args, options: &Options) -> Result<()> {
    let text = if args.json {
        serde_json::to_string_pretty(&engine.report(options)?)?
    } else {
        engine.info(options)?
    };
    writeln!(stdout(), "{text}")?;
    Ok(())
}

fn prefix(engine: &mut Engine, args: &Args, options: &Options) -> Result<()> {
    let (name, css) = read_input(args.input.as_deref())?;
    let processed = engine
        .process_css(&css, options)
        .with_context(|| format!("failed to prefix {name}"))?;
    info!("{name}: {} warnings", processed.diagnostics.len());
    let mut errors = stderr();
    if args.json {
        let records: Vec<DiagnosticRecord> = processed.diagnostics.iter().map(DiagnosticRecord::from).collect();
        writeln!(errors, "{}", serde_json::to_string(&records)?)?;
    } else {
        for diagnostic in &processed.diagnostics {
            writeln!(errors, "{name}:{diagnostic}")?;
        }
    }
    write_output(args.output.as_deref(), &processed.css)
}

/// # Errors
/// Returns an error if the arguments, the config file or the input are
/// invalid, or the output cannot be written.
fn main() -> Result<()> {
    Builder::from_env(Env::default().filter_or("RUST_LOG", "error")).init();
    let args = Args::parse(env::args().skip(1))?;
    if args.help {
        writeln!(stdout(), "{USAGE}")?;
        return Ok(());
    }
    let env_grid = env::var("AUTOPREFIXER_GRID").ok();
    let options = args.options(env_grid.as_deref())?;
    let mut engine = Engine::new().context("failed to load the bundled browser data")?;
    if args.info {
        print_info(&mut engine, &args, &options)
    } else {
        prefix(&mut engine, &args, &options)
    }
}
