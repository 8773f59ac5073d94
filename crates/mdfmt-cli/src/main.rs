//! mdfmt - rewrite markdown documents in one canonical style

use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use mdfmt_config::Config;
use mdfmt_engine::{
    DEFAULT_COLS, Options, Renderer, format_file, scan_markdown_files, write_file,
};

/// Name reported for standard input by `-l`.
const STDIN_NAME: &str = "<stdin>";

#[derive(Parser, Debug)]
#[command(name = "mdfmt")]
#[command(version, about = "Rewrite markdown in one canonical style", long_about = None)]
#[command(after_help = "EXAMPLES:
    mdfmt README.md          Print README.md in canonical form
    mdfmt -l docs/           List files under docs/ that would change
    mdfmt -w -cols 72 docs/  Rewrite files in place at 72 columns
    cat notes.md | mdfmt     Format standard input")]
struct Cli {
    /// Files or directories to format; standard input when none are given
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Number of columns to wrap output [default: 80, or `cols` from the config file]
    #[arg(short = 'c', long, value_name = "N")]
    cols: Option<usize>,

    /// Write changes back to the source file
    #[arg(short = 'w')]
    write: bool,

    /// List files whose canonical form differs from their contents
    #[arg(short = 'l')]
    list: bool,

    /// Config file to read instead of ~/.config/mdfmt/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut err = stderr.lock();
    match run(&cli, &mut io::stdin().lock(), &mut stdout.lock(), &mut err) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            let _ = writeln!(err, "error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Accept the single-dash `-cols N` and `-cols=N` spellings alongside
/// `--cols`. Arguments after `--` are left alone.
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let mut seen_separator = false;
    args.into_iter()
        .map(|arg| {
            if seen_separator {
                return arg;
            }
            match arg.to_str() {
                Some("--") => {
                    seen_separator = true;
                    arg
                }
                Some("-cols") => OsString::from("--cols"),
                Some(s) if s.starts_with("-cols=") => OsString::from(format!("-{s}")),
                _ => arg,
            }
        })
        .collect()
}

fn render_options(cli: &Cli) -> Result<Options> {
    let config = match &cli.config {
        Some(path) => Some(Config::load_required(path)?),
        None => Config::load()?,
    };
    if let Some(config) = &config {
        log::debug!("loaded config: {config:?}");
    }

    let cols = Config::resolve_cols(config.as_ref(), cli.cols, DEFAULT_COLS);
    Ok(Options::with_cols(cols))
}

/// Format everything the command line names.
///
/// Returns `Ok(false)` when at least one file failed; those failures have
/// already been reported on `err`. Usage and configuration problems abort
/// the run with `Err`.
fn run(
    cli: &Cli,
    stdin: &mut impl Read,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<bool> {
    if cli.paths.is_empty() && cli.write {
        bail!("cannot use -w when reading stdin");
    }

    let renderer = Renderer::new(render_options(cli)?);
    log::debug!("wrapping at {} columns", renderer.options().cols);

    if cli.paths.is_empty() {
        process_stdin(cli, &renderer, stdin, out)?;
        return Ok(true);
    }

    let mut ok = true;
    for path in &cli.paths {
        let files = if path.is_dir() {
            match scan_markdown_files(path) {
                Ok(files) => files,
                Err(e) => {
                    writeln!(err, "error: {}: {e}", path.display())?;
                    ok = false;
                    continue;
                }
            }
        } else {
            vec![path.clone()]
        };

        for file in files {
            if let Err(e) = process_file(cli, &renderer, &file, out) {
                log::debug!("failed to format {}", file.display());
                writeln!(err, "error: {e:#}")?;
                ok = false;
            }
        }
    }

    Ok(ok)
}

fn process_stdin(
    cli: &Cli,
    renderer: &Renderer,
    stdin: &mut impl Read,
    out: &mut impl Write,
) -> Result<()> {
    let mut input = Vec::new();
    stdin
        .read_to_end(&mut input)
        .context("failed to read standard input")?;

    let output = renderer.render_bytes(&input)?;
    if cli.list {
        if output != input {
            writeln!(out, "{STDIN_NAME}")?;
        }
    } else {
        out.write_all(&output)?;
    }
    Ok(())
}

fn process_file(cli: &Cli, renderer: &Renderer, path: &Path, out: &mut impl Write) -> Result<()> {
    let formatted =
        format_file(path, renderer).with_context(|| format!("{}", path.display()))?;

    if formatted.changed() {
        if cli.list {
            writeln!(out, "{}", path.display())?;
        }
        if cli.write {
            write_file(path, &formatted.rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("rewrote {}", path.display());
        }
    }

    if !cli.write && !cli.list {
        out.write_all(formatted.rendered.as_bytes())?;
    }

    Ok(())
}
