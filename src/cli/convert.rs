//! `pismo convert`: transliterate text, stdin or files.

use super::ConvertArgs;
use anyhow::{Context, Result, bail};
use pismo::pipeline::convert_markup_with;
use pismo::{Direction, Script, Transliterator, debug, log};
use rayon::prelude::*;
use std::borrow::Cow;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Extensions converted with the markup-aware converter.
const MARKUP_EXTENSIONS: [&str; 4] = ["html", "htm", "xml", "svg"];

pub fn run_convert(args: &ConvertArgs) -> Result<()> {
    if !args.files.is_empty() {
        return convert_files(&args.files, args.to, args.cut);
    }

    let text = match &args.text {
        Some(text) => text.clone(),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            input
        }
    };

    let converted = convert_text(&text, args.to, args.cut, false);
    let mut stdout = io::stdout().lock();
    stdout.write_all(converted.as_bytes())?;
    if args.text.is_some() {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

/// Convert `text` so it reads in `to`.
fn convert_text(text: &str, to: Script, cut: bool, markup: bool) -> Cow<'_, str> {
    let direction = Direction::between(to.other(), to);
    if markup {
        convert_markup_with(Transliterator::new(), direction, cut, text)
    } else {
        Transliterator::new().convert(text, direction, cut)
    }
}

/// `<stem>.<slug>.<ext>` next to `path`.
fn output_path(path: &Path, to: Script) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let name = match path.extension() {
        Some(ext) => format!("{stem}.{}.{}", to.slug(), ext.to_string_lossy()),
        None => format!("{stem}.{}", to.slug()),
    };
    path.with_file_name(name)
}

fn is_markup(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| MARKUP_EXTENSIONS.iter().any(|m| m.eq_ignore_ascii_case(ext)))
}

fn convert_file(path: &Path, to: Script, cut: bool) -> Result<PathBuf> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let converted = convert_text(&content, to, cut, is_markup(path));

    let output = output_path(path, to);
    fs::write(&output, converted.as_bytes())
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(output)
}

fn convert_files(files: &[PathBuf], to: Script, cut: bool) -> Result<()> {
    let results: Vec<Result<PathBuf>> = files
        .par_iter()
        .map(|path| convert_file(path, to, cut))
        .collect();

    let mut failed = 0usize;
    for result in results {
        match result {
            Ok(output) => debug!("convert"; "{}", output.display()),
            Err(e) => {
                log!("error"; "{:#}", e);
                failed += 1;
            }
        }
    }

    let written = files.len() - failed;
    log!("convert"; "wrote {} file{}", written, if written == 1 { "" } else { "s" });
    if failed > 0 {
        bail!("{} file(s) could not be converted", failed);
    }
    Ok(())
}
