//! Reading documents in a declared encoding and writing repaired copies.

use crate::error::{LintError, Result};
use encoding_rs::Encoding;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves a WHATWG encoding label such as `utf-8` or `latin1`.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| LintError::UnknownEncoding(label.to_string()))
}

/// Loads a whole document into memory. A byte order mark takes precedence
/// over the declared encoding; malformed input is an error, never replaced.
pub fn read_document(path: &Path, encoding_label: &str) -> Result<String> {
    let encoding = resolve_encoding(encoding_label)?;
    let bytes = fs::read(path).map_err(|e| LintError::io(path, e))?;

    let (text, used, had_errors) = encoding.decode(&bytes);
    if had_errors {
        return Err(LintError::Decode {
            path: path.to_path_buf(),
            encoding: used.name().to_string(),
        });
    }
    if used != encoding {
        log::warn!(
            "{}: byte order mark selects {} over declared {}",
            path.display(),
            used.name(),
            encoding.name()
        );
    }
    log::info!("Read {} ({} bytes, {})", path.display(), bytes.len(), used.name());
    Ok(text.into_owned())
}

/// `chapter.tex` with suffix `-fixed` becomes `chapter-fixed.tex`; a name
/// without extension gets the suffix appended.
pub fn fixed_output_path(input: &Path, suffix: &str) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(OsString::new);
    name.push(suffix);
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    input.with_file_name(name)
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Writes `text` to `output` in the declared encoding. Never writes over
/// `input`.
pub fn write_document(input: &Path, output: &Path, text: &str, encoding_label: &str) -> Result<()> {
    if same_file(input, output) {
        return Err(LintError::WouldOverwrite(input.to_path_buf()));
    }
    let encoding = resolve_encoding(encoding_label)?;
    let (bytes, used, unmappable) = encoding.encode(text);
    if unmappable {
        return Err(LintError::Encode {
            path: output.to_path_buf(),
            encoding: encoding.name().to_string(),
        });
    }
    if used != encoding {
        log::warn!("{} cannot be written; using {}", encoding.name(), used.name());
    }
    fs::write(output, &bytes).map_err(|e| LintError::io(output, e))?;
    log::info!("Wrote {} ({} bytes)", output.display(), bytes.len());
    Ok(())
}
