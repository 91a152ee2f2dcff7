/*!
 * File system operations for document input and output.
 *
 * Reading a source document and writing the translated result are the
 * pipeline's only I/O collaborators; the core is indifferent to the output
 * container format.
 */

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::debug;

use crate::translation::Document;

/// Read a text or Markdown document from disk.
///
/// The title is taken from the first Markdown H1 heading when present,
/// otherwise from the file stem.
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;

    let title = content
        .lines()
        .find_map(|line| line.strip_prefix("# ").map(|t| t.trim().to_string()))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_else(|| "Untitled Document".to_string())
        });

    debug!(
        "Read document '{}' ({} characters) from {}",
        title,
        content.chars().count(),
        path.display()
    );

    Ok(Document {
        title,
        author: None,
        content,
    })
}

/// Write the translated document body to disk with its title header.
pub fn write_document<P: AsRef<Path>>(path: P, document: &Document, body: &str) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut output = String::new();
    if !body.starts_with("# ") {
        output.push_str(&format!("# {}\n\n", document.title));
    }
    if let Some(author) = &document.author {
        output.push_str(&format!("_{}_\n\n", author));
    }
    output.push_str(body);
    output.push('\n');

    std::fs::write(path, output)
        .with_context(|| format!("Failed to write output file {}", path.display()))?;

    debug!("Wrote translated document to {}", path.display());
    Ok(())
}

/// Derive the default output path for a translated document.
///
/// `book.md` translated to `es` becomes `book.es.md` next to the input.
pub fn default_output_path(input: &Path, target_language: &str) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .ok_or_else(|| anyhow!("Input path has no file name: {}", input.display()))?
        .to_string_lossy();
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "md".to_string());

    Ok(input.with_file_name(format!("{}.{}.{}", stem, target_language, extension)))
}
