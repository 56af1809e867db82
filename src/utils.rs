use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::types::VocAnnotation;

/// Read a split manifest: one image identifier per line, without extension.
///
/// Lines are trimmed and blank lines skipped. Repeated identifiers are kept
/// once, at their first position, so each identifier maps to distinct output
/// files.
pub fn read_manifest(path: &Path) -> io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let mut seen = HashSet::new();
    let mut identifiers = Vec::new();

    for line in content.lines() {
        let identifier = line.trim();
        if identifier.is_empty() {
            continue;
        }
        if seen.insert(identifier) {
            identifiers.push(identifier.to_string());
        } else {
            debug!(
                "Duplicate entry {} in {}, ignoring",
                identifier,
                path.display()
            );
        }
    }

    Ok(identifiers)
}

/// Read and parse a Pascal VOC XML annotation file
pub fn read_voc_annotation(path: &Path) -> io::Result<VocAnnotation> {
    let file = fs::File::open(path)?;
    // `object` elements may be interleaved with other children of the root
    let annotation: VocAnnotation = quick_xml::de::from_reader(io::BufReader::new(file))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

    if annotation.size.width == 0 || annotation.size.height == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "invalid image size {}x{}",
                annotation.size.width, annotation.size.height
            ),
        ));
    }

    Ok(annotation)
}

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
            label
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Build the thread pool used for per-identifier work; 0 lets rayon pick the size
pub fn create_io_thread_pool(workers: usize) -> io::Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(io::Error::other)
}

/// Delete the directory if present, then create it empty
pub fn create_output_directory(path: &Path) -> io::Result<PathBuf> {
    if path.exists() {
        log::warn!(
            "Directory {:?} already exists. Deleting and recreating it.",
            path
        );
        fs::remove_dir_all(path).and_then(|_| fs::create_dir_all(path))?;
    } else {
        fs::create_dir_all(path)?;
    }
    Ok(path.to_path_buf())
}

/// Create the directory and its parents, keeping any existing content
pub fn ensure_output_directory(path: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(path)?;
    Ok(path.to_path_buf())
}
