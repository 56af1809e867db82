use indicatif::ProgressBar;
use log::{error, info, warn};
use rayon::prelude::*;
use std::fs::{copy, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::DatasetPaths;
use crate::io::locate_sources;
use crate::types::{
    ClassLabel, EntryOutcome, NormalizedLabel, ProcessingStats, SourceLookup, SplitDirs, SplitKind,
    VocAnnotation,
};
use crate::utils::{create_progress_bar, read_voc_annotation};

/// Convert every manifest identifier of a split, in parallel on the given pool
pub fn process_split(
    split: SplitKind,
    manifest: &[String],
    paths: &DatasetPaths,
    split_dirs: &SplitDirs,
    pool: &rayon::ThreadPool,
) -> ProcessingStats {
    info!("Processing {} split ({} entries)...", split, manifest.len());
    let pb = create_progress_bar(manifest.len() as u64, split.label());

    let outcomes = process_entries_in_parallel(manifest, paths, split_dirs, pool, &pb);
    pb.finish_with_message(format!("{} processing complete", split.label()));

    ProcessingStats::from_outcomes(&outcomes)
}

/// Process a batch of identifiers in parallel; outcomes keep manifest order
fn process_entries_in_parallel(
    manifest: &[String],
    paths: &DatasetPaths,
    split_dirs: &SplitDirs,
    pool: &rayon::ThreadPool,
    pb: &ProgressBar,
) -> Vec<EntryOutcome> {
    pool.install(|| {
        manifest
            .par_iter()
            .map(|identifier| {
                let outcome = process_entry(
                    identifier,
                    &paths.image_dir,
                    &paths.annotation_dir,
                    split_dirs,
                );
                pb.inc(1);
                outcome
            })
            .collect()
    })
}

/// Process a single identifier: copy its image and write its YOLO label file.
///
/// Never fails; I/O and parse errors are logged and reported as
/// [`EntryOutcome::Failed`].
pub fn process_entry(
    identifier: &str,
    image_dir: &Path,
    annotation_dir: &Path,
    split_dirs: &SplitDirs,
) -> EntryOutcome {
    match try_process_entry(identifier, image_dir, annotation_dir, split_dirs) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Failed to process {}: {}", identifier, e);
            EntryOutcome::Failed(e.to_string())
        }
    }
}

fn try_process_entry(
    identifier: &str,
    image_dir: &Path,
    annotation_dir: &Path,
    split_dirs: &SplitDirs,
) -> std::io::Result<EntryOutcome> {
    // Output files are named after the raw identifier, so it must be a plain file name
    if !sanitize_filename::is_sanitized(identifier) {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{:?} is not a valid file name", identifier),
        ));
    }

    let (image_path, annotation_path) =
        match locate_sources(identifier, image_dir, annotation_dir) {
            SourceLookup::MissingImage { image } => {
                warn!("Image {} not found. Skipping.", image.display());
                return Ok(EntryOutcome::MissingImage);
            }
            SourceLookup::MissingAnnotation { image, annotation } => {
                // The image is still copied, leaving it without a label file
                copy_image(&image, &split_dirs.images_dir, identifier)?;
                warn!(
                    "No annotation found for {} ({} missing). Skipping label.",
                    image.display(),
                    annotation.display()
                );
                return Ok(EntryOutcome::MissingAnnotation);
            }
            SourceLookup::Found { image, annotation } => (image, annotation),
        };

    copy_image(&image_path, &split_dirs.images_dir, identifier)?;

    let annotation = read_voc_annotation(&annotation_path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("{}: {}", annotation_path.display(), e),
        )
    })?;
    let (labels, objects_dropped) = normalize_objects(&annotation, identifier);

    let label_output_path = split_dirs.labels_dir.join(format!("{}.txt", identifier));
    let mut writer = BufWriter::new(File::create(&label_output_path)?);
    writer.write_all(convert_to_yolo_format(&labels).as_bytes())?;
    writer.flush()?;

    Ok(EntryOutcome::Converted {
        objects_written: labels.len(),
        objects_dropped,
    })
}

fn copy_image(image_path: &Path, images_dir: &Path, identifier: &str) -> std::io::Result<()> {
    let image_output_path = images_dir.join(format!("{}.jpg", identifier));
    copy(image_path, &image_output_path)?;
    Ok(())
}

/// Map every object to a normalized label, dropping objects of unknown classes.
///
/// Returns the retained labels in document order and the number of dropped objects.
pub fn normalize_objects(
    annotation: &VocAnnotation,
    image_name: &str,
) -> (Vec<NormalizedLabel>, usize) {
    let mut labels = Vec::with_capacity(annotation.objects.len());
    let mut dropped = 0;

    for object in &annotation.objects {
        match ClassLabel::from_name(&object.name) {
            Some(class) => labels.push(NormalizedLabel::from_bbox(
                class,
                &object.bndbox,
                &annotation.size,
            )),
            None => {
                warn!(
                    "Unknown class {} in {}. Skipping object.",
                    object.name, image_name
                );
                dropped += 1;
            }
        }
    }

    (labels, dropped)
}

/// Render labels as YOLO bounding-box lines, each newline-terminated
pub fn convert_to_yolo_format(labels: &[NormalizedLabel]) -> String {
    let mut yolo_data = String::with_capacity(labels.len() * 48);
    for label in labels {
        yolo_data.push_str(&label.to_string());
        yolo_data.push('\n');
    }
    yolo_data
}
