use log::{error, info};
use std::path::Path;

use crate::config::{ConvertOptions, DatasetPaths};
use crate::conversion::process_split;
use crate::io::{create_dataset_yaml, setup_output_directories};
use crate::types::{DatasetReport, OutputDirs, SplitKind};
use crate::utils::{create_io_thread_pool, read_manifest};

/// Set up the output tree and convert every split.
///
/// Only failing to create the output tree or the worker pool is an error;
/// problems with individual manifests, images or annotations are logged and
/// skipped.
pub fn prepare_dataset(
    paths: &DatasetPaths,
    options: &ConvertOptions,
) -> Result<DatasetReport, Box<dyn std::error::Error>> {
    let output_dirs = setup_output_directories(paths, options)
        .map_err(|e| format!("Failed to set up output directories: {}", e))?;
    process_dataset(&output_dirs, paths, options)
}

/// Main dataset processing pipeline: train and test always, val when a manifest was given
pub fn process_dataset(
    output_dirs: &OutputDirs,
    paths: &DatasetPaths,
    options: &ConvertOptions,
) -> Result<DatasetReport, Box<dyn std::error::Error>> {
    let pool = create_io_thread_pool(options.workers)?;
    let mut report = DatasetReport::default();

    let mut manifests = vec![
        (SplitKind::Train, paths.train_file.as_path()),
        (SplitKind::Test, paths.test_file.as_path()),
    ];
    if let Some(val_file) = &paths.val_file {
        manifests.push((SplitKind::Val, val_file.as_path()));
    }

    for (split, manifest_path) in manifests {
        let Some(split_dirs) = output_dirs.split(split) else {
            error!("No output directories for the {} split. Skipping.", split);
            continue;
        };
        let Some(manifest) = load_manifest(split, manifest_path) else {
            continue;
        };

        let stats = process_split(split, &manifest, paths, split_dirs, &pool);
        stats.print_summary(split);
        report.splits.push((split, stats));
    }

    if options.dataset_yaml {
        info!("Creating dataset.yaml file...");
        if let Err(e) = create_dataset_yaml(output_dirs) {
            error!("Failed to create dataset.yaml: {}", e);
        }
    }

    info!("Dataset preparation completed.");
    Ok(report)
}

fn load_manifest(split: SplitKind, path: &Path) -> Option<Vec<String>> {
    match read_manifest(path) {
        Ok(manifest) => {
            info!(
                "Read {} {} entries from {}",
                manifest.len(),
                split,
                path.display()
            );
            Some(manifest)
        }
        Err(e) => {
            error!(
                "Failed to read {} manifest {}: {}. Skipping split.",
                split,
                path.display(),
                e
            );
            None
        }
    }
}
