use log::warn;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::{ConvertOptions, DatasetPaths};
use crate::types::{ClassLabel, OutputDirs, SourceLookup, SplitDirs, SplitKind};
use crate::utils::{create_output_directory, ensure_output_directory};

/// Set up the directory structure for YOLO dataset output.
///
/// `val/` is only created when a validation manifest was supplied.
pub fn setup_output_directories(
    paths: &DatasetPaths,
    options: &ConvertOptions,
) -> std::io::Result<OutputDirs> {
    let root = ensure_output_directory(&paths.output_dir)?;

    let train = setup_split_directories(&root, SplitKind::Train, options.clean)?;
    let test = setup_split_directories(&root, SplitKind::Test, options.clean)?;
    let val = if paths.val_file.is_some() {
        Some(setup_split_directories(&root, SplitKind::Val, options.clean)?)
    } else {
        None
    };

    Ok(OutputDirs {
        root,
        train,
        test,
        val,
    })
}

fn setup_split_directories(root: &Path, split: SplitKind, clean: bool) -> std::io::Result<SplitDirs> {
    let split_dir = root.join(split.dir_name());
    if clean {
        create_output_directory(&split_dir)?;
    }

    Ok(SplitDirs {
        images_dir: ensure_output_directory(&split_dir.join("images"))?,
        labels_dir: ensure_output_directory(&split_dir.join("labels"))?,
    })
}

/// Resolve `<id>.jpg` and `<id>.xml` in the source directories
pub fn locate_sources(identifier: &str, image_dir: &Path, annotation_dir: &Path) -> SourceLookup {
    let image = image_dir.join(format!("{}.jpg", identifier));
    if !image.is_file() {
        return SourceLookup::MissingImage { image };
    }

    let annotation = annotation_dir.join(format!("{}.xml", identifier));
    if !annotation.is_file() {
        return SourceLookup::MissingAnnotation { image, annotation };
    }

    SourceLookup::Found { image, annotation }
}

/// Create the dataset.yaml file for YOLO training
pub fn create_dataset_yaml(output_dirs: &OutputDirs) -> std::io::Result<()> {
    let dataset_yaml_path = output_dirs.root.join("dataset.yaml");
    let mut dataset_yaml = BufWriter::new(File::create(&dataset_yaml_path)?);
    let absolute_path = fs::canonicalize(&output_dirs.root)?;

    let mut yaml_content = format!(
        "path: {}\ntrain: {}/images\n",
        absolute_path.to_string_lossy(),
        SplitKind::Train.dir_name()
    );
    if output_dirs.val.is_some() {
        yaml_content.push_str(&format!("val: {}/images\n", SplitKind::Val.dir_name()));
    } else {
        warn!("No validation split; dataset.yaml leaves `val` empty.");
        yaml_content.push_str("val:\n");
    }
    yaml_content.push_str(&format!("test: {}/images\n", SplitKind::Test.dir_name()));
    yaml_content.push_str("\nnames:\n");

    for class in ClassLabel::ALL {
        yaml_content.push_str(&format!("    {}: {}\n", class.id(), class.name()));
    }
    dataset_yaml.write_all(yaml_content.as_bytes())?;
    dataset_yaml.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn paths_in(root: &Path, val_file: Option<PathBuf>) -> DatasetPaths {
        DatasetPaths {
            image_dir: root.join("JPEGImages"),
            annotation_dir: root.join("Annotations"),
            output_dir: root.join("dataset"),
            train_file: root.join("train.txt"),
            test_file: root.join("test.txt"),
            val_file,
        }
    }

    #[test]
    fn test_setup_without_val() {
        let temp_dir = tempfile::tempdir().unwrap();
        let paths = paths_in(temp_dir.path(), None);

        let output_dirs = setup_output_directories(&paths, &ConvertOptions::default()).unwrap();

        assert!(output_dirs.train.images_dir.is_dir());
        assert!(output_dirs.train.labels_dir.is_dir());
        assert!(output_dirs.test.images_dir.is_dir());
        assert!(output_dirs.test.labels_dir.is_dir());
        assert!(output_dirs.val.is_none());
        assert!(!paths.output_dir.join("val").exists());
    }

    #[test]
    fn test_setup_keeps_existing_files_unless_clean() {
        let temp_dir = tempfile::tempdir().unwrap();
        let paths = paths_in(temp_dir.path(), Some(temp_dir.path().join("val.txt")));
        let stale = paths.output_dir.join("val/labels/stale.txt");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "0 0.5 0.5 0.1 0.1\n").unwrap();

        let output_dirs = setup_output_directories(&paths, &ConvertOptions::default()).unwrap();
        assert!(output_dirs.val.is_some());
        assert!(stale.exists());

        let options = ConvertOptions {
            clean: true,
            ..ConvertOptions::default()
        };
        let output_dirs = setup_output_directories(&paths, &options).unwrap();
        assert!(output_dirs.val.unwrap().labels_dir.is_dir());
        assert!(!stale.exists());
    }

    #[test]
    fn test_locate_sources() {
        let temp_dir = tempfile::tempdir().unwrap();
        let image_dir = temp_dir.path().join("JPEGImages");
        let annotation_dir = temp_dir.path().join("Annotations");
        fs::create_dir_all(&image_dir).unwrap();
        fs::create_dir_all(&annotation_dir).unwrap();
        fs::write(image_dir.join("a.jpg"), b"jpg").unwrap();
        fs::write(image_dir.join("b.jpg"), b"jpg").unwrap();
        fs::write(annotation_dir.join("a.xml"), b"<annotation/>").unwrap();
        fs::write(annotation_dir.join("c.xml"), b"<annotation/>").unwrap();

        assert_eq!(
            locate_sources("a", &image_dir, &annotation_dir),
            SourceLookup::Found {
                image: image_dir.join("a.jpg"),
                annotation: annotation_dir.join("a.xml"),
            }
        );
        assert_eq!(
            locate_sources("b", &image_dir, &annotation_dir),
            SourceLookup::MissingAnnotation {
                image: image_dir.join("b.jpg"),
                annotation: annotation_dir.join("b.xml"),
            }
        );
        assert_eq!(
            locate_sources("c", &image_dir, &annotation_dir),
            SourceLookup::MissingImage {
                image: image_dir.join("c.jpg"),
            }
        );
    }

    #[test]
    fn test_create_dataset_yaml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let paths = paths_in(temp_dir.path(), None);
        let output_dirs = setup_output_directories(&paths, &ConvertOptions::default()).unwrap();

        create_dataset_yaml(&output_dirs).unwrap();

        let yaml_content = fs::read_to_string(paths.output_dir.join("dataset.yaml")).unwrap();
        assert!(yaml_content.contains("path:"));
        assert!(yaml_content.contains("train: train/images"));
        assert!(yaml_content.contains("val:\n"));
        assert!(yaml_content.contains("test: test/images"));
        assert!(yaml_content.contains("names:"));
        assert!(yaml_content.contains("0: WBC"));
        assert!(yaml_content.contains("1: RBC"));
        assert!(yaml_content.contains("2: Platelets"));
    }
}
