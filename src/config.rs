use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments parser for converting a Pascal VOC dataset to YOLO format.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Directory containing the source JPEG images
    #[arg(long = "image_dir", default_value = "./BCCD_Dataset/BCCD/JPEGImages")]
    pub image_dir: String,

    /// Directory containing the Pascal VOC XML annotations
    #[arg(long = "annotation_dir", default_value = "./BCCD_Dataset/BCCD/Annotations")]
    pub annotation_dir: String,

    /// Root directory of the generated YOLO dataset
    #[arg(short = 'o', long = "output_dir", default_value = "./dataset")]
    pub output_dir: String,

    /// File listing the training image names, one per line, without extension
    #[arg(
        long = "train_file",
        default_value = "./BCCD_Dataset/BCCD/ImageSets/Main/train.txt"
    )]
    pub train_file: String,

    /// File listing the test image names, one per line, without extension
    #[arg(
        long = "test_file",
        default_value = "./BCCD_Dataset/BCCD/ImageSets/Main/test.txt"
    )]
    pub test_file: String,

    /// File listing the validation image names; the val split is skipped when omitted
    #[arg(long = "val_file")]
    pub val_file: Option<String>,

    /// Number of worker threads used per split (0 uses all available cores)
    #[arg(long = "workers", default_value_t = 0)]
    pub workers: usize,

    /// Delete and recreate the split directories before converting
    #[arg(long = "clean")]
    pub clean: bool,

    /// Also write a dataset.yaml describing the splits and class names
    #[arg(long = "dataset_yaml")]
    pub dataset_yaml: bool,
}

/// Input and output locations of a conversion run, resolved once at startup
#[derive(Debug, Clone)]
pub struct DatasetPaths {
    pub image_dir: PathBuf,
    pub annotation_dir: PathBuf,
    pub output_dir: PathBuf,
    pub train_file: PathBuf,
    pub test_file: PathBuf,
    pub val_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub workers: usize,
    pub clean: bool,
    pub dataset_yaml: bool,
}

impl Args {
    pub fn dataset_paths(&self) -> DatasetPaths {
        DatasetPaths {
            image_dir: PathBuf::from(&self.image_dir),
            annotation_dir: PathBuf::from(&self.annotation_dir),
            output_dir: PathBuf::from(&self.output_dir),
            train_file: PathBuf::from(&self.train_file),
            test_file: PathBuf::from(&self.test_file),
            // An empty value behaves like an omitted one
            val_file: self
                .val_file
                .as_deref()
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            workers: self.workers,
            clean: self.clean,
            dataset_yaml: self.dataset_yaml,
        }
    }
}
