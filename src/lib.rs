//! Pascal VOC to YOLO format converter
//!
//! This library converts an XML-annotated object-detection dataset (such as
//! BCCD) into YOLO bounding-box labels, split into train/test/val folders,
//! and defines the boundary to the blood-cell detector.

pub mod config;
pub mod conversion;
pub mod detection;
pub mod io;
pub mod types;
pub mod utils;
pub mod yolo_dataset;

// Re-export commonly used types and functions
pub use config::{Args, ConvertOptions, DatasetPaths};
pub use conversion::{convert_to_yolo_format, normalize_objects, process_entry, process_split};
pub use detection::{describe_detections, Detection, DetectionResult, Detector};
pub use io::{create_dataset_yaml, locate_sources, setup_output_directories};
pub use types::{
    ClassLabel, DatasetReport, EntryOutcome, NormalizedLabel, OutputDirs, ProcessingStats,
    SourceLookup, SplitDirs, SplitKind, VocAnnotation,
};
pub use yolo_dataset::{prepare_dataset, process_dataset};
