use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// The closed set of classes in the BCCD dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassLabel {
    Wbc,
    Rbc,
    Platelets,
}

impl ClassLabel {
    /// All classes, ordered by their YOLO class id
    pub const ALL: [ClassLabel; 3] = [ClassLabel::Wbc, ClassLabel::Rbc, ClassLabel::Platelets];

    pub fn id(self) -> usize {
        match self {
            ClassLabel::Wbc => 0,
            ClassLabel::Rbc => 1,
            ClassLabel::Platelets => 2,
        }
    }

    /// The class name as it appears in the VOC `<name>` element
    pub fn name(self) -> &'static str {
        match self {
            ClassLabel::Wbc => "WBC",
            ClassLabel::Rbc => "RBC",
            ClassLabel::Platelets => "Platelets",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.name() == name)
    }

    pub fn from_id(id: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.id() == id)
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Pascal VOC annotation, restricted to the fields the converter reads
#[derive(Debug, Deserialize, Clone)]
pub struct VocAnnotation {
    pub size: VocSize,
    #[serde(rename = "object", default)]
    pub objects: Vec<VocObject>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct VocSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VocObject {
    pub name: String,
    pub bndbox: VocBndBox,
}

// Absolute pixel coordinates; xmin < xmax and ymin < ymax are not enforced
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct VocBndBox {
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

/// A bounding box in YOLO format: center and size as fractions of the image size.
///
/// Values are not clamped, so boxes reaching outside the image produce values
/// outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedLabel {
    pub class_id: usize,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedLabel {
    pub fn from_bbox(class: ClassLabel, bbox: &VocBndBox, size: &VocSize) -> Self {
        let image_width = size.width as f64;
        let image_height = size.height as f64;

        let (xmin, ymin) = (bbox.xmin as f64, bbox.ymin as f64);
        let (xmax, ymax) = (bbox.xmax as f64, bbox.ymax as f64);

        Self {
            class_id: class.id(),
            x_center: (xmin + xmax) / (2.0 * image_width),
            y_center: (ymin + ymax) / (2.0 * image_height),
            width: (xmax - xmin) / image_width,
            height: (ymax - ymin) / image_height,
        }
    }
}

impl fmt::Display for NormalizedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.x_center, self.y_center, self.width, self.height
        )
    }
}

/// The dataset splits produced by the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitKind {
    Train,
    Test,
    Val,
}

impl SplitKind {
    /// Directory name under the output root
    pub fn dir_name(self) -> &'static str {
        match self {
            SplitKind::Train => "train",
            SplitKind::Test => "test",
            SplitKind::Val => "val",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SplitKind::Train => "Train",
            SplitKind::Test => "Test",
            SplitKind::Val => "Val",
        }
    }
}

impl fmt::Display for SplitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

// Destination folders of a single split
#[derive(Debug, Clone)]
pub struct SplitDirs {
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
}

// Struct to hold the paths to the output directories for train/test/val splits
#[derive(Debug, Clone)]
pub struct OutputDirs {
    pub root: PathBuf,
    pub train: SplitDirs,
    pub test: SplitDirs,
    pub val: Option<SplitDirs>,
}

impl OutputDirs {
    pub fn split(&self, kind: SplitKind) -> Option<&SplitDirs> {
        match kind {
            SplitKind::Train => Some(&self.train),
            SplitKind::Test => Some(&self.test),
            SplitKind::Val => self.val.as_ref(),
        }
    }
}

/// Where the source files of a manifest identifier were found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLookup {
    Found { image: PathBuf, annotation: PathBuf },
    MissingImage { image: PathBuf },
    MissingAnnotation { image: PathBuf, annotation: PathBuf },
}

/// Result of processing one manifest identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Converted {
        objects_written: usize,
        objects_dropped: usize,
    },
    MissingImage,
    MissingAnnotation,
    Failed(String),
}

// Struct to hold processing statistics of one split
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub total_entries: usize,
    pub converted: usize,
    pub skipped_missing_image: usize,
    pub skipped_missing_annotation: usize,
    pub failed: usize,
    pub objects_written: usize,
    pub objects_dropped: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_outcomes(outcomes: &[EntryOutcome]) -> Self {
        let mut stats = Self::new();
        for outcome in outcomes {
            stats.record(outcome);
        }
        stats
    }

    pub fn record(&mut self, outcome: &EntryOutcome) {
        self.total_entries += 1;
        match outcome {
            EntryOutcome::Converted {
                objects_written,
                objects_dropped,
            } => {
                self.converted += 1;
                self.objects_written += objects_written;
                self.objects_dropped += objects_dropped;
            }
            EntryOutcome::MissingImage => self.skipped_missing_image += 1,
            EntryOutcome::MissingAnnotation => self.skipped_missing_annotation += 1,
            EntryOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn print_summary(&self, split: SplitKind) {
        log::info!("=== {} Summary ===", split.label());
        log::info!("Total entries: {}", self.total_entries);
        log::info!("Converted: {}", self.converted);
        log::info!("Skipped (missing image): {}", self.skipped_missing_image);
        log::info!(
            "Skipped (missing annotation): {}",
            self.skipped_missing_annotation
        );
        log::info!("Failed: {}", self.failed);
        log::info!(
            "Objects written: {} (dropped as unknown class: {})",
            self.objects_written,
            self.objects_dropped
        );

        let total_skipped = self.skipped_missing_image + self.skipped_missing_annotation;
        if total_skipped > 0 {
            log::warn!(
                "Total skipped entries in {}: {} (missing image: {}, missing annotation: {})",
                split,
                total_skipped,
                self.skipped_missing_image,
                self.skipped_missing_annotation
            );
        }
    }
}

/// Statistics of every split that was processed, in processing order
#[derive(Debug, Default, Clone)]
pub struct DatasetReport {
    pub splits: Vec<(SplitKind, ProcessingStats)>,
}

impl DatasetReport {
    pub fn stats(&self, kind: SplitKind) -> Option<&ProcessingStats> {
        self.splits
            .iter()
            .find(|(split, _)| *split == kind)
            .map(|(_, stats)| stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_map_is_total_and_invertible() {
        for class in ClassLabel::ALL {
            assert_eq!(ClassLabel::from_name(class.name()), Some(class));
            assert_eq!(ClassLabel::from_id(class.id()), Some(class));
        }
        assert_eq!(ClassLabel::from_name("WBC").map(ClassLabel::id), Some(0));
        assert_eq!(ClassLabel::from_name("RBC").map(ClassLabel::id), Some(1));
        assert_eq!(ClassLabel::from_name("Platelets").map(ClassLabel::id), Some(2));
        assert_eq!(ClassLabel::from_name("rbc"), None);
        assert_eq!(ClassLabel::from_id(3), None);
    }

    #[test]
    fn test_normalized_label_example() {
        let bbox = VocBndBox {
            xmin: 100,
            ymin: 100,
            xmax: 300,
            ymax: 300,
        };
        let size = VocSize {
            width: 1000,
            height: 1000,
        };

        let label = NormalizedLabel::from_bbox(ClassLabel::Rbc, &bbox, &size);

        assert_eq!(label.to_string(), "1 0.200000 0.200000 0.200000 0.200000");
    }

    #[test]
    fn test_normalized_label_is_not_clamped() {
        let bbox = VocBndBox {
            xmin: -20,
            ymin: 0,
            xmax: 120,
            ymax: 50,
        };
        let size = VocSize {
            width: 100,
            height: 100,
        };

        let label = NormalizedLabel::from_bbox(ClassLabel::Wbc, &bbox, &size);

        assert_eq!(label.to_string(), "0 0.500000 0.250000 1.400000 0.500000");
    }

    #[test]
    fn test_normalized_label_extreme_coordinates() {
        let bbox = VocBndBox {
            xmin: i64::MAX,
            ymin: i64::MIN,
            xmax: i64::MAX,
            ymax: i64::MAX,
        };
        let size = VocSize {
            width: 1,
            height: 1,
        };

        let label = NormalizedLabel::from_bbox(ClassLabel::Platelets, &bbox, &size);

        assert_eq!(label.x_center, i64::MAX as f64);
        assert_eq!(label.y_center, 0.0);
        assert_eq!(label.width, 0.0);
        assert_eq!(label.height, 2.0 * i64::MAX as f64);
    }

    #[test]
    fn test_stats_from_outcomes() {
        let outcomes = vec![
            EntryOutcome::Converted {
                objects_written: 3,
                objects_dropped: 1,
            },
            EntryOutcome::MissingImage,
            EntryOutcome::MissingAnnotation,
            EntryOutcome::Failed("bad xml".to_string()),
        ];

        let stats = ProcessingStats::from_outcomes(&outcomes);

        assert_eq!(stats.total_entries, 4);
        assert_eq!(stats.converted, 1);
        assert_eq!(stats.skipped_missing_image, 1);
        assert_eq!(stats.skipped_missing_annotation, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.objects_written, 3);
        assert_eq!(stats.objects_dropped, 1);
    }
}
