//! Boundary to a pretrained blood-cell detector
//!
//! The model itself lives outside this crate. A [`Detector`] takes one image
//! and returns the annotated image together with the detections, whose class
//! ids use the same mapping as the dataset converter.

use crate::types::ClassLabel;

/// A single detection reported by the model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub class_id: usize,
    /// Confidence as a fraction in `[0, 1]`
    pub confidence: f32,
}

impl Detection {
    pub fn class_label(&self) -> Option<ClassLabel> {
        ClassLabel::from_id(self.class_id)
    }

    pub fn class_name(&self) -> &'static str {
        self.class_label().map_or("Unknown", ClassLabel::name)
    }

    pub fn confidence_percent(&self) -> f32 {
        self.confidence * 100.0
    }
}

#[derive(Debug, Clone)]
pub struct DetectionResult<I> {
    pub annotated_image: I,
    pub detections: Vec<Detection>,
}

pub trait Detector {
    type Image;
    type Error;

    fn detect(&self, image: &Self::Image) -> Result<DetectionResult<Self::Image>, Self::Error>;
}

/// Render detections one per line, e.g. `Class: RBC | Confidence: 91.50%`
pub fn describe_detections(detections: &[Detection]) -> String {
    detections
        .iter()
        .map(|detection| {
            format!(
                "Class: {} | Confidence: {:.2}%",
                detection.class_name(),
                detection.confidence_percent()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
