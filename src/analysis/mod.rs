pub mod segmentation;
pub mod stats;
pub mod thresholds;
