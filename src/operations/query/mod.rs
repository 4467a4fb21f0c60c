mod bounding_box;
mod line_face_intersect;
mod volume;

pub use bounding_box::BoundingBox;
pub use line_face_intersect::{FaceLineHits, FaceOverlap, LineFaceIntersect};
pub use volume::Volume;
