pub mod aabb;
pub mod centerline;
pub mod surface;

pub use aabb::Aabb;
pub use centerline::Centerline;
pub use surface::Plane;
