mod copy;
mod general;

pub use copy::CopySolid;
pub use general::GeneralTransform;
