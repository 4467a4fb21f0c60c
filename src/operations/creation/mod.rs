mod make_box;
mod make_face;
mod make_polyhedron;

pub use make_box::MakeBox;
pub use make_face::MakeFace;
pub use make_polyhedron::MakePolyhedron;
