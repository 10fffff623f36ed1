mod cube;
mod plane;

pub use cube::{cube, cube_data, wire_cube, wire_cube_data};
pub use plane::{plane, plane_data};
