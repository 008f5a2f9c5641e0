mod bounds;
mod color;
mod label;
mod primitive;

pub use color::*;
pub use label::*;
pub use primitive::*;
