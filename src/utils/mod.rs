//src/utils/mod.rs
pub mod geometry;
pub mod linalg;
pub mod logger;

pub use geometry::Vec3;
pub use linalg::Mat3;
