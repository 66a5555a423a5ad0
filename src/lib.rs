//! Crystal structures as atoms plus a unit cell.
//!
//! The unit cell can be given either as edge lengths and interaxial angles or
//! as a 3x3 basis matrix (rows = lattice vectors a, b, c). Resolving the cell
//! derives the other representation and the inverse matrix, which together map
//! fractional coordinates to Cartesian ones and back.

pub mod config;
pub mod error;
pub mod model;
pub mod utils;

pub use config::{Config, Tolerances};
pub use error::{AtomsError, AtomsResult, CellResult, ConfigError, DomainError};
pub use model::{AngleUnit, AtomCollection, CellInput, CellState, CoordinateInput, Crystal, CrystalError, UnitCell};
