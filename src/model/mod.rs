//src/model/mod.rs
pub mod atoms;
pub mod cell;
pub mod structure;

// Re-exports for cleaner imports
pub use atoms::{AtomCollection, CoordinateInput};
pub use cell::{
    invert_cell_matrix, lengths_angles_from_matrix, matrix_from_lengths_angles, AngleUnit, CellInput, CellState,
    UnitCell,
};
pub use structure::{Crystal, CrystalError};
