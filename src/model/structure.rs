// src/model/structure.rs

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::atoms::AtomCollection;
use super::cell::UnitCell;
use crate::config::Tolerances;
use crate::error::{AtomsError, DomainError};

/// Either half of a crystal failed to resolve
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CrystalError {
    #[error(transparent)]
    Atoms(#[from] AtomsError),

    #[error(transparent)]
    Cell(#[from] DomainError),
}

/// Atoms plus the unit cell their fractional coordinates refer to
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Crystal {
    pub atoms: AtomCollection,
    pub cell: UnitCell,
}

impl Crystal {
    pub fn new(atoms: AtomCollection, cell: UnitCell) -> Self {
        Self { atoms, cell }
    }

    /// Validates the atom arrays, then derives the cell's missing representation
    /// and inverse matrix. Meant to run once after loading.
    pub fn resolve(&mut self) -> Result<(), CrystalError> {
        self.resolve_with(&Tolerances::default())
    }

    pub fn resolve_with(&mut self, tol: &Tolerances) -> Result<(), CrystalError> {
        self.atoms.validate()?;
        self.cell.compute_all_info_with(tol)?;
        log::debug!(
            "Crystal {} resolved: {} atoms, volume {:?}",
            self.atoms.formula(),
            self.atoms.atom_count,
            self.cell.volume()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_checks_atoms_before_cell() {
        let mut atoms = AtomCollection::with_fractional(vec!["Cu1".into()], vec!["Cu".into()], vec![[0.0; 3]]).unwrap();
        atoms.atom_count = 2;
        let mut crystal = Crystal::new(atoms, UnitCell::new());

        assert!(matches!(
            crystal.resolve(),
            Err(CrystalError::Atoms(AtomsError::LengthMismatch { .. }))
        ));
    }

    #[test]
    fn test_resolve_reports_cell_error() {
        let mut crystal = Crystal::new(
            AtomCollection::new(),
            UnitCell::from_lengths_angles_deg([1.0; 3], [90.0, 90.0, 0.0]),
        );
        assert_eq!(
            crystal.resolve(),
            Err(CrystalError::Cell(DomainError::DegenerateGamma))
        );
    }

    #[test]
    fn test_resolve_fcc_copper() {
        let mut crystal = Crystal::new(
            AtomCollection::with_fractional(
                vec!["Cu1".into(), "Cu2".into(), "Cu3".into(), "Cu4".into()],
                vec!["Cu".into(); 4],
                vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.0], [0.5, 0.0, 0.5], [0.0, 0.5, 0.5]],
            )
            .unwrap(),
            UnitCell::from_lengths_angles_deg([3.615; 3], [90.0; 3]),
        );

        crystal.resolve().unwrap();
        assert!(crystal.cell.is_resolved());
        assert_eq!(crystal.atoms.formula(), "Cu4");
        assert!((crystal.cell.volume().unwrap() - 3.615f64.powi(3)).abs() < 1e-9);
    }
}
