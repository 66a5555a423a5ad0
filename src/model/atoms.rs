// src/model/atoms.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AtomsError, AtomsResult};
use crate::utils::geometry::Vec3;

/// Which coordinate array is authoritative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateInput {
    #[default]
    Unset,
    Cartesian,
    Fractional,
}

/// Per-atom labels and coordinates, stored as parallel arrays.
///
/// All per-atom arrays must have `atom_count` entries. Only the coordinate
/// array selected by `coordinate_input` is checked; the other one may be
/// stale or empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AtomCollection {
    pub atom_count: usize,
    /// Site labels, e.g. "Cu1"
    pub atom_type: Vec<String>,
    /// Element symbols, e.g. "Cu"
    pub atom_element: Vec<String>,
    pub coordinate_input: CoordinateInput,
    /// Å
    pub atom_cartesian: Vec<Vec3>,
    /// Multiples of the lattice vectors
    pub atom_fractional: Vec<Vec3>,
}

impl AtomCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cartesian(
        atom_type: Vec<String>,
        atom_element: Vec<String>,
        coords: Vec<Vec3>,
    ) -> AtomsResult<Self> {
        let atoms = Self {
            atom_count: coords.len(),
            atom_type,
            atom_element,
            coordinate_input: CoordinateInput::Cartesian,
            atom_cartesian: coords,
            atom_fractional: Vec::new(),
        };
        atoms.validate()?;
        Ok(atoms)
    }

    pub fn with_fractional(
        atom_type: Vec<String>,
        atom_element: Vec<String>,
        coords: Vec<Vec3>,
    ) -> AtomsResult<Self> {
        let atoms = Self {
            atom_count: coords.len(),
            atom_type,
            atom_element,
            coordinate_input: CoordinateInput::Fractional,
            atom_cartesian: Vec::new(),
            atom_fractional: coords,
        };
        atoms.validate()?;
        Ok(atoms)
    }

    pub fn has_cartesian_input(&self) -> bool {
        self.coordinate_input == CoordinateInput::Cartesian
    }

    pub fn has_fractional_input(&self) -> bool {
        self.coordinate_input == CoordinateInput::Fractional
    }

    pub fn is_empty(&self) -> bool {
        self.atom_count == 0
    }

    /// The authoritative coordinate array, if one was selected
    pub fn coordinates(&self) -> Option<&[Vec3]> {
        match self.coordinate_input {
            CoordinateInput::Cartesian => Some(self.atom_cartesian.as_slice()),
            CoordinateInput::Fractional => Some(self.atom_fractional.as_slice()),
            CoordinateInput::Unset => None,
        }
    }

    fn coordinates_mut(&mut self) -> Option<&mut Vec<Vec3>> {
        match self.coordinate_input {
            CoordinateInput::Cartesian => Some(&mut self.atom_cartesian),
            CoordinateInput::Fractional => Some(&mut self.atom_fractional),
            CoordinateInput::Unset => None,
        }
    }

    /// Appends one atom to every per-atom array.
    ///
    /// The coordinate goes to the authoritative array, so a representation
    /// must have been chosen first.
    pub fn push_atom(&mut self, label: &str, element: &str, coord: Vec3) -> AtomsResult<()> {
        self.coordinates_mut()
            .ok_or(AtomsError::NoCoordinates)?
            .push(coord);
        self.atom_type.push(label.to_string());
        self.atom_element.push(element.to_string());
        self.atom_count += 1;
        Ok(())
    }

    /// Grows or shrinks all per-atom arrays together.
    /// New entries get empty labels and zero coordinates.
    pub fn resize(&mut self, n: usize) {
        self.atom_type.resize(n, String::new());
        self.atom_element.resize(n, String::new());
        if let Some(coords) = self.coordinates_mut() {
            coords.resize(n, [0.0; 3]);
        }
        self.atom_count = n;
    }

    /// Replaces the Cartesian coordinates and makes them authoritative
    pub fn set_cartesian(&mut self, coords: Vec<Vec3>) -> AtomsResult<()> {
        check_len("atom_cartesian", self.atom_count, coords.len())?;
        self.atom_cartesian = coords;
        self.coordinate_input = CoordinateInput::Cartesian;
        Ok(())
    }

    /// Replaces the fractional coordinates and makes them authoritative
    pub fn set_fractional(&mut self, coords: Vec<Vec3>) -> AtomsResult<()> {
        check_len("atom_fractional", self.atom_count, coords.len())?;
        self.atom_fractional = coords;
        self.coordinate_input = CoordinateInput::Fractional;
        Ok(())
    }

    /// Checks that every per-atom array has `atom_count` entries.
    pub fn validate(&self) -> AtomsResult<()> {
        check_len("atom_type", self.atom_count, self.atom_type.len())?;
        check_len("atom_element", self.atom_count, self.atom_element.len())?;
        match self.coordinate_input {
            CoordinateInput::Cartesian => {
                check_len("atom_cartesian", self.atom_count, self.atom_cartesian.len())
            }
            CoordinateInput::Fractional => {
                check_len("atom_fractional", self.atom_count, self.atom_fractional.len())
            }
            CoordinateInput::Unset => Ok(()),
        }
    }

    /// Composition string with elements in alphabetical order, e.g. "Cu2O"
    pub fn formula(&self) -> String {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for el in &self.atom_element {
            *counts.entry(el.as_str()).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .map(|(el, count)| {
                if count > 1 {
                    format!("{}{}", el, count)
                } else {
                    el.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> AtomsResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(AtomsError::LengthMismatch {
            field,
            expected,
            actual,
        })
    }
}
