//! Molecular structure built from a typed `atom_site` category
//!
//! A [`Structure`] is an immutable, flat list of atoms (here called
//! elements, one per rendered unit) with their chemical element, position
//! and chain. Representations share it through `Arc` and compare
//! structures by pointer identity.

use ahash::AHashMap;
use lin_alg::f32::Vec3;
use molstar_io::cif::{TypedCategory, TypedFrame};
use molstar_io::column::{Column, FloatColumn, IntColumn, StrColumn};

use crate::element::Element;
use crate::error::{MolError, MolResult};

/// One atom record used to assemble a structure
#[derive(Debug, Clone, PartialEq)]
pub struct AtomSite {
    pub name: String,
    pub element: Element,
    pub position: Vec3,
    pub chain_id: String,
}

impl AtomSite {
    pub fn new(name: impl Into<String>, element: Element, position: Vec3, chain_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            element,
            position,
            chain_id: chain_id.into(),
        }
    }
}

/// Immutable molecular structure
#[derive(Debug, Clone)]
pub struct Structure {
    label: String,
    names: Vec<String>,
    elements: Vec<Element>,
    positions: Vec<Vec3>,
    chain_indices: Vec<u32>,
    chain_ids: Vec<String>,
}

impl Structure {
    /// Assemble a structure from atom records
    ///
    /// Chains are numbered in order of first appearance.
    pub fn from_atoms(label: impl Into<String>, atoms: impl IntoIterator<Item = AtomSite>) -> Self {
        let mut structure = Structure {
            label: label.into(),
            names: Vec::new(),
            elements: Vec::new(),
            positions: Vec::new(),
            chain_indices: Vec::new(),
            chain_ids: Vec::new(),
        };
        let mut chain_lookup: AHashMap<String, u32> = AHashMap::new();

        for atom in atoms {
            let chain_index = match chain_lookup.get(&atom.chain_id) {
                Some(&index) => index,
                None => {
                    let index = structure.chain_ids.len() as u32;
                    chain_lookup.insert(atom.chain_id.clone(), index);
                    structure.chain_ids.push(atom.chain_id);
                    index
                }
            };
            structure.names.push(atom.name);
            structure.elements.push(atom.element);
            structure.positions.push(atom.position);
            structure.chain_indices.push(chain_index);
        }

        structure
    }

    /// Build a structure from the `atom_site` category of a typed frame
    pub fn from_frame(frame: &TypedFrame) -> MolResult<Self> {
        let mut structure = Self::from_atom_site(frame.category("atom_site")?)?;
        if !frame.header().is_empty() {
            structure.label = frame.header().to_string();
        }
        Ok(structure)
    }

    /// Build a structure from a typed `atom_site` category
    ///
    /// Requires `Cartn_x/y/z`. The element comes from `type_symbol`, else
    /// from `label_atom_id`; the chain from `label_asym_id`, else
    /// `auth_asym_id`. Only rows of the first model are used when
    /// `pdbx_PDB_model_num` is present. Keys the schema does not declare
    /// are treated as absent.
    pub fn from_atom_site(atom_site: &TypedCategory) -> MolResult<Self> {
        let x = coordinate(atom_site, "Cartn_x")?;
        let y = coordinate(atom_site, "Cartn_y")?;
        let z = coordinate(atom_site, "Cartn_z")?;

        let names = optional_str(atom_site, "label_atom_id")?;
        let symbols = optional_str(atom_site, "type_symbol")?;
        let chains = match optional_str(atom_site, "label_asym_id")? {
            Some(column) => Some(column),
            None => optional_str(atom_site, "auth_asym_id")?,
        };
        let models = optional_int(atom_site, "pdbx_PDB_model_num")?;

        let row_count = atom_site.row_count();
        let first_model = models.filter(|_| row_count > 0).map(|m| m.value(0));

        let atoms = (0..row_count)
            .filter(|&row| match (models, first_model) {
                (Some(m), Some(first)) => m.value(row) == first,
                _ => true,
            })
            .map(|row| {
                let name = names.map(|c| c.value(row).into_owned()).unwrap_or_default();
                let element = match symbols {
                    Some(c) if c.is_present(row) => Element::from_symbol(&c.value(row)),
                    _ => Element::from_atom_name(&name),
                };
                let position = Vec3::new(x.value(row) as f32, y.value(row) as f32, z.value(row) as f32);
                let chain_id = chains.map(|c| c.value(row).into_owned()).unwrap_or_default();
                AtomSite {
                    name,
                    element,
                    position,
                    chain_id,
                }
            });

        let structure = Self::from_atoms(atom_site.category().name(), atoms);
        log::debug!(
            "Built structure '{}' with {} elements in {} chains",
            structure.label,
            structure.element_count(),
            structure.chain_count()
        );
        Ok(structure)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Chemical element of element `index`
    pub fn element(&self, index: usize) -> Option<Element> {
        self.elements.get(index).copied()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn atom_name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).copied()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Chain index of element `index`
    pub fn chain_index(&self, index: usize) -> Option<u32> {
        self.chain_indices.get(index).copied()
    }

    pub fn chain_count(&self) -> usize {
        self.chain_ids.len()
    }

    pub fn chain_id(&self, chain_index: u32) -> Option<&str> {
        self.chain_ids.get(chain_index as usize).map(String::as_str)
    }

    /// Position of element `index`, or an error if out of range
    pub fn checked_position(&self, index: usize) -> MolResult<Vec3> {
        self.position(index).ok_or(MolError::ElementOutOfBounds {
            index,
            count: self.element_count(),
        })
    }

    /// Geometric center and radius of the smallest sphere around it that holds every position
    pub fn boundary(&self) -> (Vec3, f32) {
        if self.positions.is_empty() {
            return (Vec3::new(0.0, 0.0, 0.0), 0.0);
        }
        let mut sum = Vec3::new(0.0, 0.0, 0.0);
        for &p in &self.positions {
            sum = sum + p;
        }
        let center = sum * (1.0 / self.positions.len() as f32);
        let radius = self
            .positions
            .iter()
            .map(|&p| (p - center).magnitude())
            .fold(0.0_f32, f32::max);
        (center, radius)
    }
}

fn declares(atom_site: &TypedCategory, key: &str) -> bool {
    atom_site.schema().get(key).is_some()
}

fn coordinate<'a>(atom_site: &'a TypedCategory, key: &str) -> MolResult<&'a FloatColumn> {
    if !declares(atom_site, key) {
        return Err(MolError::MissingCoordinates(key.to_string()));
    }
    let column = atom_site.float(key)?;
    if !column.is_defined() && atom_site.row_count() > 0 {
        return Err(MolError::MissingCoordinates(key.to_string()));
    }
    Ok(column)
}

fn optional_str<'a>(atom_site: &'a TypedCategory, key: &str) -> MolResult<Option<&'a StrColumn>> {
    if !declares(atom_site, key) {
        return Ok(None);
    }
    let column = atom_site.str(key)?;
    Ok(column.is_defined().then_some(column))
}

fn optional_int<'a>(atom_site: &'a TypedCategory, key: &str) -> MolResult<Option<&'a IntColumn>> {
    if !declares(atom_site, key) {
        return Ok(None);
    }
    let column = atom_site.int(key)?;
    Ok(column.is_defined().then_some(column))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water_dimer() -> Structure {
        Structure::from_atoms(
            "water",
            vec![
                AtomSite::new("O", Element::OXYGEN, Vec3::new(0.0, 0.0, 0.0), "A"),
                AtomSite::new("H1", Element::HYDROGEN, Vec3::new(1.0, 0.0, 0.0), "A"),
                AtomSite::new("O", Element::OXYGEN, Vec3::new(4.0, 0.0, 0.0), "B"),
                AtomSite::new("H1", Element::HYDROGEN, Vec3::new(5.0, 0.0, 0.0), "A"),
            ],
        )
    }

    #[test]
    fn test_chain_indices_follow_first_appearance() {
        let structure = water_dimer();
        assert_eq!(structure.chain_count(), 2);
        assert_eq!(structure.chain_index(0), Some(0));
        assert_eq!(structure.chain_index(2), Some(1));
        assert_eq!(structure.chain_index(3), Some(0));
        assert_eq!(structure.chain_id(1), Some("B"));
    }

    #[test]
    fn test_boundary() {
        let (center, radius) = water_dimer().boundary();
        assert!((center.x - 2.5).abs() < 1e-6);
        assert!((radius - 2.5).abs() < 1e-6);
        assert_eq!(Structure::from_atoms("empty", Vec::new()).boundary().1, 0.0);
    }

    #[test]
    fn test_checked_position() {
        let structure = water_dimer();
        assert!(structure.checked_position(3).is_ok());
        assert!(matches!(
            structure.checked_position(4),
            Err(MolError::ElementOutOfBounds { index: 4, count: 4 })
        ));
    }
}
