//! Loci: descriptions of structure subsets
//!
//! A locus names what a pick or highlight refers to. Element loci store
//! their members as a bitset over the structure's elements, the same way
//! atom selections are stored.

use std::sync::Arc;

use bitvec::prelude::*;

use crate::structure::Structure;

/// A set of elements of one structure
#[derive(Debug, Clone)]
pub struct ElementLoci {
    structure: Arc<Structure>,
    elements: BitVec<u64, Lsb0>,
}

impl ElementLoci {
    /// Locus over the given element indices; out-of-range indices are ignored
    pub fn new(structure: Arc<Structure>, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut elements = bitvec![u64, Lsb0; 0; structure.element_count()];
        for index in indices {
            if let Some(mut bit) = elements.get_mut(index) {
                *bit = true;
            }
        }
        Self {
            structure,
            elements,
        }
    }

    /// Locus holding a single element
    pub fn single(structure: Arc<Structure>, index: usize) -> Self {
        Self::new(structure, std::iter::once(index))
    }

    /// Locus holding every element of `structure`
    pub fn all(structure: Arc<Structure>) -> Self {
        let elements = bitvec![u64, Lsb0; 1; structure.element_count()];
        Self {
            structure,
            elements,
        }
    }

    pub fn structure(&self) -> &Arc<Structure> {
        &self.structure
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.elements.get(index).map(|b| *b).unwrap_or(false)
    }

    /// Number of elements in the locus
    pub fn count(&self) -> usize {
        self.elements.count_ones()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.not_any()
    }

    /// Member element indices in ascending order
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.elements.iter_ones()
    }

    /// Union with another locus over the same structure
    pub fn union(&self, other: &ElementLoci) -> Option<ElementLoci> {
        if !Arc::ptr_eq(&self.structure, &other.structure) {
            return None;
        }
        let mut elements = self.elements.clone();
        for index in other.elements.iter_ones() {
            elements.set(index, true);
        }
        Some(Self {
            structure: Arc::clone(&self.structure),
            elements,
        })
    }
}

impl PartialEq for ElementLoci {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.structure, &other.structure) && self.elements == other.elements
    }
}

/// What a pick, highlight or selection refers to
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Loci {
    /// Nothing
    #[default]
    Empty,
    /// Everything the receiver shows
    Every,
    /// Elements of one structure
    Elements(ElementLoci),
}

impl Loci {
    pub fn is_empty(&self) -> bool {
        match self {
            Loci::Empty => true,
            Loci::Every => false,
            Loci::Elements(loci) => loci.is_empty(),
        }
    }

    pub fn as_elements(&self) -> Option<&ElementLoci> {
        match self {
            Loci::Elements(loci) => Some(loci),
            _ => None,
        }
    }
}

impl From<ElementLoci> for Loci {
    fn from(loci: ElementLoci) -> Self {
        Loci::Elements(loci)
    }
}
