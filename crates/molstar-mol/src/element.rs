//! Chemical elements
//!
//! Elements are identified by atomic number. The data table covers the
//! first five periods, which is everything macromolecular files carry in
//! practice; other symbols map to [`Element::UNKNOWN`].

use ahash::AHashMap;
use std::fmt;
use std::sync::OnceLock;

/// Chemical element, by atomic number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Element(u8);

struct ElementData {
    symbol: &'static str,
    vdw: f32,
}

/// Symbol and van der Waals radius (Angstrom) indexed by atomic number
static ELEMENT_DATA: &[ElementData] = &[
    ElementData { symbol: "X", vdw: 2.00 },   // 0
    ElementData { symbol: "H", vdw: 1.10 },   // 1
    ElementData { symbol: "He", vdw: 1.40 },  // 2
    ElementData { symbol: "Li", vdw: 1.81 },  // 3
    ElementData { symbol: "Be", vdw: 1.53 },  // 4
    ElementData { symbol: "B", vdw: 1.92 },   // 5
    ElementData { symbol: "C", vdw: 1.70 },   // 6
    ElementData { symbol: "N", vdw: 1.55 },   // 7
    ElementData { symbol: "O", vdw: 1.52 },   // 8
    ElementData { symbol: "F", vdw: 1.47 },   // 9
    ElementData { symbol: "Ne", vdw: 1.54 },  // 10
    ElementData { symbol: "Na", vdw: 2.27 },  // 11
    ElementData { symbol: "Mg", vdw: 1.73 },  // 12
    ElementData { symbol: "Al", vdw: 1.84 },  // 13
    ElementData { symbol: "Si", vdw: 2.10 },  // 14
    ElementData { symbol: "P", vdw: 1.80 },   // 15
    ElementData { symbol: "S", vdw: 1.80 },   // 16
    ElementData { symbol: "Cl", vdw: 1.75 },  // 17
    ElementData { symbol: "Ar", vdw: 1.88 },  // 18
    ElementData { symbol: "K", vdw: 2.75 },   // 19
    ElementData { symbol: "Ca", vdw: 2.31 },  // 20
    ElementData { symbol: "Sc", vdw: 2.30 },  // 21
    ElementData { symbol: "Ti", vdw: 2.15 },  // 22
    ElementData { symbol: "V", vdw: 2.05 },   // 23
    ElementData { symbol: "Cr", vdw: 2.05 },  // 24
    ElementData { symbol: "Mn", vdw: 2.05 },  // 25
    ElementData { symbol: "Fe", vdw: 2.05 },  // 26
    ElementData { symbol: "Co", vdw: 2.00 },  // 27
    ElementData { symbol: "Ni", vdw: 1.97 },  // 28
    ElementData { symbol: "Cu", vdw: 1.96 },  // 29
    ElementData { symbol: "Zn", vdw: 2.01 },  // 30
    ElementData { symbol: "Ga", vdw: 1.87 },  // 31
    ElementData { symbol: "Ge", vdw: 2.11 },  // 32
    ElementData { symbol: "As", vdw: 1.85 },  // 33
    ElementData { symbol: "Se", vdw: 1.90 },  // 34
    ElementData { symbol: "Br", vdw: 1.83 },  // 35
    ElementData { symbol: "Kr", vdw: 2.02 },  // 36
    ElementData { symbol: "Rb", vdw: 3.03 },  // 37
    ElementData { symbol: "Sr", vdw: 2.49 },  // 38
    ElementData { symbol: "Y", vdw: 2.40 },   // 39
    ElementData { symbol: "Zr", vdw: 2.30 },  // 40
    ElementData { symbol: "Nb", vdw: 2.15 },  // 41
    ElementData { symbol: "Mo", vdw: 2.10 },  // 42
    ElementData { symbol: "Tc", vdw: 2.05 },  // 43
    ElementData { symbol: "Ru", vdw: 2.05 },  // 44
    ElementData { symbol: "Rh", vdw: 2.00 },  // 45
    ElementData { symbol: "Pd", vdw: 2.05 },  // 46
    ElementData { symbol: "Ag", vdw: 2.10 },  // 47
    ElementData { symbol: "Cd", vdw: 2.20 },  // 48
    ElementData { symbol: "In", vdw: 2.20 },  // 49
    ElementData { symbol: "Sn", vdw: 2.25 },  // 50
    ElementData { symbol: "Sb", vdw: 2.06 },  // 51
    ElementData { symbol: "Te", vdw: 2.06 },  // 52
    ElementData { symbol: "I", vdw: 1.98 },   // 53
    ElementData { symbol: "Xe", vdw: 2.16 },  // 54
];

/// Radius used for elements outside the table
pub const DEFAULT_VDW_RADIUS: f32 = 2.0;

static SYMBOL_MAP: OnceLock<AHashMap<String, Element>> = OnceLock::new();

fn symbol_map() -> &'static AHashMap<String, Element> {
    SYMBOL_MAP.get_or_init(|| {
        let mut map = AHashMap::with_capacity(ELEMENT_DATA.len() + 2);
        for (i, data) in ELEMENT_DATA.iter().enumerate().skip(1) {
            map.insert(data.symbol.to_ascii_uppercase(), Element(i as u8));
        }
        // Deuterium and tritium
        map.insert("D".to_string(), Element::HYDROGEN);
        map.insert("T".to_string(), Element::HYDROGEN);
        map
    })
}

impl Element {
    pub const UNKNOWN: Element = Element(0);
    pub const HYDROGEN: Element = Element(1);
    pub const CARBON: Element = Element(6);
    pub const NITROGEN: Element = Element(7);
    pub const OXYGEN: Element = Element(8);
    pub const PHOSPHORUS: Element = Element(15);
    pub const SULFUR: Element = Element(16);
    pub const IRON: Element = Element(26);

    /// Element with atomic number `n`, if it is in the table
    pub fn from_atomic_number(n: u8) -> Option<Self> {
        ((n as usize) < ELEMENT_DATA.len()).then_some(Element(n))
    }

    /// Element for `symbol` (case-insensitive); unknown symbols map to [`Element::UNKNOWN`]
    pub fn from_symbol(symbol: &str) -> Self {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Element::UNKNOWN;
        }
        symbol_map()
            .get(&symbol.to_ascii_uppercase())
            .copied()
            .unwrap_or(Element::UNKNOWN)
    }

    /// Guess the element from a PDB-style atom name (`CA` is carbon, `OXT` is oxygen)
    pub fn from_atom_name(name: &str) -> Self {
        name.trim()
            .chars()
            .find(|c| c.is_ascii_alphabetic())
            .map(|c| Element::from_symbol(c.encode_utf8(&mut [0; 4])))
            .unwrap_or(Element::UNKNOWN)
    }

    #[inline]
    pub const fn atomic_number(&self) -> u8 {
        self.0
    }

    #[inline]
    pub fn symbol(&self) -> &'static str {
        ELEMENT_DATA.get(self.0 as usize).map_or("X", |d| d.symbol)
    }

    /// Van der Waals radius in Angstrom
    #[inline]
    pub fn vdw_radius(&self) -> f32 {
        match self.0 {
            0 => DEFAULT_VDW_RADIUS,
            n => ELEMENT_DATA.get(n as usize).map_or(DEFAULT_VDW_RADIUS, |d| d.vdw),
        }
    }

    pub fn is_hydrogen(&self) -> bool {
        *self == Element::HYDROGEN
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_symbol() {
        assert_eq!(Element::from_symbol("C"), Element::CARBON);
        assert_eq!(Element::from_symbol("fe"), Element::IRON);
        assert_eq!(Element::from_symbol("FE"), Element::IRON);
        assert_eq!(Element::from_symbol(" D "), Element::HYDROGEN);
        assert_eq!(Element::from_symbol("Zz"), Element::UNKNOWN);
        assert_eq!(Element::from_symbol(""), Element::UNKNOWN);
    }

    #[test]
    fn test_from_atom_name() {
        assert_eq!(Element::from_atom_name("CA"), Element::CARBON);
        assert_eq!(Element::from_atom_name("OXT"), Element::OXYGEN);
        assert_eq!(Element::from_atom_name("1HB"), Element::HYDROGEN);
    }

    #[test]
    fn test_properties() {
        assert_eq!(Element::SULFUR.symbol(), "S");
        assert_eq!(Element::SULFUR.atomic_number(), 16);
        assert_eq!(Element::CARBON.vdw_radius(), 1.70);
        assert_eq!(Element::UNKNOWN.vdw_radius(), DEFAULT_VDW_RADIUS);
        assert_eq!(Element::from_atomic_number(200), None);
        assert_eq!(Element::NITROGEN.to_string(), "N");
    }
}
