//! mmCIF schema subset
//!
//! The categories needed to build a coordinate model plus the crystallographic
//! cell. Field names follow the PDBx/mmCIF dictionary.

use super::schema::{CategorySchema, FieldSchema, FrameSchema};

/// `_atom_site`: one row per atom
pub fn atom_site() -> CategorySchema {
    CategorySchema::new()
        .field("group_PDB", FieldSchema::str())
        .field("id", FieldSchema::int())
        .field("type_symbol", FieldSchema::str())
        .field("label_atom_id", FieldSchema::str())
        .field("label_alt_id", FieldSchema::str())
        .field("label_comp_id", FieldSchema::str())
        .field("label_asym_id", FieldSchema::str())
        .field("label_entity_id", FieldSchema::str())
        .field("label_seq_id", FieldSchema::int())
        .field("Cartn_x", FieldSchema::float())
        .field("Cartn_y", FieldSchema::float())
        .field("Cartn_z", FieldSchema::float())
        .field("occupancy", FieldSchema::float())
        .field("B_iso_or_equiv", FieldSchema::float())
        .field("auth_seq_id", FieldSchema::int())
        .field("auth_asym_id", FieldSchema::str())
        .field("pdbx_PDB_model_num", FieldSchema::int())
}

/// `_atom_sites`: fractional transformation
pub fn atom_sites() -> CategorySchema {
    CategorySchema::new()
        .field("entry_id", FieldSchema::str())
        .field("fract_transf_matrix", FieldSchema::matrix(3, 3))
        .field("fract_transf_vector", FieldSchema::vector(3))
}

/// `_cell`: unit cell parameters
pub fn cell() -> CategorySchema {
    CategorySchema::new()
        .field("entry_id", FieldSchema::str())
        .field("length_a", FieldSchema::float())
        .field("length_b", FieldSchema::float())
        .field("length_c", FieldSchema::float())
        .field("angle_alpha", FieldSchema::float())
        .field("angle_beta", FieldSchema::float())
        .field("angle_gamma", FieldSchema::float())
        .field("Z_PDB", FieldSchema::int())
}

/// `_entry`
pub fn entry() -> CategorySchema {
    CategorySchema::new().field("id", FieldSchema::str())
}

/// Frame schema with every category of this module
pub fn mmcif_schema() -> FrameSchema {
    FrameSchema::new()
        .category("entry", entry())
        .category("cell", cell())
        .category("atom_sites", atom_sites())
        .category("atom_site", atom_site())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mmcif_schema_is_valid() {
        let schema = mmcif_schema();
        schema.validate().unwrap();
        assert_eq!(schema.categories.len(), 4);
        assert!(schema.get("atom_site").unwrap().get("Cartn_x").is_some());
    }
}
