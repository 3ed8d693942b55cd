use std::sync::Arc;

use molstar_io::cif::{
    mmcif, to_typed_frame, BinaryField, Category, CategorySchema, Field, FieldSchema, Frame,
    FrameSchema, TextField,
};
use molstar_mol::{Element, MolError, Structure};

fn text(values: &[&str]) -> Arc<dyn Field> {
    Arc::new(TextField::from_values(values))
}

fn two_model_frame() -> Arc<Frame> {
    let atom_site = Category::new("_atom_site", 4)
        .with_field("label_atom_id", text(&["N", "CA", "N", "CA"]))
        .unwrap()
        .with_field("type_symbol", text(&["N", "?", "N", "C"]))
        .unwrap()
        .with_field("label_asym_id", text(&["A", "B", "A", "B"]))
        .unwrap()
        .with_field("Cartn_x", Arc::new(BinaryField::floats(vec![1.0, 2.0, 3.0, 4.0])))
        .unwrap()
        .with_field("Cartn_y", Arc::new(BinaryField::floats(vec![0.0; 4])))
        .unwrap()
        .with_field("Cartn_z", Arc::new(BinaryField::floats(vec![-1.0; 4])))
        .unwrap()
        .with_field("pdbx_PDB_model_num", Arc::new(BinaryField::ints(vec![1, 1, 2, 2])))
        .unwrap();
    Arc::new(Frame::new("2XYZ").with_category(atom_site).unwrap())
}

#[test]
fn builds_first_model_only() {
    let typed = to_typed_frame(&mmcif::mmcif_schema(), two_model_frame()).unwrap();
    let structure = Structure::from_frame(&typed).unwrap();

    assert_eq!(structure.label(), "2XYZ");
    assert_eq!(structure.element_count(), 2);
    assert_eq!(structure.element(0), Some(Element::NITROGEN));
    // `?` type symbol falls back to the atom name
    assert_eq!(structure.element(1), Some(Element::CARBON));
    assert_eq!(structure.atom_name(1), Some("CA"));
    assert_eq!(structure.chain_count(), 2);
    assert_eq!(structure.chain_id(1), Some("B"));

    let p = structure.position(1).unwrap();
    assert_eq!((p.x, p.y, p.z), (2.0, 0.0, -1.0));
}

#[test]
fn minimal_schema_is_enough() {
    let atom_site = Category::new("_atom_site", 3)
        .with_field("label_atom_id", text(&["O", "C1", "FE"]))
        .unwrap()
        .with_field("Cartn_x", text(&["0", "1", "2"]))
        .unwrap()
        .with_field("Cartn_y", text(&["0", "0", "0"]))
        .unwrap()
        .with_field("Cartn_z", text(&["0", "0", "0"]))
        .unwrap();
    let frame = Arc::new(Frame::new("").with_category(atom_site).unwrap());
    let schema = FrameSchema::new().category(
        "atom_site",
        CategorySchema::new()
            .field("label_atom_id", FieldSchema::str())
            .field("Cartn_x", FieldSchema::float())
            .field("Cartn_y", FieldSchema::float())
            .field("Cartn_z", FieldSchema::float()),
    );

    let typed = to_typed_frame(&schema, frame).unwrap();
    let structure = Structure::from_frame(&typed).unwrap();
    assert_eq!(structure.label(), "_atom_site");
    assert_eq!(structure.element_count(), 3);
    assert_eq!(structure.element(0), Some(Element::OXYGEN));
    assert_eq!(structure.chain_count(), 1);
}

#[test]
fn missing_coordinates_is_an_error() {
    let atom_site = Category::new("_atom_site", 1)
        .with_field("Cartn_x", text(&["0"]))
        .unwrap()
        .with_field("Cartn_y", text(&["0"]))
        .unwrap();
    let frame = Arc::new(Frame::new("broken").with_category(atom_site).unwrap());

    let typed = to_typed_frame(&mmcif::mmcif_schema(), frame).unwrap();
    let err = Structure::from_frame(&typed).unwrap_err();
    assert!(matches!(err, MolError::MissingCoordinates(ref key) if key == "Cartn_z"));
}

#[test]
fn missing_atom_site_gives_empty_structure() {
    let frame = Arc::new(Frame::new("empty"));
    let typed = to_typed_frame(&mmcif::mmcif_schema(), frame).unwrap();
    let structure = Structure::from_frame(&typed).unwrap();
    assert!(structure.is_empty());
}
