//! Spacefill representation: van der Waals spheres for every element

use molstar_mol::Structure;

use crate::color::Color;
use crate::complex_representation::ComplexRepresentation;
use crate::geometry::MAX_DETAIL;
use crate::param::{ParamDefinition, Params};
use crate::representation::RepresentationContext;
use crate::theme::{COLOR_THEME_PROP, SIZE_THEME_PROP, UNIFORM_COLOR_PROP, UNIFORM_SIZE_PROP};
use crate::visual::element_sphere::{ALPHA_PROP, DETAIL_PROP, SIZE_FACTOR_PROP};
use crate::visual::ElementSphereVisual;

/// Above this many elements the default detail drops to the coarsest level
pub const LARGE_STRUCTURE_ELEMENTS: usize = 100_000;

pub type SpacefillRepresentation = ComplexRepresentation<ElementSphereVisual>;

/// Params offered by the spacefill representation for `structure`
pub fn spacefill_params(ctx: &RepresentationContext, structure: &Structure) -> Params {
    let detail = if structure.element_count() > LARGE_STRUCTURE_ELEMENTS {
        0.0
    } else {
        1.0
    };
    Params::new()
        .with(
            DETAIL_PROP,
            ParamDefinition::numeric(detail, 0.0, MAX_DETAIL as f64, 1.0),
        )
        .with(SIZE_FACTOR_PROP, ParamDefinition::numeric(1.0, 0.1, 10.0, 0.1))
        .with(
            COLOR_THEME_PROP,
            ParamDefinition::select("element-symbol", ctx.themes.color_theme_names().as_slice()),
        )
        .with(
            SIZE_THEME_PROP,
            ParamDefinition::select("physical", ctx.themes.size_theme_names().as_slice()),
        )
        .with(UNIFORM_COLOR_PROP, ParamDefinition::color(Color::GRAY))
        .with(UNIFORM_SIZE_PROP, ParamDefinition::numeric(1.0, 0.1, 10.0, 0.1))
        .with(ALPHA_PROP, ParamDefinition::numeric(1.0, 0.0, 1.0, 0.01))
}

pub fn spacefill_representation() -> SpacefillRepresentation {
    ComplexRepresentation::new("Spacefill", spacefill_params, ElementSphereVisual::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{ParamValue, Values};
    use lin_alg::f32::Vec3;
    use molstar_mol::{AtomSite, Element};

    fn structure(n: usize) -> Structure {
        Structure::from_atoms(
            "chain",
            (0..n).map(|i| AtomSite::new("C", Element::CARBON, Vec3::new(i as f32, 0.0, 0.0), "A")),
        )
    }

    #[test]
    fn test_defaults_pass_their_own_check() {
        let ctx = RepresentationContext::default();
        let params = spacefill_params(&ctx, &structure(3));
        assert_eq!(params.len(), 7);
        assert!(params.check(&params.default_values()).is_ok());
        assert_eq!(params.default_values().number(DETAIL_PROP), Some(1.0));
    }

    #[test]
    fn test_large_structure_uses_coarse_detail() {
        let ctx = RepresentationContext::default();
        let params = spacefill_params(&ctx, &structure(LARGE_STRUCTURE_ELEMENTS + 1));
        assert_eq!(params.default_values().number(DETAIL_PROP), Some(0.0));
    }

    #[test]
    fn test_check_rejects_bad_values() {
        let ctx = RepresentationContext::default();
        let params = spacefill_params(&ctx, &structure(1));

        let unknown = Values::new().with(COLOR_THEME_PROP, ParamValue::Select("rainbow".into()));
        assert!(params.check(&unknown).is_err());
        let out_of_range = Values::new().with(ALPHA_PROP, ParamValue::Number(2.0));
        assert!(params.check(&out_of_range).is_err());
        let wrong_type = Values::new().with(DETAIL_PROP, ParamValue::Boolean(true));
        assert!(params.check(&wrong_type).is_err());
        let undeclared = Values::new().with("radius", ParamValue::Number(1.0));
        assert!(params.check(&undeclared).is_err());
    }
}
