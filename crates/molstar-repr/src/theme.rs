//! Color and size themes
//!
//! A [`Theme`] decides the color and size of every element a visual draws.
//! Themes are created by name from a [`ThemeRegistry`], which is injected
//! through the representation context rather than held globally.
//! [`create_theme`] reuses the previous sub-theme instance when the new one
//! is equal, so visuals can detect "nothing changed" with a pointer compare.

use std::sync::Arc;

use ahash::AHashMap;
use molstar_mol::Structure;

use crate::color::{chain_color, element_color, Color};
use crate::error::{ReprError, ReprResult};
use crate::param::Values;

/// Prop selecting the color theme by name
pub const COLOR_THEME_PROP: &str = "color_theme";
/// Prop selecting the size theme by name
pub const SIZE_THEME_PROP: &str = "size_theme";
/// Color of the uniform color theme
pub const UNIFORM_COLOR_PROP: &str = "uniform_color";
/// Size of the uniform size theme
pub const UNIFORM_SIZE_PROP: &str = "uniform_size";

pub const DEFAULT_COLOR_THEME: &str = "uniform";
pub const DEFAULT_SIZE_THEME: &str = "uniform";

/// Data a theme is computed against
#[derive(Debug, Clone, Default)]
pub struct ThemeDataContext {
    pub structure: Option<Arc<Structure>>,
}

impl ThemeDataContext {
    pub fn new(structure: Arc<Structure>) -> Self {
        Self {
            structure: Some(structure),
        }
    }
}

/// Per-element coloring
#[derive(Debug, Clone, PartialEq)]
pub enum ColorTheme {
    /// One color for everything
    Uniform { color: Color },
    /// CPK color of the chemical element
    ElementSymbol,
    /// Palette color of the element's chain
    ChainId { chain_count: usize },
}

impl ColorTheme {
    pub fn name(&self) -> &'static str {
        match self {
            ColorTheme::Uniform { .. } => "uniform",
            ColorTheme::ElementSymbol => "element-symbol",
            ColorTheme::ChainId { .. } => "chain-id",
        }
    }

    /// Color of element `index` of `structure`
    pub fn color(&self, structure: &Structure, index: usize) -> Color {
        match self {
            ColorTheme::Uniform { color } => *color,
            ColorTheme::ElementSymbol => structure
                .element(index)
                .map_or(Color::MAGENTA, element_color),
            ColorTheme::ChainId { .. } => structure
                .chain_index(index)
                .map_or(Color::MAGENTA, chain_color),
        }
    }
}

/// Per-element radius
#[derive(Debug, Clone, PartialEq)]
pub enum SizeTheme {
    /// One radius for everything
    Uniform { size: f32 },
    /// Van der Waals radius of the chemical element
    Physical,
}

impl SizeTheme {
    pub fn name(&self) -> &'static str {
        match self {
            SizeTheme::Uniform { .. } => "uniform",
            SizeTheme::Physical => "physical",
        }
    }

    /// Radius of element `index` of `structure`
    pub fn size(&self, structure: &Structure, index: usize) -> f32 {
        match self {
            SizeTheme::Uniform { size } => *size,
            SizeTheme::Physical => structure
                .element(index)
                .map_or(molstar_mol::element::DEFAULT_VDW_RADIUS, |e| e.vdw_radius()),
        }
    }
}

/// Color and size theme pair used by one update
#[derive(Debug, Clone)]
pub struct Theme {
    pub color: Arc<ColorTheme>,
    pub size: Arc<SizeTheme>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            color: Arc::new(ColorTheme::Uniform {
                color: Color::default(),
            }),
            size: Arc::new(SizeTheme::Uniform { size: 1.0 }),
        }
    }
}

pub type ColorThemeFactory = fn(&ThemeDataContext, &Values) -> ColorTheme;
pub type SizeThemeFactory = fn(&ThemeDataContext, &Values) -> SizeTheme;

fn uniform_color(_: &ThemeDataContext, props: &Values) -> ColorTheme {
    ColorTheme::Uniform {
        color: props.color(UNIFORM_COLOR_PROP).unwrap_or_default(),
    }
}

fn element_symbol_color(_: &ThemeDataContext, _: &Values) -> ColorTheme {
    ColorTheme::ElementSymbol
}

fn chain_id_color(data: &ThemeDataContext, _: &Values) -> ColorTheme {
    ColorTheme::ChainId {
        chain_count: data.structure.as_ref().map_or(0, |s| s.chain_count()),
    }
}

fn uniform_size(_: &ThemeDataContext, props: &Values) -> SizeTheme {
    SizeTheme::Uniform {
        size: props.number_or(UNIFORM_SIZE_PROP, 1.0) as f32,
    }
}

fn physical_size(_: &ThemeDataContext, _: &Values) -> SizeTheme {
    SizeTheme::Physical
}

/// Named theme factories
#[derive(Debug, Clone, Default)]
pub struct ThemeRegistry {
    color: AHashMap<String, ColorThemeFactory>,
    size: AHashMap<String, SizeThemeFactory>,
}

impl ThemeRegistry {
    /// Registry without any theme
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with the built-in themes
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register_color("uniform", uniform_color);
        registry.register_color("element-symbol", element_symbol_color);
        registry.register_color("chain-id", chain_id_color);
        registry.register_size("uniform", uniform_size);
        registry.register_size("physical", physical_size);
        registry
    }

    pub fn register_color(&mut self, name: impl Into<String>, factory: ColorThemeFactory) {
        self.color.insert(name.into(), factory);
    }

    pub fn register_size(&mut self, name: impl Into<String>, factory: SizeThemeFactory) {
        self.size.insert(name.into(), factory);
    }

    /// Registered color theme names, sorted
    pub fn color_theme_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.color.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered size theme names, sorted
    pub fn size_theme_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.size.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn create_color_theme(
        &self,
        name: &str,
        data: &ThemeDataContext,
        props: &Values,
    ) -> ReprResult<ColorTheme> {
        let factory = self.color.get(name).ok_or_else(|| ReprError::UnknownTheme {
            kind: "color",
            name: name.to_string(),
        })?;
        Ok(factory(data, props))
    }

    pub fn create_size_theme(
        &self,
        name: &str,
        data: &ThemeDataContext,
        props: &Values,
    ) -> ReprResult<SizeTheme> {
        let factory = self.size.get(name).ok_or_else(|| ReprError::UnknownTheme {
            kind: "size",
            name: name.to_string(),
        })?;
        Ok(factory(data, props))
    }
}

fn reuse<T: PartialEq>(created: T, previous: Option<&Arc<T>>) -> Arc<T> {
    match previous {
        Some(previous) if **previous == created => Arc::clone(previous),
        _ => Arc::new(created),
    }
}

/// Create the theme selected by `props`, reusing unchanged parts of `previous`
pub fn create_theme(
    registry: &ThemeRegistry,
    data: &ThemeDataContext,
    props: &Values,
    previous: Option<&Theme>,
) -> ReprResult<Theme> {
    let color_name = props.select(COLOR_THEME_PROP).unwrap_or(DEFAULT_COLOR_THEME);
    let size_name = props.select(SIZE_THEME_PROP).unwrap_or(DEFAULT_SIZE_THEME);

    let color = registry.create_color_theme(color_name, data, props)?;
    let size = registry.create_size_theme(size_name, data, props)?;

    Ok(Theme {
        color: reuse(color, previous.map(|t| &t.color)),
        size: reuse(size, previous.map(|t| &t.size)),
    })
}
