//! Wardley - Model queries and in-place source editing for Wardley maps.
//!
//! Parsing is done by `wardley_parser`; this crate turns the parsed model into
//! the views a renderer draws from and writes edits made on the rendered map
//! back into the source text, touching only the lines responsible.

pub mod config;
pub mod links;
pub mod pst;
pub mod rename;
pub mod rewrite;
pub mod structure;

mod error;
mod lines;

pub use wardley_core::{evolution, geometry, semantic};

pub use error::WardleyError;

use std::{fs, path::Path};

use log::{debug, info, trace, warn};

use wardley_core::{
    geometry::{MapDimensions, Point, Position, Region},
    semantic::{Element, LabelOffset, WardleyMap},
};

use config::AppConfig;
use links::ResolvedLinks;
use pst::ResizeHandle;
use rewrite::{Rewriter, Target, Update};
use structure::{MapElements, PstElement};

/// Builder for parsing maps and deriving their views.
///
/// # Examples
///
/// ```
/// use wardley::{MapBuilder, config::AppConfig};
///
/// let source = "component Tea [0.8, 0.3]\ncomponent Water [0.4, 0.9]\nTea->Water\n";
/// let builder = MapBuilder::new(AppConfig::default());
///
/// let map = builder.parse_strict(source).expect("Failed to parse");
/// let elements = builder.elements(&map);
/// let links = builder.resolve_links(&elements);
/// assert_eq!(links.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MapBuilder {
    config: AppConfig,
}

impl MapBuilder {
    /// Create a new map builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse source text into a map, keeping whatever parsed.
    ///
    /// Lines that fail to parse are logged and skipped.
    pub fn parse(&self, source: &str) -> WardleyMap {
        info!("Parsing map");
        let (map, diagnostics) = wardley_parser::parse(source).into_parts();
        for diagnostic in &diagnostics {
            warn!(line:? = diagnostic.line(); "{diagnostic}");
        }
        debug!(elements = map.elements().len(), diagnostics = diagnostics.len(); "Map parsed");
        trace!(map:?; "Parsed map");
        map
    }

    /// Parse source text into a map, failing on any error.
    ///
    /// # Errors
    ///
    /// Returns `WardleyError::Parse` carrying the diagnostics and the source.
    pub fn parse_strict(&self, source: &str) -> Result<WardleyMap, WardleyError> {
        info!("Parsing map");
        let map = wardley_parser::parse_strict(source)
            .map_err(|err| WardleyError::new_parse_error(err, source))?;
        debug!(elements = map.elements().len(); "Map parsed successfully");
        Ok(map)
    }

    /// Read and strictly parse the map at `path`.
    ///
    /// # Errors
    ///
    /// Returns `WardleyError::Io` when the file cannot be read and
    /// `WardleyError::Parse` when it does not parse.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<(String, WardleyMap), WardleyError> {
        let path = path.as_ref();
        info!(path:? = path; "Reading map");
        let source = fs::read_to_string(path)?;
        let map = self.parse_strict(&source)?;
        Ok((source, map))
    }

    /// Groups the elements of `map` into the views a renderer draws.
    pub fn elements<'a>(&self, map: &'a WardleyMap) -> MapElements<'a> {
        MapElements::new(map, self.config.map().evolution())
    }

    /// Resolves the links of the map behind `elements`.
    pub fn resolve_links<'a>(&self, elements: &'a MapElements<'_>) -> ResolvedLinks<'a> {
        links::resolve_links(
            elements.map().links(),
            elements,
            self.config.map().show_linked_evolved(),
        )
    }

    /// The surface size of `map`; its `size` statement wins over the config.
    pub fn dimensions(&self, map: &WardleyMap) -> MapDimensions {
        map.size().unwrap_or_else(|| self.config.map().dimensions())
    }
}

/// Turns interactions with a rendered map into replacement source text.
///
/// Every method takes the current text and returns the complete new text, so
/// a host can hand the result straight to its own text store. Nothing is kept
/// between calls.
///
/// # Examples
///
/// ```
/// use wardley::{MapBuilder, MapEditor};
/// use wardley_core::geometry::Point;
///
/// let source = "component Kettle [0.43, 0.35]\n";
/// let builder = MapBuilder::default();
/// let map = builder.parse(source);
/// let editor = MapEditor::new(builder.config(), builder.dimensions(&map));
///
/// let kettle = &map.elements()[0];
/// let edited = editor.drop_element(source, kettle, Point::new(300.0, 120.0)).unwrap();
/// assert_eq!(edited, "component Kettle [0.80, 0.60]\n");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MapEditor {
    rewriter: Rewriter,
    dimensions: MapDimensions,
}

impl MapEditor {
    /// Creates an editor writing with the precision from `config`.
    pub fn new(config: &AppConfig, dimensions: MapDimensions) -> Self {
        Self {
            rewriter: Rewriter::new(config.edit().precision()),
            dimensions,
        }
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    /// Moves `element` to `position`.
    ///
    /// Evolved variants and pipeline members only take the maturity.
    ///
    /// # Errors
    ///
    /// Returns `WardleyError::Rewrite` when no line could take the edit.
    pub fn move_element(
        &self,
        text: &str,
        element: &Element,
        position: Position,
    ) -> Result<String, WardleyError> {
        let target = Target::from_element(element);
        let edited = self
            .rewriter
            .try_update_position(text, &target, Update::Position(position.clamped()))?;
        debug!(element = element.id(), position:? = position; "Element moved");
        Ok(edited)
    }

    /// Moves `element` to where it was dropped on the surface.
    ///
    /// # Errors
    ///
    /// See [`MapEditor::move_element`].
    pub fn drop_element(&self, text: &str, element: &Element, point: Point) -> Result<String, WardleyError> {
        self.move_element(text, element, self.dimensions.to_position(point))
    }

    /// Writes a new label offset for `element`.
    ///
    /// # Errors
    ///
    /// Returns `WardleyError::Rewrite` when no line could take the edit.
    pub fn move_label(
        &self,
        text: &str,
        element: &Element,
        offset: LabelOffset,
    ) -> Result<String, WardleyError> {
        let target = Target::from_element(element);
        Ok(self
            .rewriter
            .try_update_position(text, &target, Update::Label(offset))?)
    }

    /// Resizes a PST box by dragging `handle` to `pointer`.
    ///
    /// # Errors
    ///
    /// Returns `WardleyError::Rewrite` when the attitude line is gone.
    pub fn resize_attitude(
        &self,
        text: &str,
        element: &PstElement,
        handle: ResizeHandle,
        pointer: Position,
    ) -> Result<String, WardleyError> {
        let region = pst::resize(element.region(), handle, pointer);
        debug!(id = element.id(), handle = handle.to_string(); "Attitude resized");
        self.write_region(text, element, region)
    }

    /// Drags a PST box so its first corner lands on `first`.
    ///
    /// # Errors
    ///
    /// Returns `WardleyError::Rewrite` when the attitude line is gone.
    pub fn drag_attitude(
        &self,
        text: &str,
        element: &PstElement,
        first: Position,
    ) -> Result<String, WardleyError> {
        let region = pst::drag(element.region(), first);
        self.write_region(text, element, region)
    }

    fn write_region(
        &self,
        text: &str,
        element: &PstElement,
        region: Region,
    ) -> Result<String, WardleyError> {
        let target = Target::attitude(element.kind()).at_line(element.line());
        Ok(self
            .rewriter
            .try_update_position(text, &target, Update::Region(region))?)
    }

    /// Applies an arbitrary update to `target`.
    ///
    /// # Errors
    ///
    /// Returns `WardleyError::Rewrite` when no line could take the edit.
    pub fn update(&self, text: &str, target: &Target, update: Update) -> Result<String, WardleyError> {
        Ok(self.rewriter.try_update_position(text, target, update)?)
    }

    /// Renames the element defined on `line`.
    ///
    /// # Errors
    ///
    /// See [`rename::rename`].
    pub fn rename(&self, text: &str, line: usize, old: &str, new: &str) -> Result<String, WardleyError> {
        Ok(rename::rename(text, line, old, new)?)
    }

    /// Sets or clears the context of the link on `line`.
    ///
    /// # Errors
    ///
    /// See [`rename::set_link_context`].
    pub fn set_link_context(&self, text: &str, line: usize, context: &str) -> Result<String, WardleyError> {
        Ok(rename::set_link_context(text, line, context)?)
    }

    /// Adds a component where the surface was clicked.
    ///
    /// # Errors
    ///
    /// See [`rename::add_component`].
    pub fn add_component(&self, text: &str, name: &str, point: Point) -> Result<String, WardleyError> {
        Ok(rename::add_component(text, name, self.dimensions.to_position(point).clamped())?)
    }

    /// Deletes the element defined on `line` and what refers to it.
    ///
    /// # Errors
    ///
    /// See [`rename::delete_element`].
    pub fn delete_element(&self, text: &str, line: usize) -> Result<String, WardleyError> {
        Ok(rename::delete_element(text, line)?)
    }
}
