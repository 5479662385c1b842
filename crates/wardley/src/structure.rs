//! Derived views over a parsed map.
//!
//! A parse produces one flat list of elements and a separate list of `evolve`
//! statements. Rendering needs them regrouped: evolving bases flagged, evolved
//! variants placed at their later maturity, pipeline members lifted to full
//! elements and so on. [`MapElements`] computes these groupings once per
//! parse and hands out read-only views.
//!
//! Every view is a pure function of the [`WardleyMap`] it was built from.

use log::{debug, trace};

use wardley_core::{
    evolution::EvolutionOffsets,
    geometry::Region,
    semantic::{AttitudeKind, Element, Pipeline, WardleyMap},
};

/// A connector from an evolving base to its evolved variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvolutionLink<'a> {
    start: &'a Element,
    end: &'a Element,
    boundary: f64,
}

impl<'a> EvolutionLink<'a> {
    /// The evolving base element.
    pub fn start(&self) -> &'a Element {
        self.start
    }

    /// The evolved variant.
    pub fn end(&self) -> &'a Element {
        self.end
    }

    /// Maturity at which the inertia marker is drawn.
    pub fn boundary(&self) -> f64 {
        self.boundary
    }
}

/// An attitude region seen as a PST box.
#[derive(Debug, Clone, PartialEq)]
pub struct PstElement {
    id: String,
    kind: AttitudeKind,
    region: Region,
    line: usize,
}

impl PstElement {
    /// Identifier derived from the kind and line, like element ids.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> AttitudeKind {
        self.kind
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

/// An evolved variant together with the name of the base it came from.
#[derive(Debug, Clone)]
struct Variant {
    base: String,
    element: Element,
}

/// Grouped, read-only views over the elements of a map.
#[derive(Debug, Clone)]
pub struct MapElements<'a> {
    map: &'a WardleyMap,
    offsets: EvolutionOffsets,
    /// Component-like elements in source order, evolving ones flagged.
    bases: Vec<Element>,
    variants: Vec<Variant>,
    /// Pipeline members lifted to elements, sorted by maturity per pipeline.
    members: Vec<Element>,
}

impl<'a> MapElements<'a> {
    /// Groups the elements of `map`.
    ///
    /// `offsets` places the inertia marker of evolution links.
    pub fn new(map: &'a WardleyMap, offsets: EvolutionOffsets) -> Self {
        let mut bases: Vec<Element> = map
            .elements()
            .iter()
            .filter(|element| element.kind().is_component_like())
            .cloned()
            .collect();

        let mut variants = Vec::with_capacity(map.evolved().len());
        for evolve in map.evolved() {
            let Some(base) = bases.iter_mut().find(|base| base.name() == evolve.name()) else {
                debug!(name = evolve.name(), line = evolve.line(); "Evolve without a base element");
                continue;
            };
            let element = base.to_evolved(evolve);
            if !base.evolving() {
                *base = base.clone().into_evolving();
            }
            variants.push(Variant {
                base: evolve.name().to_string(),
                element,
            });
        }

        let members = map.pipelines().iter().flat_map(pipeline_members).collect();

        let elements = Self {
            map,
            offsets,
            bases,
            variants,
            members,
        };
        trace!(
            bases = elements.bases.len(),
            variants = elements.variants.len(),
            members = elements.members.len();
            "Map elements grouped"
        );
        elements
    }

    /// The map these views were built from.
    pub fn map(&self) -> &'a WardleyMap {
        self.map
    }

    /// Component-like bases followed by the evolved variants.
    ///
    /// A base that evolves stays in the view flagged as evolving; its
    /// variant sits at the evolved maturity with the base visibility.
    pub fn merged_components(&self) -> impl Iterator<Item = &Element> {
        self.bases
            .iter()
            .chain(self.variants.iter().map(|variant| &variant.element))
    }

    /// Bases that have at least one evolved variant.
    pub fn evolving_components(&self) -> impl Iterator<Item = &Element> {
        self.bases.iter().filter(|element| element.evolving())
    }

    pub fn evolved_components(&self) -> impl Iterator<Item = &Element> {
        self.variants.iter().map(|variant| &variant.element)
    }

    /// The merged view with evolved variants left out, anchors included.
    pub fn non_evolved_elements(&self) -> impl Iterator<Item = &Element> {
        self.bases.iter().chain(self.map.anchors())
    }

    /// Everything drawn as a component symbol: merged components and
    /// pipeline members.
    pub fn merged_elements_excluding_anchors(&self) -> impl Iterator<Item = &Element> {
        self.merged_components().chain(self.members.iter())
    }

    /// One connector per evolved variant, from its base.
    ///
    /// The boundary is the first stage offset between both maturities in the
    /// direction of travel, or the start maturity plus a fixed step when no
    /// offset lies in between.
    pub fn evolution_links(&self) -> Vec<EvolutionLink<'_>> {
        self.variants
            .iter()
            .filter_map(|variant| {
                let start = self.bases.iter().find(|base| base.name() == variant.base)?;
                let end = &variant.element;
                Some(EvolutionLink {
                    start,
                    end,
                    boundary: self
                        .offsets
                        .inertia_boundary(start.maturity(), end.maturity()),
                })
            })
            .collect()
    }

    /// Pipeline members as elements at their pipeline's visibility.
    pub fn pipeline_components(&self) -> &[Element] {
        &self.members
    }

    pub fn pipelines(&self) -> &'a [Pipeline] {
        self.map.pipelines()
    }

    /// Attitude regions as PST boxes, in source order.
    pub fn pst_elements(&self) -> Vec<PstElement> {
        self.map
            .attitudes()
            .iter()
            .map(|attitude| PstElement {
                id: format!("{}_{}", attitude.kind().keyword(), attitude.line()),
                kind: attitude.kind(),
                region: attitude.region(),
                line: attitude.line(),
            })
            .collect()
    }

    /// Merged components carrying a method, from a decorator or a method line.
    pub fn method_components(&self) -> impl Iterator<Item = &Element> {
        self.merged_components()
            .filter(|element| element.decorators().method().is_some())
    }

    /// Every element a link end may name: merged components, anchors and
    /// pipeline members.
    pub fn elements_for_links(&self) -> Vec<&Element> {
        self.merged_components()
            .chain(self.map.anchors())
            .chain(self.members.iter())
            .collect()
    }

    /// The latest evolved variant of the base named `name`.
    pub fn evolved_variant_of(&self, name: &str) -> Option<&Element> {
        self.variants
            .iter()
            .rev()
            .find(|variant| variant.base == name)
            .map(|variant| &variant.element)
    }

    /// Finds an element of any view by its identifier.
    pub fn element_by_id(&self, id: &str) -> Option<&Element> {
        self.elements_for_links()
            .into_iter()
            .find(|element| element.id() == id)
    }
}

fn pipeline_members(pipeline: &Pipeline) -> Vec<Element> {
    let mut members: Vec<Element> = pipeline
        .components()
        .iter()
        .map(|member| member.to_element(pipeline.visibility()))
        .collect();
    members.sort_by(|a, b| a.maturity().total_cmp(&b.maturity()));
    members
}
