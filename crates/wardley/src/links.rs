//! Binding links to the elements they name.
//!
//! Links reference both ends by name. [`resolve_links`] looks every name up
//! among the elements a link may point at, optionally swapping a base
//! component for its evolved variant, and groups the result by start name so
//! consumers can key their output without recomputing anything.

use std::fmt;

use indexmap::IndexMap;
use log::debug;

use wardley_core::semantic::{Element, Link};

use crate::structure::MapElements;

/// How a link is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// A plain dependency, `A->B`.
    Plain,
    /// A value flow, `A+>B`, `A+<B`, `A+<>B` or `A+'value'>B`.
    Flow,
}

impl LinkKind {
    pub fn of(link: &Link) -> Self {
        if link.flow() {
            LinkKind::Flow
        } else {
            LinkKind::Plain
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkKind::Plain => write!(f, "link"),
            LinkKind::Flow => write!(f, "flow"),
        }
    }
}

/// A link bound to concrete elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLink<'a> {
    start: &'a Element,
    end: &'a Element,
    link: &'a Link,
}

impl<'a> ResolvedLink<'a> {
    pub fn start(&self) -> &'a Element {
        self.start
    }

    pub fn end(&self) -> &'a Element {
        self.end
    }

    pub fn link(&self) -> &'a Link {
        self.link
    }

    pub fn kind(&self) -> LinkKind {
        LinkKind::of(self.link)
    }
}

/// Links grouped by start name, plus the ones that did not resolve.
#[derive(Debug, Clone, Default)]
pub struct ResolvedLinks<'a> {
    groups: IndexMap<String, Vec<ResolvedLink<'a>>>,
    unresolved: Vec<&'a Link>,
}

impl<'a> ResolvedLinks<'a> {
    /// Groups in order of first appearance, keyed by the start name as written.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[ResolvedLink<'a>])> {
        self.groups
            .iter()
            .map(|(name, links)| (name.as_str(), links.as_slice()))
    }

    /// The links of the group starting at `name`.
    pub fn group(&self, name: &str) -> Option<&[ResolvedLink<'a>]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Every resolved link, group by group.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedLink<'a>> {
        self.groups.values().flatten()
    }

    /// Number of resolved links.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Links with an end that names nothing on the map.
    pub fn unresolved(&self) -> &[&'a Link] {
        &self.unresolved
    }
}

/// Resolves `links` against the elements of a map.
///
/// Names are matched exactly. Base elements, anchors and pipeline members are
/// searched first, then evolved variants by their displayed name. With
/// `show_linked_evolved`, an end naming a base that has an evolved variant
/// resolves to that variant instead.
///
/// Links with an end that names nothing are left out of the groups and
/// listed in [`ResolvedLinks::unresolved`].
///
/// # Examples
///
/// ```
/// # use wardley::{links::resolve_links, structure::MapElements};
/// # use wardley_core::evolution::EvolutionOffsets;
/// let outcome = wardley_parser::parse("component A [0.5, 0.2]\ncomponent B [0.3, 0.4]\nA->B\nA->C\n");
/// let elements = MapElements::new(outcome.map(), EvolutionOffsets::default());
///
/// let resolved = resolve_links(outcome.map().links(), &elements, false);
/// assert_eq!(resolved.len(), 1);
/// assert_eq!(resolved.unresolved().len(), 1);
/// ```
pub fn resolve_links<'a>(
    links: &'a [Link],
    elements: &'a MapElements<'_>,
    show_linked_evolved: bool,
) -> ResolvedLinks<'a> {
    let candidates = elements.elements_for_links();
    let lookup = |name: &str| -> Option<&'a Element> {
        let found = candidates
            .iter()
            .copied()
            .filter(|element| !element.evolved())
            .find(|element| element.name() == name)
            .or_else(|| {
                elements
                    .evolved_components()
                    .find(|element| element.name() == name)
            })?;
        if show_linked_evolved && found.evolving() {
            return elements.evolved_variant_of(found.name()).or(Some(found));
        }
        Some(found)
    };

    let mut resolved = ResolvedLinks::default();
    for link in links {
        match (lookup(link.start()), lookup(link.end())) {
            (Some(start), Some(end)) => {
                resolved
                    .groups
                    .entry(link.start().to_string())
                    .or_default()
                    .push(ResolvedLink { start, end, link });
            }
            (start, end) => {
                debug!(
                    link = link.to_string(),
                    line = link.line(),
                    start_found = start.is_some(),
                    end_found = end.is_some();
                    "Dropping unresolved link"
                );
                resolved.unresolved.push(link);
            }
        }
    }

    debug!(
        links = resolved.len(),
        groups = resolved.groups.len(),
        unresolved = resolved.unresolved.len();
        "Links resolved"
    );
    resolved
}

/// Finds the first link from `start` to `end`.
pub fn find_link<'a>(links: &'a [Link], start: &str, end: &str) -> Option<&'a Link> {
    links
        .iter()
        .find(|link| link.start() == start && link.end() == end)
}
