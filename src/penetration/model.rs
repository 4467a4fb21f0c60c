//! Host-model abstraction: elements, documents and link instances.

use std::fmt;

use crate::geometry::Aabb;
use crate::math::Matrix4;

use super::capability::BoundarySolid;
use super::resolver::GeometryTree;

/// Identifier of an element inside one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Element category as used by the category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    Wall,
    StructuralFraming,
    Floor,
    StructuralColumn,
    Roof,
    Ceiling,
}

impl Category {
    /// The structural categories conduits are checked against by default.
    pub const STRUCTURAL: [Category; 3] =
        [Category::Wall, Category::StructuralFraming, Category::Floor];

    /// `categories` with repeats dropped, first occurrence kept.
    #[must_use]
    pub fn distinct(categories: impl IntoIterator<Item = Category>) -> Vec<Category> {
        let mut out: Vec<Category> = Vec::new();
        for category in categories {
            if !out.contains(&category) {
                out.push(category);
            }
        }
        out
    }
}

/// The document an element was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelSource {
    /// The host document.
    Host,
    /// The linked document at this position in the link list.
    Link(usize),
}

/// Reference to an element, qualified by the document it comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementRef {
    pub source: ModelSource,
    pub element: ElementId,
}

impl ElementRef {
    #[must_use]
    pub fn host(element: ElementId) -> Self {
        Self {
            source: ModelSource::Host,
            element,
        }
    }

    #[must_use]
    pub fn linked(link: usize, element: ElementId) -> Self {
        Self {
            source: ModelSource::Link(link),
            element,
        }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            ModelSource::Host => write!(f, "host:{}", self.element),
            ModelSource::Link(i) => write!(f, "link[{i}]:{}", self.element),
        }
    }
}

/// A model element with its geometry and bounds in document coordinates.
#[derive(Debug, Clone)]
pub struct Element<S> {
    pub id: ElementId,
    pub category: Category,
    /// Missing when the host cannot provide bounds for the element.
    pub bounding_box: Option<Aabb>,
    pub geometry: GeometryTree<S>,
}

/// A document that can enumerate its elements by category.
pub trait ModelDocument {
    type Solid: BoundarySolid;

    /// Elements of `category`, in a stable order.
    fn elements_in_category(
        &self,
        category: Category,
    ) -> Box<dyn Iterator<Item = &Element<Self::Solid>> + '_>;
}

/// In-memory document, elements kept in insertion order.
#[derive(Debug, Clone)]
pub struct Model<S> {
    elements: Vec<Element<S>>,
}

impl<S> Default for Model<S> {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
        }
    }
}

impl<S> Model<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, element: Element<S>) {
        self.elements.push(element);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl<S: BoundarySolid> ModelDocument for Model<S> {
    type Solid = S;

    fn elements_in_category(
        &self,
        category: Category,
    ) -> Box<dyn Iterator<Item = &Element<S>> + '_> {
        Box::new(self.elements.iter().filter(move |e| e.category == category))
    }
}

/// Visibility of a link instance in the active view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkVisibility {
    /// The link instance itself is hidden in the view.
    pub instance_hidden: bool,
    /// The link category is hidden in the view.
    pub category_hidden: bool,
}

impl LinkVisibility {
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.instance_hidden && !self.category_hidden
    }
}

/// A linked document placed in the host through a rigid transform.
#[derive(Debug)]
pub struct LinkInstance<'d, D> {
    pub document: &'d D,
    /// Maps link coordinates to host coordinates.
    pub transform: Matrix4,
    pub visibility: LinkVisibility,
}

impl<'d, D> LinkInstance<'d, D> {
    #[must_use]
    pub fn new(document: &'d D, transform: Matrix4) -> Self {
        Self {
            document,
            transform,
            visibility: LinkVisibility::default(),
        }
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: LinkVisibility) -> Self {
        self.visibility = visibility;
        self
    }
}
