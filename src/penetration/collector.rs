//! Enumerates structural candidates from the host and its visible links.

use tracing::{debug, instrument};

use crate::error::PenetrationError;
use crate::geometry::Aabb;
use crate::math::Matrix4;

use super::diagnostics::DiagnosticSink;
use super::model::{Category, Element, ElementId, ElementRef, LinkInstance, ModelDocument};
use super::resolver::GeometryTree;
use super::spatial_index::{Footprint, Located};

/// A structural element that conduits are tested against.
#[derive(Debug, Clone)]
pub struct StructuralCandidate<'a, S> {
    pub element: ElementRef,
    pub category: Category,
    /// Bounds in host coordinates.
    pub bounding_box: Aabb,
    /// Link-to-host transform; `None` for host elements.
    pub transform: Option<Matrix4>,
    pub geometry: &'a GeometryTree<S>,
}

impl<S> Located for StructuralCandidate<'_, S> {
    fn footprint(&self) -> Footprint {
        Footprint::Box(self.bounding_box)
    }
}

/// Collects candidates of the filtered categories from a host document and
/// its link instances.
///
/// Order is host elements first, then each link in list order; within a
/// document, categories in filter order, elements in document order. A
/// category listed twice is collected once.
pub struct CandidateCollector<'a, D> {
    host: &'a D,
    links: &'a [LinkInstance<'a, D>],
    categories: Vec<Category>,
}

impl<'a, D: ModelDocument> CandidateCollector<'a, D> {
    /// Collector over walls, structural framing and floors.
    #[must_use]
    pub fn new(host: &'a D, links: &'a [LinkInstance<'a, D>]) -> Self {
        Self {
            host,
            links,
            categories: Category::distinct(Category::STRUCTURAL),
        }
    }

    #[must_use]
    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = Category::distinct(categories);
        self
    }

    /// Runs the collection.
    ///
    /// Links hidden in the active view contribute nothing. Elements without
    /// bounds are reported as `MissingGeometry` and left out.
    #[instrument(skip_all, fields(links = self.links.len()))]
    pub fn collect(&self, sink: &dyn DiagnosticSink) -> Vec<StructuralCandidate<'a, D::Solid>> {
        let mut out = Vec::new();
        self.collect_document(self.host, None, &mut out, sink, ElementRef::host);

        for (index, link) in self.links.iter().enumerate() {
            if !link.visibility.is_visible() {
                debug!(link = index, "skipping link hidden in the active view");
                continue;
            }
            self.collect_document(
                link.document,
                Some(link.transform),
                &mut out,
                sink,
                |id| ElementRef::linked(index, id),
            );
        }

        debug!(candidates = out.len(), "collected structural candidates");
        out
    }

    fn collect_document(
        &self,
        document: &'a D,
        transform: Option<Matrix4>,
        out: &mut Vec<StructuralCandidate<'a, D::Solid>>,
        sink: &dyn DiagnosticSink,
        reference: impl Fn(ElementId) -> ElementRef,
    ) {
        for &category in &self.categories {
            for element in document.elements_in_category(category) {
                let element_ref = reference(element.id);
                match host_bounds(element, transform.as_ref()) {
                    Some(bounding_box) => out.push(StructuralCandidate {
                        element: element_ref,
                        category,
                        bounding_box,
                        transform,
                        geometry: &element.geometry,
                    }),
                    None => sink.record(&PenetrationError::MissingGeometry {
                        element: element_ref,
                    }),
                }
            }
        }
    }
}

fn host_bounds<S>(element: &Element<S>, transform: Option<&Matrix4>) -> Option<Aabb> {
    let bounds = element.bounding_box?;
    Some(match transform {
        Some(m) => bounds.transformed(m),
        None => bounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vector3};
    use crate::penetration::brep::BrepSolid;
    use crate::penetration::diagnostics::{CollectingSink, NullSink};
    use crate::penetration::model::{LinkVisibility, Model, ModelSource};

    fn element(id: u64, category: Category, min: Point3, max: Point3) -> Element<BrepSolid> {
        Element {
            id: ElementId(id),
            category,
            bounding_box: Some(Aabb::new(min, max)),
            geometry: GeometryTree::new(),
        }
    }

    fn small_model(base: u64) -> Model<BrepSolid> {
        let mut model = Model::new();
        let o = Point3::origin();
        let one = Point3::new(1.0, 1.0, 1.0);
        model.add(element(base, Category::Wall, o, one));
        model.add(element(base + 1, Category::Floor, o, one));
        model.add(element(base + 2, Category::Roof, o, one));
        model.add(element(base + 3, Category::StructuralFraming, o, one));
        model
    }

    #[test]
    fn host_elements_get_no_transform() {
        let host = small_model(10);
        let links: Vec<LinkInstance<'_, Model<BrepSolid>>> = vec![];

        let found = CandidateCollector::new(&host, &links).collect(&NullSink);
        let ids: Vec<_> = found.iter().map(|c| c.element.element.0).collect();
        // Category filter order: walls, framing, floors. Roofs excluded.
        assert_eq!(ids, vec![10, 13, 11]);
        assert!(found.iter().all(|c| c.transform.is_none()));
        assert!(found.iter().all(|c| c.element.source == ModelSource::Host));
    }

    #[test]
    fn linked_elements_carry_link_transform_and_host_bounds() {
        let host = Model::new();
        let linked = small_model(100);
        let shift = Matrix4::new_translation(&Vector3::new(20.0, 0.0, 0.0));
        let links = vec![LinkInstance::new(&linked, shift)];

        let found = CandidateCollector::new(&host, &links).collect(&NullSink);
        assert_eq!(found.len(), 3);
        for c in &found {
            assert_eq!(c.element.source, ModelSource::Link(0));
            assert_eq!(c.transform, Some(shift));
            assert!((c.bounding_box.min.x - 20.0).abs() < 1e-12);
        }
    }

    #[test]
    fn hidden_links_contribute_nothing() {
        let host = small_model(1);
        let a = small_model(100);
        let b = small_model(200);
        let c = small_model(300);
        let links = vec![
            LinkInstance::new(&a, Matrix4::identity()).with_visibility(LinkVisibility {
                instance_hidden: true,
                category_hidden: false,
            }),
            LinkInstance::new(&b, Matrix4::identity()),
            LinkInstance::new(&c, Matrix4::identity()).with_visibility(LinkVisibility {
                instance_hidden: false,
                category_hidden: true,
            }),
        ];

        let found = CandidateCollector::new(&host, &links).collect(&NullSink);
        assert_eq!(found.len(), 6);
        assert!(found
            .iter()
            .all(|c| matches!(c.element.source, ModelSource::Host | ModelSource::Link(1))));
    }

    #[test]
    fn unbounded_element_is_reported_and_skipped() {
        let mut host = Model::new();
        host.add(Element {
            id: ElementId(5),
            category: Category::Wall,
            bounding_box: None,
            geometry: GeometryTree::<BrepSolid>::new(),
        });
        let links = vec![];
        let sink = CollectingSink::new();

        let found = CandidateCollector::new(&host, &links).collect(&sink);
        assert!(found.is_empty());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn repeated_category_collects_each_element_once() {
        let host = small_model(1);
        let links = vec![];
        let found = CandidateCollector::new(&host, &links)
            .with_categories(vec![Category::Wall, Category::Floor, Category::Wall])
            .collect(&NullSink);
        let ids: Vec<_> = found.iter().map(|c| c.element.element.0).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn custom_category_filter() {
        let host = small_model(1);
        let links = vec![];
        let found = CandidateCollector::new(&host, &links)
            .with_categories(vec![Category::Roof])
            .collect(&NullSink);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category, Category::Roof);
    }
}
