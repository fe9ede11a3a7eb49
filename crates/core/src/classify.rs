//! Marker-based classification of discovered types.

use restbind_api::{Annotation, MetaAnnotations, TypeMetadata, TypeName};
use std::collections::HashSet;

use crate::config::Markers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    pub resource: bool,
    pub provider: bool,
}

impl Classification {
    pub fn is_candidate(&self) -> bool {
        self.resource || self.provider
    }
}

pub struct Classifier<'a> {
    markers: &'a Markers,
}

impl<'a> Classifier<'a> {
    pub fn new(markers: &'a Markers) -> Self {
        Self { markers }
    }

    /// Root resource classes carry the path marker on the type itself.
    /// Inherited and method-level markers do not count.
    pub fn is_resource_candidate(&self, ty: &TypeMetadata) -> bool {
        ty.has_annotation(self.markers.path.as_str())
    }

    pub fn is_provider_candidate(&self, ty: &TypeMetadata) -> bool {
        ty.has_annotation(self.markers.provider.as_str())
    }

    pub fn classify(&self, ty: &TypeMetadata) -> Classification {
        Classification {
            resource: self.is_resource_candidate(ty),
            provider: self.is_provider_candidate(ty),
        }
    }

    /// Whether a concrete type has any request-handling method: one carrying
    /// the path or HTTP method marker, or an annotation meta-annotated
    /// (at any depth) with the HTTP method marker.
    ///
    /// Not consulted when collecting resource candidates, which only
    /// considers type-level markers.
    pub fn is_general_resource_class(&self, ty: &TypeMetadata, meta: &dyn MetaAnnotations) -> bool {
        if !ty.is_concrete() {
            return false;
        }
        ty.methods.iter().any(|method| {
            method
                .annotations
                .iter()
                .any(|annotation| self.is_request_handling(annotation, meta))
        })
    }

    fn is_request_handling(&self, annotation: &Annotation, meta: &dyn MetaAnnotations) -> bool {
        let name = &annotation.type_name;
        if *name == self.markers.path || *name == self.markers.http_method {
            return true;
        }
        let mut visited = HashSet::new();
        self.is_meta_annotated(name, meta, &mut visited)
    }

    fn is_meta_annotated(
        &self,
        annotation_type: &TypeName,
        meta: &dyn MetaAnnotations,
        visited: &mut HashSet<TypeName>,
    ) -> bool {
        if !visited.insert(annotation_type.clone()) {
            return false;
        }
        meta.annotations_of(annotation_type).iter().any(|m| {
            m.type_name == self.markers.http_method
                || self.is_meta_annotated(&m.type_name, meta, visited)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restbind_api::{MethodMetadata, TypeKind};
    use std::collections::HashMap;

    #[derive(Default)]
    struct MetaTable(HashMap<TypeName, Vec<Annotation>>);

    impl MetaTable {
        fn declare(mut self, annotation_type: &str, meta: &[&str]) -> Self {
            self.0.insert(
                TypeName::new(annotation_type),
                meta.iter().map(|m| Annotation::new(*m)).collect(),
            );
            self
        }
    }

    impl MetaAnnotations for MetaTable {
        fn annotations_of(&self, annotation_type: &TypeName) -> Vec<Annotation> {
            self.0.get(annotation_type).cloned().unwrap_or_default()
        }
    }

    fn jaxrs_meta() -> MetaTable {
        MetaTable::default()
            .declare("javax.ws.rs.GET", &["javax.ws.rs.HttpMethod"])
            .declare("com.acme.Fetch", &["javax.ws.rs.GET"])
            .declare("com.acme.Loop", &["com.acme.Loop"])
    }

    #[test]
    fn test_resource_candidate_requires_type_level_marker() {
        let markers = Markers::default();
        let classifier = Classifier::new(&markers);

        let root = TypeMetadata::class("a.Root").annotated(Annotation::new("javax.ws.rs.Path"));
        let method_only = TypeMetadata::class("a.MethodOnly").with_method(
            MethodMetadata::new("list").annotated(Annotation::new("javax.ws.rs.Path")),
        );

        assert!(classifier.is_resource_candidate(&root));
        assert!(!classifier.is_resource_candidate(&method_only));
        assert!(!classifier.is_provider_candidate(&root));
    }

    #[test]
    fn test_classify_both_roles() {
        let markers = Markers::default();
        let classifier = Classifier::new(&markers);
        let ty = TypeMetadata::class("a.Both")
            .annotated(Annotation::new("javax.ws.rs.Path"))
            .annotated(Annotation::new("javax.ws.rs.ext.Provider"));

        let classification = classifier.classify(&ty);
        assert!(classification.resource && classification.provider);
        assert!(!classifier.classify(&TypeMetadata::class("a.Plain")).is_candidate());
    }

    #[test]
    fn test_general_resource_class_direct_markers() {
        let markers = Markers::default();
        let classifier = Classifier::new(&markers);
        let meta = jaxrs_meta();

        let ty = TypeMetadata::class("a.Sub").with_method(
            MethodMetadata::new("child").annotated(Annotation::new("javax.ws.rs.Path")),
        );
        assert!(classifier.is_general_resource_class(&ty, &meta));
    }

    #[test]
    fn test_general_resource_class_meta_annotated() {
        let markers = Markers::default();
        let classifier = Classifier::new(&markers);
        let meta = jaxrs_meta();

        let get = TypeMetadata::class("a.Get")
            .with_method(MethodMetadata::new("get").annotated(Annotation::new("javax.ws.rs.GET")));
        let nested = TypeMetadata::class("a.Nested")
            .with_method(MethodMetadata::new("get").annotated(Annotation::new("com.acme.Fetch")));
        let cyclic = TypeMetadata::class("a.Cyclic")
            .with_method(MethodMetadata::new("get").annotated(Annotation::new("com.acme.Loop")));

        assert!(classifier.is_general_resource_class(&get, &meta));
        assert!(classifier.is_general_resource_class(&nested, &meta));
        assert!(!classifier.is_general_resource_class(&cyclic, &meta));
    }

    #[test]
    fn test_general_resource_class_rejects_non_concrete() {
        let markers = Markers::default();
        let classifier = Classifier::new(&markers);
        let meta = jaxrs_meta();
        let method = MethodMetadata::new("get").annotated(Annotation::new("javax.ws.rs.GET"));

        let mut interface = TypeMetadata::class("a.Api").with_method(method.clone());
        interface.kind = TypeKind::Interface;
        let mut abstract_class = TypeMetadata::class("a.Base").with_method(method);
        abstract_class.is_abstract = true;

        assert!(!classifier.is_general_resource_class(&interface, &meta));
        assert!(!classifier.is_general_resource_class(&abstract_class, &meta));
    }
}
