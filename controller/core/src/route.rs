use crate::AnnotationMap;

/// A minimal snapshot of one HTTPRoute, taken once per scan cycle and never
/// mutated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Route {
    pub namespace: String,
    pub name: String,
    pub annotations: AnnotationMap,

    /// Hostnames in spec order; the first one is canonical and determines
    /// the published URL.
    pub hostnames: Vec<String>,

    /// Names of the route's parent Gateway references.
    pub parent_gateways: Vec<String>,
}

impl Route {
    /// Returns the route's annotation value, treating empty values as unset.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}
