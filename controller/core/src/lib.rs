//! Homer Dashboard Controller
//!
//! Core logic for deriving a Homer dashboard configuration from cluster
//! routing state. Each scan cycle flows one direction:
//!
//! ```text
//! [ HTTPRoute ] -> [ FilterSpec ] -> [ extract ] -> [ render ]
//! ```
//!
//! - A `Namespace` may be annotated with a group name and group icon that
//!   apply to all routes in the namespace (unless a route overrides them).
//! - Each `HTTPRoute` carries annotations controlling its visibility and
//!   display metadata; its first hostname determines the published URL.
//!
//! Everything in this crate is pure: the Kubernetes snapshots come in as
//! plain data and a rendered manifest string comes out. Talking to the
//! cluster lives in `homer-controller-k8s`.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod annotations;
pub mod filter;
pub mod item;
pub mod render;
mod route;


pub use self::{
    filter::FilterSpec,
    item::{extract, DashboardItem, GroupIconCache},
    render::{render, DashboardSettings, RenderError},
    route::Route,
};

use std::collections::BTreeMap;

/// Annotations of a single object, keyed by full annotation name.
pub type AnnotationMap = BTreeMap<String, String>;

/// All cluster namespaces with their annotations, keyed by namespace name.
///
/// The `BTreeMap` fixes the namespace enumeration order lexically, which
/// makes group-icon resolution for overridden groups reproducible.
pub type NamespaceMap = BTreeMap<String, AnnotationMap>;
