//! Kubernetes access for the dashboard controller.
//!
//! Listing namespaces and HTTPRoutes produces plain-data snapshots for the
//! core crate; the [`Publisher`] owns the single ConfigMap write target.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod publisher;
mod scan;

pub use self::{
    publisher::{Outcome, Publisher},
    scan::{fetch_namespaces, fetch_routes},
};
pub use kube::Client;
