//! Manifest parsing and typed resource lookup.

pub mod index;
pub mod object;
pub mod parser;

pub use index::{Lookup, ResourceIndex, ResourceKey};
pub use object::{
    ConfigMap, Container, Deployment, DeploymentSpec, ObjectMeta, PodSpec, Resource, ResourceKind,
    Secret, Service, ServicePort, ServiceSpec, TypedResource, UnknownObject,
};
pub use parser::parse_yaml;
