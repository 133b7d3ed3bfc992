//! Typed Kubernetes resources extracted from manifest documents.

use std::collections::BTreeMap;
use std::fmt;

/// The kinds of resource the verifier understands.
///
/// Anything else is kept as [`ResourceKind::Other`] with the kind string
/// exactly as written in the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    ConfigMap,
    Secret,
    Deployment,
    Service,
    Other(String),
}

impl ResourceKind {
    /// Map a document's `kind` field onto a resource kind.
    pub fn from_kind_str(kind: &str) -> Self {
        match kind {
            "ConfigMap" => Self::ConfigMap,
            "Secret" => Self::Secret,
            "Deployment" => Self::Deployment,
            "Service" => Self::Service,
            other => Self::Other(other.to_string()),
        }
    }

    /// Get the string representation matching Kubernetes kind names.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ConfigMap => "ConfigMap",
            Self::Secret => "Secret",
            Self::Deployment => "Deployment",
            Self::Service => "Service",
            Self::Other(kind) => kind,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `metadata` block shared by every resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: Option<String>,
    pub labels: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigMap {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    /// A key written without a value maps to `None`.
    pub data: Option<BTreeMap<String, Option<String>>>,
}

/// A Secret whose `data` values have already been base64 decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub type_: Option<String>,
    pub data: Option<BTreeMap<String, Option<Vec<u8>>>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: Option<DeploymentSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentSpec {
    pub replicas: Option<i32>,
    /// `spec.template.metadata.labels`
    pub template_labels: Option<BTreeMap<String, String>>,
    /// `spec.template.spec`
    pub pod_spec: Option<PodSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodSpec {
    pub service_account_name: Option<String>,
    pub containers: Vec<Container>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    pub name: Option<String>,
    pub image: Option<String>,
    pub image_pull_policy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: Option<ServiceSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceSpec {
    pub type_: Option<String>,
    pub selector: Option<BTreeMap<String, String>>,
    /// `None` when the document has no `ports` key, as opposed to an empty list.
    pub ports: Option<Vec<ServicePort>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServicePort {
    pub name: Option<String>,
    pub port: Option<i32>,
    pub node_port: Option<i32>,
}

/// Any kind not modelled above. Only its identity is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownObject {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
}

/// A single resource from the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    ConfigMap(Box<ConfigMap>),
    Secret(Box<Secret>),
    Deployment(Box<Deployment>),
    Service(Box<Service>),
    Other(Box<UnknownObject>),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::ConfigMap(_) => ResourceKind::ConfigMap,
            Self::Secret(_) => ResourceKind::Secret,
            Self::Deployment(_) => ResourceKind::Deployment,
            Self::Service(_) => ResourceKind::Service,
            Self::Other(o) => ResourceKind::from_kind_str(&o.kind),
        }
    }

    pub fn api_version(&self) -> &str {
        match self {
            Self::ConfigMap(r) => &r.api_version,
            Self::Secret(r) => &r.api_version,
            Self::Deployment(r) => &r.api_version,
            Self::Service(r) => &r.api_version,
            Self::Other(r) => &r.api_version,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            Self::ConfigMap(r) => &r.metadata,
            Self::Secret(r) => &r.metadata,
            Self::Deployment(r) => &r.metadata,
            Self::Service(r) => &r.metadata,
            Self::Other(r) => &r.metadata,
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata().name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata().namespace.as_deref()
    }
}

/// A resource type that can be pulled out of a [`Resource`] by tag.
pub trait TypedResource: Sized {
    const KIND: ResourceKind;

    /// Returns `None` when `resource` is a different variant.
    fn from_resource(resource: &Resource) -> Option<&Self>;
}

macro_rules! typed_resource {
    ($ty:ident) => {
        impl TypedResource for $ty {
            const KIND: ResourceKind = ResourceKind::$ty;

            fn from_resource(resource: &Resource) -> Option<&Self> {
                match resource {
                    Resource::$ty(r) => Some(r.as_ref()),
                    _ => None,
                }
            }
        }
    };
}

typed_resource!(ConfigMap);
typed_resource!(Secret);
typed_resource!(Deployment);
typed_resource!(Service);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in ["ConfigMap", "Secret", "Deployment", "Service", "ServiceAccount"] {
            assert_eq!(ResourceKind::from_kind_str(kind).as_str(), kind);
        }
        assert_eq!(
            ResourceKind::from_kind_str("ClusterRole"),
            ResourceKind::Other("ClusterRole".to_string())
        );
    }

    #[test]
    fn test_typed_access_checks_tag() {
        let resource = Resource::ConfigMap(Box::new(ConfigMap {
            api_version: "v1".to_string(),
            kind: "ConfigMap".to_string(),
            metadata: ObjectMeta {
                name: "cm".to_string(),
                ..Default::default()
            },
            data: None,
        }));

        assert!(ConfigMap::from_resource(&resource).is_some());
        assert!(Service::from_resource(&resource).is_none());
        assert_eq!(resource.kind(), ResourceKind::ConfigMap);
        assert_eq!(resource.name(), "cm");
        assert_eq!(resource.namespace(), None);
    }
}
