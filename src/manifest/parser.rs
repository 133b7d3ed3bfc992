//! YAML parsing for Kubernetes manifests.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;

use crate::error::ParseError;
use crate::manifest::object::*;

/// Parse a YAML stream containing one or more Kubernetes objects.
///
/// Returns each resource paired with the 1-indexed number of the document it
/// came from. Empty and comment-only documents are skipped.
pub fn parse_yaml(content: &str) -> Result<Vec<(usize, Resource)>, ParseError> {
    let mut resources = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
        let number = index + 1;
        let value = Value::deserialize(document).map_err(|source| ParseError::SyntaxError {
            document: number,
            source,
        })?;

        if value.is_null() {
            log::debug!("Skipping empty document {}", number);
            continue;
        }

        let resource = parse_resource(&value).map_err(|message| ParseError::InvalidObject {
            document: number,
            message,
        })?;
        log::debug!(
            "Parsed {} `{}` from document {}",
            resource.kind(),
            resource.name(),
            number
        );
        resources.push((number, resource));
    }

    Ok(resources)
}

/// Parse a single K8s object from a YAML value.
fn parse_resource(value: &Value) -> Result<Resource, String> {
    if !value.is_mapping() {
        return Err("document is not a mapping".to_string());
    }

    let api_version = get_string(value, "apiVersion").ok_or_else(|| missing("apiVersion"))?;
    let kind = get_string(value, "kind").ok_or_else(|| missing("kind"))?;
    let metadata = parse_metadata(value)?;

    let resource = match ResourceKind::from_kind_str(&kind) {
        ResourceKind::ConfigMap => Resource::ConfigMap(Box::new(ConfigMap {
            api_version,
            kind,
            metadata,
            data: parse_config_map_data(value.get("data"))?,
        })),
        ResourceKind::Secret => Resource::Secret(Box::new(Secret {
            api_version,
            kind,
            metadata,
            type_: get_string(value, "type"),
            data: parse_secret_data(value.get("data"))?,
        })),
        ResourceKind::Deployment => Resource::Deployment(Box::new(Deployment {
            api_version,
            kind,
            metadata,
            spec: value.get("spec").map(parse_deployment_spec).transpose()?,
        })),
        ResourceKind::Service => Resource::Service(Box::new(Service {
            api_version,
            kind,
            metadata,
            spec: value.get("spec").map(parse_service_spec).transpose()?,
        })),
        ResourceKind::Other(_) => Resource::Other(Box::new(UnknownObject {
            api_version,
            kind,
            metadata,
        })),
    };

    Ok(resource)
}

// ============================================================================
// Parse helper functions
// ============================================================================

fn missing(field: &str) -> String {
    format!("missing `{}`", field)
}

fn get_string(value: &Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(|s| s.to_string())
}

/// Integer fields are int32 in the Kubernetes API; anything else is rejected
/// rather than silently dropped.
fn get_i32(value: &Value, key: &str) -> Result<Option<i32>, String> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| format!("`{}` must be a 32-bit integer, found {:?}", key, v)),
    }
}

/// Label and selector maps. Numbers and booleans keep their YAML spelling;
/// any other value is an error so no entry is lost.
fn get_string_map(value: &Value, key: &str) -> Result<Option<BTreeMap<String, String>>, String> {
    let mapping = match value.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Mapping(mapping)) => mapping,
        Some(other) => return Err(format!("`{}` must be a mapping, found {:?}", key, other)),
    };

    let mut map = BTreeMap::new();
    for (k, v) in mapping {
        let name = scalar_to_string(k)
            .ok_or_else(|| format!("`{}` key {:?} is not a scalar", key, k))?;
        let val = scalar_to_string(v)
            .ok_or_else(|| format!("`{}.{}` must be a scalar, found {:?}", key, name, v))?;
        map.insert(name, val);
    }
    Ok(Some(map))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_metadata(value: &Value) -> Result<ObjectMeta, String> {
    let metadata = value.get("metadata").ok_or_else(|| missing("metadata"))?;
    let name = get_string(metadata, "name").ok_or_else(|| missing("metadata.name"))?;

    Ok(ObjectMeta {
        name,
        namespace: get_string(metadata, "namespace"),
        labels: get_string_map(metadata, "labels")?,
    })
}

/// Walk a `data` mapping, keeping null values as `None` so that a key written
/// without a value is distinguishable from a missing key.
fn parse_data<T>(
    data: Option<&Value>,
    mut convert: impl FnMut(&str, &str) -> Result<T, String>,
) -> Result<Option<BTreeMap<String, Option<T>>>, String> {
    let Some(data) = data else {
        return Ok(None);
    };
    if data.is_null() {
        return Ok(None);
    }
    let mapping = data
        .as_mapping()
        .ok_or_else(|| "`data` must be a mapping".to_string())?;

    let mut map = BTreeMap::new();
    for (k, v) in mapping {
        let key = k
            .as_str()
            .ok_or_else(|| format!("`data` key {:?} is not a string", k))?;
        let entry = match v {
            Value::Null => None,
            Value::String(s) => Some(convert(key, s.as_str())?),
            other => return Err(format!("`data.{}` must be a string, found {:?}", key, other)),
        };
        map.insert(key.to_string(), entry);
    }
    Ok(Some(map))
}

fn parse_config_map_data(
    data: Option<&Value>,
) -> Result<Option<BTreeMap<String, Option<String>>>, String> {
    parse_data(data, |_, s| Ok(s.to_string()))
}

fn parse_secret_data(
    data: Option<&Value>,
) -> Result<Option<BTreeMap<String, Option<Vec<u8>>>>, String> {
    parse_data(data, |key, encoded| {
        // Long values are often folded across lines.
        let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        STANDARD
            .decode(compact)
            .map_err(|e| format!("`data.{}` is not valid base64: {}", key, e))
    })
}

fn parse_deployment_spec(spec: &Value) -> Result<DeploymentSpec, String> {
    let template = spec.get("template");
    let template_labels = match template.and_then(|t| t.get("metadata")) {
        Some(metadata) => get_string_map(metadata, "labels")?,
        None => None,
    };

    Ok(DeploymentSpec {
        replicas: get_i32(spec, "replicas")?,
        template_labels,
        pod_spec: template
            .and_then(|t| t.get("spec"))
            .map(parse_pod_spec)
            .transpose()?,
    })
}

fn parse_pod_spec(spec: &Value) -> Result<PodSpec, String> {
    let containers = match spec.get("containers").and_then(|c| c.as_sequence()) {
        Some(arr) => arr.iter().map(parse_container).collect(),
        None => Vec::new(),
    };

    Ok(PodSpec {
        service_account_name: get_string(spec, "serviceAccountName")
            .or_else(|| get_string(spec, "serviceAccount")),
        containers,
    })
}

fn parse_container(c: &Value) -> Container {
    Container {
        name: get_string(c, "name"),
        image: get_string(c, "image"),
        image_pull_policy: get_string(c, "imagePullPolicy"),
    }
}

fn parse_service_spec(spec: &Value) -> Result<ServiceSpec, String> {
    let ports = match spec.get("ports") {
        None | Some(Value::Null) => None,
        Some(ports) => {
            let arr = ports
                .as_sequence()
                .ok_or_else(|| "`spec.ports` must be a list".to_string())?;
            Some(arr.iter().map(parse_service_port).collect::<Result<_, _>>()?)
        }
    };

    Ok(ServiceSpec {
        type_: get_string(spec, "type"),
        selector: get_string_map(spec, "selector")?,
        ports,
    })
}

fn parse_service_port(p: &Value) -> Result<ServicePort, String> {
    Ok(ServicePort {
        name: get_string(p, "name"),
        port: get_i32(p, "port")?,
        node_port: get_i32(p, "nodePort")?,
    })
}
