//! Assertions comparing manifest resources with the operator inputs.
//!
//! Each assertion stops at the first mismatch and returns it as a
//! [`VerifyError`] naming the offending field; on success it returns `Ok(())`.

pub mod config_map;
pub mod deployment;
pub mod secret;
pub mod service;

pub use config_map::assert_config_map;
pub use deployment::assert_deployment;
pub use secret::assert_secret;
pub use service::{
    ExpectedPort, assert_external_service, assert_internal_service, assert_node_port_matches,
    assert_port_matches, assert_service_exists_then_ports, expected_external_ports,
};

use std::collections::BTreeMap;

use crate::error::VerifyError;
use crate::manifest::{Lookup, ObjectMeta, TypedResource};

pub const API_V1: &str = "v1";

pub const CONFIG_MAP_NAME: &str = "operator-config-map";
pub const SECRETS_NAME: &str = "operator-secrets";
pub const DEPLOYMENT_NAME: &str = "weblogic-operator";
pub const INTERNAL_SERVICE_NAME: &str = "internal-weblogic-operator-service";
pub const EXTERNAL_SERVICE_NAME: &str = "external-weblogic-operator-service";

/// Label carried by the operator pod and selected by both operator services.
pub const APP_LABEL: (&str, &str) = ("app", "weblogic-operator");

/// Check that the metadata block carries the expected name and namespace.
pub fn assert_metadata_matches(
    metadata: &ObjectMeta,
    name: &str,
    namespace: &str,
) -> Result<(), VerifyError> {
    expect_eq("metadata.name", name, Some(&metadata.name))?;
    expect_eq("metadata.namespace", namespace, metadata.namespace.as_deref())
}

pub(crate) fn expect_present<'a, T: TypedResource>(
    lookup: Lookup<'a, T>,
    name: &str,
) -> Result<&'a T, VerifyError> {
    match lookup {
        Lookup::Present(resource) => Ok(resource),
        Lookup::Absent => Err(VerifyError::Missing {
            kind: T::KIND,
            name: name.to_string(),
        }),
        Lookup::KindMismatch { declared } => Err(VerifyError::WrongKind {
            name: name.to_string(),
            expected: T::KIND,
            declared: declared.clone(),
        }),
    }
}

/// A name declared only under another kind still counts as absent.
pub(crate) fn expect_absent<T: TypedResource>(
    lookup: Lookup<'_, T>,
    name: &str,
) -> Result<(), VerifyError> {
    match lookup {
        Lookup::Present(_) => Err(VerifyError::UnexpectedResource {
            kind: T::KIND,
            name: name.to_string(),
        }),
        Lookup::Absent | Lookup::KindMismatch { .. } => Ok(()),
    }
}

/// Check the `apiVersion` and `kind` written in the document.
pub(crate) fn expect_type_meta(
    api_version: &str,
    kind: &str,
    expected_api_version: &str,
    expected_kind: &str,
) -> Result<(), VerifyError> {
    expect_eq("kind", expected_kind, Some(kind))?;
    expect_eq("apiVersion", expected_api_version, Some(api_version))
}

pub(crate) fn expect_eq(
    field: &str,
    expected: &str,
    actual: Option<&str>,
) -> Result<(), VerifyError> {
    match actual {
        None => Err(missing_field(field)),
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(VerifyError::Mismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }),
    }
}

/// The map's keys must be exactly `expected`, in any order.
pub(crate) fn expect_keys<V>(
    field: &str,
    map: &BTreeMap<String, V>,
    expected: &[&str],
) -> Result<(), VerifyError> {
    let mut want: Vec<String> = expected.iter().map(|k| k.to_string()).collect();
    want.sort();
    want.dedup();
    let have: Vec<String> = map.keys().cloned().collect();

    if have == want {
        Ok(())
    } else {
        Err(VerifyError::KeySet {
            field: field.to_string(),
            expected: want,
            actual: have,
        })
    }
}

/// A present key whose value is not null. Used for generated values that
/// cannot be predicted from the inputs.
pub(crate) fn expect_non_null<V>(
    field: &str,
    map: &BTreeMap<String, Option<V>>,
    key: &str,
) -> Result<(), VerifyError> {
    match map.get(key) {
        Some(Some(_)) => Ok(()),
        _ => Err(missing_field(&format!("{}.{}", field, key))),
    }
}

pub(crate) fn expect_string_map(
    field: &str,
    actual: Option<&BTreeMap<String, String>>,
    expected: &[(&str, &str)],
) -> Result<(), VerifyError> {
    let actual = actual.ok_or_else(|| missing_field(field))?;
    let want: BTreeMap<String, String> = expected
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    if *actual == want {
        Ok(())
    } else {
        Err(VerifyError::Mismatch {
            field: field.to_string(),
            expected: format!("{:?}", want),
            actual: format!("{:?}", actual),
        })
    }
}

pub(crate) fn missing_field(field: &str) -> VerifyError {
    VerifyError::MissingField {
        field: field.to_string(),
    }
}
