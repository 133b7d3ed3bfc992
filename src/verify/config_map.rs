//! Verification of the operator ConfigMap.

use crate::error::VerifyError;
use crate::inputs::OperatorInputs;
use crate::manifest::{ConfigMap, Lookup};
use crate::verify::{
    API_V1, CONFIG_MAP_NAME, assert_metadata_matches, expect_eq, expect_keys, expect_non_null,
    expect_present, expect_type_meta, missing_field,
};

pub const SERVICE_ACCOUNT: &str = "serviceaccount";
pub const TARGET_NAMESPACES: &str = "targetNamespaces";
pub const EXTERNAL_OPERATOR_CERT: &str = "externalOperatorCert";
pub const INTERNAL_OPERATOR_CERT: &str = "internalOperatorCert";

/// Verify `operator-config-map`.
///
/// Expected shape:
///
/// ```yaml
/// apiVersion: v1
/// kind: ConfigMap
/// metadata:
///   name: operator-config-map
///   namespace: <inputs.namespace>
/// data:
///   serviceaccount: <inputs.service_account>
///   targetNamespaces: <inputs.target_namespaces>
///   externalOperatorCert: <expected_external_cert>
///   internalOperatorCert: <generated>
/// ```
///
/// The internal certificate is generated when the manifest is built, so only
/// its presence is checked.
pub fn assert_config_map<'a>(
    config_map: impl Into<Lookup<'a, ConfigMap>>,
    inputs: &OperatorInputs,
    expected_external_cert: &str,
) -> Result<(), VerifyError> {
    log::debug!("Verifying ConfigMap `{}`", CONFIG_MAP_NAME);

    let config_map = expect_present(config_map.into(), CONFIG_MAP_NAME)?;
    expect_type_meta(&config_map.api_version, &config_map.kind, API_V1, "ConfigMap")?;
    assert_metadata_matches(&config_map.metadata, CONFIG_MAP_NAME, &inputs.namespace)?;

    let data = config_map.data.as_ref().ok_or_else(|| missing_field("data"))?;
    expect_keys(
        "data",
        data,
        &[
            SERVICE_ACCOUNT,
            TARGET_NAMESPACES,
            EXTERNAL_OPERATOR_CERT,
            INTERNAL_OPERATOR_CERT,
        ],
    )?;

    let value = |key: &str| data.get(key).and_then(|v| v.as_deref());
    expect_eq(
        "data.serviceaccount",
        &inputs.service_account,
        value(SERVICE_ACCOUNT),
    )?;
    expect_eq(
        "data.targetNamespaces",
        &inputs.target_namespaces,
        value(TARGET_NAMESPACES),
    )?;
    expect_eq(
        "data.externalOperatorCert",
        expected_external_cert,
        value(EXTERNAL_OPERATOR_CERT),
    )?;
    expect_non_null("data", data, INTERNAL_OPERATOR_CERT)
}
