//! Verification of the operator's internal and external Services.

use crate::error::VerifyError;
use crate::inputs::OperatorInputs;
use crate::manifest::{Lookup, Service, ServicePort};
use crate::verify::{
    API_V1, APP_LABEL, EXTERNAL_SERVICE_NAME, INTERNAL_SERVICE_NAME, assert_metadata_matches,
    expect_absent, expect_eq, expect_present, expect_string_map, expect_type_meta, missing_field,
};

/// Port the operator's REST server listens on for external HTTPS traffic.
pub const EXTERNAL_REST_PORT: &str = "8081";
/// Port the operator's REST server listens on for in-cluster HTTPS traffic.
pub const INTERNAL_REST_PORT: &str = "8082";

/// One entry of a Service's `ports` list as the inputs predict it.
///
/// Port numbers are strings because inputs may carry values that are not
/// numbers at all; actual ports are rendered as strings to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedPort<'a> {
    pub name: &'a str,
    pub port: &'a str,
    pub node_port: &'a str,
}

/// The ports the external service should expose, in order: `rest-https`
/// first when external REST is enabled, then `debug` when debugging is.
pub fn expected_external_ports(
    inputs: &OperatorInputs,
    debug_enabled: bool,
    external_rest_enabled: bool,
) -> Vec<ExpectedPort<'_>> {
    let mut ports = Vec::with_capacity(2);
    if external_rest_enabled {
        ports.push(ExpectedPort {
            name: "rest-https",
            port: EXTERNAL_REST_PORT,
            node_port: &inputs.external_rest_https_port,
        });
    }
    if debug_enabled {
        ports.push(ExpectedPort {
            name: "debug",
            port: &inputs.internal_debug_http_port,
            node_port: &inputs.external_debug_http_port,
        });
    }
    ports
}

/// Verify `external-weblogic-operator-service`.
///
/// The service only exists when debugging or external REST is enabled; with
/// both disabled the manifest must not contain it.
pub fn assert_external_service<'a>(
    service: impl Into<Lookup<'a, Service>>,
    inputs: &OperatorInputs,
    debug_enabled: bool,
    external_rest_enabled: bool,
) -> Result<(), VerifyError> {
    log::debug!(
        "Verifying Service `{}` (debug: {}, external REST: {})",
        EXTERNAL_SERVICE_NAME,
        debug_enabled,
        external_rest_enabled
    );

    let service = service.into();
    if !debug_enabled && !external_rest_enabled {
        return expect_absent(service, EXTERNAL_SERVICE_NAME);
    }

    let ports = assert_service_exists_then_ports(
        service,
        EXTERNAL_SERVICE_NAME,
        &inputs.namespace,
        "NodePort",
    )?;

    let expected = expected_external_ports(inputs, debug_enabled, external_rest_enabled);
    for (index, port) in expected.iter().enumerate() {
        assert_node_port_matches(ports, index, port.name, port.port, port.node_port)?;
    }
    expect_port_count(ports, expected.len())
}

/// Verify `internal-weblogic-operator-service`: a ClusterIP service with a
/// single `rest-https` port.
pub fn assert_internal_service<'a>(
    service: impl Into<Lookup<'a, Service>>,
    inputs: &OperatorInputs,
) -> Result<(), VerifyError> {
    log::debug!("Verifying Service `{}`", INTERNAL_SERVICE_NAME);

    let ports = assert_service_exists_then_ports(
        service.into(),
        INTERNAL_SERVICE_NAME,
        &inputs.namespace,
        "ClusterIP",
    )?;
    assert_port_matches(ports, 0, "rest-https", INTERNAL_REST_PORT)?;
    expect_port_count(ports, 1)
}

/// Check the parts every operator service shares and hand back its ports.
pub fn assert_service_exists_then_ports<'a>(
    service: Lookup<'a, Service>,
    name: &str,
    namespace: &str,
    type_: &str,
) -> Result<&'a [ServicePort], VerifyError> {
    let service = expect_present(service, name)?;
    expect_type_meta(&service.api_version, &service.kind, API_V1, "Service")?;
    assert_metadata_matches(&service.metadata, name, namespace)?;

    let spec = service.spec.as_ref().ok_or_else(|| missing_field("spec"))?;
    expect_eq("spec.type", type_, spec.type_.as_deref())?;
    expect_string_map("spec.selector", spec.selector.as_ref(), &[APP_LABEL])?;

    spec.ports
        .as_deref()
        .ok_or_else(|| missing_field("spec.ports"))
}

/// Check the name and port of `ports[index]`.
pub fn assert_port_matches<'a>(
    ports: &'a [ServicePort],
    index: usize,
    name: &str,
    port: &str,
) -> Result<&'a ServicePort, VerifyError> {
    let field = format!("spec.ports[{}]", index);
    let actual = ports.get(index).ok_or_else(|| missing_field(&field))?;

    expect_eq(&format!("{}.name", field), name, actual.name.as_deref())?;
    let actual_port = actual.port.map(|p| p.to_string());
    expect_eq(&format!("{}.port", field), port, actual_port.as_deref())?;
    Ok(actual)
}

/// Check the name, port, and node port of `ports[index]`.
pub fn assert_node_port_matches(
    ports: &[ServicePort],
    index: usize,
    name: &str,
    port: &str,
    node_port: &str,
) -> Result<(), VerifyError> {
    let actual = assert_port_matches(ports, index, name, port)?;
    let actual_node_port = actual.node_port.map(|p| p.to_string());
    expect_eq(
        &format!("spec.ports[{}].nodePort", index),
        node_port,
        actual_node_port.as_deref(),
    )
}

fn expect_port_count(ports: &[ServicePort], expected: usize) -> Result<(), VerifyError> {
    if ports.len() == expected {
        Ok(())
    } else {
        Err(VerifyError::Count {
            field: "spec.ports".to_string(),
            expected,
            actual: ports.len(),
        })
    }
}
