//! Operator inputs: the values a generated manifest is checked against.
//!
//! Every field is a string, including ports and flags, so that fixtures can
//! carry deliberately invalid values through to the assertions.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

use crate::error::InputsError;

/// `externalRestOption` value meaning the external REST port is disabled.
pub const EXTERNAL_REST_OPTION_NONE: &str = "NONE";
pub const EXTERNAL_REST_OPTION_SELF_SIGNED_CERT: &str = "SELF_SIGNED_CERT";
pub const EXTERNAL_REST_OPTION_CUSTOM_CERT: &str = "CUSTOM_CERT";

/// Inputs used to create a WebLogic operator, as read from an inputs YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatorInputs {
    pub namespace: String,
    pub service_account: String,
    /// Comma separated list of namespaces the operator manages.
    pub target_namespaces: String,
    pub image: String,
    pub image_pull_policy: String,
    pub image_pull_secret_name: String,
    pub external_rest_option: String,
    #[serde(deserialize_with = "scalar_string")]
    pub external_rest_https_port: String,
    pub external_sans: String,
    #[serde(deserialize_with = "scalar_string")]
    pub remote_debug_node_port_enabled: String,
    #[serde(deserialize_with = "scalar_string")]
    pub internal_debug_http_port: String,
    #[serde(deserialize_with = "scalar_string")]
    pub external_debug_http_port: String,
    pub java_logging_level: String,
    #[serde(deserialize_with = "scalar_string")]
    pub elk_integration_enabled: String,
}

/// Accept unquoted numbers and booleans for fields that are modelled as strings.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "expected a scalar value, found {:?}",
            other
        ))),
    }
}

impl Default for OperatorInputs {
    fn default() -> Self {
        Self {
            namespace: "weblogic-operator".to_string(),
            service_account: "weblogic-operator".to_string(),
            target_namespaces: "default".to_string(),
            image: "container-registry.oracle.com/middleware/weblogic-kubernetes-operator:latest"
                .to_string(),
            image_pull_policy: "IfNotPresent".to_string(),
            image_pull_secret_name: String::new(),
            external_rest_option: EXTERNAL_REST_OPTION_NONE.to_string(),
            external_rest_https_port: "31001".to_string(),
            external_sans: String::new(),
            remote_debug_node_port_enabled: "false".to_string(),
            internal_debug_http_port: "30999".to_string(),
            external_debug_http_port: "30999".to_string(),
            java_logging_level: "INFO".to_string(),
            elk_integration_enabled: "false".to_string(),
        }
    }
}

impl OperatorInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load inputs from a YAML file. Keys left out keep their default values.
    pub fn from_file(path: &Path) -> Result<Self, InputsError> {
        let content = fs::read_to_string(path).map_err(|source| InputsError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, InputsError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml_string(&self) -> Result<String, InputsError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Whether the operator's REST API is exposed outside the cluster.
    pub fn external_rest_enabled(&self) -> bool {
        self.external_rest_option != EXTERNAL_REST_OPTION_NONE
    }

    /// Whether a node port is opened for remote debugging.
    pub fn debug_enabled(&self) -> bool {
        self.remote_debug_node_port_enabled == "true"
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_service_account(mut self, service_account: impl Into<String>) -> Self {
        self.service_account = service_account.into();
        self
    }

    pub fn with_target_namespaces(mut self, target_namespaces: impl Into<String>) -> Self {
        self.target_namespaces = target_namespaces.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_image_pull_policy(mut self, policy: impl Into<String>) -> Self {
        self.image_pull_policy = policy.into();
        self
    }

    /// Expose the REST API on `node_port` using a self signed certificate.
    pub fn with_external_rest(mut self, node_port: impl Into<String>) -> Self {
        self.external_rest_option = EXTERNAL_REST_OPTION_SELF_SIGNED_CERT.to_string();
        self.external_rest_https_port = node_port.into();
        self
    }

    pub fn with_external_rest_option(mut self, option: impl Into<String>) -> Self {
        self.external_rest_option = option.into();
        self
    }

    /// Enable remote debugging, listening on `internal_port` and exposed on `node_port`.
    pub fn with_remote_debug(
        mut self,
        internal_port: impl Into<String>,
        node_port: impl Into<String>,
    ) -> Self {
        self.remote_debug_node_port_enabled = "true".to_string();
        self.internal_debug_http_port = internal_port.into();
        self.external_debug_http_port = node_port.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_disable_optional_ports() {
        let inputs = OperatorInputs::default();
        assert!(!inputs.external_rest_enabled());
        assert!(!inputs.debug_enabled());
        assert_eq!(inputs.namespace, "weblogic-operator");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
namespace: test-operator-ns
targetNamespaces: "ns1,ns2"
externalRestOption: SELF_SIGNED_CERT
externalRestHttpsPort: "30001"
remoteDebugNodePortEnabled: "true"
"#;
        let inputs = OperatorInputs::from_yaml_str(yaml).unwrap();
        assert_eq!(inputs.namespace, "test-operator-ns");
        assert_eq!(inputs.target_namespaces, "ns1,ns2");
        assert_eq!(inputs.service_account, "weblogic-operator");
        assert!(inputs.external_rest_enabled());
        assert!(inputs.debug_enabled());
        assert_eq!(inputs.external_debug_http_port, "30999");
    }

    #[test]
    fn test_unquoted_scalars_are_read_as_strings() {
        let yaml = "externalRestHttpsPort: 30001\nremoteDebugNodePortEnabled: true\n";
        let inputs = OperatorInputs::from_yaml_str(yaml).unwrap();
        assert_eq!(inputs.external_rest_https_port, "30001");
        assert!(inputs.debug_enabled());
    }

    #[test]
    fn test_builders_accept_invalid_ports() {
        let inputs = OperatorInputs::new()
            .with_external_rest("not-a-port")
            .with_remote_debug("8453", "-1");
        assert_eq!(inputs.external_rest_https_port, "not-a-port");
        assert_eq!(inputs.internal_debug_http_port, "8453");
        assert_eq!(inputs.external_debug_http_port, "-1");
    }

    #[test]
    fn test_yaml_round_trip() {
        let inputs = OperatorInputs::new().with_namespace("ns").with_remote_debug("1", "2");
        let yaml = inputs.to_yaml_string().unwrap();
        assert!(yaml.contains("remoteDebugNodePortEnabled"));
        assert_eq!(OperatorInputs::from_yaml_str(&yaml).unwrap(), inputs);
    }

    #[test]
    fn test_malformed_yaml() {
        let err = OperatorInputs::from_yaml_str("namespace: [").unwrap_err();
        assert!(matches!(err, InputsError::ParsingFailed(_)));
    }
}
