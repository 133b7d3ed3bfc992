//! A parsed `weblogic-operator.yaml` and the checks run against it.

use std::path::Path;

use crate::error::{ParseError, VerifyError};
use crate::inputs::OperatorInputs;
use crate::manifest::{ConfigMap, Deployment, Lookup, ResourceIndex, Secret, Service};
use crate::verify::{
    self, CONFIG_MAP_NAME, DEPLOYMENT_NAME, EXTERNAL_SERVICE_NAME, INTERNAL_SERVICE_NAME,
    SECRETS_NAME,
};

/// The resources making up one generated operator manifest.
#[derive(Debug, Clone)]
pub struct OperatorManifest {
    index: ResourceIndex,
}

impl OperatorManifest {
    pub fn from_file(path: &Path) -> Result<Self, ParseError> {
        Ok(Self::from_index(ResourceIndex::from_file(path)?))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ParseError> {
        Ok(Self::from_index(ResourceIndex::from_yaml_str(content)?))
    }

    pub fn from_index(index: ResourceIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &ResourceIndex {
        &self.index
    }

    pub fn operator_config_map(&self) -> Lookup<'_, ConfigMap> {
        self.index.lookup(CONFIG_MAP_NAME)
    }

    pub fn operator_secrets(&self) -> Lookup<'_, Secret> {
        self.index.lookup(SECRETS_NAME)
    }

    pub fn operator_deployment(&self) -> Lookup<'_, Deployment> {
        self.index.lookup(DEPLOYMENT_NAME)
    }

    pub fn internal_operator_service(&self) -> Lookup<'_, Service> {
        self.index.lookup(INTERNAL_SERVICE_NAME)
    }

    pub fn external_operator_service(&self) -> Lookup<'_, Service> {
        self.index.lookup(EXTERNAL_SERVICE_NAME)
    }

    pub fn assert_config_map_is_correct(
        &self,
        inputs: &OperatorInputs,
        expected_external_cert: &str,
    ) -> Result<(), VerifyError> {
        verify::assert_config_map(self.operator_config_map(), inputs, expected_external_cert)
            .inspect_err(report)
    }

    pub fn assert_secrets_are_correct(
        &self,
        inputs: &OperatorInputs,
        expected_external_key: &str,
    ) -> Result<(), VerifyError> {
        verify::assert_secret(self.operator_secrets(), inputs, expected_external_key)
            .inspect_err(report)
    }

    pub fn assert_deployment_is_correct(&self, inputs: &OperatorInputs) -> Result<(), VerifyError> {
        verify::assert_deployment(self.operator_deployment(), inputs).inspect_err(report)
    }

    pub fn assert_internal_service_is_correct(
        &self,
        inputs: &OperatorInputs,
    ) -> Result<(), VerifyError> {
        verify::assert_internal_service(self.internal_operator_service(), inputs)
            .inspect_err(report)
    }

    pub fn assert_external_service_is_correct(
        &self,
        inputs: &OperatorInputs,
        debug_enabled: bool,
        external_rest_enabled: bool,
    ) -> Result<(), VerifyError> {
        verify::assert_external_service(
            self.external_operator_service(),
            inputs,
            debug_enabled,
            external_rest_enabled,
        )
        .inspect_err(report)
    }

    /// Run every check, taking the debug and external REST flags from `inputs`.
    pub fn assert_all_correct(
        &self,
        inputs: &OperatorInputs,
        expected_external_cert: &str,
        expected_external_key: &str,
    ) -> Result<(), VerifyError> {
        self.assert_config_map_is_correct(inputs, expected_external_cert)?;
        self.assert_secrets_are_correct(inputs, expected_external_key)?;
        self.assert_deployment_is_correct(inputs)?;
        self.assert_internal_service_is_correct(inputs)?;
        self.assert_external_service_is_correct(
            inputs,
            inputs.debug_enabled(),
            inputs.external_rest_enabled(),
        )
    }
}

fn report(err: &VerifyError) {
    log::warn!("Operator manifest verification failed: {}", err);
}
