//! Verification of the operator Deployment.

use crate::error::VerifyError;
use crate::inputs::OperatorInputs;
use crate::manifest::{Deployment, Lookup};
use crate::verify::{
    APP_LABEL, DEPLOYMENT_NAME, assert_metadata_matches, expect_eq, expect_present,
    expect_type_meta, missing_field,
};

pub const API_EXTENSIONS_V1BETA1: &str = "extensions/v1beta1";

/// Verify the `weblogic-operator` Deployment: one replica of a pod labelled
/// `app: weblogic-operator`, running the operator image under the inputs'
/// service account.
pub fn assert_deployment<'a>(
    deployment: impl Into<Lookup<'a, Deployment>>,
    inputs: &OperatorInputs,
) -> Result<(), VerifyError> {
    log::debug!("Verifying Deployment `{}`", DEPLOYMENT_NAME);

    let deployment = expect_present(deployment.into(), DEPLOYMENT_NAME)?;
    expect_type_meta(
        &deployment.api_version,
        &deployment.kind,
        API_EXTENSIONS_V1BETA1,
        "Deployment",
    )?;
    assert_metadata_matches(&deployment.metadata, DEPLOYMENT_NAME, &inputs.namespace)?;

    let spec = deployment.spec.as_ref().ok_or_else(|| missing_field("spec"))?;
    let replicas = spec.replicas.map(|r| r.to_string());
    expect_eq("spec.replicas", "1", replicas.as_deref())?;

    let (label, value) = APP_LABEL;
    let labels = spec
        .template_labels
        .as_ref()
        .ok_or_else(|| missing_field("spec.template.metadata.labels"))?;
    expect_eq(
        &format!("spec.template.metadata.labels.{}", label),
        value,
        labels.get(label).map(String::as_str),
    )?;

    let pod = spec
        .pod_spec
        .as_ref()
        .ok_or_else(|| missing_field("spec.template.spec"))?;
    expect_eq(
        "spec.template.spec.serviceAccountName",
        &inputs.service_account,
        pod.service_account_name.as_deref(),
    )?;

    let container = pod
        .containers
        .first()
        .ok_or_else(|| missing_field("spec.template.spec.containers[0]"))?;
    expect_eq(
        "spec.template.spec.containers[0].name",
        DEPLOYMENT_NAME,
        container.name.as_deref(),
    )?;
    expect_eq(
        "spec.template.spec.containers[0].image",
        &inputs.image,
        container.image.as_deref(),
    )?;
    expect_eq(
        "spec.template.spec.containers[0].imagePullPolicy",
        &inputs.image_pull_policy,
        container.image_pull_policy.as_deref(),
    )
}
