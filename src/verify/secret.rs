//! Verification of the operator Secret.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::VerifyError;
use crate::inputs::OperatorInputs;
use crate::manifest::{Lookup, Secret};
use crate::verify::{
    API_V1, SECRETS_NAME, assert_metadata_matches, expect_eq, expect_keys, expect_non_null,
    expect_present, expect_type_meta, missing_field,
};

pub const EXTERNAL_OPERATOR_KEY: &str = "externalOperatorKey";
pub const INTERNAL_OPERATOR_KEY: &str = "internalOperatorKey";

/// Verify `operator-secrets`.
///
/// Secret data is decoded when the manifest is parsed, so the comparison
/// works on the key bytes rather than on how they happened to be written.
/// `expected_external_key` is the base64 form of the key, as operators
/// supply it; the decoded bytes are rendered in canonical base64 before
/// comparing. The internal key is generated, so only its presence is checked.
pub fn assert_secret<'a>(
    secret: impl Into<Lookup<'a, Secret>>,
    inputs: &OperatorInputs,
    expected_external_key: &str,
) -> Result<(), VerifyError> {
    log::debug!("Verifying Secret `{}`", SECRETS_NAME);

    let secret = expect_present(secret.into(), SECRETS_NAME)?;
    expect_type_meta(&secret.api_version, &secret.kind, API_V1, "Secret")?;
    assert_metadata_matches(&secret.metadata, SECRETS_NAME, &inputs.namespace)?;

    let data = secret.data.as_ref().ok_or_else(|| missing_field("data"))?;
    expect_keys("data", data, &[EXTERNAL_OPERATOR_KEY, INTERNAL_OPERATOR_KEY])?;

    let external_key = data
        .get(EXTERNAL_OPERATOR_KEY)
        .and_then(|v| v.as_deref())
        .map(|bytes| STANDARD.encode(bytes));
    expect_eq(
        "data.externalOperatorKey",
        expected_external_key,
        external_key.as_deref(),
    )?;
    expect_non_null("data", data, INTERNAL_OPERATOR_KEY)
}
