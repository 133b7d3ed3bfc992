//! # Operator Manifest Verify
//!
//! Reads the Kubernetes manifest generated for a WebLogic operator and checks
//! it against the inputs the operator was created from.
//!
//! ## Features
//!
//! - **Manifest Indexing**: Parses a multi-document YAML stream into typed
//!   resources keyed by kind and name
//! - **Typed Lookup**: ConfigMap, Secret, Deployment, and Service getters that
//!   tell a missing resource apart from one declared as another kind
//! - **Verification**: Field-level assertions for every resource the operator
//!   manifest contains, failing on the first mismatch with the field's path
//!
//! ## Example
//!
//! ```rust,no_run
//! use operator_manifest_verify::{OperatorInputs, OperatorManifest};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let inputs = OperatorInputs::from_file(Path::new("create-weblogic-operator-inputs.yaml"))?;
//! let manifest = OperatorManifest::from_file(Path::new("weblogic-operator.yaml"))?;
//!
//! manifest.assert_config_map_is_correct(&inputs, "")?;
//! manifest.assert_external_service_is_correct(
//!     &inputs,
//!     inputs.debug_enabled(),
//!     inputs.external_rest_enabled(),
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod inputs;
pub mod manifest;
pub mod operator;
pub mod verify;

pub use error::{Error, InputsError, LookupError, ParseError, Result, VerifyError};
pub use inputs::OperatorInputs;
pub use manifest::{Lookup, Resource, ResourceIndex, ResourceKind};
pub use operator::OperatorManifest;

/// The current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
