use operator_manifest_verify::manifest::{ConfigMap, Service};
use operator_manifest_verify::verify::{self, EXTERNAL_SERVICE_NAME};
use operator_manifest_verify::{
    Lookup, LookupError, OperatorInputs, OperatorManifest, ParseError, ResourceIndex, ResourceKind,
    VerifyError,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const EXTERNAL_CERT: &str = "LS0tLS1CRUdJTiBDRVJUSUZJQ0FURS0tLS0tCg==";
const EXTERNAL_KEY: &str = "ZXh0ZXJuYWwgb3BlcmF0b3Iga2V5";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_inputs() -> OperatorInputs {
    OperatorInputs::from_file(&fixture("operator-inputs.yaml")).unwrap()
}

fn write_manifest(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("weblogic-operator.yaml");
    fs::write(&path, content).unwrap();
    path
}

fn scenario_inputs() -> OperatorInputs {
    OperatorInputs::new()
        .with_namespace("weblogic-operator")
        .with_service_account("sa1")
        .with_target_namespaces("ns1,ns2")
}

const SCENARIO_CONFIG_MAP: &str = r#"
apiVersion: v1
kind: ConfigMap
metadata:
  name: operator-config-map
  namespace: weblogic-operator
data:
  serviceaccount: sa1
  targetNamespaces: "ns1,ns2"
  externalOperatorCert: CERTA
  internalOperatorCert: anything
"#;

#[test]
fn test_fixture_manifest_is_correct() {
    init_logging();
    let inputs = fixture_inputs();
    assert!(inputs.debug_enabled());
    assert!(inputs.external_rest_enabled());

    let manifest = OperatorManifest::from_file(&fixture("weblogic-operator.yaml")).unwrap();
    assert_eq!(manifest.index().len(), 5);

    manifest
        .assert_all_correct(&inputs, EXTERNAL_CERT, EXTERNAL_KEY)
        .unwrap();
}

#[test]
fn test_fixture_manifest_each_check() {
    init_logging();
    let inputs = fixture_inputs();
    let manifest = OperatorManifest::from_file(&fixture("weblogic-operator.yaml")).unwrap();

    manifest
        .assert_config_map_is_correct(&inputs, EXTERNAL_CERT)
        .unwrap();
    manifest
        .assert_secrets_are_correct(&inputs, EXTERNAL_KEY)
        .unwrap();
    manifest.assert_deployment_is_correct(&inputs).unwrap();
    manifest.assert_internal_service_is_correct(&inputs).unwrap();
    manifest
        .assert_external_service_is_correct(&inputs, true, true)
        .unwrap();

    // The fixture exposes both ports, so claiming only one is enabled fails.
    let err = manifest
        .assert_external_service_is_correct(&inputs, false, true)
        .unwrap_err();
    assert_eq!(
        err,
        VerifyError::Count {
            field: "spec.ports".to_string(),
            expected: 1,
            actual: 2,
        }
    );
}

#[test]
fn test_scenario_matching_config_map_passes() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let path = write_manifest(&dir, SCENARIO_CONFIG_MAP);

    let manifest = OperatorManifest::from_file(&path).unwrap();
    manifest
        .assert_config_map_is_correct(&scenario_inputs(), "CERTA")
        .unwrap();
}

#[test]
fn test_scenario_cert_mismatch_identifies_key() {
    let manifest = OperatorManifest::from_yaml_str(SCENARIO_CONFIG_MAP).unwrap();
    let err = manifest
        .assert_config_map_is_correct(&scenario_inputs(), "CERTB")
        .unwrap_err();

    assert_eq!(err.field(), "data.externalOperatorCert");
    assert!(err.to_string().contains("externalOperatorCert"));
}

#[test]
fn test_scenario_absent_service_with_flags_disabled() {
    let manifest = OperatorManifest::from_yaml_str(SCENARIO_CONFIG_MAP).unwrap();
    let inputs = OperatorInputs::default();
    assert!(!inputs.debug_enabled());
    assert!(!inputs.external_rest_enabled());

    assert_eq!(manifest.external_operator_service(), Lookup::Absent);
    manifest
        .assert_external_service_is_correct(&inputs, false, false)
        .unwrap();
}

const SCENARIO_SERVICE: &str = r#"
apiVersion: v1
kind: Service
metadata:
  name: external-weblogic-operator-service
  namespace: weblogic-operator
spec:
  type: NodePort
  selector:
    app: weblogic-operator
  ports:
  - name: rest-https
    port: 8081
    nodePort: 30001
  - name: debug
    port: 8453
    nodePort: 30002
"#;

fn both_enabled_inputs() -> OperatorInputs {
    OperatorInputs::new()
        .with_external_rest("30001")
        .with_remote_debug("8453", "30002")
}

#[test]
fn test_scenario_both_ports_pass() {
    let manifest = OperatorManifest::from_yaml_str(SCENARIO_SERVICE).unwrap();
    manifest
        .assert_external_service_is_correct(&both_enabled_inputs(), true, true)
        .unwrap();
}

#[test]
fn test_scenario_extra_port_fails_on_length() {
    let yaml = format!(
        "{}  - name: extra\n    port: 9000\n    nodePort: 30003\n",
        SCENARIO_SERVICE
    );
    let manifest = OperatorManifest::from_yaml_str(&yaml).unwrap();
    let err = manifest
        .assert_external_service_is_correct(&both_enabled_inputs(), true, true)
        .unwrap_err();

    assert_eq!(
        err,
        VerifyError::Count {
            field: "spec.ports".to_string(),
            expected: 2,
            actual: 3,
        }
    );
}

#[test]
fn test_service_presence_follows_flags() {
    let with_service = OperatorManifest::from_yaml_str(SCENARIO_SERVICE).unwrap();
    let without_service = OperatorManifest::from_yaml_str(SCENARIO_CONFIG_MAP).unwrap();
    let inputs = both_enabled_inputs();

    for (debug, rest) in [(false, false), (true, false), (false, true), (true, true)] {
        let absent = without_service.assert_external_service_is_correct(&inputs, debug, rest);
        let present = with_service.assert_external_service_is_correct(&inputs, debug, rest);

        if !debug && !rest {
            assert!(absent.is_ok());
            assert!(matches!(
                present,
                Err(VerifyError::UnexpectedResource { .. })
            ));
        } else {
            assert!(matches!(absent, Err(VerifyError::Missing { .. })));
        }
    }
}

#[test]
fn test_service_declared_as_other_kind() {
    let yaml = r#"
apiVersion: v1
kind: ConfigMap
metadata:
  name: external-weblogic-operator-service
  namespace: weblogic-operator
"#;
    let index = ResourceIndex::from_yaml_str(yaml).unwrap();
    let lookup = index.lookup::<Service>(EXTERNAL_SERVICE_NAME);
    assert!(matches!(
        lookup,
        Lookup::KindMismatch {
            declared: ResourceKind::ConfigMap
        }
    ));

    // Not a Service, so the "must be absent" rule holds.
    verify::assert_external_service(
        index.lookup::<Service>(EXTERNAL_SERVICE_NAME),
        &OperatorInputs::default(),
        false,
        false,
    )
    .unwrap();

    let err = verify::assert_external_service(
        index.lookup::<Service>(EXTERNAL_SERVICE_NAME),
        &both_enabled_inputs(),
        true,
        true,
    )
    .unwrap_err();
    assert!(matches!(err, VerifyError::WrongKind { .. }));

    assert!(matches!(
        index.require::<Service>(EXTERNAL_SERVICE_NAME),
        Err(LookupError::TypeMismatch { .. })
    ));
    assert!(index.require::<ConfigMap>(EXTERNAL_SERVICE_NAME).is_ok());
}

#[test]
fn test_malformed_manifest_file() {
    let dir = TempDir::new().unwrap();
    let path = write_manifest(&dir, "apiVersion: v1\nkind: ConfigMap\n  bad: indent\n");
    let err = OperatorManifest::from_file(&path).unwrap_err();
    assert!(matches!(err, ParseError::SyntaxError { .. }));
}

#[test]
fn test_missing_manifest_file() {
    let dir = TempDir::new().unwrap();
    let err = OperatorManifest::from_file(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ParseError::IoError { .. }));
}
