use std::sync::Arc;
use std::thread;

use datamodel::compose::{
    ApiRegistration, ConfigDiscovery, DiscoveryError, RegisteredColumns, SchemaRegistry,
};
use datamodel::config::Settings;
use datamodel::metadata::{Catalog, ModelMetadata};
use datamodel::render::FieldConfig;
use datamodel::DatamodelError;
use sha2::{Digest, Sha256};

fn sha256_hex(document: &str) -> String {
    format!("{:x}", Sha256::digest(document.as_bytes()))
}

const CATALOG: &str = r#"{"models": [
    {"name": "Person",
     "columns": [
        {"name": "id", "type": "Integer", "primary_key": true},
        {"name": "name", "type": "Unicode"}
     ],
     "operations": [
        {"name": "greet", "params": [{"name": "self", "kind": "receiver"},
                                     {"name": "greeting", "kind": "optional"}]}
     ],
     "api": {"collection_name": "people"}},
    {"name": "ComputerPart",
     "columns": [{"name": "id", "type": "Integer", "primary_key": true}],
     "api": {}},
    {"name": "Internal",
     "columns": [{"name": "id", "type": "Integer", "primary_key": true}]}
]}"#;

fn catalog() -> Catalog {
    Catalog::from_json(CATALOG).unwrap()
}

#[test]
fn test_empty_registry_publishes_empty_document() {
    let registry = SchemaRegistry::default();
    let snapshot = registry.snapshot();

    assert_eq!(snapshot.document(), "{}");
    assert!(snapshot.schema().is_empty());
    assert!(snapshot.endpoints().is_empty());
}

#[test]
fn test_register_catalog_exposes_registered_models() {
    let registry = SchemaRegistry::default();
    let snapshot = registry.register_catalog(&catalog()).unwrap();

    assert_eq!(registry.registered(), vec!["ComputerPart", "Person"]);
    assert_eq!(snapshot.schema().get("Person").unwrap().collection_name, "people");
    assert_eq!(
        snapshot.schema().get("ComputerPart").unwrap().collection_name,
        "computer_part"
    );
    assert!(snapshot.endpoints().get("people", "greet").is_some());
    assert!(Arc::ptr_eq(&snapshot, &registry.snapshot()));
}

#[test]
fn test_recomposition_is_idempotent() {
    let first = SchemaRegistry::default().register_catalog(&catalog()).unwrap();
    let registry = SchemaRegistry::default();
    registry.register_catalog(&catalog()).unwrap();
    let second = registry.register_catalog(&catalog()).unwrap();

    assert_eq!(first.document(), second.document());
    assert_eq!(first.etag(), second.etag());
}

#[test]
fn test_etag_tracks_document() {
    let registry = SchemaRegistry::default();
    let snapshot = registry.register_catalog(&catalog()).unwrap();

    assert_eq!(snapshot.etag(), sha256_hex(snapshot.document()));
    assert_eq!(snapshot.document(), snapshot.schema().to_json().unwrap());
}

#[test]
fn test_reregistration_replaces_configuration() {
    let catalog = catalog();
    let person = Arc::clone(catalog.get("Person").unwrap());
    let registry = SchemaRegistry::default();

    let api = ApiRegistration::new().collection("people").exclude_columns(["name"]);
    let snapshot = registry.register(person.clone(), Some(api)).unwrap();
    assert!(!snapshot.schema().get("Person").unwrap().attributes.contains_key("name"));

    let snapshot = registry
        .register(person, Some(ApiRegistration::new().collection("humans")))
        .unwrap();
    let descriptor = snapshot.schema().get("Person").unwrap();
    assert!(descriptor.attributes.contains_key("name"));
    assert_eq!(descriptor.collection_name, "humans");
    assert_eq!(registry.registered(), vec!["Person"]);
}

#[test]
fn test_failed_discovery_keeps_previous_snapshot() {
    let catalog = catalog();
    let registry = SchemaRegistry::default();
    let before = registry.register_catalog(&catalog).unwrap();

    let internal = Arc::clone(catalog.get("Internal").unwrap());
    let err = registry.register(internal, None).unwrap_err();

    assert!(matches!(
        err,
        DatamodelError::Discovery { ref model, source: DiscoveryError::NotRegistered(_) } if model == "Internal"
    ));
    assert!(Arc::ptr_eq(&before, &registry.snapshot()));
    assert_eq!(registry.registered(), vec!["ComputerPart", "Person"]);
}

#[test]
fn test_unregister_removes_model_and_endpoints() {
    let registry = SchemaRegistry::default();
    registry.register_catalog(&catalog()).unwrap();

    let snapshot = registry.unregister("Person").unwrap();
    assert!(!snapshot.schema().contains("Person"));
    assert!(snapshot.endpoints().get("people", "greet").is_none());
    assert_eq!(registry.registered(), vec!["ComputerPart"]);
}

struct Flaky;

impl ConfigDiscovery for Flaky {
    fn discover(
        &self,
        model: &dyn ModelMetadata,
        api: Option<&ApiRegistration>,
    ) -> Result<FieldConfig, DiscoveryError> {
        if model.name() == "ComputerPart" {
            return Err(DiscoveryError::Unavailable("api layer offline".into()));
        }
        RegisteredColumns.discover(model, api)
    }
}

#[test]
fn test_custom_discovery_failure_aborts_composition() {
    let registry = SchemaRegistry::with_discovery(Settings::default(), Box::new(Flaky));
    let err = registry.register_catalog(&catalog()).unwrap_err();

    assert!(matches!(err, DatamodelError::Discovery { ref model, .. } if model == "ComputerPart"));
    assert!(registry.registered().is_empty());
    assert_eq!(registry.snapshot().document(), "{}");
}

#[test]
fn test_readers_see_complete_snapshots() {
    let catalog = catalog();
    let registry = SchemaRegistry::default();

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..50 {
                    let snapshot = registry.snapshot();
                    assert_eq!(snapshot.document(), snapshot.schema().to_json().unwrap());
                    assert_eq!(snapshot.etag(), sha256_hex(snapshot.document()));
                    let models = snapshot.schema().len();
                    assert!(models == 0 || models == 2, "partial snapshot with {models} models");
                }
            });
        }
        scope.spawn(|| {
            for _ in 0..20 {
                registry.register_catalog(&catalog).unwrap();
            }
        });
    });

    assert_eq!(registry.snapshot().schema().len(), 2);
}
