use std::io::Write;

use datamodel::metadata::{Catalog, CatalogError, ModelMetadata, ProxyTarget};
use tempfile::NamedTempFile;

const LIBRARY: &str = r#"{"models": [
    {"name": "Entity", "abstract": true,
     "columns": [{"name": "created_at", "type": "DateTime"}]},
    {"name": "Author", "bases": ["Entity"],
     "columns": [
        {"name": "id", "type": "Integer", "primary_key": true},
        {"name": "name", "type": "Unicode(120)"}
     ],
     "relationships": [
        {"name": "books", "target_model": "Book", "direction": "ONE_TO_MANY", "backref": "author"}
     ],
     "api": {"collection_name": "authors"}},
    {"name": "Book", "bases": ["Entity"],
     "columns": [
        {"name": "isbn", "type": "String(13)", "primary_key": true},
        {"name": "author_id", "type": "Integer"}
     ],
     "relationships": [
        {"name": "author", "target_model": "Author", "direction": "MANY_TO_ONE",
         "backref": "books", "local_columns": ["author_id"]}
     ],
     "association_proxies": [
        {"name": "author_name", "target_collection": "author", "remote_attr": "name"},
        {"name": "shelf_mates", "target_collection": "author", "remote_attr": "books"},
        {"name": "missing", "target_collection": "author", "remote_attr": "nope"},
        {"name": "not_a_relation", "target_collection": "isbn", "remote_attr": "x"}
     ],
     "api": {}}
]}"#;

fn write_catalog(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_catalog(LIBRARY);
    let catalog = Catalog::from_file(file.path()).unwrap();

    assert_eq!(catalog.len(), 3);
    let exposed: Vec<&str> = catalog.exposed().map(|m| m.name()).collect();
    assert_eq!(exposed, vec!["Author", "Book"]);
    assert_eq!(
        catalog.get("Author").unwrap().api().unwrap().collection_name.as_deref(),
        Some("authors")
    );
}

#[test]
fn test_missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Catalog::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, CatalogError::Read(_)));
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    let file = write_catalog(r#"{"models": [{"name": "A", "columns": 3}]}"#);
    let err = Catalog::from_file(file.path()).unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)));
}

#[test]
fn test_primary_key_reported_from_columns() {
    let catalog = Catalog::from_json(LIBRARY).unwrap();
    assert_eq!(catalog.get("Author").unwrap().primary_key_name().as_deref(), Some("id"));
    assert_eq!(catalog.get("Book").unwrap().primary_key_name().as_deref(), Some("isbn"));
}

#[test]
fn test_abstract_columns_reach_subclasses() {
    let catalog = Catalog::from_json(LIBRARY).unwrap();
    let book = catalog.get("Book").unwrap();

    assert!(book.columns().iter().any(|c| c.name == "created_at"));
    assert!(!book.inheritance().is_declared());
    assert_eq!(book.inheritance().parent, None);
}

#[test]
fn test_proxies_resolved_through_local_relationship() {
    let catalog = Catalog::from_json(LIBRARY).unwrap();
    let proxies = catalog.get("Book").unwrap().association_proxies();

    let names: Vec<&str> = proxies.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["author_name", "shelf_mates", "missing"]);

    assert!(proxies.iter().all(|p| p.scalar));
    assert_eq!(
        proxies[0].target,
        Some(ProxyTarget::Column {
            type_name: "Unicode(120)".into()
        })
    );
    assert_eq!(
        proxies[1].target,
        Some(ProxyTarget::Relationship {
            target_model: "Book".into()
        })
    );
    assert_eq!(proxies[2].target, None);
}
