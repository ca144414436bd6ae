use datamodel::metadata::{
    AssociationProxy, Catalog, ColumnInfo, Direction, ModelMetadata, ProxyTarget, RelationshipInfo,
};
use datamodel::model::{RelationDescriptor, RelationType};
use datamodel::render::{self, FieldConfig};
use datamodel::DatamodelError;

const COMPUTERS: &str = r#"{"models": [
    {"name": "Person",
     "columns": [
        {"name": "id", "type": "Integer", "primary_key": true},
        {"name": "name", "type": "Unicode"},
        {"name": "birth_date", "type": "Date"}
     ],
     "relationships": [
        {"name": "computers", "target_model": "Computer", "direction": "ONE_TO_MANY", "backref": "owner"}
     ]},
    {"name": "Computer",
     "columns": [
        {"name": "id", "type": "Integer", "primary_key": true},
        {"name": "name", "type": "Unicode"},
        {"name": "vendor", "type": "Unicode"},
        {"name": "purchase_time", "type": "DateTime"},
        {"name": "owner_id", "type": "Integer"}
     ],
     "relationships": [
        {"name": "owner", "target_model": "Person", "direction": "MANY_TO_ONE",
         "backref": "computers", "local_columns": ["owner_id"]}
     ],
     "association_proxies": [
        {"name": "owner_name", "target_collection": "owner", "remote_attr": "name"},
        {"name": "peers", "target_collection": "owner", "remote_attr": "computers"}
     ]}
]}"#;

#[test]
fn test_render_computer() {
    let catalog = Catalog::from_json(COMPUTERS).unwrap();
    let computer = catalog.get("Computer").unwrap();
    let config = FieldConfig::new(Vec::<String>::new(), ["name"]);

    let descriptor = render::render(computer.as_ref(), "compjutahs", &config, None).unwrap();

    assert_eq!(descriptor.primary_key_name, "id");
    assert_eq!(descriptor.collection_name, "compjutahs");
    assert_eq!(descriptor.attributes.len(), 5);
    assert_eq!(descriptor.attributes["owner_name"], "unicode");
    assert_eq!(descriptor.attributes["purchase_time"], "datetime");
    assert!(!descriptor.attributes.contains_key("name"));

    let owner = &descriptor.relations["owner"];
    assert_eq!(owner.foreign_model, "Person");
    assert_eq!(owner.relation_type, RelationType::ManyToOne);
    assert_eq!(owner.backref.as_deref(), Some("computers"));
    assert_eq!(owner.local_column.as_deref(), Some("owner_id"));
    assert!(!owner.is_proxy);

    assert_eq!(
        descriptor.relations["peers"],
        RelationDescriptor::proxy("Computer", RelationType::ManyToOne)
    );
    assert!(descriptor.methods.is_empty());
    assert!(descriptor.polymorphic.is_none());
}

#[test]
fn test_local_column_only_for_many_to_one() {
    let catalog = Catalog::from_json(COMPUTERS).unwrap();
    let person = catalog.get("Person").unwrap();

    let descriptor = render::render(person.as_ref(), "person", &FieldConfig::default(), None).unwrap();

    let computers = &descriptor.relations["computers"];
    assert_eq!(computers.relation_type, RelationType::OneToMany);
    assert_eq!(computers.local_column, None);
}

struct Account;

impl ModelMetadata for Account {
    fn name(&self) -> &str {
        "Account"
    }

    fn columns(&self) -> Vec<ColumnInfo> {
        vec![ColumnInfo::new("id", "Integer").primary_key()]
    }

    fn relationships(&self) -> Vec<RelationshipInfo> {
        vec![
            RelationshipInfo::new("profile", "Profile", Direction::OneToMany).with_uselist(false),
            RelationshipInfo::new("tags", "Tag", Direction::ManyToMany),
        ]
    }

    fn association_proxies(&self) -> Vec<AssociationProxy> {
        vec![
            AssociationProxy {
                name: "tier".into(),
                scalar: true,
                target: Some(ProxyTarget::Column {
                    type_name: "Integer".into(),
                }),
            },
            AssociationProxy {
                name: "tag_labels".into(),
                scalar: false,
                target: None,
            },
            AssociationProxy {
                name: "tag_owners".into(),
                scalar: false,
                target: Some(ProxyTarget::Relationship {
                    target_model: "Person".into(),
                }),
            },
        ]
    }
}

#[test]
fn test_scalar_one_to_many_renders_one_to_one() {
    let descriptor = render::render(&Account, "accounts", &FieldConfig::default(), None).unwrap();
    assert_eq!(descriptor.relations["profile"].relation_type, RelationType::OneToOne);
    assert_eq!(descriptor.relations["tags"].relation_type, RelationType::ManyToMany);
}

#[test]
fn test_proxy_to_column_is_an_attribute() {
    let descriptor = render::render(&Account, "accounts", &FieldConfig::default(), None).unwrap();
    assert_eq!(descriptor.attributes.get("tier").map(String::as_str), Some("integer"));
    assert!(!descriptor.relations.contains_key("tier"));
}

#[test]
fn test_opaque_proxy_is_omitted_everywhere() {
    let descriptor = render::render(&Account, "accounts", &FieldConfig::default(), None).unwrap();
    assert!(!descriptor.attributes.contains_key("tag_labels"));
    assert!(!descriptor.relations.contains_key("tag_labels"));
}

#[test]
fn test_proxies_bypass_the_filter() {
    let config = FieldConfig::new(["id"], ["tier", "tag_owners"]);
    let descriptor = render::render(&Account, "accounts", &config, None).unwrap();

    assert!(descriptor.attributes.contains_key("tier"));
    assert_eq!(descriptor.relations["tag_owners"].relation_type, RelationType::OneToMany);
    assert!(descriptor.relations["tag_owners"].is_proxy);
    assert!(!descriptor.relations.contains_key("profile"));
}

#[test]
fn test_attribute_and_relation_keys_disjoint() {
    let descriptor = render::render(&Account, "accounts", &FieldConfig::default(), None).unwrap();
    for name in descriptor.attributes.keys() {
        assert!(!descriptor.relations.contains_key(name), "{name} is both");
    }
}

struct Keyless;

impl ModelMetadata for Keyless {
    fn name(&self) -> &str {
        "Keyless"
    }

    fn columns(&self) -> Vec<ColumnInfo> {
        vec![ColumnInfo::new("code", "String")]
    }
}

#[test]
fn test_missing_primary_key_fails_without_override() {
    let err = render::render(&Keyless, "keyless", &FieldConfig::default(), None).unwrap_err();
    assert!(matches!(err, DatamodelError::MissingPrimaryKey(name) if name == "Keyless"));

    let descriptor = render::render(&Keyless, "keyless", &FieldConfig::default(), Some("code")).unwrap();
    assert_eq!(descriptor.primary_key_name, "code");
}

#[test]
fn test_render_is_independent_of_order() {
    let catalog = Catalog::from_json(COMPUTERS).unwrap();
    let person = catalog.get("Person").unwrap();
    let computer = catalog.get("Computer").unwrap();
    let config = FieldConfig::default();

    let first = render::render(person.as_ref(), "person", &config, None).unwrap();
    render::render(computer.as_ref(), "computer", &config, None).unwrap();
    let second = render::render(person.as_ref(), "person", &config, None).unwrap();

    assert_eq!(first, second);
}

struct Shadowed;

impl ModelMetadata for Shadowed {
    fn name(&self) -> &str {
        "Shadowed"
    }

    fn columns(&self) -> Vec<ColumnInfo> {
        vec![
            ColumnInfo::new("id", "Integer").primary_key(),
            ColumnInfo::new("owner", "Integer"),
        ]
    }

    fn relationships(&self) -> Vec<RelationshipInfo> {
        vec![RelationshipInfo::new("owner", "Person", Direction::ManyToOne)]
    }
}

#[test]
fn test_column_named_like_relation_is_dropped() {
    let descriptor = render::render(&Shadowed, "shadowed", &FieldConfig::default(), None).unwrap();

    assert!(!descriptor.attributes.contains_key("owner"));
    assert_eq!(descriptor.relations["owner"].relation_type, RelationType::ManyToOne);
    assert!(descriptor.attributes.contains_key("id"));
}
