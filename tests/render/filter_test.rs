use datamodel::metadata::{ColumnInfo, ModelMetadata};
use datamodel::render::{self, FieldConfig, FieldFilter};

struct Person;

impl ModelMetadata for Person {
    fn name(&self) -> &str {
        "Person"
    }

    fn columns(&self) -> Vec<ColumnInfo> {
        vec![
            ColumnInfo::new("id", "Integer").primary_key(),
            ColumnInfo::new("name", "Unicode"),
            ColumnInfo::new("age", "Integer"),
            ColumnInfo::new("email", "String"),
        ]
    }

    fn hybrid_properties(&self) -> Vec<String> {
        vec!["display_name".to_string()]
    }
}

#[test]
fn test_filter_is_name_based() {
    let filter = FieldFilter::new(["name", "owner"], ["email"]);
    assert!(filter.is_valid("name"));
    assert!(filter.is_valid("owner"));
    assert!(!filter.is_valid("email"));
    assert!(!filter.is_valid("age"));
}

#[test]
fn test_inclusion_keeps_only_listed_fields() {
    let config = FieldConfig::new(["name"], Vec::<String>::new());
    let descriptor = render::render(&Person, "person", &config, None).unwrap();

    assert_eq!(descriptor.attributes.len(), 1);
    assert_eq!(descriptor.attributes.get("name").map(String::as_str), Some("unicode"));
}

#[test]
fn test_exclusion_vetoes_inclusion() {
    let config = FieldConfig::new(["name"], ["name"]);
    let descriptor = render::render(&Person, "person", &config, None).unwrap();

    assert!(!descriptor.attributes.contains_key("name"));
    assert!(descriptor.attributes.is_empty());
}

#[test]
fn test_no_filter_renders_everything() {
    let descriptor = render::render(&Person, "person", &FieldConfig::default(), None).unwrap();

    let names: Vec<&str> = descriptor.attributes.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["age", "display_name", "email", "id", "name"]);
    assert_eq!(descriptor.attributes["display_name"], "hybrid");
}

#[test]
fn test_hybrid_properties_are_filtered_by_name() {
    let config = FieldConfig::new(Vec::<String>::new(), ["display_name"]);
    let descriptor = render::render(&Person, "person", &config, None).unwrap();

    assert!(!descriptor.attributes.contains_key("display_name"));
    assert!(descriptor.attributes.contains_key("email"));
}
