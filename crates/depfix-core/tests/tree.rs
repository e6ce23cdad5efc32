use depfix_core::tree::{clean_constraint, parse_tree, strip_name_prefix};

#[test]
fn parses_flat_shape() {
    let json = r#"[
        {"key": "requests", "package_name": "requests", "installed_version": "2.31.0",
         "dependencies": [
            {"key": "urllib3", "package_name": "urllib3", "installed_version": "2.0.7",
             "required_version": "<3,>=1.21.1", "dependencies": []}
         ]}
    ]"#;
    let tree = parse_tree(json).unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].name, "requests");
    assert_eq!(tree[0].version, "2.31.0");
    assert_eq!(tree[0].required, None);
    let dep = &tree[0].dependencies[0];
    assert_eq!(dep.name, "urllib3");
    assert_eq!(dep.version, "2.0.7");
    assert_eq!(dep.required.as_deref(), Some("<3,>=1.21.1"));
}

#[test]
fn parses_nested_package_shape() {
    let json = r#"[
        {"package": {"key": "flask", "package_name": "Flask", "installed_version": "3.0.0"},
         "dependencies": [
            {"package": {"key": "werkzeug", "installed_version": "3.0.1"},
             "required_version": ">=3.0.0", "dependencies": []}
         ]}
    ]"#;
    let tree = parse_tree(json).unwrap();
    assert_eq!(tree[0].name, "flask");
    assert_eq!(tree[0].version, "3.0.0");
    assert_eq!(tree[0].dependencies[0].name, "werkzeug");
    assert_eq!(tree[0].dependencies[0].required.as_deref(), Some(">=3.0.0"));
}

#[test]
fn falls_back_to_generic_version_field() {
    let json = r#"[
        {"key": "app", "installed_version": "1.0",
         "dependencies": [{"key": "six", "installed_version": "1.16.0", "version": ">=1.10"}]}
    ]"#;
    let tree = parse_tree(json).unwrap();
    assert_eq!(tree[0].dependencies[0].required.as_deref(), Some(">=1.10"));
}

#[test]
fn wildcard_and_empty_constraints_are_dropped() {
    let json = r#"[
        {"key": "app", "installed_version": "1.0",
         "dependencies": [
            {"key": "six", "installed_version": "1.16.0", "required_version": "Any"},
            {"key": "idna", "installed_version": "3.6", "required_version": ""}
         ]}
    ]"#;
    let tree = parse_tree(json).unwrap();
    assert!(tree[0].dependencies.iter().all(|d| d.required.is_none()));
}

#[test]
fn entries_without_name_are_skipped() {
    let json = r#"[{"installed_version": "1.0"}, {"key": "ok", "installed_version": "2.0"}]"#;
    let tree = parse_tree(json).unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].name, "ok");
}

#[test]
fn names_are_normalized() {
    let json = r#"[{"key": "Typing_Extensions", "installed_version": "4.8.0"}]"#;
    let tree = parse_tree(json).unwrap();
    assert_eq!(tree[0].name, "typing-extensions");
}

#[test]
fn empty_output_yields_no_packages() {
    assert!(parse_tree("   ").unwrap().is_empty());
}

#[test]
fn invalid_json_is_inspection_failure() {
    let err = parse_tree("{not json").unwrap_err();
    assert!(err.to_string().contains("Environment inspection failed"));
}

#[test]
fn glued_name_is_stripped() {
    assert_eq!(
        clean_constraint("urllib3", "urllib3<1.27,>=1.21.1").as_deref(),
        Some("<1.27,>=1.21.1")
    );
    assert_eq!(
        strip_name_prefix("typing-extensions", "typing_extensions>=4.0"),
        ">=4.0"
    );
}

#[test]
fn unrelated_prefix_is_kept() {
    assert_eq!(strip_name_prefix("idna", ">=2.5"), ">=2.5");
    assert_eq!(strip_name_prefix("idna", "1.0"), "1.0");
    assert_eq!(strip_name_prefix("idna", "charset>=2"), "charset>=2");
}
