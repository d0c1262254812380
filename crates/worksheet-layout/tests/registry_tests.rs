use tempfile::TempDir;
use worksheet_layout::*;

#[test]
fn test_builtin_tiers() {
    let registry = TemplateRegistry::builtin().unwrap();
    assert_eq!(registry.resolve("7A").unwrap().columns, 1);
    assert_eq!(registry.resolve("F").unwrap().name, "elementary");
    assert_eq!(registry.resolve("G").unwrap().columns, 2);
    assert_eq!(registry.resolve("O").unwrap().fonts.body_pt, 10.0);
    assert_eq!(
        registry.levels().count(),
        ELEMENTARY_LEVELS.len() + ADVANCED_LEVELS.len()
    );
}

#[test]
fn test_resolve_ignores_case_and_whitespace() {
    let registry = TemplateRegistry::builtin().unwrap();
    assert_eq!(registry.resolve(" k ").unwrap().name, "advanced");
    assert_eq!(registry.resolve("2a").unwrap().name, "elementary");
}

#[test]
fn test_unknown_level() {
    let registry = TemplateRegistry::builtin().unwrap();
    match registry.resolve("Z") {
        Err(LayoutError::UnknownLevel(level)) => assert_eq!(level, "Z"),
        other => panic!("Expected UnknownLevel, got {other:?}"),
    }
}

#[test]
fn test_shared_template_must_match() {
    let mut registry = TemplateRegistry::new();
    registry.register("A", LayoutTemplate::elementary()).unwrap();
    registry.register("B", LayoutTemplate::elementary()).unwrap();

    let drifted = LayoutTemplate {
        problem_spacing_mm: 12.0,
        ..LayoutTemplate::elementary()
    };
    match registry.register("C", drifted) {
        Err(LayoutError::TemplateConflict { level, name }) => {
            assert_eq!(level, "C");
            assert_eq!(name, "elementary");
        }
        other => panic!("Expected TemplateConflict, got {other:?}"),
    }
    assert!(registry.resolve("C").is_err());
}

#[test]
fn test_duplicate_level() {
    let mut registry = TemplateRegistry::new();
    registry.register("G", LayoutTemplate::advanced()).unwrap();
    assert!(matches!(
        registry.register("g", LayoutTemplate::advanced()),
        Err(LayoutError::DuplicateLevel(level)) if level == "G"
    ));
}

#[test]
fn test_invalid_templates_rejected_at_registration() {
    let mut registry = TemplateRegistry::new();

    let zero_spacing = LayoutTemplate {
        problem_spacing_mm: 0.0,
        ..LayoutTemplate::elementary()
    };
    assert!(matches!(
        registry.register("A", zero_spacing),
        Err(LayoutError::InvalidTemplate { .. })
    ));

    let negative_margin = LayoutTemplate {
        margins: PageMargins {
            left_mm: -1.0,
            ..LayoutTemplate::elementary().margins
        },
        ..LayoutTemplate::elementary()
    };
    assert!(registry.register("A", negative_margin).is_err());

    let three_columns = LayoutTemplate {
        columns: 3,
        ..LayoutTemplate::advanced()
    };
    assert!(registry.register("A", three_columns).is_err());

    let bad_color = LayoutTemplate {
        colors: ColorRoles {
            header: "purple".to_string(),
            ..LayoutTemplate::elementary().colors
        },
        ..LayoutTemplate::elementary()
    };
    assert!(registry.register("A", bad_color).is_err());

    assert!(registry.is_empty());
}

#[test]
fn test_missing_field_rejected_at_load() {
    let mut template = serde_json::to_value(LayoutTemplate::elementary()).unwrap();
    template.as_object_mut().unwrap().remove("problem_spacing_mm");
    let json = serde_json::json!({
        "version": REGISTRY_FORMAT_VERSION,
        "templates": [{ "levels": ["A"], "template": template }],
    });

    assert!(matches!(
        TemplateRegistry::from_json(&json.to_string()),
        Err(LayoutError::Json(_))
    ));
}

#[test]
fn test_unsupported_version_rejected() {
    let json = r#"{"version": 99, "templates": []}"#;
    assert!(matches!(
        TemplateRegistry::from_json(json),
        Err(LayoutError::InvalidTemplate { .. })
    ));
}

#[tokio::test]
async fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("templates.json");

    let registry = TemplateRegistry::with_builtin_templates().unwrap();
    registry.save(&path).await.unwrap();
    let loaded = TemplateRegistry::load(&path).await.unwrap();

    let original: Vec<_> = registry.levels().collect();
    let reloaded: Vec<_> = loaded.levels().collect();
    assert_eq!(original, reloaded);
    assert_eq!(loaded.resolve("K").unwrap(), registry.resolve("K").unwrap());
}
