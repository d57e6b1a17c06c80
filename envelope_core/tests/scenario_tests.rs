//! End-to-end flows through the public API, with the project as the store.

use envelope_core::catalog::{Catalog, CONCRETE_OUTSIDE_ISOLATION_IDS};
use envelope_core::compliance::{check_project, ComplianceStatus};
use envelope_core::element::{
    BuildMethod, BuildMethodIsolation, Element, ElementConfiguration, ElementContext, ElementType,
    IsolationCoverage, OutsideCover, SubType,
};
use envelope_core::file_io::{load_project, save_project};
use envelope_core::layers::{LayerEditor, LayerPager};
use envelope_core::project::{ElementLocation, Project};

fn etics_wall_project() -> (Project, ElementLocation) {
    let mut project = Project::new("Engineer", "25-100", "Client");
    let type_id = project.add_building_type("Residential");
    let space_id = project.add_space(&type_id, "Living room").unwrap();

    let mut config = ElementConfiguration::new(ElementType::Wall);
    config.set_sub_type(SubType::OutsideWall).unwrap();
    config.set_outside_cover(OutsideCover::DryHang).unwrap();
    config.set_build_method(BuildMethod::Concrete).unwrap();
    config.set_build_method_isolation(BuildMethodIsolation::OutsideIsolation).unwrap();
    config.set_isolation_coverage(IsolationCoverage::DarkColor).unwrap();
    assert!(config.is_complete());

    let location = project
        .add_element(&type_id, &space_id, Element::new("South facade", config))
        .unwrap();
    (project, location)
}

#[test]
fn test_outside_insulated_concrete_wall_gets_eps_board() {
    let (mut project, location) = etics_wall_project();
    let catalog = Catalog::builtin();
    let mut element = project.element(&location).unwrap().clone();
    let context = element.context();

    let mut editor = LayerEditor::new(catalog);
    editor.open_add(&element);
    editor.set_substance("expanded polystyrene").unwrap();

    let makers = editor.available_makers(&context);
    assert_eq!(makers, vec!["Thermokir"]);
    for maker in &makers {
        assert!(catalog
            .entries()
            .iter()
            .filter(|e| e.maker == *maker)
            .any(|e| CONCRETE_OUTSIDE_ISOLATION_IDS.contains(&e.id.as_str())));
    }

    editor.set_maker("Thermokir").unwrap();
    assert_eq!(editor.available_products(&context), vec!["EPS F-15", "Graphite EPS"]);
    editor.set_product("EPS F-15").unwrap();
    editor.set_thickness_input("4").unwrap();

    let saved = editor.save(&mut element, &location, &mut project).unwrap();
    assert_eq!(saved.thermal_conductivity, 0.04);
    assert_eq!(saved.mass, 12.0);
    assert_eq!(saved.thickness, 4.0);

    let stored = project.element(&location).unwrap();
    assert_eq!(stored.layers, vec![saved]);
    assert_eq!(stored, &element);
}

#[test]
fn test_restriction_only_applies_to_outside_insulated_concrete() {
    let catalog = Catalog::builtin();
    let etics = ElementContext::new(Some(BuildMethod::Concrete), Some(BuildMethodIsolation::OutsideIsolation));
    let inside = ElementContext::new(Some(BuildMethod::Concrete), Some(BuildMethodIsolation::InsideIsolation));

    let restricted = catalog.available_makers("extruded polystyrene", &etics);
    assert_eq!(restricted, vec!["Polyfoam"]);
    assert_eq!(
        catalog.available_products("extruded polystyrene", "Polyfoam", &etics),
        vec!["XPS ETICS board"]
    );
    assert_eq!(
        catalog.available_makers("extruded polystyrene", &inside),
        vec!["Polyfoam", "Styrodur"]
    );
    assert!(catalog.available_makers("concrete", &etics).is_empty());

    // Same answer every time
    assert_eq!(catalog.available_makers("extruded polystyrene", &etics), restricted);
}

#[test]
fn test_build_up_reorder_and_check_survive_save() {
    let (mut project, location) = etics_wall_project();
    let mut element = project.element(&location).unwrap().clone();
    let mut editor = LayerEditor::new(Catalog::builtin());

    for (substance, maker, product, thickness) in [
        ("concrete", "Readymix", "B-30", "20"),
        ("adhesive mortar", "Thermokir", "Base coat", "0.5"),
        ("expanded polystyrene", "Thermokir", "Graphite EPS", "8"),
        ("plaster", "Thermokir", "Finish render", "0.3"),
    ] {
        editor.open_add(&element);
        editor.set_substance(substance).unwrap();
        editor.set_maker(maker).unwrap();
        editor.set_product(product).unwrap();
        editor.set_thickness_input(thickness).unwrap();
        editor.save(&mut element, &location, &mut project).unwrap();
    }
    assert_eq!(element.layers.len(), 4);

    let mut pager = LayerPager::default();
    pager.reorder(&mut element, &location, &mut project, 3, 0).unwrap();
    assert_eq!(project.element(&location).unwrap().layers[0].product, "Finish render");

    let reports = check_project(&project);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].1.status, ComplianceStatus::Pass);

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("facade.evp");
    save_project(&project, &path).unwrap();
    let loaded = load_project(&path).unwrap();
    assert_eq!(loaded.element(&location).unwrap(), &element);
}

#[test]
fn test_store_refuses_element_with_broken_configuration() {
    let (mut project, location) = etics_wall_project();
    let json = serde_json::json!({
        "id": location.element_id,
        "name": "South facade",
        "type": "Wall",
        "subType": "Outside Wall",
        "outsideCover": "glued stone",
        "buildMethod": "lightBuild",
        "layers": []
    });
    let broken: Element = serde_json::from_value(json).unwrap();

    let err = envelope_core::store::persist(&mut project, &location, broken).unwrap_err();
    assert_eq!(err.error_code(), "PERSISTENCE_FAILED");
    assert_eq!(
        project.element(&location).unwrap().configuration.build_method(),
        Some(BuildMethod::Concrete)
    );
}
