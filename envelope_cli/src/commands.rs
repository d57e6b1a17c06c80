//! Command handlers.
//!
//! Commands that change a project hold its file lock from load to save and
//! write the file atomically. The loaded [`Project`] doubles as the element
//! store, so every layer change goes through the same validation the core
//! applies to any store.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use envelope_core::catalog::Catalog;
use envelope_core::compliance::{check_element, check_project, ComplianceReport};
use envelope_core::element::{
    BuildMethod, BuildMethodIsolation, Element, ElementConfiguration, ElementContext, ElementType,
    IsolationCoverage, OutsideCover, SubType,
};
use envelope_core::errors::{EnvelopeError, EnvelopeResult};
use envelope_core::file_io::{load_project, save_project, FileLock, PROJECT_EXTENSION};
use envelope_core::layers::{LayerEditor, LayerPager, ReorderOutcome};
use envelope_core::project::{ElementLocation, Project};

use crate::cli::{
    CatalogArgs, ElementAddArgs, FileArg, InitArgs, LayerAddArgs, LayerDeleteArgs, LayerEditArgs,
    LayerFields, LayerListArgs, LayerMoveArgs, OutputFormat,
};
use crate::config::AppConfig;

/// Where command results go.
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Output { format }
    }

    /// Print `value` as JSON, or run `human` to print it for people.
    fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Human => human(value),
        }
        Ok(())
    }
}

/// The catalog in effect: a configured file, or the built-in one.
pub fn load_catalog(config: &AppConfig) -> anyhow::Result<Cow<'static, Catalog>> {
    match &config.catalog_path {
        Some(path) => {
            let catalog = Catalog::load(path).with_context(|| format!("loading catalog {}", path.display()))?;
            Ok(Cow::Owned(catalog))
        }
        None => Ok(Cow::Borrowed(Catalog::builtin())),
    }
}

/// A project opened for modification. The lock is held until it is dropped.
struct OpenProject {
    path: PathBuf,
    project: Project,
    _lock: FileLock,
}

impl OpenProject {
    fn open(path: &Path, config: &AppConfig) -> anyhow::Result<Self> {
        let lock = FileLock::acquire(path, &config.user_id)?;
        let project = load_project(path)?;
        Ok(OpenProject {
            path: path.to_path_buf(),
            project,
            _lock: lock,
        })
    }

    /// Element to edit, as a working copy, with its location.
    fn element(&self, element_id: &Uuid) -> anyhow::Result<(Element, ElementLocation)> {
        let found = find_element(&self.project, element_id)?;
        Ok((found.1.clone(), found.0))
    }

    fn commit(self) -> anyhow::Result<()> {
        save_project(&self.project, &self.path)?;
        Ok(())
    }
}

fn find_element<'p>(project: &'p Project, element_id: &Uuid) -> EnvelopeResult<(ElementLocation, &'p Element)> {
    let not_found = || EnvelopeError::ElementNotFound {
        element_id: element_id.to_string(),
    };
    let location = project.locate_element(element_id).ok_or_else(not_found)?;
    let element = project.element(&location).ok_or_else(not_found)?;
    Ok((location, element))
}

fn read_only(path: &Path) -> anyhow::Result<Project> {
    load_project(path).with_context(|| format!("opening {}", path.display()))
}

fn parse_opt<T>(value: Option<&str>, parse: fn(&str) -> EnvelopeResult<T>) -> anyhow::Result<Option<T>> {
    Ok(value.map(parse).transpose()?)
}

// ============================================================================
// init / catalog
// ============================================================================

#[instrument(skip_all, fields(file = %args.file.display()))]
pub fn init(args: InitArgs, config: &AppConfig, out: &Output) -> anyhow::Result<()> {
    if args.file.extension().and_then(|e| e.to_str()) != Some(PROJECT_EXTENSION) {
        debug!(extension = PROJECT_EXTENSION, "project file has an unusual extension");
    }
    if args.file.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", args.file.display());
    }
    let _lock = FileLock::acquire(&args.file, &config.user_id)?;
    let project = Project::new(args.engineer, args.job_id, args.client);
    save_project(&project, &args.file)?;
    info!(project = %project.id, "project created");

    out.emit(&project.id, |id| println!("Created {} (project {id})", args.file.display()))
}

#[derive(Debug, Serialize)]
struct CatalogStep<'a> {
    step: &'static str,
    options: Vec<&'a str>,
}

/// Pick the next cascade step from the flags given and list its options.
fn catalog_step<'a>(catalog: &'a Catalog, args: &CatalogArgs) -> anyhow::Result<CatalogStep<'a>> {
    let context = ElementContext::new(
        parse_opt(args.build_method.as_deref(), BuildMethod::from_str_flexible)?,
        parse_opt(args.isolation.as_deref(), BuildMethodIsolation::from_str_flexible)?,
    );

    Ok(match (&args.substance, &args.maker) {
        (None, _) => CatalogStep {
            step: "substance",
            options: catalog.available_substances(&context),
        },
        (Some(substance), None) => CatalogStep {
            step: "maker",
            options: catalog.available_makers(substance, &context),
        },
        (Some(substance), Some(maker)) => CatalogStep {
            step: "product",
            options: catalog.available_products(substance, maker, &context),
        },
    })
}

pub fn catalog(args: CatalogArgs, config: &AppConfig, out: &Output) -> anyhow::Result<()> {
    let catalog = load_catalog(config)?;
    let step = catalog_step(&catalog, &args)?;

    out.emit(&step, |step| {
        if step.options.is_empty() {
            println!("No {} options for this selection", step.step);
            return;
        }
        println!("{} options:", step.step);
        for option in &step.options {
            match (&args.substance, &args.maker) {
                (Some(substance), Some(maker)) => match catalog.resolve_entry(substance, maker, option) {
                    Some(entry) => println!(
                        "  {:<28} λ={:<6} mass={:<6} {}-{} cm",
                        option, entry.thermal_conductivity, entry.mass, entry.min_thickness, entry.max_thickness
                    ),
                    None => println!("  {option}"),
                },
                _ => println!("  {option}"),
            }
        }
    })
}

// ============================================================================
// element
// ============================================================================

/// Build a configuration through the setters, in cascade order.
fn configure(args: &ElementAddArgs) -> anyhow::Result<ElementConfiguration> {
    let mut config = ElementConfiguration::new(ElementType::from_str_flexible(&args.element_type)?);
    if let Some(sub_type) = parse_opt(args.sub_type.as_deref(), SubType::from_str_flexible)? {
        config.set_sub_type(sub_type)?;
    }
    if let Some(cover) = parse_opt(args.outside_cover.as_deref(), OutsideCover::from_str_flexible)? {
        config.set_outside_cover(cover)?;
    }
    if let Some(method) = parse_opt(args.build_method.as_deref(), BuildMethod::from_str_flexible)? {
        let cascade = config.set_build_method(method)?;
        debug!(?cascade, "isolation options after build method");
    }
    if let Some(isolation) = parse_opt(args.isolation.as_deref(), BuildMethodIsolation::from_str_flexible)? {
        config.set_build_method_isolation(isolation)?;
    }
    if let Some(coverage) = parse_opt(args.coverage.as_deref(), IsolationCoverage::from_str_flexible)? {
        config.set_isolation_coverage(coverage)?;
    }
    Ok(config)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ElementAdded {
    location: ElementLocation,
    element: Element,
    pending_field: Option<&'static str>,
}

#[instrument(skip_all, fields(file = %args.file.display()))]
pub fn element_add(args: ElementAddArgs, config: &AppConfig, out: &Output) -> anyhow::Result<()> {
    let configuration = configure(&args)?;
    let mut open = OpenProject::open(&args.file, config)?;

    let project = &mut open.project;
    let type_id = match project.find_building_type(&args.building_type) {
        Some(building_type) => building_type.id,
        None => project.add_building_type(args.building_type.as_str()),
    };
    let existing_space = project
        .building_type(&type_id)
        .and_then(|t| t.spaces.iter().find(|s| s.name.eq_ignore_ascii_case(&args.space)))
        .map(|s| s.id);
    let space_id = match existing_space {
        Some(id) => id,
        None => project.add_space(&type_id, args.space.as_str())?,
    };

    let element = Element::new(args.name.as_str(), configuration);
    let pending = element.configuration.pending_field().map(|f| f.name());
    let location = project.add_element(&type_id, &space_id, element.clone())?;
    open.commit()?;

    let added = ElementAdded {
        location,
        element,
        pending_field: pending,
    };
    out.emit(&added, |added| {
        println!("Added element {} ({})", added.element.name, added.element.id);
        if let Some(field) = added.pending_field {
            println!("  configuration incomplete, next field: {field}");
        }
    })
}

// ============================================================================
// layer
// ============================================================================

fn apply_fields(editor: &mut LayerEditor<'_>, fields: &LayerFields) -> anyhow::Result<()> {
    if let Some(name) = &fields.name {
        editor.set_name(name.as_str())?;
    }
    if let Some(substance) = &fields.substance {
        editor.set_substance(substance.as_str())?;
    }
    if let Some(maker) = &fields.maker {
        editor.set_maker(maker.as_str())?;
    }
    if let Some(product) = &fields.product {
        editor.set_product(product.as_str())?;
    }
    if let Some(thickness) = &fields.thickness {
        editor.set_thickness_input(thickness)?;
    }
    Ok(())
}

fn print_layers(element: &Element, pager: &LayerPager) {
    let total = element.layers.len();
    println!(
        "{} - page {}/{} ({} layers)",
        element.name,
        pager.page(),
        pager.page_count(total),
        total
    );
    let range = pager.page_range(total);
    for (offset, layer) in element.layers[range.clone()].iter().enumerate() {
        let index = range.start + offset;
        println!(
            "  [{}] {:<12} {} / {} / {}  {} cm  λ={}",
            offset,
            layer.display_name(index),
            layer.substance,
            layer.maker,
            layer.product,
            layer.thickness,
            layer.thermal_conductivity
        );
    }
}

#[instrument(skip_all, fields(file = %args.target.file.display(), element = %args.target.element))]
pub fn layer_add(args: LayerAddArgs, config: &AppConfig, out: &Output) -> anyhow::Result<()> {
    let catalog = load_catalog(config)?;
    let mut open = OpenProject::open(&args.target.file, config)?;
    let (mut element, location) = open.element(&args.target.element)?;

    let mut editor = LayerEditor::new(&catalog);
    editor.open_add(&element);
    apply_fields(&mut editor, &args.fields)?;
    let layer = editor.save(&mut element, &location, &mut open.project)?;
    open.commit()?;

    out.emit(&layer, |layer| {
        println!(
            "Added {} ({} / {} / {}, {} cm)",
            layer.display_name(element.layers.len() - 1),
            layer.substance,
            layer.maker,
            layer.product,
            layer.thickness
        )
    })
}

#[instrument(skip_all, fields(file = %args.target.file.display(), index = args.index))]
pub fn layer_edit(args: LayerEditArgs, config: &AppConfig, out: &Output) -> anyhow::Result<()> {
    let catalog = load_catalog(config)?;
    let mut open = OpenProject::open(&args.target.file, config)?;
    let (mut element, location) = open.element(&args.target.element)?;

    let mut editor = LayerEditor::new(&catalog);
    editor.open_edit(&element, args.index)?;
    apply_fields(&mut editor, &args.fields)?;
    let layer = editor.save(&mut element, &location, &mut open.project)?;
    open.commit()?;

    out.emit(&layer, |layer| {
        println!("Updated {} ({} cm, λ={})", layer.display_name(args.index), layer.thickness, layer.thermal_conductivity)
    })
}

#[derive(Debug, Serialize)]
struct Moved {
    from: usize,
    to: usize,
    page: usize,
}

pub fn layer_move(args: LayerMoveArgs, config: &AppConfig, out: &Output) -> anyhow::Result<()> {
    let mut open = OpenProject::open(&args.target.file, config)?;
    let (mut element, location) = open.element(&args.target.element)?;

    let mut pager = LayerPager::new(config.page_size);
    pager.set_page(args.page, element.layers.len());
    let outcome = pager.reorder(&mut element, &location, &mut open.project, args.from, args.to)?;

    let moved = match outcome {
        ReorderOutcome::NoOp => {
            let index = pager.absolute_index(args.from);
            Moved { from: index, to: index, page: pager.page() }
        }
        ReorderOutcome::Moved { from, to } => {
            open.commit()?;
            Moved { from, to, page: pager.page() }
        }
    };
    out.emit(&moved, |moved| {
        if moved.from == moved.to {
            println!("Nothing to move");
        } else {
            println!("Moved layer {} to {}", moved.from, moved.to);
            print_layers(&element, &pager);
        }
    })
}

pub fn layer_delete(args: LayerDeleteArgs, config: &AppConfig, out: &Output) -> anyhow::Result<()> {
    let mut open = OpenProject::open(&args.target.file, config)?;
    let (mut element, location) = open.element(&args.target.element)?;

    let mut pager = LayerPager::new(config.page_size);
    pager.set_page(args.page, element.layers.len());
    let removed = pager.delete(&mut element, &location, &mut open.project, args.index)?;
    open.commit()?;

    out.emit(&removed, |removed| {
        println!("Deleted {} ({})", removed.name, removed.id);
        print_layers(&element, &pager);
    })
}

pub fn layer_list(args: LayerListArgs, config: &AppConfig, out: &Output) -> anyhow::Result<()> {
    let project = read_only(&args.target.file)?;
    let (_, element) = find_element(&project, &args.target.element)?;

    let mut pager = LayerPager::new(config.page_size);
    pager.set_page(args.page, element.layers.len());
    out.emit(&pager.page_items(&element.layers), |_| print_layers(element, &pager))
}

// ============================================================================
// check / demo
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ElementCheck<'a> {
    location: ElementLocation,
    name: &'a str,
    report: ComplianceReport,
}

fn element_checks(project: &Project) -> Vec<ElementCheck<'_>> {
    check_project(project)
        .into_iter()
        .filter_map(|(location, report)| {
            let name = project.element(&location)?.name.as_str();
            Some(ElementCheck { location, name, report })
        })
        .collect()
}

pub fn check(args: FileArg, out: &Output) -> anyhow::Result<()> {
    let project = read_only(&args.file)?;
    let results = element_checks(&project);

    out.emit(&results, |results| {
        println!("Code {} - {} elements", project.settings.code, results.len());
        for result in results {
            let limit = result
                .report
                .limit
                .map(|l| format!("{l:.2}"))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<24} U={:<6.3} limit={:<5} {}",
                result.name, result.report.u_value.0, limit, result.report.status
            );
        }
    })
}

/// Build an outside-insulated concrete wall and add the EPS board to it.
pub fn run_demo() -> anyhow::Result<(Project, ElementLocation)> {
    let mut project = Project::new("Demo Engineer", "DEMO-1", "Demo Client");
    let type_id = project.add_building_type("Residential");
    let space_id = project.add_space(&type_id, "Living room")?;

    let mut configuration = ElementConfiguration::new(ElementType::Wall);
    configuration.set_sub_type(SubType::OutsideWall)?;
    configuration.set_outside_cover(OutsideCover::DryHang)?;
    configuration.set_build_method(BuildMethod::Concrete)?;
    configuration.set_build_method_isolation(BuildMethodIsolation::OutsideIsolation)?;
    configuration.set_isolation_coverage(IsolationCoverage::DarkColor)?;
    let location = project.add_element(&type_id, &space_id, Element::new("South facade", configuration))?;

    let mut element = project
        .element(&location)
        .cloned()
        .context("demo element missing")?;
    let context = element.context();
    let mut editor = LayerEditor::new(Catalog::builtin());

    editor.open_add(&element);
    editor.set_substance("expanded polystyrene")?;
    let makers = editor.available_makers(&context);
    debug!(?makers, "makers offered for outside-insulated concrete");
    editor.set_maker(makers.first().copied().context("no maker offered")?)?;
    editor.set_product("EPS F-15")?;
    editor.set_thickness_input("4")?;
    editor.save(&mut element, &location, &mut project)?;

    Ok((project, location))
}

pub fn demo(out: &Output) -> anyhow::Result<()> {
    let (project, location) = run_demo()?;
    let element = project.element(&location).context("demo element missing")?;
    let report = check_element(element, &project.settings.limits);

    out.emit(element, |element| {
        match serde_json::to_string_pretty(element) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("{e}"),
        }
        println!("U = {:.3} W/m²K ({})", report.u_value.0, report.status);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use envelope_core::compliance::ComplianceStatus;
    use tempfile::TempDir;

    fn test_config() -> AppConfig {
        AppConfig {
            page_size: 5,
            catalog_path: None,
            user_id: "tester".into(),
        }
    }

    fn quiet() -> Output {
        Output::new(OutputFormat::Json)
    }

    fn init_project(dir: &TempDir) -> PathBuf {
        let file = dir.path().join("house.evp");
        init(
            InitArgs {
                file: file.clone(),
                engineer: "Jane".into(),
                job_id: "25-042".into(),
                client: "ACME".into(),
                force: false,
            },
            &test_config(),
            &quiet(),
        )
        .unwrap();
        file
    }

    fn add_wall(file: &Path) -> Uuid {
        element_add(
            ElementAddArgs {
                file: file.to_path_buf(),
                building_type: "Residential".into(),
                space: "Living".into(),
                name: "North".into(),
                element_type: "wall".into(),
                sub_type: None,
                outside_cover: Some("plaster".into()),
                build_method: Some("blocks".into()),
                isolation: Some("no extra cover".into()),
                coverage: Some("bright color".into()),
            },
            &test_config(),
            &quiet(),
        )
        .unwrap();
        let project = load_project(file).unwrap();
        let id = project.element_locations().next().unwrap().element_id;
        id
    }

    fn fields(substance: &str, maker: &str, product: &str) -> LayerFields {
        LayerFields {
            name: None,
            substance: Some(substance.into()),
            maker: Some(maker.into()),
            product: Some(product.into()),
            thickness: None,
        }
    }

    #[test]
    fn test_demo_adds_eps_board() {
        let (project, location) = run_demo().unwrap();
        let layer = &project.element(&location).unwrap().layers[0];
        assert_eq!(layer.maker, "Thermokir");
        assert_eq!(layer.thickness, 4.0);
        assert_eq!(layer.thermal_conductivity, 0.04);
        assert_eq!(layer.mass, 12.0);
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let file = init_project(&dir);
        let again = InitArgs {
            file,
            engineer: "Jane".into(),
            job_id: "25-042".into(),
            client: String::new(),
            force: false,
        };
        assert!(init(again, &test_config(), &quiet()).is_err());
    }

    #[test]
    fn test_layer_commands_persist_to_file() {
        let dir = TempDir::new().unwrap();
        let file = init_project(&dir);
        let element = add_wall(&file);
        let target = || crate::cli::ElementRef { file: file.clone(), element };

        for (substance, maker, product) in [
            ("plaster", "Tambour", "Internal plaster"),
            ("blocks", "Ytong", "Ytong 400"),
            ("plaster", "Tambour", "External plaster"),
        ] {
            layer_add(
                LayerAddArgs { target: target(), fields: fields(substance, maker, product) },
                &test_config(),
                &quiet(),
            )
            .unwrap();
        }

        layer_move(
            LayerMoveArgs { target: target(), page: 1, from: 2, to: 0 },
            &test_config(),
            &quiet(),
        )
        .unwrap();
        layer_delete(
            LayerDeleteArgs { target: target(), page: 1, index: 1 },
            &test_config(),
            &quiet(),
        )
        .unwrap();

        let project = load_project(&file).unwrap();
        let location = project.locate_element(&element).unwrap();
        let products: Vec<_> = project
            .element(&location)
            .unwrap()
            .layers
            .iter()
            .map(|l| l.product.as_str())
            .collect();
        assert_eq!(products, vec!["External plaster", "Ytong 400"]);
        assert!(!envelope_core::file_io::lock_path_for(&file).exists());
    }

    #[test]
    fn test_rejected_layer_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let file = init_project(&dir);
        let element = add_wall(&file);
        let before = std::fs::read_to_string(&file).unwrap();

        let mut bad = fields("blocks", "Ytong", "Ytong 400");
        bad.thickness = Some("99".into());
        let result = layer_add(
            LayerAddArgs {
                target: crate::cli::ElementRef { file: file.clone(), element },
                fields: bad,
            },
            &test_config(),
            &quiet(),
        );
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&file).unwrap(), before);
    }

    fn catalog_args(substance: Option<&str>, maker: Option<&str>) -> CatalogArgs {
        CatalogArgs {
            substance: substance.map(Into::into),
            maker: maker.map(Into::into),
            build_method: None,
            isolation: None,
        }
    }

    #[test]
    fn test_catalog_step_follows_flags() {
        let catalog = Catalog::builtin();

        let step = catalog_step(catalog, &catalog_args(None, None)).unwrap();
        assert_eq!(step.step, "substance");
        assert!(step.options.contains(&"blocks"));
        assert!(step.options.contains(&"expanded polystyrene"));

        let step = catalog_step(catalog, &catalog_args(Some("blocks"), None)).unwrap();
        assert_eq!(step.step, "maker");
        assert_eq!(step.options, vec!["Ytong", "Ashkelon Blocks", "Tuff Blocks"]);

        let step = catalog_step(catalog, &catalog_args(Some("blocks"), Some("Ytong"))).unwrap();
        assert_eq!(step.step, "product");
        assert_eq!(step.options, vec!["Ytong 400", "Ytong 500"]);

        for args in [
            catalog_args(None, None),
            catalog_args(Some("blocks"), None),
            catalog_args(Some("blocks"), Some("Ytong")),
        ] {
            super::catalog(args, &test_config(), &quiet()).unwrap();
        }
    }

    #[test]
    fn test_catalog_step_narrows_by_context() {
        let mut args = catalog_args(Some("extruded polystyrene"), None);
        args.build_method = Some("concrete".into());
        args.isolation = Some("outside isolation".into());
        let step = catalog_step(Catalog::builtin(), &args).unwrap();
        assert_eq!(step.options, vec!["Polyfoam"]);

        args.isolation = Some("sideways".into());
        assert!(catalog_step(Catalog::builtin(), &args).is_err());
    }

    #[test]
    fn test_check_reports_saved_project() {
        let dir = TempDir::new().unwrap();
        let file = init_project(&dir);
        let element = add_wall(&file);

        let project = load_project(&file).unwrap();
        let checks = element_checks(&project);
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].name, "North");
        assert_eq!(checks[0].report.status, ComplianceStatus::Incomplete);

        layer_add(
            LayerAddArgs {
                target: crate::cli::ElementRef { file: file.clone(), element },
                fields: fields("blocks", "Ytong", "Ytong 400"),
            },
            &test_config(),
            &quiet(),
        )
        .unwrap();

        let project = load_project(&file).unwrap();
        let checks = element_checks(&project);
        assert_eq!(checks[0].location.element_id, element);
        assert_eq!(checks[0].report.status, ComplianceStatus::Pass);
        assert!((checks[0].report.u_value.0 - 1.0 / 1.42).abs() < 1e-9);
        assert_eq!(checks[0].report.limit, Some(1.1));

        check(FileArg { file }, &quiet()).unwrap();
    }

    #[test]
    fn test_configure_rejects_disallowed_method() {
        let args = ElementAddArgs {
            file: PathBuf::from("unused.evp"),
            building_type: "Residential".into(),
            space: "Living".into(),
            name: "North".into(),
            element_type: "wall".into(),
            sub_type: None,
            outside_cover: Some("glued stone".into()),
            build_method: Some("light build".into()),
            isolation: None,
            coverage: None,
        };
        let err = configure(&args).unwrap_err();
        let core = err.downcast_ref::<envelope_core::EnvelopeError>().unwrap();
        assert_eq!(core.error_code(), "INVALID_SELECTION");
    }
}
