//! Built-in layer catalog.
//!
//! Columns: id, substance, maker, product, λ W/(m·K), mass kg/m³,
//! min thickness cm, max thickness cm.
//!
//! Row order is presentation order: option lists derived from the catalog
//! list values in the order they first appear here.
//!
//! Rows 27-31 are the external thermal insulation system products, the only
//! ones offered for concrete walls insulated from the outside.

pub(super) type Row = (&'static str, &'static str, &'static str, &'static str, f64, f64, f64, f64);

pub(super) const ROWS: &[Row] = &[
    ("1", "concrete", "Readymix", "B-30", 1.75, 2400.0, 10.0, 40.0),
    ("2", "concrete", "Readymix", "B-40", 1.95, 2450.0, 10.0, 40.0),
    ("3", "concrete", "Nesher", "Lightweight LC-20", 0.55, 1400.0, 10.0, 30.0),
    ("4", "blocks", "Ytong", "Ytong 400", 0.12, 400.0, 15.0, 30.0),
    ("5", "blocks", "Ytong", "Ytong 500", 0.14, 500.0, 15.0, 30.0),
    ("6", "blocks", "Ashkelon Blocks", "Hollow concrete block", 0.95, 1200.0, 10.0, 25.0),
    ("7", "blocks", "Ashkelon Blocks", "Thermo-Block", 0.36, 950.0, 20.0, 25.0),
    ("8", "blocks", "Tuff Blocks", "Pumice block", 0.45, 1000.0, 20.0, 25.0),
    ("9", "plaster", "Tambour", "Internal plaster", 0.80, 1600.0, 1.0, 3.0),
    ("10", "plaster", "Tambour", "External plaster", 0.93, 1800.0, 1.5, 3.0),
    ("11", "plaster", "Nirlat", "Thermal plaster", 0.09, 350.0, 2.0, 6.0),
    ("12", "plaster", "Knauf", "Gypsum plaster", 0.35, 1000.0, 0.5, 2.0),
    ("13", "gypsum board", "Knauf", "Standard board", 0.25, 900.0, 1.25, 2.5),
    ("14", "gypsum board", "Knauf", "Fire board", 0.25, 950.0, 1.25, 2.5),
    ("15", "gypsum board", "Gyproc", "Standard board", 0.21, 800.0, 1.25, 2.5),
    ("16", "mineral wool", "Rockwool", "Rockwool 60", 0.036, 60.0, 3.0, 15.0),
    ("17", "mineral wool", "Rockwool", "Rockwool 100", 0.038, 100.0, 3.0, 15.0),
    ("18", "mineral wool", "Isover", "Glass wool 24", 0.035, 24.0, 5.0, 20.0),
    ("19", "extruded polystyrene", "Polyfoam", "XPS 30", 0.034, 30.0, 2.0, 12.0),
    ("20", "extruded polystyrene", "Polyfoam", "XPS 35", 0.033, 35.0, 2.0, 12.0),
    ("21", "extruded polystyrene", "Styrodur", "2800 C", 0.035, 32.0, 2.0, 16.0),
    ("22", "expanded polystyrene", "Kalkar", "EPS F-20", 0.038, 20.0, 2.0, 20.0),
    ("23", "expanded polystyrene", "Kalkar", "EPS F-30", 0.035, 30.0, 2.0, 20.0),
    ("24", "stone cladding", "Jerusalem Stone", "Hebron 3cm", 2.3, 2500.0, 3.0, 5.0),
    ("25", "stone cladding", "Jerusalem Stone", "Ramon 5cm", 2.3, 2500.0, 5.0, 7.0),
    ("26", "waterproofing", "Paz", "Bitumen membrane", 0.23, 1100.0, 0.3, 1.0),
    ("27", "expanded polystyrene", "Thermokir", "EPS F-15", 0.04, 12.0, 3.0, 6.0),
    ("28", "expanded polystyrene", "Thermokir", "Graphite EPS", 0.031, 15.0, 3.0, 12.0),
    ("29", "adhesive mortar", "Thermokir", "Base coat", 0.87, 1400.0, 0.3, 0.8),
    ("30", "plaster", "Thermokir", "Finish render", 0.70, 1700.0, 0.2, 0.5),
    ("31", "extruded polystyrene", "Polyfoam", "XPS ETICS board", 0.034, 32.0, 3.0, 10.0),
    ("32", "concrete", "Nesher", "Screed", 1.40, 2000.0, 3.0, 8.0),
    ("33", "air gap", "Generic", "Ventilated cavity", 0.18, 1.2, 2.0, 10.0),
    ("34", "ceramic tiles", "Negev Ceramics", "Porcelain tile", 1.30, 2300.0, 0.8, 1.2),
    ("35", "waterproofing", "Sika", "Polyurethane coating", 0.20, 1200.0, 0.1, 0.3),
    ("36", "mineral wool", "Isover", "Glass wool 12", 0.04, 12.0, 5.0, 20.0),
];
