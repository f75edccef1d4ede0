//! ASHRAE Standard 211 audit workbook.
//!
//! Each `read_*` function reads one sheet of the template into a
//! [`Record::Group`]. Fixed regions are addressed by A1 ranges; regions whose
//! position moves between template revisions are located by their caption
//! first. [`read_std211`] reads every sheet into one record keyed by sheet
//! title.

use crate::error::ExtractError;
use crate::record::Record;
use crate::scan::expect_labels;
use crate::scan::find_header_row;
use crate::scan::find_value;
use crate::scan::info;
use crate::scan::labeled_values;
use crate::scan::labels;
use crate::scan::list;
use crate::scan::records;
use crate::scan::resolve_formula_keys;
use crate::scan::tabular;
use crate::scan::KeyedTable;
use crate::scan::LabeledOptions;
use crate::scan::ListOptions;
use crate::scan::Orientation;
use crate::scan::TableOptions;
use crate::scan::UnitSystem;
use crate::scan::VALUE_FILL;
use crate::spreadsheet::range::Rectangle;
use crate::spreadsheet::scalar::Scalar;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Workbook;
use indexmap::IndexMap;
use log::debug;

type Group = IndexMap<String, Record>;

const ENERGY_SOURCES_LABELS: &[Option<&str>] = &[
    Some("Energy Source"),
    Some("ID"),
    None,
    None,
    Some("Type"),
    Some("Rate schedule"),
];

/// Row captions of the space function table as printed in the template
const SPACE_FUNCTIONS_HEADER: &[&str] = &[
    "Space Number",
    "Function type*",
    "Original intended use",
    "Gross Floor Area*\n(per space)",
    "Conditioned Area*\n(Approx % of total function space)",
    "Number of Occupants",
    "Approximate Plug Loads (W/sf)",
    "Use (hours/week)",
    "Use (weeks/year)",
    "Principal HVAC Type*",
    "Principal Lighting Type*",
];

/// Keys used for the space function records
const SPACE_FUNCTIONS_LABELS: &[&str] = &[
    "Space Number",
    "Function type",
    "Original intended use",
    "Gross Floor Area",
    "Percent Conditioned Area",
    "Number of Occupants",
    "Approximate Plug Loads (W/sf)",
    "Use (hours/week)",
    "Use (weeks/year)",
    "Principal HVAC Type",
    "Principal Lighting Type",
];

const LOW_COST: &str = "Low-Cost and No-Cost Recommendations";
const POTENTIAL_CAPITAL: &str = "Potential Capital Recommendations";

const L1_LOW_COST_HEADER: &[&str] = &[
    LOW_COST,
    "Modified System",
    "Impact on Occupant Comfort or IEQ",
    "Other Non-Energy Impacts",
    "Cost",
    "Savings Impact",
    "Typical ROI",
    "Priority",
];

const L1_POTENTIAL_CAPITAL_HEADER: &[&str] = &[
    POTENTIAL_CAPITAL,
    "Modified System",
    "Impact on Occupant Comfort",
    "Other Non-Energy Impacts",
    "Cost",
    "Savings Impact",
    "Typical ROI",
    "Priority",
];

const L2_EEM_LABELS: &[&str] = &[
    "Description",
    "Energy Cost Savings",
    "Non-energy Cost Savings",
    "Peak Demand Savings (kW)",
    "Utility #1",
    "Utility #2",
    "Utility #3",
    "Delivered Energy",
    "Measure Cost",
    "Potential Incentives",
    "Measure Life (years)",
];

const UTILITIES: &[&str] = &["Utility #1", "Utility #2", "Utility #3"];
const ELECTRICITY_LABELS: &[&str] = &["Start Date", "End Date", "Days", "Use", "Peak", "Cost"];
const UTILITY_LABELS: &[&str] = &["Start Date", "End Date", "Days", "Use", "Cost"];
const DELIVERY_LABELS: &[&str] = &["Delivery date", "Volume", "kBTU", "Cost"];

const EQUIPMENT_INVENTORY_LABELS: &[&str] = &[
    "ID",
    "Description",
    "Location",
    "Type",
    "Units",
    "Rated efficiency (as applicable)",
    "Output Capacity",
    "Area Served",
    "Approx Year Installed",
    "Condition       (excellent, good, average, poor)",
];

const LIGHTING_SOURCES_LABELS: &[&str] = &[
    "Lighting Source Type(s)",
    "Ballast Type(s)",
    "Control(s)",
    "Space Type(s)*",
    "Approx % Area Served",
];

const LOAD_LABELS: &[&str] = &["Major Process/Plug Load Type(s)**", "Key Operational Details***"];

const ENVELOPE_GROUPS: &[(&str, &[&str])] = &[
    ("Roof Construction", &["Check Box 1", "Check Box 2", "Check Box 3", "Check Box 4", "Check Box 5", "Check Box 6"]),
    ("Fenestration Frame Types", &["Check Box 7", "Check Box 8", "Check Box 9", "Check Box 40", "Check Box 10"]),
    ("Floor Construction", &["Check Box 11", "Check Box 12", "Check Box 13", "Check Box 14", "Check Box 15"]),
    (
        "Fenestration Glass Types",
        &["Check Box 16", "Check Box 17", "Check Box 18", "Check Box 19", "Check Box 26", "Check Box 37"],
    ),
    (
        "Wall Constructions",
        &["Check Box 20", "Check Box 21", "Check Box 22", "Check Box 23", "Check Box 24", "Check Box 27", "Check Box 36"],
    ),
    ("Foundation Type", &["Check Box 28", "Check Box 29", "Check Box 30", "Check Box 31", "Check Box 32"]),
];

const HVAC_GROUPS: &[(&str, &[&str])] = &[
    ("Zone Controls", &["Check Box 73", "Check Box 69", "Check Box 67", "Check Box 68"]),
    ("Central Plant Controls", &["Check Box 72", "Check Box 77", "Check Box 76", "Check Box 103"]),
    ("Outside Air", &["Check Box 79", "Check Box 78", "Check Box 84", "Check Box 86"]),
    ("Heat Recovery", &["Check Box 81", "Check Box 82"]),
    (
        "Cooling Distribution Equipment Type",
        &[
            "Check Box 1",
            "Check Box 2",
            "Check Box 3",
            "Check Box 4",
            "Check Box 5",
            "Check Box 87",
            "Check Box 88",
            "Check Box 7",
            "Check Box 6",
        ],
    ),
    (
        "Heating Distribution Equipment Type",
        &["Check Box 59", "Check Box 60", "Check Box 61", "Check Box 62", "Check Box 63", "Check Box 64", "Check Box 65"],
    ),
    (
        "Chiller Input",
        &["Check Box 25", "Check Box 26", "Check Box 27", "Check Box 28", "Check Box 53", "Check Box 52", "Check Box 54"],
    ),
    ("Compressor", &["Check Box 29", "Check Box 31", "Check Box 33", "Check Box 55"]),
    ("Condenser", &["Check Box 30", "Check Box 32", "Check Box 58", "Check Box 56", "Check Box 57"]),
    ("Heating Fuel", &["Check Box 34", "Check Box 35", "Check Box 36", "Check Box 37"]),
    ("Boiler Type", &["Check Box 42", "Check Box 43", "Check Box 38", "Check Box 39"]),
    (
        "SHW/DHW Source",
        &[
            "Check Box 20",
            "Check Box 44",
            "Check Box 21",
            "Check Box 22",
            "Check Box 47",
            "Check Box 45",
            "Check Box 46",
            "Check Box 23",
            "Check Box 24",
        ],
    ),
    ("SHW/DHW Fuel", &["Check Box 48", "Check Box 49", "Check Box 50", "Check Box 51"]),
];

/// Groups read only when their gate checkbox is checked: `(group, gate, members)`
const HVAC_GATED_GROUPS: &[(&str, &str, &[&str])] = &[
    ("Exhaust Fans", "Check Box 91", &["Check Box 92", "Check Box 102"]),
    (
        "Cooling Source",
        "Check Box 8",
        &["Check Box 9", "Check Box 10", "Check Box 11", "Check Box 85", "Check Box 13"],
    ),
    (
        "Heating Source",
        "Check Box 14",
        &["Check Box 15", "Check Box 16", "Check Box 17", "Check Box 18", "Check Box 89"],
    ),
];

/// Free-text completions: `(group, caption prefix, textbox, fallback)`
const HVAC_COMPLETIONS: &[(&str, &str, &str, &str)] = &[
    ("Cooling Source", "Other", "TextBox 89", "Unspecified"),
    ("Heating Fuel", "Oil", "TextBox 88", "Unspecified Grade"),
    ("SHW/DHW Fuel", "Oil", "TextBox 1", "Unspecified Grade"),
    ("SHW/DHW Fuel", "Other", "TextBox 87", "Unspecified"),
];

/// Reads every sheet of the template.
///
/// The result is a group keyed by sheet title. The equipment inventory is
/// titled `L2 - Equipment Inventory` although its sheet is named
/// `L2 Equipment Inventory`.
pub fn read_std211(workbook: &Workbook, units: UnitSystem) -> Result<Record, ExtractError> {
    let mut std211 = Group::new();
    std211.insert("All - Building".to_owned(), read_all_building(workbook.sheet("All - Building")?, units)?);
    std211.insert("All - Metered Energy".to_owned(), read_all_metered_energy(workbook.sheet("All - Metered Energy")?)?);
    std211.insert(
        "All - Delivered Energy".to_owned(),
        read_all_delivered_energy(workbook.sheet("All - Delivered Energy")?)?,
    );
    std211.insert("All - Space Functions".to_owned(), read_space_functions(workbook.sheet("All - Space Functions")?)?);
    std211.insert("L1 - EEM Summary".to_owned(), read_l1_eem_summary(workbook.sheet("L1 - EEM Summary")?)?);
    std211.insert("L2 - Envelope".to_owned(), read_l2_envelope(workbook.sheet("L2 - Envelope")?, units)?);
    std211.insert("L2 - HVAC".to_owned(), read_l2_hvac(workbook.sheet("L2 - HVAC")?)?);
    std211.insert(
        "L2 - Equipment Inventory".to_owned(),
        read_l2_equipment_inventory(workbook.sheet("L2 Equipment Inventory")?)?,
    );
    std211.insert(
        "L2 - Lighting Elec & Plug Loads".to_owned(),
        read_l2_lighting(workbook.sheet("L2 - Lighting Elec & Plug Loads")?)?,
    );
    std211.insert("L2 - EEM Summary".to_owned(), read_l2_eem_summary(workbook.sheet("L2 - EEM Summary")?)?);
    Ok(Record::Group(std211))
}

/// Reads the `All - Building` sheet.
///
/// Top level pairs have dates turned into text. The space function pairs, the
/// occupancy, the energy sources, the facility description and the excluded
/// spaces are nested under their own keys.
pub fn read_all_building(sheet: &Sheet, units: UnitSystem) -> Result<Record, ExtractError> {
    debug!("Reading building information from '{}'", sheet.name());
    let mut building = Group::new();
    for range in ["A3:B13", "A19:B25", "E15:F22"] {
        let pairs = labeled_values(sheet, &Rectangle::parse(range)?, &LabeledOptions::default())?;
        building.extend(pairs.into_iter().map(|(key, value)| (key, Record::Value(value.date_to_text()))));
    }

    let excluded_spaces = list(
        sheet,
        &Rectangle::parse("E24:E26")?,
        &ListOptions {
            variable_length: true,
            ..ListOptions::default()
        },
    )?;

    let space_function = labeled_values(
        sheet,
        &Rectangle::parse("A29:B33")?,
        &LabeledOptions {
            variable_length: true,
            label_fill: VALUE_FILL,
            ..LabeledOptions::default()
        },
    )?;

    let (col, row) = find_in_column(sheet, 1, 34, "Occupancy*")?;
    let occupancy = labeled_values(
        sheet,
        &Rectangle::new(col, row + 1, col + 1, row + 5),
        &LabeledOptions {
            units: Some(units),
            ..LabeledOptions::default()
        },
    )?;

    let (col, row) = find_in_column(sheet, 1, 41, "Energy Sources**")?;
    let header = Rectangle::new(col, row + 1, col + 5, row + 1);
    expect_labels(sheet, &header, ENERGY_SOURCES_LABELS, "energy sources")?;
    let energy_sources = records(
        sheet,
        &Rectangle::open(col, row + 2, Some(col + 5), None),
        ENERGY_SOURCES_LABELS,
        &TableOptions {
            variable_length: true,
            keep_empty_cells: false,
            ..TableOptions::default()
        },
    )?;

    let (col, row) = find_in_column(sheet, 1, 54, "Facility Description - Notable Conditions")?;
    let description = sheet.value(col, row + 1).clone();

    building.insert("Occupancy".to_owned(), occupancy.into());
    building.insert("Energy Sources".to_owned(), energy_sources.into());
    building.insert("Facility Description".to_owned(), description.into());
    building.insert("Space Function".to_owned(), space_function.into());
    building.insert("Excluded Spaces".to_owned(), excluded_spaces.into());
    Ok(Record::Group(building))
}

/// Reads the `All - Metered Energy` sheet.
///
/// Each utility declared in the header gets its billing records, its
/// definition pairs and its type. The first utility is always electricity.
pub fn read_all_metered_energy(sheet: &Sheet) -> Result<Record, ExtractError> {
    let declared = labeled_values(sheet, &Rectangle::parse("A5:C8")?, &LabeledOptions::default())?;
    let mut metered = Group::new();
    for (index, utility) in UTILITIES.iter().enumerate() {
        let Some(declared_type) = declared.get(*utility) else {
            continue;
        };
        let (labels, kind) = match index {
            0 => (ELECTRICITY_LABELS, Scalar::from("Electricity")),
            _ => (UTILITY_LABELS, declared_type.clone()),
        };
        debug!("Reading metered energy of '{utility}' ({kind})");

        let mut group = Group::new();
        group.insert("Data".to_owned(), read_utility_table(sheet, utility, labels)?.into());
        group.insert("Definition".to_owned(), read_utility_definition(sheet, utility)?.into());
        group.insert("Type".to_owned(), kind.into());
        metered.insert((*utility).to_owned(), Record::Group(group));
    }
    Ok(Record::Group(metered))
}

/// Billing records start four rows below the utility caption.
fn read_utility_table(sheet: &Sheet, utility: &str, names: &[&str]) -> Result<Vec<IndexMap<String, Scalar>>, ExtractError> {
    let (col, row) = find_in_column(sheet, 1, 15, utility)?;
    let rect = Rectangle::open(col, row + 4, Some(col + names.len() as u32), None);
    records(
        sheet,
        &rect,
        &labels(names),
        &TableOptions {
            variable_length: true,
            ..TableOptions::default()
        },
    )
}

fn read_utility_definition(sheet: &Sheet, utility: &str) -> Result<IndexMap<String, Scalar>, ExtractError> {
    let (col, row) = find_in_column(sheet, 1, 15, &format!("{utility}: Definition"))?;
    labeled_values(sheet, &Rectangle::new(col, row + 1, col + 1, row + 2), &LabeledOptions::default())
}

/// Reads the `All - Delivered Energy` sheet.
pub fn read_all_delivered_energy(sheet: &Sheet) -> Result<Record, ExtractError> {
    let mut definition = labeled_values(sheet, &Rectangle::parse("C2:D4")?, &LabeledOptions::default())?;

    let (col, row) = find_in_column(sheet, 2, 5, "Delivery date")?;
    let deliveries = records(
        sheet,
        &Rectangle::open(col, row + 1, Some(col + 3), None),
        &labels(DELIVERY_LABELS),
        &TableOptions {
            variable_length: true,
            ..TableOptions::default()
        },
    )?;

    let (col, row) = find_in_column(sheet, 1, row + 1, "Estimated Annual Use**")?;
    definition.insert("Estimated Annual Use**".to_owned(), sheet.value(col + 2, row).clone());

    let mut delivered = Group::new();
    delivered.insert("Definition".to_owned(), definition.into());
    delivered.insert("Data".to_owned(), deliveries.into());
    Ok(Record::Group(delivered))
}

/// Reads the `All - Space Functions` sheet, one space per column.
pub fn read_space_functions(sheet: &Sheet) -> Result<Record, ExtractError> {
    let (col, row) = find_in_column(sheet, 1, 1, "Space Number")?;
    let last_row = row + SPACE_FUNCTIONS_HEADER.len() as u32 - 1;
    expect_labels(
        sheet,
        &Rectangle::new(col, row, col, last_row),
        &labels(SPACE_FUNCTIONS_HEADER),
        "space functions",
    )?;
    let spaces = info(
        sheet,
        &Rectangle::open(col + 1, row, None, Some(last_row)),
        &labels(SPACE_FUNCTIONS_LABELS),
        &TableOptions {
            orientation: Orientation::Columns,
            ..TableOptions::default()
        },
    )?;
    Ok(Record::Keyed(spaces))
}

/// Reads the `L1 - EEM Summary` sheet: two tables located by their header rows.
pub fn read_l1_eem_summary(sheet: &Sheet) -> Result<Record, ExtractError> {
    let low_cost_row = find_header_row(sheet, 1, 3, L1_LOW_COST_HEADER)?;
    let capital_row = find_header_row(sheet, 1, low_cost_row + 1, L1_POTENTIAL_CAPITAL_HEADER)?;

    let low_cost = keyed_rows_between(sheet, L1_LOW_COST_HEADER, low_cost_row, Some(capital_row))?;
    let capital = keyed_rows_between(sheet, L1_POTENTIAL_CAPITAL_HEADER, capital_row, None)?;

    let mut summary = Group::new();
    summary.insert(LOW_COST.to_owned(), low_cost.into());
    summary.insert(POTENTIAL_CAPITAL.to_owned(), capital.into());
    Ok(Record::Group(summary))
}

/// Reads the `L2 - Envelope` sheet.
///
/// Formula keys are resolved for `units` and each checkbox group with at least
/// one checked box is added as choices.
pub fn read_l2_envelope(sheet: &Sheet, units: UnitSystem) -> Result<Record, ExtractError> {
    let mut pairs = labeled_values(
        sheet,
        &Rectangle::parse("A3:B6")?,
        &LabeledOptions {
            units: Some(units),
            ..LabeledOptions::default()
        },
    )?;
    for range in ["A7:B10", "E12:F13", "A15:B15"] {
        pairs.extend(labeled_values(sheet, &Rectangle::parse(range)?, &LabeledOptions::default())?);
    }

    let r_values = tabular(sheet, &Rectangle::parse("E3:F5")?);
    let r_value = |index: usize| {
        r_values
            .get(index)
            .and_then(|row| row.get(1))
            .cloned()
            .unwrap_or_default()
    };
    pairs.insert("Total exposed above grade wall area R value".to_owned(), r_value(0));
    pairs.insert("Below grade wall area R value".to_owned(), r_value(1));
    pairs.insert("Roof area R value".to_owned(), r_value(2));

    let mut envelope: Group = resolve_formula_keys(pairs, units)
        .into_iter()
        .map(|(key, value)| (key, Record::Value(value)))
        .collect();
    for (group, names) in ENVELOPE_GROUPS {
        insert_choices(&mut envelope, group, sheet.checked_captions(names)?);
    }
    Ok(Record::Group(envelope))
}

/// Reads the `L2 - HVAC` sheet, which holds nothing but checkbox groups.
pub fn read_l2_hvac(sheet: &Sheet) -> Result<Record, ExtractError> {
    let mut hvac = Group::new();
    for (group, names) in HVAC_GROUPS {
        insert_choices(&mut hvac, group, prefixed_captions(sheet, names)?);
    }
    for (group, gate, names) in HVAC_GATED_GROUPS {
        if sheet.require_control(gate)?.checked {
            insert_choices(&mut hvac, group, sheet.checked_captions(names)?);
        }
    }
    for (group, prefix, textbox, fallback) in HVAC_COMPLETIONS {
        if let Some(Record::Choices(choices)) = hvac.get_mut(*group) {
            let detail = sheet.textbox(textbox).unwrap_or(*fallback);
            for choice in choices.iter_mut().filter(|choice| choice.starts_with(*prefix)) {
                *choice = format!("{prefix} ({detail})");
            }
        }
    }
    Ok(Record::Group(hvac))
}

/// Captions of checked boxes; the fired water heater boxes get their kind prepended.
fn prefixed_captions(sheet: &Sheet, names: &[&str]) -> Result<Vec<String>, ExtractError> {
    let mut captions = Vec::new();
    for name in names {
        let control = sheet.require_control(name)?;
        if !control.checked {
            continue;
        }
        let prefix = match *name {
            "Check Box 21" | "Check Box 22" => "Indirect fired - ",
            "Check Box 45" | "Check Box 46" => "Direct fired - ",
            _ => "",
        };
        captions.push(format!("{prefix}{}", control.text.as_deref().unwrap_or_default()));
    }
    Ok(captions)
}

/// Reads the `L2 Equipment Inventory` sheet, keyed by equipment ID.
pub fn read_l2_equipment_inventory(sheet: &Sheet) -> Result<Record, ExtractError> {
    let (col, row) = find_in_column(sheet, 1, 2, "ID")?;
    let last_col = col + EQUIPMENT_INVENTORY_LABELS.len() as u32 - 1;
    let header = labels(EQUIPMENT_INVENTORY_LABELS);
    expect_labels(sheet, &Rectangle::new(col, row, last_col, row), &header, "equipment inventory")?;
    let inventory = info(
        sheet,
        &Rectangle::open(col, row + 1, Some(last_col), None),
        &header,
        &TableOptions {
            variable_length: true,
            keep_empty_cells: false,
            ..TableOptions::default()
        },
    )?;
    Ok(Record::Keyed(inventory))
}

/// Reads the `L2 - Lighting Elec & Plug Loads` sheet: lighting sources, then process and plug loads.
pub fn read_l2_lighting(sheet: &Sheet) -> Result<Record, ExtractError> {
    let (lighting, row) = read_captioned_table(sheet, 1, LIGHTING_SOURCES_LABELS, "lighting source")?;
    let (loads, _) = read_captioned_table(sheet, row + 1, LOAD_LABELS, "process/plug load")?;

    let mut result = Group::new();
    result.insert(LIGHTING_SOURCES_LABELS[0].to_owned(), lighting.into());
    result.insert(LOAD_LABELS[0].to_owned(), loads.into());
    Ok(Record::Group(result))
}

/// Finds a table by its first header label, checks the header and reads the
/// filled rows below it. Also returns the header row.
fn read_captioned_table(sheet: &Sheet, min_row: u32, names: &[&str], what: &str) -> Result<(KeyedTable, u32), ExtractError> {
    let (col, row) = find_in_column(sheet, 1, min_row, names[0])?;
    let last_col = col + names.len() as u32 - 1;
    let header = labels(names);
    expect_labels(sheet, &Rectangle::new(col, row, last_col, row), &header, what)?;
    let table = info(
        sheet,
        &Rectangle::open(col, row + 1, Some(last_col), None),
        &header,
        &TableOptions {
            variable_length: true,
            ..TableOptions::default()
        },
    )?;
    Ok((table, row))
}

/// Reads the `L2 - EEM Summary` sheet: two tables between three captions.
pub fn read_l2_eem_summary(sheet: &Sheet) -> Result<Record, ExtractError> {
    let (_, low_cost_row) = find_in_column(sheet, 1, 5, LOW_COST)?;
    let (_, capital_row) = find_in_column(sheet, 1, 14, POTENTIAL_CAPITAL)?;
    let (_, totals_row) = find_in_column(sheet, 1, 15, "TOTALS (Recommended Measures)")?;

    let low_cost = keyed_rows_between(sheet, L2_EEM_LABELS, low_cost_row, Some(capital_row))?;
    let capital = keyed_rows_between(sheet, L2_EEM_LABELS, capital_row, Some(totals_row))?;

    let mut summary = Group::new();
    summary.insert(LOW_COST.to_owned(), low_cost.into());
    summary.insert(POTENTIAL_CAPITAL.to_owned(), capital.into());
    Ok(Record::Group(summary))
}

/// Keyed records on the rows strictly between `header_row` and `end_row`,
/// or to the end of the sheet, spanning one column per label from column A.
fn keyed_rows_between(sheet: &Sheet, names: &[&str], header_row: u32, end_row: Option<u32>) -> Result<KeyedTable, ExtractError> {
    let first_row = header_row + 1;
    let last_row = end_row.map(|row| row.saturating_sub(1));
    if last_row.is_some_and(|last_row| last_row < first_row) {
        return Ok(KeyedTable::new());
    }
    let rect = Rectangle::open(1, first_row, Some(names.len() as u32), last_row);
    info(sheet, &rect, &labels(names), &TableOptions::default())
}

fn find_in_column(sheet: &Sheet, col: u32, min_row: u32, caption: &str) -> Result<(u32, u32), ExtractError> {
    find_value(sheet, &Rectangle::open(col, min_row, Some(col), None), &Scalar::from(caption))
}

/// Groups without any checked box are left out.
fn insert_choices(group: &mut Group, name: &str, choices: Vec<String>) {
    if !choices.is_empty() {
        group.insert(name.to_owned(), Record::Choices(choices));
    }
}
