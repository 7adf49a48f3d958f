use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use triage_score::{ScoringVariant, Selection, VariantTally};

use crate::commands::AssessOutcome;

pub fn print_summary(outcome: &AssessOutcome) {
    let assessment = &outcome.assessment;
    println!("Patients: {}", outcome.patients);
    println!("Expected high-risk count: {}", outcome.expected_high_risk);
    println!(
        "{}",
        variant_table(&assessment.tallies, &assessment.selection)
    );

    let results = &assessment.results;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Result set"), header_cell("Patients")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("high_risk_patients"),
        count_cell(results.high_risk_patients.len(), Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("fever_patients"),
        count_cell(results.fever_patients.len(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("data_quality_issues"),
        count_cell(results.data_quality_issues.len(), Color::Magenta),
    ]);
    println!("{table}");

    if !assessment.selection.exact {
        eprintln!(
            "Warning: no scoring variant matched {} high-risk patients; using {} ({} patients)",
            outcome.expected_high_risk,
            assessment.selected_variant(),
            assessment.selection.count
        );
    }
    if let Some(path) = &outcome.output {
        println!("Payload: {}", path.display());
    }
    if let Some(reply) = &outcome.submission {
        println!("Submission response:");
        match serde_json::to_string_pretty(reply) {
            Ok(pretty) => println!("{pretty}"),
            Err(_) => println!("{reply}"),
        }
    }
}

pub fn print_variants(variants: &[ScoringVariant]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variant"),
        header_cell("Normal BP baseline"),
        header_cell("Under-40 baseline"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for variant in variants {
        table.add_row(vec![
            variant_cell(&variant.name, false),
            Cell::new(variant.bp_normal_baseline),
            Cell::new(variant.age_under_40_baseline),
        ]);
    }
    println!("{table}");
}

/// Per-variant high-risk counts, with the selected variant marked.
pub fn variant_table(tallies: &[VariantTally], selection: &Selection) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variant"),
        header_cell("Normal BP"),
        header_cell("Under 40"),
        header_cell("High-risk"),
        header_cell("Selected"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for (index, tally) in tallies.iter().enumerate() {
        let selected = index == selection.index;
        table.add_row(vec![
            variant_cell(&tally.variant.name, selected),
            Cell::new(tally.variant.bp_normal_baseline),
            Cell::new(tally.variant.age_under_40_baseline),
            Cell::new(tally.count()),
            selected_cell(selected, selection.exact),
        ]);
    }
    table
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn variant_cell(name: &str, selected: bool) -> Cell {
    if selected {
        Cell::new(name)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new(name)
    }
}

fn selected_cell(selected: bool, exact: bool) -> Cell {
    match (selected, exact) {
        (true, true) => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        (true, false) => Cell::new("~").fg(Color::Yellow).add_attribute(Attribute::Bold),
        (false, _) => dim_cell("-"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
