use std::collections::BTreeMap;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use datahub_cli::pipeline::{ProcessOutcome, ScheduleAlert};
use datahub_metadata::Metadata;
use datahub_model::Priority;

pub fn print_outcome(key: &str, outcome: &ProcessOutcome) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Status"),
        header_cell("Code"),
        header_cell("Priority"),
        header_cell("Rows"),
        header_cell("Notified"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);

    let row = match outcome {
        ProcessOutcome::OutOfScope => vec![
            Cell::new(key),
            dim_cell(outcome.label()),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
        ],
        ProcessOutcome::Success {
            identity,
            row_count,
        } => vec![
            Cell::new(identity.file_path()),
            Cell::new(outcome.label())
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
            dim_cell("-"),
            dim_cell("-"),
            count_cell(*row_count),
            dim_cell("-"),
        ],
        ProcessOutcome::Failed { record, notified } => vec![
            Cell::new(&record.file_path),
            Cell::new(outcome.label())
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
            Cell::new(record.error_code.code()),
            priority_cell(record.priority),
            count_cell(record.file_no_of_rows),
            flag_cell(*notified),
        ],
        ProcessOutcome::Unreadable { identity, .. } => vec![
            Cell::new(identity.file_path()),
            Cell::new(outcome.label()).fg(Color::Yellow),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
        ],
    };
    table.add_row(row);
    println!("{table}");

    match outcome {
        ProcessOutcome::Failed { record, .. } => {
            println!("{}:{}", record.error_type, record.description);
        }
        ProcessOutcome::Unreadable { reason, .. } => eprintln!("Cannot read file: {reason}"),
        _ => {}
    }
}

pub fn print_schedule(alerts: &[ScheduleAlert]) {
    if alerts.is_empty() {
        println!("All scheduled files received.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Partner"),
        header_cell("Time check"),
        header_cell("Missing file"),
        header_cell("Notified"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Center);
    for alert in alerts {
        for (index, file) in alert.missing.files.iter().enumerate() {
            let first = index == 0;
            table.add_row(vec![
                if first {
                    partner_cell(&alert.missing.partner)
                } else {
                    dim_cell("")
                },
                if first {
                    Cell::new(&alert.missing.time_check)
                } else {
                    dim_cell("")
                },
                Cell::new(file),
                if first {
                    flag_cell(alert.notified)
                } else {
                    dim_cell("")
                },
            ]);
        }
    }
    println!("{table}");
}

pub fn print_metadata(metadata: &Metadata) {
    let mut files: BTreeMap<_, (usize, usize)> = BTreeMap::new();
    for row in metadata.schema_rows() {
        let entry = files.entry(row.schema_key()).or_default();
        entry.0 += 1;
        if row.unique_pk {
            entry.1 += 1;
        }
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Partner"),
        header_cell("Program"),
        header_cell("Folder"),
        header_cell("File"),
        header_cell("Fields"),
        header_cell("PK fields"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for (key, (fields, pk)) in &files {
        table.add_row(vec![
            partner_cell(&key.partner),
            Cell::new(&key.program),
            Cell::new(&key.folder),
            Cell::new(&key.file),
            Cell::new(fields),
            count_cell(Some(*pk)),
        ]);
    }
    println!("{table}");
    println!(
        "Field rules: {}  Folders: {}",
        metadata.field_rules().len(),
        metadata.folder_paths().len()
    );

    if metadata.schedules().is_empty() {
        return;
    }
    let mut schedules = Table::new();
    schedules.set_header(vec![
        header_cell("Partner"),
        header_cell("Run hours"),
        header_cell("Programs"),
        header_cell("Swaps"),
        header_cell("Ignored"),
    ]);
    apply_table_style(&mut schedules);
    for schedule in metadata.schedules() {
        let swaps: Vec<String> = schedule
            .swap_files
            .iter()
            .flat_map(|(scope, swaps)| {
                swaps
                    .iter()
                    .map(move |swap| format!("{scope}: {} -> {}", swap.from, swap.to))
            })
            .collect();
        let ignored: Vec<String> = schedule
            .ignore_files
            .iter()
            .map(|(scope, files)| format!("{scope}: {}", files.join(", ")))
            .collect();
        schedules.add_row(vec![
            partner_cell(&schedule.partner),
            Cell::new(schedule.run_hours.iter().cloned().collect::<Vec<_>>().join(", ")),
            Cell::new(schedule.programs.join(", ")),
            list_cell(&swaps),
            list_cell(&ignored),
        ]);
    }
    println!("{schedules}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
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

fn partner_cell(partner: &str) -> Cell {
    Cell::new(partner)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn priority_cell(priority: Priority) -> Cell {
    match priority {
        Priority::Critical => Cell::new(priority)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Priority::Urgent => Cell::new(priority).fg(Color::Yellow),
    }
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn count_cell(count: Option<usize>) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

fn list_cell(values: &[String]) -> Cell {
    if values.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(values.join("\n"))
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
