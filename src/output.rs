//! # Output
//!
//! Renders converted services as a `docker stack services` style table, JSON
//! or YAML.

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::swarm::SwarmService;

/// Width `docker service ls` truncates IDs to
const SHORT_ID_LEN: usize = 12;

const HEADERS: [&str; 6] = ["ID", "NAME", "MODE", "REPLICAS", "IMAGE", "PORTS"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns
    #[default]
    Table,
    /// Swarm API JSON
    Json,
    Yaml,
}

/// Render services in `format`
///
/// # Errors
///
/// Fails only if serialization fails.
pub fn render(services: &[SwarmService], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(services)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(services).context("Failed to serialize services as JSON")
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(services).context("Failed to serialize services as YAML")
        }
    }
}

/// Render services as an aligned table with a header row
#[must_use]
pub fn render_table(services: &[SwarmService]) -> String {
    let rows: Vec<[String; 6]> = services.iter().map(table_row).collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut table = String::new();
    write_row(&mut table, &HEADERS.map(str::to_string), &widths);
    for row in &rows {
        write_row(&mut table, row, &widths);
    }
    table
}

fn table_row(service: &SwarmService) -> [String; 6] {
    let status = service.service_status;
    let ports: Vec<String> = service
        .endpoint
        .ports
        .iter()
        .map(ToString::to_string)
        .collect();

    [
        service.id.chars().take(SHORT_ID_LEN).collect(),
        service.name().to_string(),
        service.spec.mode.to_string(),
        format!("{}/{}", status.running_tasks, status.desired_tasks),
        service.spec.task_template.container_spec.image.clone(),
        ports.join(", "),
    ]
}

fn write_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let mut line = String::new();
    for (position, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if position + 1 == cells.len() {
            line.push_str(cell);
        } else {
            let width = *width;
            line.push_str(&format!("{cell:<width$}   "));
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
