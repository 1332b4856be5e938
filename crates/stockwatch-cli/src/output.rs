use std::io::{self, Write};

use serde_json::Value;

use crate::cli::OutputFormat;
use crate::commands::Response;
use crate::error::CliError;
use crate::metadata::Envelope;

/// Plain column/row view of a command result for `--format table`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths = self.headers.iter().map(String::len).collect::<Vec<_>>();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }
        widths
    }

    /// Left-aligned first column, right-aligned values.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let widths = self.widths();
        write_row(out, &self.headers, &widths)?;
        let rule = widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(out, "{rule}")?;
        for row in &self.rows {
            write_row(out, row, &widths)?;
        }
        Ok(())
    }
}

fn write_row<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(index, (cell, &width))| {
            if index == 0 {
                format!("{cell:<width$}")
            } else {
                format!("{cell:>width$}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", line.trim_end())
}

pub fn render(response: &Response, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match (format, &response.table) {
        (OutputFormat::Table, Some(table)) => {
            render_meta(&mut out, &response.envelope)?;
            table.write_to(&mut out)?;
        }
        (OutputFormat::Table, None) => {
            render_meta(&mut out, &response.envelope)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&response.envelope.data)?)?;
        }
        (OutputFormat::Json, _) => {
            let payload = if pretty {
                serde_json::to_string_pretty(&response.envelope)?
            } else {
                serde_json::to_string(&response.envelope)?
            };
            writeln!(out, "{payload}")?;
        }
    }

    Ok(())
}

fn render_meta<W: Write>(out: &mut W, envelope: &Envelope<Value>) -> io::Result<()> {
    writeln!(out, "request_id  : {}", envelope.meta.request_id)?;
    writeln!(out, "generated_at: {}", envelope.meta.generated_at)?;
    writeln!(out, "source      : {}", envelope.meta.source)?;
    writeln!(out, "latency_ms  : {}", envelope.meta.latency_ms)?;
    for warning in &envelope.meta.warnings {
        writeln!(out, "warning     : {warning}")?;
    }
    writeln!(out)
}
