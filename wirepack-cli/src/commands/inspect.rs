use super::read_input;
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use tracing::info;
use wirepack_core::constants::LENGTH_PREFIX_SIZE;
use wirepack_core::{Field, FieldKind, PackError, Packer};

const HEX_ROW: usize = 16;

/// Where one field sits in the input
#[derive(Debug, Serialize)]
pub struct FieldSpan {
    pub offset: usize,
    pub size: usize,
    #[serde(flatten)]
    pub field: Field,
}

/// Result of walking a layout over the input
#[derive(Debug, Serialize)]
pub struct Report {
    pub total_bytes: usize,
    pub spans: Vec<FieldSpan>,
    /// Set when the walk stopped before the layout was exhausted
    pub error: Option<String>,
    pub trailing: usize,
}

/// Walk `layout` over `data`, recording each field's span
///
/// Stops at the first field that cannot be decoded.
pub fn walk(data: &mut [u8], layout: &[FieldKind]) -> Report {
    let total_bytes = data.len();
    let mut spans = Vec::new();

    if data.is_empty() {
        let error = layout.first().map(|kind| {
            let needed = kind.fixed_width().unwrap_or(LENGTH_PREFIX_SIZE);
            format!(
                "{} at offset 0: {}",
                kind,
                PackError::OutOfRange { needed, available: 0 }
            )
        });
        return Report {
            total_bytes,
            spans,
            error,
            trailing: 0,
        };
    }

    let mut error = None;
    let mut packer = match Packer::bound(data) {
        Ok(packer) => packer,
        Err(e) => {
            return Report {
                total_bytes,
                spans,
                error: Some(e.to_string()),
                trailing: total_bytes,
            }
        }
    };

    for &kind in layout {
        let offset = packer.read_position();
        match packer.pop_field(kind) {
            Ok(field) => spans.push(FieldSpan {
                offset,
                size: packer.read_position() - offset,
                field,
            }),
            Err(e) => {
                error = Some(format!("{} at offset {}: {}", kind, offset, e));
                break;
            }
        }
    }

    Report {
        total_bytes,
        spans,
        error,
        trailing: packer.remaining(),
    }
}

/// Format `data` as offset / hex / ascii rows
pub fn hex_dump(data: &[u8]) -> String {
    data.chunks(HEX_ROW)
        .enumerate()
        .map(|(row, chunk)| {
            let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
            let ascii: String = chunk
                .iter()
                .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
                .collect();
            format!(
                "{:08x}  {:<width$}  {}",
                row * HEX_ROW,
                hex.join(" "),
                ascii,
                width = HEX_ROW * 3 - 1
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe(field: &Field) -> String {
    match field {
        Field::String(s) => format!("{:?}", s),
        Field::Binary(b) => format!("0x{}", hex::encode(b.as_slice())),
        Field::Int8(v) => v.to_string(),
        Field::Int16(v) => v.to_string(),
        Field::Int32(v) => v.to_string(),
        Field::Int64(v) => v.to_string(),
        Field::Uint8(v) => v.to_string(),
        Field::Uint16(v) => v.to_string(),
        Field::Uint32(v) => v.to_string(),
        Field::Uint64(v) => v.to_string(),
        Field::Float32(v) => v.to_string(),
        Field::Float64(v) => v.to_string(),
    }
}

pub fn execute(input: &str, layout: Option<&str>, json: bool) -> Result<()> {
    info!("Inspecting {}", input);

    let mut data = read_input(input)?;

    let kinds = match layout {
        Some(layout) => FieldKind::parse_layout(layout)
            .with_context(|| format!("Invalid layout: {}", layout))?,
        None => Vec::new(),
    };

    if !json {
        println!("\n{}", "=== Bytes ===".bold());
        println!("Total: {} bytes", data.len());
        if !data.is_empty() {
            println!("{}", hex_dump(&data));
        }
    }

    if layout.is_none() {
        return Ok(());
    }

    let report = walk(&mut data, &kinds);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n{}", "=== Fields ===".bold());
    println!("{:<8} {:<6} {:<8} Value", "Offset", "Size", "Kind");
    for span in &report.spans {
        println!(
            "{:<8} {:<6} {:<8} {}",
            span.offset,
            span.size,
            span.field.kind().to_string(),
            describe(&span.field)
        );
    }

    println!();
    match &report.error {
        None => println!(
            "{} {} of {} fields decoded",
            "✓".green(),
            report.spans.len(),
            kinds.len()
        ),
        Some(e) => println!("{} {}", "✗".red(), e.red()),
    }

    if report.trailing > 0 {
        println!("{} {} trailing bytes", "!".yellow(), report.trailing);
    }

    Ok(())
}
