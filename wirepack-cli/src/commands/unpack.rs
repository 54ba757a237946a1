use super::read_input;
use anyhow::{Context, Result};
use std::fs;
use tracing::{info, warn};
use wirepack_core::{Field, FieldKind, Packer};

/// Outcome of decoding a byte stream against a layout
#[derive(Debug)]
pub struct Unpacked {
    pub fields: Vec<Field>,
    /// Bytes left after the last field
    pub trailing: usize,
}

/// Decode `data` in place as the fields named by `layout`
pub fn unpack_bytes(data: &mut [u8], layout: &str) -> Result<Unpacked> {
    let kinds = FieldKind::parse_layout(layout)
        .with_context(|| format!("Invalid layout: {}", layout))?;

    if data.is_empty() {
        anyhow::ensure!(
            kinds.is_empty(),
            "Input is empty but layout expects {} fields",
            kinds.len()
        );
        return Ok(Unpacked {
            fields: Vec::new(),
            trailing: 0,
        });
    }

    let mut packer = Packer::bound(data)?;
    let fields = packer
        .pop_layout(&kinds)
        .with_context(|| format!("Input does not match layout {}", layout))?;

    Ok(Unpacked {
        fields,
        trailing: packer.remaining(),
    })
}

pub fn execute(input: &str, layout: &str, output: Option<&str>) -> Result<()> {
    info!("Unpacking {} with layout {}", input, layout);

    let mut data = read_input(input)?;
    let unpacked = unpack_bytes(&mut data, layout)?;

    if unpacked.trailing > 0 {
        warn!("{} trailing bytes after last field", unpacked.trailing);
    }

    let json = serde_json::to_string_pretty(&unpacked.fields)?;

    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write output file: {}", path))?;
            info!("Wrote {} fields to {}", unpacked.fields.len(), path);
        }
        None => println!("{}", json),
    }

    Ok(())
}
