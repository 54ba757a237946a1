use anyhow::{Context, Result};
use std::fs;
use tracing::info;
use wirepack_core::{Field, Packer};

/// Pack a list of fields into wire bytes
pub fn pack_fields(fields: &[Field], capacity: usize) -> Result<Vec<u8>> {
    let mut packer = Packer::builder().capacity(capacity).build()?;

    for (i, field) in fields.iter().enumerate() {
        packer
            .push_field(field)
            .with_context(|| format!("Failed to pack field {} ({})", i, field.kind()))?;
    }

    Ok(packer.into_bytes().to_vec())
}

pub fn execute(input: &str, output: &str, capacity: usize) -> Result<()> {
    info!("Packing fields from {} to {}", input, output);

    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input))?;

    let fields: Vec<Field> =
        serde_json::from_str(&content).with_context(|| "Failed to parse JSON input")?;

    info!("Found {} fields to pack", fields.len());

    let packed = pack_fields(&fields, capacity)?;

    fs::write(output, &packed)
        .with_context(|| format!("Failed to write output file: {}", output))?;

    info!(
        "Successfully packed {} fields ({} bytes total)",
        fields.len(),
        packed.len()
    );

    Ok(())
}
