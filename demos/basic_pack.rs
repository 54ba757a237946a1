//! Basic packing example

use wirepack_core::Packer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Wirepack Basic Packing Example\n");

    // Start small so the buffer has to grow
    let mut packer = Packer::with_capacity(4);

    for i in 1..=5u32 {
        packer.push_u32(i)?;
        packer.push_str(&format!("reading #{}", i))?;
        packer.push_f64(20.0 + f64::from(i) * 0.5)?;

        println!(
            "Record {}: {} bytes occupied, capacity {}",
            i,
            packer.len(),
            packer.capacity()
        );
    }

    println!();

    // Pop the records back in the order they were pushed
    while packer.remaining() > 0 {
        let id = packer.pop_u32()?;
        let label = packer.pop_str()?;
        let value = packer.pop_f64()?;
        println!("{:>2}  {:<12} {:.1}", id, label, value);
    }

    std::fs::write("example_output.bin", packer.as_bytes())?;
    println!("\nWrote {} bytes to example_output.bin", packer.len());
    println!("Use 'wirepack unpack --input example_output.bin --layout uint32,string,float64' to read the first record");

    Ok(())
}
