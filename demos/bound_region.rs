//! Writing into a caller-owned region

use wirepack_core::{ErrorKind, Packer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Wirepack Bound Region Example\n");

    let mut region = [0u8; 24];

    {
        let mut packer = Packer::bound(&mut region)?;
        // A bound region starts out fully occupied; clear it to write from the start
        packer.reset();

        let mut count = 0;
        loop {
            match packer.push_str("frame") {
                Ok(()) => count += 1,
                Err(e) if e.kind() == ErrorKind::Logic => {
                    println!("Region full after {} strings: {}", count, e);
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        println!("Occupied {} of {} bytes", packer.len(), packer.capacity());
    }

    // The caller still owns the bytes; read them back through a fresh packer
    let mut reader = Packer::bound(&mut region)?;
    let len = reader.pop_string_into(None)?;
    let mut first = vec![0u8; len + 1];
    reader.pop_string_into(Some(&mut first[..]))?;
    println!("First field: {}", String::from_utf8_lossy(&first[..len]));

    Ok(())
}
