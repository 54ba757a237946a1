//! Fuzzing entry points for wirepack-core readers
//!
//! Each function accepts arbitrary bytes and must never panic. They are
//! plain functions so any fuzz driver (or a unit test) can call them.

use wirepack_core::{FieldKind, Packer};

/// Split `data` into a layout header and a body, then decode the body
///
/// The first byte gives the number of layout entries; each following byte
/// picks a field kind.
pub fn fuzz_unpack(data: &[u8]) {
    let Some((&count, rest)) = data.split_first() else {
        return;
    };
    let count = (count as usize).min(rest.len());
    let (selectors, body) = rest.split_at(count);

    let layout: Vec<FieldKind> = selectors
        .iter()
        .map(|&b| FieldKind::ALL[b as usize % FieldKind::ALL.len()])
        .collect();

    // Should either decode or return an error, never panic
    let _ = wirepack_core::types::unpack_layout(body, &layout);
}

/// Drive a bound packer with operations chosen by `data` itself
pub fn fuzz_bound(data: &[u8]) {
    let mut region = data.to_vec();
    let Ok(mut packer) = Packer::bound(&mut region) else {
        return;
    };

    let mut scratch = [0u8; 8];
    for &op in data.iter().take(64) {
        let _ = match op % 8 {
            0 => packer.pop_i32().map(drop),
            1 => packer.pop_f64().map(drop),
            2 => packer.pop_string_into(None).map(drop),
            3 => packer.pop_string_into(Some(&mut scratch[..])).map(drop),
            4 => packer.pop_binary_into(Some(&mut scratch[..])).map(drop),
            5 => packer.pop_raw(op as usize >> 3).map(drop),
            6 => packer.pop_reset(op as usize >> 3).map(drop),
            _ => packer.push_u16(op as u16).map(drop),
        };
        assert!(packer.read_position() <= packer.len());
    }
}
