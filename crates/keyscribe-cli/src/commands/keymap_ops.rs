use std::process;

use keyscribe_core::keymap::{codes_for_char, VirtualKey};

/// Highest code the Windows virtual-key space uses.
const MAX_CODE: u32 = 0xFF;

/// `(code, key)` for every mapped code, in code order.
pub fn key_table() -> Vec<(u32, VirtualKey)> {
    (0..=MAX_CODE)
        .filter_map(|code| VirtualKey::from_code(code).map(|key| (code, key)))
        .collect()
}

/// Codes that type `text`, failing on the first character with no key.
pub fn codes_for_text(text: &str) -> Result<Vec<u32>, char> {
    let mut codes = Vec::new();
    for ch in text.chars() {
        codes.extend(codes_for_char(ch).ok_or(ch)?);
    }
    Ok(codes)
}

pub fn keys() {
    for (code, key) in key_table() {
        let literal = match (key.literal(false), key.literal(true)) {
            (Some(plain), Some(shifted)) if plain != shifted => format!("{plain:?} / {shifted:?}"),
            (Some(plain), _) => format!("{plain:?}"),
            _ => String::new(),
        };
        println!("{code:>3}\t{key}\t{literal}");
    }
}

pub fn codes(text: &str) {
    let codes = codes_for_text(text).unwrap_or_else(|ch| {
        eprintln!("Error: no key types {ch:?}");
        process::exit(1);
    });
    let line: Vec<String> = codes.iter().map(u32::to_string).collect();
    println!("{}", line.join(" "));
}
