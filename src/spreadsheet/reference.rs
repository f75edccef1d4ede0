//! Conversions between A1-style cell references and 1-based (column, row) coordinates.

/// Converts column letters ("A", "AB", "$C") to a 1-based column number.
pub(crate) fn col_to_index(letters: &str) -> Option<u32> {
    let letters = letters.trim_start_matches('$');
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    let mut index = 0u32;
    for character in letters.chars() {
        if !character.is_ascii_alphabetic() {
            return None;
        }
        index = index * 26 + (character.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }
    Some(index)
}

/// Converts row digits ("1", "$42") to a 1-based row number.
pub(crate) fn row_to_index(digits: &str) -> Option<u32> {
    match digits.trim_start_matches('$').parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(row) => Some(row),
    }
}

/// Converts 1-based column number to column letters.
pub(crate) fn index_to_col(mut col: u32) -> String {
    let mut letters = String::new();
    while col > 0 {
        col -= 1;
        letters.insert(0, char::from(b'A' + (col % 26) as u8));
        col /= 26;
    }
    letters
}

/// Parses a cell reference such as "B7" into 1-based (column, row).
pub(crate) fn reference_to_index(reference: &str) -> Option<(u32, u32)> {
    let reference = reference.replace('$', "");
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let col = col_to_index(&reference[..split])?;
    let row = row_to_index(&reference[split..])?;
    Some((col, row))
}

/// Formats 1-based (column, row) as a cell reference.
pub(crate) fn index_to_reference(col: u32, row: u32) -> String {
    format!("{}{}", index_to_col(col), row)
}
