//! Station name normalization
//!
//! The pulse aggregates and the station table spell names differently
//! ("Times Sq-42 St" vs "TIMES SQ 42 ST"); both reduce to the same key.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_NON_ALNUM: Regex = Regex::new(r"[^a-zA-Z0-9]").unwrap();
}

/// Lowercase with every non-alphanumeric character removed
pub fn normalize_key(name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => RE_NON_ALNUM.replace_all(name, "").to_lowercase(),
        _ => String::new(),
    }
}
