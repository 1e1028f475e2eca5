// ---------------------------------------------------------------------------
// Numeric cell classification
// ---------------------------------------------------------------------------

/// Parse a raw cell as a finite `f64`.
///
/// Surrounding whitespace is ignored. Signed, decimal and scientific forms
/// (`"+5"`, `"-1.23e-4"`, `".5"`) are accepted. Textual specials such as
/// `"NaN"`, `"inf"` or `"Infinity"` are rejected even though `f64::from_str`
/// understands them, so a cell holding them counts as missing.
pub fn parse_numeric(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whether `token` trims to a finite float literal.
pub fn is_numeric(token: &str) -> bool {
    parse_numeric(token).is_some()
}
