// crates/localized-pages-core/src/format.rs
// ============================================================================
// Module: Positional Formatting
// Description: printf-style positional substitution for translated strings.
// Purpose: Back the template `format` helper used with translation values.
// Dependencies: Standard library only.
// ============================================================================

//! ## Overview
//! Translation values such as `"Hello, %s!"` carry positional verbs.
//! [`format_positional`] substitutes them in order:
//! - `%s` and `%v` consume the next argument.
//! - `%%` emits a literal `%`.
//! - A verb with no argument left renders as `%!s(MISSING)`.
//! - Unknown verbs and a trailing `%` are emitted unchanged.
//! - Surplus arguments are ignored.

/// Substitutes positional `%s`/`%v` verbs in `pattern` with `args`.
#[must_use]
pub fn format_positional<S: AsRef<str>>(pattern: &str, args: &[S]) -> String {
    let mut output = String::with_capacity(pattern.len());
    let mut remaining = args.iter();
    let mut chars = pattern.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            output.push(ch);
            continue;
        }
        match chars.peek().copied() {
            Some('%') => {
                chars.next();
                output.push('%');
            }
            Some(verb @ ('s' | 'v')) => {
                chars.next();
                match remaining.next() {
                    Some(arg) => output.push_str(arg.as_ref()),
                    None => {
                        output.push_str("%!");
                        output.push(verb);
                        output.push_str("(MISSING)");
                    }
                }
            }
            _ => output.push('%'),
        }
    }
    output
}
