//! Include/import directive stripping.
//!
//! Directive lines are blanked rather than removed so line numbers in
//! preprocessor diagnostics still point at the original source line.
//! Sources are handled as bytes, so files in legacy encodings pass through
//! unchanged.

const DIRECTIVES: &[&[u8]] = &[b"include_next", b"include", b"import"];

/// Blank every include or import directive line in `source`.
///
/// Line terminators (`\n` or `\r\n`) are preserved, and so is a missing
/// terminator on the last line.
pub fn strip_includes(source: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(source.len());
    for line in source.split_inclusive(|&byte| byte == b'\n') {
        let (body, ending) = split_line_ending(line);
        if !is_include_directive(body) {
            out.extend_from_slice(body);
        }
        out.extend_from_slice(ending);
    }
    out
}

/// Whether a single line (without terminator) is an include-like directive.
///
/// Recognises `#include`, `#import`, `#include_next` with optional
/// whitespace around the `#`, and Objective-C module imports (`@import`).
pub fn is_include_directive(line: &[u8]) -> bool {
    let line = line.trim_ascii_start();
    if let Some(rest) = line.strip_prefix(b"#") {
        let rest = rest.trim_ascii_start();
        DIRECTIVES
            .iter()
            .any(|directive| starts_with_word(rest, directive))
    } else if let Some(rest) = line.strip_prefix(b"@") {
        starts_with_word(rest, b"import")
    } else {
        false
    }
}

/// `text` starts with `word` followed by a non-identifier byte or EOL.
fn starts_with_word(text: &[u8], word: &[u8]) -> bool {
    text.strip_prefix(word).is_some_and(|rest| {
        rest.first()
            .is_none_or(|&byte| !(byte.is_ascii_alphanumeric() || byte == b'_'))
    })
}

fn split_line_ending(line: &[u8]) -> (&[u8], &[u8]) {
    if let Some(body) = line.strip_suffix(b"\r\n") {
        (body, &b"\r\n"[..])
    } else if let Some(body) = line.strip_suffix(b"\n") {
        (body, &b"\n"[..])
    } else {
        (line, &[][..])
    }
}
