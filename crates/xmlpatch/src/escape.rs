//! Entity decoding and markup escaping

use std::borrow::Cow;

/// Decode entity and character references.
///
/// Borrows when the input has no `&`. On failure returns the offending
/// reference body (the part between `&` and `;`).
pub fn decode(input: &str) -> Result<Cow<'_, str>, String> {
    if !input.contains('&') {
        return Ok(Cow::Borrowed(input));
    }

    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        let (before, after) = rest.split_at(amp);
        result.push_str(before);
        let after = after.get(1..).unwrap_or_default();

        let Some(semi) = after.find(';') else {
            return Err(after.chars().take(16).collect());
        };
        let (entity, tail) = after.split_at(semi);
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric(entity),
        };
        match decoded {
            Some(ch) => result.push(ch),
            None => return Err(entity.to_string()),
        }
        rest = tail.get(1..).unwrap_or_default();
    }
    result.push_str(rest);

    Ok(Cow::Owned(result))
}

fn decode_numeric(entity: &str) -> Option<char> {
    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()?
    } else {
        return None;
    };
    char::from_u32(code).filter(|ch| *ch != '\0')
}

/// Escape character data: `&`, `<`, `>`
pub fn escape_text(input: &str) -> Cow<'_, str> {
    escape_with(input, |ch| match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    })
}

/// Escape a double-quoted attribute value: `&`, `<`, `>`, `"`
pub fn escape_attribute(input: &str) -> Cow<'_, str> {
    escape_with(input, |ch| match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        _ => None,
    })
}

fn escape_with(input: &str, replacement: impl Fn(char) -> Option<&'static str>) -> Cow<'_, str> {
    if !input.chars().any(|ch| replacement(ch).is_some()) {
        return Cow::Borrowed(input);
    }
    let mut output = String::with_capacity(input.len() + 8);
    for ch in input.chars() {
        match replacement(ch) {
            Some(escaped) => output.push_str(escaped),
            None => output.push(ch),
        }
    }
    Cow::Owned(output)
}

pub(crate) const fn is_name_start(b: u8) -> bool {
    // bytes >= 0x80 belong to non-ascii chars, accepted as opaque name chars
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':' | 0x80..=0xFF)
}

pub(crate) const fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

/// Whether `name` is usable as an element or attribute name
pub fn is_valid_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(first) if is_name_start(first) => bytes.all(is_name_char),
        _ => false,
    }
}
