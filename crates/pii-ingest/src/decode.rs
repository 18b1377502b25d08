//! Byte decoding for the supported text encodings.

use std::borrow::Cow;

use encoding_rs::UTF_8;

use crate::options::TextEncoding;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode raw file bytes. The error string describes the first problem found.
pub fn decode_bytes(bytes: &[u8], encoding: TextEncoding) -> Result<String, String> {
    match encoding {
        TextEncoding::Utf8 => {
            let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
            UTF_8
                .decode_without_bom_handling_and_without_replacement(body)
                .map(Cow::into_owned)
                .ok_or_else(|| "invalid UTF-8 byte sequence".to_string())
        }
        TextEncoding::Latin1 => Ok(encoding_rs::mem::decode_latin1(bytes).into_owned()),
        TextEncoding::UnicodeEscape => {
            let text = encoding_rs::mem::decode_latin1(bytes);
            unescape(&text)
        }
    }
}

/// Resolve backslash escapes: `\\ \' \" \a \b \f \n \r \t \v`, octal
/// `\ooo`, `\xHH`, `\uHHHH`, `\UHHHHHHHH` and line continuations. Unknown
/// escapes (including `\N{...}`) are kept verbatim.
pub fn unescape(text: &str) -> Result<String, String> {
    if !text.contains('\\') {
        return Ok(text.to_string());
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    while let Some((pos, ch)) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some((_, escape)) = chars.next() else {
            return Err(format!("\\ at end of input (offset {pos})"));
        };
        match escape {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0B}'),
            '0'..='7' => {
                let mut value = escape.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|(_, next)| next.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(code_point(value, pos)?);
            }
            'x' | 'u' | 'U' => {
                let width = match escape {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let mut value = 0u32;
                for _ in 0..width {
                    let digit = chars
                        .next()
                        .and_then(|(_, next)| next.to_digit(16))
                        .ok_or_else(|| format!("truncated \\{escape} escape at offset {pos}"))?;
                    value = value * 16 + digit;
                }
                out.push(code_point(value, pos)?);
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    Ok(out)
}

fn code_point(value: u32, pos: usize) -> Result<char, String> {
    char::from_u32(value)
        .ok_or_else(|| format!("illegal Unicode character U+{value:X} at offset {pos}"))
}
