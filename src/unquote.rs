//! Unescaping of double-quoted string literals.

/// Interprets `raw`, which must include both delimiting quotes, as a quoted
/// string literal and returns its value. `None` for anything malformed:
/// missing quotes, raw newlines, unknown escapes, out-of-range code points,
/// or byte escapes that do not form valid UTF-8.
pub(crate) fn unquote(raw: &str) -> Option<String> {
    let body = raw.strip_prefix('"')?.strip_suffix('"')?;
    let mut bytes: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => unescape(&mut chars, &mut bytes)?,
            c => push_char(&mut bytes, c),
        }
    }

    String::from_utf8(bytes).ok()
}

fn unescape(chars: &mut std::str::Chars, bytes: &mut Vec<u8>) -> Option<()> {
    match chars.next()? {
        'a' => bytes.push(0x07),
        'b' => bytes.push(0x08),
        'f' => bytes.push(0x0c),
        'n' => bytes.push(b'\n'),
        'r' => bytes.push(b'\r'),
        't' => bytes.push(b'\t'),
        'v' => bytes.push(0x0b),
        '\\' => bytes.push(b'\\'),
        '"' => bytes.push(b'"'),
        'x' => bytes.push(u8::try_from(read_digits(chars, 2, 16)?).ok()?),
        'u' => push_char(bytes, char::from_u32(read_digits(chars, 4, 16)?)?),
        'U' => push_char(bytes, char::from_u32(read_digits(chars, 8, 16)?)?),
        first @ '0'..='7' => {
            let rest = read_digits(chars, 2, 8)?;
            let value = first.to_digit(8)? * 64 + rest;
            bytes.push(u8::try_from(value).ok()?);
        }
        _ => return None,
    }
    Some(())
}

fn read_digits(chars: &mut std::str::Chars, count: usize, radix: u32) -> Option<u32> {
    let mut value = 0;
    for _ in 0..count {
        value = value * radix + chars.next()?.to_digit(radix)?;
    }
    Some(value)
}

fn push_char(bytes: &mut Vec<u8>, c: char) {
    let mut buf = [0; 4];
    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}
