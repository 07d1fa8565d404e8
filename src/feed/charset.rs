use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// How far into the body to look for an `<?xml ... ?>` declaration.
const DECLARATION_SCAN_LIMIT: usize = 1024;

/// Decodes a feed body into text.
///
/// The encoding is chosen in this order:
/// 1. a byte order mark,
/// 2. the `charset` parameter of the `Content-Type` header,
/// 3. the `encoding` of the XML declaration,
/// 4. UTF-8.
///
/// Unknown labels are skipped. Invalid byte sequences become U+FFFD.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let declared = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .or_else(|| declaration_encoding(bytes));

    let encoding = declared.unwrap_or(UTF_8);
    // `decode` gives a byte order mark priority over `encoding`
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(encoding = used.name(), "Feed body contains invalid byte sequences");
    }
    text.into_owned()
}

/// Extracts the `charset` parameter from a `Content-Type` value.
fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            (!value.is_empty()).then_some(value)
        } else {
            None
        }
    })
}

/// Reads `encoding="..."` from a leading XML declaration.
///
/// A UTF-16 label without a byte order mark cannot describe an ASCII
/// compatible declaration, so it is ignored.
fn declaration_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(DECLARATION_SCAN_LIMIT)];
    let head = head.strip_prefix(b"\xef\xbb\xbf").unwrap_or(head);
    if !head.starts_with(b"<?xml") {
        return None;
    }

    let end = head.windows(2).position(|w| w == b"?>")?;
    let declaration = std::str::from_utf8(&head[..end]).ok()?;

    let after_key = &declaration[declaration.find("encoding")? + "encoding".len()..];
    let after_eq = after_key.trim_start().strip_prefix('=')?.trim_start();
    let quote = after_eq.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &after_eq[1..];
    let label = &value[..value.find(quote)?];

    Encoding::for_label(label.as_bytes()).filter(|e| *e != UTF_16LE && *e != UTF_16BE)
}
