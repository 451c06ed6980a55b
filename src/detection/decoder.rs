/// Normalize a possibly double-encoded parameter value.
///
/// Decodes twice and keeps the second pass unless it round-tripped back to
/// the input. Malformed `%` sequences pass through untouched and invalid
/// UTF-8 is replaced, never rejected.
pub fn decode(value: &str) -> String {
    let once = percent_decode(value);
    let twice = percent_decode(&once);
    if twice != value {
        twice
    } else {
        once
    }
}

fn percent_decode(value: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(value.as_bytes())).into_owned()
}
