const HTML_FENCE: &str = "```html";
const FENCE: &str = "```";
const DOCTYPE: &str = "<!DOCTYPE html>";

/// Pull the HTML document out of a raw model reply.
///
/// Preference order: the body of the first ```` ```html ```` fence, then the body of
/// the first plain fence pair, then the whole reply. An unterminated fence runs
/// to the end of the reply. The result is trimmed and always starts with a
/// doctype declaration.
pub fn extract_document(response: &str) -> String {
    let payload = if let Some((_, rest)) = response.split_once(HTML_FENCE) {
        until_fence(rest)
    } else if let Some((_, rest)) = response.split_once(FENCE) {
        until_fence(rest)
    } else {
        response
    };

    ensure_doctype(payload.trim())
}

fn until_fence(text: &str) -> &str {
    text.split_once(FENCE).map_or(text, |(body, _)| body)
}

fn ensure_doctype(code: &str) -> String {
    if starts_with_doctype(code) {
        code.to_string()
    } else {
        format!("{DOCTYPE}\n{code}")
    }
}

fn starts_with_doctype(code: &str) -> bool {
    code.get(..9)
        .is_some_and(|head| head.eq_ignore_ascii_case("<!doctype"))
}
