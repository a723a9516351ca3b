// Prompt enhancement, response extraction and sanitizer properties
use uiforge::pipeline::enhancer::{self, BASELINE_CLAUSE, DOMAIN_CLAUSES};
use uiforge::pipeline::extract::extract_document;
use uiforge::pipeline::sanitizer::{self, GUARD_ATTRIBUTE};

const DASHBOARD_CLAUSE: &str = DOMAIN_CLAUSES[0].1;

#[test]
fn test_short_descriptions_get_baseline_clause_once() {
    let descriptions = [
        "",
        "dashboard",
        "a todo app",
        "weather widget for my kitchen tablet",
        "one two three four five six seven eight nine",
    ];
    for description in descriptions {
        let enhanced = enhancer::enhance(description);
        assert_eq!(
            enhanced.matches(BASELINE_CLAUSE).count(),
            1,
            "description: {description:?}"
        );
    }
}

#[test]
fn test_ten_words_is_not_short() {
    let enhanced = enhancer::enhance("one two three four five six seven eight nine ten");
    assert!(!enhanced.contains(BASELINE_CLAUSE));
}

#[test]
fn test_dashboard_clause_appended_once_and_idempotent() {
    let once = enhancer::enhance("dashboard");
    assert_eq!(once.matches(DASHBOARD_CLAUSE).count(), 1);

    let twice = enhancer::enhance(&once);
    assert_eq!(twice.matches(DASHBOARD_CLAUSE).count(), 1);
}

#[test]
fn test_dashboard_clause_not_added_when_already_present_in_other_case() {
    let description = format!("Admin Dashboard {}", DASHBOARD_CLAUSE.to_uppercase());
    let enhanced = enhancer::enhance(&description);
    assert!(!enhanced.contains(DASHBOARD_CLAUSE));
}

#[test]
fn test_enhanced_prompt_keeps_original_prefix() {
    let description = "Landing page for a bike repair shop with a booking button";
    let enhanced = enhancer::enhance(description);
    assert!(enhanced.starts_with(description));
    assert!(enhanced.contains(DOMAIN_CLAUSES[1].1));
    assert!(enhanced.contains("single-page behavior"));
}

#[test]
fn test_extract_html_fence() {
    let response = "Sure! Here you go:\n```html\n<!DOCTYPE html>\n<html><body>hi</body></html>\n```\nEnjoy.";
    assert_eq!(
        extract_document(response),
        "<!DOCTYPE html>\n<html><body>hi</body></html>"
    );
}

#[test]
fn test_extract_plain_fence() {
    let response = "```\n<!DOCTYPE html><html></html>\n```";
    assert_eq!(extract_document(response), "<!DOCTYPE html><html></html>");
}

#[test]
fn test_extract_without_fence_trims_whole_response() {
    let response = "\n\n   <!DOCTYPE html><html><body>x</body></html>  \n";
    assert_eq!(
        extract_document(response),
        "<!DOCTYPE html><html><body>x</body></html>"
    );
}

#[test]
fn test_extract_prepends_doctype() {
    assert_eq!(
        extract_document("```html\n<html></html>\n```"),
        "<!DOCTYPE html>\n<html></html>"
    );
}

#[test]
fn test_sanitizer_idempotent() {
    let page = "<!DOCTYPE html>\n<html>\n<head>\n<title>x</title>\n</head>\n<body>\n<form></form>\n</body>\n</html>";
    let once = sanitizer::sanitize(page);
    let twice = sanitizer::sanitize(&once);

    assert_eq!(once, twice);
    assert_eq!(twice.matches("<base target=\"_self\">").count(), 1);
    assert_eq!(twice.matches(GUARD_ATTRIBUTE).count(), 1);
}

#[test]
fn test_sanitizer_idempotent_without_markers() {
    let once = sanitizer::sanitize("<div>bare fragment</div>");
    let twice = sanitizer::sanitize(&once);
    assert_eq!(twice.matches(GUARD_ATTRIBUTE).count(), 1);
    assert!(!twice.contains("<base"));
}

#[test]
fn test_extract_then_sanitize_model_reply() {
    let reply = "```html\n<html><head></head><body><a href=\"https://example.com\">out</a></body></html>\n```";
    let code = sanitizer::sanitize(&extract_document(reply));
    assert!(code.starts_with("<!DOCTYPE html>\n<html><head>\n    <base target=\"_self\">"));
    assert!(code.ends_with("</script>\n</body></html>"));
}
