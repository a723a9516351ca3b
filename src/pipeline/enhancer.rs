//! Prompt enhancement: enriches a terse UI description with fixed clauses
//! before it is sent to the model.
//!
//! Every rule inspects the lowercased text as it stands after the
//! short-description clause, so clauses appended later never feed back into
//! the checks of the same pass.

/// Descriptions with fewer words than this get the baseline quality clause.
const SHORT_DESCRIPTION_WORDS: usize = 10;

pub const BASELINE_CLAUSE: &str =
    ". Make it modern, responsive, and visually appealing with proper colors and spacing.";

/// Domain keyword → layout elaboration. Clauses are lowercase so the
/// "already present" check can run against the lowercased description.
pub const DOMAIN_CLAUSES: [(&str, &str); 5] = [
    (
        "dashboard",
        "with sidebar navigation, header with user profile, main content area with cards and charts",
    ),
    (
        "landing",
        "with hero section, features grid, testimonials, pricing section, and footer",
    ),
    (
        "blog",
        "with header navigation, article cards in grid layout, sidebar for categories",
    ),
    (
        "ecommerce",
        "with product gallery, add to cart functionality, reviews section",
    ),
    (
        "portfolio",
        "with projects showcase, about section, contact form, smooth scrolling",
    ),
];

pub const RESPONSIVE_CLAUSE: &str = "Make it fully responsive for all devices";
pub const COLOR_CLAUSE: &str = "Use a modern color scheme with good contrast";
pub const NAVIGATION_CLAUSE: &str = "Include proper navigation";

pub const IN_PAGE_NAVIGATION_CLAUSE: &str = ". IMPORTANT: Make all navigation links and tabs work within the page using JavaScript (single-page behavior). Use # anchors or JavaScript to show/hide content instead of loading new pages.";

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn technical_clauses(lower: &str) -> Vec<&'static str> {
    let mut clauses = Vec::new();

    if !contains_any(lower, &["responsive", "mobile"]) {
        clauses.push(RESPONSIVE_CLAUSE);
    }

    if !contains_any(lower, &["color", "theme"]) {
        clauses.push(COLOR_CLAUSE);
    }

    // Only pages and apps need a navigation bar; a lone widget does not
    if !contains_any(lower, &["navigation", "nav", "menu"])
        && contains_any(lower, &["website", "site", "page", "app"])
    {
        clauses.push(NAVIGATION_CLAUSE);
    }

    clauses
}

/// Rewrite a raw description into a richer prompt. Pure and deterministic;
/// the original text is always kept as the prefix of the result.
pub fn enhance(description: &str) -> String {
    let mut enhanced = description.to_string();

    if description.split_whitespace().count() < SHORT_DESCRIPTION_WORDS {
        enhanced.push_str(BASELINE_CLAUSE);
    }

    let lower = enhanced.to_lowercase();

    for (keyword, clause) in DOMAIN_CLAUSES {
        if lower.contains(keyword) && !lower.contains(clause) {
            enhanced.push(' ');
            enhanced.push_str(clause);
        }
    }

    let technical = technical_clauses(&lower);
    if !technical.is_empty() {
        enhanced.push_str(". ");
        enhanced.push_str(&technical.join(". "));
    }

    if contains_any(&lower, &["button", "link", "tab"]) {
        enhanced.push_str(IN_PAGE_NAVIGATION_CLAUSE);
    }

    enhanced
}
