//! Navigation sanitizer for generated documents.
//!
//! Generated pages are previewed inside a sandboxed iframe. Any real
//! navigation (a link to another URL, a form POST) would either break out of
//! the preview or blank it, so every document gets a `<base target="_self">`
//! and a small script that turns anchor clicks into in-page scrolling and tab
//! switching and swallows form submissions.
//!
//! The edit is textual: it only looks for the literal `<head>` and `</body>`
//! markers and never parses the document. Both insertions happen at most once
//! per document, so sanitizing an already sanitized page is a no-op.

const HEAD_OPEN: &str = "<head>";
const BODY_CLOSE: &str = "</body>";
const BASE_MARKER: &str = "<base";
const BASE_TAG: &str = "\n    <base target=\"_self\">";

/// Attribute carried by the interception script; its presence means the
/// document was already sanitized.
pub const GUARD_ATTRIBUTE: &str = "data-uiforge-guard";

pub const INTERCEPT_SCRIPT: &str = r##"
<script data-uiforge-guard="navigation">
document.addEventListener('DOMContentLoaded', function () {
    function switchTab(tabId) {
        document.querySelectorAll('.tab-content, .tab-pane, [role="tabpanel"]').forEach(function (panel) {
            panel.style.display = 'none';
            panel.classList.remove('active', 'show');
        });

        var selected = document.getElementById(tabId);
        if (selected) {
            selected.style.display = 'block';
            selected.classList.add('active', 'show');
        }

        document.querySelectorAll('.tab-button, .nav-link, [role="tab"]').forEach(function (btn) {
            btn.classList.remove('active');
        });

        var activeButton = document.querySelector('[href="#' + tabId + '"], [data-target="#' + tabId + '"]');
        if (activeButton) {
            activeButton.classList.add('active');
        }
    }

    document.addEventListener('click', function (e) {
        var link = e.target.closest ? e.target.closest('a') : null;
        if (!link) {
            return;
        }
        e.preventDefault();

        var href = link.getAttribute('href');
        if (href && href.charAt(0) === '#' && href.length > 1) {
            var targetId = href.substring(1);
            var target = document.getElementById(targetId);
            if (target) {
                target.scrollIntoView({ behavior: 'smooth' });
            }
            switchTab(targetId);
        }
    });

    document.addEventListener('submit', function (e) {
        e.preventDefault();
        alert('Form submitted! (This is a prototype - no data was sent)');
    });
});
</script>
"##;

/// Make a generated document safe to render in the preview frame.
pub fn sanitize(document: &str) -> String {
    let mut html = insert_base_target(document);
    insert_intercept_script(&mut html);
    html
}

fn insert_base_target(document: &str) -> String {
    match document.find(HEAD_OPEN) {
        Some(pos) if !document.contains(BASE_MARKER) => {
            let at = pos + HEAD_OPEN.len();
            let mut html = String::with_capacity(document.len() + BASE_TAG.len());
            html.push_str(&document[..at]);
            html.push_str(BASE_TAG);
            html.push_str(&document[at..]);
            html
        }
        _ => document.to_string(),
    }
}

fn insert_intercept_script(html: &mut String) {
    if html.contains(GUARD_ATTRIBUTE) {
        return;
    }
    // Last </body>: earlier ones can sit inside inline scripts or comments
    match html.rfind(BODY_CLOSE) {
        Some(pos) => html.insert_str(pos, INTERCEPT_SCRIPT),
        None => html.push_str(INTERCEPT_SCRIPT),
    }
}
