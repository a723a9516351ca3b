// Prompt templates sent to the model for generation, refinement and key checks

/// Minimal prompt used to check that a key is accepted.
pub const PROBE_PROMPT: &str = "Say 'Hello'";

pub fn generation_prompt(description: &str) -> String {
    format!(
        r##"Create a complete, working HTML page with embedded CSS and JavaScript based on this description:
{}

CRITICAL REQUIREMENTS:
1. Generate a complete HTML document with <!DOCTYPE html>
2. Include all CSS in a <style> tag in the <head>
3. Include all JavaScript in <script> tags
4. Make it a SINGLE PAGE APPLICATION - all navigation must work within the same page
5. For tabs, menus, or multi-section layouts:
   - Use JavaScript to show/hide content
   - Use # anchors for navigation (e.g., href="#dashboard")
   - Never use external links or page reloads
   - Implement tab switching with JavaScript
6. Make it visually appealing with modern, professional design
7. Use good colors, proper spacing, and modern typography
8. Include smooth animations and transitions
9. Make it fully responsive (mobile-friendly)
10. Use realistic placeholder content/data
11. Do not include ANY external dependencies - everything must be inline
12. If charts are requested, draw them with Canvas, SVG, or CSS
13. Ensure all interactive elements work (buttons, forms, tabs, etc.)
14. Use modern CSS features like flexbox, grid, gradients, shadows
15. For navigation/tabs: always use JavaScript to show/hide sections, never load new pages

IMPORTANT: The page will be displayed in a sandboxed iframe, so:
- All links must use # anchors or JavaScript
- No external navigation
- Forms should not actually submit (use preventDefault)
- Everything must work within a single HTML document

Return ONLY the complete HTML code with no explanations, no markdown formatting, no code blocks - just pure HTML.
"##,
        description
    )
}

pub fn refinement_prompt(current_code: &str, instruction: &str) -> String {
    format!(
        r##"You have the following HTML/CSS/JavaScript code that needs to be refined:

```html
{}
```

The user has requested the following changes/fixes:
{}

REQUIREMENTS:
1. Apply ONLY the requested changes while keeping everything else intact
2. Maintain the single-page application structure
3. Keep all styles inline in the <style> tag
4. Keep all JavaScript inline in <script> tags
5. Ensure all navigation and tabs continue to work within the same page
6. Do not remove any existing functionality
7. Fix any issues mentioned by the user
8. Maintain responsive design
9. Keep the code self-contained with no external dependencies

IMPORTANT:
- Focus on the specific changes requested
- Don't rewrite the code unless necessary
- Preserve the overall structure and design
- The page will be displayed in an iframe, so maintain single-page behavior

Return ONLY the complete updated HTML code with no explanations, no markdown formatting, no code blocks - just pure HTML.
"##,
        current_code, instruction
    )
}
