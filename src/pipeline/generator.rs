use std::sync::Arc;
use tracing::{debug, info};

use super::extract::extract_document;
use crate::llm::factory::ClientFactory;
use crate::llm::prompts;
use crate::llm::ModelError;
use crate::util::SecretString;

/// Drives the model for the three upstream operations. Each call builds a
/// fresh client from the caller's key and makes exactly one upstream request.
pub struct Generator {
    factory: Arc<dyn ClientFactory>,
}

impl Generator {
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self { factory }
    }

    /// Generate a complete document from an (already enhanced) description.
    pub async fn generate(&self, description: &str, api_key: SecretString) -> Result<String, ModelError> {
        let client = self.factory.create(api_key)?;

        info!("Generating UI ({} chars of description)", description.len());
        let response = client
            .complete(&prompts::generation_prompt(description))
            .await?;
        debug!("Model returned {} chars", response.len());

        Ok(extract_document(&response))
    }

    /// Apply a change request to an existing document.
    pub async fn refine(
        &self,
        current_code: &str,
        instruction: &str,
        api_key: SecretString,
    ) -> Result<String, ModelError> {
        let client = self.factory.create(api_key)?;

        info!(
            "Refining UI ({} chars of code, {} chars of instruction)",
            current_code.len(),
            instruction.len()
        );
        let response = client
            .complete(&prompts::refinement_prompt(current_code, instruction))
            .await?;
        debug!("Model returned {} chars", response.len());

        Ok(extract_document(&response))
    }

    /// Send the probe prompt; success means the provider accepted the key.
    pub async fn test_credential(&self, api_key: SecretString) -> Result<(), ModelError> {
        let client = self.factory.create(api_key)?;
        client.complete(prompts::PROBE_PROMPT).await?;
        Ok(())
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Self-contained page shown in the preview when generation fails.
pub fn fallback_page(error: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Generation Error</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            min-height: 100vh;
            margin: 0;
            display: flex;
            justify-content: center;
            align-items: center;
            padding: 2rem;
            box-sizing: border-box;
        }}
        .error-container {{
            background: white;
            border-radius: 12px;
            padding: 3rem;
            box-shadow: 0 20px 60px rgba(0,0,0,0.2);
            max-width: 600px;
            text-align: center;
        }}
        h1 {{ color: #e53e3e; margin-bottom: 1rem; }}
        p {{ color: #666; line-height: 1.6; }}
        .error-details {{
            background: #f7f7f7;
            padding: 1rem;
            border-radius: 8px;
            font-family: monospace;
            font-size: 0.9rem;
            color: #333;
            text-align: left;
            word-break: break-word;
        }}
    </style>
</head>
<body>
    <div class="error-container">
        <h1>&#9888;&#65039; Generation Failed</h1>
        <p>Unable to generate UI based on your description.</p>
        <div class="error-details">Error: {}</div>
        <p>Please try again with a different description or check your API key.</p>
    </div>
</body>
</html>"#,
        escape_html(error)
    )
}
