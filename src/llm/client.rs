use async_trait::async_trait;

use super::error::ModelError;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}

/// Offline client used by `--dry-run` and tests.
pub struct MockLlmClient {
    failure: Option<String>,
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self { failure: None }
    }

    /// A client whose every call fails with a transport error carrying `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
        }
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        if let Some(ref message) = self.failure {
            return Err(ModelError::Transport {
                provider: "mock",
                message: message.clone(),
            });
        }

        if prompt.contains("needs to be refined") {
            // Refinement: answer fenced, the way chat models usually do
            Ok(r##"Here is the updated page:

```html
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Refined Mock UI</title>
    <style>body { font-family: sans-serif; background: #0f172a; color: #e2e8f0; }</style>
</head>
<body>
    <nav><a href="#home" class="nav-link active">Home</a> <a href="#about" class="nav-link">About</a></nav>
    <section id="home" class="tab-content">Refined home</section>
    <section id="about" class="tab-content" style="display:none">About</section>
</body>
</html>
```
"##
            .to_string())
        } else if prompt.contains("Create a complete, working HTML page") {
            Ok(r##"<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Mock UI</title>
    <style>body { font-family: sans-serif; margin: 0; }</style>
</head>
<body>
    <nav><a href="#home" class="nav-link active">Home</a> <a href="#contact" class="nav-link">Contact</a></nav>
    <section id="home" class="tab-content">Welcome</section>
    <section id="contact" class="tab-content" style="display:none">
        <form><input name="email"><button type="submit">Send</button></form>
    </section>
</body>
</html>"##
                .to_string())
        } else {
            Ok("Hello".to_string())
        }
    }
}
