//! uiforge - Turn natural-language UI descriptions into previewable HTML
//!
//! A small web service that enhances a user's description, asks a generative
//! model (Gemini, Anthropic, OpenAI or any OpenAI-compatible endpoint) for a
//! self-contained HTML document, neutralizes its navigation so it can be
//! previewed in a sandboxed iframe, and supports iterative refinement of the
//! result within a session.

pub mod artifacts;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod server;
pub mod session;
pub mod util;
