//! Pluggable cleanup applied to assistant content before it is returned to
//! the browser.

/// Rewrites the extracted assistant content. Implementations must be cheap
/// and infallible; the proxy handler applies them inline.
pub trait ResponsePostProcessor: Send + Sync {
    /// Default: content unchanged.
    fn process(&self, content: &str) -> String {
        content.to_string()
    }
}

/// Passthrough.
pub struct Noop;

impl ResponsePostProcessor for Noop {}

/// Strips the reasoning preamble some models emit before their final answer:
/// everything up to and including the newline that follows the *last*
/// occurrence of `"Let me"` is discarded. When the marker or the following
/// newline is absent, the content is returned unchanged.
///
/// Model-specific heuristic; the server installs it, the handler stays
/// agnostic.
pub struct ReasoningStripper;

impl ResponsePostProcessor for ReasoningStripper {
    fn process(&self, content: &str) -> String {
        if let Some(marker) = content.rfind("Let me") {
            if let Some(newline) = content[marker..].find('\n') {
                return content[marker + newline + 1..].to_string();
            }
        }
        content.to_string()
    }
}
