/// One normalized unit of backend output
///
/// Produced lazily while a generation runs and consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationEvent {
    /// Incremental token
    Token(GenerationToken),
    /// Generation completed; carries the full accumulated text
    FinalAnswer { text: String },
}

/// A single generated token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationToken {
    /// Backend token id (synthetic zero for backends that do not expose ids)
    pub id: u32,
    /// Token text
    pub text: String,
    /// Structural/control token rather than user-visible content
    pub special: bool,
}

impl GenerationToken {
    /// Plain content token with a synthetic id
    #[must_use]
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            id: 0,
            text: text.into(),
            special: false,
        }
    }
}
