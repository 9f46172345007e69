// Host editor input primitives: the selection/prompt/confirm seam.
//
// Every method that waits on the user can be cancelled; cancellation is
// `None`/`false`, never an error, and callers must short-circuit on it.

/// A single-line text prompt request.
#[derive(Debug, Clone, Default)]
pub struct TextPrompt {
    pub prompt: String,
    pub placeholder: Option<String>,
    pub initial: Option<String>,
    /// Returns an error message for invalid input. Hosts keep the prompt
    /// open until the input passes or the user cancels.
    pub validate: Option<fn(&str) -> Option<String>>,
}

impl TextPrompt {
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn with_initial(mut self, initial: impl Into<String>) -> Self {
        self.initial = Some(initial.into());
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validate: fn(&str) -> Option<String>) -> Self {
        self.validate = Some(validate);
        self
    }
}

/// An entry offered by a choice prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub description: String,
}

impl Choice {
    #[must_use]
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self { label: label.into(), description: description.into() }
    }
}

/// The host editor's input primitives.
#[allow(async_fn_in_trait)]
pub trait PromptUi: Send + Sync {
    /// Current editor selection, if any.
    async fn selected_text(&self) -> Option<String>;

    /// Single-line input. `None` means the user cancelled.
    async fn prompt_text(&self, request: TextPrompt) -> Option<String>;

    /// Pick one of `choices`, returning its index. `None` means cancelled.
    async fn prompt_choice(&self, placeholder: &str, choices: &[Choice]) -> Option<usize>;

    /// Yes/no confirmation with an explicit affirmative button label.
    async fn confirm(&self, message: &str, affirmative: &str) -> bool;
}

/// Label validation shared by the session and the palette flows: empty or
/// whitespace-only is invalid.
#[must_use]
pub fn validate_label(input: &str) -> Option<String> {
    if input.trim().is_empty() {
        Some("Pattern name cannot be empty".to_string())
    } else {
        None
    }
}
