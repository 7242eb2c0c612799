use std::fmt::Display;

use async_trait::async_trait;
use futures::stream::LocalBoxStream;

use crate::streaming::Fragment;

/// What the user asked for and which model answers it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PromptSpec {
    pub prompt: String,
    /// Model name, shown as the callout label
    pub model: String,
}

impl PromptSpec {
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.model
    }

    pub fn is_empty(&self) -> bool {
        self.prompt.is_empty()
    }
}

/// Lazily produced fragments of one response; an `Err` item ends it
pub type FragmentStream<F, E> = LocalBoxStream<'static, Result<F, E>>;

/// Anything that can answer a prompt with a stream of text
#[async_trait(?Send)]
pub trait GenerationSource {
    type Fragment: Fragment;
    type Error: Display;

    async fn generate(
        &self,
        prompt: &PromptSpec,
    ) -> Result<FragmentStream<Self::Fragment, Self::Error>, Self::Error>;
}
