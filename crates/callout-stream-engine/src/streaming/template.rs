use crate::streaming::StreamError;

/// Shape of the quoted callout block a response is streamed into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalloutTemplate {
    /// Callout type written as `[!kind]`
    pub kind: String,
    pub title: String,
    /// Prefix that keeps each following line inside the block
    pub continuation_prefix: String,
    /// CSS color used for inline error messages
    pub error_color: String,
}

impl Default for CalloutTemplate {
    fn default() -> Self {
        Self {
            kind: "ai".to_string(),
            title: "Assistant".to_string(),
            continuation_prefix: "> ".to_string(),
            error_color: "var(--text-error)".to_string(),
        }
    }
}

impl CalloutTemplate {
    /// Check the header can be written into.
    ///
    /// Text is inserted one byte before the end of the header, so its last character has to be a
    /// single byte that stays on the first content line.
    pub fn validate(&self) -> Result<(), StreamError> {
        match self.continuation_prefix.chars().last() {
            Some(last) if last.is_ascii() && last != '\n' && last != '\r' => Ok(()),
            _ => Err(StreamError::InvalidPrefix(self.continuation_prefix.clone())),
        }
    }

    /// Header block inserted before any generated text, ending on the first content line
    pub fn header(&self, label: &str) -> String {
        format!(
            "\n\n>[!{}]+ {} ({})\n{}",
            self.kind, self.title, label, self.continuation_prefix
        )
    }

    /// Inline-styled error message
    pub fn error_fragment(&self, message: &str) -> String {
        format!(
            "<span style=\"color: {}\">{}</span>",
            self.error_color,
            html_escape::encode_text(message)
        )
    }
}
