use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{NoExpand, Regex};

/// One unit of text produced by a generation source
pub trait Fragment {
    fn text(&self) -> Cow<'_, str>;
}

impl Fragment for String {
    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl Fragment for &str {
    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl Fragment for Cow<'_, str> {
    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_ref())
    }
}

/// Rewrite line breaks so every line stays inside the quoted block.
///
/// Each `\n` or `\r\n` becomes `\n` followed by `continuation_prefix`. The final fragment of a
/// stream gets one more `\n` after that.
pub fn format_fragment(text: &str, continuation_prefix: &str, last: bool) -> String {
    static LINE_BREAK: OnceLock<Regex> = OnceLock::new();
    let line_break = LINE_BREAK.get_or_init(|| Regex::new(r"\r?\n").expect("Invalid line break regex"));

    let replacement = format!("\n{continuation_prefix}");
    let mut formatted = line_break
        .replace_all(text, NoExpand(&replacement))
        .into_owned();
    if last {
        formatted.push('\n');
    }
    formatted
}
