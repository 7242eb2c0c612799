// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with some content.\n\n- Bullet point\n  - Nested item\n- Another item\n\n";
    base.repeat(size)
}

/// Fragments shaped like a model's token stream, with a line break every few words
#[allow(dead_code)]
pub fn generate_fragments(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            if i % 12 == 11 {
                format!("word{i}.\n")
            } else {
                format!("word{i} ")
            }
        })
        .collect()
}
