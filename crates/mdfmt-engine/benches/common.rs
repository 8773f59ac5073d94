// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph   with some *emphasised* content that runs on for long enough\nto need re-wrapping, plus a [link](https://example.com) and `code`.\n\n- Bullet point\n  - Nested item\n- Another item\n\n> Quoted text\n> over two lines\n\n| Name | Value |\n|------|-------|\n| a | 1 |\n| longer | 22 |\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_long_paragraph(words: usize) -> String {
    let mut content = String::new();
    for i in 0..words {
        content.push_str(&format!("word{} ", i % 97));
        if i % 13 == 12 {
            content.push('\n');
        }
    }
    content.push('\n');
    content
}
