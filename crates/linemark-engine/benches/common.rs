// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_markdown_content(units: usize) -> String {
    let base = "# Section\n\nParagraph with **bold**, __underline__ and `code`.\n\n- Bullet point\n  - [ ] Nested task\n- [x] Done task\n1. First\n2. Second\n> A quote\n\n```rust\nfn example() {\n    println!(\"hello\");\n}\n```\n\n---\n\n";
    base.repeat(units)
}

#[allow(dead_code)]
pub fn generate_lines(lines: usize) -> String {
    let unit = "# section\ntext with **bold** and `code`\n- [ ] a task\n> a quote\n";
    unit.repeat(lines / 4)
}
