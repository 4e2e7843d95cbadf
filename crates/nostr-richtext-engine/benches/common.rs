// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_post_content(size: usize) -> String {
    let base = "gm #nostr! check https://example.com/page, or example.org/docs.\n\
                ping me@example.org or +1-555-123-4567 :wave:\n\n\
                https://cdn.example/a.jpg\nhttps://cdn.example/b.png\n\n\
                tip lnbc1500n1pj9example0000000000 #zap\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_gallery_content(images: usize) -> String {
    let mut content = String::from("photo dump\n\n");
    for i in 0..images {
        content.push_str(&format!("https://cdn.example/{i}.jpg\n\n"));
    }
    content.push_str("that's all");
    content
}

#[allow(dead_code)]
pub fn emoji_tags() -> Vec<Vec<String>> {
    vec![vec![
        "emoji".to_string(),
        "wave".to_string(),
        "https://cdn.example/wave.gif".to_string(),
    ]]
}
