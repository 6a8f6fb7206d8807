// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_inline_text(size: usize) -> String {
    let base = "Plain words with **bold *and nested em* text**, a [link](https://example.com/page) \
                and <div class=\"note\" style=\"color:red\">boxed <span>inner</span></div> \
                plus <img src=\"/a.png\" alt=\"A\"> and a stray ** marker.\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_article_html(sections: usize) -> String {
    let mut html = String::new();

    for section in 0..sections {
        html.push_str(&format!("<h2>Section {section}</h2>"));
        html.push_str(
            "<p>Intro with <strong>bold</strong>, <em>em</em> and \
             <a href=\"https://example.com\">a <u>link</u></a>.</p>",
        );
        html.push_str("<ul><li>one<ul><li>nested</li></ul></li><li>two</li></ul>");
        html.push_str("<blockquote>quoted<br>text</blockquote>");
        html.push_str("<div data-asset-ref=\"img.png\"></div>");
    }

    html
}
