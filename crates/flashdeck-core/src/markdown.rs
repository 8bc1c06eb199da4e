// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use pulldown_cmark::Event;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::html::push_html;

/// Convert card text to HTML.
///
/// Raw HTML in the source is emitted as text, so card content can never
/// inject markup into the page.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        _ => event,
    });
    let mut html_output: String = String::new();
    push_html(&mut html_output, parser);
    html_output
}

/// Like [`markdown_to_html`], but drops the enclosing paragraph when the text
/// is a single paragraph.
pub fn markdown_to_html_inline(markdown: &str) -> String {
    let text = markdown_to_html(markdown);
    match text
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>\n"))
    {
        Some(inner) if !inner.contains("<p>") => inner.to_string(),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_to_html_basic() {
        let html = markdown_to_html("This is **bold** text.");
        assert_eq!(html, "<p>This is <strong>bold</strong> text.</p>\n");
    }

    #[test]
    fn test_markdown_to_html_inline() {
        let html = markdown_to_html_inline("What is the capital of *France*?");
        assert_eq!(html, "What is the capital of <em>France</em>?");
    }

    #[test]
    fn test_inline_keeps_block_markup() {
        assert_eq!(markdown_to_html_inline("# Foo"), "<h1>Foo</h1>\n");
        let two = markdown_to_html_inline("one\n\ntwo");
        assert_eq!(two, "<p>one</p>\n<p>two</p>\n");
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = markdown_to_html_inline("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_unicode_passes_through() {
        assert_eq!(markdown_to_html_inline("πr²"), "πr²");
    }
}
