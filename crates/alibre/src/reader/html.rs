//! HTML to plain text.
//!
//! Markup goes through `html2text`, which parses with html5ever the way a
//! browser would: a stray `<`, unclosed tags and upper-case `<SCRIPT>`
//! blocks never cut the text short.

use super::error::{ReaderError, Result};
use super::text::TextBuilder;
use html2text::render::TrivialDecorator;
use once_cell::sync::Lazy;
use regex::Regex;

/// Wide enough that rendering never wraps; each output line is one block.
const RENDER_WIDTH: usize = 10_000;

static TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").expect("valid title regex"));

/// Extract readable text: the document title (if any), a blank line, then
/// the body text with one paragraph per rendered block.
pub fn html_to_text(html: &str) -> Result<String> {
    let title = match TITLE.captures(html).and_then(|caps| caps.get(1)) {
        Some(inner) => single_line(&render(inner.as_str())?),
        None => String::new(),
    };
    let body = paragraphs(&render(&TITLE.replace(html, ""))?);

    Ok(match (title.is_empty(), body.is_empty()) {
        (true, _) => body,
        (false, true) => title,
        (false, false) => format!("{title}\n\n{body}"),
    })
}

fn render(html: &str) -> Result<String> {
    html2text::from_read_with_decorator(html.as_bytes(), RENDER_WIDTH, TrivialDecorator::new())
        .map_err(|err| ReaderError::Html(err.to_string()))
}

fn paragraphs(rendered: &str) -> String {
    let mut out = TextBuilder::new();
    for line in rendered.lines() {
        out.push_text(line);
        out.paragraph_break();
    }
    out.finish()
}

fn single_line(rendered: &str) -> String {
    let mut out = TextBuilder::new();
    for line in rendered.lines() {
        out.push_text(line);
        out.push_text(" ");
    }
    out.finish()
}
