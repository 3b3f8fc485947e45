//! Markdown rendering for question statements, options and learning content.
//!
//! TeX between `$…$` / `$$…$$` is left for KaTeX to typeset in the browser, wrapped in the `\(…\)` / `\[…\]`
//! delimiters its auto-render extension looks for.
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd};
use rustc_hash::FxHashSet;
use slug::slugify;

/// A heading of rendered Markdown, usable for a table of contents.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownHeading {
    pub title: String,
    pub id: String,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMarkdown {
    pub html: String,
    pub headings: Vec<MarkdownHeading>,
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_MATH
        | Options::ENABLE_HEADING_ATTRIBUTES
}

pub fn render_markdown(content: &str) -> String {
    render_markdown_with_headings(content).html
}

/// Renders `content` and gives every heading an id, either its `{#id}` attribute or one derived from its text.
pub fn render_markdown_with_headings(content: &str) -> RenderedMarkdown {
    let mut events: Vec<Event> = Vec::new();
    let mut headings = Vec::new();
    let mut used_ids: FxHashSet<String> = FxHashSet::default();

    // Index of the open heading's start event, and its text so far.
    let mut heading_start: Option<usize> = None;
    let mut heading_text = String::new();

    for event in Parser::new_ext(content, markdown_options()) {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                heading_start = Some(events.len());
                heading_text.clear();
                events.push(event);
            }
            Event::End(TagEnd::Heading(level)) => {
                if let Some(start) = heading_start.take()
                    && let Event::Start(Tag::Heading { id, .. }) = &mut events[start]
                {
                    let title = heading_text.trim().to_string();
                    let heading_id = match id {
                        Some(id) => {
                            used_ids.insert(id.to_string());
                            id.to_string()
                        }
                        None => unique_heading_id(&mut used_ids, &title),
                    };

                    *id = Some(CowStr::from(heading_id.clone()));
                    headings.push(MarkdownHeading {
                        title,
                        id: heading_id,
                        level: level as u8,
                    });
                }
                events.push(event);
            }
            Event::InlineMath(tex) => {
                if heading_start.is_some() {
                    heading_text.push_str(&tex);
                }
                events.push(Event::InlineHtml(math_html(&tex, false).into()));
            }
            Event::DisplayMath(tex) => {
                events.push(Event::InlineHtml(math_html(&tex, true).into()));
            }
            Event::Text(ref text) | Event::Code(ref text) => {
                if heading_start.is_some() {
                    heading_text.push_str(text);
                }
                events.push(event);
            }
            _ => events.push(event),
        }
    }

    let mut html = String::with_capacity(content.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, events.into_iter());

    RenderedMarkdown { html, headings }
}

/// Renders short content such as an answer option, without the `<p>` around a single paragraph.
pub fn render_inline_markdown(content: &str) -> String {
    let html = render_markdown(content);

    match html
        .trim_end()
        .strip_prefix("<p>")
        .and_then(|inner| inner.strip_suffix("</p>"))
    {
        Some(inner) if !inner.contains("<p>") => inner.to_string(),
        _ => html,
    }
}

fn math_html(tex: &str, display: bool) -> String {
    if display {
        format!(
            "<div class=\"math math-display\">\\[{}\\]</div>",
            escape_html(tex)
        )
    } else {
        format!(
            "<span class=\"math math-inline\">\\({}\\)</span>",
            escape_html(tex)
        )
    }
}

/// Slugified `title`, suffixed `-1`, `-2`, ... until it differs from every id in `used_ids`.
fn unique_heading_id(used_ids: &mut FxHashSet<String>, title: &str) -> String {
    let mut base = slugify(title);
    if base.is_empty() {
        base = "section".to_string();
    }

    let mut id = base.clone();
    let mut counter = 1;
    while used_ids.contains(&id) {
        id = format!("{base}-{counter}");
        counter += 1;
    }
    used_ids.insert(id.clone());

    id
}

pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_math() {
        assert_eq!(
            render_markdown("Find $x^2$ now"),
            "<p>Find <span class=\"math math-inline\">\\(x^2\\)</span> now</p>\n"
        );
    }

    #[test]
    fn test_display_math_is_escaped() {
        let html = render_markdown("$$a<b$$");
        assert!(html.contains("<div class=\"math math-display\">\\[a&lt;b\\]</div>"));
    }

    #[test]
    fn test_tables_and_strikethrough() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_heading_ids() {
        let rendered = render_markdown_with_headings("# Intro\n\n## Intro\n\n## Custom {#my-id}\n\n## ???");

        assert!(rendered.html.contains("<h1 id=\"intro\">Intro</h1>"));
        assert!(rendered.html.contains("<h2 id=\"intro-1\">Intro</h2>"));
        assert!(rendered.html.contains("<h2 id=\"my-id\">Custom</h2>"));

        let ids: Vec<_> = rendered.headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["intro", "intro-1", "my-id", "section"]);
        assert_eq!(rendered.headings[0].level, 1);
        assert_eq!(rendered.headings[1].level, 2);
    }

    #[test]
    fn test_generated_heading_ids_avoid_explicit_ids() {
        let rendered = render_markdown_with_headings(
            "## Setup {#setup}\n\n## Setup\n\n## Step\n\n## Step\n\n## Step 1",
        );

        let ids: Vec<_> = rendered.headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["setup", "setup-1", "step", "step-1", "step-1-1"]);
        assert_eq!(rendered.html.matches("id=\"setup\"").count(), 1);
    }

    #[test]
    fn test_render_inline_markdown() {
        assert_eq!(render_inline_markdown("**12**"), "<strong>12</strong>");
        assert_eq!(
            render_inline_markdown("$\\frac{1}{2}$"),
            "<span class=\"math math-inline\">\\(\\frac{1}{2}\\)</span>"
        );

        let multi = render_inline_markdown("one\n\ntwo");
        assert_eq!(multi, "<p>one</p>\n<p>two</p>\n");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }
}
