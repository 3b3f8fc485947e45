use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::GENERATOR;

const KATEX_BASE_URL: &str = "https://cdn.jsdelivr.net/npm/katex@0.16.11/dist";

/// What goes in a page's `<head>`.
#[derive(Debug, Clone)]
pub struct PageHead<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub keywords: &'a [String],
    pub canonical: &'a str,
    pub og_image: &'a str,
    /// Open Graph type, `website` or `article`.
    pub og_type: &'static str,
    /// Serialized schema.org data, already safe to embed in a `<script>` element.
    pub json_ld: Option<&'a str>,
}

/// Generator tag for the output HTML. See [`GENERATOR`](crate::GENERATOR).
pub fn generator() -> Markup {
    html! {
        meta name="generator" content=(GENERATOR);
    }
}

fn katex() -> Markup {
    html! {
        link rel="stylesheet" href=(format!("{KATEX_BASE_URL}/katex.min.css"));
        script defer src=(format!("{KATEX_BASE_URL}/katex.min.js")) {}
        script defer src=(format!("{KATEX_BASE_URL}/contrib/auto-render.min.js")) onload="renderMathInElement(document.body)" {}
    }
}

pub fn layout(head: &PageHead, site_name: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (head.title) }
                meta name="description" content=(head.description);
                @if !head.keywords.is_empty() {
                    meta name="keywords" content=(head.keywords.join(", "));
                }
                link rel="canonical" href=(head.canonical);

                meta property="og:type" content=(head.og_type);
                meta property="og:site_name" content=(site_name);
                meta property="og:title" content=(head.title);
                meta property="og:description" content=(head.description);
                meta property="og:url" content=(head.canonical);
                meta property="og:image" content=(head.og_image);
                meta name="twitter:card" content="summary_large_image";
                meta name="twitter:title" content=(head.title);
                meta name="twitter:description" content=(head.description);
                meta name="twitter:image" content=(head.og_image);

                (generator())
                (katex())

                @if let Some(json_ld) = head.json_ld {
                    script type="application/ld+json" { (PreEscaped(json_ld)) }
                }
            }
            body {
                header.site-header {
                    a href="/" { (site_name) }
                }
                main { (body) }
                footer.site-footer {
                    p { "© " (site_name) }
                }
            }
        }
    }
}
