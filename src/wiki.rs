// TikiWiki specific markup, layered over the generic handlers.
//
// The wiki's WYSIWYG editor produces a few constructs of its own: internal
// page links, an icon after external links, CSS classes on DIVs for code,
// warning and note boxes, and tables flagged for autoscaling through their
// `summary` attribute.

use crate::context::Context;
use crate::dispatch::{listing, Dispatcher};
use crate::dom::{xml_escape_text, Element};
use crate::escape::latex_escape;
use crate::table::render_table;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PAGE_LINK: Regex =
        Regex::new(r"tiki-(?:index|editpage)\.php\?page=(.+)$").unwrap();
}

const EXTERNAL_LINK_ICON: &str = "img/icons/external_link.gif";

/// Generic dispatcher plus the wiki overrides.
pub fn dispatcher() -> Dispatcher {
    Dispatcher::new()
        .with_override("table", autoscale_table)
        .with_override("li", blank_list_item)
        .with_override("a", page_link)
        .with_override("img", external_link_icon)
        .with_override("div", styled_div)
}

/// `<table summary="autoscale">` is rendered with autoscaled columns.
fn autoscale_table(d: &Dispatcher, el: &Element, ctx: &mut Context<'_>) -> Option<String> {
    let summary = el.attr("summary")?;
    if summary.trim().eq_ignore_ascii_case("autoscale") {
        Some(render_table(d, el, true, ctx))
    } else {
        None
    }
}

/// The editor leaves empty list items behind; tidy keeps them.
fn blank_list_item(_: &Dispatcher, el: &Element, _: &mut Context<'_>) -> Option<String> {
    el.text_content().trim().is_empty().then(String::new)
}

/// Links to other wiki pages get the page name as footnote instead of the URL.
fn page_link(_: &Dispatcher, el: &Element, _: &mut Context<'_>) -> Option<String> {
    let href = el.attr("href")?;
    let caps = PAGE_LINK.captures(href)?;
    Some(format!(
        " \\underline{{{}}}\\footnote{{{}}}",
        latex_escape(&el.text_content()),
        latex_escape(&url_decode(&caps[1]))
    ))
}

fn url_decode(s: &str) -> String {
    let plus_as_space = s.replace('+', " ");
    match urlencoding::decode(&plus_as_space) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => plus_as_space,
    }
}

/// Icon the wiki appends to external links.
fn external_link_icon(_: &Dispatcher, el: &Element, _: &mut Context<'_>) -> Option<String> {
    (el.attr("src") == Some(EXTERNAL_LINK_ICON)).then(String::new)
}

fn styled_div(d: &Dispatcher, el: &Element, ctx: &mut Context<'_>) -> Option<String> {
    let classes = el.classes();
    if classes.iter().any(|c| c == "code") {
        return Some(listing(el));
    }
    if classes.iter().any(|c| c == "warning") {
        return Some(colored_box("wborder", "wback", "Warning:", &d.container(el, ctx)));
    }
    if classes.iter().any(|c| c == "note") {
        return Some(colored_box("nborder", "nback", "Note:", &d.container(el, ctx)));
    }
    None
}

fn colored_box(border: &str, back: &str, title: &str, content: &str) -> String {
    format!(
        "\\begin{{center}}\\fcolorbox{{{border}}}{{{back}}}{{\\parbox[t]{{90mm}}{{ \\textbf{{{title}}}\\\\\\\\{content} }}}}\\end{{center}}"
    )
}

/// Page metadata shown in the title block and page headers.
#[derive(Debug, Clone, Default)]
pub struct PageInfo {
    pub name: String,
    pub version: u32,
    pub author: String,
    /// Long form of the last modification date, for `\date`.
    pub date: String,
    /// Short form, for the page header.
    pub short_date: String,
}

/// Preamble for a wiki page: document class, packages, box colors, title
/// block and page headers.
pub fn preamble(page: &PageInfo) -> String {
    let name = latex_escape(&page.name);
    let title = format!("{name} -- rev. {}", page.version);
    format!(
        "
\\documentclass[a4paper]{{article}}
\\usepackage[utf8]{{inputenc}}
\\usepackage[pdftex]{{graphicx}}
\\usepackage[usenames]{{color}}
\\usepackage{{fancyhdr}}
\\definecolor{{wborder}}{{rgb}}{{1,0,0}}
\\definecolor{{wback}}{{rgb}}{{0.9,0.9,0.7}}
\\definecolor{{nborder}}{{rgb}}{{1,0,0}}
\\definecolor{{nback}}{{rgb}}{{0.7,0.7,0.9}}
\\title{{{title}}}
\\date{{{date}}}
\\author{{{author}}}
\\pagestyle{{fancy}}
\\fancyhead[LO]{{\\bfseries {title}}}
\\fancyhead[RO]{{{short_date}}}
",
        date = latex_escape(&page.date),
        author = latex_escape(&page.author),
        short_date = latex_escape(&page.short_date),
    )
}

/// Markup listing the pages that link to this one, appended to the page body.
pub fn backlinks_section(pages: &[String]) -> String {
    if pages.is_empty() {
        return String::new();
    }
    let mut out = String::from("<h1>This document is referenced by the following documents</h1>");
    out.push_str("<ul>");
    for p in pages {
        out.push_str("<li>");
        out.push_str(&xml_escape_text(p));
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}

/// The wiki renders empty paragraphs as `&#160;`; drop them before parsing.
pub fn strip_nbsp(html: &str) -> String {
    html.replace("&#160;", "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TexConfig;
    use crate::images::NoImages;

    fn render(el: Element) -> String {
        let config = TexConfig::default();
        let mut ctx = Context::new(&config, &NoImages);
        dispatcher().process(&el.into(), None, &mut ctx)
    }

    #[test]
    fn summary_autoscale_switches_table_mode() {
        let row = Element::new("tr")
            .with_child(Element::new("td").with_text("ab"))
            .with_child(Element::new("td").with_text("abcdef"));
        let scaled = Element::new("table")
            .with_attr("summary", " AutoScale ")
            .with_child(row.clone());
        assert!(render(scaled).contains("{| p{20ex} | p{60ex} |}"));

        let plain = Element::new("table").with_child(row);
        assert!(render(plain).contains("{| l | l |}"));
    }

    #[test]
    fn internal_links_footnote_the_page_name() {
        let a = Element::new("a")
            .with_attr("href", "tiki-index.php?page=Release+Notes%202.0")
            .with_text("notes");
        assert_eq!(render(a), " \\underline{notes}\\footnote{Release Notes 2.0}");

        let a = Element::new("a")
            .with_attr("href", "/tiki-editpage.php?page=My_Page")
            .with_text("edit");
        assert_eq!(render(a), " \\underline{edit}\\footnote{My\\_Page}");
    }

    #[test]
    fn external_links_use_generic_handler() {
        let a = Element::new("a")
            .with_attr("href", "http://example.com")
            .with_text("site");
        assert_eq!(render(a), " \\underline{site}\\footnote{http://example.com}");
    }

    #[test]
    fn external_link_icon_is_dropped() {
        let img = Element::new("img").with_attr("src", EXTERNAL_LINK_ICON);
        assert_eq!(render(img), "");
        let img = Element::new("img").with_attr("src", "img/other.gif");
        assert!(render(img).starts_with("[IMAGE "));
    }

    #[test]
    fn div_classes() {
        let code = Element::new("div").with_attr("class", "Code").with_text("ls -l");
        assert_eq!(render(code), "\\begin{lstlisting}ls -l\\end{lstlisting}");

        let warn = Element::new("div")
            .with_attr("class", "box warning")
            .with_text("careful");
        assert_eq!(
            render(warn),
            "\\begin{center}\\fcolorbox{wborder}{wback}{\\parbox[t]{90mm}{ \\textbf{Warning:}\\\\\\\\careful }}\\end{center}"
        );

        let note = Element::new("div").with_attr("class", "note").with_text("fyi");
        assert!(render(note).contains("{nborder}{nback}"));

        let plain = Element::new("div").with_attr("class", "other").with_text("x");
        assert_eq!(render(plain), "x\n\n");
    }

    #[test]
    fn blank_items_are_dropped() {
        let li = Element::new("li").with_child(Element::new("img").with_attr("src", "a.png"));
        assert_eq!(render(li), "");
        let li = Element::new("li").with_text("x");
        assert_eq!(render(li), "\\item{ x }");
    }

    #[test]
    fn backlinks_and_nbsp() {
        assert_eq!(backlinks_section(&[]), "");
        let s = backlinks_section(&["A & B".to_string(), "C".to_string()]);
        assert!(s.starts_with("<h1>This document is referenced"));
        assert!(s.ends_with("<ul><li>A &amp; B</li><li>C</li></ul>"));
        assert_eq!(strip_nbsp("<p>&#160;</p>"), "<p></p>");
    }

    #[test]
    fn page_preamble() {
        let p = preamble(&PageInfo {
            name: "Home_Page".to_string(),
            version: 3,
            author: "admin".to_string(),
            date: "01. Jan 2024 @ 10:00:00".to_string(),
            short_date: "01. Jan 2024".to_string(),
        });
        assert!(p.contains("\\title{Home\\_Page -- rev. 3}"));
        assert!(p.contains("\\fancyhead[LO]{\\bfseries Home\\_Page -- rev. 3}"));
        assert!(p.contains("\\fancyhead[RO]{01. Jan 2024}"));
        assert!(p.contains("\\author{admin}"));
    }

    #[test]
    fn page_metadata_is_escaped() {
        let p = preamble(&PageInfo {
            name: "R&D #1".to_string(),
            version: 1,
            author: "j_doe".to_string(),
            date: "100% done".to_string(),
            short_date: "$today".to_string(),
        });
        assert!(p.contains("\\title{R\\&D \\#1 -- rev. 1}"));
        assert!(p.contains("\\author{j\\_doe}"));
        assert!(p.contains("\\date{100\\% done}"));
        assert!(p.contains("\\fancyhead[RO]{\\$today}"));
    }
}
