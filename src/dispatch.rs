// Tag dispatch: every element is rendered by the handler registered for its
// (lower-cased) name. Site specific markup is handled by overrides that are
// tried, in registration order, before the generic handler. An override
// returns `None` to pass the element on.

use crate::context::{Context, Diagnostic};
use crate::dom::{Element, Node};
use crate::escape::latex_escape;
use crate::images::image_id;
use crate::table::render_table;
use std::collections::HashMap;

/// Site specific handler. `None` means "not mine, try the next one".
pub type Override = fn(&Dispatcher, &Element, &mut Context<'_>) -> Option<String>;

/// Tags with a generic handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Heading(u8),
    Paragraph,
    Div,
    Span,
    Anchor,
    Image,
    UnorderedList,
    OrderedList,
    ListItem,
    Bold,
    Italic,
    Underline,
    Strike,
    Delete,
    Superscript,
    Code,
    LineBreak,
    Table,
}

impl Tag {
    pub fn from_name(name: &str) -> Option<Tag> {
        let tag = match name.to_ascii_lowercase().as_str() {
            "h1" => Tag::Heading(1),
            "h2" => Tag::Heading(2),
            "h3" => Tag::Heading(3),
            "h4" => Tag::Heading(4),
            "h5" => Tag::Heading(5),
            "h6" => Tag::Heading(6),
            "p" => Tag::Paragraph,
            "div" => Tag::Div,
            "span" => Tag::Span,
            "a" => Tag::Anchor,
            "img" => Tag::Image,
            "ul" => Tag::UnorderedList,
            "ol" => Tag::OrderedList,
            "li" => Tag::ListItem,
            "b" | "strong" => Tag::Bold,
            "i" | "em" => Tag::Italic,
            "u" => Tag::Underline,
            "strike" => Tag::Strike,
            "del" => Tag::Delete,
            "sup" => Tag::Superscript,
            "pre" | "code" => Tag::Code,
            "br" => Tag::LineBreak,
            "table" => Tag::Table,
            _ => return None,
        };
        Some(tag)
    }
}

#[derive(Clone, Default)]
pub struct Dispatcher {
    overrides: HashMap<String, Vec<Override>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `tag`, after any override already registered.
    pub fn with_override(mut self, tag: &str, handler: Override) -> Self {
        self.overrides
            .entry(tag.to_ascii_lowercase())
            .or_default()
            .push(handler);
        self
    }

    /// Render one node. `previous` is its preceding sibling, if any.
    pub fn process(&self, node: &Node, previous: Option<&Node>, ctx: &mut Context<'_>) -> String {
        match node {
            Node::Text(t) => process_text(t),
            Node::Element(el) => self.process_element(el, previous, ctx),
        }
    }

    pub fn process_element(
        &self,
        el: &Element,
        previous: Option<&Node>,
        ctx: &mut Context<'_>,
    ) -> String {
        if ctx.config.debug {
            log::debug!("processing <{}>", el.name);
        }
        if let Some(handlers) = self.overrides.get(&el.name) {
            for h in handlers {
                if let Some(out) = h(self, el, ctx) {
                    return out;
                }
            }
        }
        self.generic(el, previous, ctx)
    }

    /// Render `el` with the built-in handler, ignoring overrides.
    pub fn generic(&self, el: &Element, previous: Option<&Node>, ctx: &mut Context<'_>) -> String {
        let Some(tag) = Tag::from_name(&el.name) else {
            return self.unimplemented(el, ctx);
        };
        match tag {
            Tag::Heading(level) => heading(el, level),
            Tag::Paragraph | Tag::Div => self.paragraph(el, ctx),
            Tag::Span => self.container(el, ctx),
            Tag::Anchor => anchor(el),
            Tag::Image => self.image(el, ctx),
            Tag::UnorderedList => self.list(el, "itemize", ctx),
            Tag::OrderedList => self.list(el, "enumerate", ctx),
            Tag::ListItem => self.list_item(el, ctx),
            Tag::Bold => inline(el, "textbf"),
            Tag::Italic => inline(el, "textit"),
            Tag::Underline => inline(el, "underline"),
            Tag::Strike => inline(el, "sout"),
            Tag::Delete => format!("\\sout{{{}}}", self.container(el, ctx)),
            Tag::Superscript => format!("$^{{{}}}$", latex_escape(el.text_content().trim())),
            Tag::Code => listing(el),
            Tag::LineBreak => line_break(previous),
            Tag::Table => render_table(self, el, false, ctx),
        }
    }

    /// Render all children in document order, concatenated.
    pub fn container(&self, el: &Element, ctx: &mut Context<'_>) -> String {
        self.children(&el.children, ctx)
    }

    pub fn children(&self, nodes: &[Node], ctx: &mut Context<'_>) -> String {
        let mut out = String::new();
        let mut previous: Option<&Node> = None;
        for n in nodes {
            out.push_str(&self.process(n, previous, ctx));
            previous = Some(n);
        }
        out
    }

    pub fn paragraph(&self, el: &Element, ctx: &mut Context<'_>) -> String {
        let out = self.container(el, ctx);
        if out.is_empty() {
            String::new()
        } else {
            format!("{out}\n\n")
        }
    }

    pub fn list(&self, el: &Element, env: &str, ctx: &mut Context<'_>) -> String {
        format!(
            "\n\\begin{{{env}}}\n{}\\end{{{env}}}\n\n",
            self.container(el, ctx)
        )
    }

    pub fn list_item(&self, el: &Element, ctx: &mut Context<'_>) -> String {
        let out = self.container(el, ctx);
        if out.trim().is_empty() {
            String::new()
        } else {
            format!("\\item{{ {out} }}")
        }
    }

    pub fn image(&self, el: &Element, ctx: &mut Context<'_>) -> String {
        let src = el.attr("src").unwrap_or_default().to_string();
        let id = image_id(&src);
        ctx.images.push(src.clone());

        if ctx.store.find(&id).is_some() {
            format!("\\includegraphics[width=\\maxwidth]{{{id}}}")
        } else {
            let out = format!("[IMAGE {id}. File not found]");
            ctx.report(Diagnostic::MissingImage { src, id });
            out
        }
    }

    fn unimplemented(&self, el: &Element, ctx: &mut Context<'_>) -> String {
        ctx.report(Diagnostic::Unimplemented {
            tag: el.name.clone(),
        });
        let mut out = String::from("\\begin{center}");
        out.push_str("\\fcolorbox{core_error_fg}{core_error_bg}{");
        out.push_str("\\parbox[t]{90mm}{");
        out.push_str("\\textbf{LibTex Error}\\\\ ``");
        out.push_str(&latex_escape(&el.name));
        out.push_str("'' not yet implemented");
        out.push_str("\\\\\\textbf{Content:}\\\\");
        out.push_str(&self.container(el, ctx));
        out.push_str("}}\\end{center}");
        out
    }
}

/// Text leaves are trimmed and escaped; blank ones vanish.
pub fn process_text(text: &str) -> String {
    latex_escape(text.trim())
}

fn heading(el: &Element, level: u8) -> String {
    let title = latex_escape(el.text_content().trim());
    match level {
        1 => format!("\\section{{ {title} }}\n"),
        2 => format!("\\subsection{{ {title} }}\n"),
        3 => format!("\\subsubsection{{ {title} }}\n"),
        // LaTeX only has three numbered section levels.
        _ => format!("\\textbf{{ {title} }}\n"),
    }
}

fn inline(el: &Element, command: &str) -> String {
    format!(
        " \\{command}{{{}}} ",
        latex_escape(el.text_content().trim())
    )
}

fn anchor(el: &Element) -> String {
    let href = el.attr("href").unwrap_or_default();
    let text = el.text_content();
    let mut out = format!(" \\underline{{{}}}", latex_escape(&text));
    if text != href {
        out.push_str(&format!("\\footnote{{{}}}", latex_escape(href)));
    }
    out
}

/// Verbatim block; the listings package does its own escaping.
pub fn listing(el: &Element) -> String {
    format!(
        "\\begin{{lstlisting}}{}\\end{{lstlisting}}",
        el.text_content()
    )
}

fn line_break(previous: Option<&Node>) -> String {
    match previous {
        Some(p) if !p.text_content().trim().is_empty() => "\\\\".to_string(),
        _ => String::new(),
    }
}
