// Document assembly: preamble, document environment and the converted body.

use crate::context::{Context, Diagnostic, TexConfig};
use crate::dispatch::Dispatcher;
use crate::dom::{Element, Node};
use crate::error::{Error, Result};
use crate::images::{FolderImages, ImageStore};
use crate::parse::{parse_html, parse_xhtml};

/// Converter entry point. Holds the configuration, the tag dispatcher and the
/// image lookup; parsing markup yields a [`Document`] bound to it.
pub struct HtmlTexer {
    config: TexConfig,
    dispatcher: Dispatcher,
    store: Box<dyn ImageStore>,
}

/// Output of a full render.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub tex: String,
    /// `src` of every image that was rendered, in order, duplicates included.
    pub images: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl HtmlTexer {
    pub fn new(config: TexConfig) -> Self {
        let store = FolderImages::new(config.image_folder.clone(), &config.supported_images);
        Self {
            config,
            dispatcher: Dispatcher::new(),
            store: Box::new(store),
        }
    }

    pub fn with_images(mut self, store: impl ImageStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn config(&self) -> &TexConfig {
        &self.config
    }

    /// Parse well-formed XHTML.
    pub fn parse(&self, markup: &str) -> Result<Document<'_>> {
        Ok(self.document(parse_xhtml(markup)?))
    }

    /// Parse arbitrary HTML, repairing it first.
    pub fn parse_html(&self, markup: &str) -> Result<Document<'_>> {
        Ok(self.document(parse_html(markup)?))
    }

    pub fn document(&self, root: Node) -> Document<'_> {
        Document { texer: self, root }
    }

    /// Custom preamble followed by the packages and macros the generated body
    /// relies on.
    pub fn preamble(&self) -> String {
        let mut folder = self.config.image_folder.display().to_string();
        if !folder.is_empty() && !folder.ends_with('/') {
            folder.push('/');
        }
        let mut out = self.config.preamble.clone();
        out.push_str(&format!(
            r"
\graphicspath{{{{{folder}}}}}
\DeclareGraphicsExtensions{{{extensions}}}

%
% Package used for source-code listings
%
\usepackage{{listings}}

%
% Package used for strike-through text
%
\usepackage{{ulem}}

%
% Macro to define maximum width of images
%
\makeatletter
\def\maxwidth{{\ifdim\Gin@nat@width>\linewidth\linewidth
\else\Gin@nat@width\fi}}
\makeatother

\definecolor{{listing}}{{rgb}}{{0.941, 0.941, 0.871}}
\definecolor{{core_error_fg}}{{rgb}}{{0, 0, 0}}
\definecolor{{core_error_bg}}{{rgb}}{{1, 0, 0}}
\lstset{{ numbers=left, basicstyle=\footnotesize, backgroundcolor=\color{{listing}}, language=bash, caption=Code Listing, frame=single, breaklines=true }}
",
            extensions = self.config.supported_images.join(","),
        ));
        out
    }
}

/// A parsed document, ready to be rendered.
pub struct Document<'t> {
    texer: &'t HtmlTexer,
    root: Node,
}

impl<'t> Document<'t> {
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// `src` of every `img` in the document, in document order. These have to
    /// be fetched into the image folder before the document is typeset.
    pub fn images(&self) -> Vec<String> {
        let Some(root) = self.root.as_element() else {
            return Vec::new();
        };
        let mut imgs: Vec<&Element> = Vec::new();
        if root.is("img") {
            imgs.push(root);
        }
        imgs.extend(root.descendants("img"));
        imgs.iter()
            .map(|i| i.attr("src").unwrap_or_default().to_string())
            .collect()
    }

    fn body_element(&self) -> Result<&Element> {
        let Some(root) = self.root.as_element() else {
            return Err(Error::NoBody);
        };
        let mut bodies: Vec<&Element> = Vec::new();
        if root.is("body") {
            bodies.push(root);
        }
        bodies.extend(root.descendants("body"));
        match bodies.len() {
            0 => Err(Error::NoBody),
            1 => Ok(bodies[0]),
            n => Err(Error::MultipleBodies(n)),
        }
    }

    fn render_body(&self, ctx: &mut Context<'_>) -> Result<String> {
        let body = self.body_element()?;
        Ok(self.texer.dispatcher.children(&body.children, ctx))
    }

    /// The converted body alone.
    pub fn body(&self) -> Result<String> {
        let mut ctx = Context::new(&self.texer.config, self.texer.store.as_ref());
        self.render_body(&mut ctx)
    }

    /// The complete LaTeX document.
    pub fn tex(&self) -> Result<String> {
        Ok(self.render()?.tex)
    }

    pub fn render(&self) -> Result<Rendered> {
        let config = &self.texer.config;
        let mut ctx = Context::new(config, self.texer.store.as_ref());
        let body = self.render_body(&mut ctx)?;

        let mut tex = self.texer.preamble();
        tex.push_str("\\begin{document}\n");
        if config.maketitle {
            tex.push_str("\\maketitle\n");
        }
        tex.push_str(&body);
        tex.push_str("\n\\end{document}");

        Ok(Rendered {
            tex,
            images: ctx.images,
            diagnostics: ctx.diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::{image_id, NoImages};
    use std::collections::HashMap;

    struct MockImages(HashMap<String, String>);

    impl ImageStore for MockImages {
        fn find(&self, id: &str) -> Option<String> {
            self.0.get(id).cloned()
        }
    }

    fn texer() -> HtmlTexer {
        HtmlTexer::new(TexConfig::default()).with_images(NoImages)
    }

    #[test]
    fn body_is_converted() {
        let t = texer();
        let doc = t
            .parse("<html><head><title>x</title></head><body><h1>Title</h1><p>Some <em>text</em>.</p></body></html>")
            .unwrap();
        assert_eq!(doc.body().unwrap(), "\\section{ Title }\nSome \\textit{text} .\n\n");
    }

    #[test]
    fn missing_body_is_fatal() {
        let t = texer();
        let doc = t.parse("<html><head/></html>").unwrap();
        assert!(matches!(doc.body(), Err(Error::NoBody)));
        assert!(matches!(doc.tex(), Err(Error::NoBody)));
    }

    #[test]
    fn two_bodies_are_fatal() {
        let t = texer();
        let doc = t
            .parse("<html><body><p>a</p></body><body><p>b</p></body></html>")
            .unwrap();
        assert!(matches!(doc.body(), Err(Error::MultipleBodies(2))));
    }

    #[test]
    fn sibling_bodies_are_fatal() {
        let t = texer();
        let err = t
            .parse("<body><p>a</p></body><body><p>b</p></body>")
            .err()
            .unwrap();
        assert!(matches!(err, Error::MultipleBodies(2)));
    }

    #[test]
    fn truncated_markup_is_rejected() {
        let t = texer();
        let err = t.parse("<html><body><p>truncated").err().unwrap();
        assert!(matches!(err, Error::Malformed(_)));
    }

    #[test]
    fn body_as_root_element() {
        let t = texer();
        let doc = t.parse("<body>hello</body>").unwrap();
        assert_eq!(doc.body().unwrap(), "hello");
    }

    #[test]
    fn lenient_parse_always_has_one_body() {
        let t = texer();
        let doc = t.parse_html("<p>unclosed <b>bold").unwrap();
        assert_eq!(doc.body().unwrap(), "unclosed \\textbf{bold} \n\n");
    }

    #[test]
    fn images_in_document_order_with_duplicates() {
        let t = texer();
        let doc = t
            .parse(
                r#"<html><body><p><img src="a.png"/></p><div><img src="b.png"/><img src="a.png"/></div><pre><img src="c.png"/></pre></body></html>"#,
            )
            .unwrap();
        assert_eq!(doc.images(), vec!["a.png", "b.png", "a.png", "c.png"]);

        // Only the rendered ones end up in the render output.
        let r = doc.render().unwrap();
        assert_eq!(r.images, vec!["a.png", "b.png", "a.png"]);
        assert_eq!(r.diagnostics.len(), 3);
    }

    #[test]
    fn resolved_images_embed() {
        let id = image_id("pics/x.jpg");
        let store = MockImages([(id.clone(), ".jpg".to_string())].into_iter().collect());
        let t = HtmlTexer::new(TexConfig::default()).with_images(store);
        let doc = t.parse(r#"<body><img src="pics/x.jpg"/></body>"#).unwrap();
        let r = doc.render().unwrap();
        assert!(r.tex.contains(&format!("\\includegraphics[width=\\maxwidth]{{{id}}}")));
        assert!(r.diagnostics.is_empty());
    }

    #[test]
    fn full_document_layout() {
        let config = TexConfig {
            preamble: "\\documentclass{article}\n".to_string(),
            image_folder: "/tmp/imgs".into(),
            ..TexConfig::default()
        };
        let t = HtmlTexer::new(config).with_images(NoImages);
        let tex = t.parse("<body><p>x</p></body>").unwrap().tex().unwrap();

        assert!(tex.starts_with("\\documentclass{article}\n\n\\graphicspath{{/tmp/imgs/}}\n"));
        assert!(tex.contains("\\DeclareGraphicsExtensions{.jpg,.png,.pdf,.gif}\n"));
        assert!(tex.contains("\\def\\maxwidth{\\ifdim\\Gin@nat@width>\\linewidth\\linewidth\n"));
        assert!(tex.contains("\\definecolor{core_error_bg}{rgb}{1, 0, 0}\n"));
        assert!(tex.ends_with("\\begin{document}\n\\maketitle\nx\n\n\n\\end{document}"));
    }

    #[test]
    fn graphicspath_ends_with_one_slash() {
        for folder in ["pics", "pics/"] {
            let config = TexConfig {
                image_folder: folder.into(),
                ..TexConfig::default()
            };
            let t = HtmlTexer::new(config).with_images(NoImages);
            assert!(t.preamble().contains("\\graphicspath{{pics/}}\n"), "{folder}");
        }
        let t = texer();
        assert!(t.preamble().contains("\\graphicspath{{}}\n"));
    }

    #[test]
    fn maketitle_is_optional() {
        let config = TexConfig {
            maketitle: false,
            ..TexConfig::default()
        };
        let t = HtmlTexer::new(config).with_images(NoImages);
        let tex = t.parse("<body>x</body>").unwrap().tex().unwrap();
        assert!(tex.ends_with("\\begin{document}\nx\n\\end{document}"));
    }

    #[test]
    fn unknown_tags_are_reported() {
        let t = texer();
        let r = t
            .parse("<body><marquee>hi</marquee></body>")
            .unwrap()
            .render()
            .unwrap();
        assert!(r.tex.contains("``marquee'' not yet implemented"));
        assert_eq!(
            r.diagnostics,
            vec![Diagnostic::Unimplemented {
                tag: "marquee".to_string()
            }]
        );
    }
}
