// Front-ends turning markup text into a `Node` tree.
//
// `parse_xhtml` expects well-formed XHTML (the output of a tidy pass) and
// fails on anything else. `parse_html` accepts whatever a browser would and
// lets html5ever repair it, which always yields html/head/body.

use crate::dom::{Element, Node};
use crate::error::{Error, Result};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Named entities tidy leaves behind when it is not told to emit numeric ones.
fn resolve_entity(name: &str) -> Option<&'static str> {
    match name {
        "nbsp" => Some("\u{a0}"),
        "shy" => Some("\u{ad}"),
        "copy" => Some("\u{a9}"),
        "reg" => Some("\u{ae}"),
        "trade" => Some("\u{2122}"),
        "ndash" => Some("\u{2013}"),
        "mdash" => Some("\u{2014}"),
        "hellip" => Some("\u{2026}"),
        "laquo" => Some("\u{ab}"),
        "raquo" => Some("\u{bb}"),
        "lsquo" => Some("\u{2018}"),
        "rsquo" => Some("\u{2019}"),
        "ldquo" => Some("\u{201c}"),
        "rdquo" => Some("\u{201d}"),
        "euro" => Some("\u{20ac}"),
        _ => None,
    }
}

fn start_to_element(e: &BytesStart) -> Result<Element> {
    let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
    let mut el = Element::new(&name);
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).to_ascii_lowercase();
        let value = attr.unescape_value()?.into_owned();
        el.attrs.push((key, value));
    }
    Ok(el)
}

fn attach(stack: &mut Vec<Element>, roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// Parse well-formed XHTML. Returns the document element.
pub fn parse_xhtml(input: &str) -> Result<Node> {
    let mut reader = Reader::from_str(input);
    reader.trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut roots: Vec<Node> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(start_to_element(&e)?),
            Event::Empty(e) => {
                let el = start_to_element(&e)?;
                attach(&mut stack, &mut roots, el.into());
            }
            Event::End(e) => match stack.pop() {
                Some(el) => attach(&mut stack, &mut roots, el.into()),
                None => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    return Err(Error::Malformed(format!("unexpected </{name}>")));
                }
            },
            Event::Text(e) => {
                let text = e.unescape_with(resolve_entity)?.into_owned();
                attach(&mut stack, &mut roots, Node::Text(text));
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e.into_inner()).to_string();
                attach(&mut stack, &mut roots, Node::Text(text));
            }
            Event::Eof => break,
            // Declarations, doctype, comments and processing instructions.
            _ => {}
        }
    }

    if let Some(el) = stack.last() {
        return Err(Error::Malformed(format!("<{}> not closed at end of input", el.name)));
    }

    let elements: Vec<&Element> = roots.iter().filter_map(Node::as_element).collect();
    let bodies: usize = elements
        .iter()
        .map(|el| usize::from(el.is("body")) + el.descendants("body").len())
        .sum();
    if bodies > 1 {
        return Err(Error::MultipleBodies(bodies));
    }
    if elements.len() > 1 {
        return Err(Error::Malformed(format!(
            "{} top-level elements, expected one",
            elements.len()
        )));
    }
    let stray_text = roots.iter().any(|n| match n {
        Node::Text(t) => !t.trim().is_empty(),
        Node::Element(_) => false,
    });
    if stray_text && !elements.is_empty() {
        return Err(Error::Malformed("text outside the document element".to_string()));
    }

    roots
        .into_iter()
        .find(|n| n.as_element().is_some())
        .ok_or(Error::EmptyDocument)
}

fn convert_handle(h: &Handle) -> Option<Node> {
    match &h.data {
        NodeData::Text { contents } => Some(Node::Text(contents.borrow().to_string())),
        NodeData::Element { name, attrs, .. } => {
            let mut el = Element::new(&name.local);
            el.attrs = attrs
                .borrow()
                .iter()
                .map(|a| (a.name.local.to_string().to_ascii_lowercase(), a.value.to_string()))
                .collect();
            el.children = h.children.borrow().iter().filter_map(convert_handle).collect();
            Some(el.into())
        }
        _ => None,
    }
}

/// Parse arbitrary HTML, repairing it along the way. Returns the `html` element.
pub fn parse_html(input: &str) -> Result<Node> {
    let dom = parse_document(RcDom::default(), Default::default()).one(input);
    let root = dom
        .document
        .children
        .borrow()
        .iter()
        .filter_map(convert_handle)
        .find(|n| n.as_element().is_some());
    root.ok_or(Error::EmptyDocument)
}
