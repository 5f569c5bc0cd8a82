use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Node as DomNode, Text};

use super::sleep;
use crate::config::LetterConfig;
use crate::error::{FxError, FxResult};
use crate::frame::Liveness;
use crate::typewriter::{Element, LetterScript, Node, TypeSink, Typist};

/// Copies the children of `parent` into an owned tree.
fn capture(parent: &DomNode) -> Vec<Node> {
    let children = parent.child_nodes();
    (0..children.length())
        .filter_map(|i| children.item(i))
        .filter_map(|child| match child.node_type() {
            DomNode::TEXT_NODE => child.text_content().map(Node::Text),
            DomNode::ELEMENT_NODE => {
                let el = child.dyn_ref::<web_sys::Element>()?;
                let mut element = Element::new(el.tag_name().to_ascii_lowercase());
                for name in el.get_attribute_names().iter().filter_map(|n| n.as_string()) {
                    if let Some(value) = el.get_attribute(&name) {
                        element.attrs.push((name, value));
                    }
                }
                element.children = capture(&child);
                Some(Node::Element(element))
            }
            _ => None,
        })
        .collect()
}

fn hide(el: &HtmlElement) {
    let _ = el.style().set_property("opacity", "0");
}

struct DomSink {
    document: Document,
    blocks: Vec<HtmlElement>,
    stack: Vec<DomNode>,
    text: Option<Text>,
}

impl TypeSink for DomSink {
    fn begin_block(&mut self, block: usize) {
        self.stack.clear();
        self.text = None;
        let Some(el) = self.blocks.get(block) else {
            return;
        };
        el.set_inner_html("");
        let _ = el.style().set_property("opacity", "1");
        self.stack.push(el.clone().into());
    }

    fn enter(&mut self, element: &Element) {
        self.text = None;
        let Ok(node) = self.document.create_element(&element.tag) else {
            return;
        };
        for (name, value) in &element.attrs {
            let _ = node.set_attribute(name, value);
        }
        if let Some(parent) = self.stack.last() {
            let _ = parent.append_child(&node);
        }
        self.stack.push(node.into());
    }

    fn begin_text(&mut self) {
        let text = self.document.create_text_node("");
        if let Some(parent) = self.stack.last() {
            let _ = parent.append_child(&text);
        }
        self.text = Some(text);
    }

    fn push_char(&mut self, c: char) {
        if let Some(text) = &self.text {
            let mut buf = [0u8; 4];
            let _ = text.append_data(c.encode_utf8(&mut buf));
        }
    }

    fn leave(&mut self) {
        self.text = None;
        // Never pop the block itself.
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }
}

/// Types out `.greeting` and each `.letter-body p`, keeping their inline
/// markup.
pub fn mount(document: &Document, liveness: Liveness) -> FxResult<()> {
    let greeting = document
        .query_selector(".greeting")?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    let paragraphs: Vec<HtmlElement> = {
        let list = document.query_selector_all(".letter-body p")?;
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect()
    };
    if greeting.is_none() && paragraphs.is_empty() {
        return Err(FxError::MissingElement(".greeting, .letter-body p".into()));
    }

    let script = LetterScript::new(
        greeting.as_ref().map(|el| capture(el)),
        paragraphs.iter().map(|el| capture(el)).collect(),
        &LetterConfig::default(),
    );
    let blocks: Vec<HtmlElement> = greeting.into_iter().chain(paragraphs).collect();
    for block in &blocks {
        hide(block);
    }
    log::info!("typing {} letter blocks", blocks.len());

    let sink = DomSink {
        document: document.clone(),
        blocks,
        stack: Vec::new(),
        text: None,
    };
    wasm_bindgen_futures::spawn_local(async move {
        let mut typist = Typist::new(&script, sink, liveness);
        while let Some(ms) = typist.advance() {
            sleep(ms).await;
        }
    });
    Ok(())
}
