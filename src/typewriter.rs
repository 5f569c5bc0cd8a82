//! Character-by-character text reveal.
//!
//! A block's content is captured as a [`Node`] tree. [`Reveal`] walks that
//! tree and yields the edits that rebuild it one character at a time;
//! [`LetterScript`] strings several blocks together with their pauses; and
//! [`Typist`] applies the script to a [`TypeSink`], stopping at every wait
//! and giving up for good once its [`Liveness`] is torn down.

use crate::config::LetterConfig;
use crate::frame::Liveness;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Same tag and attributes, no children.
    pub fn shallow(&self) -> Element {
        Element {
            tag: self.tag.clone(),
            attrs: self.attrs.clone(),
            children: Vec::new(),
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => collect_text(&e.children, out),
        }
    }
}

/// One edit in the rebuild of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    /// Append a shallow copy of this element and descend into it.
    Enter(&'a Element),
    /// Append an empty text node; following characters go into it.
    BeginText,
    Char(char),
    /// Return to the parent of the current element.
    Leave,
}

enum Frame<'a> {
    Nodes(std::slice::Iter<'a, Node>),
    Chars(std::str::Chars<'a>),
}

/// Iterator over the steps that rebuild `nodes` in document order.
pub struct Reveal<'a> {
    stack: Vec<Frame<'a>>,
}

impl<'a> Reveal<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        Self {
            stack: vec![Frame::Nodes(nodes.iter())],
        }
    }
}

impl<'a> Iterator for Reveal<'a> {
    type Item = Step<'a>;

    fn next(&mut self) -> Option<Step<'a>> {
        loop {
            let depth = self.stack.len();
            match self.stack.last_mut()? {
                Frame::Chars(chars) => match chars.next() {
                    Some(c) => return Some(Step::Char(c)),
                    None => {
                        self.stack.pop();
                    }
                },
                Frame::Nodes(nodes) => match nodes.next() {
                    Some(Node::Text(text)) => {
                        self.stack.push(Frame::Chars(text.chars()));
                        return Some(Step::BeginText);
                    }
                    Some(Node::Element(element)) => {
                        self.stack.push(Frame::Nodes(element.children.iter()));
                        return Some(Step::Enter(element));
                    }
                    None => {
                        self.stack.pop();
                        // The root frame has no element to leave.
                        if depth > 1 {
                            return Some(Step::Leave);
                        }
                    }
                },
            }
        }
    }
}

/// Receives the edits produced by a [`Typist`].
pub trait TypeSink {
    /// Empties block `block` and makes it visible.
    fn begin_block(&mut self, block: usize);
    fn enter(&mut self, element: &Element);
    fn begin_text(&mut self);
    fn push_char(&mut self, c: char);
    fn leave(&mut self);
}

/// A block to type and its per-character delay.
#[derive(Debug, Clone)]
pub struct Block {
    pub content: Vec<Node>,
    pub char_ms: u32,
    /// Pause after the block finishes.
    pub pause_after_ms: u32,
}

/// The letter: an opening delay, then the greeting, then each paragraph.
#[derive(Debug, Clone, Default)]
pub struct LetterScript {
    pub start_delay_ms: u32,
    pub blocks: Vec<Block>,
}

impl LetterScript {
    /// Missing greeting or zero paragraphs are fine; whatever exists is typed.
    pub fn new(greeting: Option<Vec<Node>>, paragraphs: Vec<Vec<Node>>, config: &LetterConfig) -> Self {
        let greeting = greeting.map(|content| Block {
            content,
            char_ms: config.greeting_char_ms,
            pause_after_ms: 0,
        });
        let paragraphs = paragraphs.into_iter().map(|content| Block {
            content,
            char_ms: config.paragraph_char_ms,
            pause_after_ms: config.paragraph_pause_ms,
        });
        Self {
            start_delay_ms: config.start_delay_ms,
            blocks: greeting.into_iter().chain(paragraphs).collect(),
        }
    }
}

enum Cursor<'a> {
    Start,
    Typing {
        block: usize,
        reveal: Reveal<'a>,
        started: bool,
    },
    Done,
}

/// Applies a [`LetterScript`] to a sink one wait at a time.
pub struct Typist<'a, S> {
    script: &'a LetterScript,
    sink: S,
    liveness: Liveness,
    cursor: Cursor<'a>,
}

impl<'a, S: TypeSink> Typist<'a, S> {
    pub fn new(script: &'a LetterScript, sink: S, liveness: Liveness) -> Self {
        Self {
            script,
            sink,
            liveness,
            cursor: Cursor::Start,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn is_done(&self) -> bool {
        matches!(self.cursor, Cursor::Done)
    }

    /// Applies edits up to the next wait and returns its length in
    /// milliseconds, or `None` when the script is finished or cancelled.
    pub fn advance(&mut self) -> Option<u32> {
        loop {
            if !self.liveness.is_alive() {
                self.cursor = Cursor::Done;
                return None;
            }
            match &mut self.cursor {
                Cursor::Done => return None,
                Cursor::Start => {
                    self.cursor = Self::cursor_at(self.script, 0);
                    if self.script.start_delay_ms > 0 {
                        return Some(self.script.start_delay_ms);
                    }
                }
                Cursor::Typing {
                    block,
                    reveal,
                    started,
                } => {
                    let current = *block;
                    if !*started {
                        *started = true;
                        self.sink.begin_block(current);
                    }
                    match reveal.next() {
                        Some(Step::Char(c)) => {
                            self.sink.push_char(c);
                            return Some(self.script.blocks[current].char_ms);
                        }
                        Some(Step::BeginText) => self.sink.begin_text(),
                        Some(Step::Enter(element)) => self.sink.enter(element),
                        Some(Step::Leave) => self.sink.leave(),
                        None => {
                            let pause = self.script.blocks[current].pause_after_ms;
                            self.cursor = Self::cursor_at(self.script, current + 1);
                            if pause > 0 {
                                return Some(pause);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Positions the cursor at `index` without touching the sink; the block
    /// is cleared on the next call so any preceding wait happens before
    /// anything changes on screen.
    fn cursor_at(script: &'a LetterScript, index: usize) -> Cursor<'a> {
        match script.blocks.get(index) {
            Some(block) => Cursor::Typing {
                block: index,
                reveal: Reveal::new(&block.content),
                started: false,
            },
            None => Cursor::Done,
        }
    }
}
