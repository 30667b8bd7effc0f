//! Document tree targeted by the in-place renderer
//!
//! [`TextTree`] is the traversal and mutation contract the renderer
//! needs; a browser binding implements it over a live DOM. [`Document`]
//! is the in-memory implementation: a slab arena of element and text
//! nodes with HTML serialization for inspection.

use crate::error::DocumentError;
use slab::Slab;
use std::fmt;

/// Identifier of a node in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the renderer needs to know about a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<'a> {
    /// Element with a tag name
    Element {
        /// Tag name as stored (compare case-insensitively)
        tag: &'a str,
    },
    /// Text node with its content
    Text(&'a str),
    /// Document root, comments and anything else
    Other,
}

/// Traversal and mutation contract of a document tree
pub trait TextTree {
    /// Node handle
    type Id: Copy + Eq + fmt::Debug;

    /// Kind of a node
    fn node_kind(&self, id: Self::Id) -> Result<NodeKind<'_>, DocumentError>;

    /// Child ids in document order
    fn children(&self, id: Self::Id) -> Result<Vec<Self::Id>, DocumentError>;

    /// Whether an element carries a class
    fn has_class(&self, id: Self::Id, class: &str) -> bool;

    /// Concatenated text of all descendant text nodes
    fn text_content(&self, id: Self::Id) -> Result<String, DocumentError>;

    /// Create a detached text node
    fn create_text(&mut self, text: &str) -> Self::Id;

    /// Create a detached element with classes
    fn create_element(&mut self, tag: &str, classes: &[&str]) -> Self::Id;

    /// Append `child` as the last child of `parent`
    fn append_child(&mut self, parent: Self::Id, child: Self::Id) -> Result<(), DocumentError>;

    /// Put `new` where `old` is and drop `old` with its subtree
    fn replace_node(&mut self, old: Self::Id, new: Self::Id) -> Result<(), DocumentError>;

    /// Detach a node and drop it with its subtree
    fn remove_node(&mut self, id: Self::Id) -> Result<(), DocumentError>;
}

/// Element payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Tag name
    pub tag: String,
    /// Class list in insertion order
    pub classes: Vec<String>,
    /// Other attributes in insertion order
    pub attributes: Vec<(String, String)>,
}

/// Node payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// The document root
    Document,
    /// An element
    Element(ElementData),
    /// A text node
    Text(String),
    /// A comment (never rendered into, never annotated)
    Comment(String),
}

/// A node with its links
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent, if attached
    pub parent: Option<NodeId>,
    /// Children in document order
    pub children: Vec<NodeId>,
    /// Payload
    pub data: NodeData,
}

/// In-memory document tree
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Slab<Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with a root node
    pub fn new() -> Self {
        let mut nodes = Slab::new();
        let root = NodeId(nodes.insert(Node {
            parent: None,
            children: Vec::new(),
            data: NodeData::Document,
        }));
        Self { nodes, root }
    }

    /// The document root
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the root exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Borrow a node
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node(&self, id: NodeId) -> Result<&Node, DocumentError> {
        self.nodes.get(id.0).ok_or(DocumentError::NodeMissing)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DocumentError> {
        self.nodes.get_mut(id.0).ok_or(DocumentError::NodeMissing)
    }

    fn create_node(&mut self, data: NodeData) -> NodeId {
        NodeId(self.nodes.insert(Node {
            parent: None,
            children: Vec::new(),
            data,
        }))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.create_node(NodeData::Comment(text.to_string()))
    }

    /// Set an attribute on an element
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), DocumentError> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element(element) => {
                if let Some(slot) = element.attributes.iter_mut().find(|(n, _)| n == name) {
                    slot.1 = value.to_string();
                } else {
                    element
                        .attributes
                        .push((name.to_string(), value.to_string()));
                }
                Ok(())
            }
            _ => Err(DocumentError::NotElement),
        }
    }

    /// Replace the content of a text node
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<(), DocumentError> {
        match &mut self.node_mut(id)?.data {
            NodeData::Text(content) => {
                *content = text.to_string();
                Ok(())
            }
            _ => Err(DocumentError::NotText),
        }
    }

    /// Whether `ancestor` is `id` or one of its ancestors
    fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.nodes.get(node.0).and_then(|n| n.parent);
        }
        false
    }

    fn detach(&mut self, id: NodeId) -> Result<(), DocumentError> {
        if let Some(parent) = self.node(id)?.parent {
            self.node_mut(parent)?.children.retain(|&c| c != id);
            self.node_mut(id)?.parent = None;
        }
        Ok(())
    }

    fn drop_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.try_remove(current.0) {
                stack.extend(node.children);
            }
        }
    }

    /// Node ids of the subtree rooted at `id`, in pre-order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current.0) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Serialize a subtree to HTML. The root and comment-free document
    /// node serialize as their children only.
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let mut stack = vec![HtmlStep::Enter(id)];
        while let Some(step) = stack.pop() {
            let current = match step {
                HtmlStep::Enter(current) => current,
                HtmlStep::Close(tag) => {
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                    continue;
                }
            };
            let Some(node) = self.nodes.get(current.0) else {
                continue;
            };
            match &node.data {
                NodeData::Document => {
                    stack.extend(node.children.iter().rev().map(|&c| HtmlStep::Enter(c)));
                }
                NodeData::Text(text) => out.push_str(&html_escape::encode_text(text)),
                NodeData::Comment(text) => {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->");
                }
                NodeData::Element(element) => {
                    out.push('<');
                    out.push_str(&element.tag);
                    if !element.classes.is_empty() {
                        out.push_str(" class=\"");
                        out.push_str(&html_escape::encode_double_quoted_attribute(
                            &element.classes.join(" "),
                        ));
                        out.push('"');
                    }
                    for (name, value) in &element.attributes {
                        out.push(' ');
                        out.push_str(name);
                        out.push_str("=\"");
                        out.push_str(&html_escape::encode_double_quoted_attribute(value));
                        out.push('"');
                    }
                    out.push('>');
                    if is_void_element(&element.tag) {
                        continue;
                    }
                    stack.push(HtmlStep::Close(&element.tag));
                    stack.extend(node.children.iter().rev().map(|&c| HtmlStep::Enter(c)));
                }
            }
        }
    }
}

/// Pending work of the serializer
enum HtmlStep<'a> {
    Enter(NodeId),
    Close(&'a str),
}

fn is_void_element(tag: &str) -> bool {
    const VOID: [&str; 8] = ["br", "hr", "img", "input", "meta", "link", "wbr", "source"];
    VOID.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

impl TextTree for Document {
    type Id = NodeId;

    fn node_kind(&self, id: NodeId) -> Result<NodeKind<'_>, DocumentError> {
        Ok(match &self.node(id)?.data {
            NodeData::Element(element) => NodeKind::Element { tag: &element.tag },
            NodeData::Text(text) => NodeKind::Text(text),
            NodeData::Document | NodeData::Comment(_) => NodeKind::Other,
        })
    }

    fn children(&self, id: NodeId) -> Result<Vec<NodeId>, DocumentError> {
        Ok(self.node(id)?.children.clone())
    }

    fn has_class(&self, id: NodeId, class: &str) -> bool {
        matches!(
            self.nodes.get(id.0).map(|n| &n.data),
            Some(NodeData::Element(element)) if element.classes.iter().any(|c| c == class)
        )
    }

    fn text_content(&self, id: NodeId) -> Result<String, DocumentError> {
        self.node(id)?;
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(NodeData::Text(text)) = self.nodes.get(node.0).map(|n| &n.data) {
                out.push_str(text);
            }
        }
        Ok(out)
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.create_node(NodeData::Text(text.to_string()))
    }

    fn create_element(&mut self, tag: &str, classes: &[&str]) -> NodeId {
        self.create_node(NodeData::Element(ElementData {
            tag: tag.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            attributes: Vec::new(),
        }))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DocumentError> {
        self.node(parent)?;
        self.node(child)?;
        if child == self.root || self.is_inclusive_ancestor(child, parent) {
            return Err(DocumentError::InvalidHierarchy);
        }
        if matches!(self.node(parent)?.data, NodeData::Text(_) | NodeData::Comment(_)) {
            return Err(DocumentError::NotElement);
        }
        self.detach(child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn replace_node(&mut self, old: NodeId, new: NodeId) -> Result<(), DocumentError> {
        self.node(new)?;
        let parent = self.node(old)?.parent.ok_or(DocumentError::Detached)?;
        if old == new {
            return Ok(());
        }
        if self.is_inclusive_ancestor(new, parent) {
            return Err(DocumentError::InvalidHierarchy);
        }
        self.detach(new)?;

        let siblings = &mut self.node_mut(parent)?.children;
        let index = siblings
            .iter()
            .position(|&c| c == old)
            .ok_or(DocumentError::Detached)?;
        siblings[index] = new;

        self.node_mut(new)?.parent = Some(parent);
        self.node_mut(old)?.parent = None;
        self.drop_subtree(old);
        Ok(())
    }

    fn remove_node(&mut self, id: NodeId) -> Result<(), DocumentError> {
        if id == self.root {
            return Err(DocumentError::InvalidHierarchy);
        }
        self.detach(id)?;
        self.drop_subtree(id);
        Ok(())
    }
}

/// Fluent construction of test and fixture documents
#[derive(Debug)]
pub struct DocumentBuilder {
    doc: Document,
    stack: Vec<NodeId>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    /// Start a new document
    pub fn new() -> Self {
        let doc = Document::new();
        let root = doc.root();
        Self {
            doc,
            stack: vec![root],
        }
    }

    fn current(&self) -> NodeId {
        *self.stack.last().unwrap_or(&self.doc.root)
    }

    fn attach(&mut self, id: NodeId) {
        let parent = self.current();
        // Builder only appends fresh nodes to live elements
        if let Err(err) = self.doc.append_child(parent, id) {
            tracing::error!(%err, "document builder append failed");
        }
    }

    /// Open an element; subsequent nodes become its children
    pub fn open(mut self, tag: &str) -> Self {
        let id = self.doc.create_element(tag, &[]);
        self.attach(id);
        self.stack.push(id);
        self
    }

    /// Open an element with classes
    pub fn open_with_classes(mut self, tag: &str, classes: &[&str]) -> Self {
        let id = self.doc.create_element(tag, classes);
        self.attach(id);
        self.stack.push(id);
        self
    }

    /// Add a text node
    pub fn text(mut self, text: &str) -> Self {
        let id = self.doc.create_text(text);
        self.attach(id);
        self
    }

    /// Add a comment node
    pub fn comment(mut self, text: &str) -> Self {
        let id = self.doc.create_comment(text);
        self.attach(id);
        self
    }

    /// Close the innermost open element
    pub fn close(mut self) -> Self {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
        self
    }

    /// Finish building
    pub fn build(self) -> Document {
        self.doc
    }
}
