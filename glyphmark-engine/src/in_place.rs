//! In-place annotation of a document tree
//!
//! Text nodes under a root are replaced by wrapper elements holding the
//! annotated runs. Applying first reverts any wrappers already present,
//! so re-application converges on the current preferences and applying
//! twice leaves the same tree as applying once.
//!
//! Any element carrying the `gm-annotated` class is treated as a wrapper:
//! revert flattens it to its text, whoever created it. Documents must not
//! use that class for their own markup.

use crate::document::{NodeKind, TextTree};
use crate::error::DocumentError;
use crate::sink::{emit, has_styled_run, RunSink};
use crate::stylesheet::{run_classes, WRAPPER_CLASS};
use glyphmark_core::{AnnotatedRun, Preferences, RuleConfig, WordAnnotator};

/// Containers whose text is never prose
pub const SKIP_TAGS: [&str; 9] = [
    "script", "style", "noscript", "template", "iframe", "textarea", "input", "select", "option",
];

/// Tag of the wrapper and run elements
const SPAN: &str = "span";

/// Whether text under an element with this tag is left alone
pub fn is_skipped_tag(tag: &str) -> bool {
    SKIP_TAGS.iter().any(|skip| skip.eq_ignore_ascii_case(tag))
}

/// A node that could not be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFailure {
    /// Debug rendering of the node id
    pub node: String,
    /// What went wrong
    pub error: DocumentError,
}

/// Outcome of reverting wrappers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevertReport {
    /// Wrappers turned back into plain text
    pub reverted: usize,
    /// Wrappers that could not be reverted
    pub failures: Vec<NodeFailure>,
}

/// Outcome of an in-place application
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Text nodes replaced by a wrapper
    pub annotated: usize,
    /// Text nodes with no styled run, left as they were
    pub unchanged: usize,
    /// Wrappers from a previous application reverted first
    pub reverted: usize,
    /// Per-node failures; processing continued past each one
    pub failures: Vec<NodeFailure>,
}

impl ApplyReport {
    /// Whether every node was processed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drop a node that never made it into the tree
fn discard<T: TextTree>(tree: &mut T, id: T::Id) {
    if let Err(error) = tree.remove_node(id) {
        tracing::debug!(node = ?id, %error, "could not discard detached node");
    }
}

fn record<Id: std::fmt::Debug>(failures: &mut Vec<NodeFailure>, node: Id, error: DocumentError) {
    tracing::warn!(node = ?node, %error, "skipping node");
    failures.push(NodeFailure {
        node: format!("{node:?}"),
        error,
    });
}

/// Wrapper ids under `root` (inclusive), outermost only. Recognition
/// is by class alone.
fn find_wrappers<T: TextTree>(tree: &T, root: T::Id) -> Result<Vec<T::Id>, DocumentError> {
    let mut wrappers = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if let NodeKind::Element { .. } = tree.node_kind(id)? {
            if tree.has_class(id, WRAPPER_CLASS) {
                wrappers.push(id);
                continue;
            }
        }
        stack.extend(tree.children(id)?.into_iter().rev());
    }
    Ok(wrappers)
}

/// Text nodes under `root` (inclusive) eligible for annotation
fn find_text_nodes<T: TextTree>(tree: &T, root: T::Id) -> Result<Vec<T::Id>, DocumentError> {
    let mut nodes = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        match tree.node_kind(id)? {
            NodeKind::Text(text) => {
                if !text.trim().is_empty() {
                    nodes.push(id);
                }
                continue;
            }
            NodeKind::Element { tag } => {
                if is_skipped_tag(tag) || tree.has_class(id, WRAPPER_CLASS) {
                    continue;
                }
            }
            NodeKind::Other => {}
        }
        stack.extend(tree.children(id)?.into_iter().rev());
    }
    Ok(nodes)
}

/// Replace every wrapper under `root` with one text node of its content
pub fn revert_document<T: TextTree>(tree: &mut T, root: T::Id) -> RevertReport {
    let mut report = RevertReport::default();

    let wrappers = match find_wrappers(tree, root) {
        Ok(wrappers) => wrappers,
        Err(error) => {
            record(&mut report.failures, root, error);
            return report;
        }
    };

    for wrapper in wrappers {
        let result = tree.text_content(wrapper).and_then(|text| {
            let plain = tree.create_text(&text);
            let replaced = tree.replace_node(wrapper, plain);
            if replaced.is_err() {
                discard(tree, plain);
            }
            replaced
        });
        match result {
            Ok(()) => report.reverted += 1,
            Err(error) => record(&mut report.failures, wrapper, error),
        }
    }

    tracing::debug!(reverted = report.reverted, "reverted annotation wrappers");
    report
}

/// Annotate every eligible text node under `root`
pub fn apply_to_document<T: TextTree>(
    tree: &mut T,
    root: T::Id,
    config: &RuleConfig,
    preferences: &Preferences,
) -> ApplyReport {
    let revert = revert_document(tree, root);
    let mut report = ApplyReport {
        reverted: revert.reverted,
        failures: revert.failures,
        ..ApplyReport::default()
    };

    let text_nodes = match find_text_nodes(tree, root) {
        Ok(nodes) => nodes,
        Err(error) => {
            record(&mut report.failures, root, error);
            return report;
        }
    };

    let annotator = WordAnnotator::from_preferences(config, preferences);

    for node in text_nodes {
        let text = match tree.node_kind(node) {
            Ok(NodeKind::Text(text)) => text.to_string(),
            Ok(_) => {
                record(&mut report.failures, node, DocumentError::NotText);
                continue;
            }
            Err(error) => {
                record(&mut report.failures, node, error);
                continue;
            }
        };

        let units = annotator.annotate(&text);
        if !has_styled_run(&units) {
            report.unchanged += 1;
            continue;
        }

        let wrapper = tree.create_element(SPAN, &[WRAPPER_CLASS]);
        let mut sink = WrapperSink {
            tree: &mut *tree,
            parent: wrapper,
            error: None,
        };
        emit(&units, config, &mut sink);

        let result = match sink.error {
            Some(error) => Err(error),
            None => tree.replace_node(node, wrapper),
        };
        match result {
            Ok(()) => report.annotated += 1,
            Err(error) => {
                discard(tree, wrapper);
                record(&mut report.failures, node, error);
            }
        }
    }

    tracing::debug!(
        annotated = report.annotated,
        unchanged = report.unchanged,
        reverted = report.reverted,
        failures = report.failures.len(),
        "applied annotations"
    );
    report
}

/// Builds wrapper children; stops at the first error
struct WrapperSink<'t, T: TextTree> {
    tree: &'t mut T,
    parent: T::Id,
    error: Option<DocumentError>,
}

impl<T: TextTree> WrapperSink<'_, T> {
    /// Attach `child` to the wrapper, or drop it once an error occurred
    fn append(&mut self, child: T::Id) {
        let result = match self.error {
            Some(_) => Err(None),
            None => self.tree.append_child(self.parent, child).map_err(Some),
        };
        if let Err(error) = result {
            discard(&mut *self.tree, child);
            if let Some(error) = error {
                self.error = Some(error);
            }
        }
    }
}

impl<T: TextTree> RunSink for WrapperSink<'_, T> {
    fn push_text(&mut self, text: &str) {
        let node = self.tree.create_text(text);
        self.append(node);
    }

    fn push_run(&mut self, run: &AnnotatedRun, _color: Option<&str>) {
        let classes = run_classes(&run.classification, run.bold);
        let class_refs: Vec<&str> = classes.iter().map(String::as_str).collect();
        let span = self.tree.create_element(SPAN, &class_refs);
        let text = self.tree.create_text(&run.text);
        if let Err(error) = self.tree.append_child(span, text) {
            discard(&mut *self.tree, text);
            self.error.get_or_insert(error);
        }
        self.append(span);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, DocumentBuilder, NodeId};
    use glyphmark_core::ModeFlag;

    fn config() -> RuleConfig {
        RuleConfig::builder()
            .group("mirror_letters1", ['b', 'd'], Some("soft-blue"))
            .color("soft-blue", "#4a90e2")
            .build()
    }

    fn prefs() -> Preferences {
        Preferences::default().with_group("mirror_letters1")
    }

    fn page() -> Document {
        DocumentBuilder::new()
            .open("body")
            .open("p")
            .text("a bed")
            .close()
            .open("script")
            .text("var bad = 1;")
            .close()
            .open("p")
            .text("   ")
            .close()
            .open("p")
            .text("no match here")
            .close()
            .close()
            .build()
    }

    #[test]
    fn test_apply_wraps_styled_text() {
        let mut doc = page();
        let root = doc.root();
        let report = apply_to_document(&mut doc, root, &config(), &prefs());

        assert_eq!(report.annotated, 1);
        assert_eq!(report.unchanged, 1);
        assert_eq!(report.reverted, 0);
        assert!(report.is_clean());
        assert_eq!(
            doc.to_html(root),
            "<body><p><span class=\"gm-annotated\">a <span class=\"gm-group-mirror_letters1\">b</span>e\
             <span class=\"gm-group-mirror_letters1\">d</span></span></p>\
             <script>var bad = 1;</script><p>   </p><p>no match here</p></body>"
        );
    }

    #[test]
    fn test_apply_twice_equals_once() {
        let mut once = page();
        let root = once.root();
        apply_to_document(&mut once, root, &config(), &prefs());

        let mut twice = page();
        apply_to_document(&mut twice, root, &config(), &prefs());
        let report = apply_to_document(&mut twice, root, &config(), &prefs());

        assert_eq!(report.reverted, 1);
        assert_eq!(once.to_html(root), twice.to_html(root));
    }

    #[test]
    fn test_reapply_reflects_new_preferences() {
        let mut doc = page();
        let root = doc.root();
        apply_to_document(&mut doc, root, &config(), &prefs());
        let bold = Preferences::default().with_mode(ModeFlag::BoldStarts);
        apply_to_document(&mut doc, root, &config(), &bold);

        let html = doc.to_html(root);
        assert!(!html.contains("gm-group-"));
        assert!(html.contains("<span class=\"gm-anchor\">be</span>"));
    }

    #[test]
    fn test_revert_restores_original() {
        let mut doc = page();
        let root = doc.root();
        let original = doc.to_html(root);

        apply_to_document(&mut doc, root, &config(), &prefs());
        assert_ne!(doc.to_html(root), original);

        let report = revert_document(&mut doc, root);
        assert_eq!(report.reverted, 1);
        assert_eq!(doc.to_html(root), original);
    }

    #[test]
    fn test_foreign_element_with_wrapper_class_is_flattened() {
        let mut doc = DocumentBuilder::new()
            .open("p")
            .open_with_classes("em", &["note", WRAPPER_CLASS])
            .text("see ")
            .open("b")
            .text("this")
            .close()
            .close()
            .close()
            .build();
        let root = doc.root();

        let report = revert_document(&mut doc, root);
        assert_eq!(report.reverted, 1);
        assert_eq!(doc.to_html(root), "<p>see this</p>");
    }

    #[test]
    fn test_skip_tags_case_insensitive() {
        assert!(is_skipped_tag("SCRIPT"));
        assert!(is_skipped_tag("TextArea"));
        assert!(!is_skipped_tag("p"));
    }

    #[test]
    fn test_detached_root_text_is_reported() {
        let mut doc = Document::new();
        let text = doc.create_text("bed");
        let report = apply_to_document(&mut doc, text, &config(), &prefs());

        assert_eq!(report.annotated, 0);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].error, DocumentError::Detached);
    }

    #[test]
    fn test_missing_root_is_reported() {
        let mut doc = page();
        let missing = doc.create_text("gone");
        doc.remove_node(missing).unwrap();

        let report = apply_to_document(&mut doc, missing, &config(), &prefs());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].error, DocumentError::NodeMissing);
    }

    #[test]
    fn test_failed_apply_leaves_no_orphans() {
        let mut doc = Document::new();
        let text = doc.create_text("bed bed bed");
        let before = doc.len();

        for _ in 0..3 {
            let report = apply_to_document(&mut doc, text, &config(), &prefs());
            assert_eq!(report.failures.len(), 1);
            assert_eq!(doc.len(), before);
        }
    }

    /// Document whose `replace_node` refuses one chosen node
    struct RefusingTree {
        doc: Document,
        refused: NodeId,
    }

    impl TextTree for RefusingTree {
        type Id = NodeId;

        fn node_kind(&self, id: NodeId) -> Result<NodeKind<'_>, DocumentError> {
            self.doc.node_kind(id)
        }

        fn children(&self, id: NodeId) -> Result<Vec<NodeId>, DocumentError> {
            self.doc.children(id)
        }

        fn has_class(&self, id: NodeId, class: &str) -> bool {
            self.doc.has_class(id, class)
        }

        fn text_content(&self, id: NodeId) -> Result<String, DocumentError> {
            self.doc.text_content(id)
        }

        fn create_text(&mut self, text: &str) -> NodeId {
            self.doc.create_text(text)
        }

        fn create_element(&mut self, tag: &str, classes: &[&str]) -> NodeId {
            self.doc.create_element(tag, classes)
        }

        fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DocumentError> {
            self.doc.append_child(parent, child)
        }

        fn replace_node(&mut self, old: NodeId, new: NodeId) -> Result<(), DocumentError> {
            if old == self.refused {
                return Err(DocumentError::InvalidHierarchy);
            }
            self.doc.replace_node(old, new)
        }

        fn remove_node(&mut self, id: NodeId) -> Result<(), DocumentError> {
            self.doc.remove_node(id)
        }
    }

    #[test]
    fn test_failure_does_not_stop_other_nodes() {
        let doc = DocumentBuilder::new()
            .open("body")
            .open("p")
            .text("bad")
            .close()
            .open("p")
            .text("bid")
            .close()
            .open("p")
            .text("dab")
            .close()
            .close()
            .build();
        let root = doc.root();
        let body = doc.children(root).unwrap()[0];
        let middle_p = doc.children(body).unwrap()[1];
        let refused = doc.children(middle_p).unwrap()[0];
        let before = doc.len();

        let mut tree = RefusingTree { doc, refused };
        let report = apply_to_document(&mut tree, root, &config(), &prefs());

        assert_eq!(report.annotated, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].error, DocumentError::InvalidHierarchy);
        assert_eq!(report.failures[0].node, format!("{refused:?}"));

        let html = tree.doc.to_html(root);
        assert!(html.contains("<p>bid</p>"));
        assert_eq!(html.matches("gm-annotated").count(), 2);

        // each annotated node: wrapper, 2 spans, 2 span texts, 1 plain text,
        // minus the replaced original; the refused wrapper is dropped
        assert_eq!(tree.doc.len(), before + 2 * 5);
    }
}
