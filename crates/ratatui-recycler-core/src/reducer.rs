use crate::node::Node;

/// Flattens a document tree into the items shown by the list, one per position.
///
/// The tree is taken by value: reducers may tear it apart. Reduce a clone to keep the original.
pub trait Reducer {
    fn reduce(&self, root: Node) -> Vec<Node>;
}

impl<F> Reducer for F
where
    F: Fn(Node) -> Vec<Node>,
{
    fn reduce(&self, root: Node) -> Vec<Node> {
        self(root)
    }
}

/// Default reducer: the root's direct children (usually the top-level blocks), detached.
#[derive(Clone, Copy, Debug, Default)]
pub struct TopLevelReducer;

impl Reducer for TopLevelReducer {
    fn reduce(&self, mut root: Node) -> Vec<Node> {
        root.detach_children()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use crate::node::NodeVariant;

    fn document() -> Node {
        Node::new(NodeKind::Document).with_children([
            Node::new(NodeKind::Heading { level: 1 }).with_children([Node::text("title")]),
            Node::new(NodeKind::List { start: None }).with_children([
                Node::new(NodeKind::Item).with_children([Node::text("one")]),
                Node::new(NodeKind::Item).with_children([Node::text("two")]),
            ]),
            Node::new(NodeKind::Paragraph).with_children([Node::text("body")]),
        ])
    }

    #[test]
    fn top_level_reducer_keeps_direct_children_in_order() {
        let items = TopLevelReducer.reduce(document());
        let variants = items.iter().map(Node::variant).collect::<Vec<_>>();
        assert_eq!(
            variants,
            vec![NodeVariant::Heading, NodeVariant::List, NodeVariant::Paragraph]
        );
        assert_eq!(items[1].children().len(), 2);
    }

    #[test]
    fn reduced_items_are_independent_of_the_source_tree() {
        let tree = document();
        let kept = tree.clone();
        let mut items = TopLevelReducer.reduce(tree);
        items[0].detach_children();
        assert_eq!(kept.first_child().map(Node::literal_text).as_deref(), Some("title"));
    }

    #[test]
    fn empty_document_reduces_to_nothing() {
        assert!(TopLevelReducer.reduce(Node::new(NodeKind::Document)).is_empty());
    }

    #[test]
    fn closures_can_flatten_recursively() {
        let flatten = |root: Node| {
            fn walk(node: Node, out: &mut Vec<Node>) {
                let mut node = node;
                let children = node.detach_children();
                let is_container = matches!(node.variant(), NodeVariant::List);
                if !is_container {
                    out.push(node.with_children(children));
                    return;
                }
                for child in children {
                    walk(child, out);
                }
            }
            let mut out = Vec::new();
            let mut root = root;
            for child in root.detach_children() {
                walk(child, &mut out);
            }
            out
        };
        let items = flatten.reduce(document());
        assert_eq!(items.len(), 4);
        assert_eq!(items[1].variant(), NodeVariant::Item);
        assert_eq!(items[2].literal_text(), "two");
    }
}
