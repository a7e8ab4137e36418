//! Host capabilities the accessibility queries are written against.
//!
//! Role resolution and attribute reading only ever *read* from a tree. Any
//! DOM-like structure can be queried by implementing [`Element`] for its
//! element handles and [`TreeNode`] for its node handles. The bundled
//! [`crate::dom`] module provides an implementation backed by html5ever.

use std::ops::ControlFlow;

use crate::error::Result;

/// Computed value of the CSS `display` property, reduced to what matters for
/// rendering decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Inline,
    Block,
    Contents,
    None,
}

/// Computed value of the CSS `visibility` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapse,
}

/// The subset of computed style consulted by accessibility queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComputedStyle {
    pub display: Display,
    pub visibility: Visibility,
}

/// Read-only view of a single element.
///
/// Native property accessors return `None` when the element type does not
/// expose the property at all (a `<div>` has no `disabled`).
pub trait Element {
    /// Raw value of the attribute `name`.
    fn attribute(&self, name: &str) -> Option<&str>;

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Lowercase local name (`"h2"`, `"header"`).
    fn tag_name(&self) -> &str;

    /// Test the element against a CSS selector list.
    fn matches_css(&self, selectors: &str) -> Result<bool>;

    fn disabled(&self) -> Option<bool>;

    fn placeholder(&self) -> Option<String>;

    fn required(&self) -> Option<bool>;

    fn read_only(&self) -> Option<bool>;

    /// The native `hidden` flag.
    fn hidden(&self) -> bool;

    /// Result of constraint validation (`true` when valid), or `None` when
    /// the element has no validity API.
    fn check_validity(&self) -> Option<bool>;

    fn computed_style(&self) -> ComputedStyle;
}

/// A node in a tree of mixed node kinds (elements, text, comments).
pub trait TreeNode: Sized {
    type Element: Element;

    /// The element view of this node, if it is an element node.
    fn as_element(&self) -> Option<Self::Element>;

    /// Child nodes in document order.
    fn children(&self) -> impl Iterator<Item = Self>;
}

/// Visitor decision for [`walk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    SkipChildren,
    Stop,
}

/// Depth-first pre-order traversal starting at (and including) `root`.
///
/// Returns `ControlFlow::Break(())` when the visitor stopped the walk early.
pub fn walk<N, F>(root: N, mut visit: F) -> ControlFlow<()>
where
    N: TreeNode,
    F: FnMut(&N) -> Walk,
{
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        match visit(&node) {
            Walk::Stop => return ControlFlow::Break(()),
            Walk::SkipChildren => {}
            Walk::Continue => {
                // Push children in reverse order for left-to-right traversal
                let mut children: Vec<_> = node.children().collect();
                children.reverse();
                stack.extend(children);
            }
        }
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Toy {
        name: &'static str,
        kids: Vec<Toy>,
    }

    fn toy(name: &'static str, kids: Vec<Toy>) -> Toy {
        Toy { name, kids }
    }

    impl Element for Toy {
        fn attribute(&self, _name: &str) -> Option<&str> {
            None
        }
        fn tag_name(&self) -> &str {
            self.name
        }
        fn matches_css(&self, selectors: &str) -> Result<bool> {
            Ok(selectors == self.name)
        }
        fn disabled(&self) -> Option<bool> {
            None
        }
        fn placeholder(&self) -> Option<String> {
            None
        }
        fn required(&self) -> Option<bool> {
            None
        }
        fn read_only(&self) -> Option<bool> {
            None
        }
        fn hidden(&self) -> bool {
            false
        }
        fn check_validity(&self) -> Option<bool> {
            None
        }
        fn computed_style(&self) -> ComputedStyle {
            ComputedStyle::default()
        }
    }

    impl TreeNode for Toy {
        type Element = Toy;

        fn as_element(&self) -> Option<Toy> {
            Some(self.clone())
        }

        fn children(&self) -> impl Iterator<Item = Toy> {
            self.kids.clone().into_iter()
        }
    }

    fn sample() -> Toy {
        toy(
            "a",
            vec![
                toy("b", vec![toy("c", vec![]), toy("d", vec![])]),
                toy("e", vec![toy("f", vec![])]),
            ],
        )
    }

    #[test]
    fn test_walk_preorder() {
        let mut seen = Vec::new();
        let flow = walk(sample(), |n| {
            seen.push(n.name);
            Walk::Continue
        });
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(seen, ["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_walk_skip_children() {
        let mut seen = Vec::new();
        walk(sample(), |n| {
            seen.push(n.name);
            if n.name == "b" {
                Walk::SkipChildren
            } else {
                Walk::Continue
            }
        });
        assert_eq!(seen, ["a", "b", "e", "f"]);
    }

    #[test]
    fn test_walk_stop() {
        let mut seen = Vec::new();
        let flow = walk(sample(), |n| {
            seen.push(n.name);
            if n.name == "d" { Walk::Stop } else { Walk::Continue }
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(seen, ["a", "b", "c", "d"]);
    }
}
