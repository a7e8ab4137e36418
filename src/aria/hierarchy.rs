//! Role hierarchy expansion.

use std::collections::HashMap;

use super::tables::Tables;
use crate::error::{Error, Result};

impl Tables {
    /// `role` followed by every role that inherits from it, transitively.
    ///
    /// Order: the role itself, then its direct children, then the expansion
    /// of each child in turn. A role reachable along several paths appears
    /// only once, at its first position.
    pub fn sub_roles<'a>(&'a self, role: &'a str) -> Vec<&'a str> {
        let children = self.children(role);
        let mut result = vec![role];

        for child in children {
            push_unique(&mut result, child);
        }
        for child in children {
            for descendant in self.sub_roles(child) {
                push_unique(&mut result, descendant);
            }
        }

        result
    }

    /// Fail with the first role found on a cycle in the hierarchy.
    pub(crate) fn check_acyclic(&self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            InProgress,
            Done,
        }

        fn visit<'a>(
            tables: &'a Tables,
            role: &'a str,
            marks: &mut HashMap<&'a str, Mark>,
        ) -> Result<()> {
            match marks.get(role) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::InProgress) => return Err(Error::CyclicRoleHierarchy(role.to_string())),
                None => {}
            }
            marks.insert(role, Mark::InProgress);
            for child in tables.children(role) {
                visit(tables, child, marks)?;
            }
            marks.insert(role, Mark::Done);
            Ok(())
        }

        let mut roots: Vec<&str> = self.hierarchy.keys().map(String::as_str).collect();
        roots.sort_unstable();

        let mut marks = HashMap::new();
        for role in roots {
            visit(self, role, &mut marks)?;
        }
        Ok(())
    }
}

fn push_unique<'a>(roles: &mut Vec<&'a str>, role: &'a str) {
    if !roles.contains(&role) {
        roles.push(role);
    }
}
