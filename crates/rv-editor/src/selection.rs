//! Current selection: ordered node and connection ids plus the primary
//! item that property edits and z-order actions apply to.

use rv_core::{Document, Id};
use rv_render::SelectionView;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    nodes: Vec<Id>,
    connections: Vec<Id>,
    primary_node: Option<Id>,
    primary_connection: Option<Id>,
}

impl Selection {
    pub fn nodes(&self) -> &[Id] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Id] {
        &self.connections
    }

    pub fn primary_node(&self) -> Option<Id> {
        self.primary_node
    }

    pub fn primary_connection(&self) -> Option<Id> {
        self.primary_connection
    }

    /// Primary node if any, otherwise the primary connection.
    pub fn primary(&self) -> Option<Id> {
        self.primary_node.or(self.primary_connection)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connections.is_empty()
    }

    pub fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains(&id)
    }

    pub fn contains_connection(&self, id: Id) -> bool {
        self.connections.contains(&id)
    }

    pub fn view(&self) -> SelectionView<'_> {
        SelectionView {
            nodes: &self.nodes,
            connections: &self.connections,
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.connections.clear();
        self.primary_node = None;
        self.primary_connection = None;
    }

    /// Make `id` the only selected item.
    pub fn select_node(&mut self, id: Id) {
        self.clear();
        self.nodes.push(id);
        self.primary_node = Some(id);
    }

    pub fn select_connection(&mut self, id: Id) {
        self.clear();
        self.connections.push(id);
        self.primary_connection = Some(id);
    }

    /// Keep the current selection and make `id` the primary node.
    pub fn focus_node(&mut self, id: Id) {
        if !self.nodes.contains(&id) {
            self.nodes.push(id);
        }
        self.primary_node = Some(id);
    }

    /// Shift-click: add `id` if absent, remove it otherwise.
    pub fn toggle_node(&mut self, id: Id) {
        if let Some(pos) = self.nodes.iter().position(|n| *n == id) {
            self.nodes.remove(pos);
            if self.primary_node == Some(id) {
                self.primary_node = self.nodes.last().copied();
            }
        } else {
            self.focus_node(id);
        }
    }

    pub fn toggle_connection(&mut self, id: Id) {
        if let Some(pos) = self.connections.iter().position(|c| *c == id) {
            self.connections.remove(pos);
            if self.primary_connection == Some(id) {
                self.primary_connection = self.connections.last().copied();
            }
        } else {
            self.connections.push(id);
            self.primary_connection = Some(id);
        }
    }

    /// Replace the selection with the result of a range query. The last
    /// node becomes primary; with no nodes, the last connection does.
    pub fn set_range(&mut self, nodes: Vec<Id>, connections: Vec<Id>) {
        self.clear();
        self.primary_node = nodes.last().copied();
        if self.primary_node.is_none() {
            self.primary_connection = connections.last().copied();
        }
        self.nodes = nodes;
        self.connections = connections;
    }

    pub fn select_all(&mut self, doc: &Document) {
        self.set_range(
            doc.nodes.iter().map(|n| n.id).collect(),
            doc.connections.iter().map(|c| c.id).collect(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_select_replaces_both_kinds() {
        let mut sel = Selection::default();
        sel.select_connection(Id::intern("sel_c"));
        sel.select_node(Id::intern("sel_a"));
        assert_eq!(sel.nodes(), &[Id::intern("sel_a")]);
        assert!(sel.connections().is_empty());
        assert_eq!(sel.primary_connection(), None);
        assert_eq!(sel.primary(), Some(Id::intern("sel_a")));
    }

    #[test]
    fn toggle_moves_primary_to_last() {
        let (a, b) = (Id::intern("sel_ta"), Id::intern("sel_tb"));
        let mut sel = Selection::default();
        sel.select_node(a);
        sel.toggle_node(b);
        assert_eq!(sel.primary_node(), Some(b));
        sel.toggle_node(b);
        assert_eq!(sel.nodes(), &[a]);
        assert_eq!(sel.primary_node(), Some(a));
    }

    #[test]
    fn range_prefers_last_node_as_primary() {
        let mut sel = Selection::default();
        sel.set_range(vec![Id::intern("sel_r1"), Id::intern("sel_r2")], vec![Id::intern("sel_rc")]);
        assert_eq!(sel.primary_node(), Some(Id::intern("sel_r2")));
        assert_eq!(sel.primary_connection(), None);

        sel.set_range(vec![], vec![Id::intern("sel_rc")]);
        assert_eq!(sel.primary(), Some(Id::intern("sel_rc")));
    }
}
