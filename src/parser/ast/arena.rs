use std::ops::Range;

use crate::parser::ast::{Cte, Expr, OrderingTerm, ResultColumn, Select, SelectCore, Source};

/// Index of a node inside an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Select(Select),
    Core(SelectCore),
    ResultColumn(ResultColumn),
    Source(Source),
    Cte(Cte),
    OrderingTerm(OrderingTerm),
    Expr(Expr),
}

impl Payload {
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Payload::Select(select) => select.children(),
            Payload::Core(core) => core.children(),
            Payload::ResultColumn(column) => column.children(),
            Payload::Source(source) => source.children(),
            Payload::Cte(cte) => vec![cte.select],
            Payload::OrderingTerm(term) => vec![term.expr],
            Payload::Expr(expr) => expr.children(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub parent: Option<NodeId>,
    /// Range in the token list the node was parsed from.
    pub tokens: Range<usize>,
    /// Levels of the subtree rooted here as allocated; a leaf is 1.
    pub height: usize,
    pub payload: Payload,
}

/// Owner of every node of a statement. Children are referenced by [`NodeId`] and
/// know their parent, which is updated through [`Arena::reparent`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Stores a node and attaches all of its children to it.
    pub fn alloc(&mut self, payload: Payload, tokens: Range<usize>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let children = payload.children();
        let height = 1 + children.iter().map(|child| self.height(*child)).max().unwrap_or(0);
        self.nodes.push(Node { parent: None, tokens, height, payload });
        for child in children {
            self.reparent(child, id);
        }
        id
    }

    pub fn reparent(&mut self, node: NodeId, new_parent: NodeId) {
        self.nodes[node.0].parent = Some(new_parent);
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).parent
    }

    pub fn height(&self, id: NodeId) -> usize {
        self.get(id).height
    }

    pub fn expr(&self, id: NodeId) -> Option<&Expr> {
        match &self.get(id).payload {
            Payload::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn expr_mut(&mut self, id: NodeId) -> Option<&mut Expr> {
        match &mut self.get_mut(id).payload {
            Payload::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn select(&self, id: NodeId) -> Option<&Select> {
        match &self.get(id).payload {
            Payload::Select(select) => Some(select),
            _ => None,
        }
    }

    pub fn core(&self, id: NodeId) -> Option<&SelectCore> {
        match &self.get(id).payload {
            Payload::Core(core) => Some(core),
            _ => None,
        }
    }

    pub fn core_mut(&mut self, id: NodeId) -> Option<&mut SelectCore> {
        match &mut self.get_mut(id).payload {
            Payload::Core(core) => Some(core),
            _ => None,
        }
    }

    pub fn result_column(&self, id: NodeId) -> Option<&ResultColumn> {
        match &self.get(id).payload {
            Payload::ResultColumn(column) => Some(column),
            _ => None,
        }
    }

    pub fn source(&self, id: NodeId) -> Option<&Source> {
        match &self.get(id).payload {
            Payload::Source(source) => Some(source),
            _ => None,
        }
    }

    pub fn cte(&self, id: NodeId) -> Option<&Cte> {
        match &self.get(id).payload {
            Payload::Cte(cte) => Some(cte),
            _ => None,
        }
    }

    pub fn ordering_term(&self, id: NodeId) -> Option<&OrderingTerm> {
        match &self.get(id).payload {
            Payload::OrderingTerm(term) => Some(term),
            _ => None,
        }
    }

    /// True when `predicate` holds for the expression `id` or any expression below
    /// it. Nested SELECTs are separate scopes and are not visited.
    pub fn any_expr(&self, id: NodeId, predicate: &dyn Fn(&Expr) -> bool) -> bool {
        let expr = match self.expr(id) {
            Some(expr) => expr,
            None => return false,
        };
        if predicate(expr) {
            return true;
        }
        expr.children()
            .into_iter()
            .filter(|child| self.expr(*child).is_some())
            .any(|child| self.any_expr(child, predicate))
    }
}
