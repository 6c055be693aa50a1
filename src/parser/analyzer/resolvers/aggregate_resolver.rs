use crate::parser::ast::{Arena, Expr, NodeId};

pub struct AggregateResolver;

impl AggregateResolver {
    pub fn is_aggregate_name(name: &str) -> bool {
        matches!(
            name.to_ascii_lowercase().as_str(),
            "count" | "sum" | "avg" | "min" | "max" | "total" | "group_concat" | "string_agg"
        )
    }

    /// Window functions (`OVER`) and multi-argument `min`/`max` are not aggregates.
    pub fn is_aggregate(expr: &Expr) -> bool {
        match expr {
            Expr::Function { name, args, over: None, .. } => {
                let scalar_min_max = args.len() > 1 && (name.matches("min") || name.matches("max"));
                Self::is_aggregate_name(&name.value) && !scalar_min_max
            }
            _ => false,
        }
    }

    pub fn contains_aggregate(arena: &Arena, expr: NodeId) -> bool {
        arena.any_expr(expr, &Self::is_aggregate)
    }
}
