use std::collections::HashMap;

/// Logical (as written in queries) to physical (as attached) database names.
/// Built once from a list of pairs; both directions are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbNameMap {
    pairs: Vec<(String, String)>,
    by_logical: HashMap<String, usize>,
    by_physical: HashMap<String, usize>,
}

impl DbNameMap {
    pub fn new<L, P>(pairs: impl IntoIterator<Item = (L, P)>) -> Self
    where
        L: Into<String>,
        P: Into<String>,
    {
        let mut map = Self::default();
        for (logical, physical) in pairs {
            let (logical, physical) = (logical.into(), physical.into());
            let index = map.pairs.len();
            map.by_logical.insert(logical.to_lowercase(), index);
            map.by_physical.insert(physical.to_lowercase(), index);
            map.pairs.push((logical, physical));
        }
        map
    }

    pub fn physical_of(&self, logical: &str) -> Option<&str> {
        self.by_logical.get(&logical.to_lowercase()).map(|i| self.pairs[*i].1.as_str())
    }

    pub fn logical_of(&self, physical: &str) -> Option<&str> {
        self.by_physical.get(&physical.to_lowercase()).map(|i| self.pairs[*i].0.as_str())
    }

    pub fn contains_logical(&self, logical: &str) -> bool {
        self.by_logical.contains_key(&logical.to_lowercase())
    }

    pub fn contains_physical(&self, physical: &str) -> bool {
        self.by_physical.contains_key(&physical.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(l, p)| (l.as_str(), p.as_str()))
    }
}
