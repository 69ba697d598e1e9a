use crate::query::planner::plan::PlanNodeId;

use std::collections::{BTreeSet, HashMap};

/// 执行期变量：列名以及读写它的计划节点
#[derive(Debug, Clone, Default)]
pub struct Symbol {
    pub name: String,
    pub col_names: Vec<String>,
    pub readers: BTreeSet<PlanNodeId>,
    pub writers: BTreeSet<PlanNodeId>,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_col_names(mut self, col_names: Vec<String>) -> Self {
        self.col_names = col_names;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已存在时返回 false，不覆盖原有信息
    pub fn new_variable(&mut self, name: &str) -> bool {
        if self.symbols.contains_key(name) {
            return false;
        }
        self.symbols.insert(name.to_string(), Symbol::new(name));
        true
    }

    pub fn has_var(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn get_var(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn set_col_names(&mut self, name: &str, col_names: Vec<String>) {
        self.entry(name).col_names = col_names;
    }

    pub fn add_writer(&mut self, name: &str, node: PlanNodeId) {
        self.entry(name).writers.insert(node);
    }

    pub fn remove_writer(&mut self, name: &str, node: PlanNodeId) {
        if let Some(symbol) = self.symbols.get_mut(name) {
            symbol.writers.remove(&node);
        }
    }

    pub fn add_reader(&mut self, name: &str, node: PlanNodeId) {
        self.entry(name).readers.insert(node);
    }

    pub fn remove_reader(&mut self, name: &str, node: PlanNodeId) {
        if let Some(symbol) = self.symbols.get_mut(name) {
            symbol.readers.remove(&node);
        }
    }

    /// 最早写入该变量的节点
    pub fn first_writer(&self, name: &str) -> Option<PlanNodeId> {
        self.symbols
            .get(name)
            .and_then(|s| s.writers.iter().next().copied())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    fn entry(&mut self, name: &str) -> &mut Symbol {
        self.symbols
            .entry(name.to_string())
            .or_insert_with(|| Symbol::new(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_variable_is_idempotent() {
        let mut table = SymbolTable::new();
        assert!(table.new_variable("v"));
        table.set_col_names("v", vec!["_vid".into()]);
        assert!(!table.new_variable("v"));
        assert_eq!(
            table.get_var("v").map(|s| s.col_names.clone()),
            Some(vec!["_vid".to_string()])
        );
    }

    #[test]
    fn test_writers() {
        let mut table = SymbolTable::new();
        table.add_writer("v", PlanNodeId::new(3));
        table.add_writer("v", PlanNodeId::new(1));
        assert_eq!(table.first_writer("v"), Some(PlanNodeId::new(1)));
        table.remove_writer("v", PlanNodeId::new(1));
        assert_eq!(table.first_writer("v"), Some(PlanNodeId::new(3)));
        assert_eq!(table.first_writer("w"), None);
    }
}
