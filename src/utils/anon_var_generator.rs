//! 匿名变量与匿名列名生成器
//!
//! 以 '_' 开头的名字只由内部生成，用户变量不能以 '_' 开头。

use std::sync::atomic::{AtomicI64, Ordering};

/// 匿名变量生成器，生成 `__VAR_n`
#[derive(Debug, Default)]
pub struct AnonVarGenerator {
    counter: AtomicI64,
}

impl AnonVarGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_var(&self) -> String {
        let var = format!("__VAR_{}", self.counter.fetch_add(1, Ordering::Relaxed));
        log::trace!("Build anon var: {}", var);
        var
    }

    pub fn is_anno_var(var: &str) -> bool {
        var.starts_with('_')
    }
}

/// 匿名列名生成器，生成 `__COL_n`
#[derive(Debug, Default)]
pub struct AnonColGenerator {
    counter: AtomicI64,
}

impl AnonColGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_col(&self) -> String {
        format!("__COL_{}", self.counter.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_anno_var() {
        assert!(AnonVarGenerator::is_anno_var("_anon_var"));
        assert!(AnonVarGenerator::is_anno_var("_"));
        assert!(!AnonVarGenerator::is_anno_var("regular_var"));
        assert!(!AnonVarGenerator::is_anno_var(""));
    }

    #[test]
    fn test_generated_names_are_unique() {
        let vars = AnonVarGenerator::new();
        assert_eq!(vars.get_var(), "__VAR_0");
        assert_eq!(vars.get_var(), "__VAR_1");
        let cols = AnonColGenerator::new();
        assert_eq!(cols.get_col(), "__COL_0");
    }
}
