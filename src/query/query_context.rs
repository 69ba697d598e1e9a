//! 查询上下文
//!
//! 每个查询独占一个上下文，持有计划节点对象池、符号表、匿名名字生成器、
//! 执行前需要预置的变量值以及 Schema/索引访问接口。规划是单线程的，
//! 所有修改都通过 `&mut QueryContext` 完成。

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::PlannerConfig;
use crate::core::Value;
use crate::query::context::managers::{IndexManager, SchemaManager};
use crate::query::context::symbol::SymbolTable;
use crate::query::planner::plan::{ObjectPool, PlanNode, PlanNodeId, PlanNodeKind};
use crate::utils::{AnonColGenerator, AnonVarGenerator};

pub struct QueryContext {
    query_id: i64,
    obj_pool: ObjectPool,
    sym_table: SymbolTable,
    var_gen: AnonVarGenerator,
    col_gen: AnonColGenerator,
    /// 执行前写入的变量值，例如常量起点与循环计数器
    initial_values: HashMap<String, Value>,
    schema_manager: Arc<dyn SchemaManager>,
    index_manager: Arc<dyn IndexManager>,
    planner_config: PlannerConfig,
}

impl QueryContext {
    pub fn new(
        query_id: i64,
        schema_manager: Arc<dyn SchemaManager>,
        index_manager: Arc<dyn IndexManager>,
    ) -> Self {
        Self {
            query_id,
            obj_pool: ObjectPool::new(),
            sym_table: SymbolTable::new(),
            var_gen: AnonVarGenerator::new(),
            col_gen: AnonColGenerator::new(),
            initial_values: HashMap::new(),
            schema_manager,
            index_manager,
            planner_config: PlannerConfig::default(),
        }
    }

    pub fn with_planner_config(mut self, config: PlannerConfig) -> Self {
        self.planner_config = config;
        self
    }

    pub fn query_id(&self) -> i64 {
        self.query_id
    }

    pub fn pool(&self) -> &ObjectPool {
        &self.obj_pool
    }

    pub fn sym_table(&self) -> &SymbolTable {
        &self.sym_table
    }

    pub fn sym_table_mut(&mut self) -> &mut SymbolTable {
        &mut self.sym_table
    }

    pub fn schema_manager(&self) -> &Arc<dyn SchemaManager> {
        &self.schema_manager
    }

    pub fn index_manager(&self) -> &Arc<dyn IndexManager> {
        &self.index_manager
    }

    pub fn planner_config(&self) -> &PlannerConfig {
        &self.planner_config
    }

    /// 生成匿名变量并登记到符号表
    pub fn anon_var(&mut self) -> String {
        let var = self.var_gen.get_var();
        self.sym_table.new_variable(&var);
        var
    }

    pub fn anon_col(&self) -> String {
        self.col_gen.get_col()
    }

    pub fn set_value(&mut self, var: &str, value: Value) {
        self.sym_table.new_variable(var);
        self.initial_values.insert(var.to_string(), value);
    }

    pub fn get_value(&self, var: &str) -> Option<&Value> {
        self.initial_values.get(var)
    }

    pub fn node(&self, id: PlanNodeId) -> &PlanNode {
        &self.obj_pool[id]
    }

    /// 创建节点
    ///
    /// 输出变量为 `__<Kind>_<id>`，输入变量依次取各依赖的输出变量。
    pub fn make_node(&mut self, kind: PlanNodeKind, deps: Vec<PlanNodeId>) -> PlanNodeId {
        let id = self.obj_pool.next_id();
        let output_var = format!("__{}_{}", kind.name(), id.index());
        let input_vars: Vec<String> = deps
            .iter()
            .map(|d| self.obj_pool[*d].output_var().to_string())
            .collect();
        let col_names = if kind.inherits_input_col_names() {
            deps.first()
                .map(|d| self.obj_pool[*d].col_names().to_vec())
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        self.sym_table.new_variable(&output_var);
        self.sym_table.add_writer(&output_var, id);
        self.sym_table.set_col_names(&output_var, col_names.clone());
        for var in &input_vars {
            self.sym_table.add_reader(var, id);
        }

        log::trace!("Make plan node {} {}", kind.name(), id);
        self.obj_pool.push(PlanNode::new(id, kind, deps, input_vars, output_var, col_names))
    }

    pub fn set_output_var(&mut self, id: PlanNodeId, var: &str) {
        let old = self.obj_pool[id].output_var.clone();
        self.sym_table.remove_writer(&old, id);
        self.sym_table.new_variable(var);
        self.sym_table.add_writer(var, id);
        let col_names = self.obj_pool[id].col_names.clone();
        self.sym_table.set_col_names(var, col_names);
        self.obj_pool[id].output_var = var.to_string();
    }

    pub fn set_input_var(&mut self, id: PlanNodeId, var: &str) {
        self.set_input_var_at(id, 0, var);
    }

    pub fn set_input_var_at(&mut self, id: PlanNodeId, idx: usize, var: &str) {
        let node = &mut self.obj_pool[id];
        if idx < node.input_vars.len() {
            let old = std::mem::replace(&mut node.input_vars[idx], var.to_string());
            self.sym_table.remove_reader(&old, id);
        } else {
            node.input_vars.resize(idx, String::new());
            node.input_vars.push(var.to_string());
        }
        self.sym_table.add_reader(var, id);
    }

    pub fn set_col_names(&mut self, id: PlanNodeId, col_names: Vec<String>) {
        let node = &mut self.obj_pool[id];
        node.col_names = col_names.clone();
        let var = node.output_var.clone();
        self.sym_table.set_col_names(&var, col_names);
    }

    /// 设置第 `idx` 个依赖，不改变输入变量
    pub fn set_dep(&mut self, id: PlanNodeId, idx: usize, dep: PlanNodeId) {
        let node = &mut self.obj_pool[id];
        if idx < node.deps.len() {
            node.deps[idx] = dep;
        } else {
            node.deps.push(dep);
        }
    }

    pub fn kind_mut(&mut self, id: PlanNodeId) -> &mut PlanNodeKind {
        self.obj_pool[id].kind_mut()
    }
}

impl std::fmt::Debug for QueryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryContext")
            .field("query_id", &self.query_id)
            .field("nodes", &self.obj_pool.len())
            .field("vars", &self.sym_table.len())
            .finish()
    }
}
