use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use graphdb_planner::config::Config;
use graphdb_planner::core::{DBError, DBResult};
use graphdb_planner::query::context::managers::MemorySchemaManager;
use graphdb_planner::query::context::AstContext;
use graphdb_planner::query::planner::{ExecutionPlan, PlannersRegister};
use graphdb_planner::query::QueryContext;
use graphdb_planner::utils::logging;

/// 为一条校验后的语句生成执行计划并以 JSON 输出
#[derive(Parser, Debug)]
#[clap(version = "0.1.0", author = "GraphDB Contributors")]
struct Cli {
    /// 配置文件，缺省使用默认配置
    #[clap(short, long)]
    config: Option<PathBuf>,
    /// JSON 格式的 Schema 与索引定义
    #[clap(short, long)]
    schema: PathBuf,
    /// JSON 格式的语句上下文
    #[clap(short, long)]
    ast: PathBuf,
}

fn run(cli: &Cli) -> DBResult<String> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    logging::init(&config.log).map_err(|e| DBError::Config(e.to_string()))?;

    let schema: MemorySchemaManager = serde_json::from_str(&std::fs::read_to_string(&cli.schema)?)?;
    let ast_ctx: AstContext = serde_json::from_str(&std::fs::read_to_string(&cli.ast)?)?;
    log::info!("Planning {}", ast_ctx.sentence());

    let schema = Arc::new(schema);
    let mut qctx =
        QueryContext::new(1, schema.clone(), schema).with_planner_config(config.planner.clone());
    let registry = PlannersRegister::registry();
    let sub_plan = registry.to_plan(&mut qctx, &ast_ctx)?;
    let plan = ExecutionPlan::from_sub_plan(&qctx, &sub_plan);
    Ok(serde_json::to_string_pretty(&plan.describe(&qctx))?)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = run(&cli);
    let code = match result {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Planning failed: {}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    };
    logging::shutdown();
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphdb_planner::query::planner::plan::PlanNodeDescription;
    use std::fs;
    use std::path::Path;

    const GO_AST: &str = r#"{"Go": {"base": {"sentence": "GO FROM 1 OVER like", "space": {"id": 1, "name": "nba"}},
        "from": {"vids": [{"Int": 1}]},
        "over": {"edge_types": [5], "direction": "Out"},
        "steps": {"m_steps": 0, "n_steps": 1, "is_m_to_n": false}}}"#;

    /// 日志写入临时目录，Schema 只含 person 标签和 like 边
    fn write_inputs(dir: &Path) -> Cli {
        let mut config = Config::default();
        config.log.dir = dir.join("logs").to_string_lossy().into_owned();
        let config_path = dir.join("planner.toml");
        config.save(&config_path).expect("Failed to save config");

        let schema = MemorySchemaManager::new()
            .with_tag(1, 2, "person", &["name"])
            .with_edge(1, 5, "like", &["likeness"]);
        let schema_path = dir.join("schema.json");
        fs::write(
            &schema_path,
            serde_json::to_string(&schema).expect("Failed to serialize schema"),
        )
        .expect("Failed to write schema");

        let ast_path = dir.join("ast.json");
        fs::write(&ast_path, GO_AST).expect("Failed to write ast");

        Cli {
            config: Some(config_path),
            schema: schema_path,
            ast: ast_path,
        }
    }

    #[test]
    fn test_run_plans_go_from_files() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let cli = write_inputs(dir.path());

        let output = run(&cli).expect("Expected plan output to exist");
        let nodes: Vec<PlanNodeDescription> =
            serde_json::from_str(&output).expect("Expected plan output to be JSON");
        assert!(nodes.iter().any(|n| n.name == "GetNeighbors"));
    }

    #[test]
    fn test_run_rejects_malformed_ast() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let cli = write_inputs(dir.path());
        fs::write(&cli.ast, "GO FROM 1 OVER like").expect("Failed to write ast");

        let err = run(&cli).expect_err("ast file is not JSON");
        assert!(matches!(err, DBError::Serialization(_)), "unexpected error: {}", err);
    }
}
