//! 控制流与结果收集

use std::fmt;

/// DataCollect 的收集方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataCollectKind {
    Subgraph,
    RowBasedMove,
    MToN,
    BfsShortest,
    MultiplePairShortest,
    AllPaths,
    PathProp,
}

impl fmt::Display for DataCollectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataCollectKind::Subgraph => "SUBGRAPH",
            DataCollectKind::RowBasedMove => "ROW",
            DataCollectKind::MToN => "M TO N",
            DataCollectKind::BfsShortest => "BFS SHORTEST",
            DataCollectKind::MultiplePairShortest => "MULTIPLE PAIR SHORTEST",
            DataCollectKind::AllPaths => "ALL PATHS",
            DataCollectKind::PathProp => "PATH PROP",
        };
        f.write_str(s)
    }
}
