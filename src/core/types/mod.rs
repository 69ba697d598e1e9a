//! 基础标识符与存储请求结构

use serde::{Deserialize, Serialize};
use std::fmt;

pub type GraphSpaceID = i32;
pub type PartitionID = i32;
pub type TagID = i32;
pub type EdgeType = i32;
pub type EdgeRanking = i64;
pub type IndexID = i32;

/// 保留列名
pub const K_VID: &str = "_vid";
pub const K_SRC: &str = "_src";
pub const K_DST: &str = "_dst";
pub const K_TYPE: &str = "_type";
pub const K_RANK: &str = "_rank";
pub const K_TAG: &str = "_tag";
pub const K_EXPAND_DST: &str = "_expand_dst";

/// 主机地址
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HostAddr {
    pub host: String,
    pub port: u16,
}

impl HostAddr {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// 空主机名或零端口视为无效地址（例如存储端未给出 leader 提示）
    pub fn is_valid(&self) -> bool {
        !self.host.is_empty() && self.port != 0
    }
}

impl fmt::Display for HostAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\":{}", self.host, self.port)
    }
}

/// 边方向
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDirection {
    #[default]
    Out,
    In,
    Both,
}

impl EdgeDirection {
    pub fn reverse(self) -> Self {
        match self {
            EdgeDirection::Out => EdgeDirection::In,
            EdgeDirection::In => EdgeDirection::Out,
            EdgeDirection::Both => EdgeDirection::Both,
        }
    }
}

impl fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EdgeDirection::Out => "OUT_EDGE",
            EdgeDirection::In => "IN_EDGE",
            EdgeDirection::Both => "BOTH",
        };
        f.write_str(s)
    }
}

/// 空间信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceInfo {
    pub id: GraphSpaceID,
    pub name: String,
}

impl SpaceInfo {
    pub fn new(id: GraphSpaceID, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// 存储请求中的点属性描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexProp {
    pub tag: TagID,
    pub props: Vec<String>,
}

/// 存储请求中的边属性描述，`edge_type` 为负表示入边
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeProp {
    pub edge_type: EdgeType,
    pub props: Vec<String>,
}

/// 单个索引的查询上下文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexQueryContext {
    pub index_id: IndexID,
    pub filter: Option<crate::core::Expression>,
}

/// 分区扫描游标
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCursor {
    pub next_cursor: Option<Vec<u8>>,
}

impl ScanCursor {
    pub fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }
}
