//! 比赛元数据
//!
//! 元数据描述机器人所处的场地、起始区域、运行模式以及比赛时长。
//! 机器人控制器把状态写成 JSON 文档：
//!
//! ```json
//! {
//!   "status": "RUNNING",
//!   "metadata": { "arena": "A", "zone": 2, "mode": "COMP", "marker_offset": 0,
//!                 "game_timeout": 150, "wifi_enabled": true },
//!   "disk_info": { "mount_path": "/media/usercode" }
//! }
//! ```
//!
//! 获取失败时（文件不存在、JSON 不合法、状态不是 `RUNNING`）记录警告并回退到默认值。

use serde::{Deserialize, Serialize};
use sr_types::RobotMode;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// 元数据错误
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Metadata file {path} could not be read: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not decode JSON metadata: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot get metadata, metadata service is {0}")]
    NotRunning(String),
}

/// 比赛元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// 场地名称，不在比赛中时为 `"A"`
    pub arena: String,
    /// 起始区域
    pub zone: u32,
    pub mode: RobotMode,
    /// 标记 ID 偏移
    pub marker_offset: u32,
    /// 比赛时长（秒）
    pub game_timeout: Option<u64>,
    pub wifi_enabled: bool,
    pub wifi_ssid: Option<String>,
    pub wifi_psk: Option<String>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            arena: "A".to_string(),
            zone: 0,
            mode: RobotMode::Dev,
            marker_offset: 0,
            game_timeout: None,
            wifi_enabled: false,
            wifi_ssid: None,
            wifi_psk: None,
        }
    }
}

impl Metadata {
    pub fn game_timeout(&self) -> Option<Duration> {
        self.game_timeout.map(Duration::from_secs)
    }
}

/// 一次获取的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedMetadata {
    pub metadata: Metadata,
    /// U 盘（代码盘）挂载路径
    pub usb_path: Option<PathBuf>,
}

/// 元数据来源
pub trait MetadataSource: Send + Sync {
    fn fetch(&self) -> Result<FetchedMetadata, MetadataError>;
}

impl fmt::Debug for dyn MetadataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MetadataSource")
    }
}

/// 获取元数据，失败时回退到默认值
pub fn fetch_or_default(source: &dyn MetadataSource) -> FetchedMetadata {
    match source.fetch() {
        Ok(fetched) => {
            debug!("Received metadata: {:?}", fetched.metadata);
            fetched
        },
        Err(e) => {
            warn!("{}; using default metadata", e);
            FetchedMetadata::default()
        },
    }
}

/// 固定元数据（开发或测试使用）
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    fetched: FetchedMetadata,
}

impl StaticMetadata {
    pub fn new(metadata: Metadata) -> Self {
        Self {
            fetched: FetchedMetadata {
                metadata,
                usb_path: None,
            },
        }
    }

    pub fn with_usb_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fetched.usb_path = Some(path.into());
        self
    }
}

impl MetadataSource for StaticMetadata {
    fn fetch(&self) -> Result<FetchedMetadata, MetadataError> {
        Ok(self.fetched.clone())
    }
}

/// 从 JSON 状态文件读取元数据
///
/// 每次 `fetch` 都重新读取文件，比赛开始前插入的元数据 U 盘因此可以生效。
#[derive(Debug, Clone)]
pub struct JsonFileMetadata {
    path: PathBuf,
}

#[derive(Deserialize)]
struct StatusDocument {
    status: String,
    #[serde(default)]
    metadata: Metadata,
    #[serde(default)]
    disk_info: Option<DiskInfo>,
}

#[derive(Deserialize)]
struct DiskInfo {
    mount_path: PathBuf,
}

impl JsonFileMetadata {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 解析状态文档
    pub fn parse(json: &str) -> Result<FetchedMetadata, MetadataError> {
        let document: StatusDocument = serde_json::from_str(json)?;
        if !document.status.eq_ignore_ascii_case("RUNNING") {
            return Err(MetadataError::NotRunning(document.status));
        }
        Ok(FetchedMetadata {
            metadata: document.metadata,
            usb_path: document.disk_info.map(|d| d.mount_path),
        })
    }
}

impl MetadataSource for JsonFileMetadata {
    fn fetch(&self) -> Result<FetchedMetadata, MetadataError> {
        let json = std::fs::read_to_string(&self.path).map_err(|source| MetadataError::Io {
            path: self.path.clone(),
            source,
        })?;
        Self::parse(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let metadata = Metadata::default();
        assert_eq!(metadata.arena, "A");
        assert_eq!(metadata.zone, 0);
        assert_eq!(metadata.mode, RobotMode::Dev);
        assert_eq!(metadata.marker_offset, 0);
        assert_eq!(metadata.game_timeout(), None);
    }

    #[test]
    fn test_parse_running_document() {
        let fetched = JsonFileMetadata::parse(
            r#"{
                "status": "RUNNING",
                "metadata": {
                    "arena": "B", "zone": 3, "mode": "COMP", "marker_offset": 100,
                    "game_timeout": 150, "wifi_enabled": true, "wifi_ssid": "robot",
                    "wifi_psk": "secret", "kernel_version": "6.1"
                },
                "disk_info": {"mount_path": "/media/usercode", "disk_type": "USERCODE"}
            }"#,
        )
        .unwrap();

        let m = &fetched.metadata;
        assert_eq!(m.arena, "B");
        assert_eq!(m.zone, 3);
        assert_eq!(m.mode, RobotMode::Comp);
        assert_eq!(m.marker_offset, 100);
        assert_eq!(m.game_timeout(), Some(Duration::from_secs(150)));
        assert_eq!(m.wifi_ssid.as_deref(), Some("robot"));
        assert_eq!(fetched.usb_path, Some(PathBuf::from("/media/usercode")));
    }

    #[test]
    fn test_partial_metadata_uses_defaults() {
        let fetched = JsonFileMetadata::parse(r#"{"status": "RUNNING", "metadata": {"zone": 1}}"#)
            .unwrap();
        assert_eq!(fetched.metadata.zone, 1);
        assert_eq!(fetched.metadata.arena, "A");
        assert_eq!(fetched.usb_path, None);
    }

    #[test]
    fn test_not_running_and_bad_json() {
        assert!(matches!(
            JsonFileMetadata::parse(r#"{"status": "STOPPED"}"#),
            Err(MetadataError::NotRunning(s)) if s == "STOPPED"
        ));
        assert!(matches!(
            JsonFileMetadata::parse("{not json"),
            Err(MetadataError::Json(_))
        ));
    }

    #[test]
    fn test_fetch_or_default_falls_back() {
        let missing = JsonFileMetadata::new("/nonexistent/sr-robot3/metadata.json");
        assert!(matches!(missing.fetch(), Err(MetadataError::Io { .. })));
        assert_eq!(fetch_or_default(&missing), FetchedMetadata::default());

        let fixed = StaticMetadata::new(Metadata {
            zone: 2,
            ..Metadata::default()
        })
        .with_usb_path("/media/usb");
        let fetched = fetch_or_default(&fixed);
        assert_eq!(fetched.metadata.zone, 2);
        assert_eq!(fetched.usb_path, Some(PathBuf::from("/media/usb")));
    }
}
