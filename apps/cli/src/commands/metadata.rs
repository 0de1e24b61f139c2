//! 元数据命令
//!
//! 读取元数据 JSON 状态文件并以 JSON 输出；读取失败时与 `Robot` 一样回退到默认值。

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use sr_robot3::metadata::fetch_or_default;
use sr_robot3::{FetchedMetadata, JsonFileMetadata, Metadata, RobotConfig, StaticMetadata};
use std::path::{Path, PathBuf};

/// 元数据命令参数
#[derive(Args, Debug)]
pub struct MetadataCommand {
    /// 元数据 JSON 文件（覆盖配置中的 metadata_path）
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

impl MetadataCommand {
    pub fn execute(&self, config: &RobotConfig) -> Result<()> {
        let fetched = match self.path.as_ref().or(config.metadata_path.as_ref()) {
            Some(path) => fetch_or_default(&JsonFileMetadata::new(path)),
            None => {
                tracing::info!("No metadata file configured, showing defaults");
                fetch_or_default(&StaticMetadata::default())
            },
        };
        println!("{}", render(&fetched)?);
        Ok(())
    }
}

#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    metadata: &'a Metadata,
    usbkey: Option<&'a Path>,
}

pub fn render(fetched: &FetchedMetadata) -> Result<String> {
    let report = Report {
        metadata: &fetched.metadata,
        usbkey: fetched.usb_path.as_deref(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
