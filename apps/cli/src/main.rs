//! # SR CLI
//!
//! Student Robotics 机器人命令行工具。
//!
//! ```bash
//! # 生成配置文件
//! sr-cli config init --environment console
//!
//! # 列出当前环境中的板卡（不打开电源输出）
//! sr-cli boards
//!
//! # 查看比赛元数据
//! sr-cli metadata --path /var/run/sr/metadata.json
//!
//! # 查询标记尺寸
//! sr-cli marker 5
//!
//! # 构造机器人并等待启动按钮
//! sr-cli start
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{BoardsCommand, ConfigCommand, MarkerCommand, MetadataCommand, StartCommand};

/// SR CLI - 机器人板卡、元数据和配置工具
#[derive(Parser, Debug)]
#[command(name = "sr-cli")]
#[command(about = "Command-line tool for Student Robotics robots", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件（默认为 SR_ROBOT_CONFIG 或 <配置目录>/sr-robot3/config.toml）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 列出发现的板卡
    Boards {
        #[command(flatten)]
        args: BoardsCommand,
    },

    /// 显示比赛元数据
    Metadata {
        #[command(flatten)]
        args: MetadataCommand,
    },

    /// 查询标记是否用于比赛及其尺寸
    Marker {
        #[command(flatten)]
        args: MarkerCommand,
    },

    /// 构造机器人，等待启动信号后输出状态
    Start {
        #[command(flatten)]
        args: StartCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    sr_robot3::logging::init(cli.verbose);

    let location = commands::config::ConfigLocation::resolve(cli.config)?;

    match cli.command {
        Commands::Config(cmd) => cmd.execute(&location),

        Commands::Boards { args } => {
            let config = location.load()?;
            args.execute(&config)
        },

        Commands::Metadata { args } => {
            let config = location.load()?;
            args.execute(&config)
        },

        Commands::Marker { args } => args.execute(),

        Commands::Start { args } => {
            let mut config = location.load()?;
            config.verbose |= cli.verbose;
            args.execute(&config)
        },
    }
}
