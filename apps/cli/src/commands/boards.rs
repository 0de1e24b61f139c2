//! 板卡列表命令
//!
//! 只做发现，不构造 `Robot`：不获取单实例锁，也不打开电源板输出。

use anyhow::Result;
use clap::Args;
use sr_backend::{CameraSettings, Environment};
use sr_boards::{
    Board, BoardGroup, CameraBoard, MarkerSizes, MotorBoard, PowerBoard, Ruggeduino, ServoBoard,
};
use sr_robot3::{EnvironmentKind, RobotConfig};
use std::sync::Arc;

/// 板卡列表命令参数
#[derive(Args, Debug)]
pub struct BoardsCommand {
    /// 运行环境（覆盖配置）
    #[arg(short, long)]
    pub environment: Option<EnvironmentKind>,
}

impl BoardsCommand {
    pub fn execute(&self, config: &RobotConfig) -> Result<()> {
        let kind = self.environment.unwrap_or(config.environment);
        let environment = kind.environment();

        println!("{}", environment.name());
        for line in describe(&environment, &config.ignored_ruggeduinos)? {
            println!("  {}", line);
        }
        Ok(())
    }
}

/// 每块板卡一行描述
pub fn describe(environment: &Environment, ignored: &[String]) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    let power_boards = BoardGroup::new(
        environment
            .discover_power_boards()?
            .into_iter()
            .map(PowerBoard::from),
    );
    lines.extend(power_boards.iter().map(describe_board));

    let motor_boards = BoardGroup::new(
        environment
            .discover_motor_boards()?
            .into_iter()
            .map(MotorBoard::from),
    );
    lines.extend(motor_boards.iter().map(describe_board));

    let servo_boards = BoardGroup::new(
        environment
            .discover_servo_boards()?
            .into_iter()
            .map(ServoBoard::from),
    );
    lines.extend(servo_boards.iter().map(describe_board));

    let ruggeduinos = BoardGroup::new(
        environment
            .discover_ruggeduinos()?
            .into_iter()
            .map(Ruggeduino::from),
    );
    for ruggeduino in &ruggeduinos {
        let mut line = describe_board(ruggeduino);
        if let Some(device) = ruggeduino.device() {
            line.push_str(&format!(" on {}", device));
        }
        if ignored.iter().any(|serial| serial == ruggeduino.serial_number()) {
            line.push_str(" [ignored]");
        }
        lines.push(line);
    }

    let no_sizes: MarkerSizes = Arc::new(|_| None);
    let cameras = BoardGroup::new(
        environment
            .discover_cameras(&CameraSettings::default())?
            .into_iter()
            .map(|found| CameraBoard::from_discovered(found, 0, no_sizes.clone())),
    );
    lines.extend(cameras.iter().map(describe_board));

    for kch in environment.discover_kch()? {
        lines.push(format!("KCH - {}", kch.serial_number));
    }

    Ok(lines)
}

fn describe_board<B: Board>(board: &B) -> String {
    let firmware = match board.firmware_version() {
        Ok(Some(version)) => version,
        Ok(None) => "unknown".to_string(),
        Err(e) => {
            tracing::warn!("Failed to read firmware of {}: {}", board.serial_number(), e);
            "unavailable".to_string()
        },
    };
    format!(
        "{} - {} (firmware {})",
        board.name(),
        board.serial_number(),
        firmware
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sr_backend::sim::Simulation;

    #[test]
    fn test_describe_simulated_boards() {
        let sim = Simulation::new()
            .with_power_board("SRPB1")
            .with_motor_board("SRMB2")
            .with_motor_board("SRMB1")
            .with_ruggeduino("RUG1", Some("/dev/ttyACM0"))
            .with_kch();

        let lines = describe(&sim.environment(), &["RUG1".to_string()]).unwrap();
        assert_eq!(
            lines,
            vec![
                "Student Robotics v4 Power Board - SRPB1 (firmware 4.4.1)".to_string(),
                "Student Robotics v4 Motor Board - SRMB1 (firmware 4.4)".to_string(),
                "Student Robotics v4 Motor Board - SRMB2 (firmware 4.4)".to_string(),
                "Ruggeduino - RUG1 (firmware SRcustom:2.1) on /dev/ttyACM0 [ignored]".to_string(),
                "KCH - KCH-SIM".to_string(),
            ]
        );
    }

    #[test]
    fn test_describe_console_environment() {
        let lines = describe(&Environment::console(), &[]).unwrap();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("SRPB-CONSOLE (firmware unknown)"), "{:?}", lines);
        assert!(lines[3].ends_with("on console"), "{:?}", lines);
        assert!(!lines.iter().any(|line| line.starts_with("KCH")), "{:?}", lines);
    }

    #[test]
    fn test_unplugged_board_reports_unavailable_firmware() {
        let sim = Simulation::new().with_power_board("SRPB1");
        let env = sim.environment();
        let boards = env.discover_power_boards().unwrap();
        sim.power_board("SRPB1").unwrap().lock().present = false;

        let board = PowerBoard::from(boards.into_iter().next().unwrap());
        assert!(describe_board(&board).ends_with("(firmware unavailable)"));
    }
}
