//! 启动命令
//!
//! 按配置构造 `Robot`（获取单实例锁、打开电源输出、等待启动信号），
//! 然后输出机器人状态。命令结束时 `Robot` 被 drop，所有板卡进入安全状态。

use anyhow::Result;
use clap::Args;
use sr_boards::Board;
use sr_robot3::{Robot, RobotBuilder, RobotConfig};
use std::fmt::Write as _;

/// 启动命令参数
#[derive(Args, Debug)]
pub struct StartCommand {
    /// 不等待启动按钮
    #[arg(short, long)]
    pub auto_start: bool,
}

impl StartCommand {
    pub fn execute(&self, config: &RobotConfig) -> Result<()> {
        let mut builder = RobotBuilder::from_config(config).init_logging(false);
        if self.auto_start {
            builder = builder.auto_start(true);
        }
        let robot = builder.build()?;

        print!("{}", summary(&robot)?);
        robot.print_wifi_details();
        Ok(())
    }
}

pub fn summary(robot: &Robot) -> Result<String> {
    let mut out = String::new();
    let power = robot.power_board();
    let battery = power.battery_sensor();

    writeln!(out, "Environment: {}", robot.environment_name())?;
    writeln!(out, "Power board: {}", power.serial_number())?;
    writeln!(out, "Arena: {}", robot.arena())?;
    writeln!(out, "Zone: {}", robot.zone())?;
    writeln!(out, "Mode: {}", robot.mode())?;
    if let Some(usbkey) = robot.usbkey() {
        writeln!(out, "USB key: {}", usbkey.display())?;
    }
    writeln!(
        out,
        "Battery: {:.2}V {:.2}A",
        battery.voltage()?,
        battery.current()?
    )?;
    writeln!(
        out,
        "Boards: {} motor, {} servo, {} ruggeduino, {} camera",
        robot.motor_boards().len(),
        robot.servo_boards().len(),
        robot.ruggeduinos().len(),
        robot.cameras().len()
    )?;
    Ok(out)
}
