//! # SR Backend Layer
//!
//! 板卡后端抽象层，为每种板卡提供统一的后端接口。
//!
//! 板卡层（`sr-boards`）只通过这里定义的 trait 访问硬件；
//! 具体实现由 [`Environment`] 在发现阶段注入：
//!
//! - [`console`]: 控制台后端（写操作打印到终端，读操作在终端提示输入）
//! - [`sim`]: 内存模拟后端（测试和 CI 使用，可从外部注入按键、电压等输入）
//!
//! 真实硬件的串口协议不在本 crate 范围内，使用方可以自行实现这些 trait
//! 并注册到 [`Environment`]。

use sr_types::{Colour, GpioPinMode, MotorPower, PinId, PowerOutputPosition, UserLed};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub mod console;
pub mod environment;
mod error;
pub mod sim;

pub use environment::{CameraDiscoverer, Discovered, Discoverer, Environment};
pub use error::{BackendError, DeviceError, DeviceErrorKind};

/// 板卡种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardKind {
    PowerBoard,
    MotorBoard,
    ServoBoard,
    Ruggeduino,
    Camera,
    Kch,
}

impl BoardKind {
    /// 板卡的完整名称（用于日志）
    pub fn name(self) -> &'static str {
        match self {
            Self::PowerBoard => "Student Robotics v4 Power Board",
            Self::MotorBoard => "Student Robotics v4 Motor Board",
            Self::ServoBoard => "Student Robotics v4 Servo Board",
            Self::Ruggeduino => "Ruggeduino",
            Self::Camera => "Camera",
            Self::Kch => "KCH",
        }
    }
}

impl fmt::Display for BoardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 电源板上的状态 LED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerBoardLed {
    Run,
    Error,
}

impl fmt::Display for PowerBoardLed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Run => f.write_str("run"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// 电源板后端
pub trait PowerBoardBackend: Send {
    /// 固件版本（未知时返回 `None`）
    fn firmware_version(&mut self) -> Result<Option<String>, BackendError> {
        Ok(None)
    }
    fn output_enabled(&mut self, output: PowerOutputPosition) -> Result<bool, BackendError>;
    fn set_output_enabled(
        &mut self,
        output: PowerOutputPosition,
        enabled: bool,
    ) -> Result<(), BackendError>;
    /// 输出口电流（A）
    fn output_current(&mut self, output: PowerOutputPosition) -> Result<f32, BackendError>;
    /// 电池电压（V）
    fn battery_voltage(&mut self) -> Result<f32, BackendError>;
    /// 电池电流（A）
    fn battery_current(&mut self) -> Result<f32, BackendError>;
    /// 蜂鸣器发声（非阻塞）
    fn buzz(&mut self, duration: Duration, frequency: u32) -> Result<(), BackendError>;
    /// 启动按钮是否被按下过
    ///
    /// 按键状态是锁存的：读取一次后清除。
    fn start_button_pressed(&mut self) -> Result<bool, BackendError>;
    fn set_led(&mut self, led: PowerBoardLed, on: bool) -> Result<(), BackendError>;
}

/// 电机板后端
pub trait MotorBoardBackend: Send {
    fn firmware_version(&mut self) -> Result<Option<String>, BackendError> {
        Ok(None)
    }
    fn motor_power(&mut self, index: usize) -> Result<MotorPower, BackendError>;
    fn set_motor_power(&mut self, index: usize, power: MotorPower) -> Result<(), BackendError>;
}

/// 舵机板后端
pub trait ServoBoardBackend: Send {
    fn firmware_version(&mut self) -> Result<Option<String>, BackendError> {
        Ok(None)
    }
    /// 舵机位置，`None` 表示未上电
    fn servo_position(&mut self, index: usize) -> Result<Option<f32>, BackendError>;
    fn set_servo_position(
        &mut self,
        index: usize,
        position: Option<f32>,
    ) -> Result<(), BackendError>;
}

/// Ruggeduino 后端
///
/// 模式合法性由板卡层检查，后端只负责执行。
pub trait RuggeduinoBackend: Send {
    fn firmware_version(&mut self) -> Result<Option<String>, BackendError> {
        Ok(None)
    }
    fn set_pin_mode(&mut self, pin: PinId, mode: GpioPinMode) -> Result<(), BackendError>;
    fn digital_read(&mut self, pin: PinId) -> Result<bool, BackendError>;
    fn digital_write(&mut self, pin: PinId, state: bool) -> Result<(), BackendError>;
    /// 模拟输入电压（V）
    fn analogue_read(&mut self, pin: PinId) -> Result<f32, BackendError>;
}

/// 标记相对摄像头的球坐标位置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPosition {
    /// 距离（mm）
    pub distance: f32,
    /// 水平角（rad，向右为正）
    pub horizontal_angle: f32,
    /// 垂直角（rad，向上为正）
    pub vertical_angle: f32,
}

/// 一次检测得到的原始标记
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// 原始标记 ID（未减去比赛偏移）
    pub raw_id: u32,
    /// 图像中的中心像素坐标
    pub pixel_centre: (f32, f32),
    /// 位姿估计结果；没有标定文件时为 `None`
    pub position: Option<MarkerPosition>,
}

/// 摄像头发现参数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraSettings {
    /// 标定文件路径；`None` 表示禁用位姿估计
    pub calibration_file: Option<PathBuf>,
}

/// 摄像头后端
pub trait CameraBackend: Send {
    fn firmware_version(&mut self) -> Result<Option<String>, BackendError> {
        Ok(None)
    }
    /// 拍摄一帧并返回检测到的标记
    fn detect(&mut self) -> Result<Vec<Detection>, BackendError>;
}

/// KCH 后端
pub trait KchBackend: Send {
    fn set_user_led(&mut self, led: UserLed, colour: Colour) -> Result<(), BackendError>;
    fn set_start_led(&mut self, on: bool) -> Result<(), BackendError>;
}
