//! 内存模拟后端
//!
//! `Simulation` 描述一组虚拟板卡，每块板卡的状态保存在 `Arc<Mutex<..>>` 中，
//! 后端和测试代码共享同一份状态：测试可以注入按键、电压、标记，
//! 也可以检查机器人代码写入的输出。
//!
//! ```rust
//! use sr_backend::sim::Simulation;
//!
//! let sim = Simulation::new().with_power_board("SIMPB");
//! let env = sim.environment();
//! assert_eq!(env.discover_power_boards().unwrap().len(), 1);
//!
//! sim.power_board("SIMPB").unwrap().lock().battery_voltage = 11.5;
//! ```

use crate::{
    BackendError, CameraBackend, CameraSettings, Detection, DeviceError, DeviceErrorKind,
    Discovered, Environment, KchBackend, MotorBoardBackend, PowerBoardBackend, PowerBoardLed,
    RuggeduinoBackend, ServoBoardBackend,
};
use parking_lot::Mutex;
use sr_types::{Colour, GpioPinMode, MotorPower, PinId, PowerOutputPosition, UserLed};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// 共享的板卡状态
pub type Shared<T> = Arc<Mutex<T>>;

fn unplugged(serial: &str) -> BackendError {
    DeviceError::new(DeviceErrorKind::NoDevice, format!("{} is not connected", serial)).into()
}

/// 模拟电源板状态
#[derive(Debug, Clone, PartialEq)]
pub struct SimPowerBoard {
    /// 是否连接（未连接的板卡不会被发现，已发现的后端返回 `NoDevice`）
    pub present: bool,
    pub firmware_version: Option<String>,
    pub outputs: [bool; 7],
    pub output_currents: [f32; 7],
    pub battery_voltage: f32,
    pub battery_current: f32,
    /// 锁存的启动按钮状态
    pub start_button: bool,
    /// 在第 N 次读取按钮时自动按下（从 1 开始计数）
    pub press_start_on_read: Option<u32>,
    /// 按钮被读取的次数
    pub start_button_reads: u32,
    /// 蜂鸣记录（时长，频率）
    pub buzzes: Vec<(Duration, u32)>,
    pub run_led: bool,
    pub error_led: bool,
    /// 运行 LED 被切换的次数
    pub run_led_changes: u32,
}

impl Default for SimPowerBoard {
    fn default() -> Self {
        Self {
            present: true,
            firmware_version: Some("4.4.1".to_string()),
            outputs: [false; 7],
            output_currents: [0.0; 7],
            battery_voltage: 12.0,
            battery_current: 0.0,
            start_button: false,
            press_start_on_read: None,
            start_button_reads: 0,
            buzzes: Vec::new(),
            run_led: false,
            error_led: false,
            run_led_changes: 0,
        }
    }
}

impl SimPowerBoard {
    /// 按下启动按钮（锁存，直到被读取）
    pub fn press_start_button(&mut self) {
        self.start_button = true;
    }

    pub fn output(&self, output: PowerOutputPosition) -> bool {
        self.outputs[output.index()]
    }
}

/// 模拟电机板状态
#[derive(Debug, Clone, PartialEq)]
pub struct SimMotorBoard {
    pub present: bool,
    pub firmware_version: Option<String>,
    pub motors: [MotorPower; 2],
}

impl Default for SimMotorBoard {
    fn default() -> Self {
        Self {
            present: true,
            firmware_version: Some("4.4".to_string()),
            motors: [MotorPower::Coast; 2],
        }
    }
}

/// 模拟舵机板状态
#[derive(Debug, Clone, PartialEq)]
pub struct SimServoBoard {
    pub present: bool,
    pub firmware_version: Option<String>,
    pub servos: [Option<f32>; 12],
}

impl Default for SimServoBoard {
    fn default() -> Self {
        Self {
            present: true,
            firmware_version: Some("4.3".to_string()),
            servos: [None; 12],
        }
    }
}

/// 模拟 Ruggeduino 状态
#[derive(Debug, Clone, PartialEq)]
pub struct SimRuggeduino {
    pub present: bool,
    pub firmware_version: Option<String>,
    /// 设备路径
    pub device: Option<String>,
    /// 后端收到的引脚模式
    pub modes: HashMap<PinId, GpioPinMode>,
    /// 数字电平（输入引脚由测试注入，输出引脚由机器人代码写入）
    pub digital: HashMap<PinId, bool>,
    /// 模拟电压（V）
    pub analogue: HashMap<PinId, f32>,
}

impl Default for SimRuggeduino {
    fn default() -> Self {
        Self {
            present: true,
            firmware_version: Some("SRcustom:2.1".to_string()),
            device: None,
            modes: HashMap::new(),
            digital: HashMap::new(),
            analogue: HashMap::new(),
        }
    }
}

/// 模拟摄像头状态
#[derive(Debug, Clone, PartialEq)]
pub struct SimCamera {
    pub present: bool,
    /// 每次 `detect` 返回的标记
    pub detections: Vec<Detection>,
    /// 最近一次发现时使用的参数
    pub settings: Option<CameraSettings>,
    pub frames: u32,
}

impl Default for SimCamera {
    fn default() -> Self {
        Self {
            present: true,
            detections: Vec::new(),
            settings: None,
            frames: 0,
        }
    }
}

/// 模拟 KCH 状态
#[derive(Debug, Clone, PartialEq)]
pub struct SimKch {
    pub present: bool,
    pub user_leds: [Colour; 3],
    pub start_led: bool,
    pub start_led_changes: u32,
}

impl Default for SimKch {
    fn default() -> Self {
        Self {
            present: true,
            user_leds: [Colour::Off; 3],
            start_led: false,
            start_led_changes: 0,
        }
    }
}

/// 虚拟板卡集合
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    power_boards: Vec<(String, Shared<SimPowerBoard>)>,
    motor_boards: Vec<(String, Shared<SimMotorBoard>)>,
    servo_boards: Vec<(String, Shared<SimServoBoard>)>,
    ruggeduinos: Vec<(String, Shared<SimRuggeduino>)>,
    cameras: Vec<(String, Shared<SimCamera>)>,
    kch: Option<Shared<SimKch>>,
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_power_board(mut self, serial: impl Into<String>) -> Self {
        self.power_boards.push((serial.into(), Shared::default()));
        self
    }

    pub fn with_motor_board(mut self, serial: impl Into<String>) -> Self {
        self.motor_boards.push((serial.into(), Shared::default()));
        self
    }

    pub fn with_servo_board(mut self, serial: impl Into<String>) -> Self {
        self.servo_boards.push((serial.into(), Shared::default()));
        self
    }

    pub fn with_ruggeduino(mut self, serial: impl Into<String>, device: Option<&str>) -> Self {
        let state = SimRuggeduino {
            device: device.map(str::to_string),
            ..SimRuggeduino::default()
        };
        self.ruggeduinos.push((serial.into(), Arc::new(Mutex::new(state))));
        self
    }

    pub fn with_camera(mut self, serial: impl Into<String>) -> Self {
        self.cameras.push((serial.into(), Shared::default()));
        self
    }

    pub fn with_kch(mut self) -> Self {
        self.kch = Some(Shared::default());
        self
    }

    pub fn power_board(&self, serial: &str) -> Option<Shared<SimPowerBoard>> {
        find(&self.power_boards, serial)
    }

    pub fn motor_board(&self, serial: &str) -> Option<Shared<SimMotorBoard>> {
        find(&self.motor_boards, serial)
    }

    pub fn servo_board(&self, serial: &str) -> Option<Shared<SimServoBoard>> {
        find(&self.servo_boards, serial)
    }

    pub fn ruggeduino(&self, serial: &str) -> Option<Shared<SimRuggeduino>> {
        find(&self.ruggeduinos, serial)
    }

    pub fn camera(&self, serial: &str) -> Option<Shared<SimCamera>> {
        find(&self.cameras, serial)
    }

    pub fn kch(&self) -> Option<Shared<SimKch>> {
        self.kch.clone()
    }

    /// 生成运行环境
    ///
    /// 只注册声明过的板卡种类；每次发现都会创建新的后端，共享同一份状态。
    pub fn environment(&self) -> Environment {
        let mut env = Environment::new("Simulated Environment");

        if !self.power_boards.is_empty() {
            let boards = self.power_boards.clone();
            env = env.with_power_boards(move || {
                Ok(present(&boards, |s: &SimPowerBoard| s.present)
                    .map(|(serial, state)| {
                        Discovered::new(
                            serial.clone(),
                            Box::new(SimPowerBoardBackend::new(serial, state)) as Box<dyn PowerBoardBackend>,
                        )
                    })
                    .collect())
            });
        }

        if !self.motor_boards.is_empty() {
            let boards = self.motor_boards.clone();
            env = env.with_motor_boards(move || {
                Ok(present(&boards, |s: &SimMotorBoard| s.present)
                    .map(|(serial, state)| {
                        Discovered::new(
                            serial.clone(),
                            Box::new(SimMotorBoardBackend::new(serial, state)) as Box<dyn MotorBoardBackend>,
                        )
                    })
                    .collect())
            });
        }

        if !self.servo_boards.is_empty() {
            let boards = self.servo_boards.clone();
            env = env.with_servo_boards(move || {
                Ok(present(&boards, |s: &SimServoBoard| s.present)
                    .map(|(serial, state)| {
                        Discovered::new(
                            serial.clone(),
                            Box::new(SimServoBoardBackend::new(serial, state)) as Box<dyn ServoBoardBackend>,
                        )
                    })
                    .collect())
            });
        }

        if !self.ruggeduinos.is_empty() {
            let boards = self.ruggeduinos.clone();
            env = env.with_ruggeduinos(move || {
                Ok(present(&boards, |s: &SimRuggeduino| s.present)
                    .map(|(serial, state)| {
                        let device = state.lock().device.clone();
                        let found = Discovered::new(
                            serial.clone(),
                            Box::new(SimRuggeduinoBackend::new(serial, state)) as Box<dyn RuggeduinoBackend>,
                        );
                        match device {
                            Some(device) => found.with_device(device),
                            None => found,
                        }
                    })
                    .collect())
            });
        }

        if !self.cameras.is_empty() {
            let cameras = self.cameras.clone();
            env = env.with_cameras(move |settings| {
                Ok(present(&cameras, |s: &SimCamera| s.present)
                    .map(|(serial, state)| {
                        state.lock().settings = Some(settings.clone());
                        Discovered::new(
                            serial.clone(),
                            Box::new(SimCameraBackend::new(
                                serial,
                                state,
                                settings.calibration_file.is_some(),
                            )) as Box<dyn CameraBackend>,
                        )
                    })
                    .collect())
            });
        }

        if let Some(kch) = &self.kch {
            let kch = kch.clone();
            env = env.with_kch(move || {
                if !kch.lock().present {
                    return Ok(Vec::new());
                }
                Ok(vec![Discovered::new(
                    "KCH-SIM",
                    Box::new(SimKchBackend { state: kch.clone() }) as Box<dyn KchBackend>,
                )])
            });
        }

        env
    }
}

fn find<T>(boards: &[(String, Shared<T>)], serial: &str) -> Option<Shared<T>> {
    boards
        .iter()
        .find(|(s, _)| s == serial)
        .map(|(_, state)| state.clone())
}

fn present<'a, T: 'a>(
    boards: &'a [(String, Shared<T>)],
    is_present: impl Fn(&T) -> bool + 'a,
) -> impl Iterator<Item = (String, Shared<T>)> + 'a {
    boards
        .iter()
        .filter(move |(_, state)| is_present(&state.lock()))
        .map(|(serial, state)| (serial.clone(), state.clone()))
}

/// 模拟电源板后端
pub struct SimPowerBoardBackend {
    serial: String,
    state: Shared<SimPowerBoard>,
}

impl SimPowerBoardBackend {
    pub fn new(serial: impl Into<String>, state: Shared<SimPowerBoard>) -> Self {
        Self {
            serial: serial.into(),
            state,
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut SimPowerBoard) -> R) -> Result<R, BackendError> {
        let mut state = self.state.lock();
        if !state.present {
            return Err(unplugged(&self.serial));
        }
        Ok(f(&mut state))
    }
}

impl PowerBoardBackend for SimPowerBoardBackend {
    fn firmware_version(&mut self) -> Result<Option<String>, BackendError> {
        self.with(|s| s.firmware_version.clone())
    }

    fn output_enabled(&mut self, output: PowerOutputPosition) -> Result<bool, BackendError> {
        self.with(|s| s.outputs[output.index()])
    }

    fn set_output_enabled(
        &mut self,
        output: PowerOutputPosition,
        enabled: bool,
    ) -> Result<(), BackendError> {
        self.with(|s| s.outputs[output.index()] = enabled)
    }

    fn output_current(&mut self, output: PowerOutputPosition) -> Result<f32, BackendError> {
        self.with(|s| s.output_currents[output.index()])
    }

    fn battery_voltage(&mut self) -> Result<f32, BackendError> {
        self.with(|s| s.battery_voltage)
    }

    fn battery_current(&mut self) -> Result<f32, BackendError> {
        self.with(|s| s.battery_current)
    }

    fn buzz(&mut self, duration: Duration, frequency: u32) -> Result<(), BackendError> {
        self.with(|s| s.buzzes.push((duration, frequency)))
    }

    fn start_button_pressed(&mut self) -> Result<bool, BackendError> {
        self.with(|s| {
            s.start_button_reads += 1;
            if s.press_start_on_read == Some(s.start_button_reads) {
                s.start_button = true;
            }
            std::mem::take(&mut s.start_button)
        })
    }

    fn set_led(&mut self, led: PowerBoardLed, on: bool) -> Result<(), BackendError> {
        self.with(|s| match led {
            PowerBoardLed::Run => {
                if s.run_led != on {
                    s.run_led_changes += 1;
                }
                s.run_led = on;
            },
            PowerBoardLed::Error => s.error_led = on,
        })
    }
}

/// 模拟电机板后端
pub struct SimMotorBoardBackend {
    serial: String,
    state: Shared<SimMotorBoard>,
}

impl SimMotorBoardBackend {
    pub fn new(serial: impl Into<String>, state: Shared<SimMotorBoard>) -> Self {
        Self {
            serial: serial.into(),
            state,
        }
    }
}

impl MotorBoardBackend for SimMotorBoardBackend {
    fn firmware_version(&mut self) -> Result<Option<String>, BackendError> {
        let state = self.state.lock();
        if !state.present {
            return Err(unplugged(&self.serial));
        }
        Ok(state.firmware_version.clone())
    }

    fn motor_power(&mut self, index: usize) -> Result<MotorPower, BackendError> {
        let state = self.state.lock();
        if !state.present {
            return Err(unplugged(&self.serial));
        }
        state
            .motors
            .get(index)
            .copied()
            .ok_or(BackendError::NotSupported("motor index"))
    }

    fn set_motor_power(&mut self, index: usize, power: MotorPower) -> Result<(), BackendError> {
        let mut state = self.state.lock();
        if !state.present {
            return Err(unplugged(&self.serial));
        }
        let slot = state
            .motors
            .get_mut(index)
            .ok_or(BackendError::NotSupported("motor index"))?;
        *slot = power;
        Ok(())
    }
}

/// 模拟舵机板后端
pub struct SimServoBoardBackend {
    serial: String,
    state: Shared<SimServoBoard>,
}

impl SimServoBoardBackend {
    pub fn new(serial: impl Into<String>, state: Shared<SimServoBoard>) -> Self {
        Self {
            serial: serial.into(),
            state,
        }
    }
}

impl ServoBoardBackend for SimServoBoardBackend {
    fn firmware_version(&mut self) -> Result<Option<String>, BackendError> {
        let state = self.state.lock();
        if !state.present {
            return Err(unplugged(&self.serial));
        }
        Ok(state.firmware_version.clone())
    }

    fn servo_position(&mut self, index: usize) -> Result<Option<f32>, BackendError> {
        let state = self.state.lock();
        if !state.present {
            return Err(unplugged(&self.serial));
        }
        state
            .servos
            .get(index)
            .copied()
            .ok_or(BackendError::NotSupported("servo index"))
    }

    fn set_servo_position(
        &mut self,
        index: usize,
        position: Option<f32>,
    ) -> Result<(), BackendError> {
        let mut state = self.state.lock();
        if !state.present {
            return Err(unplugged(&self.serial));
        }
        let slot = state
            .servos
            .get_mut(index)
            .ok_or(BackendError::NotSupported("servo index"))?;
        *slot = position;
        Ok(())
    }
}

/// 模拟 Ruggeduino 后端
pub struct SimRuggeduinoBackend {
    serial: String,
    state: Shared<SimRuggeduino>,
}

impl SimRuggeduinoBackend {
    pub fn new(serial: impl Into<String>, state: Shared<SimRuggeduino>) -> Self {
        Self {
            serial: serial.into(),
            state,
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut SimRuggeduino) -> R) -> Result<R, BackendError> {
        let mut state = self.state.lock();
        if !state.present {
            return Err(unplugged(&self.serial));
        }
        Ok(f(&mut state))
    }
}

impl RuggeduinoBackend for SimRuggeduinoBackend {
    fn firmware_version(&mut self) -> Result<Option<String>, BackendError> {
        self.with(|s| s.firmware_version.clone())
    }

    fn set_pin_mode(&mut self, pin: PinId, mode: GpioPinMode) -> Result<(), BackendError> {
        self.with(|s| {
            s.modes.insert(pin, mode);
        })
    }

    fn digital_read(&mut self, pin: PinId) -> Result<bool, BackendError> {
        self.with(|s| {
            let pullup = s.modes.get(&pin) == Some(&GpioPinMode::DigitalInputPullup);
            s.digital.get(&pin).copied().unwrap_or(pullup)
        })
    }

    fn digital_write(&mut self, pin: PinId, state: bool) -> Result<(), BackendError> {
        self.with(|s| {
            s.digital.insert(pin, state);
        })
    }

    fn analogue_read(&mut self, pin: PinId) -> Result<f32, BackendError> {
        self.with(|s| s.analogue.get(&pin).copied().unwrap_or(0.0))
    }
}

/// 模拟摄像头后端
///
/// 没有标定文件时不做位姿估计，返回的标记 `position` 为 `None`。
pub struct SimCameraBackend {
    serial: String,
    state: Shared<SimCamera>,
    calibrated: bool,
}

impl SimCameraBackend {
    pub fn new(serial: impl Into<String>, state: Shared<SimCamera>, calibrated: bool) -> Self {
        Self {
            serial: serial.into(),
            state,
            calibrated,
        }
    }
}

impl CameraBackend for SimCameraBackend {
    fn detect(&mut self) -> Result<Vec<Detection>, BackendError> {
        let mut state = self.state.lock();
        if !state.present {
            return Err(unplugged(&self.serial));
        }
        state.frames += 1;
        let calibrated = self.calibrated;
        Ok(state
            .detections
            .iter()
            .map(|d| Detection {
                position: if calibrated { d.position } else { None },
                ..*d
            })
            .collect())
    }
}

/// 模拟 KCH 后端
pub struct SimKchBackend {
    state: Shared<SimKch>,
}

impl KchBackend for SimKchBackend {
    fn set_user_led(&mut self, led: UserLed, colour: Colour) -> Result<(), BackendError> {
        self.state.lock().user_leds[led.index()] = colour;
        Ok(())
    }

    fn set_start_led(&mut self, on: bool) -> Result<(), BackendError> {
        let mut state = self.state.lock();
        if state.start_led != on {
            state.start_led_changes += 1;
        }
        state.start_led = on;
        Ok(())
    }
}
