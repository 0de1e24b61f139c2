//! Robot：一台机器人的全部板卡
//!
//! 构造时发现所有板卡，之后通过访问器获取。Robot 被 drop 时所有板卡进入安全状态。

use crate::builder::RobotBuilder;
use crate::error::RobotError;
use crate::lock::RobotLock;
use crate::metadata::{self, Metadata, MetadataSource};
use crate::start::StartListener;
use crate::timer::GameTimer;
use arc_swap::{ArcSwap, ArcSwapOption};
use parking_lot::Mutex;
use sr_boards::{
    Board, BoardError, BoardGroup, CameraBoard, Kch, MotorBoard, PowerBoard, Ruggeduino,
    ServoBoard,
};
use sr_types::{Note, RobotMode};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, error, info, warn};

/// 启动按钮轮询间隔
pub const START_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 每隔多少次轮询切换一次 LED
const LED_TOGGLE_POLLS: u32 = 6;

/// 比赛时间到时执行的动作
pub type TimeoutAction = Arc<dyn Fn() + Send + Sync>;

/// 需要进入安全状态的板卡组
#[derive(Debug, Clone)]
pub(crate) struct Boards {
    pub(crate) power_boards: BoardGroup<PowerBoard>,
    pub(crate) motor_boards: BoardGroup<MotorBoard>,
    pub(crate) servo_boards: BoardGroup<ServoBoard>,
    pub(crate) ruggeduinos: BoardGroup<Ruggeduino>,
    pub(crate) cameras: BoardGroup<CameraBoard>,
}

impl Boards {
    /// 所有板卡进入安全状态，返回第一个错误
    pub(crate) fn make_safe(&self) -> Result<(), BoardError> {
        let results = [
            self.power_boards.make_safe(),
            self.motor_boards.make_safe(),
            self.servo_boards.make_safe(),
            self.ruggeduinos.make_safe(),
            self.cameras.make_safe(),
        ];
        results.into_iter().collect()
    }

    pub(crate) fn log_discovered(&self) {
        log_group(&self.power_boards);
        log_group(&self.motor_boards);
        log_group(&self.servo_boards);
        log_group(&self.ruggeduinos);
        log_group(&self.cameras);
    }
}

fn log_group<B: Board>(group: &BoardGroup<B>) {
    for board in group {
        info!("Found {} - {}", board.name(), board.serial_number());
        match board.firmware_version() {
            Ok(Some(version)) => {
                debug!("Firmware Version of {}: {}", board.serial_number(), version)
            },
            Ok(None) => debug!("Firmware Version of {}: unknown", board.serial_number()),
            Err(e) => debug!("Firmware Version of {}: {}", board.serial_number(), e),
        }
    }
}

/// Student Robotics 机器人
///
/// 同一台机器上只能存在一个 `Robot`（单实例文件锁）。
pub struct Robot {
    pub(crate) environment_name: String,
    pub(crate) power_board: PowerBoard,
    pub(crate) boards: Boards,
    pub(crate) kch: Kch,
    pub(crate) ignored_ruggeduinos: BTreeMap<String, Option<String>>,
    pub(crate) metadata_source: Arc<dyn MetadataSource>,
    pub(crate) metadata: ArcSwap<Metadata>,
    pub(crate) usbkey: ArcSwapOption<PathBuf>,
    pub(crate) start_listener: Option<StartListener>,
    pub(crate) game_timer: Mutex<Option<GameTimer>>,
    pub(crate) timeout_action: TimeoutAction,
    pub(crate) _lock: Option<RobotLock>,
}

impl Robot {
    pub fn builder() -> RobotBuilder {
        RobotBuilder::new()
    }

    /// 使用默认设置构造（控制台环境，等待启动按钮）
    pub fn new() -> Result<Self, RobotError> {
        RobotBuilder::new().build()
    }

    pub fn environment_name(&self) -> &str {
        &self.environment_name
    }

    /// 电源板（必须恰好一块）
    pub fn power_board(&self) -> &PowerBoard {
        &self.power_board
    }

    pub fn power_boards(&self) -> &BoardGroup<PowerBoard> {
        &self.boards.power_boards
    }

    pub fn motor_boards(&self) -> &BoardGroup<MotorBoard> {
        &self.boards.motor_boards
    }

    /// 唯一的电机板
    ///
    /// # 错误
    /// - `RobotError::Board(NotSingular)`: 没有或有多块电机板
    pub fn motor_board(&self) -> Result<&MotorBoard, RobotError> {
        Ok(self.boards.motor_boards.singular()?)
    }

    pub fn servo_boards(&self) -> &BoardGroup<ServoBoard> {
        &self.boards.servo_boards
    }

    pub fn servo_board(&self) -> Result<&ServoBoard, RobotError> {
        Ok(self.boards.servo_boards.singular()?)
    }

    pub fn ruggeduinos(&self) -> &BoardGroup<Ruggeduino> {
        &self.boards.ruggeduinos
    }

    pub fn ruggeduino(&self) -> Result<&Ruggeduino, RobotError> {
        Ok(self.boards.ruggeduinos.singular()?)
    }

    pub fn cameras(&self) -> &BoardGroup<CameraBoard> {
        &self.boards.cameras
    }

    pub fn camera(&self) -> Result<&CameraBoard, RobotError> {
        Ok(self.boards.cameras.singular()?)
    }

    pub fn kch(&self) -> &Kch {
        &self.kch
    }

    /// 被忽略的 Ruggeduino：序列号 → 设备路径
    pub fn ignored_ruggeduinos(&self) -> &BTreeMap<String, Option<String>> {
        &self.ignored_ruggeduinos
    }

    /// 当前元数据快照
    pub fn metadata(&self) -> Arc<Metadata> {
        self.metadata.load_full()
    }

    /// 场地名称，不在比赛中时为 `"A"`
    pub fn arena(&self) -> String {
        self.metadata.load().arena.clone()
    }

    pub fn mode(&self) -> RobotMode {
        self.metadata.load().mode
    }

    /// 起始区域
    pub fn zone(&self) -> u32 {
        self.metadata.load().zone
    }

    /// 代码 U 盘挂载路径
    pub fn usbkey(&self) -> Option<PathBuf> {
        self.usbkey.load_full().map(|path| path.as_ref().clone())
    }

    /// 当前时间（Unix 时间戳，秒）
    pub fn time(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }

    pub fn sleep(&self, duration: Duration) {
        spin_sleep::sleep(duration);
    }

    /// 打印 WiFi 热点信息
    pub fn print_wifi_details(&self) {
        let metadata = self.metadata.load();
        if !metadata.wifi_enabled {
            warn!("Could not print WiFi details - WiFi is not enabled");
            return;
        }
        info!("WiFi credentials:");
        info!("SSID: {}", metadata.wifi_ssid.as_deref().unwrap_or(""));
        info!("Password: {}", metadata.wifi_psk.as_deref().unwrap_or(""));
    }

    /// 重新读取元数据并更新摄像头的标记偏移
    pub fn reload_metadata(&self) {
        let fetched = metadata::fetch_or_default(self.metadata_source.as_ref());
        for camera in &self.boards.cameras {
            camera.set_marker_offset(fetched.metadata.marker_offset);
        }
        self.metadata.store(Arc::new(fetched.metadata));
        self.usbkey.store(fetched.usb_path.map(Arc::new));
    }

    /// 等待启动信号
    ///
    /// 蜂鸣一次，然后每 50ms 检查一次启动按钮和外部启动信号，期间闪烁运行 LED 和 KCH 启动 LED。
    /// 启动后重新读取元数据；设置了比赛时长时启动比赛计时器。
    pub fn wait_start(&self) -> Result<(), RobotError> {
        info!("Waiting for start signal");
        let power = &self.power_board;

        power.piezo().buzz(Duration::from_millis(100), Note::A6)?;
        // 清除之前锁存的按键
        power.start_button().is_pressed()?;

        let mut counter: u32 = 0;
        let mut led_state = false;
        while !power.start_button().is_pressed()? && !self.start_requested() {
            if counter % LED_TOGGLE_POLLS == 0 {
                led_state = !led_state;
                power.run_led().set(led_state)?;
                self.kch.set_start_led(led_state)?;
            }
            spin_sleep::sleep(START_POLL_INTERVAL);
            counter = counter.wrapping_add(1);
        }

        power.run_led().on()?;
        self.kch.set_start_led(false)?;

        // 元数据 U 盘可能在等待期间插入
        self.reload_metadata();
        info!("Start signal received; continuing.");

        if let Some(timeout) = self.metadata.load().game_timeout() {
            info!("Game length set to {}s", timeout.as_secs());
            self.start_game_timer(timeout)?;
        }
        Ok(())
    }

    /// 启动比赛计时器（替换已有的计时器）
    pub fn start_game_timer(&self, timeout: Duration) -> Result<(), RobotError> {
        let action = self.timeout_action.clone();
        let timer = GameTimer::start(timeout, move || action()).map_err(RobotError::Timer)?;
        *self.game_timer.lock() = Some(timer);
        Ok(())
    }

    /// 比赛计时器是否在运行
    pub fn game_timer_running(&self) -> bool {
        self.game_timer
            .lock()
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    /// 所有板卡进入安全状态
    pub fn make_safe(&self) -> Result<(), RobotError> {
        Ok(self.boards.make_safe()?)
    }

    fn start_requested(&self) -> bool {
        self.start_listener
            .as_ref()
            .is_some_and(StartListener::try_receive)
    }
}

impl Drop for Robot {
    fn drop(&mut self) {
        if let Some(timer) = self.game_timer.get_mut().take() {
            timer.cancel();
        }
        if let Err(e) = self.boards.make_safe() {
            error!("Failed to make boards safe: {}", e);
        }
    }
}

impl fmt::Debug for Robot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Robot")
            .field("environment", &self.environment_name)
            .field("power_board", &self.power_board)
            .field("motor_boards", &self.boards.motor_boards.len())
            .field("servo_boards", &self.boards.servo_boards.len())
            .field("ruggeduinos", &self.boards.ruggeduinos.len())
            .field("cameras", &self.boards.cameras.len())
            .field("kch", &self.kch.is_present())
            .finish_non_exhaustive()
    }
}
