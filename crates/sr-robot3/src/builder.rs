//! Builder 模式实现
//!
//! 提供链式构造 [`Robot`] 的方式。

use crate::calibration::{self, CalibrationStrategy};
use crate::config::RobotConfig;
use crate::error::RobotError;
use crate::game;
use crate::lock::{self, RobotLock};
use crate::logging;
use crate::metadata::{self, JsonFileMetadata, MetadataSource, StaticMetadata};
use crate::robot::{Boards, Robot, TimeoutAction};
use crate::start::StartListener;
use crate::VERSION;
use sr_backend::{BoardKind, CameraSettings, Environment};
use sr_boards::{
    Board, BoardGroup, CameraBoard, Kch, MarkerSizes, MotorBoard, PowerBoard, Ruggeduino,
    ServoBoard,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 默认的标定文件目录
pub const DEFAULT_CALIBRATION_DIR: &str = "calibrations";

/// Robot Builder（链式构造）
///
/// # Example
///
/// ```rust
/// use sr_backend::sim::Simulation;
/// use sr_boards::Board;
/// use sr_robot3::Robot;
///
/// let sim = Simulation::new().with_power_board("SRPB1").with_motor_board("SRMB1");
/// let robot = Robot::builder()
///     .environment(sim.environment())
///     .auto_start(true)
///     .skip_lock(true)
///     .init_logging(false)
///     .build()
///     .unwrap();
///
/// assert_eq!(robot.power_board().serial_number(), "SRPB1");
/// ```
pub struct RobotBuilder {
    auto_start: bool,
    verbose: bool,
    init_logging: bool,
    environment: Option<Environment>,
    ignored_ruggeduinos: Vec<String>,
    metadata_source: Arc<dyn MetadataSource>,
    start_listener: Option<StartListener>,
    lock_path: Option<PathBuf>,
    skip_lock: bool,
    calibration_dir: Option<PathBuf>,
    calibration_file: Option<Option<PathBuf>>,
    calibration_strategies: Option<Vec<Box<dyn CalibrationStrategy>>>,
    timeout_action: Option<TimeoutAction>,
}

impl Default for RobotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RobotBuilder {
    pub fn new() -> Self {
        Self {
            auto_start: false,
            verbose: false,
            init_logging: true,
            environment: None,
            ignored_ruggeduinos: Vec::new(),
            metadata_source: Arc::new(StaticMetadata::default()),
            start_listener: None,
            lock_path: None,
            skip_lock: false,
            calibration_dir: None,
            calibration_file: None,
            calibration_strategies: None,
            timeout_action: None,
        }
    }

    /// 从配置文件创建
    pub fn from_config(config: &RobotConfig) -> Self {
        let mut builder = Self::new()
            .environment(config.environment.environment())
            .auto_start(config.auto_start)
            .verbose(config.verbose)
            .ignored_ruggeduinos(config.ignored_ruggeduinos.iter().cloned());
        if let Some(path) = &config.metadata_path {
            builder = builder.metadata_source(JsonFileMetadata::new(path));
        }
        if let Some(path) = &config.lock_path {
            builder = builder.lock_path(path);
        }
        if let Some(dir) = &config.calibration_dir {
            builder = builder.calibration_dir(dir);
        }
        builder
    }

    /// 跳过等待启动按钮（默认 `false`）
    pub fn auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    /// 输出调试日志（默认 `false`）
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// 构造时是否初始化日志（默认 `true`）
    pub fn init_logging(mut self, init: bool) -> Self {
        self.init_logging = init;
        self
    }

    /// 运行环境（默认控制台环境）
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// 忽略指定序列号的 Ruggeduino
    pub fn ignored_ruggeduinos<I, S>(mut self, serials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_ruggeduinos
            .extend(serials.into_iter().map(Into::into));
        self
    }

    pub fn metadata_source(mut self, source: impl MetadataSource + 'static) -> Self {
        self.metadata_source = Arc::new(source);
        self
    }

    /// 外部启动信号
    pub fn start_listener(mut self, listener: StartListener) -> Self {
        self.start_listener = Some(listener);
        self
    }

    /// 单实例锁文件路径（默认 `<临时目录>/sr-robot3.lock`）
    pub fn lock_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.lock_path = Some(path.into());
        self
    }

    /// 不获取单实例锁
    pub fn skip_lock(mut self, skip: bool) -> Self {
        self.skip_lock = skip;
        self
    }

    /// 摄像头标定文件目录
    pub fn calibration_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.calibration_dir = Some(dir.into());
        self
    }

    /// 直接指定标定文件（`None` 禁用位姿估计），跳过自动选择
    pub fn calibration_file(mut self, file: Option<PathBuf>) -> Self {
        self.calibration_file = Some(file);
        self
    }

    /// 替换标定选择策略
    pub fn calibration_strategies(mut self, strategies: Vec<Box<dyn CalibrationStrategy>>) -> Self {
        self.calibration_strategies = Some(strategies);
        self
    }

    /// 比赛时间到时执行的动作（默认：让所有板卡进入安全状态并退出进程）
    pub fn on_game_timeout<F>(mut self, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.timeout_action = Some(Arc::new(action));
        self
    }

    /// 构造 Robot
    ///
    /// 依次：初始化日志、获取单实例锁、读取元数据、发现摄像头、电源板（并打开所有输出）、
    /// 电机板、舵机板、KCH、Ruggeduino，最后（`auto_start` 为 `false` 时）等待启动信号。
    ///
    /// # 错误
    /// - `RobotError::AlreadyRunning`: 已有实例在运行
    /// - `RobotError::Board(NotSingular)`: 电源板数量不是一
    /// - `RobotError::Backend`: 发现板卡失败
    pub fn build(self) -> Result<Robot, RobotError> {
        if self.init_logging {
            logging::init(self.verbose);
        }
        let environment = self.environment.unwrap_or_else(Environment::console);

        debug!("Verbose mode enabled.");
        debug!("sr-robot3 version {}", VERSION);
        debug!("Environment: {}", environment.name());

        let lock = if self.skip_lock {
            None
        } else {
            let path = self.lock_path.unwrap_or_else(lock::default_lock_path);
            Some(acquire_lock(path)?)
        };

        let fetched = metadata::fetch_or_default(self.metadata_source.as_ref());

        let calibration_file = match self.calibration_file {
            Some(file) => file,
            None if environment.supports(BoardKind::Camera) => {
                let dir = self
                    .calibration_dir
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CALIBRATION_DIR));
                let strategies = self
                    .calibration_strategies
                    .unwrap_or_else(calibration::default_strategies);
                calibration::find_calibration_with(&dir, &strategies)
            },
            None => None,
        };
        let sizes: MarkerSizes = Arc::new(|id| game::marker_size(id).ok());
        let cameras = BoardGroup::new(
            environment
                .discover_cameras(&CameraSettings { calibration_file })?
                .into_iter()
                .map(|found| {
                    CameraBoard::from_discovered(found, fetched.metadata.marker_offset, sizes.clone())
                }),
        );

        let power_boards = BoardGroup::new(
            environment
                .discover_power_boards()?
                .into_iter()
                .map(PowerBoard::from),
        );
        let power_board = power_boards.singular()?.clone();
        // 打开所有输出，其他板卡才能被发现
        let peripherals = power_board
            .outputs()
            .power_on()
            .map_err(RobotError::from)
            .and_then(|()| discover_peripherals(&environment, &self.ignored_ruggeduinos))
            .inspect_err(|e| {
                error!("Board discovery failed: {}", e);
                if let Err(e) = power_boards.make_safe() {
                    error!("Failed to make power board safe: {}", e);
                }
            })?;
        let Peripherals {
            motor_boards,
            servo_boards,
            kch,
            ruggeduinos,
            ignored,
        } = peripherals;

        let boards = Boards {
            power_boards,
            motor_boards,
            servo_boards,
            ruggeduinos,
            cameras,
        };
        boards.log_discovered();
        if kch.is_present() {
            info!("Found KCH");
        }

        let timeout_action = self
            .timeout_action
            .unwrap_or_else(|| default_timeout_action(boards.clone()));

        let robot = Robot {
            environment_name: environment.name().to_string(),
            power_board,
            boards,
            kch,
            ignored_ruggeduinos: ignored,
            metadata_source: self.metadata_source,
            metadata: arc_swap::ArcSwap::from_pointee(fetched.metadata),
            usbkey: arc_swap::ArcSwapOption::new(fetched.usb_path.map(Arc::new)),
            start_listener: self.start_listener,
            game_timer: parking_lot::Mutex::new(None),
            timeout_action,
            _lock: lock,
        };

        if self.auto_start {
            debug!("Auto start is enabled.");
        } else {
            debug!("Auto start is disabled.");
            robot.wait_start()?;
        }

        Ok(robot)
    }
}

/// 电源板上电之后才能发现的板卡
struct Peripherals {
    motor_boards: BoardGroup<MotorBoard>,
    servo_boards: BoardGroup<ServoBoard>,
    kch: Kch,
    ruggeduinos: BoardGroup<Ruggeduino>,
    ignored: BTreeMap<String, Option<String>>,
}

fn discover_peripherals(
    environment: &Environment,
    ignored_serials: &[String],
) -> Result<Peripherals, RobotError> {
    let motor_boards = BoardGroup::new(
        environment
            .discover_motor_boards()?
            .into_iter()
            .map(MotorBoard::from),
    );
    let servo_boards = BoardGroup::new(
        environment
            .discover_servo_boards()?
            .into_iter()
            .map(ServoBoard::from),
    );
    let kch = Kch::from(environment.discover_kch()?.into_iter().next());

    let mut ignored = BTreeMap::new();
    let mut ruggeduinos = Vec::new();
    for found in environment.discover_ruggeduinos()? {
        if ignored_serials.contains(&found.serial_number) {
            debug!("Ignoring Ruggeduino {}", found.serial_number);
            ignored.insert(found.serial_number, found.device);
        } else {
            ruggeduinos.push(Ruggeduino::from(found));
        }
    }
    for serial in ignored_serials {
        if !ignored.contains_key(serial) {
            warn!("Ignored Ruggeduino {} was not found", serial);
        }
    }

    Ok(Peripherals {
        motor_boards,
        servo_boards,
        kch,
        ruggeduinos: BoardGroup::new(ruggeduinos),
        ignored,
    })
}

fn acquire_lock(path: PathBuf) -> Result<RobotLock, RobotError> {
    RobotLock::try_lock(&path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::AlreadyExists {
            let pid = lock::holder_pid(&path);
            RobotError::AlreadyRunning {
                path: path.clone(),
                pid,
            }
        } else {
            RobotError::Lock {
                path: path.clone(),
                source,
            }
        }
    })
}

fn default_timeout_action(boards: Boards) -> TimeoutAction {
    Arc::new(move || {
        error!("Timeout expired: Game Over!");
        if let Err(e) = boards.make_safe() {
            error!("Failed to make boards safe: {}", e);
        }
        std::process::exit(1);
    })
}
