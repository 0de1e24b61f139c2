//! 运行环境（后端注册表）
//!
//! `Environment` 为每种板卡记录一个发现函数。`Robot` 在构造时依次调用这些函数，
//! 得到当前可用的板卡。某种板卡未注册时视为“一个都没有”。

use crate::{
    BackendError, BoardKind, CameraBackend, CameraSettings, KchBackend, MotorBoardBackend,
    PowerBoardBackend, RuggeduinoBackend, ServoBoardBackend,
};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 发现阶段找到的一块板卡
pub struct Discovered<B: ?Sized> {
    /// 板卡序列号
    pub serial_number: String,
    /// 设备路径（如 `/dev/ttyACM0`），没有时为 `None`
    pub device: Option<String>,
    /// 板卡后端
    pub backend: Box<B>,
}

impl<B: ?Sized> Discovered<B> {
    pub fn new(serial_number: impl Into<String>, backend: Box<B>) -> Self {
        Self {
            serial_number: serial_number.into(),
            device: None,
            backend,
        }
    }

    /// 附加设备路径
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }
}

impl<B: ?Sized> fmt::Debug for Discovered<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Discovered")
            .field("serial_number", &self.serial_number)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

/// 板卡发现函数
pub type Discoverer<B> =
    Arc<dyn Fn() -> Result<Vec<Discovered<B>>, BackendError> + Send + Sync>;

/// 摄像头发现函数（需要标定参数）
pub type CameraDiscoverer = Arc<
    dyn Fn(&CameraSettings) -> Result<Vec<Discovered<dyn CameraBackend>>, BackendError>
        + Send
        + Sync,
>;

/// 运行环境
///
/// # Example
///
/// ```rust
/// use sr_backend::Environment;
///
/// let env = Environment::console();
/// assert_eq!(env.name(), "Console Environment");
/// ```
#[derive(Clone)]
pub struct Environment {
    pub(crate) name: String,
    power_boards: Option<Discoverer<dyn PowerBoardBackend>>,
    motor_boards: Option<Discoverer<dyn MotorBoardBackend>>,
    servo_boards: Option<Discoverer<dyn ServoBoardBackend>>,
    ruggeduinos: Option<Discoverer<dyn RuggeduinoBackend>>,
    cameras: Option<CameraDiscoverer>,
    kch: Option<Discoverer<dyn KchBackend>>,
}

impl Environment {
    /// 创建空环境（未注册任何后端）
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            power_boards: None,
            motor_boards: None,
            servo_boards: None,
            ruggeduinos: None,
            cameras: None,
            kch: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_power_boards<F>(mut self, discover: F) -> Self
    where
        F: Fn() -> Result<Vec<Discovered<dyn PowerBoardBackend>>, BackendError>
            + Send
            + Sync
            + 'static,
    {
        self.power_boards = Some(Arc::new(discover));
        self
    }

    pub fn with_motor_boards<F>(mut self, discover: F) -> Self
    where
        F: Fn() -> Result<Vec<Discovered<dyn MotorBoardBackend>>, BackendError>
            + Send
            + Sync
            + 'static,
    {
        self.motor_boards = Some(Arc::new(discover));
        self
    }

    pub fn with_servo_boards<F>(mut self, discover: F) -> Self
    where
        F: Fn() -> Result<Vec<Discovered<dyn ServoBoardBackend>>, BackendError>
            + Send
            + Sync
            + 'static,
    {
        self.servo_boards = Some(Arc::new(discover));
        self
    }

    pub fn with_ruggeduinos<F>(mut self, discover: F) -> Self
    where
        F: Fn() -> Result<Vec<Discovered<dyn RuggeduinoBackend>>, BackendError>
            + Send
            + Sync
            + 'static,
    {
        self.ruggeduinos = Some(Arc::new(discover));
        self
    }

    pub fn with_cameras<F>(mut self, discover: F) -> Self
    where
        F: Fn(&CameraSettings) -> Result<Vec<Discovered<dyn CameraBackend>>, BackendError>
            + Send
            + Sync
            + 'static,
    {
        self.cameras = Some(Arc::new(discover));
        self
    }

    pub fn with_kch<F>(mut self, discover: F) -> Self
    where
        F: Fn() -> Result<Vec<Discovered<dyn KchBackend>>, BackendError> + Send + Sync + 'static,
    {
        self.kch = Some(Arc::new(discover));
        self
    }

    /// 是否注册了该种板卡的后端
    pub fn supports(&self, kind: BoardKind) -> bool {
        match kind {
            BoardKind::PowerBoard => self.power_boards.is_some(),
            BoardKind::MotorBoard => self.motor_boards.is_some(),
            BoardKind::ServoBoard => self.servo_boards.is_some(),
            BoardKind::Ruggeduino => self.ruggeduinos.is_some(),
            BoardKind::Camera => self.cameras.is_some(),
            BoardKind::Kch => self.kch.is_some(),
        }
    }

    pub fn discover_power_boards(
        &self,
    ) -> Result<Vec<Discovered<dyn PowerBoardBackend>>, BackendError> {
        run(&self.name, BoardKind::PowerBoard, self.power_boards.as_deref())
    }

    pub fn discover_motor_boards(
        &self,
    ) -> Result<Vec<Discovered<dyn MotorBoardBackend>>, BackendError> {
        run(&self.name, BoardKind::MotorBoard, self.motor_boards.as_deref())
    }

    pub fn discover_servo_boards(
        &self,
    ) -> Result<Vec<Discovered<dyn ServoBoardBackend>>, BackendError> {
        run(&self.name, BoardKind::ServoBoard, self.servo_boards.as_deref())
    }

    pub fn discover_ruggeduinos(
        &self,
    ) -> Result<Vec<Discovered<dyn RuggeduinoBackend>>, BackendError> {
        run(&self.name, BoardKind::Ruggeduino, self.ruggeduinos.as_deref())
    }

    pub fn discover_cameras(
        &self,
        settings: &CameraSettings,
    ) -> Result<Vec<Discovered<dyn CameraBackend>>, BackendError> {
        match &self.cameras {
            Some(discover) => discover(settings),
            None => {
                debug!("{}: no backend registered for {}", self.name, BoardKind::Camera);
                Ok(Vec::new())
            },
        }
    }

    pub fn discover_kch(&self) -> Result<Vec<Discovered<dyn KchBackend>>, BackendError> {
        run(&self.name, BoardKind::Kch, self.kch.as_deref())
    }
}

fn run<B: ?Sized>(
    env: &str,
    kind: BoardKind,
    discover: Option<&(dyn Fn() -> Result<Vec<Discovered<B>>, BackendError> + Send + Sync)>,
) -> Result<Vec<Discovered<B>>, BackendError> {
    match discover {
        Some(discover) => discover(),
        None => {
            debug!("{}: no backend registered for {}", env, kind);
            Ok(Vec::new())
        },
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("name", &self.name)
            .field("power_boards", &self.power_boards.is_some())
            .field("motor_boards", &self.motor_boards.is_some())
            .field("servo_boards", &self.servo_boards.is_some())
            .field("ruggeduinos", &self.ruggeduinos.is_some())
            .field("cameras", &self.cameras.is_some())
            .field("kch", &self.kch.is_some())
            .finish()
    }
}
