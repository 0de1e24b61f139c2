//! 摄像头标定文件选择
//!
//! 按顺序尝试一组策略，第一个给出标定名称的策略决定使用 `<dir>/<name>.xml`。
//! 都不匹配时禁用位姿估计。

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// 标定策略
pub trait CalibrationStrategy: Send + Sync {
    /// 标定文件名（不含扩展名），不适用时返回 `None`
    fn calibration_name(&self) -> Option<String>;
}

/// 总是返回同一个标定名称
#[derive(Debug, Clone)]
pub struct StaticStrategy {
    name: String,
}

impl StaticStrategy {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl CalibrationStrategy for StaticStrategy {
    fn calibration_name(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

/// 列出当前连接的 USB 设备（vendor id, product id）
pub trait UsbDeviceLister: Send + Sync {
    fn devices(&self) -> Vec<(u16, u16)>;
}

/// 没有 USB 枚举能力时使用，总是返回空列表
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUsbDevices;

impl UsbDeviceLister for NoUsbDevices {
    fn devices(&self) -> Vec<(u16, u16)> {
        Vec::new()
    }
}

/// 通过 libusb 枚举
#[cfg(feature = "usb")]
#[derive(Debug, Clone, Copy, Default)]
pub struct RusbDeviceLister;

#[cfg(feature = "usb")]
impl UsbDeviceLister for RusbDeviceLister {
    fn devices(&self) -> Vec<(u16, u16)> {
        let devices = match rusb::devices() {
            Ok(devices) => devices,
            Err(e) => {
                warn!("Failed to enumerate USB devices: {}", e);
                return Vec::new();
            },
        };
        devices
            .iter()
            .filter_map(|device| device.device_descriptor().ok())
            .map(|desc| (desc.vendor_id(), desc.product_id()))
            .collect()
    }
}

/// 系统默认的 USB 枚举方式
pub fn system_usb_lister() -> Arc<dyn UsbDeviceLister> {
    #[cfg(feature = "usb")]
    {
        Arc::new(RusbDeviceLister)
    }
    #[cfg(not(feature = "usb"))]
    {
        Arc::new(NoUsbDevices)
    }
}

/// 指定 USB 设备存在时使用对应标定
#[derive(Clone)]
pub struct UsbDevicePresentStrategy {
    vendor_id: u16,
    product_id: u16,
    name: String,
    lister: Arc<dyn UsbDeviceLister>,
}

impl UsbDevicePresentStrategy {
    pub fn new(
        vendor_id: u16,
        product_id: u16,
        name: impl Into<String>,
        lister: Arc<dyn UsbDeviceLister>,
    ) -> Self {
        Self {
            vendor_id,
            product_id,
            name: name.into(),
            lister,
        }
    }
}

impl CalibrationStrategy for UsbDevicePresentStrategy {
    fn calibration_name(&self) -> Option<String> {
        self.lister
            .devices()
            .contains(&(self.vendor_id, self.product_id))
            .then(|| self.name.clone())
    }
}

impl fmt::Debug for UsbDevicePresentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsbDevicePresentStrategy")
            .field("vendor_id", &format_args!("{:04x}", self.vendor_id))
            .field("product_id", &format_args!("{:04x}", self.product_id))
            .field("name", &self.name)
            .finish()
    }
}

const FACETIME_CAMERA: &str = "FaceTime HD Camera";

/// macOS 内置摄像头
///
/// 读取 `system_profiler -json SPCameraDataType`，第一个摄像头是
/// FaceTime HD Camera 时使用同名标定。
#[derive(Debug, Clone, Copy, Default)]
pub struct MacSystemStrategy;

#[derive(Deserialize)]
struct CameraData {
    #[serde(rename = "SPCameraDataType", default)]
    cameras: Vec<CameraEntry>,
}

#[derive(Deserialize)]
struct CameraEntry {
    #[serde(rename = "_name")]
    name: String,
}

impl MacSystemStrategy {
    /// 从 `system_profiler` 的 JSON 输出中识别摄像头
    pub fn parse(json: &str) -> Option<String> {
        let data: CameraData = serde_json::from_str(json).ok()?;
        let first = data.cameras.first()?;
        (first.name == FACETIME_CAMERA).then(|| FACETIME_CAMERA.to_string())
    }
}

impl CalibrationStrategy for MacSystemStrategy {
    fn calibration_name(&self) -> Option<String> {
        if !cfg!(target_os = "macos") {
            return None;
        }
        let output = std::process::Command::new("system_profiler")
            .args(["-json", "SPCameraDataType"])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        Self::parse(&String::from_utf8_lossy(&output.stdout))
    }
}

/// 默认策略列表（使用给定的 USB 枚举方式）
pub fn default_strategies_with(
    lister: Arc<dyn UsbDeviceLister>,
) -> Vec<Box<dyn CalibrationStrategy>> {
    const USB_CAMERAS: [(u16, u16, &str); 7] = [
        (0x046d, 0x0825, "Logitech C270"),
        (0x046d, 0x0807, "Logitech B500"),
        (0x046d, 0x080a, "Logitech C905"),
        (0x046d, 0x082d, "Logitech C920"),
        (0x046d, 0x0892, "Logitech C920"),
        (0x046d, 0x08e5, "Logitech C920"),
        (0x0c45, 0x6713, "Microdia Integrated_Webcam_HD"),
    ];

    let mut strategies: Vec<Box<dyn CalibrationStrategy>> = USB_CAMERAS
        .iter()
        .map(|&(vendor_id, product_id, name)| {
            Box::new(UsbDevicePresentStrategy::new(
                vendor_id,
                product_id,
                name,
                lister.clone(),
            )) as Box<dyn CalibrationStrategy>
        })
        .collect();
    strategies.push(Box::new(MacSystemStrategy));
    strategies
}

/// 默认策略列表
pub fn default_strategies() -> Vec<Box<dyn CalibrationStrategy>> {
    default_strategies_with(system_usb_lister())
}

/// 按策略顺序选择标定文件
pub fn find_calibration_with(
    dir: &Path,
    strategies: &[Box<dyn CalibrationStrategy>],
) -> Option<PathBuf> {
    for strategy in strategies {
        if let Some(name) = strategy.calibration_name() {
            debug!("Using {} for webcam calibration", name);
            return Some(dir.join(format!("{}.xml", name)));
        }
    }
    warn!("Unable to determine camera calibration, disabling pose estimation");
    None
}

/// 使用默认策略选择标定文件
pub fn find_calibration(dir: &Path) -> Option<PathBuf> {
    find_calibration_with(dir, &default_strategies())
}
