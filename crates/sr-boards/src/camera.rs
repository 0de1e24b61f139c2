//! 摄像头
//!
//! 后端返回原始标记 ID；这里减去比赛的标记偏移，丢弃本场比赛不使用的标记，
//! 并为每个标记附上物理尺寸。

use crate::{Board, BoardError};
use parking_lot::Mutex;
use sr_backend::{BoardKind, CameraBackend, Detection, Discovered, MarkerPosition};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// 标记尺寸查询：返回标记边长（mm），本场比赛不使用的标记返回 `None`
pub type MarkerSizes = Arc<dyn Fn(u32) -> Option<u32> + Send + Sync>;

/// 看到的一个标记
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// 比赛中的标记 ID（已减去偏移）
    pub id: u32,
    /// 边长（mm）
    pub size: u32,
    pub pixel_centre: (f32, f32),
    /// 位姿；未标定时为 `None`
    pub position: Option<MarkerPosition>,
}

impl Marker {
    /// 距离（mm）
    pub fn distance(&self) -> Option<f32> {
        self.position.map(|p| p.distance)
    }
}

struct Inner {
    serial: String,
    backend: Mutex<Box<dyn CameraBackend>>,
    marker_offset: AtomicU32,
    sizes: MarkerSizes,
}

/// 摄像头
#[derive(Clone)]
pub struct CameraBoard {
    inner: Arc<Inner>,
}

impl CameraBoard {
    pub fn new(
        serial: impl Into<String>,
        backend: Box<dyn CameraBackend>,
        marker_offset: u32,
        sizes: MarkerSizes,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                serial: serial.into(),
                backend: Mutex::new(backend),
                marker_offset: AtomicU32::new(marker_offset),
                sizes,
            }),
        }
    }

    pub fn from_discovered(
        found: Discovered<dyn CameraBackend>,
        marker_offset: u32,
        sizes: MarkerSizes,
    ) -> Self {
        Self::new(found.serial_number, found.backend, marker_offset, sizes)
    }

    pub fn marker_offset(&self) -> u32 {
        self.inner.marker_offset.load(Ordering::Acquire)
    }

    /// 比赛开始时更新标记偏移
    pub fn set_marker_offset(&self, offset: u32) {
        self.inner.marker_offset.store(offset, Ordering::Release);
    }

    /// 拍摄一帧，返回本场比赛使用的标记
    pub fn see(&self) -> Result<Vec<Marker>, BoardError> {
        let detections = self.inner.backend.lock().detect()?;
        let offset = self.marker_offset();
        Ok(detections
            .into_iter()
            .filter_map(|d| self.to_marker(d, offset))
            .collect())
    }

    /// 拍摄一帧，只返回标记 ID
    pub fn see_ids(&self) -> Result<Vec<u32>, BoardError> {
        Ok(self.see()?.into_iter().map(|m| m.id).collect())
    }

    fn to_marker(&self, detection: Detection, offset: u32) -> Option<Marker> {
        let id = detection.raw_id.checked_sub(offset)?;
        let size = (self.inner.sizes)(id)?;
        Some(Marker {
            id,
            size,
            pixel_centre: detection.pixel_centre,
            position: detection.position,
        })
    }
}

impl Board for CameraBoard {
    const KIND: BoardKind = BoardKind::Camera;

    fn serial_number(&self) -> &str {
        &self.inner.serial
    }

    fn firmware_version(&self) -> Result<Option<String>, BoardError> {
        Ok(self.inner.backend.lock().firmware_version()?)
    }

    fn make_safe(&self) -> Result<(), BoardError> {
        Ok(())
    }
}

impl fmt::Debug for CameraBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraBoard")
            .field("serial", &self.inner.serial)
            .field("marker_offset", &self.marker_offset())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sr_backend::CameraSettings;
    use sr_backend::sim::Simulation;

    fn sizes() -> MarkerSizes {
        Arc::new(|id: u32| match id {
            0..=27 => Some(200),
            28..=99 => Some(100),
            _ => None,
        })
    }

    fn detection(raw_id: u32) -> Detection {
        Detection {
            raw_id,
            pixel_centre: (10.0, 20.0),
            position: Some(MarkerPosition {
                distance: 900.0,
                horizontal_angle: 0.0,
                vertical_angle: 0.0,
            }),
        }
    }

    fn camera(offset: u32, raw_ids: &[u32], settings: &CameraSettings) -> CameraBoard {
        let sim = Simulation::new().with_camera("CAM1");
        sim.camera("CAM1").unwrap().lock().detections =
            raw_ids.iter().copied().map(detection).collect();
        let found = sim.environment().discover_cameras(settings).unwrap();
        let found = found.into_iter().next().unwrap();
        CameraBoard::from_discovered(found, offset, sizes())
    }

    #[test]
    fn test_markers_get_sizes() {
        let settings = CameraSettings {
            calibration_file: Some("C270.xml".into()),
        };
        let camera = camera(0, &[3, 40, 150], &settings);
        let markers = camera.see().unwrap();

        assert_eq!(markers.len(), 2);
        assert_eq!((markers[0].id, markers[0].size), (3, 200));
        assert_eq!((markers[1].id, markers[1].size), (40, 100));
        assert_eq!(markers[0].distance(), Some(900.0));
    }

    #[test]
    fn test_offset_shifts_and_filters() {
        let camera = camera(100, &[5, 103, 140, 250], &CameraSettings::default());
        assert_eq!(camera.see_ids().unwrap(), vec![3, 40]);

        camera.set_marker_offset(0);
        assert_eq!(camera.marker_offset(), 0);
        assert_eq!(camera.see_ids().unwrap(), vec![5]);
    }

    #[test]
    fn test_uncalibrated_markers_have_no_position() {
        let camera = camera(0, &[1], &CameraSettings::default());
        let markers = camera.see().unwrap();
        assert_eq!(markers[0].position, None);
        assert_eq!(markers[0].distance(), None);
    }
}
