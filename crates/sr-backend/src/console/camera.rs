use super::Console;
use crate::{BackendError, CameraBackend, Detection};

/// 控制台摄像头
///
/// 每次检测时提示输入以逗号分隔的标记 ID，空行表示没有看到标记。
/// 控制台无法提供位姿，所有标记的 `position` 均为 `None`。
pub struct ConsoleCameraBackend {
    console: Console,
    calibrated: bool,
}

impl ConsoleCameraBackend {
    pub fn new(console: Console, calibrated: bool) -> Self {
        Self {
            console,
            calibrated,
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }
}

impl CameraBackend for ConsoleCameraBackend {
    fn detect(&mut self) -> Result<Vec<Detection>, BackendError> {
        let ids: MarkerIds = self.console.read("Visible marker ids (comma separated)")?;
        Ok(ids
            .0
            .into_iter()
            .map(|raw_id| Detection {
                raw_id,
                pixel_centre: (0.0, 0.0),
                position: None,
            })
            .collect())
    }
}

struct MarkerIds(Vec<u32>);

impl std::str::FromStr for MarkerIds {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(MarkerIds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::test_io::console;

    #[test]
    fn test_detect_parses_ids() {
        let (console, _) = console("3, 17,x\n3, 17\n\n");
        let mut camera = ConsoleCameraBackend::new(console, false);

        let ids: Vec<u32> = camera.detect().unwrap().iter().map(|d| d.raw_id).collect();
        assert_eq!(ids, vec![3, 17]);
        assert!(camera.detect().unwrap().is_empty());
        assert!(!camera.is_calibrated());
    }
}
