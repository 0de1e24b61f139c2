//! 比赛规则：哪些标记在本场比赛中使用，以及它们的尺寸

use std::ops::Range;
use thiserror::Error;

/// 比赛规则错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("{0} is not used for the game.")]
    UnusedMarker(u32),
}

/// 标记 ID 范围与边长（mm）
///
/// - 0..28: 场地边界标记
/// - 28..100: 其余都是 token
pub const MARKER_SIZES: [(Range<u32>, u32); 2] = [(0..28, 200), (28..100, 100)];

/// 标记（已映射到参赛者范围）是否在本场比赛中使用
pub fn marker_used_in_game(marker_id: u32) -> bool {
    MARKER_SIZES
        .iter()
        .any(|(range, _)| range.contains(&marker_id))
}

/// 标记边长（mm）
///
/// # 错误
/// - `GameError::UnusedMarker`: 标记不在本场比赛中使用
pub fn marker_size(marker_id: u32) -> Result<u32, GameError> {
    MARKER_SIZES
        .iter()
        .find(|(range, _)| range.contains(&marker_id))
        .map(|(_, size)| *size)
        .ok_or(GameError::UnusedMarker(marker_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(marker_size(0), Ok(200));
        assert_eq!(marker_size(27), Ok(200));
        assert_eq!(marker_size(28), Ok(100));
        assert_eq!(marker_size(99), Ok(100));
        assert_eq!(marker_size(100), Err(GameError::UnusedMarker(100)));
        assert!(!marker_used_in_game(100));
        assert!(marker_used_in_game(0));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            GameError::UnusedMarker(150).to_string(),
            "150 is not used for the game."
        );
    }
}
