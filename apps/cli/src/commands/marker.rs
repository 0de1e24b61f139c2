//! 标记查询命令

use anyhow::Result;
use clap::Args;
use sr_robot3::GameError;
use sr_robot3::game::marker_size;

/// 标记查询命令参数
#[derive(Args, Debug)]
pub struct MarkerCommand {
    /// 标记 ID（已减去场地偏移）
    pub id: u32,
}

impl MarkerCommand {
    pub fn execute(&self) -> Result<()> {
        println!("{}", describe(self.id)?);
        Ok(())
    }
}

pub fn describe(id: u32) -> Result<String, GameError> {
    let size = marker_size(id)?;
    Ok(format!("Marker {} is used in the game, size {}mm", id, size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_game_markers() {
        assert_eq!(describe(0).unwrap(), "Marker 0 is used in the game, size 200mm");
        assert_eq!(describe(27).unwrap(), "Marker 27 is used in the game, size 200mm");
        assert_eq!(describe(28).unwrap(), "Marker 28 is used in the game, size 100mm");
    }

    #[test]
    fn test_unused_marker_is_an_error() {
        let err = describe(100).unwrap_err();
        assert_eq!(err.to_string(), "100 is not used for the game.");
    }
}
