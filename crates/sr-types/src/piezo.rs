//! 蜂鸣器音符与音高

use crate::ValueError;

/// 蜂鸣器音符（C6..C8 音阶，单位 Hz）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, num_enum::IntoPrimitive)]
#[repr(u32)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Note {
    C6 = 1047,
    D6 = 1175,
    E6 = 1319,
    F6 = 1397,
    G6 = 1568,
    A6 = 1760,
    B6 = 1976,
    C7 = 2093,
    D7 = 2349,
    E7 = 2637,
    F7 = 2794,
    G7 = 3136,
    A7 = 3520,
    B7 = 3951,
    C8 = 4186,
}

impl Note {
    /// 频率（Hz）
    pub fn frequency(self) -> u32 {
        self.into()
    }
}

/// 音高：预定义音符或任意频率
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pitch {
    Note(Note),
    Hz(u32),
}

impl Pitch {
    /// 创建任意频率的音高
    ///
    /// # 错误
    /// - `ValueError::InvalidValue`: 频率为 0
    pub fn hz(frequency: u32) -> Result<Self, ValueError> {
        Self::Hz(frequency).validate()
    }

    /// 校验频率（必须为正）
    pub fn validate(self) -> Result<Self, ValueError> {
        if self.frequency() == 0 {
            return Err(ValueError::InvalidValue {
                field: "pitch",
                value: "0 Hz".to_string(),
            });
        }
        Ok(self)
    }

    /// 频率（Hz）
    pub fn frequency(self) -> u32 {
        match self {
            Self::Note(note) => note.frequency(),
            Self::Hz(hz) => hz,
        }
    }
}

impl From<Note> for Pitch {
    fn from(note: Note) -> Self {
        Self::Note(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_frequency() {
        assert_eq!(Note::A6.frequency(), 1760);
        assert_eq!(Note::C8.frequency(), 4186);
        assert_eq!(Pitch::from(Note::C6).frequency(), 1047);
    }

    #[test]
    fn test_zero_frequency_rejected() {
        assert!(Pitch::hz(0).is_err());
        assert_eq!(Pitch::hz(440).unwrap().frequency(), 440);
    }
}
