//! Ruggeduino 引脚编号与 GPIO 模式

use crate::ValueError;
use std::fmt;
use std::str::FromStr;

/// GPIO 引脚模式
///
/// 列出任何板卡可能声明的全部模式；某个引脚实际支持哪些模式由板卡决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GpioPinMode {
    /// 数字输入（高阻）
    DigitalInput,
    /// 数字输入，带上拉电阻
    DigitalInputPullup,
    /// 数字输入，带下拉电阻
    DigitalInputPulldown,
    /// 数字输出
    DigitalOutput,
    /// 模拟输入（读取电压）
    AnalogueInput,
    /// 模拟输出
    AnalogueOutput,
    /// PWM 输出
    PwmOutput,
}

impl GpioPinMode {
    /// 全部模式
    pub const ALL: [GpioPinMode; 7] = [
        GpioPinMode::DigitalInput,
        GpioPinMode::DigitalInputPullup,
        GpioPinMode::DigitalInputPulldown,
        GpioPinMode::DigitalOutput,
        GpioPinMode::AnalogueInput,
        GpioPinMode::AnalogueOutput,
        GpioPinMode::PwmOutput,
    ];

    /// 是否为数字输入类模式
    pub fn is_digital_input(self) -> bool {
        matches!(
            self,
            Self::DigitalInput | Self::DigitalInputPullup | Self::DigitalInputPulldown
        )
    }

    /// 是否为输出类模式
    pub fn is_output(self) -> bool {
        matches!(
            self,
            Self::DigitalOutput | Self::AnalogueOutput | Self::PwmOutput
        )
    }
}

impl fmt::Display for GpioPinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DigitalInput => "DIGITAL_INPUT",
            Self::DigitalInputPullup => "DIGITAL_INPUT_PULLUP",
            Self::DigitalInputPulldown => "DIGITAL_INPUT_PULLDOWN",
            Self::DigitalOutput => "DIGITAL_OUTPUT",
            Self::AnalogueInput => "ANALOGUE_INPUT",
            Self::AnalogueOutput => "ANALOGUE_OUTPUT",
            Self::PwmOutput => "PWM_OUTPUT",
        };
        f.write_str(name)
    }
}

/// Ruggeduino 引脚编号
///
/// 有效范围 2..=19：
/// - 2..=13: 数字引脚
/// - 14..=19: 模拟引脚 A0..A5
///
/// 0、1 被串口占用，不对用户开放。A4/A5 保留给板载 I2C，任何模式设置都会被拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct PinId(u8);

/// 模拟引脚 A0
pub const A0: PinId = PinId(14);
/// 模拟引脚 A1
pub const A1: PinId = PinId(15);
/// 模拟引脚 A2
pub const A2: PinId = PinId(16);
/// 模拟引脚 A3
pub const A3: PinId = PinId(17);
/// 模拟引脚 A4（保留）
pub const A4: PinId = PinId(18);
/// 模拟引脚 A5（保留）
pub const A5: PinId = PinId(19);

impl PinId {
    /// 最小可用引脚号
    pub const FIRST: u8 = 2;
    /// 最大可用引脚号（A5）
    pub const LAST: u8 = 19;
    /// 第一个模拟引脚（A0）
    pub const FIRST_ANALOGUE: u8 = 14;

    /// 创建引脚编号
    ///
    /// # 错误
    /// - `ValueError::InvalidPin`: 编号不在 2..=19 内
    pub fn new(number: u8) -> Result<Self, ValueError> {
        if (Self::FIRST..=Self::LAST).contains(&number) {
            Ok(Self(number))
        } else {
            Err(ValueError::InvalidPin(number.to_string()))
        }
    }

    /// 引脚号
    pub const fn number(self) -> u8 {
        self.0
    }

    /// 是否为模拟引脚（A0..A5）
    pub const fn is_analogue(self) -> bool {
        self.0 >= Self::FIRST_ANALOGUE
    }

    /// 是否为保留引脚（A4/A5）
    pub const fn is_reserved(self) -> bool {
        self.0 == A4.0 || self.0 == A5.0
    }

    /// 遍历所有引脚（2..=19）
    pub fn all() -> impl Iterator<Item = PinId> {
        (Self::FIRST..=Self::LAST).map(PinId)
    }
}

impl TryFrom<u8> for PinId {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PinId> for u8 {
    fn from(pin: PinId) -> Self {
        pin.0
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_analogue() {
            write!(f, "A{}", self.0 - Self::FIRST_ANALOGUE)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for PinId {
    type Err = ValueError;

    /// 解析 `"2"`..`"13"` 或 `"A0"`..`"A5"`（大小写不敏感）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        let invalid = || ValueError::InvalidPin(label.to_string());

        if let Some(index) = label.strip_prefix(['A', 'a']) {
            let index = parse_index(index).ok_or_else(invalid)?;
            if index > 5 {
                return Err(invalid());
            }
            return Ok(Self(Self::FIRST_ANALOGUE + index));
        }

        let number = parse_index(label).ok_or_else(invalid)?;
        // 数字标签只覆盖 2..=13，模拟引脚必须用 A 前缀
        if number >= Self::FIRST_ANALOGUE {
            return Err(invalid());
        }
        Self::new(number).map_err(|_| invalid())
    }
}

/// 只接受十进制数字，不允许符号和多余的前导零
fn parse_index(digits: &str) -> Option<u8> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_range() {
        assert!(PinId::new(0).is_err());
        assert!(PinId::new(1).is_err());
        assert!(PinId::new(2).is_ok());
        assert!(PinId::new(19).is_ok());
        assert!(PinId::new(20).is_err());
        assert_eq!(PinId::all().count(), 18);
    }

    #[test]
    fn test_analogue_constants() {
        assert_eq!(A0.number(), 14);
        assert_eq!(A5.number(), 19);
        assert!(A0.is_analogue());
        assert!(!PinId::new(13).unwrap().is_analogue());
    }

    #[test]
    fn test_reserved_pins() {
        assert!(A4.is_reserved());
        assert!(A5.is_reserved());
        assert!(!A3.is_reserved());
        assert_eq!(PinId::all().filter(|p| p.is_reserved()).count(), 2);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(PinId::new(2).unwrap().to_string(), "2");
        assert_eq!(PinId::new(13).unwrap().to_string(), "13");
        assert_eq!(A0.to_string(), "A0");
        assert_eq!(A5.to_string(), "A5");
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("7".parse::<PinId>().unwrap(), PinId::new(7).unwrap());
        assert_eq!("A3".parse::<PinId>().unwrap(), A3);
        assert_eq!("a1".parse::<PinId>().unwrap(), A1);
        assert!("A6".parse::<PinId>().is_err());
        assert!("1".parse::<PinId>().is_err());
        assert!("14".parse::<PinId>().is_err());
        assert!("pin".parse::<PinId>().is_err());
    }

    #[test]
    fn test_parse_rejects_signs_and_padding() {
        for label in ["+5", "A+1", "A05", "05", "A", "", "A-0", "1 2"] {
            assert!(label.parse::<PinId>().is_err(), "{:?} should be rejected", label);
        }
        assert_eq!(" 5 ".parse::<PinId>().unwrap(), PinId::new(5).unwrap());
        assert_eq!("A0".parse::<PinId>().unwrap(), A0);
    }

    #[test]
    fn test_mode_classification() {
        assert!(GpioPinMode::DigitalInputPullup.is_digital_input());
        assert!(!GpioPinMode::DigitalOutput.is_digital_input());
        assert!(GpioPinMode::PwmOutput.is_output());
        assert!(!GpioPinMode::AnalogueInput.is_output());
        assert_eq!(GpioPinMode::AnalogueInput.to_string(), "ANALOGUE_INPUT");
    }
}
