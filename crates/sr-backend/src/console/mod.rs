//! 控制台后端
//!
//! 在没有硬件的电脑上运行机器人代码时使用：
//! - 写操作（打开输出口、设置电机功率……）打印到终端
//! - 读操作（按钮状态、电压、电流……）在终端提示用户输入，直到输入可以被解析
//!
//! 每块板卡持有自己的 [`Console`]，输出前缀为 `"<板卡名> <序列号>"`。

mod camera;
mod motor;
mod power;
mod ruggeduino;
mod servo;

pub use camera::ConsoleCameraBackend;
pub use motor::ConsoleMotorBoardBackend;
pub use power::ConsolePowerBoardBackend;
pub use ruggeduino::ConsoleRuggeduinoBackend;
pub use servo::ConsoleServoBoardBackend;

use crate::{
    BackendError, BoardKind, CameraBackend, Discovered, Environment, MotorBoardBackend,
    PowerBoardBackend, RuggeduinoBackend, ServoBoardBackend,
};
use std::any::type_name;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// 控制台环境中各板卡使用的序列号
pub const POWER_BOARD_SERIAL: &str = "SRPB-CONSOLE";
pub const MOTOR_BOARD_SERIAL: &str = "SRMB-CONSOLE";
pub const SERVO_BOARD_SERIAL: &str = "SRSB-CONSOLE";
pub const RUGGEDUINO_SERIAL: &str = "RUGGEDUINO-CONSOLE";
pub const CAMERA_SERIAL: &str = "CAMERA-CONSOLE";

enum Input {
    Stdin,
    Reader(Box<dyn BufRead + Send>),
}

impl Input {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        match self {
            Self::Stdin => io::stdin().read_line(buf),
            Self::Reader(reader) => reader.read_line(buf),
        }
    }
}

/// 终端输入输出辅助
pub struct Console {
    descriptor: String,
    input: Input,
    output: Box<dyn Write + Send>,
}

impl Console {
    /// 使用标准输入输出
    pub fn stdio(descriptor: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
            input: Input::Stdin,
            output: Box::new(io::stdout()),
        }
    }

    /// 使用自定义输入输出（测试使用）
    pub fn with_io(
        descriptor: impl Into<String>,
        input: Box<dyn BufRead + Send>,
        output: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            descriptor: descriptor.into(),
            input: Input::Reader(input),
            output,
        }
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// 输出一条信息
    pub fn info(&mut self, message: &str) -> Result<(), BackendError> {
        writeln!(self.output, "{}: {}", self.descriptor, message)?;
        self.output.flush()?;
        Ok(())
    }

    /// 提示并读取一个值，解析失败时重新提示
    ///
    /// # 错误
    /// - `BackendError::Io`: 输入已关闭（EOF）或读写失败
    pub fn read<T: FromStr>(&mut self, prompt: &str) -> Result<T, BackendError> {
        self.read_with(prompt, type_name::<T>(), |s| s.parse().ok())
    }

    /// 提示并读取布尔值
    ///
    /// 接受 `true/false`、`yes/no`、`y/n`、`1/0`（大小写不敏感）。
    pub fn read_bool(&mut self, prompt: &str) -> Result<bool, BackendError> {
        self.read_with(prompt, "bool", parse_bool)
    }

    /// 提示用户按回车
    pub fn wait_for_enter(&mut self, prompt: &str) -> Result<(), BackendError> {
        self.read_with(prompt, "line", |_| Some(()))
    }

    fn read_with<T>(
        &mut self,
        prompt: &str,
        type_label: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T, BackendError> {
        loop {
            write!(self.output, "{}: {}: ", self.descriptor, prompt)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("console input closed while reading {}", prompt),
                )
                .into());
            }

            let response = line.trim();
            if let Some(value) = parse(response) {
                return Ok(value);
            }
            writeln!(
                self.output,
                "Unable to construct a {} from '{}'",
                type_label, response
            )?;
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

fn descriptor(kind: BoardKind, serial: &str) -> String {
    format!("{} {}", kind, serial)
}

impl Environment {
    /// 控制台环境：电源板、电机板、舵机板、Ruggeduino（没有 KCH）
    pub fn console() -> Self {
        Environment::new("Console Environment")
            .with_power_boards(|| {
                Ok(vec![Discovered::new(
                    POWER_BOARD_SERIAL,
                    Box::new(ConsolePowerBoardBackend::new(Console::stdio(descriptor(
                        BoardKind::PowerBoard,
                        POWER_BOARD_SERIAL,
                    )))) as Box<dyn PowerBoardBackend>,
                )])
            })
            .with_motor_boards(|| {
                Ok(vec![Discovered::new(
                    MOTOR_BOARD_SERIAL,
                    Box::new(ConsoleMotorBoardBackend::new(Console::stdio(descriptor(
                        BoardKind::MotorBoard,
                        MOTOR_BOARD_SERIAL,
                    )))) as Box<dyn MotorBoardBackend>,
                )])
            })
            .with_servo_boards(|| {
                Ok(vec![Discovered::new(
                    SERVO_BOARD_SERIAL,
                    Box::new(ConsoleServoBoardBackend::new(Console::stdio(descriptor(
                        BoardKind::ServoBoard,
                        SERVO_BOARD_SERIAL,
                    )))) as Box<dyn ServoBoardBackend>,
                )])
            })
            .with_ruggeduinos(|| {
                Ok(vec![
                    Discovered::new(
                        RUGGEDUINO_SERIAL,
                        Box::new(ConsoleRuggeduinoBackend::new(Console::stdio(descriptor(
                            BoardKind::Ruggeduino,
                            RUGGEDUINO_SERIAL,
                        )))) as Box<dyn RuggeduinoBackend>,
                    )
                    .with_device("console"),
                ])
            })
    }

    /// 控制台环境，附加控制台摄像头
    pub fn console_with_vision() -> Self {
        let mut env = Self::console().with_cameras(|settings| {
            Ok(vec![Discovered::new(
                CAMERA_SERIAL,
                Box::new(ConsoleCameraBackend::new(
                    Console::stdio(descriptor(BoardKind::Camera, CAMERA_SERIAL)),
                    settings.calibration_file.is_some(),
                )) as Box<dyn CameraBackend>,
            )])
        });
        env.name = "Console Environment with Vision".to_string();
        env
    }
}

#[cfg(test)]
pub(crate) mod test_io {
    use parking_lot::Mutex;
    use std::io::{self, Cursor, Write};
    use std::sync::Arc;

    /// 可共享的输出缓冲区
    #[derive(Clone, Default)]
    pub struct SharedOutput(pub Arc<Mutex<Vec<u8>>>);

    impl SharedOutput {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl Write for SharedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    pub fn console(input: &str) -> (super::Console, SharedOutput) {
        let output = SharedOutput::default();
        let console = super::Console::with_io(
            "Test Board SERIAL",
            Box::new(Cursor::new(input.as_bytes().to_vec())),
            Box::new(output.clone()),
        );
        (console, output)
    }
}

#[cfg(test)]
mod tests {
    use super::test_io::console;
    use super::*;

    #[test]
    fn test_info_prefixes_descriptor() {
        let (mut console, output) = console("");
        console.info("Setting output H0 to on").unwrap();
        assert_eq!(output.contents(), "Test Board SERIAL: Setting output H0 to on\n");
    }

    #[test]
    fn test_read_reprompts_until_valid() {
        let (mut console, output) = console("abc\n12.5\n");
        let value: f32 = console.read("Battery voltage").unwrap();
        assert_eq!(value, 12.5);

        let text = output.contents();
        assert_eq!(text.matches("Battery voltage: ").count(), 2);
        assert!(text.contains("Unable to construct a f32 from 'abc'"), "{}", text);
    }

    #[test]
    fn test_read_bool_variants() {
        let (mut console, _) = console("yes\nN\nmaybe\n1\n");
        assert!(console.read_bool("Pressed").unwrap());
        assert!(!console.read_bool("Pressed").unwrap());
        assert!(console.read_bool("Pressed").unwrap());
    }

    #[test]
    fn test_eof_is_an_error() {
        let (mut console, _) = console("");
        let err = console.read::<u32>("Number").unwrap_err();
        match err {
            BackendError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_console_environment_names() {
        assert_eq!(Environment::console().name(), "Console Environment");
        let env = Environment::console_with_vision();
        assert_eq!(env.name(), "Console Environment with Vision");
        assert!(env.supports(BoardKind::Camera));
        assert!(!Environment::console().supports(BoardKind::Camera));
    }

    #[test]
    fn test_console_environment_discovers_one_of_each() {
        let env = Environment::console();
        assert_eq!(env.discover_power_boards().unwrap().len(), 1);
        assert_eq!(env.discover_motor_boards().unwrap().len(), 1);
        assert_eq!(env.discover_servo_boards().unwrap().len(), 1);
        let ruggeduinos = env.discover_ruggeduinos().unwrap();
        assert_eq!(ruggeduinos[0].serial_number, RUGGEDUINO_SERIAL);
        assert_eq!(ruggeduinos[0].device.as_deref(), Some("console"));
        assert!(!env.supports(BoardKind::Kch));
        assert!(env.discover_kch().unwrap().is_empty());
    }
}
