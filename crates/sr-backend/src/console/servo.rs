use super::Console;
use crate::{BackendError, ServoBoardBackend};

/// 控制台舵机板（12 路舵机）
pub struct ConsoleServoBoardBackend {
    console: Console,
    servos: [Option<f32>; 12],
}

impl ConsoleServoBoardBackend {
    pub fn new(console: Console) -> Self {
        Self {
            console,
            servos: [None; 12],
        }
    }
}

impl ServoBoardBackend for ConsoleServoBoardBackend {
    fn servo_position(&mut self, index: usize) -> Result<Option<f32>, BackendError> {
        self.servos
            .get(index)
            .copied()
            .ok_or(BackendError::NotSupported("servo index"))
    }

    fn set_servo_position(
        &mut self,
        index: usize,
        position: Option<f32>,
    ) -> Result<(), BackendError> {
        let slot = self
            .servos
            .get_mut(index)
            .ok_or(BackendError::NotSupported("servo index"))?;
        *slot = position;
        match position {
            Some(position) => self
                .console
                .info(&format!("Setting servo {} to {:.3}", index, position)),
            None => self.console.info(&format!("Unpowering servo {}", index)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::test_io::console;

    #[test]
    fn test_positions() {
        let (console, output) = console("");
        let mut backend = ConsoleServoBoardBackend::new(console);

        assert_eq!(backend.servo_position(11).unwrap(), None);
        backend.set_servo_position(11, Some(-0.25)).unwrap();
        assert_eq!(backend.servo_position(11).unwrap(), Some(-0.25));
        backend.set_servo_position(11, None).unwrap();
        assert_eq!(backend.servo_position(11).unwrap(), None);

        let text = output.contents();
        assert!(text.contains("Setting servo 11 to -0.250"), "{}", text);
        assert!(text.contains("Unpowering servo 11"), "{}", text);
        assert!(backend.servo_position(12).is_err());
    }
}
