use super::Console;
use crate::{BackendError, RuggeduinoBackend};
use sr_types::{GpioPinMode, PinId};
use std::collections::HashMap;

/// 控制台 Ruggeduino
///
/// 输出引脚的电平保存在内存中；输入引脚的读数由用户输入。
pub struct ConsoleRuggeduinoBackend {
    console: Console,
    modes: HashMap<PinId, GpioPinMode>,
    outputs: HashMap<PinId, bool>,
}

impl ConsoleRuggeduinoBackend {
    pub fn new(console: Console) -> Self {
        Self {
            console,
            modes: HashMap::new(),
            outputs: HashMap::new(),
        }
    }
}

impl RuggeduinoBackend for ConsoleRuggeduinoBackend {
    fn set_pin_mode(&mut self, pin: PinId, mode: GpioPinMode) -> Result<(), BackendError> {
        self.modes.insert(pin, mode);
        self.console.info(&format!("Set pin {} to {}", pin, mode))
    }

    fn digital_read(&mut self, pin: PinId) -> Result<bool, BackendError> {
        if self.modes.get(&pin) == Some(&GpioPinMode::DigitalOutput) {
            return Ok(self.outputs.get(&pin).copied().unwrap_or(false));
        }
        self.console.read_bool(&format!("Pin {} digital state", pin))
    }

    fn digital_write(&mut self, pin: PinId, state: bool) -> Result<(), BackendError> {
        self.outputs.insert(pin, state);
        let level = if state { "high" } else { "low" };
        self.console.info(&format!("Set pin {} state to {}", pin, level))
    }

    fn analogue_read(&mut self, pin: PinId) -> Result<f32, BackendError> {
        self.console.read(&format!("Pin {} ADC voltage", pin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::test_io::console;
    use sr_types::A0;

    #[test]
    fn test_output_pin_reads_back_written_state() {
        let (console, output) = console("");
        let mut backend = ConsoleRuggeduinoBackend::new(console);
        let pin = PinId::new(13).unwrap();

        backend.set_pin_mode(pin, GpioPinMode::DigitalOutput).unwrap();
        backend.digital_write(pin, true).unwrap();
        assert!(backend.digital_read(pin).unwrap());
        assert!(output.contents().contains("Set pin 13 state to high"));
    }

    #[test]
    fn test_input_pins_prompt() {
        let (console, output) = console("y\n2.5\n");
        let mut backend = ConsoleRuggeduinoBackend::new(console);
        let pin = PinId::new(4).unwrap();

        backend.set_pin_mode(pin, GpioPinMode::DigitalInputPullup).unwrap();
        assert!(backend.digital_read(pin).unwrap());
        assert_eq!(backend.analogue_read(A0).unwrap(), 2.5);
        assert!(output.contents().contains("Pin A0 ADC voltage"));
    }
}
