use super::Console;
use crate::{BackendError, PowerBoardBackend, PowerBoardLed};
use sr_types::PowerOutputPosition;
use std::time::Duration;

/// 控制台电源板
///
/// 输出口开关状态保存在内存中，电流、电压、按键由用户输入。
pub struct ConsolePowerBoardBackend {
    console: Console,
    outputs: [bool; PowerOutputPosition::ALL.len()],
}

impl ConsolePowerBoardBackend {
    pub fn new(console: Console) -> Self {
        Self {
            console,
            outputs: [false; PowerOutputPosition::ALL.len()],
        }
    }
}

impl PowerBoardBackend for ConsolePowerBoardBackend {
    fn output_enabled(&mut self, output: PowerOutputPosition) -> Result<bool, BackendError> {
        Ok(self.outputs[output.index()])
    }

    fn set_output_enabled(
        &mut self,
        output: PowerOutputPosition,
        enabled: bool,
    ) -> Result<(), BackendError> {
        let state = if enabled { "on" } else { "off" };
        self.console.info(&format!("Setting output {} to {}", output, state))?;
        self.outputs[output.index()] = enabled;
        Ok(())
    }

    fn output_current(&mut self, output: PowerOutputPosition) -> Result<f32, BackendError> {
        self.console.read(&format!("Current for output {}", output))
    }

    fn battery_voltage(&mut self) -> Result<f32, BackendError> {
        self.console.read("Battery voltage")
    }

    fn battery_current(&mut self) -> Result<f32, BackendError> {
        self.console.read("Battery current")
    }

    fn buzz(&mut self, duration: Duration, frequency: u32) -> Result<(), BackendError> {
        self.console.info(&format!(
            "Buzzing at {}Hz for {}ms",
            frequency,
            duration.as_millis()
        ))
    }

    fn start_button_pressed(&mut self) -> Result<bool, BackendError> {
        self.console.read_bool("Start button pressed")
    }

    fn set_led(&mut self, led: PowerBoardLed, on: bool) -> Result<(), BackendError> {
        let state = if on { "on" } else { "off" };
        self.console.info(&format!("Setting {} LED to {}", led, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::test_io::console;

    #[test]
    fn test_outputs_are_remembered() {
        let (console, output) = console("");
        let mut backend = ConsolePowerBoardBackend::new(console);

        assert!(!backend.output_enabled(PowerOutputPosition::H1).unwrap());
        backend.set_output_enabled(PowerOutputPosition::H1, true).unwrap();
        assert!(backend.output_enabled(PowerOutputPosition::H1).unwrap());
        assert!(!backend.output_enabled(PowerOutputPosition::L0).unwrap());
        assert!(output.contents().contains("Setting output H1 to on"));
    }

    #[test]
    fn test_readings_prompt_the_user() {
        let (console, output) = console("11.9\n2.5\nno\n");
        let mut backend = ConsolePowerBoardBackend::new(console);

        assert_eq!(backend.battery_voltage().unwrap(), 11.9);
        assert_eq!(backend.output_current(PowerOutputPosition::FiveVolt).unwrap(), 2.5);
        assert!(!backend.start_button_pressed().unwrap());
        assert!(output.contents().contains("Current for output FIVE_VOLT"));
    }

    #[test]
    fn test_buzz_is_printed() {
        let (console, output) = console("");
        let mut backend = ConsolePowerBoardBackend::new(console);
        backend.buzz(Duration::from_millis(100), 1047).unwrap();
        assert!(output.contents().contains("Buzzing at 1047Hz for 100ms"));
    }
}
