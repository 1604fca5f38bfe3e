//! Serial joystick input
//!
//! An analog stick reports one line per reading, e.g.
//! `X: 512 | Y: 512 | SW: LIBRE`. Axes are 10-bit with the rest position
//! at 512; the switch reads `PRESIONADO` while held.

use super::kinematics::Direction;

/// Axis value at rest
pub const JOYSTICK_CENTER: i32 = 512;
/// Offsets up to this size are ignored
pub const JOYSTICK_DEADZONE: i32 = 100;

/// Switch text while the button is held
const BUTTON_PRESSED: &str = "PRESIONADO";

/// One parsed reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoystickReading {
    pub x: i32,
    pub y: i32,
    pub button: bool,
}

impl JoystickReading {
    /// Parse a serial line. Fields may come in any order; all three are required.
    pub fn parse(line: &str) -> Option<Self> {
        let mut x = None;
        let mut y = None;
        let mut button = None;

        for field in line.split('|') {
            let Some((key, value)) = field.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "X" => x = value.parse().ok(),
                "Y" => y = value.parse().ok(),
                "SW" if !value.is_empty() => button = Some(value == BUTTON_PRESSED),
                _ => {}
            }
        }

        Some(Self {
            x: x?,
            y: y?,
            button: button?,
        })
    }

    /// Held directions; y grows downward
    pub fn direction(&self, center: i32, deadzone: i32) -> Direction {
        let dx = self.x - center;
        let dy = self.y - center;
        Direction {
            up: dy < -deadzone,
            down: dy > deadzone,
            left: dx < -deadzone,
            right: dx > deadzone,
        }
    }
}

/// Turns readings into input, firing pause once per button press
#[derive(Debug, Clone, Copy)]
pub struct Joystick {
    pub center: i32,
    pub deadzone: i32,
    button_down: bool,
}

impl Default for Joystick {
    fn default() -> Self {
        Self {
            center: JOYSTICK_CENTER,
            deadzone: JOYSTICK_DEADZONE,
            button_down: false,
        }
    }
}

impl Joystick {
    /// Directions for `line` and whether pause was just pressed.
    ///
    /// Unreadable lines return `None` and leave the button state alone.
    pub fn read(&mut self, line: &str) -> Option<(Direction, bool)> {
        let reading = JoystickReading::parse(line)?;
        let pressed = reading.button && !self.button_down;
        self.button_down = reading.button;
        Some((reading.direction(self.center, self.deadzone), pressed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serial_line() {
        let reading = JoystickReading::parse("X: 512 | Y: 498 | SW: LIBRE").unwrap();
        assert_eq!(
            reading,
            JoystickReading {
                x: 512,
                y: 498,
                button: false
            }
        );

        let reading = JoystickReading::parse("X: 0 | Y: 1023 | SW: PRESIONADO\r").unwrap();
        assert!(reading.button);
        assert_eq!((reading.x, reading.y), (0, 1023));
    }

    #[test]
    fn test_parse_rejects_partial_lines() {
        assert_eq!(JoystickReading::parse("X: 512 | Y: 512"), None);
        assert_eq!(JoystickReading::parse("X: abc | Y: 512 | SW: LIBRE"), None);
        assert_eq!(JoystickReading::parse(""), None);
        assert_eq!(JoystickReading::parse("booting..."), None);
    }

    #[test]
    fn test_deadzone() {
        let mut stick = Joystick::default();

        // Exactly at the deadzone edge: still centered
        let (dir, _) = stick.read("X: 612 | Y: 412 | SW: LIBRE").unwrap();
        assert_eq!(dir, Direction::default());

        let (dir, _) = stick.read("X: 613 | Y: 411 | SW: LIBRE").unwrap();
        assert_eq!(
            dir,
            Direction {
                up: true,
                right: true,
                ..Default::default()
            }
        );

        let (dir, _) = stick.read("X: 10 | Y: 1000 | SW: LIBRE").unwrap();
        assert_eq!(
            dir,
            Direction {
                down: true,
                left: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_pause_fires_on_press_edge_only() {
        let mut stick = Joystick::default();
        let held = "X: 512 | Y: 512 | SW: PRESIONADO";
        let free = "X: 512 | Y: 512 | SW: LIBRE";

        assert_eq!(stick.read(held).map(|r| r.1), Some(true));
        assert_eq!(stick.read(held).map(|r| r.1), Some(false));
        assert_eq!(stick.read(held).map(|r| r.1), Some(false));
        // Garbage in between does not release the button
        assert_eq!(stick.read("X: 5"), None);
        assert_eq!(stick.read(held).map(|r| r.1), Some(false));
        assert_eq!(stick.read(free).map(|r| r.1), Some(false));
        assert_eq!(stick.read(held).map(|r| r.1), Some(true));
    }
}
