use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::Error;

/// The button mode a color belongs to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Mode {
    /// Button lit while the restrictor is in the 4-way position
    FourWay,
    /// Button lit while the restrictor is in the 8-way position
    EightWay,
    /// Button configured as a keyboard key
    Keyboard,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::FourWay, Mode::EightWay, Mode::Keyboard];

    /// Returns the token used for this mode on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::FourWay => "4",
            Mode::EightWay => "8",
            Mode::Keyboard => "keyboard",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "4" => Ok(Mode::FourWay),
            "8" => Ok(Mode::EightWay),
            "keyboard" => Ok(Mode::Keyboard),
            _ => Err(Error::Validation("mode", s.to_string())),
        }
    }
}

/// Orientation of a restrictor.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
pub enum Way {
    Four = 4,
    Eight = 8,
}

impl fmt::Display for Way {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

impl FromStr for Way {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(|way| Way::try_from(way).ok())
            .ok_or_else(|| Error::Validation("way", s.to_string()))
    }
}

/// Selects which restrictor(s) a position command applies to.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Restrictor {
    All,
    A,
    B,
    C,
    D,
}

impl Restrictor {
    pub fn as_str(self) -> &'static str {
        match self {
            Restrictor::All => "all",
            Restrictor::A => "a",
            Restrictor::B => "b",
            Restrictor::C => "c",
            Restrictor::D => "d",
        }
    }
}

impl Default for Restrictor {
    fn default() -> Self {
        Restrictor::All
    }
}

impl fmt::Display for Restrictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts `all`, a letter `a` to `d` or the equivalent index `1` to `4`.
impl FromStr for Restrictor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Restrictor::All),
            "a" | "1" => Ok(Restrictor::A),
            "b" | "2" => Ok(Restrictor::B),
            "c" | "3" => Ok(Restrictor::C),
            "d" | "4" => Ok(Restrictor::D),
            _ => Err(Error::Validation("restrictor", s.to_string())),
        }
    }
}

/// Whether the device keeps its restrictor motors quiet.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Silent {
    On,
    Off,
}

impl Silent {
    pub fn as_str(self) -> &'static str {
        match self {
            Silent::On => "on",
            Silent::Off => "off",
        }
    }
}

impl fmt::Display for Silent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Silent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" => Ok(Silent::On),
            "off" => Ok(Silent::Off),
            _ => Err(Error::Validation("silent mode", s.to_string())),
        }
    }
}

impl From<bool> for Silent {
    fn from(silent: bool) -> Self {
        if silent {
            Silent::On
        } else {
            Silent::Off
        }
    }
}

impl From<Silent> for bool {
    fn from(silent: Silent) -> Self {
        silent == Silent::On
    }
}

/// An RGB button color.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const fn new(red: u8, green: u8, blue: u8) -> Color {
        Color { red, green, blue }
    }

    /// Builds a color from unchecked channel values, each of which must be within `0..=255`.
    pub fn from_channels(red: i64, green: i64, blue: i64) -> Result<Color, Error> {
        let channel = |name: &'static str, value: i64| {
            u8::try_from(value).map_err(|_| Error::Validation(name, value.to_string()))
        };

        Ok(Color {
            red: channel("red", red)?,
            green: channel("green", green)?,
            blue: channel("blue", blue)?,
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.red, self.green, self.blue)
    }
}

/// Parses user input of the form `r,g,b`.
impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let channels = s
            .split(',')
            .map(|c| c.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| Error::Validation("color", s.to_string()))?;

        match channels.as_slice() {
            &[red, green, blue] => Color::from_channels(red, green, blue),
            _ => Err(Error::Validation("color", s.to_string())),
        }
    }
}

/// Summary of the device identity and its color configuration.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DeviceInfo {
    /// Product name and firmware version
    pub welcome: String,
    /// Orientation all restrictors move to after power up
    pub startup_way: Way,
    pub four_way_color: Color,
    pub eight_way_color: Color,
    pub keyboard_color: Color,
}
