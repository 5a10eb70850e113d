pub mod device;
mod error;
#[cfg(test)]
mod mock;
pub mod protocol;
pub mod roms;
pub mod transport;
pub mod types;

use std::time::Duration;

pub use device::{Config, Device};
pub use error::Error;
pub use roms::RomList;
pub use serialport;
pub use transport::{SerialPort, Transport};
pub use types::{Color, DeviceInfo, Mode, Restrictor, Silent, Way};

/// The baud rate the tos428 firmware listens at
pub const BAUD_RATE: u32 = 115_200;

/// How long a read may block before the port reports a timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

/// How long a multi-line reply may go quiet before it is considered complete
pub const IDLE_TIMEOUT: Duration = Duration::from_millis(100);
