//! The byte stream the driver talks over.

use std::ffi::OsStr;
use std::fmt;
use std::io::{self, Read, Write};
use std::time::Duration;

use log::debug;
use serialport::{DataBits, FlowControl, Parity, SerialPortSettings, StopBits};

use crate::Error;

/// A blocking byte stream whose reads give up after a configurable timeout.
///
/// A read that times out must fail with `io::ErrorKind::TimedOut`.
pub trait Transport: Read + Write {
    fn timeout(&self) -> Duration;

    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()>;
}

/// Serial connection with an open serial port.
pub struct SerialPort {
    name: String,
    baud_rate: u32,
    inner_port: Box<dyn serialport::SerialPort>,
}

impl fmt::Debug for SerialPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialPort")
            .field("name", &self.name)
            .field("baud_rate", &self.baud_rate)
            .field("timeout", &self.inner_port.timeout())
            .finish()
    }
}

impl SerialPort {
    /// Opens the given `port` as a `SerialPort` with the given `baud_rate`, 8 data bits, no
    /// parity, one stop bit and no flow control.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tos428::{SerialPort, BAUD_RATE, DEFAULT_TIMEOUT};
    ///
    /// let port = SerialPort::open("/dev/ttyACM0", BAUD_RATE, DEFAULT_TIMEOUT)?;
    ///
    /// # Ok::<(), tos428::Error>(())
    /// ```
    pub fn open<S: AsRef<OsStr>>(
        port: S,
        baud_rate: u32,
        timeout: Duration,
    ) -> Result<SerialPort, Error> {
        let name = port.as_ref().to_string_lossy().into_owned();

        debug!("Opening serial port {} at {} baud", name, baud_rate);

        let settings = SerialPortSettings {
            baud_rate,
            data_bits: DataBits::Eight,
            flow_control: FlowControl::None,
            parity: Parity::None,
            stop_bits: StopBits::One,
            timeout,
        };

        let inner_port = serialport::open_with_settings(port.as_ref(), &settings)
            .map_err(|err| Error::SerialOpen(name.clone(), err))?;

        Ok(SerialPort {
            name,
            baud_rate,
            inner_port,
        })
    }

    /// The path the port was opened with.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Read for SerialPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner_port.read(buf)
    }
}

impl Write for SerialPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner_port.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner_port.flush()
    }
}

impl Transport for SerialPort {
    fn timeout(&self) -> Duration {
        self.inner_port.timeout()
    }

    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.inner_port.set_timeout(timeout).map_err(io::Error::from)
    }
}
