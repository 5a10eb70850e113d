use std::path::Path;
use std::time::Duration;

use log::{debug, info};

use crate::protocol::{self, Command};
use crate::types::{Color, DeviceInfo, Mode, Restrictor, Way};
use crate::{Error, RomList, SerialPort, Transport, BAUD_RATE, DEFAULT_TIMEOUT};

/// Settings the driver is constructed with.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the serial device, e.g. `/dev/ttyACM0` or `COM3`
    pub port: String,
    pub baud_rate: u32,
    /// How long a read may block before the transport gives up
    pub timeout: Duration,
    /// The restrictor(s) that `Device::set_way_for_rom` switches
    pub restrictor: Restrictor,
    /// ROMs that are played in the 4-way position
    pub roms: RomList,
}

impl Config {
    /// Returns a config for `port` with the default line settings, all restrictors and the
    /// embedded ROM list.
    pub fn new<S: Into<String>>(port: S) -> Config {
        Config {
            port: port.into(),
            baud_rate: BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
            restrictor: Restrictor::All,
            roms: RomList::embedded(),
        }
    }
}

/// Driver for a tos428 restrictor controller.
///
/// Each method performs exactly one request/reply exchange, except where noted. Taking `&mut self`
/// keeps exchanges strictly one at a time, which is what keeps replies correlated with their
/// commands.
#[derive(Debug)]
pub struct Device<T = SerialPort> {
    transport: T,
    config: Config,
}

impl Device<SerialPort> {
    /// Opens the serial port named in `config`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tos428::{Config, Device, Way};
    ///
    /// let mut device = Device::open(Config::new("/dev/ttyACM0"))?;
    /// device.set_way(Default::default(), Way::Four)?;
    ///
    /// # Ok::<(), tos428::Error>(())
    /// ```
    pub fn open(config: Config) -> Result<Device<SerialPort>, Error> {
        let transport = SerialPort::open(&config.port, config.baud_rate, config.timeout)?;

        Ok(Device::with_transport(transport, config))
    }
}

impl<T: Transport> Device<T> {
    /// Creates a driver that talks over an already open `transport`.
    pub fn with_transport(transport: T, config: Config) -> Device<T> {
        Device { transport, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Consumes `self` and returns the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    fn request(&mut self, command: &Command) -> Result<String, Error> {
        debug!("Sending {:?}", command.to_string());

        command.to_writer(&mut self.transport)?;
        protocol::read_reply(&mut self.transport, command)
    }

    fn execute(&mut self, command: Command) -> Result<(), Error> {
        let reply = self.request(&command)?;

        protocol::expect_ok(&command, &reply)
    }

    /// Returns the product name and firmware version.
    pub fn get_welcome(&mut self) -> Result<String, Error> {
        self.request(&Command::GetWelcome)
    }

    /// Returns the orientation all restrictors are moved to after power up.
    pub fn get_startup_way(&mut self) -> Result<Way, Error> {
        let command = Command::GetStartupWay;
        let reply = self.request(&command)?;

        protocol::parse_way(&command, &reply)
    }

    pub fn get_color(&mut self, mode: Mode) -> Result<Color, Error> {
        let command = Command::GetColor(mode);
        let reply = self.request(&command)?;

        protocol::parse_color(&command, &reply)
    }

    /// Returns true if the servos are unpowered while idle.
    pub fn get_silent(&mut self) -> Result<bool, Error> {
        let command = Command::GetSilent;
        let reply = self.request(&command)?;

        protocol::parse_bool(&command, &reply)
    }

    /// Returns the symbolic key names a button can be mapped to.
    pub fn get_key_list(&mut self) -> Result<Vec<String>, Error> {
        let command = Command::GetKeyList;
        let reply = self.request(&command)?;

        protocol::parse_key_list(&command, &reply)
    }

    /// Returns a dump of the EEPROM where the permanent configuration lives.
    pub fn dump_eeprom(&mut self) -> Result<String, Error> {
        self.request(&Command::DumpEeprom)
    }

    /// Sets the button color used in `mode`.
    pub fn set_color(&mut self, mode: Mode, color: Color) -> Result<(), Error> {
        self.execute(Command::SetColor(mode, color))
    }

    /// Moves `restrictor` to the given `way`.
    pub fn set_way(&mut self, restrictor: Restrictor, way: Way) -> Result<(), Error> {
        info!("Setting restrictor {} position to {}-way", restrictor, way);

        self.execute(Command::SetWay(restrictor, way))
    }

    /// Enables or disables powering down the servos while idle.
    pub fn set_silent(&mut self, silent: bool) -> Result<(), Error> {
        self.execute(Command::SetSilent(silent.into()))
    }

    /// Sets the power-up orientation and makes the configuration permanent.
    ///
    /// This sends two commands. `makepermanent` is only sent when `setstartupway` succeeded, and
    /// the returned error names whichever command failed.
    pub fn set_startup_way(&mut self, way: Way) -> Result<(), Error> {
        self.execute(Command::SetStartupWay(way))?;
        self.make_permanent()
    }

    /// Writes the current temporary configuration to the EEPROM.
    pub fn make_permanent(&mut self) -> Result<(), Error> {
        self.execute(Command::MakePermanent)
    }

    /// Reverts to the factory settings until power is lost. Call `make_permanent` to keep them.
    pub fn restore_factory(&mut self) -> Result<(), Error> {
        self.execute(Command::RestoreFactory)
    }

    /// Sends `command` verbatim and returns the reply.
    pub fn raw(&mut self, command: &str) -> Result<String, Error> {
        self.request(&Command::Raw(command))
    }

    /// Moves the configured restrictor to 4-way if `rom` is in the ROM list and to 8-way
    /// otherwise, returning the way that was set.
    pub fn set_way_for_rom<P: AsRef<Path>>(&mut self, rom: P) -> Result<Way, Error> {
        let rom = rom.as_ref();

        info!("Checking ROM: {}", rom.display());

        let way = if self.config.roms.contains_rom(rom) {
            Way::Four
        } else {
            Way::Eight
        };
        let restrictor = self.config.restrictor;

        self.set_way(restrictor, way)?;

        Ok(way)
    }

    /// Reads the identity, startup way and all mode colors.
    pub fn info(&mut self) -> Result<DeviceInfo, Error> {
        Ok(DeviceInfo {
            welcome: self.get_welcome()?,
            startup_way: self.get_startup_way()?,
            four_way_color: self.get_color(Mode::FourWay)?,
            eight_way_color: self.get_color(Mode::EightWay)?,
            keyboard_color: self.get_color(Mode::Keyboard)?,
        })
    }
}
