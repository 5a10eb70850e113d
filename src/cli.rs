use std::path::PathBuf;

use structopt::StructOpt;
use tos428::{Color, Mode, Restrictor, Silent, Way};

#[derive(StructOpt, Debug)]
pub enum Command {
    /// Print the device identity, startup orientation and colors
    Info,
    /// Move the restrictor(s) to the given orientation
    Way {
        /// 4 or 8
        way: Way,
    },
    /// Pick 4-way or 8-way depending on whether the ROM is in the 4-way ROM list
    Rom {
        /// Path or file name of the ROM
        rom: PathBuf,
    },
    /// Get or set the button color of a mode
    Color {
        /// 4, 8 or keyboard
        mode: Mode,
        /// The new color as r,g,b
        color: Option<Color>,
    },
    /// Get or set whether the servos are unpowered when idle
    Silent {
        /// on or off
        state: Option<Silent>,
    },
    /// Get or set the orientation used after power up
    StartupWay { way: Option<Way> },
    /// List the key names buttons can be mapped to
    Keys,
    /// Dump the EEPROM contents
    DumpEeprom,
    /// Restore the factory settings
    FactoryReset {
        /// Write the factory settings to the EEPROM
        #[structopt(long)]
        permanent: bool,
    },
    /// Send a raw command to the device and print the reply
    Raw { command: String },
    /// Write the built-in 4-way ROM list to a file
    ExportRomlist { path: PathBuf },
}

#[derive(StructOpt, Debug)]
#[structopt(name = "tos428")]
pub struct Opts {
    #[structopt(subcommand)]
    pub command: Command,

    /// The serial device of the tos428, e.g. /dev/ttyACM0 or COM3
    #[structopt(env = "TOS428_DEVICE", short = "d", long = "device")]
    pub device: Option<String>,
    /// The restrictor to apply settings to (all, a-d or 1-4)
    #[structopt(
        env = "TOS428_RESTRICTOR",
        short = "r",
        long = "restrictor",
        default_value = "all"
    )]
    pub restrictor: Restrictor,
    /// File containing the 4-way ROMs, one per line. Defaults to the built-in list
    #[structopt(env = "TOS428_ROMLIST", long = "romlist")]
    pub rom_list: Option<PathBuf>,
}
