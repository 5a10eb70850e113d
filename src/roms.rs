//! The list of ROMs that are played with a 4-way joystick.

use std::fs;
use std::path::Path;

use log::debug;

use crate::Error;

/// The built-in list of 4-way ROMs, one file name per line
pub const EMBEDDED_ROM_LIST: &str = include_str!("../data/roms4way.txt");

/// An ordered, read-only list of ROM file names.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct RomList {
    roms: Vec<String>,
}

impl RomList {
    /// Parses one ROM name per line, trimming whitespace and skipping blank lines.
    pub fn parse(data: &str) -> RomList {
        let roms = data
            .lines()
            .map(str::trim)
            .filter(|rom| !rom.is_empty())
            .map(String::from)
            .collect();

        RomList { roms }
    }

    /// Returns the list compiled into the binary.
    pub fn embedded() -> RomList {
        RomList::parse(EMBEDDED_ROM_LIST)
    }

    /// Reads the list from the file at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<RomList, Error> {
        let path = path.as_ref();

        debug!("Reading ROM list from {}", path.display());

        let data =
            fs::read_to_string(path).map_err(|err| Error::RomList(path.to_path_buf(), err))?;

        Ok(RomList::parse(&data))
    }

    /// Loads the list from `path` if one is given, and the embedded list otherwise.
    pub fn load(path: Option<&Path>) -> Result<RomList, Error> {
        match path {
            Some(path) => RomList::from_file(path),
            None => Ok(RomList::embedded()),
        }
    }

    /// Writes the embedded list to `path`.
    pub fn export_embedded<P: AsRef<Path>>(path: P) -> Result<(), Error> {
        let path = path.as_ref();

        fs::write(path, EMBEDDED_ROM_LIST).map_err(|err| Error::RomList(path.to_path_buf(), err))
    }

    /// Returns true if the file name of `rom` is in the list.
    ///
    /// Only the last component of the path is compared, so `/roms/pacman.zip` matches `pacman.zip`.
    pub fn contains_rom<P: AsRef<Path>>(&self, rom: P) -> bool {
        match rom.as_ref().file_name().and_then(|name| name.to_str()) {
            Some(name) => self.roms.iter().any(|r| r == name),
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.roms.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.roms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roms.is_empty()
    }
}
