//! The tos428 line protocol.
//!
//! Every exchange is one ASCII command line written as-is, followed by a reply made of one or
//! more lines that the device terminates with `\r\n`. Fields inside a command or a reply are
//! separated by commas.

use std::convert::TryFrom;
use std::fmt;
use std::io::{self, Read, Write};

use log::trace;

use crate::types::{Color, Mode, Restrictor, Silent, Way};
use crate::{Error, Transport, IDLE_TIMEOUT};

/// Size of a single read from the transport
pub const READ_CHUNK_SIZE: usize = 128;

/// Upper bound for a single reply. Anything longer is a protocol error.
pub const MAX_REPLY_LEN: usize = 64 * 1024;

/// The reply every mutating command answers with on success
pub const OK_REPLY: &str = "ok";

/// How the end of a reply is recognized.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Framing {
    /// The reply is complete at the first `\r\n`
    Line,
    /// The reply is one or more `\r\n` terminated lines, complete once the device goes quiet for
    /// `IDLE_TIMEOUT`
    Lines,
}

/// A command understood by the device firmware.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Command<'a> {
    GetWelcome,
    GetStartupWay,
    GetColor(Mode),
    GetSilent,
    GetKeyList,
    DumpEeprom,
    SetColor(Mode, Color),
    SetWay(Restrictor, Way),
    SetSilent(Silent),
    SetStartupWay(Way),
    MakePermanent,
    RestoreFactory,
    /// Sent verbatim
    Raw(&'a str),
}

impl Command<'_> {
    pub fn framing(&self) -> Framing {
        match self {
            Command::GetKeyList | Command::DumpEeprom | Command::Raw(_) => Framing::Lines,
            _ => Framing::Line,
        }
    }

    /// Writes the command line to the `writer` without a line terminator.
    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        writer.write_all(self.to_string().as_bytes())?;
        writer.flush()?;

        Ok(())
    }
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::GetWelcome => f.write_str("getwelcome"),
            Command::GetStartupWay => f.write_str("getstartupway"),
            Command::GetColor(mode) => write!(f, "getcolor,{}", mode),
            Command::GetSilent => f.write_str("getsilent"),
            Command::GetKeyList => f.write_str("getkeylist"),
            Command::DumpEeprom => f.write_str("dumpeeprom"),
            Command::SetColor(mode, color) => write!(f, "setcolor,{},{}", mode, color),
            Command::SetWay(restrictor, way) => write!(f, "setway,{},{}", restrictor, way),
            Command::SetSilent(silent) => write!(f, "setsilent,{}", silent),
            Command::SetStartupWay(way) => write!(f, "setstartupway,{}", way),
            Command::MakePermanent => f.write_str("makepermanent"),
            Command::RestoreFactory => f.write_str("restorefactory"),
            Command::Raw(command) => f.write_str(command),
        }
    }
}

/// Reads the reply to `command` from the `transport` and returns it with its trailing line
/// terminator removed.
///
/// A timeout or end of stream before the reply is complete is a `Transport` error, so a partial
/// reply is never returned. Multi-line replies are read with the transport timeout lowered to
/// `IDLE_TIMEOUT` after the first line, and the original timeout is restored afterwards.
pub fn read_reply<T: Transport + ?Sized>(
    transport: &mut T,
    command: &Command,
) -> Result<String, Error> {
    let mut reply: Vec<u8> = Vec::with_capacity(READ_CHUNK_SIZE);

    read_line(transport, &mut reply, command)?;

    if command.framing() == Framing::Lines {
        let timeout = transport.timeout();

        transport.set_timeout(timeout.min(IDLE_TIMEOUT))?;
        let result = read_remaining_lines(transport, &mut reply, command);
        let restored = transport.set_timeout(timeout);

        result?;
        restored?;
    }

    let reply = String::from_utf8(reply).map_err(|err| Error::Protocol {
        command: command.to_string(),
        reply: String::from_utf8_lossy(err.as_bytes()).into_owned(),
        reason: "reply is not valid text",
    })?;

    Ok(reply.trim_end_matches(&['\r', '\n'][..]).to_string())
}

/// Reads until the received bytes end in `\r\n`.
fn read_line<T: Transport + ?Sized>(
    transport: &mut T,
    reply: &mut Vec<u8>,
    command: &Command,
) -> Result<(), Error> {
    while !reply.ends_with(b"\r\n") {
        if read_chunk(transport, reply, command)? == 0 {
            return Err(Error::Transport(io::ErrorKind::UnexpectedEof.into()));
        }
    }

    Ok(())
}

/// Reads further lines until the transport goes quiet on a line boundary.
fn read_remaining_lines<T: Transport + ?Sized>(
    transport: &mut T,
    reply: &mut Vec<u8>,
    command: &Command,
) -> Result<(), Error> {
    loop {
        match read_chunk(transport, reply, command) {
            Ok(0) if reply.ends_with(b"\r\n") => return Ok(()),
            Ok(0) => return Err(Error::Transport(io::ErrorKind::UnexpectedEof.into())),
            Ok(_) => continue,
            Err(Error::Transport(ref err))
                if err.kind() == io::ErrorKind::TimedOut && reply.ends_with(b"\r\n") =>
            {
                return Ok(())
            }
            Err(err) => return Err(err),
        }
    }
}

/// Appends a single read to `reply` and returns the number of bytes read.
fn read_chunk<T: Transport + ?Sized>(
    transport: &mut T,
    reply: &mut Vec<u8>,
    command: &Command,
) -> Result<usize, Error> {
    let mut buf = [0u8; READ_CHUNK_SIZE];

    loop {
        match transport.read(&mut buf) {
            Ok(n) => {
                if n > 0 {
                    trace!("Received {:?}", String::from_utf8_lossy(&buf[..n]));
                    reply.extend_from_slice(&buf[..n]);
                }

                if reply.len() > MAX_REPLY_LEN {
                    return Err(protocol_error(
                        command,
                        &String::from_utf8_lossy(reply),
                        "reply is too long",
                    ));
                }

                return Ok(n);
            }
            Err(ref err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(Error::Transport(err)),
        }
    }
}

fn protocol_error(command: &Command, reply: &str, reason: &'static str) -> Error {
    Error::Protocol {
        command: command.to_string(),
        reply: reply.to_string(),
        reason,
    }
}

/// Checks that a mutating `command` was acknowledged.
pub fn expect_ok(command: &Command, reply: &str) -> Result<(), Error> {
    if reply == OK_REPLY {
        Ok(())
    } else {
        Err(Error::Device {
            command: command.to_string(),
            reply: reply.to_string(),
        })
    }
}

/// Parses a field made of ASCII digits only, without sign or surrounding whitespace.
fn parse_digits<N: std::str::FromStr>(field: &str) -> Option<N> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    field.parse().ok()
}

/// Decodes the reply to `getstartupway`.
pub fn parse_way(command: &Command, reply: &str) -> Result<Way, Error> {
    if reply.is_empty() || !reply.bytes().all(|b| b.is_ascii_digit()) {
        return Err(protocol_error(command, reply, "expected an integer"));
    }

    parse_digits::<u8>(reply)
        .and_then(|way| Way::try_from(way).ok())
        .ok_or_else(|| protocol_error(command, reply, "expected 4 or 8"))
}

/// Decodes an `r,g,b` reply.
pub fn parse_color(command: &Command, reply: &str) -> Result<Color, Error> {
    let fields: Vec<&str> = reply.split(',').collect();

    if fields.len() != 3 {
        return Err(protocol_error(
            command,
            reply,
            "expected three color channels",
        ));
    }

    let mut channels = [0u8; 3];

    for (channel, field) in channels.iter_mut().zip(fields) {
        *channel = parse_digits(field)
            .ok_or_else(|| protocol_error(command, reply, "color channel is not within 0..=255"))?;
    }

    Ok(Color::new(channels[0], channels[1], channels[2]))
}

/// Decodes a boolean reply such as `true` or `false`.
pub fn parse_bool(command: &Command, reply: &str) -> Result<bool, Error> {
    match reply.trim() {
        "true" | "True" | "TRUE" | "t" | "T" | "1" => Ok(true),
        "false" | "False" | "FALSE" | "f" | "F" | "0" => Ok(false),
        _ => Err(protocol_error(command, reply, "expected a boolean")),
    }
}

/// Decodes a list of key names separated by `\r\n`.
pub fn parse_key_list(command: &Command, reply: &str) -> Result<Vec<String>, Error> {
    let keys: Vec<String> = reply
        .split("\r\n")
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(String::from)
        .collect();

    if keys.is_empty() {
        return Err(protocol_error(command, reply, "key list is empty"));
    }

    Ok(keys)
}
