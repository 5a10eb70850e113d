use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// An argument failed a local range check. Nothing was sent to the device.
    #[error("Invalid {}: {:?}", _0, _1)]
    Validation(&'static str, String),

    #[error("Error when opening serial port {}: {}", _0, _1)]
    SerialOpen(String, serialport::Error),

    /// Writing to or reading from the transport failed.
    #[error("I/O error: {}", _0)]
    Transport(#[from] io::Error),

    /// The reply could not be decoded as the command's expected reply.
    #[error("Invalid reply to {:?}: {} (got {:?})", command, reason, reply)]
    Protocol {
        command: String,
        reply: String,
        reason: &'static str,
    },

    /// The device answered a mutating command with something other than `ok`.
    #[error("Device rejected {:?}: {:?}", command, reply)]
    Device { command: String, reply: String },

    #[error("ROM list error for {}: {}", _0.display(), _1)]
    RomList(PathBuf, io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_name_the_rejected_command() {
        let err = Error::Device {
            command: "makepermanent".into(),
            reply: "fail".into(),
        };

        assert_eq!(
            err.to_string(),
            "Device rejected \"makepermanent\": \"fail\""
        );
    }

    #[test]
    fn it_should_describe_protocol_errors() {
        let err = Error::Protocol {
            command: "getcolor,4".into(),
            reply: "10,20".into(),
            reason: "expected three color channels",
        };

        assert_eq!(
            err.to_string(),
            "Invalid reply to \"getcolor,4\": expected three color channels (got \"10,20\")"
        );
    }

    #[test]
    fn it_should_convert_io_errors_to_transport_errors() {
        let err: Error = io::Error::new(io::ErrorKind::TimedOut, "timed out").into();

        assert!(matches!(err, Error::Transport(_)));
    }
}
