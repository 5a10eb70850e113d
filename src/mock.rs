//! Transports used by the unit tests in place of a serial port.

use std::collections::{HashMap, VecDeque};
use std::io::{self, Read, Write};
use std::time::Duration;

use crate::types::{Color, Mode};
use crate::{Transport, DEFAULT_TIMEOUT};

fn timed_out() -> io::Error {
    io::Error::new(io::ErrorKind::TimedOut, "operation timed out")
}

/// A request/reply pair the scripted transport expects next.
#[derive(Debug, Clone)]
struct Expectation {
    request: Vec<u8>,
    reply: Vec<u8>,
}

/// Replays scripted replies and records everything written to it.
///
/// Expectations are consumed in order. Writing anything other than the next expected request is
/// an error, and reading without a pending reply times out like an idle serial port, or reports
/// end of stream once the transport is closed.
#[derive(Debug, Default)]
pub struct MockTransport {
    expectations: VecDeque<Expectation>,
    pending: VecDeque<u8>,
    chunk_size: Option<usize>,
    closed: bool,
    timeout: Duration,
    timeouts: Vec<Duration>,
    written: Vec<Vec<u8>>,
}

impl MockTransport {
    pub fn new() -> Self {
        MockTransport {
            timeout: DEFAULT_TIMEOUT,
            ..Self::default()
        }
    }

    /// Makes `data` readable without writing a request first.
    pub fn with_pending(mut self, data: &[u8]) -> Self {
        self.pending.extend(data);
        self
    }

    /// Reports end of stream instead of a timeout once nothing is pending.
    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    /// Splits every reply into reads of at most `chunk_size` bytes.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    /// Queues `reply` to be returned after `request` has been written.
    pub fn expect(mut self, request: &str, reply: &str) -> Self {
        self.expectations.push_back(Expectation {
            request: request.as_bytes().to_vec(),
            reply: reply.as_bytes().to_vec(),
        });
        self
    }

    /// Every write, in order.
    pub fn written(&self) -> &[Vec<u8>] {
        &self.written
    }

    pub fn remaining_expectations(&self) -> usize {
        self.expectations.len()
    }

    /// Every timeout set through `Transport::set_timeout`, in order.
    pub fn timeouts(&self) -> &[Duration] {
        &self.timeouts
    }
}

impl Write for MockTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.push(buf.to_vec());

        let expectation = self.expectations.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::BrokenPipe, "no more expectations")
        })?;

        if buf != expectation.request.as_slice() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "expected {:?}, got {:?}",
                    String::from_utf8_lossy(&expectation.request),
                    String::from_utf8_lossy(buf)
                ),
            ));
        }

        self.pending.extend(expectation.reply);

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for MockTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            return if self.closed { Ok(0) } else { Err(timed_out()) };
        }

        let limit = self.chunk_size.unwrap_or(usize::MAX);
        let n = self.pending.len().min(buf.len()).min(limit);

        for (dst, src) in buf.iter_mut().zip(self.pending.drain(..n)) {
            *dst = src;
        }

        Ok(n)
    }
}

impl Transport for MockTransport {
    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.timeout = timeout;
        self.timeouts.push(timeout);
        Ok(())
    }
}

/// A stand-in for the device firmware that keeps its configuration in memory.
#[derive(Debug)]
pub struct Simulator {
    pub colors: HashMap<String, Color>,
    pub startup_way: u8,
    pub silent: bool,
    pub permanent_writes: usize,
    timeout: Duration,
    reply: Vec<u8>,
}

impl Simulator {
    pub fn new() -> Self {
        let colors = Mode::ALL
            .iter()
            .map(|mode| (mode.as_str().to_string(), Color::default()))
            .collect();

        Simulator {
            colors,
            startup_way: 8,
            silent: false,
            permanent_writes: 0,
            timeout: DEFAULT_TIMEOUT,
            reply: Vec::new(),
        }
    }

    fn handle(&mut self, line: &str) -> String {
        let fields: Vec<&str> = line.split(',').collect();

        match fields.as_slice() {
            ["getwelcome"] => "tos428 simulator".to_string(),
            ["getstartupway"] => self.startup_way.to_string(),
            ["getsilent"] => self.silent.to_string(),
            ["getcolor", mode] => match self.colors.get(*mode) {
                Some(color) => color.to_string(),
                None => "fail".to_string(),
            },
            ["setcolor", mode, red, green, blue] if self.colors.contains_key(*mode) => {
                match (red.parse(), green.parse(), blue.parse()) {
                    (Ok(red), Ok(green), Ok(blue)) => {
                        self.colors
                            .insert(mode.to_string(), Color::new(red, green, blue));
                        "ok".to_string()
                    }
                    _ => "fail".to_string(),
                }
            }
            ["setstartupway", way] => {
                self.startup_way = way.parse().unwrap_or(0);
                "ok".to_string()
            }
            ["setsilent", "on"] => {
                self.silent = true;
                "ok".to_string()
            }
            ["setsilent", "off"] => {
                self.silent = false;
                "ok".to_string()
            }
            ["makepermanent"] => {
                self.permanent_writes += 1;
                "ok".to_string()
            }
            _ => "fail".to_string(),
        }
    }
}

impl Write for Simulator {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let line = String::from_utf8_lossy(buf).into_owned();
        let reply = self.handle(&line);

        self.reply = format!("{}\r\n", reply).into_bytes();

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for Simulator {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.reply.is_empty() {
            return Err(timed_out());
        }

        let n = self.reply.len().min(buf.len());
        buf[..n].copy_from_slice(&self.reply[..n]);
        self.reply.drain(..n);

        Ok(n)
    }
}

impl Transport for Simulator {
    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.timeout = timeout;
        Ok(())
    }
}
