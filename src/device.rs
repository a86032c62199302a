//! Serial device boundary
//!
//! [`DeviceWriter`] is implemented by the platform serial port. [`SerialLink`]
//! layers the open/write policy on top of it: one retry with a relaxed open
//! mode, exact-length writes, idempotent close. Nothing is retried beyond that.

#[cfg(feature = "esp32-log")]
use esp_println::println;

/// How the port is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Write-only, bypassing driver buffering
    WriteOnlyUnbuffered,
    /// Write-only, buffered; used for the retry
    WriteOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// The port could not be opened in any mode
    OpenFailed,
    /// Write attempted on a closed port
    NotOpen,
    /// The port rejected the baud rate
    BaudRate(u32),
    /// Fewer bytes were accepted than the frame holds
    ShortWrite { written: usize, expected: usize },
    /// Any other I/O failure reported by the port
    Io,
}

/// Blocking byte sink for an LED controller
///
/// Implement this trait to support different serial backends.
pub trait DeviceWriter {
    /// Acquire the port
    fn open(&mut self, mode: OpenMode) -> Result<(), DeviceError>;

    /// Configure the line speed, 8 data bits
    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), DeviceError>;

    /// Write `bytes`, returning how many were accepted
    fn write(&mut self, bytes: &[u8]) -> Result<usize, DeviceError>;

    /// Release the port
    fn close(&mut self);
}

/// Open/write/close policy around a [`DeviceWriter`]
#[derive(Debug)]
pub struct SerialLink<W: DeviceWriter> {
    writer: W,
    baud_rate: u32,
    is_open: bool,
}

impl<W: DeviceWriter> SerialLink<W> {
    pub const fn new(writer: W, baud_rate: u32) -> Self {
        Self {
            writer,
            baud_rate,
            is_open: false,
        }
    }

    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    pub const fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    pub const fn writer(&self) -> &W {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Open the port and set the baud rate.
    ///
    /// An already open port is closed first. A failed unbuffered open is
    /// retried exactly once in buffered mode.
    pub fn open(&mut self) -> Result<(), DeviceError> {
        if self.is_open {
            self.close();
        }

        if self.writer.open(OpenMode::WriteOnlyUnbuffered).is_err() {
            #[cfg(feature = "esp32-log")]
            println!("[SerialLink.open] unbuffered open failed, retrying buffered");
            if let Err(err) = self.writer.open(OpenMode::WriteOnly) {
                #[cfg(feature = "esp32-log")]
                println!("[SerialLink.open] open failed: {:?}", err);
                return Err(err);
            }
        }
        self.is_open = true;

        if let Err(err) = self.writer.set_baud_rate(self.baud_rate) {
            #[cfg(feature = "esp32-log")]
            println!("[SerialLink.open] set baud rate {} failed", self.baud_rate);
            self.close();
            return Err(err);
        }
        Ok(())
    }

    /// Write a whole frame; a partial write is a failure
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), DeviceError> {
        if !self.is_open {
            return Err(DeviceError::NotOpen);
        }
        let written = self.writer.write(bytes)?;
        if written != bytes.len() {
            #[cfg(feature = "esp32-log")]
            println!(
                "[SerialLink.write] short write: {} of {} bytes",
                written,
                bytes.len()
            );
            return Err(DeviceError::ShortWrite {
                written,
                expected: bytes.len(),
            });
        }
        Ok(())
    }

    /// Release the port; safe to call repeatedly
    pub fn close(&mut self) {
        if self.is_open {
            self.writer.close();
            self.is_open = false;
        }
    }
}
