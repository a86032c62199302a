//! Smart bulb mirroring
//!
//! A network bulb follows the strip with a single averaged color, sent as a
//! CIE xy chromaticity point plus a brightness. Requests are best effort:
//! while one is outstanding new ones are dropped, not queued. An outstanding
//! request is forgotten once its reply arrives or its timeout passes.

use core::fmt::Write;

use embassy_time::{Duration, Instant};
use heapless::String;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{Rgb12, SRGB12, average_color};

/// Capacity of a rendered payload
pub const PAYLOAD_JSON_LEN: usize = 96;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulbError {
    /// The request could not be handed to the network
    Transport,
    /// The payload did not fit the render buffer
    Format,
}

/// What a bulb is told to show
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulbPayload {
    /// CIE x chromaticity
    pub x: f64,
    /// CIE y chromaticity
    pub y: f64,
    /// Brightness (0-255)
    pub brightness: u8,
    /// Fade time in the bulb's own units (100 ms)
    pub transition_time: u16,
}

impl BulbPayload {
    /// Build the payload for the average of `colors`
    pub fn from_colors(colors: &[Rgb12], config: &BulbConfig) -> Self {
        let xyz = SRGB12.rgb_to_xyz(average_color(colors));
        let (x, y) = xyz.chromaticity();
        Self {
            x,
            y,
            brightness: brightness_heuristic(xyz.y, config.full_brightness_at),
            transition_time: config.transition_time,
        }
    }

    /// Render as `{"xy":[x,y],"transitiontime":t,"bri":b}`
    pub fn to_json(&self) -> Result<String<PAYLOAD_JSON_LEN>, BulbError> {
        let mut out = String::new();
        write!(
            out,
            "{{\"xy\":[{:.4},{:.4}],\"transitiontime\":{},\"bri\":{}}}",
            self.x, self.y, self.transition_time, self.brightness
        )
        .map_err(|_| BulbError::Format)?;
        Ok(out)
    }
}

/// Scale luminance so that `threshold` already means full brightness.
///
/// Bulbs mirroring a screen look dark most of the time otherwise; only very
/// dark scenes dim them.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn brightness_heuristic(luminance: f64, threshold: u8) -> u8 {
    let threshold = f64::from(threshold.max(1));
    if luminance >= threshold {
        return 255;
    }
    libm::round((luminance.max(0.0) / threshold) * 255.0) as u8
}

/// Bulb settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulbConfig {
    /// Luminance (Y, 0-100) from which the bulb is driven at full brightness
    pub full_brightness_at: u8,
    /// Fade time passed to the bulb
    pub transition_time: u16,
    /// How long to wait for a reply before accepting new requests
    pub response_timeout: Duration,
}

impl Default for BulbConfig {
    fn default() -> Self {
        Self {
            full_brightness_at: 30,
            transition_time: 1,
            response_timeout: Duration::from_millis(1000),
        }
    }
}

/// Non-blocking network sink for bulb payloads
///
/// `put` starts the request and returns; the reply is reported back through
/// [`BulbWorker::complete`].
pub trait BulbTransport {
    fn put(&mut self, payload: &BulbPayload) -> Result<(), BulbError>;
}

/// Outcome of [`BulbWorker::submit`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubmitOutcome {
    /// A request was started with this payload
    Sent(BulbPayload),
    /// A previous request is still outstanding; nothing was sent
    DroppedBusy,
}

/// Sends averaged colors to a bulb, dropping requests while busy
#[derive(Debug)]
pub struct BulbWorker<T: BulbTransport> {
    transport: T,
    config: BulbConfig,
    /// Start time of the outstanding request
    pending: Option<Instant>,
}

impl<T: BulbTransport> BulbWorker<T> {
    pub const fn new(transport: T, config: BulbConfig) -> Self {
        Self {
            transport,
            config,
            pending: None,
        }
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub const fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Send the average of `colors` unless a request is outstanding
    pub fn submit(&mut self, colors: &[Rgb12], now: Instant) -> Result<SubmitOutcome, BulbError> {
        self.poll(now);
        if self.pending.is_some() {
            #[cfg(feature = "esp32-log")]
            println!("[BulbWorker.submit] busy, dropping update");
            return Ok(SubmitOutcome::DroppedBusy);
        }

        let payload = BulbPayload::from_colors(colors, &self.config);
        self.transport.put(&payload)?;
        self.pending = Some(now);
        Ok(SubmitOutcome::Sent(payload))
    }

    /// The bulb answered the outstanding request
    pub fn complete(&mut self) {
        self.pending = None;
    }

    /// Expire an outstanding request older than the response timeout.
    ///
    /// Returns `true` if a request was expired.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(started) = self.pending else {
            return false;
        };
        if now.as_millis() < started.as_millis() + self.config.response_timeout.as_millis() {
            return false;
        }
        #[cfg(feature = "esp32-log")]
        println!("[BulbWorker.poll] no reply within timeout");
        self.pending = None;
        true
    }
}
