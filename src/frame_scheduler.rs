//! Frame scheduling and the Adalight tick loop.
//!
//! One tick advances every LED transition, applies the output filters,
//! encodes a frame in memory and writes it in a single call. The caller owns
//! the clock: it calls [`FrameScheduler::tick`] and sleeps for the returned
//! duration. A slow write delays the next tick; it never corrupts state.

use embassy_time::{Duration, Instant};
use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::channel::{Channel, Receiver, Sender};
use crate::color::{Rgb, Rgb12, expand};
use crate::config::DriverConfig;
use crate::device::{DeviceError, DeviceWriter, SerialLink};
use crate::filter::{FilterConfig, OutputFilters};
use crate::frame::{BYTES_PER_LED, ChannelOrder, EncodeError, FrameEncoder, HEADER_LEN};
use crate::transition::TransitionEngine;

/// Reported by [`FrameScheduler::request_firmware_version`]
pub const FIRMWARE_VERSION: &str = "unknown (adalight device)";

/// Notifications published by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverEvent {
    /// The serial port open attempt finished
    OpenCompleted(bool),
    /// A one-shot command finished
    CommandCompleted(bool),
    /// Firmware version of the controller
    FirmwareVersion(&'static str),
    /// More colors were supplied than the controller accepts
    LedCountClamped { requested: usize, max: usize },
}

/// Type alias for the event channel
pub type EventChannel<const SIZE: usize> = Channel<DriverEvent, SIZE>;

/// Type alias for event sender
pub type EventSender<'a, const SIZE: usize> = Sender<'a, DriverEvent, SIZE>;

/// Type alias for event receiver
pub type EventReceiver<'a, const SIZE: usize> = Receiver<'a, DriverEvent, SIZE>;

/// Outcome of sending one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// No LEDs configured yet, nothing was sent
    Idle,
    /// The whole frame was written
    Written,
    /// The frame could not be built
    EncodeFailed(EncodeError),
    /// The device refused the frame; the next tick sends a fresh one
    WriteFailed(DeviceError),
}

impl TickStatus {
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Idle | Self::Written)
    }
}

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// What happened to this frame.
    pub status: TickStatus,
}

/// Adalight driver paced by the caller's clock.
///
/// * `MAX_LEDS` - LED state capacity
/// * `FRAME_CAP` - frame buffer size, see [`crate::frame::frame_len`]
/// * `EVENTS` - size of the event channel
///
/// # Usage
///
/// ```ignore
/// let mut driver: FrameScheduler<_, 256, { frame_len(256) }, 8> =
///     FrameScheduler::new(port, &DriverConfig::default());
/// driver.open()?;
/// driver.set_colors(&colors);
///
/// loop {
///     let result = driver.tick(Instant::from_millis(now_ms()));
///     sleep_ms(result.sleep_duration.as_millis());
/// }
/// ```
pub struct FrameScheduler<
    'a,
    W: DeviceWriter,
    const MAX_LEDS: usize,
    const FRAME_CAP: usize,
    const EVENTS: usize,
> {
    link: SerialLink<W>,
    engine: TransitionEngine<MAX_LEDS>,
    filters: OutputFilters,
    encoder: FrameEncoder,
    events: Option<EventSender<'a, EVENTS>>,
    max_leds: usize,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<'a, W: DeviceWriter, const MAX_LEDS: usize, const FRAME_CAP: usize, const EVENTS: usize>
    FrameScheduler<'a, W, MAX_LEDS, FRAME_CAP, EVENTS>
{
    /// Create a driver around `writer`. The port stays closed until [`Self::open`].
    pub fn new(writer: W, config: &DriverConfig) -> Self {
        let frame_fits = FRAME_CAP.saturating_sub(HEADER_LEN) / BYTES_PER_LED;
        Self {
            link: SerialLink::new(writer, config.baud_rate),
            engine: TransitionEngine::new(config.transition_ticks),
            filters: OutputFilters::new(&config.filters),
            encoder: FrameEncoder::new(config.channel_order, config.max_leds),
            events: None,
            max_leds: config.max_leds.min(MAX_LEDS).min(frame_fits),
            next_frame: Instant::from_millis(0),
            frame_duration: config.tick_interval,
        }
    }

    /// Publish driver events to `events`
    #[must_use]
    pub fn with_events(mut self, events: EventSender<'a, EVENTS>) -> Self {
        self.events = Some(events);
        self
    }

    /// Most LEDs this driver sends
    pub const fn max_leds(&self) -> usize {
        self.max_leds
    }

    pub const fn engine(&self) -> &TransitionEngine<MAX_LEDS> {
        &self.engine
    }

    pub const fn link(&self) -> &SerialLink<W> {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut SerialLink<W> {
        &mut self.link
    }

    pub const fn channel_order(&self) -> ChannelOrder {
        self.encoder.order()
    }

    /// Open the serial port
    pub fn open(&mut self) -> Result<(), DeviceError> {
        let result = self.link.open();
        self.publish(DriverEvent::OpenCompleted(result.is_ok()));
        result
    }

    /// Close the serial port; safe to call repeatedly
    pub fn close(&mut self) {
        self.link.close();
    }

    /// Set target colors from 8-bit values
    pub fn set_colors(&mut self, colors: &[Rgb]) {
        let mut expanded: Vec<Rgb12, MAX_LEDS> = Vec::new();
        for color in colors.iter().take(self.max_leds) {
            let _ = expanded.push(expand(*color));
        }
        self.apply_colors(colors.len(), &expanded);
    }

    /// Set target colors at full 12-bit precision
    pub fn set_colors_12(&mut self, colors: &[Rgb12]) {
        let accepted = &colors[..colors.len().min(self.max_leds)];
        self.apply_colors(colors.len(), accepted);
    }

    fn apply_colors(&mut self, requested: usize, colors: &[Rgb12]) {
        if requested > self.max_leds {
            #[cfg(feature = "esp32-log")]
            println!(
                "[FrameScheduler.set_colors] {} LEDs requested, clamped to {}",
                requested, self.max_leds
            );
            self.publish(DriverEvent::LedCountClamped {
                requested,
                max: self.max_leds,
            });
        }

        if self.engine.is_empty() {
            self.engine.initialize(colors);
        } else {
            self.engine.set_target(colors);
        }
    }

    /// Change the wire channel order, effective from the next frame
    pub fn set_channel_order(&mut self, order: ChannelOrder) {
        self.encoder.set_order(order);
    }

    /// Change the channel order by name; unknown names select RGB
    pub fn set_channel_order_str(&mut self, name: &str) {
        self.set_channel_order(ChannelOrder::parse_from_str(name).unwrap_or_default());
    }

    /// Replace the output filters, effective from the next frame
    pub fn set_filters(&mut self, config: &FilterConfig) {
        self.filters = OutputFilters::new(config);
    }

    /// Change the transition length for targets set afterwards
    pub fn set_transition_ticks(&mut self, ticks: u8) {
        self.engine.set_ticks(ticks);
    }

    /// Report the controller firmware version.
    ///
    /// Adalight controllers cannot be queried, so this is a fixed string.
    pub fn request_firmware_version(&mut self) -> &'static str {
        self.publish(DriverEvent::FirmwareVersion(FIRMWARE_VERSION));
        self.publish(DriverEvent::CommandCompleted(true));
        FIRMWARE_VERSION
    }

    /// Turn every LED off immediately.
    ///
    /// The LEDs stay dark on later ticks; the next colors fade in from black.
    pub fn switch_off(&mut self) -> TickStatus {
        let count = self.engine.len();
        if count == 0 {
            self.publish(DriverEvent::CommandCompleted(true));
            return TickStatus::Idle;
        }

        let mut black: Vec<Rgb12, MAX_LEDS> = Vec::new();
        for _ in 0..count {
            let _ = black.push(Rgb12::default());
        }
        self.engine.initialize(&black);

        let status = match self.encoder.encode_off::<FRAME_CAP>(count) {
            Ok(encoded) => self.write(encoded.frame.as_bytes()),
            Err(err) => TickStatus::EncodeFailed(err),
        };
        self.publish(DriverEvent::CommandCompleted(status.is_ok()));
        status
    }

    /// Process one frame and return timing information.
    ///
    /// This method:
    /// 1. Applies drift correction if we've fallen too far behind
    /// 2. Advances transitions and writes the frame
    /// 3. Returns the deadline for the next frame
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        // Drift correction: if we've fallen too far behind, reset to now
        let max_drift_ms = self.frame_duration.as_millis() * 2;
        if now.as_millis() > self.next_frame.as_millis() + max_drift_ms {
            self.next_frame = now;
        }

        let status = self.render();

        self.next_frame += self.frame_duration;

        let sleep_duration = if self.next_frame.as_millis() > now.as_millis() {
            Duration::from_millis(self.next_frame.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            status,
        }
    }

    fn render(&mut self) -> TickStatus {
        if self.engine.is_empty() {
            return TickStatus::Idle;
        }
        self.engine.tick();

        let mut colors: Vec<Rgb12, MAX_LEDS> = Vec::new();
        for color in self.engine.outputs() {
            let _ = colors.push(color);
        }
        self.filters.apply(&mut colors);

        match self.encoder.encode::<FRAME_CAP>(&colors) {
            Ok(encoded) => self.write(encoded.frame.as_bytes()),
            Err(err) => TickStatus::EncodeFailed(err),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> TickStatus {
        match self.link.write(bytes) {
            Ok(()) => TickStatus::Written,
            Err(err) => TickStatus::WriteFailed(err),
        }
    }

    fn publish(&self, event: DriverEvent) {
        if let Some(events) = &self.events {
            let _ = events.publish(event);
        }
    }
}
