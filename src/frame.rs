//! Adalight wire frames
//!
//! A frame is a six byte header followed by three bytes per LED:
//!
//! ```text
//! 'A' 'd' 'a' count_hi count_lo checksum  [c0 c1 c2] * N
//! ```
//!
//! where `count_hi`/`count_lo` split `N - 1` and `checksum` is
//! `count_hi ^ count_lo ^ 0x55`. Channel bytes are the 12-bit colors shifted
//! down to 8 bits, emitted in the configured channel order.

use heapless::Vec;

use crate::color::{Rgb, Rgb12, quantize};

/// Protocol magic
pub const MAGIC: [u8; 3] = *b"Ada";

/// Header length in bytes
pub const HEADER_LEN: usize = 6;

/// Bytes per LED
pub const BYTES_PER_LED: usize = 3;

/// Most LEDs an Adalight controller accepts
pub const DEFAULT_MAX_LEDS: usize = 500;

/// Bits on the wire per byte with 8N1 framing
const SERIAL_BITS_PER_BYTE: f64 = 10.0;

/// Length of a frame carrying `leds` LEDs
pub const fn frame_len(leds: usize) -> usize {
    HEADER_LEN + BYTES_PER_LED * leds
}

/// Highest frame rate a link of `baud_rate` sustains for `leds` LEDs
#[allow(clippy::cast_precision_loss)]
pub fn theoretical_max_frame_rate(leds: usize, baud_rate: u32) -> f64 {
    f64::from(baud_rate) / (SERIAL_BITS_PER_BYTE * frame_len(leds) as f64)
}

/// Lowest baud rate that sustains `frame_rate` frames per second for `leds` LEDs
#[allow(clippy::cast_precision_loss)]
pub fn theoretical_min_baud_rate(leds: usize, frame_rate: f64) -> f64 {
    frame_rate * SERIAL_BITS_PER_BYTE * frame_len(leds) as f64
}

const CHANNEL_ORDER_RGB: &str = "RGB";
const CHANNEL_ORDER_RBG: &str = "RBG";
const CHANNEL_ORDER_BRG: &str = "BRG";
const CHANNEL_ORDER_BGR: &str = "BGR";
const CHANNEL_ORDER_GRB: &str = "GRB";
const CHANNEL_ORDER_GBR: &str = "GBR";

/// Wire order of the three color channels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum ChannelOrder {
    #[default]
    Rgb = 0,
    Rbg = 1,
    Brg = 2,
    Bgr = 3,
    Grb = 4,
    Gbr = 5,
}

impl ChannelOrder {
    pub const ALL: [Self; 6] = [
        Self::Rgb,
        Self::Rbg,
        Self::Brg,
        Self::Bgr,
        Self::Grb,
        Self::Gbr,
    ];

    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Rgb,
            1 => Self::Rbg,
            2 => Self::Brg,
            3 => Self::Bgr,
            4 => Self::Grb,
            5 => Self::Gbr,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rgb => CHANNEL_ORDER_RGB,
            Self::Rbg => CHANNEL_ORDER_RBG,
            Self::Brg => CHANNEL_ORDER_BRG,
            Self::Bgr => CHANNEL_ORDER_BGR,
            Self::Grb => CHANNEL_ORDER_GRB,
            Self::Gbr => CHANNEL_ORDER_GBR,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            CHANNEL_ORDER_RGB => Some(Self::Rgb),
            CHANNEL_ORDER_RBG => Some(Self::Rbg),
            CHANNEL_ORDER_BRG => Some(Self::Brg),
            CHANNEL_ORDER_BGR => Some(Self::Bgr),
            CHANNEL_ORDER_GRB => Some(Self::Grb),
            CHANNEL_ORDER_GBR => Some(Self::Gbr),
            _ => None,
        }
    }

    /// Arrange the channels of `color` in wire order
    pub const fn arrange(self, color: Rgb) -> [u8; 3] {
        let Rgb { r, g, b } = color;
        match self {
            Self::Rgb => [r, g, b],
            Self::Rbg => [r, b, g],
            Self::Brg => [b, r, g],
            Self::Bgr => [b, g, r],
            Self::Grb => [g, r, b],
            Self::Gbr => [g, b, r],
        }
    }
}

/// Adalight frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader([u8; HEADER_LEN]);

impl FrameHeader {
    /// Build the header announcing `leds` LEDs
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(leds: u16) -> Self {
        let last = leds.wrapping_sub(1);
        let hi = ((last >> 8) & 0xFF) as u8;
        let lo = (last & 0xFF) as u8;
        Self([MAGIC[0], MAGIC[1], MAGIC[2], hi, lo, hi ^ lo ^ 0x55])
    }

    pub const fn as_bytes(&self) -> &[u8; HEADER_LEN] {
        &self.0
    }

    pub const fn count_hi(&self) -> u8 {
        self.0[3]
    }

    pub const fn count_lo(&self) -> u8 {
        self.0[4]
    }

    pub const fn checksum(&self) -> u8 {
        self.0[5]
    }
}

/// Encoded frame with room for `CAP` bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<const CAP: usize> {
    bytes: Vec<u8, CAP>,
}

impl<const CAP: usize> Frame<CAP> {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of LEDs carried by the payload
    pub fn led_count(&self) -> usize {
        self.bytes.len().saturating_sub(HEADER_LEN) / BYTES_PER_LED
    }

    /// Channel bytes of the LED at `index`
    pub fn led(&self, index: usize) -> Option<[u8; 3]> {
        let start = HEADER_LEN + index * BYTES_PER_LED;
        let chunk = self.bytes.get(start..start + BYTES_PER_LED)?;
        Some([chunk[0], chunk[1], chunk[2]])
    }
}

/// LED count reduced to what the controller or buffer accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    pub requested: usize,
    pub emitted: usize,
}

/// Result of a successful encode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded<const CAP: usize> {
    pub frame: Frame<CAP>,
    /// Set when some LEDs were left out; the frame is still valid
    pub truncated: Option<Truncation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// There is nothing to send
    NoLeds,
    /// The frame buffer cannot hold even the header and one LED
    CapacityTooSmall,
}

/// Builds Adalight frames; pure and free of I/O
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameEncoder {
    order: ChannelOrder,
    max_leds: usize,
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self::new(ChannelOrder::default(), DEFAULT_MAX_LEDS)
    }
}

impl FrameEncoder {
    pub const fn new(order: ChannelOrder, max_leds: usize) -> Self {
        Self { order, max_leds }
    }

    pub const fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn set_order(&mut self, order: ChannelOrder) {
        self.order = order;
    }

    pub const fn max_leds(&self) -> usize {
        self.max_leds
    }

    /// Encode `colors` into a frame
    pub fn encode<const CAP: usize>(&self, colors: &[Rgb12]) -> Result<Encoded<CAP>, EncodeError> {
        let order = self.order;
        self.build(colors.len(), colors.iter().map(|c| order.arrange(quantize(*c))))
    }

    /// Encode a frame switching `leds` LEDs off
    pub fn encode_off<const CAP: usize>(&self, leds: usize) -> Result<Encoded<CAP>, EncodeError> {
        self.build(leds, core::iter::repeat([0u8; 3]))
    }

    fn build<const CAP: usize>(
        &self,
        requested: usize,
        leds: impl Iterator<Item = [u8; 3]>,
    ) -> Result<Encoded<CAP>, EncodeError> {
        if requested == 0 {
            return Err(EncodeError::NoLeds);
        }
        let fits = CAP.saturating_sub(HEADER_LEN) / BYTES_PER_LED;
        if fits == 0 {
            return Err(EncodeError::CapacityTooSmall);
        }
        let limit = self.max_leds.min(fits).min(usize::from(u16::MAX));
        if limit == 0 {
            return Err(EncodeError::NoLeds);
        }
        let emitted = requested.min(limit);

        #[allow(clippy::cast_possible_truncation)]
        let header = FrameHeader::new(emitted as u16);
        let mut bytes: Vec<u8, CAP> = Vec::new();
        bytes
            .extend_from_slice(header.as_bytes())
            .map_err(|()| EncodeError::CapacityTooSmall)?;
        for channels in leds.take(emitted) {
            bytes
                .extend_from_slice(&channels)
                .map_err(|()| EncodeError::CapacityTooSmall)?;
        }

        let truncated = (emitted < requested).then_some(Truncation { requested, emitted });
        Ok(Encoded {
            frame: Frame { bytes },
            truncated,
        })
    }
}
