mod correction;
mod space;

pub use correction::{
    average_color, brightness_correction, chroma, gamma_correction, max_channel,
    max_correction, min_channel, value, with_chroma, with_value,
};
pub use space::{
    ChannelDomain, ColorSpace, D65_WHITE, Lab, LabInt, SRGB8, SRGB12, Xyz, lab_to_xyz,
    xyz_to_lab,
};
use smart_leds::{RGB, RGB8};

/// 8-bit color, as supplied by callers and sent on the wire
pub type Rgb = RGB8;

/// 12-bit color (0-4095 per channel), the canonical internal precision
pub type Rgb12 = RGB<u16>;

/// Maximum value of a 12-bit channel
pub const MAX_12: u16 = 4095;

/// Widen an 8-bit channel to 12 bits.
///
/// Rounds `v * 4095 / 255`, so `expand_channel(v) >> 4 == v` for every `v`.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn expand_channel(value: u8) -> u16 {
    ((value as u32 * MAX_12 as u32 + 127) / 255) as u16
}

/// Narrow a 12-bit channel to the 8-bit wire representation
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn quantize_channel(value: u16) -> u8 {
    let value = if value > MAX_12 { MAX_12 } else { value };
    (value >> 4) as u8
}

/// Widen an 8-bit color to the canonical 12-bit precision
#[inline]
pub const fn expand(color: Rgb) -> Rgb12 {
    Rgb12 {
        r: expand_channel(color.r),
        g: expand_channel(color.g),
        b: expand_channel(color.b),
    }
}

/// Narrow a 12-bit color to 8 bits per channel
#[inline]
pub const fn quantize(color: Rgb12) -> Rgb {
    Rgb {
        r: quantize_channel(color.r),
        g: quantize_channel(color.g),
        b: quantize_channel(color.b),
    }
}
