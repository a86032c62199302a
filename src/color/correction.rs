//! Channel corrections and HSV-style helpers
//!
//! Corrections work on the 12-bit canonical precision. The HSV helpers work
//! on 8-bit colors, where value is the largest channel and chroma the spread
//! between the largest and smallest.

use super::{MAX_12, Rgb, Rgb12};

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u16(value: f64, max: u16) -> u16 {
    libm::round(value).clamp(0.0, f64::from(max)) as u16
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(value: f64) -> u8 {
    libm::round(value).clamp(0.0, 255.0) as u8
}

fn map12(color: Rgb12, f: impl Fn(u16) -> u16) -> Rgb12 {
    Rgb12 {
        r: f(color.r),
        g: f(color.g),
        b: f(color.b),
    }
}

/// Raise each normalized channel to `gamma`
pub fn gamma_correction(gamma: f64, color: Rgb12) -> Rgb12 {
    let max = f64::from(MAX_12);
    map12(color, |c| {
        let normalized = f64::from(c.min(MAX_12)) / max;
        to_u16(max * libm::pow(normalized, gamma), MAX_12)
    })
}

/// Scale every channel by `percent` (0-100)
pub fn brightness_correction(percent: u8, color: Rgb12) -> Rgb12 {
    let factor = f64::from(percent.min(100)) / 100.0;
    map12(color, |c| to_u16(f64::from(c) * factor, MAX_12))
}

/// Clamp every channel to `ceiling`
pub fn max_correction(ceiling: u16, color: Rgb12) -> Rgb12 {
    map12(color, |c| c.min(ceiling))
}

/// Per-channel integer mean, black for an empty slice
#[allow(clippy::cast_possible_truncation)]
pub fn average_color(colors: &[Rgb12]) -> Rgb12 {
    if colors.is_empty() {
        return Rgb12::default();
    }
    let (r, g, b) = colors.iter().fold((0u64, 0u64, 0u64), |(r, g, b), c| {
        (r + u64::from(c.r), g + u64::from(c.g), b + u64::from(c.b))
    });
    let n = colors.len() as u64;
    Rgb12 {
        r: (r / n) as u16,
        g: (g / n) as u16,
        b: (b / n) as u16,
    }
}

pub fn max_channel(color: Rgb) -> u8 {
    color.r.max(color.g).max(color.b)
}

pub fn min_channel(color: Rgb) -> u8 {
    color.r.min(color.g).min(color.b)
}

/// HSV value
pub fn value(color: Rgb) -> u8 {
    max_channel(color)
}

/// HSV chroma
pub fn chroma(color: Rgb) -> u8 {
    max_channel(color) - min_channel(color)
}

/// Rescale all channels proportionally so the value becomes `target`.
///
/// A black input has no hue to keep and becomes a gray of the requested value.
pub fn with_value(color: Rgb, target: u8) -> Rgb {
    let current = value(color);
    if current == 0 {
        return Rgb {
            r: target,
            g: target,
            b: target,
        };
    }
    let m = f64::from(target) / f64::from(current);
    Rgb {
        r: to_u8(f64::from(color.r) * m),
        g: to_u8(f64::from(color.g) * m),
        b: to_u8(f64::from(color.b) * m),
    }
}

/// Move channels toward (or away from) the largest one so the chroma becomes `target`
pub fn with_chroma(color: Rgb, target: i16) -> Rgb {
    let current = chroma(color);
    if current == 0 {
        return color;
    }
    let target = target.max(0);
    let max = max_channel(color);
    if target == 0 {
        return Rgb {
            r: max,
            g: max,
            b: max,
        };
    }

    let m = 1.0 - f64::from(target) / f64::from(current);
    let shift = |c: u8| to_u8(f64::from(c) + f64::from(max - c) * m);
    Rgb {
        r: shift(color.r),
        g: shift(color.g),
        b: shift(color.b),
    }
}
