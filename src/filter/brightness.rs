//! Brightness scaling and channel ceiling
//!
//! Both work on the 12-bit scale, after gamma correction.

use super::Filter;
use crate::color::{MAX_12, Rgb12, brightness_correction, max_correction};

/// Scales every channel by a percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessFilter {
    /// Brightness in percent (0-100)
    percent: u8,
}

impl BrightnessFilter {
    pub const fn new(percent: u8) -> Self {
        let percent = if percent > 100 { 100 } else { percent };
        Self { percent }
    }

    pub const fn percent(self) -> u8 {
        self.percent
    }
}

impl Filter for BrightnessFilter {
    fn apply(&self, frame: &mut [Rgb12]) {
        if self.percent == 0 {
            frame.fill(Rgb12::default());
            return;
        }
        for pixel in frame.iter_mut() {
            *pixel = brightness_correction(self.percent, *pixel);
        }
    }

    fn is_active(&self) -> bool {
        self.percent != 100
    }
}

/// Caps every channel at a ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CeilingFilter {
    max: u16,
}

impl CeilingFilter {
    pub const fn new(max: u16) -> Self {
        Self { max }
    }

    pub const fn max(self) -> u16 {
        self.max
    }
}

impl Filter for CeilingFilter {
    fn apply(&self, frame: &mut [Rgb12]) {
        for pixel in frame.iter_mut() {
            *pixel = max_correction(self.max, *pixel);
        }
    }

    fn is_active(&self) -> bool {
        self.max < MAX_12
    }
}
