//! Gamma correction filter

use super::Filter;
use crate::color::{Rgb12, gamma_correction};

/// Raises every normalized channel to a fixed exponent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaFilter {
    gamma: f64,
}

impl GammaFilter {
    pub const fn new(gamma: f64) -> Self {
        Self { gamma }
    }

    pub const fn gamma(self) -> f64 {
        self.gamma
    }
}

impl Filter for GammaFilter {
    fn apply(&self, frame: &mut [Rgb12]) {
        for pixel in frame.iter_mut() {
            *pixel = gamma_correction(self.gamma, *pixel);
        }
    }

    #[allow(clippy::float_cmp)]
    fn is_active(&self) -> bool {
        self.gamma != 1.0
    }
}
