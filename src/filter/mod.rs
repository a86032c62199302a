use crate::color::{MAX_12, Rgb12};

mod brightness;
mod gamma;

pub(crate) trait Filter {
    /// Apply the filter to a frame
    fn apply(&self, frame: &mut [Rgb12]);

    /// Check if the filter changes anything
    fn is_active(&self) -> bool {
        true
    }
}

pub use brightness::{BrightnessFilter, CeilingFilter};
pub use gamma::GammaFilter;

/// Output corrections applied to every frame before encoding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    /// Gamma exponent applied to normalized channels
    pub gamma: f64,
    /// Brightness in percent (0-100)
    pub brightness: u8,
    /// Per-channel ceiling on the 12-bit scale
    pub max: u16,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            gamma: 1.0,
            brightness: 100,
            max: MAX_12,
        }
    }
}

/// Filter processor - applies post-processing to frames
///
/// Processing order is gamma, then brightness, then the channel ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputFilters {
    pub gamma: GammaFilter,
    pub brightness: BrightnessFilter,
    pub ceiling: CeilingFilter,
}

impl OutputFilters {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            gamma: GammaFilter::new(config.gamma),
            brightness: BrightnessFilter::new(config.brightness),
            ceiling: CeilingFilter::new(config.max),
        }
    }

    /// Apply all filters to a frame
    pub fn apply(&self, frame: &mut [Rgb12]) {
        let filters: [&dyn Filter; 3] = [&self.gamma, &self.brightness, &self.ceiling];
        for filter in filters {
            if filter.is_active() {
                filter.apply(frame);
            }
        }
    }
}

impl Default for OutputFilters {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}
