//! Driver configuration
//!
//! Passed by value at construction; nothing is looked up globally.

use embassy_time::Duration;

use crate::filter::FilterConfig;
use crate::frame::{ChannelOrder, DEFAULT_MAX_LEDS};
use crate::transition::DEFAULT_TRANSITION_TICKS;

/// Default serial speed
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default time between two ticks
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(20);

/// Largest LED count the header can announce
const HEADER_MAX_LEDS: usize = u16::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroTransitionTicks,
    ZeroTickInterval,
    ZeroBaudRate,
    ZeroMaxLeds,
    /// More LEDs than the frame header can announce
    MaxLedsTooLarge(usize),
}

/// Configuration for the Adalight driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverConfig {
    pub channel_order: ChannelOrder,
    pub baud_rate: u32,
    /// Time between two intermediate colors
    pub tick_interval: Duration,
    /// Number of intermediate colors per transition
    pub transition_ticks: u8,
    /// Most LEDs the controller accepts; extra colors are dropped
    pub max_leds: usize,
    pub filters: FilterConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            channel_order: ChannelOrder::Rgb,
            baud_rate: DEFAULT_BAUD_RATE,
            tick_interval: DEFAULT_TICK_INTERVAL,
            transition_ticks: DEFAULT_TRANSITION_TICKS,
            max_leds: DEFAULT_MAX_LEDS,
            filters: FilterConfig::default(),
        }
    }
}

impl DriverConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transition_ticks == 0 {
            return Err(ConfigError::ZeroTransitionTicks);
        }
        if self.tick_interval.as_millis() == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::ZeroBaudRate);
        }
        if self.max_leds == 0 {
            return Err(ConfigError::ZeroMaxLeds);
        }
        if self.max_leds > HEADER_MAX_LEDS {
            return Err(ConfigError::MaxLedsTooLarge(self.max_leds));
        }
        Ok(())
    }

    /// Set the channel order from its name, falling back to RGB
    #[must_use]
    pub fn with_channel_order_str(mut self, name: &str) -> Self {
        self.channel_order = ChannelOrder::parse_from_str(name).unwrap_or_default();
        self
    }
}
