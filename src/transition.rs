//! Per-LED color transitions in Lab space
//!
//! Every LED walks from its current color to its target in a fixed number of
//! ticks. Steps are computed once per new target, from wherever the LED is at
//! that moment, so a retarget in the middle of a fade redirects it instead of
//! restarting it.

use heapless::Vec;

use crate::color::{Lab, Rgb12, SRGB12, Xyz, lab_to_xyz};

/// Number of ticks a transition takes by default
pub const DEFAULT_TRANSITION_TICKS: u8 = 15;

/// Transition state of a single LED
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedTransition {
    /// Current interpolated color
    current: Lab,
    /// Color being approached
    target: Lab,
    /// Per-axis step magnitude, never negative
    step: Lab,
    /// Requested color, reported verbatim once the transition ends
    target_rgb: Rgb12,
    /// Ticks left before the target is reached
    remaining: u8,
    xyz: Xyz,
    output: Rgb12,
}

impl LedTransition {
    /// Create a LED resting at `color`
    pub fn settled(color: Rgb12) -> Self {
        let lab = SRGB12.rgb_to_lab(color);
        Self {
            current: lab,
            target: lab,
            step: Lab::default(),
            target_rgb: color,
            remaining: 0,
            xyz: SRGB12.rgb_to_xyz(color),
            output: color,
        }
    }

    pub const fn current(&self) -> Lab {
        self.current
    }

    pub const fn target(&self) -> Lab {
        self.target
    }

    pub const fn step(&self) -> Lab {
        self.step
    }

    pub const fn xyz(&self) -> Xyz {
        self.xyz
    }

    /// Color produced by the last tick
    pub const fn output(&self) -> Rgb12 {
        self.output
    }

    pub const fn is_transitioning(&self) -> bool {
        self.remaining > 0
    }

    /// Aim at a new color.
    ///
    /// Returns `false` and leaves the LED untouched when `color` is already
    /// the target.
    pub fn retarget(&mut self, color: Rgb12, ticks: u8) -> bool {
        if color == self.target_rgb {
            return false;
        }
        let ticks = ticks.max(1);
        let target = SRGB12.rgb_to_lab(color);
        let divisor = f64::from(ticks);
        self.step = Lab {
            l: libm::fabs(target.l - self.current.l) / divisor,
            a: libm::fabs(target.a - self.current.a) / divisor,
            b: libm::fabs(target.b - self.current.b) / divisor,
        };
        self.target = target;
        self.target_rgb = color;
        self.remaining = ticks;
        true
    }

    /// Advance one step toward the target
    pub fn tick(&mut self) {
        if self.remaining == 0 {
            return;
        }
        self.remaining -= 1;

        if self.remaining == 0 {
            self.current = self.target;
            self.xyz = lab_to_xyz(self.target);
            self.output = self.target_rgb;
            return;
        }

        self.current = Lab {
            l: approach(self.current.l, self.target.l, self.step.l),
            a: approach(self.current.a, self.target.a, self.step.a),
            b: approach(self.current.b, self.target.b, self.step.b),
        };
        self.xyz = lab_to_xyz(self.current);
        self.output = SRGB12.xyz_to_rgb(self.xyz);
    }
}

/// Move `from` toward `to` by `step`, stopping on `to` instead of crossing it
fn approach(from: f64, to: f64, step: f64) -> f64 {
    if from < to {
        (from + step).min(to)
    } else {
        (from - step).max(to)
    }
}

/// Transition engine for up to `MAX_LEDS` LEDs driven by one clock
#[derive(Debug, Clone)]
pub struct TransitionEngine<const MAX_LEDS: usize> {
    leds: Vec<LedTransition, MAX_LEDS>,
    ticks: u8,
}

impl<const MAX_LEDS: usize> TransitionEngine<MAX_LEDS> {
    /// Create an empty engine whose transitions take `ticks` ticks
    pub const fn new(ticks: u8) -> Self {
        Self {
            leds: Vec::new(),
            ticks,
        }
    }

    pub fn len(&self) -> usize {
        self.leds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leds.is_empty()
    }

    pub const fn ticks(&self) -> u8 {
        self.ticks
    }

    /// Change the transition length; applies to targets set afterwards
    pub fn set_ticks(&mut self, ticks: u8) {
        self.ticks = ticks;
    }

    pub fn leds(&self) -> &[LedTransition] {
        &self.leds
    }

    /// Check if any LED is still moving
    pub fn is_transitioning(&self) -> bool {
        self.leds.iter().any(LedTransition::is_transitioning)
    }

    /// Colors produced by the last tick
    pub fn outputs(&self) -> impl Iterator<Item = Rgb12> + '_ {
        self.leds.iter().map(LedTransition::output)
    }

    /// Put every LED at rest on the given colors.
    ///
    /// Colors beyond `MAX_LEDS` are ignored. Returns the number of LEDs kept.
    pub fn initialize(&mut self, colors: &[Rgb12]) -> usize {
        self.leds.clear();
        for color in colors.iter().take(MAX_LEDS) {
            let _ = self.leds.push(LedTransition::settled(*color));
        }
        self.leds.len()
    }

    /// Change the number of LEDs.
    ///
    /// Every kept LED restarts at rest on its last output so a resize does not
    /// flash; added LEDs start dark.
    pub fn resize(&mut self, count: usize) {
        let count = count.min(MAX_LEDS);
        let mut resized = Vec::new();
        for index in 0..count {
            let color = self
                .leds
                .get(index)
                .map_or(Rgb12::default(), LedTransition::output);
            let _ = resized.push(LedTransition::settled(color));
        }
        self.leds = resized;
    }

    /// Set new target colors, resizing first if the count changed.
    ///
    /// Returns the number of LEDs whose target actually changed.
    pub fn set_target(&mut self, colors: &[Rgb12]) -> usize {
        if colors.len().min(MAX_LEDS) != self.leds.len() {
            self.resize(colors.len());
        }
        let mut changed = 0;
        for (led, color) in self.leds.iter_mut().zip(colors) {
            if led.retarget(*color, self.ticks) {
                changed += 1;
            }
        }
        changed
    }

    /// Advance every LED by one step
    pub fn tick(&mut self) {
        for led in &mut self.leds {
            led.tick();
        }
    }
}
