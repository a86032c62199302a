//! sRGB, CIE XYZ and CIE Lab conversions
//!
//! Every conversion uses the D65 reference white (2° observer) and one sRGB
//! primary matrix pair, whatever the channel domain. The domain only selects
//! the integer scale the RGB side is expressed in.

use super::Rgb12;

/// sRGB companding knee on the encoded side
const SRGB_ENCODED_KNEE: f64 = 0.040_45;
/// sRGB companding knee on the linear side
const SRGB_LINEAR_KNEE: f64 = 0.003_130_8;
const SRGB_GAMMA: f64 = 2.4;

const LAB_EPSILON: f64 = 0.008_856;
const LAB_SLOPE: f64 = 7.787;
const LAB_OFFSET: f64 = 16.0 / 116.0;

/// Linear sRGB to XYZ, D65
const RGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.412_456_4, 0.357_576_1, 0.180_437_5],
    [0.212_672_9, 0.715_152_2, 0.072_175_0],
    [0.019_333_9, 0.119_192_0, 0.950_304_1],
];

/// Inverse of [`RGB_TO_XYZ`]
const XYZ_TO_RGB: [[f64; 3]; 3] = [
    [3.240_454_2, -1.537_138_5, -0.498_531_4],
    [-0.969_266_0, 1.876_010_8, 0.041_556_0],
    [0.055_643_4, -0.204_025_9, 1.057_225_2],
];

/// CIE XYZ tristimulus values on the 0-100 scale
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// D65 reference white
pub const D65_WHITE: Xyz = Xyz {
    x: 95.047,
    y: 100.0,
    z: 108.883,
};

impl Xyz {
    /// CIE xy chromaticity, `(0, 0)` for black
    pub fn chromaticity(self) -> (f64, f64) {
        let sum = self.x + self.y + self.z;
        if sum <= 0.0 {
            return (0.0, 0.0);
        }
        (self.x / sum, self.y / sum)
    }
}

/// Full precision CIE Lab
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// Rounded, range-clamped CIE Lab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabInt {
    pub l: u8,
    pub a: i8,
    pub b: i8,
}

impl Lab {
    /// Round every axis, clamping L to 0..=100 and a/b to -128..=127
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rounded(self) -> LabInt {
        LabInt {
            l: libm::round(self.l).clamp(0.0, 100.0) as u8,
            a: libm::round(self.a).clamp(-128.0, 127.0) as i8,
            b: libm::round(self.b).clamp(-128.0, 127.0) as i8,
        }
    }
}

impl LabInt {
    pub fn to_lab(self) -> Lab {
        Lab {
            l: f64::from(self.l),
            a: f64::from(self.a),
            b: f64::from(self.b),
        }
    }
}

/// Integer scale of the RGB side of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelDomain {
    /// 0-255 per channel
    Bits8,
    /// 0-4095 per channel
    Bits12,
}

impl ChannelDomain {
    pub const fn max(self) -> u16 {
        match self {
            Self::Bits8 => 255,
            Self::Bits12 => 4095,
        }
    }
}

/// sRGB color space bound to a channel domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSpace {
    domain: ChannelDomain,
}

/// sRGB with 8-bit channels
pub const SRGB8: ColorSpace = ColorSpace::new(ChannelDomain::Bits8);

/// sRGB with 12-bit channels
pub const SRGB12: ColorSpace = ColorSpace::new(ChannelDomain::Bits12);

impl ColorSpace {
    pub const fn new(domain: ChannelDomain) -> Self {
        Self { domain }
    }

    pub const fn domain(self) -> ChannelDomain {
        self.domain
    }

    /// Convert domain-scaled RGB to XYZ
    pub fn rgb_to_xyz(self, rgb: Rgb12) -> Xyz {
        let linear = [
            self.decode(rgb.r) * 100.0,
            self.decode(rgb.g) * 100.0,
            self.decode(rgb.b) * 100.0,
        ];
        let [x, y, z] = multiply(&RGB_TO_XYZ, linear);
        Xyz { x, y, z }
    }

    /// Convert XYZ to domain-scaled RGB, rounding to the nearest integer
    pub fn xyz_to_rgb(self, xyz: Xyz) -> Rgb12 {
        let [r, g, b] = multiply(&XYZ_TO_RGB, [xyz.x / 100.0, xyz.y / 100.0, xyz.z / 100.0]);
        Rgb12 {
            r: self.encode(r),
            g: self.encode(g),
            b: self.encode(b),
        }
    }

    pub fn rgb_to_lab(self, rgb: Rgb12) -> Lab {
        xyz_to_lab(self.rgb_to_xyz(rgb))
    }

    pub fn lab_to_rgb(self, lab: Lab) -> Rgb12 {
        self.xyz_to_rgb(lab_to_xyz(lab))
    }

    pub fn rgb_to_lab_int(self, rgb: Rgb12) -> LabInt {
        self.rgb_to_lab(rgb).rounded()
    }

    pub fn lab_int_to_rgb(self, lab: LabInt) -> Rgb12 {
        self.lab_to_rgb(lab.to_lab())
    }

    /// Inverse sRGB companding of one channel to linear light (0.0-1.0)
    fn decode(self, channel: u16) -> f64 {
        let max = self.domain.max();
        let value = f64::from(channel.min(max)) / f64::from(max);
        if value > SRGB_ENCODED_KNEE {
            libm::pow((value + 0.055) / 1.055, SRGB_GAMMA)
        } else {
            value / 12.92
        }
    }

    /// Forward sRGB companding of one linear channel to the domain scale
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn encode(self, linear: f64) -> u16 {
        // negative linear values come from out-of-gamut colors and matrix rounding
        let linear = linear.max(0.0);
        let companded = if linear > SRGB_LINEAR_KNEE {
            1.055 * libm::pow(linear, 1.0 / SRGB_GAMMA) - 0.055
        } else {
            12.92 * linear
        };
        let max = f64::from(self.domain.max());
        libm::round(companded.min(1.0) * max) as u16
    }
}

/// Convert XYZ to Lab relative to [`D65_WHITE`]
pub fn xyz_to_lab(xyz: Xyz) -> Lab {
    let x = lab_compress(xyz.x / D65_WHITE.x);
    let y = lab_compress(xyz.y / D65_WHITE.y);
    let z = lab_compress(xyz.z / D65_WHITE.z);
    Lab {
        l: 116.0 * y - 16.0,
        a: 500.0 * (x - y),
        b: 200.0 * (y - z),
    }
}

/// Convert Lab back to XYZ relative to [`D65_WHITE`]
pub fn lab_to_xyz(lab: Lab) -> Xyz {
    let y = (lab.l + 16.0) / 116.0;
    let x = lab.a / 500.0 + y;
    let z = y - lab.b / 200.0;
    Xyz {
        x: lab_expand(x) * D65_WHITE.x,
        y: lab_expand(y) * D65_WHITE.y,
        z: lab_expand(z) * D65_WHITE.z,
    }
}

fn lab_compress(t: f64) -> f64 {
    if t > LAB_EPSILON {
        libm::cbrt(t)
    } else {
        LAB_SLOPE * t + LAB_OFFSET
    }
}

/// Inverse of [`lab_compress`]; the branch is chosen on the cubed value
fn lab_expand(t: f64) -> f64 {
    let cubed = t * t * t;
    if cubed > LAB_EPSILON {
        cubed
    } else {
        (t - LAB_OFFSET) / LAB_SLOPE
    }
}

fn multiply(matrix: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    let row = |m: &[f64; 3]| m[0] * v[0] + m[1] * v[1] + m[2] * v[2];
    [row(&matrix[0]), row(&matrix[1]), row(&matrix[2])]
}
