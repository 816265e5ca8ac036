use crate::error::{SceneError, SceneResult};
use serde::Deserialize;
use smallvec::{smallvec, SmallVec};

/// 8-bit RGB with a float alpha, matching CSS `rgba()`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const SILVER: Rgba = Rgba::rgb(204, 204, 204);
    pub const TRANSPARENT: Rgba = Rgba::rgba(0, 0, 0, 0.0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> SceneResult<Self> {
        let invalid = || SceneError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.is_ascii() {
            return Err(invalid());
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in digits.chars().enumerate() {
                    let v = c.to_digit(16).ok_or_else(invalid)? as u8;
                    out[i] = v * 17;
                }
                Ok(Self::rgb(out[0], out[1], out[2]))
            }
            6 => Ok(Self::rgb(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
            )),
            8 => Ok(Self::rgba(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
                byte(&digits[6..8])? as f32 / 255.0,
            )),
            _ => Err(invalid()),
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Component-wise blend, alpha included.
    pub fn mix(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: ch(self.r, other.r),
            g: ch(self.g, other.g),
            b: ch(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a.max(0.0))
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteName {
    #[default]
    Matrix,
    Azure,
    Aws,
    Security,
    Container,
}

/// Colour roles a scene draws with. Entities pick from `series`.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    pub background: Rgba,
    pub trail: Rgba,
    pub grid: Rgba,
    pub text: Rgba,
    pub muted: Rgba,
    pub primary: Rgba,
    pub secondary: Rgba,
    pub accent: Rgba,
    pub alert: Rgba,
    pub series: SmallVec<[Rgba; 6]>,
}

impl Palette {
    pub fn named(name: PaletteName) -> Self {
        let base = Palette {
            background: Rgba::rgb(10, 25, 47),
            trail: Rgba::rgba(10, 25, 47, 0.05),
            grid: Rgba::rgba(255, 255, 255, 0.05),
            text: Rgba::WHITE,
            muted: Rgba::rgba(255, 255, 255, 0.3),
            primary: Rgba::rgb(0, 255, 157),
            secondary: Rgba::rgb(0, 164, 239),
            accent: Rgba::rgb(255, 185, 0),
            alert: Rgba::rgba(255, 0, 0, 0.7),
            series: smallvec![Rgba::rgb(0, 255, 157), Rgba::rgb(0, 164, 239)],
        };
        match name {
            PaletteName::Matrix => base,
            PaletteName::Azure => Palette {
                primary: Rgba::rgb(0, 120, 212),
                secondary: Rgba::rgb(80, 230, 255),
                accent: Rgba::rgb(127, 186, 0),
                series: smallvec![
                    Rgba::rgb(0, 120, 212),
                    Rgba::rgb(0, 164, 239),
                    Rgba::rgb(255, 185, 0),
                    Rgba::rgb(242, 80, 34),
                    Rgba::rgb(127, 186, 0),
                ],
                ..base
            },
            PaletteName::Aws => Palette {
                primary: Rgba::rgb(255, 153, 0),
                secondary: Rgba::rgb(35, 47, 62),
                accent: Rgba::rgb(63, 173, 197),
                series: smallvec![
                    Rgba::rgb(255, 153, 0),
                    Rgba::rgb(63, 173, 197),
                    Rgba::rgb(23, 102, 131),
                ],
                ..base
            },
            PaletteName::Security => Palette {
                primary: Rgba::rgba(0, 255, 157, 0.3),
                secondary: Rgba::rgb(0, 164, 239),
                series: smallvec![Rgba::rgba(255, 0, 0, 0.7)],
                ..base
            },
            PaletteName::Container => Palette {
                primary: Rgba::rgb(36, 150, 237),
                secondary: Rgba::rgb(50, 108, 229),
                accent: Rgba::rgb(36, 150, 237),
                series: smallvec![Rgba::rgb(36, 150, 237), Rgba::rgb(50, 108, 229)],
                ..base
            },
        }
    }

    /// Replace the entity series with host-supplied hex colours.
    pub fn with_series(mut self, colors: &[String]) -> SceneResult<Self> {
        if colors.is_empty() {
            return Ok(self);
        }
        self.series = colors
            .iter()
            .map(|c| Rgba::from_hex(c))
            .collect::<SceneResult<_>>()?;
        Ok(self)
    }

    pub fn series_color(&self, index: usize) -> Rgba {
        if self.series.is_empty() {
            return self.primary;
        }
        self.series[index % self.series.len()]
    }
}
