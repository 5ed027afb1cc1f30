//! Unpremultiplied colors stored at API precision, with derived
//! premultiplied 16-bit shorts kept in lockstep for compositing.

/// An RGBA color, channels in `[0.0, 1.0]`.
///
/// Stored unpremultiplied as four doubles for API precision (so repeated
/// `set_source_rgba` round-trips don't lose bits), with the premultiplied
/// 16-bit shorts the compositor actually consumes recomputed on
/// construction. The invariant `alpha_short * c_short / 0xFFFF ==
/// premultiplied_short` holds by construction and is re-established on
/// every mutation rather than incrementally patched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    red: f64,
    green: f64,
    blue: f64,
    alpha: f64,
    shorts: PremultipliedShorts,
}

/// 16-bit premultiplied channels, the form the trapezoid compositor wants
///.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PremultipliedShorts {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub alpha: u16,
}

fn to_short(component: f64, alpha: f64) -> u16 {
    let premultiplied = (component.clamp(0.0, 1.0)) * alpha.clamp(0.0, 1.0);
    (premultiplied * 0xFFFF as f64 + 0.5) as u16
}

impl Color {
    pub const BLACK: Color = Color {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
        alpha: 1.0,
        shorts: PremultipliedShorts { red: 0, green: 0, blue: 0, alpha: 0xFFFF },
    };

    pub const TRANSPARENT: Color = Color {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
        alpha: 0.0,
        shorts: PremultipliedShorts { red: 0, green: 0, blue: 0, alpha: 0 },
    };

    pub fn new_rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        let shorts = PremultipliedShorts {
            red: to_short(red, alpha),
            green: to_short(green, alpha),
            blue: to_short(blue, alpha),
            alpha: to_short(1.0, alpha),
        };
        Color { red, green, blue, alpha, shorts }
    }

    pub fn new_rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::new_rgba(red, green, blue, 1.0)
    }

    pub fn red(&self) -> f64 {
        self.red
    }

    pub fn green(&self) -> f64 {
        self.green
    }

    pub fn blue(&self) -> f64 {
        self.blue
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn premultiplied(&self) -> PremultipliedShorts {
        self.shorts
    }

    /// Returns a copy with `alpha` replaced, re-deriving the premultiplied
    /// shorts rather than scaling the old ones (keeps the invariant exact
    /// instead of compounding rounding error).
    pub fn with_alpha(&self, alpha: f64) -> Self {
        Self::new_rgba(self.red, self.green, self.blue, alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_white_is_all_ones() {
        let white = Color::new_rgb(1.0, 1.0, 1.0);
        let s = white.premultiplied();
        assert_eq!(s, PremultipliedShorts { red: 0xFFFF, green: 0xFFFF, blue: 0xFFFF, alpha: 0xFFFF });
    }

    #[test]
    fn half_alpha_halves_premultiplied_channels() {
        let half = Color::new_rgba(1.0, 1.0, 1.0, 0.5);
        let s = half.premultiplied();
        // 0.5 * 0xFFFF rounds to 0x8000 (32768), within one unit of half.
        assert!((s.red as i32 - 0x8000).abs() <= 1);
        assert_eq!(s.alpha as i32, s.red as i32);
    }

    #[test]
    fn transparent_black_premultiplies_to_zero() {
        assert_eq!(
            Color::TRANSPARENT.premultiplied(),
            PremultipliedShorts { red: 0, green: 0, blue: 0, alpha: 0 }
        );
    }

    #[test]
    fn with_alpha_rederives_shorts_exactly() {
        let c = Color::new_rgba(0.2, 0.4, 0.6, 1.0).with_alpha(0.3);
        let expected = Color::new_rgba(0.2, 0.4, 0.6, 0.3);
        assert_eq!(c.premultiplied(), expected.premultiplied());
    }
}
