//! Porter-Duff operators, the separable blend modes, and the HSL blend
//! modes, all specified on premultiplied RGBA. Each is
//! expressed as the standard PDF 1.4 compositing formula
//! `Co = Cs·(1-αb) + Cb·(1-αs) + αs·αb·B(Cb,Cs)`, `αo = αs + αb - αs·αb`,
//! with `B` the identity for the pure Porter-Duff operators and the named
//! blend function otherwise.

use raster2d_color::PremultipliedShorts;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Clear,
    Source,
    Over,
    In,
    Out,
    Atop,
    DestOver,
    DestIn,
    DestOut,
    DestAtop,
    Xor,
    Add,
    Saturate,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl Operator {
    /// `true` if the operator's result is zero wherever the mask is zero,
    /// meaning pixels outside the bounded (inked) extents are untouched
    /// and no unbounded fix-up pass is needed.
    pub fn bounded_by_mask(self) -> bool {
        !matches!(self, Operator::In | Operator::Out | Operator::DestIn | Operator::DestOut)
    }
}

/// An unpremultiplied color in `[0,1]` per channel, the natural space for
/// the blend-mode formulas.
#[derive(Clone, Copy, Debug)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub fn from_premultiplied(s: PremultipliedShorts) -> Self {
        let unshort = |c: u16| c as f64 / 0xFFFF as f64;
        let a = unshort(s.alpha);
        let unpremul = |c: u16| if a > 0.0 { (unshort(c) / a).min(1.0) } else { 0.0 };
        Rgba { r: unpremul(s.red), g: unpremul(s.green), b: unpremul(s.blue), a }
    }

    pub fn to_premultiplied(self) -> PremultipliedShorts {
        let to_short = |c: f64| ((c.clamp(0.0, 1.0) * self.a.clamp(0.0, 1.0)) * 0xFFFF as f64 + 0.5) as u16;
        PremultipliedShorts {
            red: to_short(self.r),
            green: to_short(self.g),
            blue: to_short(self.b),
            alpha: (self.a.clamp(0.0, 1.0) * 0xFFFF as f64 + 0.5) as u16,
        }
    }
}

fn blend_separable(cb: f64, cs: f64, op: Operator) -> f64 {
    match op {
        Operator::Multiply => cb * cs,
        Operator::Screen => cb + cs - cb * cs,
        Operator::Overlay => blend_separable(cs, cb, Operator::HardLight),
        Operator::Darken => cb.min(cs),
        Operator::Lighten => cb.max(cs),
        Operator::ColorDodge => {
            if cb == 0.0 {
                0.0
            } else if cs == 1.0 {
                1.0
            } else {
                (cb / (1.0 - cs)).min(1.0)
            }
        }
        Operator::ColorBurn => {
            if cb == 1.0 {
                1.0
            } else if cs == 0.0 {
                0.0
            } else {
                1.0 - ((1.0 - cb) / cs).min(1.0)
            }
        }
        Operator::HardLight => {
            if cs <= 0.5 {
                cb * 2.0 * cs
            } else {
                cb + (2.0 * cs - 1.0) - cb * (2.0 * cs - 1.0)
            }
        }
        Operator::SoftLight => {
            let d = if cb <= 0.25 {
                ((16.0 * cb - 12.0) * cb + 4.0) * cb
            } else {
                cb.sqrt()
            };
            if cs <= 0.5 {
                cb - (1.0 - 2.0 * cs) * cb * (1.0 - cb)
            } else {
                cb + (2.0 * cs - 1.0) * (d - cb)
            }
        }
        Operator::Difference => (cb - cs).abs(),
        Operator::Exclusion => cb + cs - 2.0 * cb * cs,
        _ => cs,
    }
}

fn lum(c: Rgba) -> f64 {
    0.3 * c.r + 0.59 * c.g + 0.11 * c.b
}

fn clip_color(mut c: Rgba) -> Rgba {
    let l = lum(c);
    let n = c.r.min(c.g).min(c.b);
    let x = c.r.max(c.g).max(c.b);
    if n < 0.0 {
        c.r = l + (c.r - l) * l / (l - n);
        c.g = l + (c.g - l) * l / (l - n);
        c.b = l + (c.b - l) * l / (l - n);
    }
    if x > 1.0 {
        c.r = l + (c.r - l) * (1.0 - l) / (x - l);
        c.g = l + (c.g - l) * (1.0 - l) / (x - l);
        c.b = l + (c.b - l) * (1.0 - l) / (x - l);
    }
    c
}

fn set_lum(c: Rgba, l: f64) -> Rgba {
    let d = l - lum(c);
    clip_color(Rgba { r: c.r + d, g: c.g + d, b: c.b + d, a: c.a })
}

fn sat(c: Rgba) -> f64 {
    c.r.max(c.g).max(c.b) - c.r.min(c.g).min(c.b)
}

fn set_sat(c: Rgba, s: f64) -> Rgba {
    let mut vals = [("r", c.r), ("g", c.g), ("b", c.b)];
    vals.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
    let (min_k, min_v) = vals[0];
    let (mid_k, mid_v) = vals[1];
    let (max_k, max_v) = vals[2];
    let _ = (min_v, mid_v, max_v);
    let mut out = [0.0f64; 3];
    let idx = |k: &str| match k {
        "r" => 0,
        "g" => 1,
        _ => 2,
    };
    if vals[2].1 > vals[0].1 {
        out[idx(mid_k)] = (vals[1].1 - vals[0].1) * s / (vals[2].1 - vals[0].1);
        out[idx(max_k)] = s;
    }
    out[idx(min_k)] = 0.0;
    Rgba { r: out[0], g: out[1], b: out[2], a: c.a }
}

fn blend_hsl(cb: Rgba, cs: Rgba, op: Operator) -> Rgba {
    match op {
        Operator::Hue => set_lum(set_sat(cs, sat(cb)), lum(cb)),
        Operator::Saturation => set_lum(set_sat(cb, sat(cs)), lum(cb)),
        Operator::Color => set_lum(cs, lum(cb)),
        Operator::Luminosity => set_lum(cb, lum(cs)),
        _ => cs,
    }
}

/// Composites `src` over `dst` under `op`, both premultiplied. This is the
/// pixel-level core the compositing pipeline in [`crate::pipeline`]
/// drives per covered pixel.
pub fn composite_pixel(src: PremultipliedShorts, dst: PremultipliedShorts, op: Operator) -> PremultipliedShorts {
    if matches!(op, Operator::Clear) {
        return PremultipliedShorts { red: 0, green: 0, blue: 0, alpha: 0 };
    }

    let cs = Rgba::from_premultiplied(src);
    let cb = Rgba::from_premultiplied(dst);

    let (fa, fb) = porter_duff_factors(op, cs.a, cb.a);

    let blended_unpremul = match op {
        Operator::Source
        | Operator::Over
        | Operator::In
        | Operator::Out
        | Operator::Atop
        | Operator::DestOver
        | Operator::DestIn
        | Operator::DestOut
        | Operator::DestAtop
        | Operator::Xor
        | Operator::Add
        | Operator::Saturate => cs,
        Operator::Hue | Operator::Saturation | Operator::Color | Operator::Luminosity => blend_hsl(cb, cs, op),
        _ => Rgba {
            r: blend_separable(cb.r, cs.r, op),
            g: blend_separable(cb.g, cs.g, op),
            b: blend_separable(cb.b, cs.b, op),
            a: cs.a,
        },
    };

    let out_a = (cs.a * fa + cb.a * fb).clamp(0.0, 1.0);
    let mix = |s: f64, b: f64| -> f64 {
        let co = cs.a * fa * s + cb.a * fb * b;
        if out_a > 0.0 {
            co / out_a
        } else {
            0.0
        }
    };
    let out = Rgba {
        r: mix(blended_unpremul.r, cb.r),
        g: mix(blended_unpremul.g, cb.g),
        b: mix(blended_unpremul.b, cb.b),
        a: out_a,
    };
    out.to_premultiplied()
}

/// Returns `(Fa, Fb)`, the Porter-Duff source/destination coverage
/// factors for each operator, so `composite_pixel` can share one mixing
/// formula across all of them.
fn porter_duff_factors(op: Operator, _sa: f64, _da: f64) -> (f64, f64) {
    match op {
        Operator::Clear => (0.0, 0.0),
        Operator::Source => (1.0, 0.0),
        Operator::DestOut => (0.0, 1.0 - _sa),
        Operator::Over | Operator::Multiply | Operator::Screen | Operator::Overlay | Operator::Darken
        | Operator::Lighten | Operator::ColorDodge | Operator::ColorBurn | Operator::HardLight
        | Operator::SoftLight | Operator::Difference | Operator::Exclusion | Operator::Hue
        | Operator::Saturation | Operator::Color | Operator::Luminosity => (1.0, 1.0 - _sa),
        Operator::In => (_da, 0.0),
        Operator::Out => (1.0 - _da, 0.0),
        Operator::Atop => (_da, 1.0 - _sa),
        Operator::DestOver => (1.0 - _da, 1.0),
        Operator::DestIn => (0.0, _sa),
        Operator::DestAtop => (1.0 - _da, _sa),
        Operator::Xor => (1.0 - _da, 1.0 - _sa),
        Operator::Add => (1.0, 1.0),
        Operator::Saturate => ((1.0f64).min((1.0 - _da) / _sa.max(1e-9)), 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short(v: f64) -> u16 {
        (v * 0xFFFF as f64).round() as u16
    }

    #[test]
    fn over_opaque_src_equals_source() {
        let white = PremultipliedShorts { red: 0xFFFF, green: 0xFFFF, blue: 0xFFFF, alpha: 0xFFFF };
        let black = PremultipliedShorts { red: 0, green: 0, blue: 0, alpha: 0xFFFF };
        let result = composite_pixel(white, black, Operator::Over);
        assert_eq!(result, white);
    }

    #[test]
    fn clear_is_always_transparent_black() {
        let white = PremultipliedShorts { red: 0xFFFF, green: 0xFFFF, blue: 0xFFFF, alpha: 0xFFFF };
        let result = composite_pixel(white, white, Operator::Clear);
        assert_eq!(result, PremultipliedShorts { red: 0, green: 0, blue: 0, alpha: 0 });
    }

    #[test]
    fn multiply_black_over_anything_stays_black() {
        let black = PremultipliedShorts { red: 0, green: 0, blue: 0, alpha: 0xFFFF };
        let gray = PremultipliedShorts { red: short(0.5), green: short(0.5), blue: short(0.5), alpha: 0xFFFF };
        let result = composite_pixel(black, gray, Operator::Multiply);
        assert_eq!(result.red, 0);
    }

    #[test]
    fn transparent_source_over_leaves_dest_unchanged() {
        let transparent = PremultipliedShorts { red: 0, green: 0, blue: 0, alpha: 0 };
        let dst = PremultipliedShorts { red: short(0.3), green: short(0.4), blue: short(0.5), alpha: 0xFFFF };
        let result = composite_pixel(transparent, dst, Operator::Over);
        assert!((result.red as i32 - dst.red as i32).abs() <= 1);
    }

    #[test]
    fn in_is_bounded_by_mask_is_false() {
        assert!(!Operator::In.bounded_by_mask());
        assert!(Operator::Over.bounded_by_mask());
    }
}
