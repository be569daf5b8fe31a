//! RGBA colors and CSS color string parsing.

use std::fmt;

/// Non-premultiplied RGBA color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Color { r, g, b, a }
    }

    /// Parses a CSS color: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`,
    /// `rgb()`/`rgba()`, `hsl()`/`hsla()` or a named color.
    pub fn parse(input: &str) -> Option<Color> {
        let s = input.trim().to_ascii_lowercase();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(inner) = function_args(&s, "rgba").or_else(|| function_args(&s, "rgb")) {
            return parse_rgb(inner);
        }
        if let Some(inner) = function_args(&s, "hsla").or_else(|| function_args(&s, "hsl")) {
            return parse_hsl(inner);
        }
        named(&s)
    }

    /// Channel-wise linear interpolation.
    pub fn lerp(&self, to: &Color, t: f64) -> Color {
        Color {
            r: self.r + (to.r - self.r) * t,
            g: self.g + (to.g - self.g) * t,
            b: self.b + (to.b - self.b) * t,
            a: self.a + (to.a - self.a) * t,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channel = |c: f64| (c * 255.0).round().clamp(0.0, 255.0) as u8;
        write!(
            f,
            "rgba({},{},{},{})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            self.a
        )
    }
}

fn function_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1].repeat(2), 16).ok();
    let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    let (r, g, b, a) = match hex.len() {
        3 => (digit(0)?, digit(1)?, digit(2)?, 255),
        4 => (digit(0)?, digit(1)?, digit(2)?, digit(3)?),
        6 => (pair(0)?, pair(2)?, pair(4)?, 255),
        8 => (pair(0)?, pair(2)?, pair(4)?, pair(6)?),
        _ => return None,
    };
    Some(Color::new(
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
        f64::from(a) / 255.0,
    ))
}

fn split_args(inner: &str) -> Vec<&str> {
    inner.split(',').map(str::trim).collect()
}

fn parse_alpha(part: Option<&&str>) -> Option<f64> {
    match part {
        None => Some(1.0),
        Some(p) => Some(p.parse::<f64>().ok()?.clamp(0.0, 1.0)),
    }
}

fn parse_rgb(inner: &str) -> Option<Color> {
    let parts = split_args(inner);
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |p: &str| -> Option<f64> {
        match p.strip_suffix('%') {
            Some(pct) => Some((pct.parse::<f64>().ok()? / 100.0).clamp(0.0, 1.0)),
            None => Some((p.parse::<f64>().ok()? / 255.0).clamp(0.0, 1.0)),
        }
    };
    Some(Color::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        parse_alpha(parts.get(3))?,
    ))
}

fn parse_hsl(inner: &str) -> Option<Color> {
    let parts = split_args(inner);
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let h = parts[0].parse::<f64>().ok()?.rem_euclid(360.0) / 360.0;
    let s = (parts[1].strip_suffix('%')?.parse::<f64>().ok()? / 100.0).clamp(0.0, 1.0);
    let l = (parts[2].strip_suffix('%')?.parse::<f64>().ok()? / 100.0).clamp(0.0, 1.0);
    let a = parse_alpha(parts.get(3))?;

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hue = |mut t: f64| {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    Some(Color::new(hue(h + 1.0 / 3.0), hue(h), hue(h - 1.0 / 3.0), a))
}

fn named(name: &str) -> Option<Color> {
    let rgb = |r: u8, g: u8, b: u8| {
        Some(Color::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            1.0,
        ))
    };
    match name {
        "transparent" => Some(Color::new(0.0, 0.0, 0.0, 0.0)),
        "black" => rgb(0, 0, 0),
        "white" => rgb(255, 255, 255),
        "red" => rgb(255, 0, 0),
        "green" => rgb(0, 128, 0),
        "lime" => rgb(0, 255, 0),
        "blue" => rgb(0, 0, 255),
        "navy" => rgb(0, 0, 128),
        "yellow" => rgb(255, 255, 0),
        "cyan" | "aqua" => rgb(0, 255, 255),
        "magenta" | "fuchsia" => rgb(255, 0, 255),
        "gray" | "grey" => rgb(128, 128, 128),
        "silver" => rgb(192, 192, 192),
        "maroon" => rgb(128, 0, 0),
        "olive" => rgb(128, 128, 0),
        "purple" => rgb(128, 0, 128),
        "teal" => rgb(0, 128, 128),
        "orange" => rgb(255, 165, 0),
        "brown" => rgb(165, 42, 42),
        "pink" => rgb(255, 192, 203),
        _ => None,
    }
}
