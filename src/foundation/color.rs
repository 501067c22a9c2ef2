use crate::foundation::error::{AdError, AdResult};

/// CSS-like color string as supplied by templates and callers.
///
/// The string is kept verbatim. Nothing checks it until a surface needs actual channel values,
/// so an invalid color surfaces as a draw error at the layer that uses it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Wrap a color string without validating it.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The original string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into straight-alpha RGBA8.
    ///
    /// Accepted forms: `#RGB`, `#RRGGBB`, `#RRGGBBAA`, `rgb(r, g, b)`, `rgba(r, g, b, a)` with
    /// `a` in `[0, 1]`, and a handful of CSS named colors.
    pub fn to_rgba8(&self) -> AdResult<[u8; 4]> {
        parse_css_color(&self.0).map_err(|e| AdError::draw(format!("color \"{}\": {e}", self.0)))
    }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Color {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn parse_css_color(s: &str) -> Result<[u8; 4], String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = s.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_fn(args, true);
    }
    if let Some(args) = lower
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_fn(args, false);
    }
    named_color(&lower).ok_or_else(|| "unrecognized color syntax".to_owned())
}

fn parse_hex(s: &str) -> Result<[u8; 4], String> {
    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }

    match s.len() {
        3 => {
            let mut out = [0u8, 0, 0, 255];
            for (i, c) in s.chars().enumerate() {
                let v = c
                    .to_digit(16)
                    .ok_or_else(|| format!("invalid hex digit '{c}'"))?
                    as u8;
                out[i] = v * 17;
            }
            Ok(out)
        }
        6 => Ok([
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            255,
        ]),
        8 => Ok([
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ]),
        _ => Err("hex color must be #RGB, #RRGGBB or #RRGGBBAA".to_owned()),
    }
}

fn parse_rgb_fn(args: &str, with_alpha: bool) -> Result<[u8; 4], String> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return Err(format!("expected {expected} components, got {}", parts.len()));
    }

    let mut out = [0u8, 0, 0, 255];
    for (i, p) in parts.iter().take(3).enumerate() {
        let v: f64 = p
            .parse()
            .map_err(|_| format!("invalid channel value \"{p}\""))?;
        if !v.is_finite() {
            return Err(format!("invalid channel value \"{p}\""));
        }
        out[i] = v.round().clamp(0.0, 255.0) as u8;
    }
    if with_alpha {
        let a: f64 = parts[3]
            .parse()
            .map_err(|_| format!("invalid alpha value \"{}\"", parts[3]))?;
        if !a.is_finite() {
            return Err(format!("invalid alpha value \"{}\"", parts[3]));
        }
        out[3] = (a.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    Ok(out)
}

fn named_color(name: &str) -> Option<[u8; 4]> {
    let rgba = match name {
        "transparent" => [0, 0, 0, 0],
        "black" => [0, 0, 0, 255],
        "white" => [255, 255, 255, 255],
        "red" => [255, 0, 0, 255],
        "green" => [0, 128, 0, 255],
        "blue" => [0, 0, 255, 255],
        "yellow" => [255, 255, 0, 255],
        "orange" => [255, 165, 0, 255],
        "purple" => [128, 0, 128, 255],
        "gray" | "grey" => [128, 128, 128, 255],
        _ => return None,
    };
    Some(rgba)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
