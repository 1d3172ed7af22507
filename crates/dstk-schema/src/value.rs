//! Lexical value types.
//!
//! Each token `type` has exactly one accepted lexical form. Parsing a value
//! into [`TokenValue`] is the check the validator runs on every entry; once it
//! succeeds, converters can rely on the parsed fields without re-checking.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

static HEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})$").expect("hex pattern is valid")
});

static DIMENSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?\d+(?:\.\d+)?)(px|em)$").expect("dimension pattern is valid"));

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+(?:\.\d+)?$").expect("number pattern is valid"));

static LENGTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?\d+(?:\.\d+)?)(?:px)?$").expect("length pattern is valid"));

static RGBA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*(\d*\.?\d+)\s*)?\)$")
        .expect("rgba pattern is valid")
});

/// Error for a value whose lexical form does not match its declared type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    #[error("unknown token type '{0}' (expected one of: color, dimension, fontFamily, fontWeight, number, shadow, fontSource)")]
    UnknownType(String),

    #[error("value '{0}' is not a 6-digit hex color (#RRGGBB)")]
    InvalidHex(String),

    #[error("value '{0}' is not a dimension (a number followed by px or em)")]
    InvalidDimension(String),

    #[error("value '{0}' is not a bare decimal number")]
    InvalidNumber(String),

    #[error("value '{0}' is not a supported font weight (400, 500, 600, 700)")]
    UnsupportedFontWeight(String),

    #[error("font family list is empty")]
    EmptyFontFamily,

    #[error("value '{0}' is not a font source (expected 'system' or an http(s) URL)")]
    InvalidFontSource(String),

    #[error("value '{value}' is not a shadow: {reason}")]
    InvalidShadow { value: String, reason: String },
}

/// The declared `type` of a token entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Color,
    Dimension,
    FontFamily,
    FontWeight,
    Number,
    Shadow,
    FontSource,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Color => "color",
            TokenType::Dimension => "dimension",
            TokenType::FontFamily => "fontFamily",
            TokenType::FontWeight => "fontWeight",
            TokenType::Number => "number",
            TokenType::Shadow => "shadow",
            TokenType::FontSource => "fontSource",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenType {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "color" => Ok(TokenType::Color),
            "dimension" => Ok(TokenType::Dimension),
            "fontFamily" => Ok(TokenType::FontFamily),
            "fontWeight" => Ok(TokenType::FontWeight),
            "number" => Ok(TokenType::Number),
            "shadow" => Ok(TokenType::Shadow),
            "fontSource" => Ok(TokenType::FontSource),
            other => Err(ValueError::UnknownType(other.to_string())),
        }
    }
}

/// A `#RRGGBB` color.
#[derive(Debug, Clone, PartialEq)]
pub struct Hex {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    raw: String,
}

impl Hex {
    /// The value exactly as written in the document.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Upper-case `RRGGBB` without the leading `#`.
    pub fn rrggbb(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Hex {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = HEX_RE
            .captures(s)
            .ok_or_else(|| ValueError::InvalidHex(s.to_string()))?;
        let channel = |i: usize| {
            caps.get(i)
                .and_then(|m| u8::from_str_radix(m.as_str(), 16).ok())
                .ok_or_else(|| ValueError::InvalidHex(s.to_string()))
        };
        Ok(Hex {
            r: channel(1)?,
            g: channel(2)?,
            b: channel(3)?,
            raw: s.to_string(),
        })
    }
}

/// Unit of a [`Dimension`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    Em,
}

/// A number followed by `px` or `em`. A bare `0` parses as `0px`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    pub magnitude: f64,
    pub unit: LengthUnit,
    raw: String,
}

impl Dimension {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_px(&self) -> bool {
        self.unit == LengthUnit::Px
    }
}

impl FromStr for Dimension {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "0" {
            return Ok(Dimension {
                magnitude: 0.0,
                unit: LengthUnit::Px,
                raw: s.to_string(),
            });
        }
        let invalid = || ValueError::InvalidDimension(s.to_string());
        let caps = DIMENSION_RE.captures(s).ok_or_else(invalid)?;
        let magnitude = caps
            .get(1)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .ok_or_else(invalid)?;
        let unit = match caps.get(2).map(|m| m.as_str()) {
            Some("px") => LengthUnit::Px,
            Some("em") => LengthUnit::Em,
            _ => return Err(invalid()),
        };
        Ok(Dimension {
            magnitude,
            unit,
            raw: s.to_string(),
        })
    }
}

/// A unitless decimal, e.g. a line-height ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct Number {
    pub value: f64,
    raw: String,
}

impl Number {
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl FromStr for Number {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !NUMBER_RE.is_match(s) {
            return Err(ValueError::InvalidNumber(s.to_string()));
        }
        let value = s
            .parse::<f64>()
            .map_err(|_| ValueError::InvalidNumber(s.to_string()))?;
        Ok(Number {
            value,
            raw: s.to_string(),
        })
    }
}

/// The four supported font weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Medium,
    SemiBold,
    Bold,
}

impl FontWeight {
    pub fn numeric(&self) -> u16 {
        match self {
            FontWeight::Regular => 400,
            FontWeight::Medium => 500,
            FontWeight::SemiBold => 600,
            FontWeight::Bold => 700,
        }
    }
}

impl FromStr for FontWeight {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "400" => Ok(FontWeight::Regular),
            "500" => Ok(FontWeight::Medium),
            "600" => Ok(FontWeight::SemiBold),
            "700" => Ok(FontWeight::Bold),
            other => Err(ValueError::UnsupportedFontWeight(other.to_string())),
        }
    }
}

/// A CSS-style font family list such as `'Inter', system-ui, sans-serif`.
#[derive(Debug, Clone, PartialEq)]
pub struct FontStack {
    pub families: Vec<String>,
    raw: String,
}

impl FontStack {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The first family, unquoted.
    pub fn primary(&self) -> &str {
        self.families.first().map(String::as_str).unwrap_or_default()
    }
}

impl FromStr for FontStack {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let families: Vec<String> = s
            .split(',')
            .map(|part| part.trim().trim_matches(|c| c == '\'' || c == '"').trim().to_string())
            .filter(|part| !part.is_empty())
            .collect();
        if families.is_empty() {
            return Err(ValueError::EmptyFontFamily);
        }
        Ok(FontStack {
            families,
            raw: s.to_string(),
        })
    }
}

/// Where a font family is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// Ships with the platform; nothing to import or register.
    System,
    Url(String),
}

impl FontSource {
    pub fn raw(&self) -> &str {
        match self {
            FontSource::System => "system",
            FontSource::Url(url) => url,
        }
    }
}

impl FromStr for FontSource {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "system" {
            Ok(FontSource::System)
        } else if (s.starts_with("https://") || s.starts_with("http://")) && !s.contains(char::is_whitespace) {
            Ok(FontSource::Url(s.to_string()))
        } else {
            Err(ValueError::InvalidFontSource(s.to_string()))
        }
    }
}

/// A shadow color with alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

/// One layer of a (possibly multi-layer) shadow.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowLayer {
    pub inset: bool,
    pub x: f64,
    pub y: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: Rgba,
}

/// `none`, or one or more comma-separated layers of
/// `[inset] <x> <y> [<blur> [<spread>]] <color>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    pub layers: Vec<ShadowLayer>,
    raw: String,
}

impl Shadow {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_none(&self) -> bool {
        self.layers.is_empty()
    }

    /// The first layer, which single-shadow platforms render.
    pub fn primary(&self) -> Option<&ShadowLayer> {
        self.layers.first()
    }
}

impl FromStr for Shadow {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == "none" {
            return Ok(Shadow {
                layers: Vec::new(),
                raw: s.to_string(),
            });
        }
        let invalid = |reason: &str| ValueError::InvalidShadow {
            value: s.to_string(),
            reason: reason.to_string(),
        };
        let layers = split_top_level(trimmed, ',')
            .into_iter()
            .map(|layer| parse_layer(layer).map_err(|reason| invalid(&reason)))
            .collect::<Result<Vec<_>, _>>()?;
        if layers.is_empty() {
            return Err(invalid("no shadow layers"));
        }
        Ok(Shadow {
            layers,
            raw: s.to_string(),
        })
    }
}

/// Split on `sep` outside parentheses.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}

/// Split on whitespace outside parentheses.
fn split_words(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    words.push(&text[s..i]);
                }
                continue;
            }
            _ => {}
        }
        if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        words.push(&text[s..]);
    }
    words
}

fn parse_layer(layer: &str) -> Result<ShadowLayer, String> {
    if layer.is_empty() {
        return Err("empty shadow layer".into());
    }
    let mut inset = false;
    let mut lengths = Vec::new();
    let mut color = None;
    for word in split_words(layer) {
        if word == "inset" {
            inset = true;
        } else if let Some(caps) = LENGTH_RE.captures(word) {
            if color.is_some() {
                return Err(format!("length '{word}' after the color"));
            }
            let n = caps
                .get(1)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .ok_or_else(|| format!("bad length '{word}'"))?;
            lengths.push(n);
        } else if color.is_none() {
            color = Some(parse_shadow_color(word)?);
        } else {
            return Err(format!("unexpected '{word}'"));
        }
    }
    let color = color.ok_or_else(|| "missing color".to_string())?;
    if !(2..=4).contains(&lengths.len()) {
        return Err(format!("expected 2 to 4 lengths, found {}", lengths.len()));
    }
    let blur = lengths.get(2).copied().unwrap_or(0.0);
    if blur < 0.0 {
        return Err("blur radius must not be negative".into());
    }
    Ok(ShadowLayer {
        inset,
        x: lengths[0],
        y: lengths[1],
        blur,
        spread: lengths.get(3).copied().unwrap_or(0.0),
        color,
    })
}

fn parse_shadow_color(word: &str) -> Result<Rgba, String> {
    if word.starts_with('#') {
        let hex: Hex = word.parse().map_err(|e: ValueError| e.to_string())?;
        return Ok(Rgba {
            r: hex.r,
            g: hex.g,
            b: hex.b,
            a: 1.0,
        });
    }
    let caps = RGBA_RE
        .captures(word)
        .ok_or_else(|| format!("unrecognized color '{word}'"))?;
    let channel = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u8>().ok())
            .ok_or_else(|| format!("color channel out of range in '{word}'"))
    };
    let a = match caps.get(4) {
        Some(m) => m
            .as_str()
            .parse::<f64>()
            .map_err(|_| format!("bad alpha in '{word}'"))?,
        None => 1.0,
    };
    if !(0.0..=1.0).contains(&a) {
        return Err(format!("alpha out of range in '{word}'"));
    }
    Ok(Rgba {
        r: channel(1)?,
        g: channel(2)?,
        b: channel(3)?,
        a,
    })
}

/// A parsed token value: one variant per [`TokenType`].
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Color(Hex),
    Dimension(Dimension),
    FontFamily(FontStack),
    FontWeight(FontWeight),
    Number(Number),
    Shadow(Shadow),
    FontSource(FontSource),
}

impl TokenValue {
    /// Parse `raw` as the lexical form required by `ty`.
    pub fn parse(ty: TokenType, raw: &str) -> Result<Self, ValueError> {
        Ok(match ty {
            TokenType::Color => TokenValue::Color(raw.parse()?),
            TokenType::Dimension => TokenValue::Dimension(raw.parse()?),
            TokenType::FontFamily => TokenValue::FontFamily(raw.parse()?),
            TokenType::FontWeight => TokenValue::FontWeight(raw.parse()?),
            TokenType::Number => TokenValue::Number(raw.parse()?),
            TokenType::Shadow => TokenValue::Shadow(raw.parse()?),
            TokenType::FontSource => TokenValue::FontSource(raw.parse()?),
        })
    }

    pub fn token_type(&self) -> TokenType {
        match self {
            TokenValue::Color(_) => TokenType::Color,
            TokenValue::Dimension(_) => TokenType::Dimension,
            TokenValue::FontFamily(_) => TokenType::FontFamily,
            TokenValue::FontWeight(_) => TokenType::FontWeight,
            TokenValue::Number(_) => TokenType::Number,
            TokenValue::Shadow(_) => TokenType::Shadow,
            TokenValue::FontSource(_) => TokenType::FontSource,
        }
    }

    /// The value exactly as written in the document.
    pub fn raw(&self) -> &str {
        match self {
            TokenValue::Color(v) => v.raw(),
            TokenValue::Dimension(v) => v.raw(),
            TokenValue::FontFamily(v) => v.raw(),
            TokenValue::FontWeight(v) => match v {
                FontWeight::Regular => "400",
                FontWeight::Medium => "500",
                FontWeight::SemiBold => "600",
                FontWeight::Bold => "700",
            },
            TokenValue::Number(v) => v.raw(),
            TokenValue::Shadow(v) => v.raw(),
            TokenValue::FontSource(v) => v.raw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // =========================================================================
    // Types
    // =========================================================================

    #[test]
    fn test_token_type_names() {
        assert_eq!("fontWeight".parse::<TokenType>(), Ok(TokenType::FontWeight));
        assert_eq!(TokenType::FontSource.to_string(), "fontSource");
        assert_eq!(
            "gradient".parse::<TokenType>(),
            Err(ValueError::UnknownType("gradient".into()))
        );
    }

    // =========================================================================
    // Colors
    // =========================================================================

    #[test]
    fn test_hex_channels() {
        let hex: Hex = "#2563eb".parse().unwrap();
        assert_eq!((hex.r, hex.g, hex.b), (0x25, 0x63, 0xEB));
        assert_eq!(hex.rrggbb(), "2563EB");
        assert_eq!(hex.raw(), "#2563eb");
    }

    #[test]
    fn test_hex_rejects_short_and_alpha_forms() {
        assert!("#FFF".parse::<Hex>().is_err());
        assert!("#2563EBFF".parse::<Hex>().is_err());
        assert!("2563EB".parse::<Hex>().is_err());
        assert!("#GG63EB".parse::<Hex>().is_err());
    }

    // =========================================================================
    // Dimensions and numbers
    // =========================================================================

    #[test]
    fn test_dimension_px() {
        let d: Dimension = "16px".parse().unwrap();
        assert_eq!(d.magnitude, 16.0);
        assert!(d.is_px());
    }

    #[test]
    fn test_dimension_em() {
        let d: Dimension = "-0.025em".parse().unwrap();
        assert_eq!(d.magnitude, -0.025);
        assert_eq!(d.unit, LengthUnit::Em);
    }

    #[test]
    fn test_dimension_zero_without_unit() {
        let d: Dimension = "0".parse().unwrap();
        assert_eq!(d.magnitude, 0.0);
        assert!(d.is_px());
    }

    #[test]
    fn test_dimension_rejects_other_units() {
        assert!("1rem".parse::<Dimension>().is_err());
        assert!("16".parse::<Dimension>().is_err());
        assert!("px".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_number() {
        assert_eq!("1.5".parse::<Number>().unwrap().value, 1.5);
        assert!("1.5px".parse::<Number>().is_err());
        assert!(".5".parse::<Number>().is_err());
    }

    // =========================================================================
    // Fonts
    // =========================================================================

    #[test]
    fn test_font_weight_supported() {
        assert_eq!("600".parse::<FontWeight>(), Ok(FontWeight::SemiBold));
        assert_eq!(FontWeight::Bold.numeric(), 700);
    }

    #[test]
    fn test_font_weight_unsupported_is_error() {
        assert_eq!(
            "300".parse::<FontWeight>(),
            Err(ValueError::UnsupportedFontWeight("300".into()))
        );
        assert!("bold".parse::<FontWeight>().is_err());
    }

    #[test]
    fn test_font_stack() {
        let stack: FontStack = "'Inter', system-ui, sans-serif".parse().unwrap();
        assert_eq!(stack.primary(), "Inter");
        assert_eq!(stack.families, vec!["Inter", "system-ui", "sans-serif"]);
        assert_eq!("  , ".parse::<FontStack>(), Err(ValueError::EmptyFontFamily));
    }

    #[test]
    fn test_font_source() {
        assert_eq!("system".parse::<FontSource>(), Ok(FontSource::System));
        assert!(matches!(
            "https://fonts.googleapis.com/css2?family=Inter".parse::<FontSource>(),
            Ok(FontSource::Url(_))
        ));
        assert!("Inter.ttf".parse::<FontSource>().is_err());
    }

    // =========================================================================
    // Shadows
    // =========================================================================

    #[test]
    fn test_shadow_single_layer() {
        let shadow: Shadow = "0 1px 3px 0 rgba(0, 0, 0, 0.1)".parse().unwrap();
        let layer = shadow.primary().unwrap();
        assert_eq!((layer.x, layer.y, layer.blur, layer.spread), (0.0, 1.0, 3.0, 0.0));
        assert_eq!(layer.color, Rgba { r: 0, g: 0, b: 0, a: 0.1 });
        assert!(!layer.inset);
    }

    #[test]
    fn test_shadow_multiple_layers() {
        let shadow: Shadow = "0 4px 6px -1px rgba(0,0,0,0.1), 0 2px 4px -2px rgba(0,0,0,0.1)"
            .parse()
            .unwrap();
        assert_eq!(shadow.layers.len(), 2);
        assert_eq!(shadow.layers[1].spread, -2.0);
    }

    #[test]
    fn test_shadow_inset_and_hex_color() {
        let shadow: Shadow = "inset 0 2px 4px #000000".parse().unwrap();
        let layer = shadow.primary().unwrap();
        assert!(layer.inset);
        assert_eq!(layer.color.a, 1.0);
    }

    #[test]
    fn test_shadow_none() {
        let shadow: Shadow = "none".parse().unwrap();
        assert!(shadow.is_none());
    }

    #[test]
    fn test_shadow_rejects_garbage() {
        assert!("big and soft".parse::<Shadow>().is_err());
        assert!("0 1px rgba(0,0,0,2)".parse::<Shadow>().is_err());
        assert!("0 rgba(0,0,0,0.1)".parse::<Shadow>().is_err());
        assert!("0 1px 2px 3px 4px rgba(0,0,0,0.1)".parse::<Shadow>().is_err());
    }

    // =========================================================================
    // TokenValue
    // =========================================================================

    #[test]
    fn test_token_value_dispatch() {
        let value = TokenValue::parse(TokenType::Dimension, "24px").unwrap();
        assert_eq!(value.token_type(), TokenType::Dimension);
        assert_eq!(value.raw(), "24px");

        let err = TokenValue::parse(TokenType::Color, "blue").unwrap_err();
        assert_eq!(err, ValueError::InvalidHex("blue".into()));
    }
}
