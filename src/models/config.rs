//! # 水印参数数据模型
//!
//! 描述一次批处理共用的合成参数：质量、不透明度、方位、偏移和可选的缩放尺寸。
//!
//! ## 依赖关系
//! - 被 `cli/apply.rs` 用于参数解析
//! - 被 `batch/command.rs` 用于构造 composite 命令

use clap::ValueEnum;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::sync::OnceLock;

/// 质量与不透明度的取值范围
pub const PERCENT_MIN: u8 = 1;
pub const PERCENT_MAX: u8 = 100;

fn clamp_percent(value: u8) -> u8 {
    value.clamp(PERCENT_MIN, PERCENT_MAX)
}

// ─────────────────────────────────────────────────────────────
// Gravity
// ─────────────────────────────────────────────────────────────

/// 水印锚点（九宫格方位）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gravity {
    #[default]
    Center,
    North,
    South,
    West,
    East,
    Northwest,
    Northeast,
    Southwest,
    Southeast,
}

impl Gravity {
    /// composite `-gravity` 参数使用的关键字
    pub fn keyword(self) -> &'static str {
        match self {
            Gravity::Center => "Center",
            Gravity::North => "North",
            Gravity::South => "South",
            Gravity::West => "West",
            Gravity::East => "East",
            Gravity::Northwest => "NorthWest",
            Gravity::Northeast => "NorthEast",
            Gravity::Southwest => "SouthWest",
            Gravity::Southeast => "SouthEast",
        }
    }
}

impl fmt::Display for Gravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// ─────────────────────────────────────────────────────────────
// Offset
// ─────────────────────────────────────────────────────────────

/// 相对锚点的像素偏移
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub fn new(x: i32, y: i32) -> Self {
        Offset { x, y }
    }
}

/// 输出带显式符号的偏移，例如 `+5-3`
impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}{:+}", self.x, self.y)
    }
}

/// 支持 `+5-3`、`-10+0` 以及 `5,-3` 两种写法
impl FromStr for Offset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| {
            Regex::new(r"^([+-]?\d+)(?:,\s*([+-]?\d+)|([+-]\d+))$").unwrap()
        });

        let caps = re
            .captures(s.trim())
            .ok_or_else(|| format!("invalid offset '{}', expected e.g. '+5-3' or '5,-3'", s))?;

        let parse = |text: &str| {
            text.parse::<i32>()
                .map_err(|_| format!("offset component out of range: {}", text))
        };

        let x = parse(&caps[1])?;
        let y = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map(|m| parse(m.as_str()))
            .transpose()?
            .unwrap_or_default();

        Ok(Offset { x, y })
    }
}

// ─────────────────────────────────────────────────────────────
// ResizeTo
// ─────────────────────────────────────────────────────────────

/// 水印缩放尺寸（宽高必须同时给出且为正）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResizeTo {
    pub width: NonZeroU32,
    pub height: NonZeroU32,
}

impl ResizeTo {
    /// 任一维度为 0 时返回 None
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(ResizeTo {
            width: NonZeroU32::new(width)?,
            height: NonZeroU32::new(height)?,
        })
    }
}

impl fmt::Display for ResizeTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ResizeTo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| Regex::new(r"^(\d+)\s*[xX]\s*(\d+)$").unwrap());

        let caps = re
            .captures(s.trim())
            .ok_or_else(|| format!("invalid size '{}', expected WIDTHxHEIGHT", s))?;

        let width: u32 = caps[1]
            .parse()
            .map_err(|_| format!("width out of range: {}", &caps[1]))?;
        let height: u32 = caps[2]
            .parse()
            .map_err(|_| format!("height out of range: {}", &caps[2]))?;

        ResizeTo::new(width, height)
            .ok_or_else(|| format!("size must be positive in both dimensions: {}", s))
    }
}

// ─────────────────────────────────────────────────────────────
// WatermarkConfig
// ─────────────────────────────────────────────────────────────

/// 整批共用的水印参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WatermarkConfig {
    /// 输出质量 (1-100)
    quality: u8,
    /// 水印层不透明度 (1-100)
    opacity: u8,
    /// 锚点
    pub gravity: Gravity,
    /// 像素偏移
    pub offset: Offset,
    /// 水印缩放尺寸
    pub resize_to: Option<ResizeTo>,
}

impl WatermarkConfig {
    /// 创建参数，质量与不透明度会被限制在 [1, 100]
    pub fn new(
        quality: u8,
        opacity: u8,
        gravity: Gravity,
        offset: Offset,
        resize_to: Option<ResizeTo>,
    ) -> Self {
        WatermarkConfig {
            quality: clamp_percent(quality),
            opacity: clamp_percent(opacity),
            gravity,
            offset,
            resize_to,
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    /// composite `-geometry` 参数：`{±x}{±y}` 或 `{w}x{h}{±x}{±y}`
    pub fn geometry(&self) -> String {
        match self.resize_to {
            Some(size) => format!("{}{}", size, self.offset),
            None => self.offset.to_string(),
        }
    }
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        WatermarkConfig::new(100, 100, Gravity::Center, Offset::default(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_keywords() {
        assert_eq!(Gravity::Center.keyword(), "Center");
        assert_eq!(Gravity::North.keyword(), "North");
        assert_eq!(Gravity::Northwest.keyword(), "NorthWest");
        assert_eq!(Gravity::Southeast.keyword(), "SouthEast");
    }

    #[test]
    fn test_gravity_from_cli_value() {
        let g = Gravity::from_str("northeast", true).unwrap();
        assert_eq!(g, Gravity::Northeast);
        assert!(Gravity::from_str("middle", true).is_err());
    }

    #[test]
    fn test_geometry_without_resize() {
        let config =
            WatermarkConfig::new(90, 100, Gravity::Center, Offset::new(5, -3), None);
        assert_eq!(config.geometry(), "+5-3");

        let zero = WatermarkConfig::default();
        assert_eq!(zero.geometry(), "+0+0");
    }

    #[test]
    fn test_geometry_with_resize() {
        let config = WatermarkConfig::new(
            90,
            100,
            Gravity::Center,
            Offset::new(5, -3),
            ResizeTo::new(200, 100),
        );
        assert_eq!(config.geometry(), "200x100+5-3");
    }

    #[test]
    fn test_percent_clamping() {
        let low = WatermarkConfig::new(0, 0, Gravity::Center, Offset::default(), None);
        assert_eq!(low.quality(), 1);
        assert_eq!(low.opacity(), 1);

        let high = WatermarkConfig::new(250, 101, Gravity::Center, Offset::default(), None);
        assert_eq!(high.quality(), 100);
        assert_eq!(high.opacity(), 100);
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!("+5-3".parse::<Offset>().unwrap(), Offset::new(5, -3));
        assert_eq!("-10+0".parse::<Offset>().unwrap(), Offset::new(-10, 0));
        assert_eq!("5,-3".parse::<Offset>().unwrap(), Offset::new(5, -3));
        assert!("53".parse::<Offset>().is_err());
        assert!("abc".parse::<Offset>().is_err());
    }

    #[test]
    fn test_parse_resize() {
        let size: ResizeTo = "200x100".parse().unwrap();
        assert_eq!(size.width.get(), 200);
        assert_eq!(size.height.get(), 100);
        assert!("0x100".parse::<ResizeTo>().is_err());
        assert!("200".parse::<ResizeTo>().is_err());
        assert!(ResizeTo::new(10, 0).is_none());
    }
}
