//! Tuning categories, per-category option sets and the installed selection

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Tunable part of the car. Closed set, used as a key everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TuningCategory {
    Wheels,
    Color,
    Engine,
}

impl TuningCategory {
    /// All categories in shop order
    pub const ALL: [TuningCategory; 3] = [
        TuningCategory::Wheels,
        TuningCategory::Color,
        TuningCategory::Engine,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TuningCategory::Wheels => "WHEELS",
            TuningCategory::Color => "COLOR",
            TuningCategory::Engine => "ENGINE",
        }
    }

    /// Case-insensitive lookup by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Stock option for this category
    pub fn stock(self) -> TuningOption {
        match self {
            TuningCategory::Wheels => TuningOption::Wheels(WheelOption::Stock),
            TuningCategory::Color => TuningOption::Color(ColorOption::Stock),
            TuningCategory::Engine => TuningOption::Engine(EngineOption::Stock),
        }
    }

    /// Every option of this category, stock first
    pub fn options(self) -> [TuningOption; 4] {
        match self {
            TuningCategory::Wheels => WheelOption::ALL.map(TuningOption::Wheels),
            TuningCategory::Color => ColorOption::ALL.map(TuningOption::Color),
            TuningCategory::Engine => EngineOption::ALL.map(TuningOption::Engine),
        }
    }
}

impl std::fmt::Display for TuningCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wheel sets, cheapest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WheelOption {
    #[default]
    Stock,
    Basic,
    Street,
    Sport,
}

impl WheelOption {
    pub const ALL: [WheelOption; 4] = [
        WheelOption::Stock,
        WheelOption::Basic,
        WheelOption::Street,
        WheelOption::Sport,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WheelOption::Stock => "STOCK",
            WheelOption::Basic => "BASIC",
            WheelOption::Street => "STREET",
            WheelOption::Sport => "SPORT",
        }
    }

    /// Name of the wheel variant node mounted for this option
    pub fn mesh_id(self) -> &'static str {
        match self {
            WheelOption::Stock => "basic_wheel",
            WheelOption::Basic => "wheel_paragon",
            WheelOption::Street => "wheel_touge6",
            WheelOption::Sport => "wheels_blade",
        }
    }
}

/// Paint jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColorOption {
    #[default]
    Stock,
    Red,
    Orange,
    MatteBlack,
}

impl ColorOption {
    pub const ALL: [ColorOption; 4] = [
        ColorOption::Stock,
        ColorOption::Red,
        ColorOption::Orange,
        ColorOption::MatteBlack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColorOption::Stock => "STOCK",
            ColorOption::Red => "RED",
            ColorOption::Orange => "ORANGE",
            ColorOption::MatteBlack => "MATTE_BLACK",
        }
    }

    pub fn rgb(self) -> Rgb {
        match self {
            ColorOption::Stock => Rgb::new(0xFF, 0xFF, 0xFF),
            ColorOption::Red => Rgb::new(0x94, 0x00, 0x00),
            ColorOption::Orange => Rgb::new(0xD6, 0x6F, 0x00),
            ColorOption::MatteBlack => Rgb::new(0x1F, 0x1F, 0x1F),
        }
    }
}

/// Engine kits, cheapest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineOption {
    #[default]
    Stock,
    Basic,
    Street,
    Sport,
}

impl EngineOption {
    pub const ALL: [EngineOption; 4] = [
        EngineOption::Stock,
        EngineOption::Basic,
        EngineOption::Street,
        EngineOption::Sport,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EngineOption::Stock => "STOCK",
            EngineOption::Basic => "BASIC",
            EngineOption::Street => "STREET",
            EngineOption::Sport => "SPORT",
        }
    }
}

/// 8-bit paint color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        Some(Self {
            r: u8::from_str_radix(&hex[0..2], 16).ok()?,
            g: u8::from_str_radix(&hex[2..4], 16).ok()?,
            b: u8::from_str_radix(&hex[4..6], 16).ok()?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// An option together with the category it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", content = "option", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TuningOption {
    Wheels(WheelOption),
    Color(ColorOption),
    Engine(EngineOption),
}

impl TuningOption {
    pub fn category(self) -> TuningCategory {
        match self {
            TuningOption::Wheels(_) => TuningCategory::Wheels,
            TuningOption::Color(_) => TuningCategory::Color,
            TuningOption::Engine(_) => TuningCategory::Engine,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TuningOption::Wheels(o) => o.as_str(),
            TuningOption::Color(o) => o.as_str(),
            TuningOption::Engine(o) => o.as_str(),
        }
    }

    pub fn is_stock(self) -> bool {
        self == self.category().stock()
    }

    /// Resolve an option name within `category`'s closed set
    pub fn parse(category: TuningCategory, name: &str) -> Result<Self, TuningError> {
        category
            .options()
            .into_iter()
            .find(|o| o.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| TuningError::InvalidOption {
                category,
                option: name.trim().to_string(),
            })
    }

    /// Fails with `InvalidOption` unless this option belongs to `category`
    pub fn ensure_in(self, category: TuningCategory) -> Result<Self, TuningError> {
        if self.category() == category {
            Ok(self)
        } else {
            Err(TuningError::InvalidOption {
                category,
                option: format!("{}:{}", self.category(), self.name()),
            })
        }
    }
}

impl std::fmt::Display for TuningOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.category(), self.name())
    }
}

/// What is installed on the car right now: exactly one option per category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TuningSelection {
    pub wheels: WheelOption,
    pub color: ColorOption,
    pub engine: EngineOption,
}

impl TuningSelection {
    pub fn get(&self, category: TuningCategory) -> TuningOption {
        match category {
            TuningCategory::Wheels => TuningOption::Wheels(self.wheels),
            TuningCategory::Color => TuningOption::Color(self.color),
            TuningCategory::Engine => TuningOption::Engine(self.engine),
        }
    }

    pub fn set(&mut self, option: TuningOption) {
        match option {
            TuningOption::Wheels(o) => self.wheels = o,
            TuningOption::Color(o) => self.color = o,
            TuningOption::Engine(o) => self.engine = o,
        }
    }

    /// Copy of this selection with `option` installed in its category
    pub fn with(mut self, option: TuningOption) -> Self {
        self.set(option);
        self
    }

    pub fn is_stock(&self) -> bool {
        *self == Self::default()
    }
}

impl std::fmt::Display for TuningSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "wheels={} color={} engine={}",
            self.wheels.as_str(),
            self.color.as_str(),
            self.engine.as_str()
        )
    }
}
