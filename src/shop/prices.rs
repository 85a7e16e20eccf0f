//! Price table: category -> option -> price
//!
//! One struct per category with one field per paid option, so a missing
//! price is a compile error rather than a runtime lookup failure. Stock
//! parts have no field and are always free.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::tuning::{ColorOption, EngineOption, TuningOption, WheelOption};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelPrices {
    pub basic: u64,
    pub street: u64,
    pub sport: u64,
}

impl Default for WheelPrices {
    fn default() -> Self {
        Self {
            basic: PRICE_WHEELS_BASIC,
            street: PRICE_WHEELS_STREET,
            sport: PRICE_WHEELS_SPORT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPrices {
    pub red: u64,
    pub orange: u64,
    pub matte_black: u64,
}

impl Default for ColorPrices {
    fn default() -> Self {
        Self {
            red: PRICE_COLOR_RED,
            orange: PRICE_COLOR_ORANGE,
            matte_black: PRICE_COLOR_MATTE_BLACK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnginePrices {
    pub basic: u64,
    pub street: u64,
    pub sport: u64,
}

impl Default for EnginePrices {
    fn default() -> Self {
        Self {
            basic: PRICE_ENGINE_BASIC,
            street: PRICE_ENGINE_STREET,
            sport: PRICE_ENGINE_SPORT,
        }
    }
}

/// Shop prices for every tuning option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceTable {
    pub wheels: WheelPrices,
    pub color: ColorPrices,
    pub engine: EnginePrices,
}

impl PriceTable {
    pub fn price(&self, option: TuningOption) -> u64 {
        match option {
            TuningOption::Wheels(wheels) => match wheels {
                WheelOption::Stock => 0,
                WheelOption::Basic => self.wheels.basic,
                WheelOption::Street => self.wheels.street,
                WheelOption::Sport => self.wheels.sport,
            },
            TuningOption::Color(color) => match color {
                ColorOption::Stock => 0,
                ColorOption::Red => self.color.red,
                ColorOption::Orange => self.color.orange,
                ColorOption::MatteBlack => self.color.matte_black,
            },
            TuningOption::Engine(engine) => match engine {
                EngineOption::Stock => 0,
                EngineOption::Basic => self.engine.basic,
                EngineOption::Street => self.engine.street,
                EngineOption::Sport => self.engine.sport,
            },
        }
    }
}
