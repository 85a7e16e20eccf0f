//! Compact text format for garage event serialization
//!
//! Format: `T:NNNNN|CODE|data...`
//! - T:NNNNN = timestamp in milliseconds (5 digits, wraps at 99999)
//! - CODE = 2-char event type code
//! - data = pipe-separated values specific to event type
//!
//! Options are written as `CATEGORY:OPTION`, paint as `#RRGGBB`.
//!
//! Examples:
//! ```text
//! T:00000|SE|5f0c...|2026-10-19T10:00:00+00:00
//! T:01200|CO|ENGINE
//! T:01350|OP|ENGINE:SPORT|35000
//! T:01350|VS|-
//! T:02000|P-|ENGINE:SPORT|35000|5000
//! T:03100|VP|#940000
//! T:03400|P+|COLOR:RED|10000|140000
//! ```

use super::types::GarageEvent;
use crate::settings::GarageConfig;
use crate::tuning::{Rgb, TuningCategory, TuningOption, VisualRequest, WheelOption};

fn fmt_option(option: &TuningOption) -> String {
    format!("{}:{}", option.category(), option.name())
}

fn parse_option(s: &str) -> Option<TuningOption> {
    let (category, name) = s.split_once(':')?;
    let category = TuningCategory::from_name(category)?;
    TuningOption::parse(category, name).ok()
}

fn parse_wheels(s: &str) -> Option<WheelOption> {
    match parse_option(&format!("WHEELS:{}", s))? {
        TuningOption::Wheels(wheels) => Some(wheels),
        _ => None,
    }
}

/// Serialize a GarageEvent to compact text format
pub fn serialize_event(time_ms: u32, event: &GarageEvent) -> String {
    let ts = format!("T:{:05}", time_ms % 100000);
    let code = event.type_code();

    let data = match event {
        GarageEvent::SessionStart {
            session_id,
            timestamp,
        } => format!("{}|{}", session_id, timestamp),
        GarageEvent::Config(config) => {
            // Config is serialized as compact JSON for easy parsing
            serde_json::to_string(config).unwrap_or_else(|_| "{}".to_string())
        }
        GarageEvent::SessionReset { budget } => budget.to_string(),
        GarageEvent::CategoryOpened { category } => category.to_string(),
        GarageEvent::OptionPreviewed { option, price } => {
            format!("{}|{}", fmt_option(option), price)
        }
        GarageEvent::PreviewCancelled { option } => fmt_option(option),
        GarageEvent::PurchaseConfirmed {
            option,
            price,
            budget,
        }
        | GarageEvent::PurchaseRejected {
            option,
            price,
            budget,
        } => format!("{}|{}|{}", fmt_option(option), price, budget),
        GarageEvent::AllPartsTuned => "-".to_string(),
        GarageEvent::Visual(VisualRequest::SwapWheels { wheels }) => wheels.as_str().to_string(),
        GarageEvent::Visual(VisualRequest::ShakeBody) => "-".to_string(),
        GarageEvent::Visual(VisualRequest::SetPaint { rgb }) => rgb.to_hex(),
    };

    format!("{}|{}|{}", ts, code, data)
}

/// Parse a line in compact format back to (time_ms, GarageEvent)
pub fn parse_event(line: &str) -> Option<(u32, GarageEvent)> {
    let parts: Vec<&str> = line.trim_end().split('|').collect();
    if parts.len() < 3 {
        return None;
    }

    // Parse timestamp
    let ts_str = parts[0].strip_prefix("T:")?;
    let time_ms: u32 = ts_str.parse().ok()?;

    let code = parts[1];
    let data = &parts[2..];

    let event = match code {
        "SE" if data.len() >= 2 => GarageEvent::SessionStart {
            session_id: data[0].to_string(),
            timestamp: data[1].to_string(),
        },
        "CF" => {
            // Rejoin with | in case the JSON contains one
            let json_str = data.join("|");
            let config: GarageConfig = serde_json::from_str(&json_str).ok()?;
            GarageEvent::Config(config)
        }
        "RS" => GarageEvent::SessionReset {
            budget: data[0].parse().ok()?,
        },
        "CO" => GarageEvent::CategoryOpened {
            category: TuningCategory::from_name(data[0])?,
        },
        "OP" if data.len() >= 2 => GarageEvent::OptionPreviewed {
            option: parse_option(data[0])?,
            price: data[1].parse().ok()?,
        },
        "PC" => GarageEvent::PreviewCancelled {
            option: parse_option(data[0])?,
        },
        "P+" if data.len() >= 3 => GarageEvent::PurchaseConfirmed {
            option: parse_option(data[0])?,
            price: data[1].parse().ok()?,
            budget: data[2].parse().ok()?,
        },
        "P-" if data.len() >= 3 => GarageEvent::PurchaseRejected {
            option: parse_option(data[0])?,
            price: data[1].parse().ok()?,
            budget: data[2].parse().ok()?,
        },
        "AT" => GarageEvent::AllPartsTuned,
        "VW" => GarageEvent::Visual(VisualRequest::SwapWheels {
            wheels: parse_wheels(data[0])?,
        }),
        "VS" => GarageEvent::Visual(VisualRequest::ShakeBody),
        "VP" => GarageEvent::Visual(VisualRequest::SetPaint {
            rgb: Rgb::from_hex(data[0])?,
        }),
        _ => return None,
    };

    Some((time_ms, event))
}
