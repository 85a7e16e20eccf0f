//! HUD components and systems (budget, stats, shop panel)

use bevy::prelude::*;

use crate::constants::MESSAGE_SECS;
use crate::shop::{FlowPhase, PurchaseFlow};
use crate::tuning::TuningCategory;

/// Main HUD text component
#[derive(Component)]
pub struct HudText;

/// Short-lived feedback line (purchases, rejections, locked categories)
#[derive(Resource, Default)]
pub struct ShopMessage {
    pub text: String,
    pub timer: f32,
}

impl ShopMessage {
    pub fn show(&mut self, text: String) {
        info!("{}", text);
        self.text = text;
        self.timer = MESSAGE_SECS;
    }
}

pub fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
        HudText,
    ));
}

/// Option panel for the open category, with prices
fn option_panel(flow: &PurchaseFlow, category: TuningCategory) -> String {
    let pending = flow.pending().map(|p| p.option);
    let installed = flow.current_tuning().get(category);
    let keys = ["Q", "W", "E", "R"];

    category
        .options()
        .iter()
        .zip(keys)
        .map(|(&option, key)| {
            let marker = if Some(option) == pending {
                ">"
            } else if option == installed {
                "*"
            } else {
                " "
            };
            let price = flow.price_of(category, option).unwrap_or(0);
            format!("{} [{}] {:<12} {:>6}", marker, key, option.name(), price)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn update_hud(
    time: Res<Time>,
    flow: Res<PurchaseFlow>,
    mut message: ResMut<ShopMessage>,
    mut text_query: Query<&mut Text, With<HudText>>,
) {
    if message.timer > 0.0 {
        message.timer = (message.timer - time.delta_secs()).max(0.0);
    }

    let Ok(mut text) = text_query.single_mut() else {
        return;
    };

    let stats = flow.display_stats();
    let categories = TuningCategory::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let state = if flow.is_locked(*c) { " (bought)" } else { "" };
            format!("[{}] {}{}", i + 1, c, state)
        })
        .collect::<Vec<_>>()
        .join("   ");

    let panel = match flow.phase() {
        FlowPhase::Idle => "Pick a category".to_string(),
        FlowPhase::Browsing(category) => option_panel(&flow, category),
        FlowPhase::Previewing(pending) => format!(
            "{}\n[Enter] buy for {}   [Esc] cancel",
            option_panel(&flow, pending.category()),
            pending.price
        ),
    };

    let footer = if flow.ready_to_ride() {
        "[Up] drive   [Backspace] start over"
    } else {
        "[Backspace] start over"
    };

    let status = if message.timer > 0.0 {
        message.text.as_str()
    } else {
        ""
    };

    text.0 = format!(
        "Budget: {}\nSpeed: {} km/h  |  0-100: {}  |  {} hp\n\n{}\n\n{}\n\n{}\n{}",
        flow.budget(),
        stats.speed_kmh,
        stats.zero_to_hundred,
        stats.horse_power,
        categories,
        panel,
        status,
        footer,
    );
}
