//! Keyboard input for the shop

use bevy::prelude::*;

use crate::shop::PurchaseFlow;
use crate::tuning::TuningCategory;

use super::hud::ShopMessage;

const CATEGORY_KEYS: [(KeyCode, TuningCategory); 3] = [
    (KeyCode::Digit1, TuningCategory::Wheels),
    (KeyCode::Digit2, TuningCategory::Color),
    (KeyCode::Digit3, TuningCategory::Engine),
];

/// Q/W/E/R pick the open category's options in table order (Stock first)
const OPTION_KEYS: [KeyCode; 4] = [KeyCode::KeyQ, KeyCode::KeyW, KeyCode::KeyE, KeyCode::KeyR];

/// Runs in Update: maps key presses to purchase flow operations.
/// Confirm/reject feedback arrives through the event bus; only refusals that
/// emit no event are reported here.
pub fn shop_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut flow: ResMut<PurchaseFlow>,
    mut message: ResMut<ShopMessage>,
) {
    for (key, category) in CATEGORY_KEYS {
        if keyboard.just_pressed(key)
            && let Err(e) = flow.select_category(category)
        {
            message.show(e.to_string());
        }
    }

    for (index, key) in OPTION_KEYS.into_iter().enumerate() {
        if !keyboard.just_pressed(key) {
            continue;
        }
        let Some(category) = flow.phase().category() else {
            message.show("Pick a category first (1/2/3)".to_string());
            continue;
        };
        let option = category.options()[index];
        if let Err(e) = flow.select_option(category, option) {
            message.show(e.to_string());
        }
    }

    if keyboard.just_pressed(KeyCode::Enter) {
        // Receipts and rejections are announced by process_garage_events
        if let Err(e) = flow.confirm_selection() {
            debug!("Confirm rejected: {}", e);
        }
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        flow.cancel_selection();
    }

    if keyboard.just_pressed(KeyCode::Backspace) {
        flow.reset();
    }
}
