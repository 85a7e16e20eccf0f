//! Showroom module - Bevy scene, input, HUD and animations around a
//! `PurchaseFlow` resource

mod driving;
mod effects;
mod hud;
mod input;
mod scene;

pub use driving::*;
pub use effects::*;
pub use hud::*;
pub use input::*;
pub use scene::*;

use bevy::prelude::*;

use crate::events::{GarageEvent, SqliteEventLogger, flush_events_to_sqlite};
use crate::settings::GarageConfig;
use crate::shop::PurchaseFlow;

/// Showroom systems. Expects `GarageConfig` to be inserted; `PurchaseFlow`
/// is built from it if the app did not insert one.
pub struct GaragePlugin;

impl Plugin for GaragePlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<GarageConfig>() {
            app.init_resource::<GarageConfig>();
        }
        if !app.world().contains_resource::<PurchaseFlow>() {
            let config = app.world().resource::<GarageConfig>().clone();
            app.insert_resource(PurchaseFlow::from_config(&config));
        }

        app.init_resource::<ShopMessage>()
            .add_systems(Startup, (start_session, spawn_showroom, spawn_hud))
            // Input -> scene -> log must run in order each frame
            .add_systems(
                Update,
                (
                    update_event_time,
                    shop_input,
                    process_garage_events,
                    flush_events_to_sqlite,
                )
                    .chain(),
            )
            .add_systems(Update, (animate_body_shake, animate_wheel_swap, update_hud))
            .add_systems(FixedUpdate, drive_car);
    }
}

/// Record session start and the config snapshot at the top of the log
fn start_session(
    mut flow: ResMut<PurchaseFlow>,
    config: Res<GarageConfig>,
    logger: Option<Res<SqliteEventLogger>>,
) {
    let session_id = logger
        .as_ref()
        .map(|l| l.session_id().to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    info!("Garage session {} (budget {})", session_id, flow.budget());
    flow.events_mut().emit(GarageEvent::SessionStart {
        session_id,
        timestamp: chrono::Utc::now().to_rfc3339(),
    });
    flow.events_mut().emit(GarageEvent::Config(config.clone()));
}

fn update_event_time(time: Res<Time>, mut flow: ResMut<PurchaseFlow>) {
    flow.events_mut().update_time(time.elapsed_secs());
}
