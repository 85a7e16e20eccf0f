//! Budget-gated purchase flow
//!
//! `PurchaseFlow` is the tuning session: it owns the car's `TuningState`,
//! the budget, the ledger of purchased categories and the UI phase, and it
//! drives previews through to a purchase or a revert.
//!
//! ```text
//! Idle --select_category--> Browsing --select_option--> Previewing
//!   ^                                                       |
//!   +--- confirm (paid, category locked) / confirm (too  ---+
//!        expensive, reverted) / cancel / switch category
//! ```

use bevy::prelude::*;

use crate::error::TuningError;
use crate::events::{EventBus, GarageEvent};
use crate::settings::GarageConfig;
use crate::shop::ledger::{Budget, PurchaseLedger, Receipt};
use crate::shop::prices::PriceTable;
use crate::tuning::{
    DerivedView, DisplayStats, PhysicsBaseline, TuningCategory, TuningOption, TuningSelection,
    TuningState,
};

/// Candidate waiting for the player to confirm or cancel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPurchase {
    pub option: TuningOption,
    pub price: u64,
}

impl PendingPurchase {
    pub fn category(&self) -> TuningCategory {
        self.option.category()
    }
}

/// Where the shop UI is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowPhase {
    /// No category open
    #[default]
    Idle,
    /// Option panel for a category is open, nothing previewed
    Browsing(TuningCategory),
    /// An option is shown on the car, waiting for confirm/cancel
    Previewing(PendingPurchase),
}

impl FlowPhase {
    /// Category whose panel is open
    pub fn category(&self) -> Option<TuningCategory> {
        match self {
            FlowPhase::Idle => None,
            FlowPhase::Browsing(category) => Some(*category),
            FlowPhase::Previewing(pending) => Some(pending.category()),
        }
    }
}

/// One car's tuning session
#[derive(Resource, Debug, Clone)]
pub struct PurchaseFlow {
    tuning: TuningState,
    prices: PriceTable,
    starting_budget: u64,
    budget: Budget,
    ledger: PurchaseLedger,
    phase: FlowPhase,
    events: EventBus,
}

impl PurchaseFlow {
    /// Stock car with the default price table
    pub fn new(baseline: PhysicsBaseline, starting_budget: u64) -> Self {
        Self {
            tuning: TuningState::new(baseline),
            prices: PriceTable::default(),
            starting_budget,
            budget: Budget::new(starting_budget),
            ledger: PurchaseLedger::default(),
            phase: FlowPhase::Idle,
            events: EventBus::new(),
        }
    }

    pub fn with_prices(mut self, prices: PriceTable) -> Self {
        self.prices = prices;
        self
    }

    pub fn from_config(config: &GarageConfig) -> Self {
        Self::new(config.baseline, config.starting_budget).with_prices(config.prices)
    }

    /// Open a category's option panel. Switching away from another category
    /// reverts whatever was being previewed there.
    pub fn select_category(&mut self, category: TuningCategory) -> Result<(), TuningError> {
        if self.ledger.contains(category) {
            debug!("{} is locked, not opening", category);
            return Err(TuningError::CategoryLocked(category));
        }

        match self.phase {
            FlowPhase::Previewing(pending) if pending.category() == category => return Ok(()),
            FlowPhase::Previewing(pending) => {
                self.tuning.cancel();
                self.flush_effects();
                self.events
                    .emit(GarageEvent::PreviewCancelled { option: pending.option });
            }
            _ => {}
        }

        self.phase = FlowPhase::Browsing(category);
        self.events.emit(GarageEvent::CategoryOpened { category });
        Ok(())
    }

    /// Preview `option` and remember it as the purchase candidate
    pub fn select_option(
        &mut self,
        category: TuningCategory,
        option: TuningOption,
    ) -> Result<DerivedView, TuningError> {
        if self.ledger.contains(category) {
            return Err(TuningError::CategoryLocked(category));
        }
        let option = option.ensure_in(category)?;

        if self.phase.category() != Some(category) {
            self.select_category(category)?;
        }

        let price = self.prices.price(option);
        let view = self.tuning.preview(category, option)?;
        self.flush_effects();

        self.phase = FlowPhase::Previewing(PendingPurchase { option, price });
        self.events
            .emit(GarageEvent::OptionPreviewed { option, price });
        Ok(view)
    }

    /// Buy the pending candidate if the budget covers it, otherwise revert it.
    /// Returns `Ok(None)` when nothing is pending.
    pub fn confirm_selection(&mut self) -> Result<Option<Receipt>, TuningError> {
        let FlowPhase::Previewing(pending) = self.phase else {
            return Ok(None);
        };
        self.phase = FlowPhase::Idle;

        match self.budget.debit(pending.price) {
            Ok(balance) => {
                self.tuning.confirm();
                let receipt = Receipt {
                    option: pending.option,
                    price: pending.price,
                    budget_after: balance,
                };
                self.ledger.record(receipt);
                self.events.emit(GarageEvent::PurchaseConfirmed {
                    option: pending.option,
                    price: pending.price,
                    budget: balance,
                });
                info!(
                    "Bought {} for {} ({} left)",
                    pending.option, pending.price, balance
                );

                if self.ledger.is_complete() {
                    info!("All parts tuned, let's ride!");
                    self.events.emit(GarageEvent::AllPartsTuned);
                }
                Ok(Some(receipt))
            }
            Err(err) => {
                self.tuning.cancel();
                self.flush_effects();
                self.events.emit(GarageEvent::PurchaseRejected {
                    option: pending.option,
                    price: pending.price,
                    budget: self.budget.balance(),
                });
                warn!("{}", err);
                Err(err)
            }
        }
    }

    /// Revert any preview and close the option panel
    pub fn cancel_selection(&mut self) {
        self.tuning.cancel();
        self.flush_effects();
        if let FlowPhase::Previewing(pending) = self.phase {
            self.events
                .emit(GarageEvent::PreviewCancelled { option: pending.option });
        }
        self.phase = FlowPhase::Idle;
    }

    /// Start over: stock car, starting budget, nothing purchased
    pub fn reset(&mut self) {
        self.tuning.reset();
        self.flush_effects();
        self.budget = Budget::new(self.starting_budget);
        self.ledger.clear();
        self.phase = FlowPhase::Idle;
        self.events.emit(GarageEvent::SessionReset {
            budget: self.starting_budget,
        });
        info!("Garage session reset (budget {})", self.starting_budget);
    }

    fn flush_effects(&mut self) {
        let effects = self.tuning.drain_effects();
        self.events
            .emit_all(effects.into_iter().map(GarageEvent::Visual));
    }

    // === Queries ===

    pub fn tuning(&self) -> &TuningState {
        &self.tuning
    }

    pub fn current_tuning(&self) -> TuningSelection {
        self.tuning.current_tuning()
    }

    pub fn display_stats(&self) -> DisplayStats {
        self.tuning.display_stats()
    }

    pub fn budget(&self) -> u64 {
        self.budget.balance()
    }

    pub fn starting_budget(&self) -> u64 {
        self.starting_budget
    }

    pub fn ledger(&self) -> &PurchaseLedger {
        &self.ledger
    }

    pub fn is_locked(&self, category: TuningCategory) -> bool {
        self.ledger.contains(category)
    }

    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    pub fn pending(&self) -> Option<PendingPurchase> {
        match self.phase {
            FlowPhase::Previewing(pending) => Some(pending),
            _ => None,
        }
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    /// Price of `option` in `category`; Stock is free
    pub fn price_of(
        &self,
        category: TuningCategory,
        option: TuningOption,
    ) -> Result<u64, TuningError> {
        Ok(self.prices.price(option.ensure_in(category)?))
    }

    /// Every category purchased; the car may drive off
    pub fn ready_to_ride(&self) -> bool {
        self.ledger.is_complete()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }
}

impl Default for PurchaseFlow {
    fn default() -> Self {
        Self::from_config(&GarageConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{ColorOption, EngineOption, VisualRequest, WheelOption};

    const RED: TuningOption = TuningOption::Color(ColorOption::Red);
    const ORANGE: TuningOption = TuningOption::Color(ColorOption::Orange);
    const ENGINE_SPORT: TuningOption = TuningOption::Engine(EngineOption::Sport);
    const ENGINE_STREET: TuningOption = TuningOption::Engine(EngineOption::Street);
    const WHEELS_SPORT: TuningOption = TuningOption::Wheels(WheelOption::Sport);

    fn event_names(flow: &mut PurchaseFlow) -> Vec<&'static str> {
        flow.events_mut()
            .drain()
            .iter()
            .map(|e| e.event.name())
            .collect()
    }

    #[test]
    fn test_buy_red_paint_then_locked() {
        let mut flow = PurchaseFlow::new(PhysicsBaseline::default(), 150_000);
        flow.select_category(TuningCategory::Color).unwrap();
        flow.select_option(TuningCategory::Color, RED).unwrap();
        let receipt = flow.confirm_selection().unwrap().unwrap();

        assert_eq!(receipt.price, 10_000);
        assert_eq!(flow.budget(), 140_000);
        assert_eq!(flow.ledger().categories(), vec![TuningCategory::Color]);
        assert_eq!(flow.current_tuning().color, ColorOption::Red);
        assert_eq!(flow.phase(), FlowPhase::Idle);

        let err = flow.select_option(TuningCategory::Color, ORANGE).unwrap_err();
        assert_eq!(err, TuningError::CategoryLocked(TuningCategory::Color));
        assert_eq!(flow.current_tuning().color, ColorOption::Red);
        assert_eq!(flow.budget(), 140_000);
    }

    #[test]
    fn test_insufficient_funds_reverts() {
        let mut flow = PurchaseFlow::new(PhysicsBaseline::default(), 5_000);
        let stock = *flow.tuning().derived();

        flow.select_option(TuningCategory::Engine, ENGINE_SPORT).unwrap();
        assert!((flow.tuning().derived().max_speed - 75.0).abs() < 0.001);

        let err = flow.confirm_selection().unwrap_err();
        assert_eq!(err, TuningError::InsufficientFunds { price: 35_000, budget: 5_000 });
        assert_eq!(flow.budget(), 5_000);
        assert!(flow.ledger().is_empty());
        assert_eq!(flow.current_tuning().engine, EngineOption::Stock);
        assert_eq!(*flow.tuning().derived(), stock);
        assert!(!flow.tuning().is_previewing());
        assert_eq!(flow.phase(), FlowPhase::Idle);
    }

    #[test]
    fn test_confirm_without_candidate_is_noop() {
        let mut flow = PurchaseFlow::default();
        assert_eq!(flow.confirm_selection(), Ok(None));

        flow.select_category(TuningCategory::Wheels).unwrap();
        assert_eq!(flow.confirm_selection(), Ok(None));
        assert_eq!(flow.phase(), FlowPhase::Browsing(TuningCategory::Wheels));
        assert_eq!(flow.budget(), 150_000);
    }

    #[test]
    fn test_cancel_selection_reverts_preview() {
        let mut flow = PurchaseFlow::default();
        flow.select_option(TuningCategory::Wheels, WHEELS_SPORT).unwrap();
        flow.cancel_selection();

        assert_eq!(flow.phase(), FlowPhase::Idle);
        assert!(flow.current_tuning().is_stock());
        assert!((flow.tuning().derived().acceleration - 8.0).abs() < 0.001);
        assert_eq!(flow.budget(), 150_000);
    }

    #[test]
    fn test_switching_category_reverts_preview() {
        let mut flow = PurchaseFlow::default();
        flow.select_option(TuningCategory::Wheels, WHEELS_SPORT).unwrap();
        flow.select_category(TuningCategory::Engine).unwrap();

        assert_eq!(flow.phase(), FlowPhase::Browsing(TuningCategory::Engine));
        assert_eq!(flow.tuning().view().visual.wheels, WheelOption::Stock);

        flow.select_option(TuningCategory::Engine, ENGINE_STREET).unwrap();
        flow.confirm_selection().unwrap();
        assert_eq!(flow.current_tuning().wheels, WheelOption::Stock);
        assert_eq!(flow.current_tuning().engine, EngineOption::Street);
        assert_eq!(flow.budget(), 130_000);
    }

    #[test]
    fn test_select_option_in_other_category_switches() {
        let mut flow = PurchaseFlow::default();
        flow.select_option(TuningCategory::Wheels, WHEELS_SPORT).unwrap();
        flow.select_option(TuningCategory::Engine, ENGINE_STREET).unwrap();

        let pending = flow.pending().unwrap();
        assert_eq!(pending.option, ENGINE_STREET);
        assert_eq!(pending.price, 20_000);
        assert_eq!(flow.tuning().view().visual.wheels, WheelOption::Stock);
    }

    #[test]
    fn test_reselect_same_category_keeps_preview() {
        let mut flow = PurchaseFlow::default();
        flow.select_option(TuningCategory::Color, RED).unwrap();
        flow.select_category(TuningCategory::Color).unwrap();
        assert_eq!(flow.pending().map(|p| p.option), Some(RED));
    }

    #[test]
    fn test_locked_category_cannot_be_opened() {
        let mut flow = PurchaseFlow::default();
        flow.select_option(TuningCategory::Color, RED).unwrap();
        flow.confirm_selection().unwrap();

        assert_eq!(
            flow.select_category(TuningCategory::Color),
            Err(TuningError::CategoryLocked(TuningCategory::Color))
        );
        assert_eq!(flow.phase(), FlowPhase::Idle);
    }

    #[test]
    fn test_locked_check_wins_over_invalid_option() {
        let mut flow = PurchaseFlow::default();
        flow.select_option(TuningCategory::Engine, ENGINE_STREET).unwrap();
        flow.confirm_selection().unwrap();

        let err = flow.select_option(TuningCategory::Engine, RED).unwrap_err();
        assert_eq!(err, TuningError::CategoryLocked(TuningCategory::Engine));
    }

    #[test]
    fn test_invalid_option_leaves_state() {
        let mut flow = PurchaseFlow::default();
        flow.select_option(TuningCategory::Color, RED).unwrap();
        flow.events_mut().drain();

        let err = flow.select_option(TuningCategory::Wheels, ORANGE).unwrap_err();
        assert!(matches!(err, TuningError::InvalidOption { .. }));
        assert_eq!(flow.pending().map(|p| p.option), Some(RED));
        assert!(!flow.events().has_pending());
    }

    #[test]
    fn test_stock_is_free_and_locks() {
        let mut flow = PurchaseFlow::new(PhysicsBaseline::default(), 0);
        flow.select_option(TuningCategory::Wheels, TuningCategory::Wheels.stock())
            .unwrap();
        let receipt = flow.confirm_selection().unwrap().unwrap();
        assert_eq!(receipt.price, 0);
        assert!(flow.is_locked(TuningCategory::Wheels));
    }

    #[test]
    fn test_all_parts_tuned() {
        let mut flow = PurchaseFlow::default();
        for option in [WHEELS_SPORT, RED, ENGINE_SPORT] {
            assert!(!flow.ready_to_ride());
            flow.select_option(option.category(), option).unwrap();
            flow.confirm_selection().unwrap();
        }
        assert!(flow.ready_to_ride());
        assert_eq!(flow.budget(), 150_000 - 25_000 - 10_000 - 35_000);
        assert_eq!(event_names(&mut flow).last(), Some(&"AllPartsTuned"));
    }

    #[test]
    fn test_ledger_never_shrinks_on_failures() {
        let mut flow = PurchaseFlow::new(PhysicsBaseline::default(), 12_000);
        flow.select_option(TuningCategory::Color, RED).unwrap();
        flow.confirm_selection().unwrap();

        flow.select_option(TuningCategory::Engine, ENGINE_SPORT).unwrap();
        assert!(flow.confirm_selection().is_err());
        flow.select_option(TuningCategory::Wheels, WHEELS_SPORT).unwrap();
        flow.cancel_selection();

        assert_eq!(flow.ledger().categories(), vec![TuningCategory::Color]);
        assert_eq!(flow.budget(), 2_000);
    }

    #[test]
    fn test_event_sequence_for_purchase() {
        let mut flow = PurchaseFlow::default();
        flow.select_category(TuningCategory::Wheels).unwrap();
        flow.select_option(TuningCategory::Wheels, WHEELS_SPORT).unwrap();
        flow.confirm_selection().unwrap();

        assert_eq!(
            event_names(&mut flow),
            vec![
                "CategoryOpened",
                "SwapWheels",
                "ShakeBody",
                "OptionPreviewed",
                "PurchaseConfirmed",
            ]
        );
    }

    #[test]
    fn test_rejection_emits_revert_visuals() {
        let mut flow = PurchaseFlow::new(PhysicsBaseline::default(), 0);
        flow.select_option(TuningCategory::Color, RED).unwrap();
        flow.events_mut().drain();

        assert!(flow.confirm_selection().is_err());
        let events: Vec<GarageEvent> = flow.events_mut().drain().into_iter().map(|e| e.event).collect();
        assert_eq!(
            events,
            vec![
                GarageEvent::Visual(VisualRequest::SetPaint { rgb: ColorOption::Stock.rgb() }),
                GarageEvent::PurchaseRejected { option: RED, price: 10_000, budget: 0 },
            ]
        );
    }

    #[test]
    fn test_reset() {
        let mut flow = PurchaseFlow::default();
        flow.select_option(TuningCategory::Color, RED).unwrap();
        flow.confirm_selection().unwrap();
        flow.select_option(TuningCategory::Engine, ENGINE_SPORT).unwrap();

        flow.reset();
        assert_eq!(flow.budget(), 150_000);
        assert!(flow.ledger().is_empty());
        assert!(flow.current_tuning().is_stock());
        assert!(!flow.tuning().is_previewing());
        assert_eq!(flow.phase(), FlowPhase::Idle);
        assert!(flow.select_option(TuningCategory::Color, ORANGE).is_ok());
    }

    #[test]
    fn test_price_of() {
        let flow = PurchaseFlow::default();
        assert_eq!(flow.price_of(TuningCategory::Engine, ENGINE_SPORT), Ok(35_000));
        assert_eq!(flow.price_of(TuningCategory::Color, TuningCategory::Color.stock()), Ok(0));
        assert!(flow.price_of(TuningCategory::Wheels, RED).is_err());
    }

    #[test]
    fn test_custom_prices() {
        let mut prices = PriceTable::default();
        prices.color.red = 1;
        let mut flow = PurchaseFlow::new(PhysicsBaseline::default(), 1).with_prices(prices);
        flow.select_option(TuningCategory::Color, RED).unwrap();
        assert!(flow.confirm_selection().is_ok());
        assert_eq!(flow.budget(), 0);
    }
}
