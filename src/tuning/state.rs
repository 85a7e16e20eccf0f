//! Preview / confirm / cancel state machine for the car's tuning
//!
//! At most one preview is pending at a time. Previewing a different category
//! first reverts the pending one, so a category can never be left showing an
//! option that was neither confirmed nor cancelled.

use bevy::log::debug;
use serde::{Deserialize, Serialize};

use crate::error::TuningError;
use crate::tuning::physics::{DerivedPhysics, DisplayStats, PhysicsBaseline, derive};
use crate::tuning::types::{Rgb, TuningCategory, TuningOption, TuningSelection, WheelOption};

/// Pending preview: the committed selection it started from plus the single
/// category currently deviating from it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewState {
    pub snapshot_selection: TuningSelection,
    pub category: TuningCategory,
    pub option: TuningOption,
}

/// What the renderer should show for a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualDescriptor {
    pub wheels: WheelOption,
    pub paint: Rgb,
}

impl VisualDescriptor {
    pub fn for_selection(selection: &TuningSelection) -> Self {
        Self {
            wheels: selection.wheels,
            paint: selection.color.rgb(),
        }
    }

    pub fn wheel_mesh(&self) -> &'static str {
        self.wheels.mesh_id()
    }
}

/// Physics and visuals returned to the UI after a preview
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedView {
    pub physics: DerivedPhysics,
    pub visual: VisualDescriptor,
}

/// Fire-and-forget request toward the rendering collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualRequest {
    /// Show the given wheel variant on every mount
    SwapWheels { wheels: WheelOption },
    /// Short corrective rock of the body
    ShakeBody,
    /// Set the body paint material color
    SetPaint { rgb: Rgb },
}

impl VisualRequest {
    /// Requests that accompany installing `option`
    pub fn for_option(option: TuningOption) -> Vec<VisualRequest> {
        match option {
            TuningOption::Wheels(wheels) => {
                let mut requests = vec![VisualRequest::SwapWheels { wheels }];
                if !option.is_stock() {
                    requests.push(VisualRequest::ShakeBody);
                }
                requests
            }
            TuningOption::Engine(_) if !option.is_stock() => vec![VisualRequest::ShakeBody],
            TuningOption::Engine(_) => Vec::new(),
            TuningOption::Color(color) => vec![VisualRequest::SetPaint { rgb: color.rgb() }],
        }
    }
}

/// Committed tuning of one car plus the derived physics for what is shown
#[derive(Debug, Clone)]
pub struct TuningState {
    baseline: PhysicsBaseline,
    selection: TuningSelection,
    derived: DerivedPhysics,
    visual: VisualDescriptor,
    preview: Option<PreviewState>,
    effects: Vec<VisualRequest>,
}

impl TuningState {
    /// Stock car on the given baseline
    pub fn new(baseline: PhysicsBaseline) -> Self {
        let selection = TuningSelection::default();
        Self {
            baseline,
            selection,
            derived: derive(&baseline, &selection),
            visual: VisualDescriptor::for_selection(&selection),
            preview: None,
            effects: Vec::new(),
        }
    }

    /// Show `option` installed in `category` without committing it
    pub fn preview(
        &mut self,
        category: TuningCategory,
        option: TuningOption,
    ) -> Result<DerivedView, TuningError> {
        let option = option.ensure_in(category)?;

        if let Some(pending) = self.preview
            && pending.category != category
        {
            debug!("Preview switched from {} to {}, reverting", pending.category, category);
            self.cancel();
        }

        let snapshot_selection = self
            .preview
            .map(|p| p.snapshot_selection)
            .unwrap_or(self.selection);

        self.preview = Some(PreviewState {
            snapshot_selection,
            category,
            option,
        });
        self.show(snapshot_selection.with(option), option);
        debug!("Previewing {}", option);

        Ok(self.view())
    }

    /// Revert the pending preview's category to its committed option
    pub fn cancel(&mut self) {
        let Some(pending) = self.preview.take() else {
            return;
        };
        let restored = pending.snapshot_selection.get(pending.category);
        self.show(pending.snapshot_selection, restored);
        debug!("Cancelled preview of {}, back to {}", pending.option, restored);
    }

    /// Commit the pending preview. Derived physics already reflect it.
    pub fn confirm(&mut self) {
        let Some(pending) = self.preview.take() else {
            return;
        };
        self.selection.set(pending.option);
        debug_assert_eq!(self.derived, derive(&self.baseline, &self.selection));
        debug!("Committed {}", pending.option);
    }

    /// Back to a stock car with no pending preview
    pub fn reset(&mut self) {
        self.preview = None;
        self.selection = TuningSelection::default();
        self.derived = derive(&self.baseline, &self.selection);
        self.visual = VisualDescriptor::for_selection(&self.selection);
        for category in TuningCategory::ALL {
            self.effects.extend(VisualRequest::for_option(category.stock()));
        }
    }

    fn show(&mut self, effective: TuningSelection, changed: TuningOption) {
        self.derived = derive(&self.baseline, &effective);
        self.visual = VisualDescriptor::for_selection(&effective);
        self.effects.extend(VisualRequest::for_option(changed));
    }

    /// Committed selection
    pub fn current_tuning(&self) -> TuningSelection {
        self.selection
    }

    /// Selection as currently shown, if a preview is pending
    pub fn preview_tuning(&self) -> Option<TuningSelection> {
        self.preview.map(|p| p.snapshot_selection.with(p.option))
    }

    pub fn pending_preview(&self) -> Option<&PreviewState> {
        self.preview.as_ref()
    }

    pub fn is_previewing(&self) -> bool {
        self.preview.is_some()
    }

    pub fn baseline(&self) -> &PhysicsBaseline {
        &self.baseline
    }

    pub fn derived(&self) -> &DerivedPhysics {
        &self.derived
    }

    pub fn view(&self) -> DerivedView {
        DerivedView {
            physics: self.derived,
            visual: self.visual,
        }
    }

    pub fn display_stats(&self) -> DisplayStats {
        self.derived.display_stats()
    }

    /// Visual requests produced since the last drain, oldest first
    pub fn drain_effects(&mut self) -> Vec<VisualRequest> {
        std::mem::take(&mut self.effects)
    }
}

impl Default for TuningState {
    fn default() -> Self {
        Self::new(PhysicsBaseline::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::types::{ColorOption, EngineOption};

    fn all_options() -> Vec<TuningOption> {
        TuningCategory::ALL
            .into_iter()
            .flat_map(|c| c.options())
            .collect()
    }

    #[test]
    fn test_preview_then_cancel_restores_everything() {
        for option in all_options() {
            let mut state = TuningState::default();
            let before_derived = *state.derived();
            let before_tuning = state.current_tuning();
            let before_view = state.view();

            state.preview(option.category(), option).unwrap();
            state.cancel();

            assert_eq!(*state.derived(), before_derived, "{}", option);
            assert_eq!(state.current_tuning(), before_tuning);
            assert_eq!(state.view(), before_view);
            assert!(!state.is_previewing());
        }
    }

    #[test]
    fn test_preview_then_confirm_commits_one_category() {
        for option in all_options() {
            let mut state = TuningState::default();
            let previewed = state.preview(option.category(), option).unwrap();
            state.confirm();

            let tuning = state.current_tuning();
            assert_eq!(tuning.get(option.category()), option);
            for other in TuningCategory::ALL {
                if other != option.category() {
                    assert!(tuning.get(other).is_stock());
                }
            }
            // Confirm keeps exactly what the preview showed
            assert_eq!(*state.derived(), previewed.physics);
            assert_eq!(*state.derived(), derive(state.baseline(), &tuning));
        }
    }

    #[test]
    fn test_preview_is_idempotent() {
        let mut state = TuningState::default();
        let opt = TuningOption::Wheels(WheelOption::Sport);
        let once = state.preview(TuningCategory::Wheels, opt).unwrap();
        let twice = state.preview(TuningCategory::Wheels, opt).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_preview_view_names_wheel_mesh() {
        let mut state = TuningState::default();
        assert_eq!(state.view().visual.wheel_mesh(), "basic_wheel");

        let view = state
            .preview(TuningCategory::Wheels, TuningOption::Wheels(WheelOption::Sport))
            .unwrap();
        assert_eq!(view.visual.wheel_mesh(), "wheels_blade");

        state.cancel();
        assert_eq!(state.view().visual.wheel_mesh(), "basic_wheel");
    }

    #[test]
    fn test_repeated_previews_do_not_compound() {
        let mut state = TuningState::default();
        for _ in 0..5 {
            state
                .preview(TuningCategory::Engine, TuningOption::Engine(EngineOption::Street))
                .unwrap();
            state
                .preview(TuningCategory::Engine, TuningOption::Engine(EngineOption::Sport))
                .unwrap();
        }
        assert!((state.derived().max_speed - 75.0).abs() < 0.001);
        assert!((state.derived().power - 11200.0).abs() < 0.01);
    }

    #[test]
    fn test_switching_category_reverts_previous_preview() {
        let mut state = TuningState::default();
        state
            .preview(TuningCategory::Wheels, TuningOption::Wheels(WheelOption::Sport))
            .unwrap();
        state
            .preview(TuningCategory::Engine, TuningOption::Engine(EngineOption::Street))
            .unwrap();

        // Wheels back to their committed (stock) values
        assert!((state.derived().acceleration - 8.0).abs() < 0.001);
        assert!((state.derived().drag_coefficient - 0.3).abs() < 0.001);
        assert_eq!(state.view().visual.wheels, WheelOption::Stock);

        state.confirm();
        let tuning = state.current_tuning();
        assert_eq!(tuning.wheels, WheelOption::Stock);
        assert_eq!(tuning.engine, EngineOption::Street);
    }

    #[test]
    fn test_cancel_and_confirm_without_preview_are_noops() {
        let mut state = TuningState::default();
        state.cancel();
        state.confirm();
        state.cancel();
        assert!(state.current_tuning().is_stock());
        assert!(state.drain_effects().is_empty());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut state = TuningState::default();
        state
            .preview(TuningCategory::Color, TuningOption::Color(ColorOption::Red))
            .unwrap();
        state.cancel();
        let after_first = state.view();
        state.drain_effects();
        state.cancel();
        assert_eq!(state.view(), after_first);
        assert!(state.drain_effects().is_empty());
    }

    #[test]
    fn test_invalid_pairing_changes_nothing() {
        let mut state = TuningState::default();
        let err = state
            .preview(TuningCategory::Engine, TuningOption::Color(ColorOption::Red))
            .unwrap_err();
        assert!(matches!(err, TuningError::InvalidOption { .. }));
        assert!(!state.is_previewing());
        assert!(state.drain_effects().is_empty());
    }

    #[test]
    fn test_cancel_reverts_to_committed_not_stock() {
        let mut state = TuningState::default();
        state
            .preview(TuningCategory::Wheels, TuningOption::Wheels(WheelOption::Basic))
            .unwrap();
        state.confirm();
        let committed = *state.derived();

        state
            .preview(TuningCategory::Wheels, TuningOption::Wheels(WheelOption::Sport))
            .unwrap();
        state.cancel();

        assert_eq!(*state.derived(), committed);
        assert_eq!(state.view().visual.wheels, WheelOption::Basic);
    }

    #[test]
    fn test_preview_tuning_reflects_pending_option() {
        let mut state = TuningState::default();
        assert_eq!(state.preview_tuning(), None);
        state
            .preview(TuningCategory::Color, TuningOption::Color(ColorOption::Orange))
            .unwrap();
        let shown = state.preview_tuning().unwrap();
        assert_eq!(shown.color, ColorOption::Orange);
        assert_eq!(state.current_tuning().color, ColorOption::Stock);
    }

    #[test]
    fn test_effects_for_preview_and_revert() {
        let mut state = TuningState::default();
        state
            .preview(TuningCategory::Wheels, TuningOption::Wheels(WheelOption::Street))
            .unwrap();
        assert_eq!(
            state.drain_effects(),
            vec![
                VisualRequest::SwapWheels { wheels: WheelOption::Street },
                VisualRequest::ShakeBody,
            ]
        );

        state.cancel();
        assert_eq!(
            state.drain_effects(),
            vec![VisualRequest::SwapWheels { wheels: WheelOption::Stock }]
        );

        state
            .preview(TuningCategory::Color, TuningOption::Color(ColorOption::MatteBlack))
            .unwrap();
        assert_eq!(
            state.drain_effects(),
            vec![VisualRequest::SetPaint { rgb: ColorOption::MatteBlack.rgb() }]
        );
    }

    #[test]
    fn test_reset_returns_to_stock() {
        let mut state = TuningState::default();
        state
            .preview(TuningCategory::Engine, TuningOption::Engine(EngineOption::Sport))
            .unwrap();
        state.confirm();
        state
            .preview(TuningCategory::Color, TuningOption::Color(ColorOption::Red))
            .unwrap();
        state.drain_effects();

        state.reset();
        assert!(state.current_tuning().is_stock());
        assert!(!state.is_previewing());
        assert_eq!(*state.derived(), derive(state.baseline(), &TuningSelection::default()));
        let effects = state.drain_effects();
        assert!(effects.contains(&VisualRequest::SwapWheels { wheels: WheelOption::Stock }));
        assert!(effects.contains(&VisualRequest::SetPaint { rgb: ColorOption::Stock.rgb() }));
    }
}
