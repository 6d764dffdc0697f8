//! Handler for the model selector popup (presets only).

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::widgets::ListState;

use crate::core::models::{self, ModelPreset, filter_presets};
use crate::core::persistence;

use super::super::app::{App, ModelSelectorState};
use super::HandleResult;

/// Action to apply after handling a model selector key.
pub(crate) enum ModelSelectorAction {
    Close,
    Select(&'static ModelPreset),
    /// No action; keep the selector open.
    Keep,
}

/// Handle key when model selector is open. Returns action to apply; caller applies to app.
pub(crate) fn handle_model_selector_key(
    key_code: KeyCode,
    key_modifiers: KeyModifiers,
    selector: &mut ModelSelectorState,
) -> ModelSelectorAction {
    // Filter input
    match key_code {
        KeyCode::Backspace => {
            selector.filter.pop();
        }
        KeyCode::Char(c) if !key_modifiers.contains(KeyModifiers::CONTROL) => {
            selector.filter.push(c);
        }
        _ => {}
    }

    let filtered = filter_presets(models::presets(), &selector.filter);
    match key_code {
        KeyCode::Esc => ModelSelectorAction::Close,
        KeyCode::Up => {
            selector.selected_index = selector.selected_index.saturating_sub(1);
            ModelSelectorAction::Keep
        }
        KeyCode::Down => {
            if !filtered.is_empty() {
                selector.selected_index =
                    (selector.selected_index + 1).min(filtered.len().saturating_sub(1));
            }
            ModelSelectorAction::Keep
        }
        KeyCode::Enter => match filtered.get(selector.selected_index) {
            Some(&preset) => ModelSelectorAction::Select(preset),
            None => ModelSelectorAction::Keep,
        },
        KeyCode::Backspace | KeyCode::Char(_) => {
            selector.selected_index = selector
                .selected_index
                .min(filtered.len().saturating_sub(1));
            ModelSelectorAction::Keep
        }
        _ => ModelSelectorAction::Keep,
    }
}

/// Open the model selector with the current model highlighted.
pub(crate) fn open_model_selector(app: &mut App) {
    let selected_index = models::presets()
        .iter()
        .position(|p| p.id == app.current_model_id)
        .unwrap_or(0);
    app.model_selector = Some(ModelSelectorState {
        selected_index,
        list_state: ListState::default(),
        filter: String::new(),
    });
}

/// Handle key when model selector popup is open.
pub(super) fn handle_model_selector(
    key_code: KeyCode,
    modifiers: KeyModifiers,
    app: &mut App,
) -> HandleResult {
    let Some(selector) = app.model_selector.as_mut() else {
        return HandleResult::Continue;
    };
    match handle_model_selector_key(key_code, modifiers, selector) {
        ModelSelectorAction::Close => app.model_selector = None,
        ModelSelectorAction::Select(preset) => {
            log::info!("Model changed to {}", preset.id);
            app.current_model_id = preset.id.clone();
            app.model_name = preset.name.clone();
            if let Err(e) = persistence::save_last_model(&preset.id) {
                log::warn!("Could not remember model {}: {}", preset.id, e);
            }
            app.model_selector = None;
        }
        ModelSelectorAction::Keep => {}
    }
    HandleResult::Continue
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> ModelSelectorState {
        ModelSelectorState {
            selected_index: 0,
            list_state: ListState::default(),
            filter: String::new(),
        }
    }

    #[test]
    fn enter_selects_highlighted_preset() {
        let mut s = selector();
        handle_model_selector_key(KeyCode::Down, KeyModifiers::empty(), &mut s);
        match handle_model_selector_key(KeyCode::Enter, KeyModifiers::empty(), &mut s) {
            ModelSelectorAction::Select(p) => assert_eq!(p.id, models::presets()[1].id),
            _ => panic!("expected a selection"),
        }
    }

    #[test]
    fn down_stops_at_last_preset() {
        let mut s = selector();
        for _ in 0..20 {
            handle_model_selector_key(KeyCode::Down, KeyModifiers::empty(), &mut s);
        }
        assert_eq!(s.selected_index, models::presets().len() - 1);
    }

    #[test]
    fn typing_filters_and_clamps_selection() {
        let mut s = selector();
        s.selected_index = 3;
        for c in "zzzz-no-such-model".chars() {
            handle_model_selector_key(KeyCode::Char(c), KeyModifiers::empty(), &mut s);
        }
        assert_eq!(s.selected_index, 0);
        assert!(matches!(
            handle_model_selector_key(KeyCode::Enter, KeyModifiers::empty(), &mut s),
            ModelSelectorAction::Keep
        ));
    }

    #[test]
    fn esc_closes() {
        let mut s = selector();
        assert!(matches!(
            handle_model_selector_key(KeyCode::Esc, KeyModifiers::empty(), &mut s),
            ModelSelectorAction::Close
        ));
    }
}
