use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pacerace_core::PromptLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Interrupt,
    Previous,
    Next,
    Confirm,
    /// Zero-based option index typed as a digit.
    Pick(usize),
}

/// Vertical prompts move with Up/Down (or k/j), horizontal prompts with
/// Left/Right (or h/l).
pub fn map_key(key: KeyEvent, layout: PromptLayout) -> InputAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return InputAction::Interrupt;
    }
    match (layout, key.code) {
        (_, KeyCode::Esc | KeyCode::Char('q')) => InputAction::Interrupt,
        (_, KeyCode::Enter | KeyCode::Char(' ')) => InputAction::Confirm,
        (_, KeyCode::Char(digit @ '1'..='9')) => {
            InputAction::Pick(digit as usize - '1' as usize)
        }
        (PromptLayout::Vertical, KeyCode::Up | KeyCode::Char('k')) => InputAction::Previous,
        (PromptLayout::Vertical, KeyCode::Down | KeyCode::Char('j')) => InputAction::Next,
        (PromptLayout::Horizontal, KeyCode::Left | KeyCode::Char('h')) => InputAction::Previous,
        (PromptLayout::Horizontal, KeyCode::Right | KeyCode::Char('l')) => InputAction::Next,
        _ => InputAction::None,
    }
}
