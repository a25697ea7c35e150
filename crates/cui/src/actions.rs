use crate::app::App;
use crate::input::InputAction;
use pacerace_core::PromptError;

/// Applies one key to the active prompt. Returns the answer once the prompt
/// is resolved.
pub fn dispatch(app: &mut App, action: InputAction) -> Option<Result<usize, PromptError>> {
    match action {
        InputAction::None => None,
        InputAction::Interrupt => {
            app.prompt = None;
            Some(Err(PromptError::Interrupted))
        }
        InputAction::Previous => {
            app.move_cursor(false);
            None
        }
        InputAction::Next => {
            app.move_cursor(true);
            None
        }
        InputAction::Pick(index) => {
            if app.point_at(index) {
                app.confirm().map(Ok)
            } else {
                None
            }
        }
        InputAction::Confirm => app.confirm().map(Ok),
    }
}
