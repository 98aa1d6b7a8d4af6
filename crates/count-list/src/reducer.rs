use crate::actions::Action;
use crate::state::AppState;

/// Reducer - pure function that produces new state from current state + action
pub fn reduce(mut state: AppState, action: &Action) -> AppState {
    match action {
        Action::Up => state.low += 1,
        Action::Down => state.high -= 1,
        Action::Random(seed) => {
            if !state.palette.is_empty() {
                let index = (*seed % state.palette.len() as u64) as usize;
                state.color = state.palette[index].clone();
                log::debug!("Picked color {}", state.color);
            }
        }
        Action::Noop => {}
    }
    state
}
