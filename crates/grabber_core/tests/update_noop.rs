use grabber_core::{update, AppState, Msg};

#[test]
fn update_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn noop_leaves_state_clean() {
    let (mut next, effects) = update(AppState::new(), Msg::NoOp);

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}
