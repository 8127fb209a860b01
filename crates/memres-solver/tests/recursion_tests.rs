use super::*;

#[test]
fn test_enter_and_leave_track_depth() {
    let mut guard = PathGuard::new(10, 100);
    assert_eq!(guard.enter(DefId(1)), PathStep::Entered);
    assert_eq!(guard.enter(DefId(2)), PathStep::Entered);
    assert_eq!(guard.depth(), 2);
    guard.leave(DefId(2));
    guard.leave(DefId(1));
    assert_eq!(guard.depth(), 0);
}

#[test]
fn test_classifier_on_path_is_cycle() {
    let mut guard = PathGuard::new(10, 100);
    guard.enter(DefId(1));
    guard.enter(DefId(2));
    assert_eq!(guard.enter(DefId(1)), PathStep::Cycle);
    assert_eq!(guard.depth(), 2);
    guard.leave(DefId(2));
    guard.leave(DefId(1));
}

#[test]
fn test_diamond_reenters_after_leave() {
    let mut guard = PathGuard::new(10, 100);
    for _ in 0..2 {
        assert_eq!(guard.enter(DefId(3)), PathStep::Entered);
        guard.leave(DefId(3));
    }
}

#[test]
fn test_depth_and_step_limits() {
    let mut guard = PathGuard::new(2, 100);
    guard.enter(DefId(1));
    guard.enter(DefId(2));
    assert_eq!(guard.enter(DefId(3)), PathStep::LimitExceeded);
    assert_eq!(guard.max_depth(), 2);
    guard.leave(DefId(2));
    guard.leave(DefId(1));

    let mut guard = PathGuard::new(10, 2);
    guard.enter(DefId(1));
    guard.leave(DefId(1));
    guard.enter(DefId(2));
    guard.leave(DefId(2));
    assert_eq!(guard.enter(DefId(3)), PathStep::LimitExceeded);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "PathGuard dropped with 1 classifiers still on the path")]
fn test_dropping_unbalanced_guard_panics() {
    let mut guard = PathGuard::new(10, 100);
    guard.enter(DefId(1));
}
