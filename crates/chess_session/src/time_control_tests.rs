use super::*;
use std::thread;

#[test]
fn test_time_control_expiry() {
    let tc = TimeControl::new(Some(Duration::from_millis(10)));
    tc.start();
    assert!(!tc.is_stopped());

    // Wait for time to expire
    thread::sleep(Duration::from_millis(20));
    assert!(tc.check_time());
    assert!(tc.is_stopped());
    assert_eq!(tc.remaining(), Some(Duration::ZERO));
}

#[test]
fn test_time_control_no_limit() {
    let tc = TimeControl::new(None);
    tc.start();
    thread::sleep(Duration::from_millis(10));
    assert!(!tc.check_time());
    assert!(!tc.is_stopped());
    assert_eq!(tc.remaining(), None);
}

#[test]
fn test_time_control_not_started() {
    let tc = TimeControl::new(Some(Duration::from_millis(1)));
    thread::sleep(Duration::from_millis(5));
    assert_eq!(tc.elapsed(), Duration::ZERO);
    assert!(!tc.check_time());
}

#[test]
fn test_time_control_manual_stop() {
    let tc = TimeControl::new(None);
    tc.start();
    assert!(!tc.is_stopped());
    tc.stop();
    assert!(tc.is_stopped());
    assert!(tc.check_time());
}

#[test]
fn test_restart_clears_stop() {
    let tc = TimeControl::new(Some(Duration::from_secs(60)));
    tc.start();
    tc.stop();
    tc.start();
    assert!(!tc.is_stopped());
    assert!(tc.remaining().unwrap() > Duration::from_secs(59));
}

#[test]
fn test_clones_share_the_flag() {
    let tc = TimeControl::new(None);
    let worker = tc.clone();
    thread::spawn(move || worker.stop()).join().unwrap();
    assert!(tc.is_stopped());
}
