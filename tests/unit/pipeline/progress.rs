use super::*;

#[test]
fn new_counter_reads_zero() {
    let p = Progress::new();
    assert_eq!(p.snapshot(), ProgressSnapshot::default());
    assert_eq!(p.fraction(), 0.0);
    assert!(!p.snapshot().is_complete());
}

#[test]
fn clones_share_state() {
    let p = Progress::new();
    let reader = p.clone();
    p.start(4);
    p.set_processed(1);
    assert_eq!(
        reader.snapshot(),
        ProgressSnapshot {
            processed: 1,
            total: 4
        }
    );
    assert_eq!(reader.fraction(), 0.25);
    p.set_processed(4);
    assert!(reader.snapshot().is_complete());
}

#[test]
fn start_resets_processed() {
    let p = Progress::new();
    p.start(10);
    p.set_processed(7);
    p.start(3);
    assert_eq!(p.snapshot().processed, 0);
    assert_eq!(p.snapshot().total, 3);
}

#[test]
fn large_totals_do_not_bleed_into_processed() {
    let p = Progress::new();
    p.start(u32::MAX);
    p.set_processed(u32::MAX - 1);
    let s = p.snapshot();
    assert_eq!(s.total, u64::from(u32::MAX));
    assert_eq!(s.processed, u64::from(u32::MAX - 1));
}

#[test]
fn reader_thread_sees_monotonic_values() {
    let p = Progress::new();
    p.start(500);
    let reader = p.clone();
    let handle = std::thread::spawn(move || {
        let mut last = 0;
        loop {
            let s = reader.snapshot();
            assert!(s.processed >= last);
            assert_eq!(s.total, 500);
            last = s.processed;
            if s.is_complete() {
                break;
            }
            std::thread::yield_now();
        }
    });
    for i in 1..=500 {
        p.set_processed(i);
    }
    handle.join().unwrap();
}
