//! Stress test: clock-based sequence numbers order records in time.

use std::thread;
use std::time::Duration;

use routing_state::{latest, Keypair, RoutingStateBuilder, SignedRoutingState};

#[test]
fn stress_sequential_builds_increase() {
    let kp = Keypair::generate();
    let mut previous = SignedRoutingState::make(&kp, vec![]).expect("build should succeed");

    for i in 0..100 {
        // Distinct timestamps: nanosecond clocks advance across a sleep
        thread::sleep(Duration::from_micros(50));
        let next = SignedRoutingState::make(&kp, vec![]).expect("build should succeed");
        assert!(
            next.seq() > previous.seq(),
            "build {i}: seq {} not after {}",
            next.seq(),
            previous.seq()
        );
        assert!(next.supersedes(&previous));
        previous = next;
    }
}

#[test]
fn stress_latest_over_many_records() {
    let kp = Keypair::generate();
    let records: Vec<SignedRoutingState> = (0..500u64)
        .map(|i| {
            // Scramble the order so the newest is somewhere in the middle
            let seq = (i * 7919) % 500;
            RoutingStateBuilder::new(vec![])
                .seq(seq)
                .sign(&kp)
                .expect("build should succeed")
        })
        .collect();

    let newest = latest(&records).expect("non-empty");
    assert_eq!(newest.seq(), 499);
    assert!(records
        .iter()
        .filter(|r| r.seq() != 499)
        .all(|r| newest.supersedes(r)));
}

#[test]
fn stress_explicit_counter_survives_roundtrip() {
    let kp = Keypair::generate();
    for seq in [0u64, 1, 127, 128, 16_383, 16_384, u32::MAX as u64, u64::MAX] {
        let record = RoutingStateBuilder::new(vec![])
            .seq(seq)
            .sign(&kp)
            .expect("build should succeed");
        let parsed = SignedRoutingState::from_bytes(&record.marshal()).expect("parse");
        assert_eq!(parsed.seq(), seq);
    }
}
