//! Concurrency test: records are shared read-only across threads and
//! parsed in parallel with consistent results.

use std::sync::{Arc, Mutex};
use std::thread;

use routing_state::{Keypair, Multiaddr, RoutingStateBuilder, SignedRoutingState};

#[test]
fn stress_shared_record_parsed_by_50_threads() {
    let kp = Keypair::generate();
    let addrs: Vec<Multiaddr> = vec![
        "/ip4/1.2.3.4/tcp/4001".parse().unwrap(),
        "/ip4/1.2.3.4/udp/4001/quic-v1".parse().unwrap(),
    ];
    let record = Arc::new(SignedRoutingState::make(&kp, addrs).expect("build should succeed"));
    let wire = Arc::new(record.marshal());

    let mut handles = Vec::new();
    for _ in 0..50 {
        let record = Arc::clone(&record);
        let wire = Arc::clone(&wire);
        handles.push(thread::spawn(move || {
            for _ in 0..20 {
                let parsed = SignedRoutingState::from_bytes(&wire).expect("parse should succeed");
                assert_eq!(&parsed, record.as_ref());
                assert_eq!(parsed.marshal(), *wire);
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }
}

#[test]
fn stress_concurrent_signers_distinct_peers() {
    let records = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for thread_id in 0..16u64 {
        let records = Arc::clone(&records);
        handles.push(thread::spawn(move || {
            let kp = Keypair::generate();
            for i in 0..25u64 {
                let addr: Multiaddr = format!("/ip4/10.0.{thread_id}.{i}/tcp/4001")
                    .parse()
                    .unwrap();
                let record = RoutingStateBuilder::new(vec![addr])
                    .seq(i)
                    .sign(&kp)
                    .expect("signing should succeed");
                records.lock().unwrap().push(record.marshal());
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }

    let records = records.lock().unwrap();
    assert_eq!(records.len(), 400);

    let mut peers = std::collections::HashSet::new();
    for bytes in records.iter() {
        let record = SignedRoutingState::from_bytes(bytes).expect("record should verify");
        assert!(record.peer_id().matches_public_key(record.envelope().public_key()));
        peers.insert(record.peer_id().clone());
    }
    assert_eq!(peers.len(), 16);
}
