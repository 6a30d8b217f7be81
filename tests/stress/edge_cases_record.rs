//! Edge case tests: truncation, tampering, oversized address lists,
//! and hostile inputs must fail cleanly without panicking.

use prost::Message;

use routing_state::record::pb;
use routing_state::{
    Keypair, Multiaddr, RecordError, RoutingStateBuilder, SignedEnvelope, SignedRoutingState,
    STATE_ENVELOPE_DOMAIN, STATE_ENVELOPE_PAYLOAD_TYPE,
};

fn sample_wire() -> Vec<u8> {
    let kp = Keypair::generate();
    RoutingStateBuilder::new(vec![
        "/ip4/1.2.3.4/tcp/4001".parse().unwrap(),
        "/dns6/example.org/udp/443/quic-v1".parse().unwrap(),
    ])
    .seq(1234)
    .sign(&kp)
    .expect("build should succeed")
    .marshal()
}

// === Truncation ===

#[test]
fn edge_every_proper_prefix_rejected() {
    let wire = sample_wire();
    for len in 0..wire.len() {
        assert!(
            SignedRoutingState::from_bytes(&wire[..len]).is_err(),
            "prefix of length {len} should not authenticate"
        );
    }
}

// === Tampering ===

#[test]
fn edge_every_single_byte_flip_rejected() {
    let wire = sample_wire();
    for i in 0..wire.len() {
        let mut tampered = wire.clone();
        tampered[i] ^= 0x01;
        assert!(
            SignedRoutingState::from_bytes(&tampered).is_err(),
            "flip at byte {i} should not authenticate"
        );
    }
}

#[test]
fn edge_garbage_inputs_rejected() {
    let inputs: Vec<Vec<u8>> = vec![
        vec![],
        vec![0x00],
        vec![0xff; 8],
        vec![0x0a, 0xff, 0xff, 0xff, 0xff, 0x0f],
        b"not a record at all".to_vec(),
    ];
    for input in inputs {
        let err = SignedRoutingState::from_bytes(&input).unwrap_err();
        assert!(
            matches!(err, RecordError::Authentication(_)),
            "garbage {input:?} gave {err:?}"
        );
    }
}

// === Payload edge cases ===

#[test]
fn edge_all_addresses_malformed_yields_empty_list() {
    let kp = Keypair::generate();
    let payload = pb::RoutingStateRecord {
        peer_id: kp.peer_id().to_bytes(),
        seq: 5,
        addresses: vec![
            pb::AddressInfo { multiaddr: vec![] },
            pb::AddressInfo {
                multiaddr: vec![0x06, 0x0f],
            },
        ],
    };
    let wire = SignedEnvelope::seal(
        &kp,
        STATE_ENVELOPE_DOMAIN,
        STATE_ENVELOPE_PAYLOAD_TYPE,
        &payload.encode_to_vec(),
    )
    .unwrap()
    .marshal();

    let record = SignedRoutingState::from_bytes(&wire).expect("record should parse");
    assert!(record.addresses().is_empty());
    assert_eq!(record.seq(), 5);
}

#[test]
fn edge_missing_peer_id_is_malformed() {
    let kp = Keypair::generate();
    let payload = pb::RoutingStateRecord {
        peer_id: vec![],
        seq: 5,
        addresses: vec![],
    };
    let wire = SignedEnvelope::seal(
        &kp,
        STATE_ENVELOPE_DOMAIN,
        STATE_ENVELOPE_PAYLOAD_TYPE,
        &payload.encode_to_vec(),
    )
    .unwrap()
    .marshal();

    assert!(matches!(
        SignedRoutingState::from_bytes(&wire),
        Err(RecordError::MalformedPayload(_))
    ));
}

#[test]
fn edge_large_address_list_roundtrip() {
    let kp = Keypair::generate();
    let addrs: Vec<Multiaddr> = (0..1000u32)
        .map(|i| {
            format!("/ip4/10.{}.{}.{}/tcp/{}", i / 65536, (i / 256) % 256, i % 256, 1000 + i)
                .parse()
                .unwrap()
        })
        .collect();
    let record = SignedRoutingState::make(&kp, addrs.clone()).expect("build should succeed");
    let parsed = SignedRoutingState::from_bytes(&record.marshal()).expect("parse");
    assert_eq!(parsed.addresses(), addrs.as_slice());
    assert_eq!(parsed, record);
}

#[test]
fn edge_self_referencing_p2p_address() {
    let kp = Keypair::generate();
    let addr: Multiaddr = format!("/ip4/1.2.3.4/tcp/4001/p2p/{}", kp.peer_id())
        .parse()
        .unwrap();
    let record = SignedRoutingState::make(&kp, vec![addr.clone()]).expect("build should succeed");
    let parsed = SignedRoutingState::from_bytes(&record.marshal()).expect("parse");
    assert_eq!(parsed.addresses(), &[addr]);
}

#[test]
fn edge_envelope_of_other_record_type_not_misread() {
    // A validly signed envelope in the same domain carrying a different schema
    let kp = Keypair::generate();
    let wire = SignedEnvelope::seal(&kp, STATE_ENVELOPE_DOMAIN, b"/app/chat-message", b"hi there")
        .unwrap()
        .marshal();
    assert!(matches!(
        SignedRoutingState::from_bytes(&wire),
        Err(RecordError::SchemaMismatch { .. })
    ));
}
