//! Property tests for TTL expiry and overwrite semantics.

#![allow(clippy::unwrap_used)]

use bytes::Bytes;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use statsgames_cache::{CacheConfig, ManualClock, TtlCache};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const TTL_SECS: u64 = 300;

#[derive(Debug, Clone)]
enum Op {
    Set(u8, u8),
    Get(u8),
    Advance(u64),
    Purge,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..4, any::<u8>()).prop_map(|(k, v)| Op::Set(k, v)),
        (0u8..4).prop_map(Op::Get),
        (0u64..400).prop_map(Op::Advance),
        Just(Op::Purge),
    ]
}

fn cache_with_clock() -> (TtlCache<u8, Bytes>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let config = CacheConfig::new().with_ttl(Duration::from_secs(TTL_SECS));
    let cache = TtlCache::with_clock(config, clock.clone()).unwrap();
    (cache, clock)
}

proptest! {
    /// Reads agree with a model that stores (value, written_at) and treats
    /// an entry as gone once `TTL_SECS` have elapsed since the write.
    #[test]
    fn prop_get_matches_absolute_ttl_model(ops in prop::collection::vec(op(), 1..64)) {
        let (cache, clock) = cache_with_clock();
        let mut model: HashMap<u8, (u8, u64)> = HashMap::new();
        let mut now = 0u64;

        for op in ops {
            match op {
                Op::Set(k, v) => {
                    cache.set(k, Bytes::from(vec![v]));
                    model.insert(k, (v, now));
                }
                Op::Get(k) => {
                    let expected = model
                        .get(&k)
                        .filter(|(_, written)| now - written < TTL_SECS)
                        .map(|(v, _)| Bytes::from(vec![*v]));
                    prop_assert_eq!(cache.get(&k), expected);
                }
                Op::Advance(secs) => {
                    clock.advance(Duration::from_secs(secs));
                    now += secs;
                }
                Op::Purge => {
                    cache.purge_expired();
                }
            }
        }
    }

    /// Stored payloads come back byte for byte.
    #[test]
    fn prop_payload_is_returned_unchanged(payload in prop::collection::vec(any::<u8>(), 0..512)) {
        let (cache, _clock) = cache_with_clock();
        cache.set(1, Bytes::from(payload.clone()));
        prop_assert_eq!(cache.get(&1).map(|b| b.to_vec()), Some(payload));
    }
}

#[test]
fn test_reads_do_not_extend_lifetime() {
    let (cache, clock) = cache_with_clock();
    cache.set(7, Bytes::from_static(b"{\"name\":\"Ash\"}"));

    for _ in 0..5 {
        clock.advance(Duration::from_secs(59));
        assert!(cache.get(&7).is_some());
    }

    clock.advance(Duration::from_secs(5));
    assert_eq!(cache.get(&7), None);
}
