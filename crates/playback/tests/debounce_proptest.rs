//! Property tests for the release-edge debouncer.
#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use platform::ChannelId;
use playback::Debouncer;
use proptest::prelude::*;

/// A run of identical samples: `(channel or none, length in ms)`.
fn runs() -> impl Strategy<Value = Vec<(Option<u8>, u64)>> {
    prop::collection::vec((prop::option::of(1u8..=3), 1u64..120), 0..40)
}

/// Join neighbouring runs of the same sample; the debouncer sees them as one.
fn merge(runs: &[(Option<u8>, u64)]) -> Vec<(Option<u8>, u64)> {
    let mut merged: Vec<(Option<u8>, u64)> = Vec::new();
    for &(sample, len) in runs {
        match merged.last_mut() {
            Some((last, total)) if *last == sample => *total += len,
            _ => merged.push((sample, len)),
        }
    }
    merged
}

fn feed(d: &mut Debouncer, runs: &[(Option<u8>, u64)]) -> (Vec<ChannelId>, u64) {
    let mut t = 0u64;
    let mut events = Vec::new();
    for (sample, len) in runs {
        let sample = sample.map(ChannelId::new);
        for _ in 0..*len {
            if let Some(ev) = d.poll(sample, t) {
                events.push(ev.0);
            }
            t += 1;
        }
    }
    (events, t)
}

proptest! {
    /// No event without a press held for the full window.
    #[test]
    fn short_runs_never_emit(runs in prop::collection::vec((prop::option::of(1u8..=3), 1u64..50), 0..60)) {
        // Every reading changes between runs, so none lasts the window.
        let mut runs = runs;
        runs.dedup_by(|a, b| a.0 == b.0);
        let mut d = Debouncer::default();
        let (events, _) = feed(&mut d, &runs);
        prop_assert!(events.is_empty());
    }

    /// A press split across neighbouring runs counts once.
    #[test]
    fn split_press_counts_as_one(channel in 1u8..=3, first in 1u64..50, second in 1u64..50) {
        let runs = [(None, 10), (Some(channel), first), (Some(channel), second), (None, 100)];
        let mut d = Debouncer::default();
        let (events, _) = feed(&mut d, &runs);
        let expected = usize::from(first + second > 50);
        prop_assert_eq!(events.len(), expected);
    }

    /// Every event is preceded by a press of that channel lasting at least
    /// the window and at most one event follows each such press.
    #[test]
    fn events_never_exceed_long_presses(runs in runs()) {
        let mut d = Debouncer::default();
        let (events, _) = feed(&mut d, &runs);
        let long_presses = merge(&runs)
            .iter()
            .filter(|(s, len)| s.is_some() && *len >= 50)
            .count();
        prop_assert!(events.len() <= long_presses);
    }

    /// After a long quiet tail the debouncer is idle.
    #[test]
    fn settles_to_idle(runs in runs()) {
        let mut d = Debouncer::default();
        let (_, t) = feed(&mut d, &runs);
        for dt in 0..60 {
            d.poll(None, t + dt);
        }
        prop_assert_eq!(d.stable(), None);
        prop_assert_eq!(d.poll(None, t + 60), None);
    }

    /// A clean press and release of any length over the window emits exactly
    /// one event naming that channel.
    #[test]
    fn clean_press_emits_once(channel in 1u8..=9, held in 50u64..5_000) {
        let mut d = Debouncer::default();
        let runs = [(None, 10), (Some(channel), held), (None, 100)];
        let (events, _) = feed(&mut d, &runs);
        prop_assert_eq!(events, vec![ChannelId::new(channel)]);
    }
}
