//! Unique IDs of streamers built from several threads at once
//!
//! Kept apart from `unique_id.rs`, whose test expects the counter to start
//! at zero.

use std::collections::HashSet;
use std::thread;
use txstreamer_rs::backend::RecordingBackend;
use txstreamer_rs::config::StreamArgs;
use txstreamer_rs::{GraphNode, TxStreamer};

const THREADS: usize = 8;
const PER_THREAD: usize = 16;

#[test]
fn test_concurrent_ids_are_distinct() {
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            thread::spawn(|| {
                (0..PER_THREAD)
                    .map(|_| {
                        TxStreamer::new(StreamArgs::default(), RecordingBackend::new())
                            .unwrap()
                            .unique_id()
                            .to_string()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let ids: Vec<String> = handles
        .into_iter()
        .flat_map(|h| h.join().expect("streamer thread panicked"))
        .collect();
    let distinct: HashSet<&String> = ids.iter().collect();

    assert_eq!(ids.len(), THREADS * PER_THREAD);
    assert_eq!(distinct.len(), ids.len());
    assert!(ids.iter().all(|id| id.starts_with("TxStreamer#")));

    // Every counter value in the range was handed out exactly once.
    let mut numbers: Vec<u64> = ids
        .iter()
        .map(|id| id["TxStreamer#".len()..].parse().unwrap())
        .collect();
    numbers.sort_unstable();
    assert_eq!(numbers, (0..(THREADS * PER_THREAD) as u64).collect::<Vec<_>>());
}
