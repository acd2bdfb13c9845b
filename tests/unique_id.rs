//! Unique ID allocation
//!
//! The instance counter is process-wide, so this file holds a single test
//! and nothing else may construct a streamer in this binary.

use txstreamer_rs::backend::RecordingBackend;
use txstreamer_rs::config::StreamArgs;
use txstreamer_rs::{GraphNode, TxStreamer};

#[test]
fn test_sequential_ids() {
    let ids: Vec<String> = (0..3)
        .map(|_| {
            TxStreamer::new(StreamArgs::default(), RecordingBackend::new())
                .unwrap()
                .unique_id()
                .to_string()
        })
        .collect();

    assert_eq!(ids, vec!["TxStreamer#0", "TxStreamer#1", "TxStreamer#2"]);
}
