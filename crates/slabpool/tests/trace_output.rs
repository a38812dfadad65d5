//! Checks the diagnostic events a pool emits through `tracing`.

use std::io;
use std::sync::{Arc, Mutex};

use slabpool::ChunkPool;

/// Collects formatted log lines in memory.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture(level: tracing::Level, f: impl FnOnce()) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    captured.text()
}

#[test]
fn trace_reports_counters_under_label() {
    let out = capture(tracing::Level::INFO, || {
        let mut pool = ChunkPool::with_item_size(16).unwrap();
        let held: Vec<_> = (0..261).map(|_| pool.allocate().unwrap()).collect();
        pool.trace("particles");
        drop(held);
    });
    assert!(out.contains("Mempool particles"), "{out}");
    assert!(out.contains("watermark=261 [4k]"), "{out}");
    assert!(out.contains("current=261"), "{out}");
    assert!(out.contains("size=16"), "{out}");
    assert!(out.contains("nAlloc=261"), "{out}");
    assert!(out.contains("blocks=2"), "{out}");
}

#[test]
fn block_creation_logged_at_debug() {
    let out = capture(tracing::Level::DEBUG, || {
        let mut pool = ChunkPool::with_item_size(2048).unwrap();
        let _a = pool.allocate().unwrap();
        let _b = pool.allocate().unwrap();
        let _c = pool.allocate().unwrap();
    });
    assert_eq!(out.matches("allocated pool block").count(), 2, "{out}");
}

#[test]
fn over_tracking_warns() {
    let out = capture(tracing::Level::WARN, || {
        let mut pool = ChunkPool::with_item_size(8).unwrap();
        assert!(pool.track().is_err());
    });
    assert!(out.contains("no untracked allocations"), "{out}");
}
