//! End-to-end pool workloads: block reuse, growth, and content retention.

use slabpool::{ChunkHandle, ChunkPool, PoolConfig, PoolError, SizeClassAllocator};
use slabpool_test_utils::fixtures::{pattern_byte, sixteen_byte_scenario, SCENARIO_ITEM_SIZE};

#[test]
fn sixteen_byte_scenario_checkpoints() {
    let mut pool = ChunkPool::with_item_size(SCENARIO_ITEM_SIZE).unwrap();
    assert_eq!(pool.chunks_per_block(), 256);
    let mut live: Vec<ChunkHandle> = Vec::new();

    for (step, checkpoint) in sixteen_byte_scenario().into_iter().enumerate() {
        for _ in 0..checkpoint.allocate {
            live.push(pool.allocate().unwrap());
        }
        for _ in 0..checkpoint.release {
            pool.release(live.pop()).unwrap();
        }
        assert_eq!(pool.current(), checkpoint.expect_current, "step {step}");
        assert_eq!(pool.peak(), checkpoint.expect_peak, "step {step}");
        assert_eq!(pool.block_count(), checkpoint.expect_blocks, "step {step}");
    }
    assert_eq!(pool.lifetime(), 271);
}

#[test]
fn refill_after_full_drain_stays_in_one_block() {
    let mut pool = ChunkPool::with_item_size(16).unwrap();
    let count = pool.chunks_per_block();

    let first: Vec<_> = (0..count).map(|_| pool.allocate().unwrap()).collect();
    let mut first_indices: Vec<u32> = first.iter().map(ChunkHandle::index).collect();
    for h in first {
        pool.release(Some(h)).unwrap();
    }
    assert_eq!(pool.current(), 0);
    assert_eq!(pool.free_count(), count);

    let second: Vec<_> = (0..count).map(|_| pool.allocate().unwrap()).collect();
    let mut second_indices: Vec<u32> = second.iter().map(ChunkHandle::index).collect();
    assert_eq!(pool.block_count(), 1);

    first_indices.sort_unstable();
    second_indices.sort_unstable();
    assert_eq!(first_indices, second_indices);
}

#[test]
fn count_plus_one_makes_exactly_two_blocks() {
    for item_size in [1, 7, 16, 100, 4096, 5000] {
        let mut pool = ChunkPool::with_item_size(item_size).unwrap();
        let count = pool.chunks_per_block();
        let _held: Vec<_> = (0..=count).map(|_| pool.allocate().unwrap()).collect();
        assert_eq!(pool.block_count(), 2, "item_size {item_size}");
    }
}

#[test]
fn released_contents_are_left_in_place_or_poisoned() {
    let mut pool = ChunkPool::with_item_size(40).unwrap();
    let h = pool.allocate().unwrap();
    let index = h.index();
    for (i, byte) in pool.chunk_mut(&h).unwrap().iter_mut().enumerate() {
        *byte = pattern_byte(index, i);
    }
    pool.release(Some(h)).unwrap();

    let h = pool.allocate().unwrap();
    assert_eq!(h.index(), index);
    let bytes = pool.chunk(&h).unwrap();
    if cfg!(debug_assertions) {
        assert!(bytes.iter().all(|&b| b == 0xFE));
    } else {
        assert!(bytes
            .iter()
            .enumerate()
            .all(|(i, &b)| b == pattern_byte(index, i)));
    }
}

#[test]
fn live_data_survives_other_traffic() {
    let mut pool = ChunkPool::with_item_size(32).unwrap();
    let keep: Vec<_> = (0..300).map(|_| pool.allocate().unwrap()).collect();
    for h in &keep {
        let index = h.index();
        for (i, byte) in pool.chunk_mut(h).unwrap().iter_mut().enumerate() {
            *byte = pattern_byte(index, i);
        }
    }

    // Churn: allocate and release a batch while `keep` stays live.
    for _ in 0..5 {
        let churn: Vec<_> = (0..200).map(|_| pool.allocate().unwrap()).collect();
        for h in churn {
            pool.release(Some(h)).unwrap();
        }
    }

    for h in &keep {
        let index = h.index();
        let bytes = pool.chunk(h).unwrap();
        assert!(bytes
            .iter()
            .enumerate()
            .all(|(i, &b)| b == pattern_byte(index, i)));
    }
    assert_eq!(pool.current(), 300);
    assert_eq!(pool.peak(), 500);
}

#[test]
fn bounded_pool_recovers_after_release() {
    let mut pool = ChunkPool::new(PoolConfig::new(512).with_max_blocks(2)).unwrap();
    let mut held: Vec<_> = (0..16).map(|_| pool.allocate().unwrap()).collect();
    assert!(matches!(
        pool.allocate(),
        Err(PoolError::CapacityExceeded { max_blocks: 2 })
    ));
    pool.release(held.pop()).unwrap();
    held.push(pool.allocate().unwrap());
    assert_eq!(pool.block_count(), 2);
}

#[test]
fn size_classes_share_nothing() {
    let mut alloc = SizeClassAllocator::from_sizes(&[8, 64, 512]).unwrap();
    let handles: Vec<_> = [1usize, 8, 9, 64, 65, 512]
        .iter()
        .map(|&len| alloc.allocate(len).unwrap())
        .collect();

    for (n, h) in handles.iter().enumerate() {
        alloc.chunk_mut(h).unwrap().fill(n as u8);
    }
    for (n, h) in handles.iter().enumerate() {
        assert!(alloc.chunk(h).unwrap().iter().all(|&b| b == n as u8));
    }

    let sizes: Vec<usize> = handles
        .iter()
        .map(|h| alloc.chunk(h).unwrap().len())
        .collect();
    assert_eq!(sizes, vec![8, 8, 64, 64, 512, 512]);

    for h in handles {
        alloc.release(Some(h)).unwrap();
    }
}
