use std::{cell::Cell, rc::Rc};

use glitter_ngin::{
    allocator::{AlignmentSource, ByteAllocator},
    cgmath::{Matrix4, SquareMatrix},
    data_structures::uniform::{PerDrawRecord, SharedFrameRecord},
};

mod common;

struct CountingSource {
    alignment: u32,
    queries: Rc<Cell<u32>>,
}

impl AlignmentSource for CountingSource {
    fn uniform_offset_alignment(&self) -> u32 {
        self.queries.set(self.queries.get() + 1);
        self.alignment
    }
}

fn record(opacity: f32) -> PerDrawRecord {
    PerDrawRecord::new(Matrix4::identity(), opacity)
}

#[test]
fn offsets_and_size_stay_aligned() {
    let mut allocator = ByteAllocator::new(common::ALIGNMENT);
    let shared_record: SharedFrameRecord = bytemuck::Zeroable::zeroed();
    let shared = allocator.push(&shared_record);
    assert_eq!(shared, 0);
    for i in 1..=5u64 {
        let offset = allocator.push(&record(1.0));
        assert_eq!(offset, i * 256);
        assert_eq!(allocator.size() % 256, 0);
    }
    assert_eq!(allocator.size(), 6 * 256);
}

#[test]
fn push_returns_offset_of_written_bytes() {
    let mut allocator = ByteAllocator::new(64u32);
    allocator.push(&record(1.0));
    let offset = allocator.push(&record(0.25)) as usize;
    assert_eq!(offset, 128);
    let stored: PerDrawRecord =
        bytemuck::pod_read_unaligned(&allocator.data()[offset..offset + PerDrawRecord::SIZE as usize]);
    assert_eq!(stored.opacity, 0.25);
    // padding between records is zeroed
    assert!(allocator.data()[80..128].iter().all(|&b| b == 0));
}

#[test]
fn clear_resets_size_and_keeps_capacity() {
    let mut allocator = ByteAllocator::new(common::ALIGNMENT);
    for _ in 0..16 {
        allocator.push(&record(1.0));
    }
    let capacity = allocator.capacity();
    allocator.clear();

    assert_eq!(allocator.size(), 0);
    assert!(allocator.is_empty());
    assert_eq!(allocator.capacity(), capacity);
    assert_eq!(allocator.push(&record(1.0)), 0);
}

#[test]
fn zero_alignment_packs_tightly() {
    let mut allocator = ByteAllocator::new(0u32);
    assert_eq!(allocator.alignment(), 1);
    assert_eq!(allocator.push(&record(1.0)), 0);
    assert_eq!(allocator.push(&record(1.0)), PerDrawRecord::SIZE);
}

#[test]
fn alignment_is_queried_once_and_lazily() {
    let queries = Rc::new(Cell::new(0));
    let mut allocator = ByteAllocator::new(CountingSource {
        alignment: 32,
        queries: queries.clone(),
    });
    assert_eq!(queries.get(), 0);

    for _ in 0..4 {
        allocator.push(&record(1.0));
    }
    allocator.clear();
    allocator.push(&record(1.0));

    assert_eq!(allocator.alignment(), 32);
    assert_eq!(queries.get(), 1);
}

#[test]
fn record_layouts_match_the_shader() {
    assert_eq!(SharedFrameRecord::SIZE, 176);
    assert_eq!(PerDrawRecord::SIZE, 80);

    let bytes = bytemuck::bytes_of(&record(0.5)).to_vec();
    assert_eq!(&bytes[64..68], &0.5f32.to_ne_bytes());
}
