use super::*;
use morel_diagnostic::catch_fatal;
use pretty_assertions::assert_eq;

#[test]
fn index_zero_is_reserved() {
    let mut heap = Heap::new();
    assert!(heap.is_empty());
    let cell = heap.alloc_cell(0, &[Word::from_int(7)]);
    assert_ne!(cell.body_bits(), 0);
    assert_eq!(heap.field(cell, 0).as_int(), 7);
}

#[test]
fn growth_relocates_and_advances_epoch() {
    let mut heap = Heap::with_config(HeapConfig {
        initial_words: 4,
        ..HeapConfig::default()
    });
    let first = heap.alloc_cell(0, &[Word::from_int(1), Word::from_int(2)]);
    assert_eq!(heap.epoch(), 0);
    let second = heap.alloc_cell(0, &[Word::from_int(3), Word::from_int(4)]);
    assert_eq!(heap.epoch(), 1);
    assert!(heap.capacity() >= 8);
    // Words survive the move.
    assert_eq!(heap.field(first, 1).as_int(), 2);
    assert_eq!(heap.field(second, 0).as_int(), 3);
}

#[test]
fn stress_mode_relocates_on_every_allocation() {
    let mut heap = Heap::with_config(HeapConfig {
        relocate_every_alloc: true,
        ..HeapConfig::default()
    });
    for i in 0..10 {
        heap.alloc_cell(0, &[Word::from_int(i)]);
    }
    assert_eq!(heap.epoch(), 10);
}

#[test]
fn stale_views_are_fatal() {
    let mut heap = Heap::with_config(HeapConfig {
        relocate_every_alloc: true,
        ..HeapConfig::default()
    });
    let cell = heap.alloc_cell(0, &[Word::from_int(1)]);
    let view = heap.view(cell);
    heap.alloc(1);
    let err = catch_fatal(|| heap.slot(view, 0)).unwrap_err();
    assert_eq!(err.context.kind, FatalKind::Unreachable);
    assert!(err.message.contains("epoch"), "{}", err.message);

    let fresh = heap.view(cell);
    assert_eq!(heap.slot(fresh, 0).as_int(), 1);
}

#[test]
fn reads_outside_the_space_are_fatal() {
    let heap = Heap::new();
    let bogus = Word::tagged(1 << 20, 0);
    let err = catch_fatal(|| heap.field(bogus, 0)).unwrap_err();
    assert_eq!(err.context.kind, FatalKind::Metadata);
    assert!(catch_fatal(|| heap.field(Word::ZERO, 0)).is_err());
}
