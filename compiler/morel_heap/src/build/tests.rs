use super::*;
use morel_diagnostic::catch_fatal;
use morel_rtti::{FunctorSpec, PseudoTypeInfo, TypeDefinition, TypeTableBuilder};
use pretty_assertions::assert_eq;

#[test]
fn strings_are_nul_terminated_and_packed() {
    let mut heap = Heap::new();
    let before = heap.len();
    let s = heap.alloc_string("abcdefgh");
    // Eight bytes fill a word, so the terminator needs a second one.
    assert_eq!(heap.len() - before, 2);
    assert_eq!(heap.string(s), "abcdefgh");

    let empty = heap.alloc_string("");
    assert_eq!(heap.string_bytes(empty), b"");
}

#[test]
fn string_order_is_strcmp() {
    let mut heap = Heap::new();
    let abc = heap.alloc_string("abc");
    let abd = heap.alloc_string("abd");
    let ab = heap.alloc_string("ab");
    let high = heap.alloc_string("\u{e9}");
    let abc2 = heap.alloc_string("abc");
    assert_eq!(heap.compare_strings(abc, abd), Ordering::Less);
    assert_eq!(heap.compare_strings(ab, abc), Ordering::Less);
    assert_eq!(heap.compare_strings(abc, abc2), Ordering::Equal);
    // Bytes compare unsigned.
    assert_eq!(heap.compare_strings(high, abc), Ordering::Greater);
}

#[test]
fn type_infos_load_back() {
    let table = TypeTableBuilder::new().finish().unwrap();
    let ti = table
        .type_info(
            TypeCtorId::ARRAY,
            vec![TypeInfo::tuple(vec![TypeInfo::int(), TypeInfo::string()])],
        )
        .unwrap();
    let mut heap = Heap::new();
    let word = heap.alloc_type_info(&ti);
    assert_eq!(heap.load_type_info(word, &table), ti);

    let bogus = heap.alloc_cell(0, &[Word::from_raw(900), Word::ZERO]);
    assert!(catch_fatal(|| heap.load_type_info(bogus, &table)).is_err());
}

#[test]
fn type_ctor_descs_load_back() {
    let mut heap = Heap::new();
    let desc = TypeCtorDesc {
        ctor: TypeCtorId::TUPLE,
        arity: 3,
    };
    let word = heap.alloc_type_ctor_desc(desc);
    assert_eq!(heap.load_type_ctor_desc(word), desc);
    assert_eq!(
        Heap::load_type_ctor_info(Heap::type_ctor_info_word(TypeCtorId::FLOAT)),
        TypeCtorId::FLOAT
    );
}

#[test]
fn closures_and_arrays() {
    let mut heap = Heap::new();
    let c = heap.alloc_closure(ClosureId::from_raw(4), &[Word::from_int(10), Word::from_int(11)]);
    assert_eq!(heap.closure_layout(c), ClosureId::from_raw(4));
    assert_eq!(heap.closure_hidden_count(c), 2);
    assert_eq!(heap.closure_hidden(c, 1).as_int(), 11);

    let a = heap.alloc_array(&[Word::from_int(1), Word::from_int(2)]);
    assert_eq!(heap.array_elems(a), [Word::from_int(1), Word::from_int(2)]);
}

fn shapes() -> (TypeTable, TypeCtorId) {
    let mut b = TypeTableBuilder::new().with_primary_tag_count(2).unwrap();
    let id = b.declare("test", "shape", 0).unwrap();
    let int = || PseudoTypeInfo::from(TypeInfo::int());
    b.define(
        id,
        TypeDefinition::Du(vec![
            FunctorSpec::new("dot", vec![]),
            FunctorSpec::new("circle", vec![int()]),
            FunctorSpec::new("rect", vec![int(), int()]),
        ]),
    )
    .unwrap();
    (b.finish().unwrap(), id)
}

#[test]
fn construct_follows_tag_placement() {
    let (table, id) = shapes();
    let info = table.ctor(id).unwrap();
    let mut heap = Heap::new();

    let dot = heap.construct(info, 0, &[]).unwrap();
    assert_eq!(dot, Word::local(0, 0));

    // Two primary tags: constants on 0, everything else shares 1 remotely.
    let rect = heap
        .construct(info, 2, &[Word::from_int(3), Word::from_int(4)])
        .unwrap();
    assert_eq!(rect.ptag(), 1);
    assert_eq!(heap.field(rect, 0).raw(), 1);
    assert_eq!(heap.field(rect, 2).as_int(), 4);
}

#[test]
fn construct_rejects_bad_requests() {
    let (table, id) = shapes();
    let info = table.ctor(id).unwrap();
    let mut heap = Heap::new();
    assert_eq!(
        heap.construct(info, 1, &[]),
        Err(HeapError::SlotCount {
            ctor: "test.shape/0".into(),
            functor: "circle".into(),
            expected: 1,
            found: 0,
        })
    );
    assert!(matches!(
        heap.construct(info, 7, &[]),
        Err(HeapError::NoSuchFunctor { ordinal: 7, .. })
    ));
    let int = table.ctor(TypeCtorId::INT).unwrap();
    assert!(matches!(
        heap.construct(int, 0, &[]),
        Err(HeapError::NotConstructible(_))
    ));
}
