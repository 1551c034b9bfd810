//! Shared descriptor table and value builders.

#![allow(dead_code, reason = "each test binary uses a subset")]

use std::cmp::Ordering;
use std::sync::Arc;

use morel_heap::{Heap, Word};
use morel_rtti::{
    ClosureId, ExistSpec, FunctorSpec, ProcRef, PseudoTypeInfo, TypeCtorId, TypeDefinition,
    TypeInfo, TypeTableBuilder,
};
use morel_unify::{Engine, Runtime, RuntimeOptions};

pub struct Fixture {
    pub runtime: Runtime,
    /// `dot | circle(int) | rect(int, int) | label(string)`
    pub shape: TypeCtorId,
    /// `[] | [T | list(T)]`
    pub list: TypeCtorId,
    /// No-tag wrapper around `int`.
    pub meters: TypeCtorId,
    /// Equivalence for `list(int)`.
    pub int_list: TypeCtorId,
    /// `pair(int, int)`, equal and ordered as an unordered pair.
    pub pair: TypeCtorId,
    /// `blur | sharp(int)`, user equality that accepts anything, no ordering.
    pub fuzzy: TypeCtorId,
    /// `some(T)` for an existential `T`.
    pub anything: TypeCtorId,
    /// `shown(T)` with `T`'s type info inside a typeclass info.
    pub shown: TypeCtorId,
    /// `leaf(int) | node(tree, tree)`
    pub tree: TypeCtorId,
    pub mystery: TypeCtorId,
    pub inc: ClosureId,
    pub add: ClosureId,
}

pub fn ordering_word(ordering: Ordering) -> Word {
    Word::from_raw(match ordering {
        Ordering::Equal => 0,
        Ordering::Less => 1,
        Ordering::Greater => 2,
    })
}

pub fn fixture() -> Fixture {
    fixture_with(RuntimeOptions::default())
}

pub fn fixture_with(options: RuntimeOptions) -> Fixture {
    let int = || PseudoTypeInfo::from(TypeInfo::int());
    let mut b = TypeTableBuilder::new();

    let shape = b.declare("geometry", "shape", 0).unwrap();
    b.define(
        shape,
        TypeDefinition::Du(vec![
            FunctorSpec::new("dot", vec![]),
            FunctorSpec::new("circle", vec![int()]),
            FunctorSpec::new("rect", vec![int(), int()]),
            FunctorSpec::new("label", vec![TypeInfo::string().into()]),
        ]),
    )
    .unwrap();

    let list = b.declare("list", "list", 1).unwrap();
    b.define(
        list,
        TypeDefinition::Du(vec![
            FunctorSpec::new("[]", vec![]),
            FunctorSpec::new(
                "[|]",
                vec![
                    PseudoTypeInfo::Var(1),
                    PseudoTypeInfo::app(list, vec![PseudoTypeInfo::Var(1)]),
                ],
            ),
        ]),
    )
    .unwrap();

    let meters = b.declare("units", "meters", 0).unwrap();
    b.define(meters, TypeDefinition::Du(vec![FunctorSpec::new("meters", vec![int()])]))
        .unwrap();

    let int_list = b.declare("units", "int_list", 0).unwrap();
    b.define(
        int_list,
        TypeDefinition::Equiv(PseudoTypeInfo::app(list, vec![int()])),
    )
    .unwrap();

    let pair = b.declare("sets", "pair", 0).unwrap();
    b.define(pair, TypeDefinition::Du(vec![FunctorSpec::new("pair", vec![int(), int()])]))
        .unwrap();
    b.set_user_procs(
        pair,
        ProcRef::new("sets", "pair_equal", 2),
        Some(ProcRef::new("sets", "pair_compare", 3)),
    )
    .unwrap();

    let fuzzy = b.declare("sets", "fuzzy", 0).unwrap();
    b.define(
        fuzzy,
        TypeDefinition::Du(vec![
            FunctorSpec::new("blur", vec![]),
            FunctorSpec::new("sharp", vec![int()]),
        ]),
    )
    .unwrap();
    b.set_user_procs(fuzzy, ProcRef::new("sets", "fuzzy_equal", 2), None)
        .unwrap();

    let anything = b.declare("univ", "anything", 0).unwrap();
    b.define(
        anything,
        TypeDefinition::Du(vec![FunctorSpec::new("some", vec![PseudoTypeInfo::Exist(1)])
            .existential(ExistSpec::plain(1))]),
    )
    .unwrap();

    let shown = b.declare("univ", "shown", 0).unwrap();
    b.define(
        shown,
        TypeDefinition::Du(vec![FunctorSpec::new("shown", vec![PseudoTypeInfo::Exist(1)])
            .existential(ExistSpec::default().with_typeclass_infos(1).constrained(0, 1))]),
    )
    .unwrap();

    let tree = b.declare("trees", "tree", 0).unwrap();
    b.define(
        tree,
        TypeDefinition::Du(vec![
            FunctorSpec::new("leaf", vec![int()]),
            FunctorSpec::new(
                "node",
                vec![PseudoTypeInfo::app(tree, vec![]), PseudoTypeInfo::app(tree, vec![])],
            ),
        ]),
    )
    .unwrap();

    let mystery = b.declare("misc", "mystery", 0).unwrap();
    b.define(mystery, TypeDefinition::Unknown).unwrap();

    b.set_user_procs(
        TypeCtorId::ARRAY,
        ProcRef::new("array", "array_equal", 3),
        Some(ProcRef::new("array", "array_compare", 4)),
    )
    .unwrap();

    let inc = b.add_closure_layout(ProcRef::new("math", "inc", 2), vec![TypeInfo::int()]);
    let add = b.add_closure_layout(
        ProcRef::new("math", "add", 3),
        vec![TypeInfo::int(), TypeInfo::string()],
    );

    let table = Arc::new(b.finish().unwrap());
    let mut runtime = Runtime::with_options(table, options);
    register_procs(&mut runtime);

    Fixture {
        runtime,
        shape,
        list,
        meters,
        int_list,
        pair,
        fuzzy,
        anything,
        shown,
        tree,
        mystery,
        inc,
        add,
    }
}

fn sorted_pair(engine: &Engine<'_>, pair: Word) -> (i64, i64) {
    let a = engine.heap().field(pair, 0).as_int();
    let b = engine.heap().field(pair, 1).as_int();
    (a.min(b), a.max(b))
}

fn register_procs(runtime: &mut Runtime) {
    runtime.register_proc(ProcRef::new("sets", "pair_equal", 2), |engine, args| {
        Word::from_bool(sorted_pair(engine, args[0]) == sorted_pair(engine, args[1]))
    });
    runtime.register_proc(ProcRef::new("sets", "pair_compare", 3), |engine, args| {
        ordering_word(sorted_pair(engine, args[0]).cmp(&sorted_pair(engine, args[1])))
    });
    runtime.register_proc(ProcRef::new("sets", "fuzzy_equal", 2), |_, _| {
        Word::from_bool(true)
    });

    // Arrays get their element type first and re-enter the engine.
    runtime.register_proc(ProcRef::new("array", "array_equal", 3), |engine, args| {
        let elem = engine.heap().load_type_info(args[0], engine.table());
        let xs = engine.heap().array_elems(args[1]);
        let ys = engine.heap().array_elems(args[2]);
        let equal = xs.len() == ys.len()
            && xs.iter().zip(&ys).all(|(&x, &y)| engine.unify(&elem, x, y));
        Word::from_bool(equal)
    });
    runtime.register_proc(ProcRef::new("array", "array_compare", 4), |engine, args| {
        let elem = engine.heap().load_type_info(args[0], engine.table());
        let xs = engine.heap().array_elems(args[1]);
        let ys = engine.heap().array_elems(args[2]);
        let by_len = xs.len().cmp(&ys.len());
        if by_len != Ordering::Equal {
            return ordering_word(by_len);
        }
        for (&x, &y) in xs.iter().zip(&ys) {
            let ordering = engine.compare(&elem, x, y);
            if ordering != Ordering::Equal {
                return ordering_word(ordering);
            }
        }
        ordering_word(Ordering::Equal)
    });
}

impl Fixture {
    pub fn ti(&self, ctor: TypeCtorId, args: Vec<TypeInfo>) -> TypeInfo {
        self.runtime.table().type_info(ctor, args).unwrap()
    }

    pub fn build(&self, heap: &mut Heap, ctor: TypeCtorId, ordinal: u32, slots: &[Word]) -> Word {
        let info = self.runtime.table().ctor(ctor).unwrap();
        heap.construct(info, ordinal, slots).unwrap()
    }

    pub fn dot(&self, heap: &mut Heap) -> Word {
        self.build(heap, self.shape, 0, &[])
    }

    pub fn circle(&self, heap: &mut Heap, r: i64) -> Word {
        self.build(heap, self.shape, 1, &[Word::from_int(r)])
    }

    pub fn rect(&self, heap: &mut Heap, w: i64, h: i64) -> Word {
        self.build(heap, self.shape, 2, &[Word::from_int(w), Word::from_int(h)])
    }

    pub fn label(&self, heap: &mut Heap, text: &str) -> Word {
        let text = heap.alloc_string(text);
        self.build(heap, self.shape, 3, &[text])
    }

    /// A list of already-built elements.
    pub fn list_of(&self, heap: &mut Heap, elems: &[Word]) -> Word {
        let mut list = self.build(heap, self.list, 0, &[]);
        for &elem in elems.iter().rev() {
            list = self.build(heap, self.list, 1, &[elem, list]);
        }
        list
    }

    pub fn int_list_of(&self, heap: &mut Heap, elems: &[i64]) -> Word {
        let words: Vec<Word> = elems.iter().map(|&i| Word::from_int(i)).collect();
        self.list_of(heap, &words)
    }

    pub fn pair_of(&self, heap: &mut Heap, a: i64, b: i64) -> Word {
        self.build(heap, self.pair, 0, &[Word::from_int(a), Word::from_int(b)])
    }

    /// `some(value)` with `value` of type `ti`.
    pub fn some(&self, heap: &mut Heap, ti: &TypeInfo, value: Word) -> Word {
        let ti = heap.alloc_type_info(ti);
        self.build(heap, self.anything, 0, &[ti, value])
    }

    /// `shown(value)`, with the type info at word 1 of a typeclass info.
    pub fn shown_of(&self, heap: &mut Heap, ti: &TypeInfo, value: Word) -> Word {
        let ti = heap.alloc_type_info(ti);
        let tci = heap.alloc_typeclass_info(&[Word::ZERO, ti]);
        self.build(heap, self.shown, 0, &[tci, value])
    }

    pub fn leaf(&self, heap: &mut Heap, n: i64) -> Word {
        self.build(heap, self.tree, 0, &[Word::from_int(n)])
    }

    pub fn node(&self, heap: &mut Heap, l: Word, r: Word) -> Word {
        self.build(heap, self.tree, 1, &[l, r])
    }
}
