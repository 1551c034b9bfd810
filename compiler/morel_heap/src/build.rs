//! Building and reading structured values.

use std::cmp::Ordering;

use morel_diagnostic::{fatal, FatalContext, FatalKind};
use morel_rtti::{
    ClosureId, Layout, SectagLocn, TypeCtorDesc, TypeCtorId, TypeCtorInfo, TypeInfo, TypeTable,
};

use crate::{Heap, HeapError, Word};

const BYTES_PER_WORD: usize = 8;

impl Heap {
    // === Strings ===

    /// Store `s` as packed, NUL-terminated bytes.
    pub fn alloc_string(&mut self, s: &str) -> Word {
        let bytes = s.as_bytes();
        let words: Vec<Word> = bytes
            .chunks(BYTES_PER_WORD)
            .map(pack)
            .chain((bytes.len() % BYTES_PER_WORD == 0).then_some(Word::ZERO))
            .collect();
        self.alloc_cell(0, &words)
    }

    /// Byte `i` of a string.
    #[inline]
    fn string_byte(&self, word: Word, i: usize) -> u8 {
        let packed = self.field(word, i / BYTES_PER_WORD).raw();
        packed.to_le_bytes()[i % BYTES_PER_WORD]
    }

    /// The bytes of a string, without the terminator.
    pub fn string_bytes(&self, word: Word) -> Vec<u8> {
        (0..)
            .map(|i| self.string_byte(word, i))
            .take_while(|&b| b != 0)
            .collect()
    }

    pub fn string(&self, word: Word) -> String {
        String::from_utf8_lossy(&self.string_bytes(word)).into_owned()
    }

    /// `strcmp` order: unsigned bytes, up to the first NUL.
    pub fn compare_strings(&self, x: Word, y: Word) -> Ordering {
        if x == y {
            return Ordering::Equal;
        }
        for i in 0.. {
            let (a, b) = (self.string_byte(x, i), self.string_byte(y, i));
            if a != b {
                return a.cmp(&b);
            }
            if a == 0 {
                break;
            }
        }
        Ordering::Equal
    }

    // === Builtin aggregates ===

    pub fn alloc_tuple(&mut self, elems: &[Word]) -> Word {
        self.alloc_cell(0, elems)
    }

    /// A mutable reference cell holding `value`.
    pub fn alloc_ref(&mut self, value: Word) -> Word {
        self.alloc_cell(0, &[value])
    }

    /// An array: its length followed by its elements.
    pub fn alloc_array(&mut self, elems: &[Word]) -> Word {
        let mut words = Vec::with_capacity(elems.len() + 1);
        words.push(Word::from_raw(elems.len() as u64));
        words.extend_from_slice(elems);
        self.alloc_cell(0, &words)
    }

    pub fn array_elems(&self, array: Word) -> Vec<Word> {
        let view = self.view(array);
        let len = self.slot(view, 0).raw() as usize;
        (1..=len).map(|i| self.slot(view, i)).collect()
    }

    /// A closure: its layout, the number of hidden arguments, then the
    /// hidden arguments themselves.
    pub fn alloc_closure(&mut self, layout: ClosureId, hidden: &[Word]) -> Word {
        let mut words = Vec::with_capacity(hidden.len() + 2);
        words.push(Word::from_raw(u64::from(layout.raw())));
        words.push(Word::from_raw(hidden.len() as u64));
        words.extend_from_slice(hidden);
        self.alloc_cell(0, &words)
    }

    pub fn closure_layout(&self, closure: Word) -> ClosureId {
        ClosureId::from_raw(self.field(closure, 0).raw() as u32)
    }

    pub fn closure_hidden_count(&self, closure: Word) -> usize {
        self.field(closure, 1).raw() as usize
    }

    /// Hidden argument `i` of a closure.
    pub fn closure_hidden(&self, closure: Word, i: usize) -> Word {
        self.field(closure, i + 2)
    }

    // === Reflected types ===

    /// Materialize `ti` as a cell `[ctor, nargs, args...]`.
    pub fn alloc_type_info(&mut self, ti: &TypeInfo) -> Word {
        let mut words = Vec::with_capacity(ti.args().len() + 2);
        words.push(Word::from_raw(u64::from(ti.ctor().raw())));
        words.push(Word::from_raw(ti.args().len() as u64));
        for arg in ti.args() {
            let arg = self.alloc_type_info(arg);
            words.push(arg);
        }
        self.alloc_cell(0, &words)
    }

    /// Read back a materialized type info.
    ///
    /// Fatal if the cell names an unknown constructor or the wrong number of
    /// arguments.
    pub fn load_type_info(&self, word: Word, table: &TypeTable) -> TypeInfo {
        let view = self.view(word);
        let ctor = TypeCtorId::from_raw(self.slot(view, 0).raw() as u32);
        let nargs = self.slot(view, 1).raw() as usize;
        let args = (0..nargs)
            .map(|i| self.load_type_info(self.slot(view, i + 2), table))
            .collect();
        match table.type_info(ctor, args) {
            Ok(ti) => ti,
            Err(err) => fatal(
                FatalContext::new(FatalKind::Metadata, "load_type_info"),
                err.to_string(),
            ),
        }
    }

    /// A typeclass info. Word `k` of the cell is `words[k]`; existential
    /// locations address type infos by that index.
    pub fn alloc_typeclass_info(&mut self, words: &[Word]) -> Word {
        self.alloc_cell(0, words)
    }

    /// A type constructor value is its id, inline.
    pub fn type_ctor_info_word(ctor: TypeCtorId) -> Word {
        Word::from_raw(u64::from(ctor.raw()))
    }

    pub fn load_type_ctor_info(word: Word) -> TypeCtorId {
        TypeCtorId::from_raw(word.raw() as u32)
    }

    pub fn alloc_type_ctor_desc(&mut self, desc: TypeCtorDesc) -> Word {
        self.alloc_cell(
            0,
            &[
                Self::type_ctor_info_word(desc.ctor),
                Word::from_raw(u64::from(desc.arity)),
            ],
        )
    }

    pub fn load_type_ctor_desc(&self, word: Word) -> TypeCtorDesc {
        let view = self.view(word);
        TypeCtorDesc {
            ctor: Self::load_type_ctor_info(self.slot(view, 0)),
            arity: self.slot(view, 1).raw() as u16,
        }
    }

    // === User-defined types ===

    /// Build a value of an enum, union or no-tag type from the functor with
    /// declaration ordinal `ordinal`.
    ///
    /// `slots` are the cell words after any remote secondary tag: existential
    /// type infos and typeclass infos first, then the value arguments.
    pub fn construct(
        &mut self,
        info: &TypeCtorInfo,
        ordinal: u32,
        slots: &[Word],
    ) -> Result<Word, HeapError> {
        match info.layout() {
            Layout::Enum(names) => {
                if ordinal as usize >= names.len() {
                    return Err(no_such_functor(info, ordinal));
                }
                expect_slots(info, "", 0, slots)?;
                Ok(Word::from_raw(u64::from(ordinal)))
            }
            Layout::NoTag(notag) => {
                if ordinal != 0 {
                    return Err(no_such_functor(info, ordinal));
                }
                expect_slots(info, notag.functor(), 1, slots)?;
                Ok(slots[0])
            }
            Layout::Du(du) => {
                let functor = du
                    .functors()
                    .get(ordinal as usize)
                    .ok_or_else(|| no_such_functor(info, ordinal))?;
                let expected = functor.cell_size() - functor.first_arg_slot();
                expect_slots(info, functor.name(), expected, slots)?;
                let ptag = functor.ptag();
                Ok(match functor.sectag_locn() {
                    SectagLocn::Local => Word::local(ptag, functor.sectag()),
                    SectagLocn::Remote => {
                        let mut words = Vec::with_capacity(slots.len() + 1);
                        words.push(Word::from_raw(functor.sectag()));
                        words.extend_from_slice(slots);
                        self.alloc_cell(ptag, &words)
                    }
                    SectagLocn::None | SectagLocn::Variable => self.alloc_cell(ptag, slots),
                })
            }
            Layout::None | Layout::Equiv(_) => {
                Err(HeapError::NotConstructible(info.qualified_name()))
            }
        }
    }
}

fn pack(chunk: &[u8]) -> Word {
    let mut bytes = [0u8; BYTES_PER_WORD];
    bytes[..chunk.len()].copy_from_slice(chunk);
    Word::from_raw(u64::from_le_bytes(bytes))
}

fn no_such_functor(info: &TypeCtorInfo, ordinal: u32) -> HeapError {
    HeapError::NoSuchFunctor {
        ctor: info.qualified_name(),
        ordinal,
    }
}

fn expect_slots(
    info: &TypeCtorInfo,
    functor: &str,
    expected: usize,
    slots: &[Word],
) -> Result<(), HeapError> {
    if slots.len() == expected {
        Ok(())
    } else {
        Err(HeapError::SlotCount {
            ctor: info.qualified_name(),
            functor: functor.to_string(),
            expected,
            found: slots.len(),
        })
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
