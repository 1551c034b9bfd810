//! The relocating value space.

use morel_diagnostic::{fatal, FatalContext, FatalKind};

use crate::Word;

/// Sizing and stress switches for a [`Heap`].
#[derive(Clone, Debug, PartialEq)]
pub struct HeapConfig {
    /// Capacity of a fresh heap, in words.
    pub initial_words: usize,
    /// Growth multiplier applied whenever the space must grow.
    pub expansion_factor: f64,
    /// Move the whole space on every allocation. Flushes out code that
    /// keeps a body view across an allocation.
    pub relocate_every_alloc: bool,
}

impl Default for HeapConfig {
    fn default() -> Self {
        HeapConfig {
            initial_words: 4096,
            expansion_factor: 2.0,
            relocate_every_alloc: false,
        }
    }
}

/// Where a cell's words start, valid for one heap epoch.
///
/// Obtained from [`Heap::view`] or [`TaggedValue::body`](crate::TaggedValue::body).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct BodyView {
    index: usize,
    epoch: u64,
}

impl BodyView {
    #[inline]
    pub fn index(self) -> usize {
        self.index
    }

    #[inline]
    pub fn epoch(self) -> u64 {
        self.epoch
    }
}

/// A growable, relocating space of words.
///
/// Cell index 0 is never handed out, so a zero word is never a reference.
#[derive(Debug)]
pub struct Heap {
    words: Vec<u64>,
    epoch: u64,
    config: HeapConfig,
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap {
    pub fn new() -> Self {
        Self::with_config(HeapConfig::default())
    }

    pub fn with_config(config: HeapConfig) -> Self {
        let mut words = Vec::with_capacity(config.initial_words.max(1));
        words.push(0);
        Heap {
            words,
            epoch: 0,
            config,
        }
    }

    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    /// Number of times the space has moved.
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Words in use, including the reserved word.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.len() <= 1
    }

    pub fn capacity(&self) -> usize {
        self.words.capacity()
    }

    // === Allocation ===

    /// Reserve `n` zeroed words and return the index of the first.
    ///
    /// May relocate the space: any [`BodyView`] obtained before this call
    /// is stale afterwards.
    pub fn alloc(&mut self, n: usize) -> usize {
        let needed = self.words.len() + n;
        if needed > self.words.capacity() {
            let grown = (self.words.capacity() as f64 * self.config.expansion_factor) as usize;
            self.relocate(grown.max(needed));
        } else if self.config.relocate_every_alloc {
            self.relocate(self.words.capacity());
        }
        let start = self.words.len();
        self.words.resize(needed, 0);
        start
    }

    /// Allocate a cell holding `words` and return a reference to it.
    pub fn alloc_cell(&mut self, ptag: u8, words: &[Word]) -> Word {
        let start = self.alloc(words.len());
        for (slot, word) in self.words[start..].iter_mut().zip(words) {
            *slot = word.raw();
        }
        Word::tagged(start, ptag)
    }

    fn relocate(&mut self, capacity: usize) {
        let mut moved = Vec::with_capacity(capacity);
        moved.extend_from_slice(&self.words);
        self.words = moved;
        self.epoch += 1;
        tracing::trace!(
            epoch = self.epoch,
            capacity = self.words.capacity(),
            "value space relocated"
        );
    }

    // === Reading ===

    /// View of the cell a reference word points to, for the current epoch.
    #[inline]
    pub fn view(&self, word: Word) -> BodyView {
        BodyView {
            index: word.body_bits() as usize,
            epoch: self.epoch,
        }
    }

    /// Word `i` of the cell behind `view`.
    ///
    /// Fatal if the heap has moved since `view` was derived, or if the read
    /// falls outside the space.
    #[inline]
    pub fn slot(&self, view: BodyView, i: usize) -> Word {
        if view.epoch != self.epoch {
            fatal(
                FatalContext::new(FatalKind::Unreachable, "read cell"),
                format!(
                    "body view from epoch {} used at epoch {}",
                    view.epoch, self.epoch
                ),
            );
        }
        match view
            .index
            .checked_add(i)
            .filter(|&at| at != 0)
            .and_then(|at| self.words.get(at))
        {
            Some(&raw) => Word::from_raw(raw),
            None => fatal(
                FatalContext::new(FatalKind::Metadata, "read cell"),
                format!("slot {i} of cell {} is outside the value space", view.index),
            ),
        }
    }

    /// Word `i` of the cell `word` refers to. Derives a fresh view.
    #[inline]
    pub fn field(&self, word: Word, i: usize) -> Word {
        self.slot(self.view(word), i)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
