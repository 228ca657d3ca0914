//! Note-cycle arithmetic over the fixed seven-degree sequence.
//!
//! Everything here is a pure function except [`NoteSequence`], a small
//! context value owned by the caller that records which alphabet is active.

use solfa_types::{Direction, Notation, DEGREE_COUNT};

use crate::random::RandomSource;

/// Index of the expected answer for `prompt_index` in a cycle of `length`.
///
/// Wraps at both ends: the last index goes forward to 0 and index 0 goes
/// backward to `length - 1`.
pub fn resolve_correct_index(prompt_index: usize, direction: Direction, length: usize) -> usize {
    debug_assert!(length > 0, "empty note cycle");
    match direction {
        Direction::Forward => (prompt_index + 1) % length,
        Direction::Backward => (prompt_index % length + length - 1) % length,
    }
}

/// Uniformly random integer in `[0, bound)`.
pub fn random_index<R: RandomSource + ?Sized>(bound: usize, source: &mut R) -> usize {
    if bound == 0 {
        return 0;
    }
    let idx = (source.next_f64() * bound as f64).floor() as usize;
    // a misbehaving source returning 1.0 must not escape the range
    idx.min(bound - 1)
}

/// Fisher-Yates shuffle into a new vector; the input is left untouched.
pub fn shuffle<T: Clone, R: RandomSource + ?Sized>(sequence: &[T], source: &mut R) -> Vec<T> {
    let mut shuffled = sequence.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = random_index(i + 1, source);
        shuffled.swap(i, j);
    }
    shuffled
}

/// The active label alphabet for a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoteSequence {
    notation: Notation,
}

impl NoteSequence {
    pub fn new(notation: Notation) -> Self {
        Self { notation }
    }

    pub fn notation(&self) -> Notation {
        self.notation
    }

    /// Switch alphabets; `true` selects the international names.
    pub fn set_notation(&mut self, use_alternate: bool) {
        self.notation = Notation::from_alternate(use_alternate);
    }

    pub fn labels(&self) -> &'static [&'static str; DEGREE_COUNT] {
        self.notation.labels()
    }

    pub fn label(&self, index: usize) -> Option<&'static str> {
        self.notation.label(index)
    }

    /// Position of `label` in the active alphabet only.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.notation.index_of(label)
    }

    pub fn len(&self) -> usize {
        DEGREE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn shuffled<R: RandomSource + ?Sized>(&self, source: &mut R) -> Vec<&'static str> {
        shuffle(self.labels(), source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::Lcg;

    #[test]
    fn correct_index_wraps_for_every_degree() {
        for i in 0..DEGREE_COUNT {
            let fwd = resolve_correct_index(i, Direction::Forward, DEGREE_COUNT);
            let back = resolve_correct_index(i, Direction::Backward, DEGREE_COUNT);
            assert!(fwd < DEGREE_COUNT);
            assert!(back < DEGREE_COUNT);
            assert_eq!(fwd, (i + 1) % 7);
            assert_eq!(back, (i + 6) % 7);
        }
    }

    #[test]
    fn correct_index_boundaries() {
        assert_eq!(resolve_correct_index(0, Direction::Forward, 7), 1);
        assert_eq!(resolve_correct_index(6, Direction::Forward, 7), 0);
        assert_eq!(resolve_correct_index(0, Direction::Backward, 7), 6);
        assert_eq!(resolve_correct_index(1, Direction::Backward, 7), 0);
    }

    #[test]
    fn random_index_with_fixed_source() {
        assert_eq!(random_index(7, &mut || 0.5), 3);
        assert_eq!(random_index(7, &mut || 0.0), 0);
        assert_eq!(random_index(7, &mut || 0.999_999), 6);
        assert_eq!(random_index(7, &mut || 1.0), 6);
        assert_eq!(random_index(0, &mut || 0.5), 0);
    }

    #[test]
    fn shuffle_is_a_permutation_and_leaves_input() {
        let original = Notation::Solfege.labels().to_vec();
        let before = original.clone();
        let mut rng = Lcg::new(1234);
        for _ in 0..50 {
            let shuffled = shuffle(&original, &mut rng);
            assert_eq!(shuffled.len(), original.len());
            let mut a = shuffled.clone();
            let mut b = original.clone();
            a.sort();
            b.sort();
            assert_eq!(a, b);
        }
        assert_eq!(original, before);
    }

    #[test]
    fn shuffle_keeps_duplicates() {
        let input = [1, 1, 2, 3, 3, 3];
        let mut rng = Lcg::new(99);
        let mut out = shuffle(&input, &mut rng);
        out.sort();
        assert_eq!(out, input.to_vec());
    }

    #[test]
    fn shuffle_swaps_from_the_end() {
        // source always 0 -> each position i swaps with index 0
        let out = shuffle(&['a', 'b', 'c', 'd'], &mut || 0.0);
        // i=3: [d,b,c,a]; i=2: [c,b,d,a]; i=1: [b,c,d,a]
        assert_eq!(out, vec!['b', 'c', 'd', 'a']);
        // source just under 1 -> j == i, nothing moves
        let out = shuffle(&['a', 'b', 'c', 'd'], &mut || 0.999);
        assert_eq!(out, vec!['a', 'b', 'c', 'd']);
    }

    #[test]
    fn shuffle_reaches_every_permutation() {
        let mut rng = Lcg::new(5);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2_000 {
            seen.insert(shuffle(&[0, 1, 2], &mut rng));
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn shuffle_maps_each_draw_to_a_distinct_permutation() {
        // every pair of draws (j for i=2, j for i=1) is equally likely, so a
        // bijection onto the permutations means each has probability 1/6
        let mut seen = std::collections::HashSet::new();
        for a in 0..3 {
            for b in 0..2 {
                let mut draws = [(a as f64 + 0.5) / 3.0, (b as f64 + 0.5) / 2.0].into_iter();
                let mut source = || draws.next().unwrap_or(0.0);
                assert!(seen.insert(shuffle(&[0, 1, 2], &mut source)));
            }
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn shuffle_permutations_are_equally_frequent() {
        let mut rng = Lcg::new(17);
        let mut counts = std::collections::HashMap::new();
        for _ in 0..6_000 {
            *counts.entry(shuffle(&[0, 1, 2], &mut rng)).or_insert(0u32) += 1;
        }
        assert_eq!(counts.len(), 6);
        // expected 1000 each, standard deviation about 29
        for (perm, count) in &counts {
            assert!((850..=1150).contains(count), "{:?} drawn {} times", perm, count);
        }
    }

    #[test]
    fn notation_switch_keeps_prompt_index() {
        let mut seq = NoteSequence::default();
        let prompt = 3;
        let before = seq.label(prompt);
        assert_eq!(before, Some("Fa"));
        seq.set_notation(true);
        assert_eq!(seq.label(prompt), Some("F"));
        seq.set_notation(false);
        assert_eq!(seq.label(prompt), before);
    }

    #[test]
    fn index_of_uses_active_alphabet() {
        let mut seq = NoteSequence::new(Notation::Solfege);
        assert_eq!(seq.index_of("Sol"), Some(4));
        assert_eq!(seq.index_of("G"), None);
        seq.set_notation(true);
        assert_eq!(seq.index_of("G"), Some(4));
    }
}
