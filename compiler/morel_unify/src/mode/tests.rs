use super::*;
use pretty_assertions::assert_eq;

#[test]
fn unify_collapses_orderings() {
    assert_eq!(Mode::Unify.verdict(Ordering::Less), Verdict::Unequal);
    assert_eq!(Mode::Unify.verdict(Ordering::Greater), Verdict::Unequal);
    assert_eq!(Mode::Unify.verdict(Ordering::Equal), Verdict::Equal);
}

#[test]
fn comparisons_keep_orderings() {
    for mode in [Mode::Compare, Mode::CompareRepresentation] {
        assert_eq!(mode.verdict(Ordering::Less), Verdict::Less);
        assert_eq!(mode.verdict(Ordering::Greater).ordering(), Some(Ordering::Greater));
    }
    assert_eq!(Verdict::Unequal.ordering(), None);
}

#[test]
fn names() {
    assert_eq!(Mode::CompareRepresentation.to_string(), "compare_representation");
    assert_eq!(Mode::CompareRepresentation.verb(), "compare");
}
