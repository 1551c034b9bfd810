use super::*;

#[test]
fn user_equality_variants() {
    assert!(RepresentationKind::DuUserEq.has_user_equality());
    assert!(RepresentationKind::NoTagGroundUserEq.has_user_equality());
    assert!(!RepresentationKind::Du.has_user_equality());
    assert!(!RepresentationKind::Equiv.has_user_equality());
}

#[test]
fn internal_kinds_are_not_data() {
    assert!(RepresentationKind::Succip.is_engine_internal());
    assert!(RepresentationKind::TrailPtr.is_engine_internal());
    assert!(!RepresentationKind::Void.is_engine_internal());
    assert!(!RepresentationKind::Int.is_engine_internal());
}

#[test]
fn display_uses_diagnostic_name() {
    assert_eq!(RepresentationKind::StableCPointer.to_string(), "STABLE_C_POINTER");
}
