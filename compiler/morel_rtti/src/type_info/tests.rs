use super::*;
use pretty_assertions::assert_eq;

fn list_id() -> TypeCtorId {
    TypeCtorId::from_raw(TypeCtorId::FIRST_USER)
}

#[test]
fn app_of_ground_args_is_ground() {
    let pt = PseudoTypeInfo::app(list_id(), vec![TypeInfo::int().into()]);
    let ground = pt.as_ground().cloned();
    assert_eq!(ground, Some(TypeInfo::from_parts(list_id(), [TypeInfo::int()])));
}

#[test]
fn app_with_var_stays_open() {
    let pt = PseudoTypeInfo::app(list_id(), vec![PseudoTypeInfo::Var(1)]);
    assert!(!pt.is_ground());
    assert!(!pt.mentions_exist());
}

#[test]
fn instantiate_binds_universal_vars() {
    let pt = PseudoTypeInfo::app(list_id(), vec![PseudoTypeInfo::Var(2)]);
    let ti = pt
        .instantiate_universal(&[TypeInfo::int(), TypeInfo::string()])
        .unwrap();
    assert_eq!(ti.ctor(), list_id());
    assert_eq!(ti.args(), &[TypeInfo::string()]);
}

#[test]
fn instantiate_reports_unbound_universal() {
    let pt = PseudoTypeInfo::Var(3);
    assert_eq!(
        pt.instantiate_universal(&[TypeInfo::int()]),
        Err(UnboundVar::Universal(3))
    );
    assert_eq!(
        PseudoTypeInfo::Var(0).instantiate_universal(&[TypeInfo::int()]),
        Err(UnboundVar::Universal(0))
    );
}

#[test]
fn instantiate_asks_for_existentials() {
    let pt = PseudoTypeInfo::app(list_id(), vec![PseudoTypeInfo::Exist(1)]);
    assert!(pt.mentions_exist());

    let mut asked = Vec::new();
    let ti = pt
        .instantiate(&[], &mut |n| {
            asked.push(n);
            Some(TypeInfo::float())
        })
        .unwrap();
    assert_eq!(asked, vec![1]);
    assert_eq!(ti.args(), &[TypeInfo::float()]);

    assert_eq!(
        PseudoTypeInfo::Exist(2).instantiate(&[], &mut |_| None),
        Err(UnboundVar::Existential(2))
    );
}

#[test]
fn ground_instantiation_shares_node() {
    let ti = TypeInfo::tuple([TypeInfo::int(), TypeInfo::char()]);
    let pt = PseudoTypeInfo::Ground(ti.clone());
    let out = pt.instantiate_universal(&[]).unwrap();
    assert!(out.ptr_eq(&ti));
}
