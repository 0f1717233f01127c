#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use std::ops::ControlFlow;

use helpers::input_order;
use reconf_core::constraints::disjoint;
use reconf_core::constraints::Constraint;
use reconf_core::predicate;
use reconf_core::search::count_solutions;
use reconf_core::search::for_each_solution;
use reconf_core::termination::Indefinite;
use reconf_core::ConflictCause;
use reconf_core::State;

#[test]
fn fixing_a_variable_removes_its_value_from_the_other_group() {
    let mut state = State::default();
    let x_1 = state.new_interval_variable(0, 2, None);
    let x_2 = state.new_interval_variable(0, 2, None);
    disjoint(vec![vec![x_1], vec![x_2]], 3)
        .post(&mut state)
        .expect("valid groups");

    let _ = state.post(predicate!(x_1 == 1)).expect("in domain");
    state.propagate_to_fixed_point().expect("no conflict");

    assert!(!state.contains(x_2, 1));
    assert_eq!(state.domain_size(x_2), 2);
}

#[test]
fn two_groups_requiring_the_same_value_conflict() {
    let mut state = State::default();
    let x = state.new_interval_variable(2, 2, None);
    let y = state.new_interval_variable(0, 2, None);
    let z = state.new_interval_variable(2, 2, None);
    disjoint(vec![vec![x], vec![y], vec![z]], 3)
        .post(&mut state)
        .expect("valid groups");

    let conflict = state
        .propagate_to_fixed_point()
        .expect_err("x and z both take 2");

    assert_eq!(
        conflict.cause(),
        Some(ConflictCause::GroupCollision { value: 2 })
    );
}

#[test]
fn solutions_never_share_values_across_groups() {
    let mut state = State::default();
    let x = state.new_interval_variable(0, 2, None);
    let y = state.new_interval_variable(0, 2, None);
    let z = state.new_interval_variable(0, 2, None);
    disjoint(vec![vec![x], vec![y, z]], 3)
        .post(&mut state)
        .expect("valid groups");

    let mut brancher = input_order(&[x, y, z]);
    let exhausted = for_each_solution(&mut state, &mut brancher, &mut Indefinite, |solution| {
        let value = solution.value(x);
        assert_ne!(value, solution.value(y));
        assert_ne!(value, solution.value(z));
        ControlFlow::Continue(())
    });
    assert!(exhausted);

    // x takes any value, y and z any of the two others.
    let mut brancher = input_order(&[x, y, z]);
    let count = count_solutions(&mut state, &mut brancher, &mut Indefinite);
    assert_eq!(count.count, 12);
}
