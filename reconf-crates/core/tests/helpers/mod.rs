#![allow(
    dead_code,
    unreachable_pub,
    reason = "every test file uses a different subset of the helpers"
)]

use reconf_core::branching::Brancher;
use reconf_core::branching::InDomainMin;
use reconf_core::branching::IndependentVariableValueBrancher;
use reconf_core::branching::InputOrder;
use reconf_core::model::Slice;
use reconf_core::model::VmId;
use reconf_core::variables::DomainId;
use reconf_core::State;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A c-slice on one of `hosts` which ends in `ends`.
pub fn c_slice(state: &mut State, subject: u32, hosts: (i32, i32), ends: (i32, i32)) -> Slice {
    Slice {
        subject: VmId(subject),
        host: state.new_interval_variable(hosts.0, hosts.1, None),
        start: state.new_interval_variable(0, 0, None),
        end: state.new_interval_variable(ends.0, ends.1, None),
        duration: state.new_interval_variable(0, ends.1, None),
    }
}

/// A d-slice on one of `hosts` which starts in `starts` and ends at `horizon`.
pub fn d_slice(
    state: &mut State,
    subject: u32,
    hosts: (i32, i32),
    starts: (i32, i32),
    horizon: i32,
) -> Slice {
    Slice {
        subject: VmId(subject),
        host: state.new_interval_variable(hosts.0, hosts.1, None),
        start: state.new_interval_variable(starts.0, starts.1, None),
        end: state.new_interval_variable(horizon, horizon, None),
        duration: state.new_interval_variable(0, horizon, None),
    }
}

/// Branches on the variables in the given order, smallest value first.
pub fn input_order(variables: &[DomainId]) -> impl Brancher {
    IndependentVariableValueBrancher::new(InputOrder::new(variables), InDomainMin)
}

/// Branches on every variable of the state, in creation order.
pub fn all_variables(state: &State) -> impl Brancher {
    input_order(&state.variables().collect::<Vec<_>>())
}
