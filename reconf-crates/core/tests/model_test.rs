#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use helpers::init_logging;
use reconf_core::constraints::disjoint;
use reconf_core::constraints::Constraint;
use reconf_core::model::Action;
use reconf_core::model::ModelError;
use reconf_core::model::ModelView;
use reconf_core::model::PlanResult;
use reconf_core::model::ReconfigurationPlan;
use reconf_core::model::ReconfigurationProblem;
use reconf_core::model::VmId;
use reconf_core::model::VmState;
use reconf_core::model::VmTransition;
use reconf_core::termination::DecisionBudget;
use reconf_core::termination::Indefinite;

/// Places the given VMs on pairwise distinct nodes.
struct Spread {
    vms: Vec<VmId>,
    dependencies: Vec<String>,
}

impl ModelView for Spread {
    fn identifier(&self) -> &str {
        "spread"
    }

    fn dependencies(&self) -> Vec<String> {
        self.dependencies.clone()
    }

    fn inject(&self, problem: &mut ReconfigurationProblem) -> Result<(), ModelError> {
        let groups = self
            .vms
            .iter()
            .filter_map(|&vm| problem.vm_slices(vm)?.demanding)
            .map(|slice| vec![slice.host])
            .collect();
        let nb_nodes = problem.nb_nodes();
        disjoint(groups, nb_nodes).post(problem.state_mut())?;
        Ok(())
    }
}

fn running(host: usize, duration: i32) -> VmTransition {
    VmTransition {
        source: VmState::Running,
        target: VmState::Running,
        current_host: Some(host),
        duration,
    }
}

fn plan(problem: ReconfigurationProblem) -> ReconfigurationPlan {
    match problem.solve(&mut Indefinite) {
        Ok(PlanResult::Plan(plan)) => plan,
        other => panic!("expected a plan, got {other:?}"),
    }
}

#[test]
fn a_spread_view_moves_one_of_two_colocated_vms() {
    init_logging();
    let mut problem = ReconfigurationProblem::new(3, 20);
    let first = problem.add_vm(running(0, 4)).expect("valid");
    let second = problem.add_vm(running(0, 4)).expect("valid");
    problem
        .add_dimension(&[8, 8, 8], &[1, 1], &[1, 1])
        .expect("valid");
    problem.add_view(Box::new(Spread {
        vms: vec![first, second],
        dependencies: vec!["packing".to_owned()],
    }));

    let plan = plan(problem);

    assert_eq!(
        plan.actions,
        vec![Action::Migrate {
            vm: second,
            from: 0,
            to: 1,
            start: 0,
            end: 4
        }]
    );
    assert_eq!(plan.makespan, 4);
}

#[test]
fn a_vm_boots_after_the_node_was_freed() {
    let mut problem = ReconfigurationProblem::new(1, 20);
    let stopping = problem
        .add_vm(VmTransition {
            target: VmState::Sleeping,
            ..running(0, 3)
        })
        .expect("valid");
    let booting = problem
        .add_vm(VmTransition {
            source: VmState::Ready,
            current_host: None,
            ..running(0, 2)
        })
        .expect("valid");
    problem.add_dimension(&[4], &[3, 0], &[0, 2]).expect("valid");

    let plan = plan(problem);

    assert_eq!(
        plan.actions,
        vec![
            Action::Shutdown {
                vm: stopping,
                node: 0,
                start: 0,
                end: 3
            },
            Action::Boot {
                vm: booting,
                node: 0,
                start: 3,
                end: 5
            },
        ]
    );
}

#[test]
fn an_alias_group_limits_the_sum_of_its_nodes() {
    let mut problem = ReconfigurationProblem::new(3, 10);
    for _ in 0..2 {
        let _ = problem
            .add_vm(VmTransition {
                source: VmState::Ready,
                current_host: None,
                ..running(0, 1)
            })
            .expect("valid");
    }
    problem
        .add_dimension(&[4, 4, 4], &[0, 0], &[2, 2])
        .expect("valid");
    problem
        .add_alias(3, &[0, 0], &[2, 2], &[0, 1])
        .expect("valid");

    let plan = plan(problem);

    let nodes = plan
        .actions
        .iter()
        .map(|action| match *action {
            Action::Boot { node, .. } => node,
            other => panic!("unexpected action {other}"),
        })
        .collect::<Vec<_>>();
    assert_eq!(nodes, vec![0, 2]);
}

#[test]
fn views_depending_on_each_other_are_rejected() {
    let mut problem = ReconfigurationProblem::new(2, 10);
    let vm = problem.add_vm(running(0, 1)).expect("valid");
    problem.add_view(Box::new(Spread {
        vms: vec![vm],
        dependencies: vec!["spread".to_owned()],
    }));

    assert_eq!(
        problem.solve(&mut Indefinite),
        Err(ModelError::DependencyCycle {
            cycle: vec!["spread".to_owned(), "spread".to_owned()]
        })
    );
}

#[test]
fn an_exhausted_budget_gives_no_answer() {
    let mut problem = ReconfigurationProblem::new(2, 10);
    let _ = problem.add_vm(running(0, 1)).expect("valid");

    assert_eq!(
        problem.solve(&mut DecisionBudget::new(0)),
        Ok(PlanResult::Unknown)
    );
}
