//! Plan optimizer: two pruning passes over a raw search result, followed
//! by a simulation pass that validates the reduced sequence still reaches
//! the goal.
//!
//! The backward pass walks the sequence in reverse, keeping only actions
//! in the dependency chain leading to the goal and propagating their
//! preconditions backward as new requirements. The forward pass then
//! simulates the reduced sequence from the initial state and drops actions
//! that change nothing or advance no requirement they were kept to
//! discharge. If the result fails simulation the optimizer falls back to
//! the raw, search-validated sequence rather than return a broken plan.

use std::collections::HashMap;

use crate::{Action, ConditionDetermination, Goal, WorldState};

/// Condition requirements outstanding at some point of the regression:
/// goal preconditions, later replaced by the preconditions of the actions
/// that discharge them.
type Requirements = HashMap<String, ConditionDetermination>;

/// An action kept by the backward pass, paired with the requirements its
/// effects were discharging at that point of the regression.
#[derive(Debug, Clone)]
struct KeptAction {
    action: Action,
    discharges: Requirements,
}

/// Prunes a raw action sequence down to the actions that contribute to
/// reaching the goal.
#[derive(Debug, Default)]
pub struct PlanOptimizer;

impl PlanOptimizer {
    /// Creates a new plan optimizer.
    pub fn new() -> Self {
        Self
    }

    /// Optimizes a raw action sequence for `goal`, starting from
    /// `initial`.
    ///
    /// Runs the backward pass, then the forward pass, then replays the
    /// result to confirm it still satisfies the goal. A failed replay
    /// means the pruning itself misbehaved; the raw sequence, which the
    /// search already validated, is returned instead and a warning is
    /// logged.
    pub fn optimize(&self, initial: &WorldState, raw: Vec<Action>, goal: &Goal) -> Vec<Action> {
        let backward = Self::backward_pass(&raw, goal);
        let forward = Self::forward_pass(initial, backward);

        if Self::simulate(initial, &forward, goal) {
            forward
        } else {
            log::warn!(
                "optimized plan for goal '{}' fails simulation; keeping raw {}-action plan",
                goal.name(),
                raw.len()
            );
            raw
        }
    }

    /// Backward reachability pruning.
    ///
    /// Walks the sequence in reverse with a working need-set seeded from
    /// the goal's preconditions. An action is kept iff it produces an
    /// effect exactly matching a needed entry; keeping it discharges those
    /// entries and adds the action's own preconditions to the need-set.
    /// Each kept action is returned with the entries it discharged, which
    /// is what the forward pass measures its progress against.
    fn backward_pass(actions: &[Action], goal: &Goal) -> Vec<KeptAction> {
        let mut needed: Requirements = goal
            .preconditions()
            .iter()
            .map(|(key, det)| (key.to_string(), det))
            .collect();
        let mut kept = Vec::new();

        for action in actions.iter().rev() {
            let discharges: Requirements = action
                .effects()
                .iter()
                .filter(|(key, det)| needed.get(*key) == Some(det))
                .map(|(key, det)| (key.to_string(), det))
                .collect();

            if discharges.is_empty() {
                continue;
            }

            for key in discharges.keys() {
                needed.remove(key);
            }
            for (key, det) in action.preconditions().iter() {
                needed.insert(key.to_string(), det);
            }
            kept.push(KeptAction {
                action: action.clone(),
                discharges,
            });
        }

        kept.reverse();
        kept
    }

    /// Forward progress pruning.
    ///
    /// Simulates the sequence from the initial state. An action is kept
    /// iff applying it changes the state and at least one of its effects
    /// still advances a requirement it was kept to discharge: the key's
    /// current reading differs from the required determination, and the
    /// effect either sets exactly the required determination or leaves
    /// the key absent from the successor state. Only kept actions advance
    /// the simulated state.
    fn forward_pass(initial: &WorldState, actions: Vec<KeptAction>) -> Vec<Action> {
        let mut current = initial.clone();
        let mut kept = Vec::new();

        for KeptAction { action, discharges } in actions {
            let next = action.apply_effects(&current);
            if next == current {
                continue;
            }

            let makes_progress = action.effects().iter().any(|(key, det)| {
                discharges.get(key).map_or(false, |&required| {
                    current.determination(key) != required
                        && (det == required || !next.contains(key))
                })
            });

            if makes_progress {
                current = next;
                kept.push(action);
            }
        }

        kept
    }

    /// Replays `actions` from `initial`, applying all effects in order,
    /// and reports whether the resulting state satisfies the goal.
    fn simulate(initial: &WorldState, actions: &[Action], goal: &Goal) -> bool {
        let mut state = initial.clone();
        for action in actions {
            state = action.apply_effects(&state);
        }
        goal.is_satisfied_by(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_action(name: &str, cost: f32, pre: Vec<(&str, bool)>, eff: Vec<(&str, bool)>) -> Action {
        let mut preconditions = WorldState::new();
        for (k, v) in pre {
            preconditions.set(k, ConditionDetermination::from(v));
        }
        let mut effects = WorldState::new();
        for (k, v) in eff {
            effects.set(k, ConditionDetermination::from(v));
        }
        Action::new(name, cost, 0.0, preconditions, effects).unwrap()
    }

    fn make_goal(name: &str, pre: Vec<(&str, bool)>) -> Goal {
        let mut preconditions = WorldState::new();
        for (k, v) in pre {
            preconditions.set(k, ConditionDetermination::from(v));
        }
        Goal::new(name, preconditions, 1.0).unwrap()
    }

    fn names(actions: &[Action]) -> Vec<&str> {
        actions.iter().map(Action::name).collect()
    }

    fn kept_names(kept: &[KeptAction]) -> Vec<&str> {
        kept.iter().map(|k| k.action.name()).collect()
    }

    #[test]
    fn test_backward_pass_drops_irrelevant_action() {
        let useful = make_action("useful", 0.1, vec![], vec![("goal", true)]);
        let noise = make_action("noise", 0.1, vec![], vec![("unrelated", true)]);
        let goal = make_goal("goal", vec![("goal", true)]);

        let kept = PlanOptimizer::backward_pass(&[noise, useful], &goal);
        assert_eq!(kept_names(&kept), ["useful"]);
    }

    #[test]
    fn test_backward_pass_keeps_dependency_chain() {
        let a = make_action("a", 0.1, vec![], vec![("x", true)]);
        let b = make_action("b", 0.1, vec![("x", true)], vec![("y", true)]);
        let goal = make_goal("y", vec![("y", true)]);

        let kept = PlanOptimizer::backward_pass(&[a, b], &goal);
        assert_eq!(kept_names(&kept), ["a", "b"]);
        // a was kept to discharge b's propagated precondition
        assert_eq!(
            kept[0].discharges.get("x"),
            Some(&ConditionDetermination::True)
        );
        assert_eq!(
            kept[1].discharges.get("y"),
            Some(&ConditionDetermination::True)
        );
    }

    #[test]
    fn test_backward_pass_drops_duplicate_producer() {
        // Only the producer closest to the goal survives; the earlier one
        // asserts a key nothing needs any more.
        let early = make_action("early", 0.1, vec![], vec![("x", true)]);
        let late = make_action("late", 0.1, vec![], vec![("x", true)]);
        let finish = make_action("finish", 0.1, vec![("x", true)], vec![("goal", true)]);
        let goal = make_goal("goal", vec![("goal", true)]);

        let kept = PlanOptimizer::backward_pass(&[early, late, finish], &goal);
        assert_eq!(kept_names(&kept), ["late", "finish"]);
    }

    #[test]
    fn test_forward_pass_drops_stateless_noop() {
        // x is already true, so re-asserting it changes nothing.
        let mut initial = WorldState::new();
        initial.set("x", ConditionDetermination::True);

        let redundant = make_action("redundant", 0.1, vec![], vec![("x", true)]);
        let finish = make_action("finish", 0.1, vec![("x", true)], vec![("goal", true)]);
        let goal = make_goal("goal", vec![("goal", true)]);

        let kept = PlanOptimizer::backward_pass(&[redundant, finish], &goal);
        let kept = PlanOptimizer::forward_pass(&initial, kept);
        assert_eq!(names(&kept), ["finish"]);
    }

    #[test]
    fn test_forward_pass_keeps_precondition_establishing_action() {
        let a = make_action("a", 0.1, vec![], vec![("x", true)]);
        let b = make_action("b", 0.1, vec![("x", true)], vec![("y", true)]);
        let goal = make_goal("y", vec![("y", true)]);

        let kept = PlanOptimizer::backward_pass(&[a, b], &goal);
        let kept = PlanOptimizer::forward_pass(&WorldState::new(), kept);
        assert_eq!(names(&kept), ["a", "b"]);
    }

    #[test]
    fn test_forward_pass_handles_conflicting_requirements_per_stage() {
        // The alarm must be armed for "disarm" to fire, yet known-off for
        // the goal. Each action is judged against the requirement it
        // discharges, not against the final goal reading.
        let probe = make_action("probe", 0.1, vec![], vec![("alarm_armed", true)]);
        let disarm = make_action(
            "disarm",
            0.1,
            vec![("alarm_armed", true)],
            vec![("alarm_armed", false)],
        );
        let goal = make_goal("silent", vec![("alarm_armed", false)]);

        let kept = PlanOptimizer::backward_pass(&[probe.clone(), disarm.clone()], &goal);
        let kept = PlanOptimizer::forward_pass(&WorldState::new(), kept);
        assert_eq!(names(&kept), ["probe", "disarm"]);
    }

    #[test]
    fn test_optimize_reduces_and_validates() {
        let noise = make_action("noise", 0.1, vec![], vec![("unrelated", true)]);
        let a = make_action("a", 0.1, vec![], vec![("x", true)]);
        let b = make_action("b", 0.1, vec![("x", true)], vec![("goal", true)]);
        let goal = make_goal("goal", vec![("goal", true)]);

        let optimizer = PlanOptimizer::new();
        let raw = vec![noise, a, b];
        let optimized = optimizer.optimize(&WorldState::new(), raw, &goal);
        assert_eq!(names(&optimized), ["a", "b"]);
    }

    #[test]
    fn test_optimize_is_idempotent() {
        let noise = make_action("noise", 0.1, vec![], vec![("unrelated", true)]);
        let a = make_action("a", 0.1, vec![], vec![("x", true)]);
        let b = make_action("b", 0.1, vec![("x", true)], vec![("goal", true)]);
        let goal = make_goal("goal", vec![("goal", true)]);

        let optimizer = PlanOptimizer::new();
        let once = optimizer.optimize(&WorldState::new(), vec![noise, a, b], &goal);
        let twice = optimizer.optimize(&WorldState::new(), once.clone(), &goal);
        assert_eq!(names(&once), names(&twice));
    }

    #[test]
    fn test_optimize_empty_plan_when_goal_already_met() {
        let mut initial = WorldState::new();
        initial.set("goal", ConditionDetermination::True);
        let goal = make_goal("goal", vec![("goal", true)]);

        let optimizer = PlanOptimizer::new();
        let optimized = optimizer.optimize(&initial, Vec::new(), &goal);
        assert!(optimized.is_empty());
    }

    #[test]
    fn test_simulate_checks_goal_satisfaction() {
        let a = make_action("a", 0.1, vec![], vec![("x", true)]);
        let goal = make_goal("x", vec![("x", true)]);

        assert!(PlanOptimizer::simulate(
            &WorldState::new(),
            &[a.clone()],
            &goal
        ));
        assert!(!PlanOptimizer::simulate(&WorldState::new(), &[], &goal));
    }
}
