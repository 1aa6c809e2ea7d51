//! # Action and Goal Module for Goal-Oriented Action Planning (GOAP)
//!
//! This module provides the named planning steps the search engine orders:
//!
//! * [`Action`]: a step with preconditions, effects, a cost and a value
//! * [`Goal`]: a desired set of world conditions with a value
//!
//! Both are immutable value objects: they are fully validated when
//! constructed and never mutated by the planner. Costs and values are
//! scalars in `[0, 1]`; out-of-range costs would break the admissibility
//! and cost-summation invariants of the search, so they are rejected
//! eagerly rather than tolerated.
//!
//! ## Basic Usage
//!
//! ```
//! use goalplan::{Action, ConditionDetermination, WorldState};
//!
//! let mut preconditions = WorldState::new();
//! preconditions.set("has_axe", ConditionDetermination::True);
//!
//! let mut effects = WorldState::new();
//! effects.set("has_wood", ConditionDetermination::True);
//!
//! let chop_wood = Action::new("chop_wood", 0.2, 0.5, preconditions, effects).unwrap();
//!
//! let mut world = WorldState::new();
//! world.set("has_axe", ConditionDetermination::True);
//!
//! assert!(chop_wood.can_perform(&world));
//! let next = chop_wood.apply_effects(&world);
//! assert_eq!(next.get("has_wood"), Some(ConditionDetermination::True));
//! ```

use std::collections::HashSet;
use std::fmt;

use crate::{GoapError, Result, WorldState};

/// Checks a condition map for keys that differ only in ASCII case.
///
/// Two entries like `hasForm` and `hasform` are almost always a typo in the
/// action library, and the planner would treat them as independent
/// conditions. Construction rejects them instead.
fn check_condition_keys(conditions: &WorldState) -> Result<()> {
    let mut seen = HashSet::new();
    for (key, _) in conditions.iter() {
        if !seen.insert(key.to_ascii_lowercase()) {
            return Err(GoapError::DuplicateConditionKey(key.to_string()));
        }
    }
    Ok(())
}

fn check_unit_interval(scalar: f32, err: fn(f32) -> GoapError) -> Result<()> {
    // NaN fails the range test as well
    if !(0.0..=1.0).contains(&scalar) {
        return Err(err(scalar));
    }
    Ok(())
}

/// A single planning step in the GOAP system.
///
/// An action has:
/// - A name, unique within a planning system
/// - Preconditions the world must satisfy before the action applies
/// - Effects the action asserts onto the world state when applied
/// - A cost in `[0, 1]` the search minimizes
/// - A value in `[0, 1]` contributing to a plan's net value
///
/// # Examples
///
/// ```
/// use goalplan::{Action, ConditionDetermination, WorldState};
///
/// let mut preconditions = WorldState::new();
/// preconditions.set("target_visible", ConditionDetermination::True);
///
/// let mut effects = WorldState::new();
/// effects.set("at_target", ConditionDetermination::True);
///
/// let action = Action::new("move_to_target", 0.3, 0.1, preconditions, effects).unwrap();
/// assert_eq!(action.name(), "move_to_target");
/// assert_eq!(action.cost(), 0.3);
///
/// // Out-of-range costs are rejected eagerly
/// let invalid = Action::new("teleport", 1.5, 0.0, WorldState::new(), WorldState::new());
/// assert!(invalid.is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    name: String,
    cost: f32,
    value: f32,
    preconditions: WorldState,
    effects: WorldState,
}

impl Action {
    /// Creates a new action.
    ///
    /// # Arguments
    ///
    /// * `name` - Identifier for the action, unique within a system
    /// * `cost` - Cost of performing the action, in `[0, 1]`
    /// * `value` - Value of performing the action, in `[0, 1]`
    /// * `preconditions` - Conditions required for the action to apply
    /// * `effects` - Conditions the action asserts when applied
    ///
    /// # Errors
    ///
    /// Returns [`GoapError::InvalidCost`] or [`GoapError::InvalidValue`] if
    /// the scalars fall outside `[0, 1]`, and
    /// [`GoapError::DuplicateConditionKey`] if the precondition or effect
    /// map contains keys differing only in case.
    pub fn new(
        name: impl Into<String>,
        cost: f32,
        value: f32,
        preconditions: WorldState,
        effects: WorldState,
    ) -> Result<Self> {
        check_unit_interval(cost, GoapError::InvalidCost)?;
        check_unit_interval(value, GoapError::InvalidValue)?;
        check_condition_keys(&preconditions)?;
        check_condition_keys(&effects)?;

        Ok(Self {
            name: name.into(),
            cost,
            value,
            preconditions,
            effects,
        })
    }

    /// The name of the action.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The cost of performing the action, in `[0, 1]`.
    pub fn cost(&self) -> f32 {
        self.cost
    }

    /// The value of performing the action, in `[0, 1]`.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// The conditions required for this action to apply.
    pub fn preconditions(&self) -> &WorldState {
        &self.preconditions
    }

    /// The conditions this action asserts when applied.
    pub fn effects(&self) -> &WorldState {
        &self.effects
    }

    /// Checks whether this action can be performed in the given state.
    ///
    /// Every precondition must read its required determination in the
    /// state, with absent keys reading as `Unknown`.
    ///
    /// # Examples
    ///
    /// ```
    /// use goalplan::{Action, ConditionDetermination, WorldState};
    ///
    /// let mut preconditions = WorldState::new();
    /// preconditions.set("hands_free", ConditionDetermination::True);
    /// let action =
    ///     Action::new("pick_up", 0.1, 0.0, preconditions, WorldState::new()).unwrap();
    ///
    /// let mut world = WorldState::new();
    /// world.set("hands_free", ConditionDetermination::True);
    /// assert!(action.can_perform(&world));
    ///
    /// world.set("hands_free", ConditionDetermination::False);
    /// assert!(!action.can_perform(&world));
    ///
    /// // An undetermined key does not satisfy a strict requirement
    /// assert!(!action.can_perform(&WorldState::new()));
    /// ```
    pub fn can_perform(&self, state: &WorldState) -> bool {
        state.satisfies(&self.preconditions)
    }

    /// Produces the state resulting from applying this action's effects.
    ///
    /// The input state is not modified; effects overwrite on a copy.
    pub fn apply_effects(&self, state: &WorldState) -> WorldState {
        state.apply(&self.effects)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (cost={}, value={})", self.name, self.cost, self.value)
    }
}

/// A desired set of world conditions the planner steers towards.
///
/// A goal is satisfied by a world state iff every goal precondition key
/// reads the required determination in that state. The goal's value feeds
/// into plan ranking: `net_value = goal.value + actions_value - cost`.
///
/// # Examples
///
/// ```
/// use goalplan::{ConditionDetermination, Goal, WorldState};
///
/// let mut preconditions = WorldState::new();
/// preconditions.set("has_shelter", ConditionDetermination::True);
/// let goal = Goal::new("survive_winter", preconditions, 0.9).unwrap();
///
/// let mut world = WorldState::new();
/// world.set("has_shelter", ConditionDetermination::True);
/// assert!(goal.is_satisfied_by(&world));
/// assert!(!goal.is_satisfied_by(&WorldState::new()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    name: String,
    preconditions: WorldState,
    value: f32,
}

impl Goal {
    /// Creates a new goal.
    ///
    /// # Errors
    ///
    /// Returns [`GoapError::InvalidValue`] if `value` falls outside
    /// `[0, 1]`, and [`GoapError::DuplicateConditionKey`] if the
    /// precondition map contains keys differing only in case.
    pub fn new(name: impl Into<String>, preconditions: WorldState, value: f32) -> Result<Self> {
        check_unit_interval(value, GoapError::InvalidValue)?;
        check_condition_keys(&preconditions)?;

        Ok(Self {
            name: name.into(),
            preconditions,
            value,
        })
    }

    /// The name of the goal.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The conditions a world state must meet to satisfy this goal.
    pub fn preconditions(&self) -> &WorldState {
        &self.preconditions
    }

    /// The value of achieving this goal, in `[0, 1]`.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Checks whether the given world state satisfies this goal.
    pub fn is_satisfied_by(&self, state: &WorldState) -> bool {
        state.satisfies(&self.preconditions)
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (value={})", self.name, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConditionDetermination;

    fn conditions(entries: &[(&str, ConditionDetermination)]) -> WorldState {
        let mut state = WorldState::new();
        for (key, det) in entries {
            state.set(*key, *det);
        }
        state
    }

    #[test]
    fn test_create_valid_action() {
        let action =
            Action::new("test_action", 0.5, 0.2, WorldState::new(), WorldState::new()).unwrap();
        assert_eq!(action.name(), "test_action");
        assert_eq!(action.cost(), 0.5);
        assert_eq!(action.value(), 0.2);
        assert!(action.preconditions().is_empty());
        assert!(action.effects().is_empty());
    }

    #[test]
    fn test_zero_cost_action_is_valid() {
        let action =
            Action::new("free_action", 0.0, 0.0, WorldState::new(), WorldState::new());
        assert!(action.is_ok());
    }

    #[test]
    fn test_out_of_range_cost_rejected() {
        let result = Action::new("bad", 1.5, 0.0, WorldState::new(), WorldState::new());
        assert!(matches!(result, Err(GoapError::InvalidCost(_))));

        let result = Action::new("bad", -0.1, 0.0, WorldState::new(), WorldState::new());
        assert!(matches!(result, Err(GoapError::InvalidCost(_))));

        let result = Action::new("bad", f32::NAN, 0.0, WorldState::new(), WorldState::new());
        assert!(matches!(result, Err(GoapError::InvalidCost(_))));
    }

    #[test]
    fn test_out_of_range_value_rejected() {
        let result = Action::new("bad", 0.1, 2.0, WorldState::new(), WorldState::new());
        assert!(matches!(result, Err(GoapError::InvalidValue(_))));
    }

    #[test]
    fn test_case_colliding_precondition_keys_rejected() {
        let pre = conditions(&[
            ("hasForm", ConditionDetermination::True),
            ("hasform", ConditionDetermination::False),
        ]);
        let result = Action::new("bad", 0.1, 0.0, pre, WorldState::new());
        assert!(matches!(result, Err(GoapError::DuplicateConditionKey(_))));
    }

    #[test]
    fn test_case_colliding_effect_keys_rejected() {
        let eff = conditions(&[
            ("it:Person", ConditionDetermination::True),
            ("IT:PERSON", ConditionDetermination::True),
        ]);
        let result = Action::new("bad", 0.1, 0.0, WorldState::new(), eff);
        assert!(matches!(result, Err(GoapError::DuplicateConditionKey(_))));
    }

    #[test]
    fn test_can_perform_with_empty_preconditions() {
        let action =
            Action::new("test_action", 0.1, 0.0, WorldState::new(), WorldState::new()).unwrap();
        assert!(action.can_perform(&WorldState::new()));
    }

    #[test]
    fn test_can_perform_with_matching_preconditions() {
        let pre = conditions(&[("has_tool", ConditionDetermination::True)]);
        let action = Action::new("test_action", 0.1, 0.0, pre, WorldState::new()).unwrap();

        let state = conditions(&[("has_tool", ConditionDetermination::True)]);
        assert!(action.can_perform(&state));
    }

    #[test]
    fn test_can_perform_with_unmatching_preconditions() {
        let pre = conditions(&[("has_tool", ConditionDetermination::True)]);
        let action = Action::new("test_action", 0.1, 0.0, pre, WorldState::new()).unwrap();

        let state = conditions(&[("has_tool", ConditionDetermination::False)]);
        assert!(!action.can_perform(&state));
    }

    #[test]
    fn test_can_perform_with_missing_preconditions() {
        let pre = conditions(&[("has_tool", ConditionDetermination::True)]);
        let action = Action::new("test_action", 0.1, 0.0, pre, WorldState::new()).unwrap();

        assert!(!action.can_perform(&WorldState::new()));
    }

    #[test]
    fn test_precondition_requiring_false_not_met_by_unknown() {
        let pre = conditions(&[("alarm_armed", ConditionDetermination::False)]);
        let action = Action::new("sneak_in", 0.1, 0.0, pre, WorldState::new()).unwrap();

        let state = conditions(&[("alarm_armed", ConditionDetermination::Unknown)]);
        assert!(!action.can_perform(&state));
    }

    #[test]
    fn test_apply_effects_leaves_input_untouched() {
        let eff = conditions(&[("has_result", ConditionDetermination::True)]);
        let action = Action::new("test_action", 0.1, 0.0, WorldState::new(), eff).unwrap();

        let state = conditions(&[("has_result", ConditionDetermination::False)]);
        let next = action.apply_effects(&state);

        assert_eq!(next.get("has_result"), Some(ConditionDetermination::True));
        assert_eq!(state.get("has_result"), Some(ConditionDetermination::False));
    }

    #[test]
    fn test_goal_satisfaction() {
        let pre = conditions(&[("x", ConditionDetermination::True)]);
        let goal = Goal::new("reach_x", pre, 0.5).unwrap();

        let satisfied = conditions(&[("x", ConditionDetermination::True)]);
        assert!(goal.is_satisfied_by(&satisfied));

        let unsatisfied = conditions(&[("x", ConditionDetermination::False)]);
        assert!(!goal.is_satisfied_by(&unsatisfied));
        assert!(!goal.is_satisfied_by(&WorldState::new()));
    }

    #[test]
    fn test_goal_value_validation() {
        let result = Goal::new("bad", WorldState::new(), 1.1);
        assert!(matches!(result, Err(GoapError::InvalidValue(_))));
    }
}
