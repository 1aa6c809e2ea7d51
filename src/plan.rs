//! Plan representation: an ordered action sequence bound to the goal it
//! reaches, with the derived scalars used to rank competing plans.

use std::fmt;

use crate::{Action, Goal};

/// An ordered sequence of actions that reaches a goal.
///
/// Plans are produced once per planning call and are immutable thereafter.
/// The derived scalars are:
///
/// - `cost`: sum of the action costs
/// - `actions_value`: sum of the action values
/// - `net_value`: `goal.value + actions_value - cost`, used to rank plans
///   across goals
///
/// A plan with no actions is complete trivially: the goal was already
/// satisfied by the initial state.
///
/// # Examples
///
/// ```
/// use goalplan::{Action, ConditionDetermination, Goal, Plan, WorldState};
///
/// let mut effects = WorldState::new();
/// effects.set("fire_lit", ConditionDetermination::True);
/// let light_fire = Action::new("light_fire", 0.2, 0.1, WorldState::new(), effects).unwrap();
///
/// let mut wanted = WorldState::new();
/// wanted.set("fire_lit", ConditionDetermination::True);
/// let goal = Goal::new("warm_camp", wanted, 0.8).unwrap();
///
/// let plan = Plan::new(vec![light_fire], goal);
/// assert!(!plan.is_complete());
/// assert!((plan.cost() - 0.2).abs() < f32::EPSILON);
/// assert!((plan.net_value() - 0.7).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    actions: Vec<Action>,
    goal: Goal,
}

impl Plan {
    /// Creates a plan from an ordered action sequence and the goal it
    /// reaches.
    pub fn new(actions: Vec<Action>, goal: Goal) -> Self {
        Self { actions, goal }
    }

    /// The actions of this plan, in execution order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// The goal this plan reaches.
    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    /// Total cost of the plan: the sum of its action costs.
    pub fn cost(&self) -> f32 {
        self.actions.iter().map(Action::cost).sum()
    }

    /// Total value of the plan's actions.
    pub fn actions_value(&self) -> f32 {
        self.actions.iter().map(Action::value).sum()
    }

    /// Net value of the plan: goal value plus actions value minus cost.
    pub fn net_value(&self) -> f32 {
        self.goal.value() + self.actions_value() - self.cost()
    }

    /// Whether the plan has no actions left to perform.
    ///
    /// An empty plan means the goal was already satisfied by the initial
    /// state.
    pub fn is_complete(&self) -> bool {
        self.actions.is_empty()
    }

    /// The names of the plan's actions, in execution order.
    pub fn action_names(&self) -> Vec<&str> {
        self.actions.iter().map(Action::name).collect()
    }
}

impl fmt::Display for Plan {
    /// Formats the plan as `goal <- [a, b, c] (cost=..., net_value=...)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <- [{}] (cost={}, net_value={})",
            self.goal.name(),
            self.action_names().join(", "),
            self.cost(),
            self.net_value()
        )
    }
}
