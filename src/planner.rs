//! # Planner Module for Goal-Oriented Action Planning (GOAP)
//!
//! The planner is the central component of the GOAP system, responsible
//! for:
//! - Finding optimal sequences of actions to achieve goals
//! - Pruning found sequences down to the actions that matter
//! - Ranking plans across competing goals by net value
//!
//! ## Overview
//!
//! A planning call:
//! 1. Starts from a current world state
//! 2. Runs A* over the states reachable by applying actions
//! 3. Optimizes the raw result (backward and forward pruning, then a
//!    validating simulation)
//! 4. Wraps the sequence as a [`Plan`] bound to the goal
//!
//! "No plan exists" is reported as `None`; it is an expected outcome the
//! caller handles, not an error.
//!
//! ## Basic Usage
//!
//! ```
//! use goalplan::{Action, ConditionDetermination, Goal, Planner, WorldState};
//!
//! let t = ConditionDetermination::True;
//!
//! let mut pre = WorldState::new();
//! pre.set("has_money", t);
//! let mut eff = WorldState::new();
//! eff.set("has_ingredients", t);
//! let get_ingredients = Action::new("get_ingredients", 0.2, 0.0, pre, eff).unwrap();
//!
//! let mut pre = WorldState::new();
//! pre.set("has_ingredients", t);
//! let mut eff = WorldState::new();
//! eff.set("has_meal", t);
//! let cook_meal = Action::new("cook_meal", 0.3, 0.0, pre, eff).unwrap();
//!
//! let planner = Planner::new(vec![get_ingredients, cook_meal]);
//!
//! let mut current = WorldState::new();
//! current.set("has_money", t);
//!
//! let mut wanted = WorldState::new();
//! wanted.set("has_meal", t);
//! let goal = Goal::new("eat", wanted, 0.8).unwrap();
//!
//! let plan = planner.plan_to_goal(&current, &goal).unwrap();
//! assert_eq!(plan.action_names(), ["get_ingredients", "cook_meal"]);
//! ```

use crate::optimizer::PlanOptimizer;
use crate::search::{AStarSearch, SearchAlgorithm};
use crate::{Action, Goal, GoapError, Plan, Result, WorldState};

/// The GOAP planner: search plus optimization over an action library.
///
/// A `Planner` holds an immutable snapshot of the available actions and a
/// search algorithm (A* by default). Each planning call operates on its
/// own search state and produces an independent result, so a planner can
/// be shared read-only across threads.
pub struct Planner {
    /// Available actions that can be used in planning
    actions: Vec<Action>,
    /// The algorithm used to search for a raw plan
    search_algorithm: Box<dyn SearchAlgorithm>,
    optimizer: PlanOptimizer,
}

impl Planner {
    /// Creates a new planner over the given actions using A* search.
    ///
    /// # Examples
    ///
    /// ```
    /// use goalplan::{Action, Planner, WorldState};
    ///
    /// let wait = Action::new("wait", 0.1, 0.0, WorldState::new(), WorldState::new()).unwrap();
    /// let planner = Planner::new(vec![wait]);
    /// assert_eq!(planner.actions().len(), 1);
    /// ```
    pub fn new(actions: Vec<Action>) -> Self {
        Self::with_search_algorithm(actions, Box::new(AStarSearch::default()))
    }

    /// Creates a new planner with a custom search algorithm.
    ///
    /// # Examples
    ///
    /// ```
    /// use goalplan::{Action, DijkstraSearch, Planner};
    ///
    /// let planner = Planner::with_search_algorithm(Vec::new(), Box::new(DijkstraSearch));
    /// ```
    pub fn with_search_algorithm(
        actions: Vec<Action>,
        search_algorithm: Box<dyn SearchAlgorithm>,
    ) -> Self {
        Self {
            actions,
            search_algorithm,
            optimizer: PlanOptimizer::new(),
        }
    }

    /// The action library this planner plans over.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Finds an optimized plan reaching `goal` from `initial`.
    ///
    /// Runs the search, then the optimizer (backward pruning, forward
    /// pruning, validating simulation), and wraps the result as a
    /// [`Plan`]. Returns `None` when no action sequence reaches the goal
    /// within the search budget.
    ///
    /// A goal already satisfied by `initial` yields a complete plan with
    /// no actions.
    ///
    /// # Examples
    ///
    /// ```
    /// use goalplan::{ConditionDetermination, Goal, Planner, WorldState};
    ///
    /// let planner = Planner::new(Vec::new());
    ///
    /// let mut state = WorldState::new();
    /// state.set("goal_met", ConditionDetermination::True);
    ///
    /// let mut wanted = WorldState::new();
    /// wanted.set("goal_met", ConditionDetermination::True);
    /// let goal = Goal::new("done", wanted, 0.5).unwrap();
    ///
    /// let plan = planner.plan_to_goal(&state, &goal).unwrap();
    /// assert!(plan.is_complete());
    ///
    /// // An unreachable goal is a None, not an error
    /// let mut wanted = WorldState::new();
    /// wanted.set("impossible", ConditionDetermination::True);
    /// let unreachable = Goal::new("nope", wanted, 0.5).unwrap();
    /// assert!(planner.plan_to_goal(&state, &unreachable).is_none());
    /// ```
    pub fn plan_to_goal(&self, initial: &WorldState, goal: &Goal) -> Option<Plan> {
        let raw = self.search_algorithm.search(&self.actions, initial, goal)?;
        let optimized = self.optimizer.optimize(initial, raw, goal);
        Some(Plan::new(optimized, goal.clone()))
    }

    /// Computes one plan per goal, skipping unreachable goals, sorted by
    /// descending net value.
    ///
    /// The sort is stable: goals with equal net value keep their input
    /// order.
    pub fn plans_to_goals(&self, initial: &WorldState, goals: &[Goal]) -> Vec<Plan> {
        let mut plans: Vec<Plan> = goals
            .iter()
            .filter_map(|goal| self.plan_to_goal(initial, goal))
            .collect();
        plans.sort_by(|a, b| b.net_value().total_cmp(&a.net_value()));
        plans
    }

    /// Returns the most valuable plan to any of the given goals, or
    /// `None` if none of them is reachable.
    pub fn best_value_plan_to_any_goal(
        &self,
        initial: &WorldState,
        goals: &[Goal],
    ) -> Option<Plan> {
        self.plans_to_goals(initial, goals).into_iter().next()
    }
}

/// Cloning a planner preserves the actions but resets the search
/// algorithm to the default A*, since trait objects cannot be cloned.
impl Clone for Planner {
    fn clone(&self) -> Self {
        Self::new(self.actions.clone())
    }
}

/// A full planning library: the actions and goals a system cares about.
///
/// Action names must be unique within a system; duplicates are rejected
/// at construction.
///
/// # Examples
///
/// ```
/// use goalplan::{Action, ConditionDetermination, Goal, PlanningSystem, WorldState};
///
/// let mut eff = WorldState::new();
/// eff.set("fed", ConditionDetermination::True);
/// let eat = Action::new("eat", 0.1, 0.2, WorldState::new(), eff).unwrap();
///
/// let mut wanted = WorldState::new();
/// wanted.set("fed", ConditionDetermination::True);
/// let goal = Goal::new("be_fed", wanted, 0.9).unwrap();
///
/// let system = PlanningSystem::new(vec![eat], vec![goal]).unwrap();
/// assert_eq!(system.actions().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct PlanningSystem {
    actions: Vec<Action>,
    goals: Vec<Goal>,
}

impl PlanningSystem {
    /// Creates a planning system from an action library and a goal set.
    ///
    /// # Errors
    ///
    /// Returns [`GoapError::DuplicateActionName`] if two actions share a
    /// name.
    pub fn new(actions: Vec<Action>, goals: Vec<Goal>) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for action in &actions {
            if !seen.insert(action.name()) {
                return Err(GoapError::DuplicateActionName(action.name().to_string()));
            }
        }
        Ok(Self { actions, goals })
    }

    /// The action library of this system.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// The goals of this system.
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Reduces the action library to the actions that appear in some best
    /// plan to some goal, from the given initial state.
    ///
    /// Goals with no plan are skipped; the goal set is returned
    /// unchanged. Pruning shrinks the branching factor of future searches
    /// without losing any plan the system would actually choose.
    ///
    /// # Examples
    ///
    /// ```
    /// use goalplan::{Action, ConditionDetermination, Goal, PlanningSystem, WorldState};
    ///
    /// let t = ConditionDetermination::True;
    ///
    /// let mut eff = WorldState::new();
    /// eff.set("fed", t);
    /// let eat = Action::new("eat", 0.1, 0.0, WorldState::new(), eff).unwrap();
    ///
    /// let mut eff = WorldState::new();
    /// eff.set("juggling", t);
    /// let juggle = Action::new("juggle", 0.1, 0.0, WorldState::new(), eff).unwrap();
    ///
    /// let mut wanted = WorldState::new();
    /// wanted.set("fed", t);
    /// let goal = Goal::new("be_fed", wanted, 0.9).unwrap();
    ///
    /// let system = PlanningSystem::new(vec![eat, juggle], vec![goal]).unwrap();
    /// let pruned = system.prune(&WorldState::new());
    ///
    /// // juggle contributes to no goal and is dropped
    /// let names: Vec<_> = pruned.actions().iter().map(|a| a.name()).collect();
    /// assert_eq!(names, ["eat"]);
    /// ```
    pub fn prune(&self, initial: &WorldState) -> PlanningSystem {
        let planner = Planner::new(self.actions.clone());
        let plans = planner.plans_to_goals(initial, &self.goals);

        let used: std::collections::HashSet<&str> = plans
            .iter()
            .flat_map(|plan| plan.actions().iter().map(Action::name))
            .collect();

        let actions = self
            .actions
            .iter()
            .filter(|action| used.contains(action.name()))
            .cloned()
            .collect();

        // Names were unique before, so the subset is too
        Self {
            actions,
            goals: self.goals.clone(),
        }
    }
}
