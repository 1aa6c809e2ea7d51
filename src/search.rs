//! Search engine: A* over the space of world states reachable by applying
//! actions.
//!
//! The engine explores states produced by applying action effects, guided
//! by a heuristic estimating the number of unmet goal preconditions, and
//! returns a minimum-cost action sequence reaching a goal-satisfying state.
//! "No plan exists" is an expected outcome and is reported as `None`, not
//! as an error.

use std::cmp::Ordering;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::{Action, Goal, WorldState};

/// Default bound on the number of states a single search may expand.
///
/// Pathological action libraries can produce state spaces exponential in
/// the number of condition keys; the budget turns a runaway search into a
/// "no plan" result.
pub const DEFAULT_MAX_EXPANSIONS: usize = 10_000;

/// Trait defining the interface for search algorithms used in GOAP.
///
/// Implementations find a sequence of actions transforming an initial
/// state into one satisfying the goal, or report that none exists within
/// their budget by returning `None`.
pub trait SearchAlgorithm: Send + Sync {
    /// Finds an action sequence from `initial` to a state satisfying
    /// `goal`.
    ///
    /// # Returns
    ///
    /// * `Some(actions)` - An ordered sequence reaching the goal (empty if
    ///   the goal is already satisfied)
    /// * `None` - No sequence reaches the goal within the search budget
    fn search(&self, actions: &[Action], initial: &WorldState, goal: &Goal)
        -> Option<Vec<Action>>;
}

/// A heuristic estimating remaining cost from a state to a goal.
pub trait HeuristicStrategy: Send + Sync {
    /// Estimates the remaining cost from `state` to `goal`, given the
    /// action library the search draws from.
    fn calculate(&self, state: &WorldState, goal: &Goal, actions: &[Action]) -> f32;
}

/// Default heuristic: the number of goal preconditions not met by the
/// state, scaled so it never overestimates.
///
/// Fixing `k` unmet conditions takes at least `k / E` actions, where `E`
/// is the largest effect count of any action, and every action costs at
/// least the library's cheapest cost. `k * min_cost / E` is therefore a
/// lower bound on the true remaining cost, which keeps A* optimal.
pub struct DefaultHeuristic;

impl HeuristicStrategy for DefaultHeuristic {
    fn calculate(&self, state: &WorldState, goal: &Goal, actions: &[Action]) -> f32 {
        let unmet = state.unsatisfied_count(goal.preconditions());
        if unmet == 0 {
            return 0.0;
        }

        let min_cost = actions.iter().map(Action::cost).fold(f32::INFINITY, f32::min);
        let max_effects = actions
            .iter()
            .map(|a| a.effects().len())
            .max()
            .unwrap_or(0);
        if !min_cost.is_finite() || max_effects == 0 {
            return 0.0;
        }

        unmet as f32 * min_cost / max_effects as f32
    }
}

/// Zero heuristic for algorithms like Dijkstra that search uninformed.
pub struct ZeroHeuristic;

impl HeuristicStrategy for ZeroHeuristic {
    fn calculate(&self, _state: &WorldState, _goal: &Goal, _actions: &[Action]) -> f32 {
        0.0
    }
}

/// A node in the search space.
#[derive(Debug, Clone)]
struct Node {
    /// The world state at this node
    state: WorldState,
    /// Index of the parent node in the arena
    parent: Option<usize>,
    /// Action that led to this state (from the parent)
    action: Option<Action>,
    /// Path cost from the start to this node
    g_cost: f32,
    /// Estimated cost from this node to the goal
    h_cost: f32,
}

impl Node {
    /// Total estimated cost (f = g + h).
    fn f_cost(&self) -> f32 {
        self.g_cost + self.h_cost
    }
}

/// Open-set entry with the ordering used by the priority queue.
///
/// Ties on f are broken by lower h, then by insertion order, which keeps
/// the search fully deterministic for a given action library.
#[derive(Debug, Clone)]
struct OpenEntry {
    /// Index of the node in the arena
    idx: usize,
    f_cost: f32,
    h_cost: f32,
    /// Monotonic insertion counter
    seq: u64,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_cost
            .total_cmp(&other.f_cost)
            .then(self.h_cost.total_cmp(&other.h_cost))
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

/// Filters the actions applicable in `state`, cheapest first.
///
/// The sort is stable, so equal-cost actions keep library order and
/// successor generation stays deterministic.
fn applicable_actions<'a>(actions: &'a [Action], state: &WorldState) -> Vec<&'a Action> {
    let mut applicable = actions
        .iter()
        .filter(|a| a.can_perform(state))
        .collect::<Vec<_>>();

    applicable.sort_by(|a, b| a.cost().total_cmp(&b.cost()));
    applicable
}

/// Manages the state of one search: the node arena, the open and closed
/// sets, and the best cost recorded per state.
///
/// Nodes live in a `Vec` arena and are discarded wholesale when the search
/// ends; node volume can be large, and individual ownership would buy
/// nothing here.
struct SearchContext {
    nodes: Vec<Node>,
    open_set: BinaryHeap<Reverse<OpenEntry>>,
    /// States already expanded
    closed_set: HashSet<WorldState>,
    /// Cheapest g recorded per discovered state; pushes that do not
    /// improve on it are suppressed
    best_g: HashMap<WorldState, f32>,
    next_seq: u64,
}

impl SearchContext {
    fn new(
        initial: &WorldState,
        goal: &Goal,
        actions: &[Action],
        heuristic: &dyn HeuristicStrategy,
    ) -> Self {
        let mut context = Self {
            nodes: Vec::new(),
            open_set: BinaryHeap::new(),
            closed_set: HashSet::new(),
            best_g: HashMap::new(),
            next_seq: 0,
        };

        context.nodes.push(Node {
            state: initial.clone(),
            parent: None,
            action: None,
            g_cost: 0.0,
            h_cost: heuristic.calculate(initial, goal, actions),
        });
        context.best_g.insert(initial.clone(), 0.0);
        context.push_open(0);
        context
    }

    fn push_open(&mut self, idx: usize) {
        let node = &self.nodes[idx];
        let entry = OpenEntry {
            idx,
            f_cost: node.f_cost(),
            h_cost: node.h_cost,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.open_set.push(Reverse(entry));
    }

    /// Pops the lowest-f entry, or `None` when the open set is empty.
    fn pop_open(&mut self) -> Option<usize> {
        self.open_set.pop().map(|Reverse(entry)| entry.idx)
    }

    /// Considers the state reached by applying `action` at `parent_idx`,
    /// pushing a new node when it improves on the best recorded cost.
    fn consider_successor(
        &mut self,
        parent_idx: usize,
        action: &Action,
        all_actions: &[Action],
        heuristic: &dyn HeuristicStrategy,
        goal: &Goal,
    ) {
        let parent_g = self.nodes[parent_idx].g_cost;
        let next_state = self.nodes[parent_idx].state.apply(action.effects());

        if self.closed_set.contains(&next_state) {
            return;
        }

        let tentative_g = parent_g + action.cost();
        if let Some(&recorded) = self.best_g.get(&next_state) {
            if recorded <= tentative_g {
                return;
            }
        }
        self.best_g.insert(next_state.clone(), tentative_g);

        let h_cost = heuristic.calculate(&next_state, goal, all_actions);
        let idx = self.nodes.len();
        self.nodes.push(Node {
            state: next_state,
            parent: Some(parent_idx),
            action: Some(action.clone()),
            g_cost: tentative_g,
            h_cost,
        });
        self.push_open(idx);
    }

    /// Reconstructs the action sequence from the root to the given node by
    /// walking parent links and reversing.
    fn reconstruct_path(&self, node_idx: usize) -> Vec<Action> {
        let mut path = Vec::new();
        let mut current_idx = node_idx;

        while let Some(node) = self.nodes.get(current_idx) {
            if let Some(action) = &node.action {
                path.push(action.clone());
            }

            if let Some(parent_idx) = node.parent {
                current_idx = parent_idx;
            } else {
                break;
            }
        }

        path.reverse();
        path
    }
}

/// A* search over action-application states.
///
/// # Examples
///
/// ```
/// use goalplan::{
///     Action, AStarSearch, ConditionDetermination, Goal, SearchAlgorithm, WorldState,
/// };
///
/// let mut effects = WorldState::new();
/// effects.set("done", ConditionDetermination::True);
/// let act = Action::new("do_it", 0.1, 0.0, WorldState::new(), effects).unwrap();
///
/// let mut wanted = WorldState::new();
/// wanted.set("done", ConditionDetermination::True);
/// let goal = Goal::new("finish", wanted, 1.0).unwrap();
///
/// let astar = AStarSearch::default();
/// let plan = astar.search(&[act], &WorldState::new(), &goal).unwrap();
/// assert_eq!(plan.len(), 1);
/// ```
pub struct AStarSearch {
    heuristic: Box<dyn HeuristicStrategy>,
    max_expansions: usize,
}

impl AStarSearch {
    /// Creates a new A* search with the given heuristic.
    pub fn new(heuristic: Box<dyn HeuristicStrategy>) -> Self {
        Self {
            heuristic,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
        }
    }

    /// Creates a new A* search with the default heuristic.
    pub fn with_default_heuristic() -> Self {
        Self::new(Box::new(DefaultHeuristic))
    }

    /// Sets the bound on expanded states before the search gives up.
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }
}

impl Default for AStarSearch {
    fn default() -> Self {
        Self::with_default_heuristic()
    }
}

impl SearchAlgorithm for AStarSearch {
    fn search(
        &self,
        actions: &[Action],
        initial: &WorldState,
        goal: &Goal,
    ) -> Option<Vec<Action>> {
        if goal.is_satisfied_by(initial) {
            return Some(Vec::new()); // Goal already achieved
        }

        let mut context = SearchContext::new(initial, goal, actions, self.heuristic.as_ref());
        let mut expanded = 0usize;

        while let Some(current_idx) = context.pop_open() {
            let state = context.nodes[current_idx].state.clone();

            if goal.is_satisfied_by(&state) {
                return Some(context.reconstruct_path(current_idx));
            }

            // Stale entry: a cheaper path to this state was expanded already
            if context.closed_set.contains(&state) {
                continue;
            }

            if expanded >= self.max_expansions {
                log::warn!(
                    "search budget of {} expanded states exhausted before reaching goal '{}'",
                    self.max_expansions,
                    goal.name()
                );
                return None;
            }

            context.closed_set.insert(state.clone());
            expanded += 1;

            for action in applicable_actions(actions, &state) {
                context.consider_successor(
                    current_idx,
                    action,
                    actions,
                    self.heuristic.as_ref(),
                    goal,
                );
            }
        }

        log::debug!(
            "open set exhausted after {} expansions; no plan reaches goal '{}'",
            expanded,
            goal.name()
        );
        None
    }
}

/// Dijkstra's algorithm: A* searching uninformed with a zero heuristic.
#[derive(Default)]
pub struct DijkstraSearch;

impl SearchAlgorithm for DijkstraSearch {
    fn search(
        &self,
        actions: &[Action],
        initial: &WorldState,
        goal: &Goal,
    ) -> Option<Vec<Action>> {
        let astar = AStarSearch::new(Box::new(ZeroHeuristic));
        astar.search(actions, initial, goal)
    }
}
