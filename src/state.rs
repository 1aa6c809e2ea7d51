//! # World-State Module for Goal-Oriented Action Planning (GOAP)
//!
//! This module provides [`ConditionDetermination`], the three-valued logic
//! underlying the planner, and [`WorldState`], the symbolic snapshot of the
//! world the planner searches over.
//!
//! ## Three-valued conditions
//!
//! Every condition key in a world state is determined as `True`, `False` or
//! `Unknown`. `Unknown` means "not asserted either way" and is distinct from
//! `False`: a precondition requiring `False` is not satisfied by a condition
//! that is merely undetermined. Keys absent from a state read as `Unknown`.
//!
//! ## Roles in GOAP
//!
//! `WorldState` is used for:
//!
//! - **World state**: the current conditions of the environment
//! - **Preconditions**: what an action or goal requires of the world
//! - **Effects**: what an action asserts about the world when applied
//!
//! ## Basic Usage
//!
//! ```
//! use goalplan::{ConditionDetermination, WorldState};
//!
//! let mut current = WorldState::new();
//! current.set("has_axe", ConditionDetermination::True);
//! current.set("has_wood", ConditionDetermination::False);
//!
//! let mut goal = WorldState::new();
//! goal.set("has_wood", ConditionDetermination::True);
//!
//! // The goal is not satisfied yet
//! assert!(!current.satisfies(&goal));
//!
//! // Applying effects produces a new state; the original is untouched
//! let mut effects = WorldState::new();
//! effects.set("has_wood", ConditionDetermination::True);
//! let next = current.apply(&effects);
//!
//! assert!(next.satisfies(&goal));
//! assert!(!current.satisfies(&goal));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// The determination of a single condition in a [`WorldState`].
///
/// GOAP planning works over three-valued logic rather than booleans:
/// a condition can be asserted true, asserted false, or not asserted at
/// all. Conflating `Unknown` with `False` would break precondition
/// matching, so the undetermined case is an explicit variant.
///
/// # Examples
///
/// ```
/// use goalplan::ConditionDetermination;
///
/// assert_eq!(ConditionDetermination::from(true), ConditionDetermination::True);
/// assert_eq!(ConditionDetermination::from(false), ConditionDetermination::False);
/// assert_ne!(ConditionDetermination::Unknown, ConditionDetermination::False);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionDetermination {
    /// The condition is asserted to hold.
    True,
    /// The condition is asserted not to hold.
    False,
    /// The condition is not asserted either way.
    Unknown,
}

impl From<bool> for ConditionDetermination {
    fn from(value: bool) -> Self {
        if value {
            ConditionDetermination::True
        } else {
            ConditionDetermination::False
        }
    }
}

impl fmt::Display for ConditionDetermination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionDetermination::True => write!(f, "TRUE"),
            ConditionDetermination::False => write!(f, "FALSE"),
            ConditionDetermination::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A symbolic snapshot of the world as condition key → determination pairs.
///
/// `WorldState` serves as the current world state, as action preconditions
/// and effects, and as goal preconditions. Two world states are equal iff
/// their mappings are equal, which is what the search engine relies on for
/// closed-set membership.
///
/// Reading a key that is absent from the mapping yields
/// [`ConditionDetermination::Unknown`]; an explicit `Unknown` entry and an
/// absent key read the same but remain distinct states under equality.
///
/// # Examples
///
/// ```
/// use goalplan::{ConditionDetermination, WorldState};
///
/// let mut state = WorldState::new();
/// state.set("door_open", ConditionDetermination::False);
///
/// assert_eq!(state.get("door_open"), Some(ConditionDetermination::False));
/// assert_eq!(state.get("window_open"), None);
/// assert_eq!(
///     state.determination("window_open"),
///     ConditionDetermination::Unknown
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldState {
    state: HashMap<String, ConditionDetermination>,
}

impl WorldState {
    /// Creates a new empty world state.
    ///
    /// # Examples
    ///
    /// ```
    /// use goalplan::WorldState;
    ///
    /// let state = WorldState::new();
    /// assert!(state.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            state: HashMap::new(),
        }
    }

    /// Sets the determination for a condition key.
    ///
    /// Adds the key or overwrites an existing determination. Setting a key
    /// to `Unknown` records an explicit "not asserted" entry; it does not
    /// remove the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use goalplan::{ConditionDetermination, WorldState};
    ///
    /// let mut state = WorldState::new();
    /// state.set("enemy_visible", ConditionDetermination::False);
    /// state.set("enemy_visible", ConditionDetermination::True);
    ///
    /// assert_eq!(state.get("enemy_visible"), Some(ConditionDetermination::True));
    /// ```
    pub fn set(&mut self, key: impl Into<String>, determination: ConditionDetermination) {
        self.state.insert(key.into(), determination);
    }

    /// Gets the determination recorded for a key, or `None` if the key is
    /// absent from the state.
    pub fn get(&self, key: &str) -> Option<ConditionDetermination> {
        self.state.get(key).copied()
    }

    /// Reads the determination for a key, treating absent keys as
    /// [`ConditionDetermination::Unknown`].
    ///
    /// This is the reading used for all precondition matching: a
    /// requirement of `True` or `False` fails against an absent key, while
    /// a requirement of `Unknown` succeeds.
    ///
    /// # Examples
    ///
    /// ```
    /// use goalplan::{ConditionDetermination, WorldState};
    ///
    /// let state = WorldState::new();
    /// assert_eq!(state.determination("anything"), ConditionDetermination::Unknown);
    /// ```
    pub fn determination(&self, key: &str) -> ConditionDetermination {
        self.get(key).unwrap_or(ConditionDetermination::Unknown)
    }

    /// Checks whether this state satisfies the requirements in another
    /// state.
    ///
    /// Every key in `required` must read the required determination in this
    /// state, with absent keys reading as `Unknown`. This state may contain
    /// additional keys not mentioned by `required`.
    ///
    /// Used to check goal satisfaction and action applicability alike.
    ///
    /// # Examples
    ///
    /// ```
    /// use goalplan::{ConditionDetermination, WorldState};
    ///
    /// let mut world = WorldState::new();
    /// world.set("has_key", ConditionDetermination::True);
    /// world.set("door_open", ConditionDetermination::False);
    ///
    /// let mut required = WorldState::new();
    /// required.set("has_key", ConditionDetermination::True);
    /// assert!(world.satisfies(&required));
    ///
    /// // False is required, but the key is undetermined: not satisfied
    /// let mut strict = WorldState::new();
    /// strict.set("alarm_armed", ConditionDetermination::False);
    /// assert!(!world.satisfies(&strict));
    ///
    /// // Unknown is required, and the key is absent: satisfied
    /// let mut open = WorldState::new();
    /// open.set("alarm_armed", ConditionDetermination::Unknown);
    /// assert!(world.satisfies(&open));
    /// ```
    pub fn satisfies(&self, required: &WorldState) -> bool {
        required
            .iter()
            .all(|(key, required_det)| self.determination(key) == required_det)
    }

    /// Counts the requirements in `required` not met by this state.
    ///
    /// This is the quantity the default search heuristic estimates
    /// remaining plan cost with: each unmet condition needs at least one
    /// action to fix it.
    pub fn unsatisfied_count(&self, required: &WorldState) -> usize {
        required
            .iter()
            .filter(|(key, required_det)| self.determination(key) != *required_det)
            .count()
    }

    /// Creates a new state by applying `effects` on top of this state.
    ///
    /// Every key in `effects` overwrites the corresponding entry in the
    /// copy; keys absent from `effects` are inherited unchanged. The
    /// receiver is not modified.
    ///
    /// # Examples
    ///
    /// ```
    /// use goalplan::{ConditionDetermination, WorldState};
    ///
    /// let mut initial = WorldState::new();
    /// initial.set("has_ore", ConditionDetermination::True);
    /// initial.set("has_ingot", ConditionDetermination::False);
    ///
    /// let mut effects = WorldState::new();
    /// effects.set("has_ingot", ConditionDetermination::True);
    ///
    /// let next = initial.apply(&effects);
    /// assert_eq!(next.get("has_ingot"), Some(ConditionDetermination::True));
    /// assert_eq!(next.get("has_ore"), Some(ConditionDetermination::True));
    /// assert_eq!(initial.get("has_ingot"), Some(ConditionDetermination::False));
    /// ```
    pub fn apply(&self, effects: &WorldState) -> Self {
        let mut next = self.clone();
        for (key, determination) in effects.iter() {
            next.set(key, determination);
        }
        next
    }

    /// Iterates over the condition entries of this state.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ConditionDetermination)> {
        self.state.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Returns whether the state contains the given key.
    pub fn contains(&self, key: &str) -> bool {
        self.state.contains_key(key)
    }

    /// Returns the number of condition entries in the state.
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Returns whether the state has no condition entries.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}

impl From<HashMap<String, ConditionDetermination>> for WorldState {
    fn from(state: HashMap<String, ConditionDetermination>) -> Self {
        Self { state }
    }
}

impl Hash for WorldState {
    /// Hashes the entries in key order so that the same mapping always
    /// produces the same hash regardless of insertion order.
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        let mut items: Vec<_> = self.state.iter().collect();
        items.sort_by(|a, b| a.0.cmp(b.0));

        for (key, determination) in items {
            key.hash(hasher);
            determination.hash(hasher);
        }
    }
}

impl fmt::Display for WorldState {
    /// Formats the state as `{key1: TRUE, key2: UNKNOWN, ...}` in key
    /// order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut items: Vec<_> = self.state.iter().collect();
        items.sort_by(|a, b| a.0.cmp(b.0));

        write!(f, "{{")?;
        let mut first = true;
        for (key, determination) in items {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, determination)?;
            first = false;
        }
        write!(f, "}}")
    }
}
