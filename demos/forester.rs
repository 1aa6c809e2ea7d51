//! End-to-end walk through the planning pipeline: build an action
//! library, plan to competing goals, and prune the library down to the
//! actions any best plan actually uses.
//!
//! Run with: `cargo run --example forester`

use std::error::Error;

use goalplan::{
    Action, ConditionDetermination, Goal, Planner, PlanningSystem, WorldState,
};

fn conditions(entries: &[(&str, ConditionDetermination)]) -> WorldState {
    let mut state = WorldState::new();
    for (key, det) in entries {
        state.set(*key, *det);
    }
    state
}

fn main() -> Result<(), Box<dyn Error>> {
    let t = ConditionDetermination::True;

    // What the forester can do
    let actions = vec![
        Action::new(
            "forge_axe",
            0.3,
            0.0,
            conditions(&[("has_metal", t)]),
            conditions(&[("has_axe", t)]),
        )?,
        Action::new(
            "chop_wood",
            0.2,
            0.1,
            conditions(&[("has_axe", t)]),
            conditions(&[("has_wood", t)]),
        )?,
        Action::new(
            "build_cabin",
            0.4,
            0.2,
            conditions(&[("has_wood", t)]),
            conditions(&[("has_cabin", t)]),
        )?,
        Action::new(
            "light_fire",
            0.1,
            0.1,
            conditions(&[("has_wood", t)]),
            conditions(&[("fire_lit", t)]),
        )?,
        // Nothing below ever helps a goal
        Action::new(
            "whittle_flute",
            0.2,
            0.1,
            conditions(&[("has_wood", t)]),
            conditions(&[("has_flute", t)]),
        )?,
    ];

    // What the forester wants
    let goals = vec![
        Goal::new("sheltered", conditions(&[("has_cabin", t)]), 0.9)?,
        Goal::new("warm", conditions(&[("fire_lit", t)]), 0.7)?,
    ];

    // What the world looks like right now
    let initial = conditions(&[("has_metal", t)]);

    let planner = Planner::new(actions.clone());

    println!("Plans, best first:");
    for plan in planner.plans_to_goals(&initial, &goals) {
        println!("  {}", plan);
    }

    if let Some(best) = planner.best_value_plan_to_any_goal(&initial, &goals) {
        println!("\nChosen: {}", best);
        println!("Steps:");
        for action in best.actions() {
            println!("  - {}", action);
        }
    }

    // Shrink the library to what any best plan uses
    let system = PlanningSystem::new(actions, goals)?;
    let pruned = system.prune(&initial);
    println!(
        "\nPruned library: {} of {} actions remain",
        pruned.actions().len(),
        system.actions().len()
    );
    for action in pruned.actions() {
        println!("  - {}", action.name());
    }

    Ok(())
}
