use std::fs::File;
use std::io::Write;

use crate::{Action, Plan, Result, WorldState};

/// A visualizer for GOAP plans that generates Graphviz DOT files
pub struct GoapVisualizer;

impl GoapVisualizer {
    /// Create a new GOAP visualizer
    pub fn new() -> Self {
        Self
    }

    /// Generate a DOT file visualization of a plan and the library it was
    /// planned from
    pub fn visualize_plan(
        &self,
        actions: &[Action],
        initial: &WorldState,
        plan: &Plan,
        filename: &str,
    ) -> Result<()> {
        let mut file = File::create(filename)?;

        // Write DOT file header
        writeln!(file, "digraph GOAP {{")?;
        writeln!(file, "    rankdir=LR;")?;
        writeln!(
            file,
            "    node [shape=box, style=filled, fillcolor=lightblue];"
        )?;
        writeln!(file, "    edge [fontsize=10];")?;

        // Initial and goal states
        writeln!(
            file,
            "    initial [label=\"Initial State\\n{}\", fillcolor=lightgreen];",
            initial
        )?;
        writeln!(
            file,
            "    goal [label=\"Goal: {}\\n{}\", fillcolor=lightpink];",
            plan.goal().name(),
            plan.goal().preconditions()
        )?;

        // All available actions
        for (i, action) in actions.iter().enumerate() {
            writeln!(
                file,
                "    action_{} [label=\"{}\\nCost: {} Value: {}\\nPre: {}\\nEff: {}\"];",
                i,
                action.name(),
                action.cost(),
                action.value(),
                action.preconditions(),
                action.effects()
            )?;
        }

        // The chosen plan as a chain from the initial state to the goal
        let mut previous = "initial".to_string();
        for (i, action) in plan.actions().iter().enumerate() {
            let step = format!("step_{}", i);
            writeln!(
                file,
                "    {} [label=\"{}. {}\", fillcolor=lightyellow];",
                step,
                i + 1,
                action.name()
            )?;
            writeln!(file, "    {} -> {} [color=blue, penwidth=2];", previous, step)?;
            previous = step;
        }
        writeln!(file, "    {} -> goal [color=blue, penwidth=2];", previous)?;

        writeln!(file, "}}")?;
        Ok(())
    }
}

impl Default for GoapVisualizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConditionDetermination, Goal};

    #[test]
    fn test_visualize_plan_writes_dot_file() {
        let mut effects = WorldState::new();
        effects.set("has_wood", ConditionDetermination::True);
        let chop =
            Action::new("chop_wood", 0.2, 0.1, WorldState::new(), effects).unwrap();

        let mut wanted = WorldState::new();
        wanted.set("has_wood", ConditionDetermination::True);
        let goal = Goal::new("stockpile", wanted, 0.8).unwrap();

        let plan = Plan::new(vec![chop.clone()], goal);

        let dir = std::env::temp_dir().join("goalplan_viz_test.dot");
        let path = dir.to_str().unwrap();

        let visualizer = GoapVisualizer::new();
        visualizer
            .visualize_plan(&[chop], &WorldState::new(), &plan, path)
            .unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("digraph GOAP {"));
        assert!(contents.contains("chop_wood"));
        let _ = std::fs::remove_file(path);
    }
}
