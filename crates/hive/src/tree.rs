//! Text rendering of an agent tree for the start-up log.

use std::fmt::Write;

use crate::Agent;

/// Renders `root` and its descendants with box-drawing connectors.
///
/// ```text
/// planning_agent [coordinator, model: gpt-4.1]
/// ├── deep_analyzer_agent [specialist, model: gpt-4.1]
/// └── deep_researcher_agent [specialist, model: gpt-4.1]
/// ```
pub fn render_tree(root: &dyn Agent) -> String {
    let mut out = String::new();
    out.push_str(&label(root));
    out.push('\n');
    render_children(root, "", &mut out);
    out
}

fn render_children(agent: &dyn Agent, prefix: &str, out: &mut String) {
    let children = agent.children();
    for (idx, child) in children.iter().enumerate() {
        let last = idx + 1 == children.len();
        let connector = if last { "└── " } else { "├── " };
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{prefix}{connector}{}", label(child.as_ref()));
        let nested = format!("{prefix}{}", if last { "    " } else { "│   " });
        render_children(child.as_ref(), &nested, out);
    }
}

fn label(agent: &dyn Agent) -> String {
    match agent.model() {
        Some(model) => format!("{} [{}, model: {}]", agent.name(), agent.role(), model),
        None => format!("{} [{}]", agent.name(), agent.role()),
    }
}
