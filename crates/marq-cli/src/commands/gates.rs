//! Gates command implementation.

use console::style;
use marq_ir::Gate;

/// Execute the gates command.
pub fn execute() {
    println!(
        "{}",
        style(format!(
            "{:<14} {:<6} {:<22} {:<8} {}",
            "NAME", "ARITY", "FAMILY", "FUSABLE", "MARKER"
        ))
        .bold()
    );

    for gate in Gate::all() {
        let arity = gate
            .arity()
            .map_or_else(|| "var".to_string(), |n| n.to_string());
        println!(
            "{:<14} {:<6} {:<22} {:<8} {}",
            style(gate.name()).cyan(),
            arity,
            format!("{:?}", gate.family()),
            yes_no(gate.is_fusable()),
            yes_no(gate.is_marker()),
        );
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
