//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - stabilizer circuit canonicalization, propagation and grading",
        style("Marq").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  marq-ir     Gates, layers, circuits and Pauli frame propagation");
    println!("  marq-stim   Circuit text parser and canonical emitter");
    println!("  marq-grade  Marker-placement grader");
    println!("  marq-cli    Command-line interface");
    println!();
    println!(
        "Repository: {}",
        style(env!("CARGO_PKG_REPOSITORY")).underlined()
    );
    println!("License:    {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
