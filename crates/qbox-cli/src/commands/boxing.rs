//! Box command implementation.

use anyhow::Result;
use console::style;
use tracing::info;

use qbox_compile::{BoxingSummary, EquivalenceClasses, PropertySet, generate_boxing_pass_manager};

use super::common::{derived_path, load_circuit, load_config, save_circuit};
use crate::cli::BoxArgs;

/// Execute the box command.
pub fn execute(args: &BoxArgs) -> Result<()> {
    println!(
        "{} Boxing {}",
        style("→").cyan().bold(),
        style(args.input.display()).green()
    );

    let base = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            load_config(path)?
        }
        None => Default::default(),
    };
    let config = args.apply(base);

    let mut circuit = load_circuit(&args.input)?;
    println!(
        "  Loaded: {} qubits, {} clbits, {} operations",
        circuit.num_qubits(),
        circuit.num_clbits(),
        circuit.len()
    );

    let pm = generate_boxing_pass_manager(&config)?;
    let mut props = PropertySet::new();
    pm.run(&mut circuit, &mut props)?;

    println!("{} Boxing complete", style("✓").green().bold());

    if let Some(summary) = props.get::<BoxingSummary>() {
        println!(
            "  Boxes: {} left-dressed ({} gate, {} measure), {} right-dressed",
            summary.gate_boxes + summary.measure_boxes,
            summary.gate_boxes,
            summary.measure_boxes,
            summary.collector_boxes
        );
        if summary.delimiters > 0 {
            println!("  Kept {} barriers and boxes in place", summary.delimiters);
        }
    }

    if let Some(classes) = props.get::<EquivalenceClasses>() {
        println!("  Equivalence classes: {}", style(classes.len()).yellow());
        for class in classes.classes() {
            println!(
                "    {} x{:<3} {}",
                style(&class.reference).cyan(),
                class.members.len(),
                style(&class.skeleton).dim()
            );
        }
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| derived_path(&args.input, "boxed"));
    save_circuit(&circuit, &output)?;
    println!("  Output: {}", style(output.display()).green());

    Ok(())
}
