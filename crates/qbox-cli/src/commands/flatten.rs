//! Flatten command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;

use super::common::{derived_path, load_circuit, save_circuit};

/// Execute the flatten command.
pub fn execute(input: &Path, output: Option<&Path>) -> Result<()> {
    let circuit = load_circuit(input)?;
    let flat = circuit.flatten();

    let output = output.map_or_else(|| derived_path(input, "flat"), Path::to_path_buf);
    save_circuit(&flat, &output)?;

    println!(
        "{} Inlined {} boxes: {} operations",
        style("✓").green().bold(),
        circuit.num_boxes(),
        flat.len()
    );
    println!("  Output: {}", style(output.display()).green());

    Ok(())
}
