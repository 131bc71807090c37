//! Patterns command - lists the loaded detection patterns.

use dredge_core::prelude::*;

use crate::PatternsArgs;
use crate::ui::{colors, print_command_header, truncate_with_ellipsis};

const REGEX_TRUNCATE_WIDTH: usize = 60;

/// Lists the detection patterns that a scan would use, in definition order.
pub fn run(args: &PatternsArgs) -> super::Result {
    print_command_header("patterns");

    let set = match &args.patterns {
        Some(path) => PatternSet::load(path)?,
        None => PatternSet::builtin()?,
    };

    println!("{}", colors::muted().apply_to(format!("{} patterns", set.len())));
    println!();

    let name_width = set.patterns().iter().map(|p| p.name.len()).max().unwrap_or(0);

    for pattern in set.patterns() {
        let regex = if args.verbose {
            pattern.regex.as_str().to_string()
        } else {
            truncate_with_ellipsis(pattern.regex.as_str(), REGEX_TRUNCATE_WIDTH)
        };

        println!(
            "  {}  {}",
            colors::accent().apply_to(format!("{:<name_width$}", pattern.name)),
            colors::muted().apply_to(regex)
        );
    }

    Ok(())
}
