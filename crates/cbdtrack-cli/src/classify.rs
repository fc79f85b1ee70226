//! Classify command implementation.
//!
//! Runs the product categorizer over names given on the command line,
//! which is handy for spot-checking how a product will be counted.

use cbdtrack_core::category;

/// Print the category for each given product name.
pub fn execute(names: &[String]) {
    for name in names {
        println!("{}: {}", name, category::categorize(name));
    }
}
