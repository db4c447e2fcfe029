//! Type matchup analysis command.

use clap::Args;
use console::style;

use bulkdex::typing::{analyze, OffensiveHit, TypeId, TypingQuery, TypingReport};

use crate::error::CliError;

/// Arguments for the `typing` command.
#[derive(Debug, Args)]
pub struct TypingArgs {
    /// Primary type (defensive, and offensive as a same-type attack)
    pub primary: String,

    /// Secondary type (defensive and offensive; ignored if it repeats
    /// the primary)
    pub secondary: Option<String>,

    /// Extra offensive coverage type (never defensive)
    #[arg(long)]
    pub coverage: Option<String>,
}

/// Run the three matchup analyses and print them.
pub fn run(args: TypingArgs) -> Result<(), CliError> {
    let primary: TypeId = args.primary.parse()?;
    let secondary = args
        .secondary
        .as_deref()
        .map(str::parse)
        .transpose()?;
    let coverage = args
        .coverage
        .as_deref()
        .map(str::parse)
        .transpose()?;

    let query = TypingQuery {
        primary,
        secondary,
        coverage,
    };
    print_report(&analyze(&query));
    Ok(())
}

fn print_report(report: &TypingReport) {
    let defenders: Vec<&str> = report.defenders.iter().map(|t| t.as_str()).collect();

    println!(
        "{}",
        style(format!("Defensive analysis ({})", defenders.join("/"))).bold()
    );
    print_type_section("Weaknesses (x4)", &report.defensive.x4);
    print_type_section("Weaknesses (x2)", &report.defensive.x2);
    print_type_section("Resistances (x0.5)", &report.defensive.x0_5);
    print_type_section("Resistances (x0.25)", &report.defensive.x0_25);
    print_type_section("Immunities (x0)", &report.defensive.x0);

    println!();
    println!("{}", style("Offensive analysis").bold());
    print_hit_section("Super effective against", &report.offensive.super_effective);
    print_hit_section("Neutral damage against", &report.offensive.neutral);
    print_hit_section("Not very effective against", &report.offensive.resisted);
    print_hit_section("No effect against", &report.offensive.immune);

    println!();
    println!("{}", style("Problematic combinations").bold());
    if report.resistant.is_empty() {
        println!("  Nothing resists this whole kit");
    } else {
        let combos: Vec<String> = report.resistant.iter().map(|c| c.to_string()).collect();
        println!("  Resisting everything: {}", combos.join(", "));
    }
}

/// Prints a labelled type list; empty buckets are omitted entirely.
fn print_type_section(title: &str, types: &[TypeId]) {
    if types.is_empty() {
        return;
    }
    let names: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
    println!("  {title}: {}", names.join(", "));
}

fn print_hit_section(title: &str, hits: &[OffensiveHit]) {
    if hits.is_empty() {
        return;
    }
    let entries: Vec<String> = hits
        .iter()
        .map(|hit| format!("{} [{} {}]", hit.defender, hit.best.type_id, hit.best.tag))
        .collect();
    println!("  {title}: {}", entries.join(", "));
}
