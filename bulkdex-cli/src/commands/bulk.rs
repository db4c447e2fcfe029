//! Bulk similarity command.

use std::sync::Arc;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use bulkdex::catalog::display_name;
use bulkdex::run::{BulkQuery, BulkReport, QueryRunner, RunOutcome};
use bulkdex::stats::formula::StatProfile;
use bulkdex::stats::matcher::AxisMatch;
use bulkdex::stats::ProgressCallback;

use super::common;
use crate::error::CliError;

/// Arguments for the `bulk` command.
#[derive(Debug, Args)]
pub struct BulkArgs {
    /// Base HP of the profile
    #[arg(long)]
    pub hp: u16,

    /// Base Defense of the profile
    #[arg(long)]
    pub defense: u16,

    /// Base Special Defense of the profile
    #[arg(long = "sp-defense")]
    pub sp_defense: u16,
}

/// Run a bulk similarity query and print the per-build report.
pub fn run(args: BulkArgs) -> Result<(), CliError> {
    let config = common::load_config();
    let rt = common::runtime()?;

    let query = BulkQuery {
        profile: StatProfile {
            hp: args.hp,
            defense: args.defense,
            sp_defense: args.sp_defense,
        },
    };

    let outcome = rt.block_on(async {
        let runner = QueryRunner::from_config(&config)?;

        // The bar only has something to say when records are missing;
        // the first progress callback sizes it.
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::with_template("{msg} {bar:40} {pos}/{len}") {
            bar.set_style(style);
        }
        bar.set_message("Downloading base stats...");
        let fill_bar = bar.clone();
        let progress: ProgressCallback = Arc::new(move |done, total| {
            fill_bar.set_length(total as u64);
            fill_bar.set_position(done as u64);
        });

        let outcome = runner.run_bulk(query, Some(progress)).await;
        bar.finish_and_clear();
        outcome.map_err(CliError::from)
    })?;

    match outcome {
        RunOutcome::Completed(report) => print_report(&report),
        // A single-shot CLI never starts a second run; nothing to print.
        RunOutcome::Superseded => {}
    }

    Ok(())
}

fn print_report(report: &BulkReport) {
    println!(
        "Compared against {} of {} species",
        report.records_available, report.catalog_size
    );

    for result in &report.builds {
        let build = &result.build;
        println!();
        println!("{}", style(build.kind.label()).bold().underlined());
        println!(
            "  HP {}  Def {}  SpD {}",
            build.hp, build.defense, build.sp_defense
        );
        println!("  Physical bulk {:.2}", result.physical_bulk);
        print_axis("physical", result.physical.as_ref());
        println!("  Special bulk {:.2}", result.special_bulk);
        print_axis("special", result.special.as_ref());
    }
}

fn print_axis(axis: &str, best: Option<&AxisMatch>) {
    match best {
        Some(m) => println!(
            "  Closest {axis}: {} (HP {}, stat {}; bulk {:.2}, off by {:.2})",
            style(display_name(&m.name)).green().bold(),
            m.hp,
            m.defense,
            m.bulk,
            m.difference
        ),
        None => println!("  Closest {axis}: unknown (no records available)"),
    }
}
