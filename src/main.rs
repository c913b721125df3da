// Entry point and high-level CLI flow.
//
// - Parse arguments and set up logging.
// - Run the pipeline inside a benchmark scope.
// - Print previews of both rankings and, on request, the benchmark.
use ad_report::bench::Benchmarker;
use ad_report::cli::Cli;
use ad_report::loader::file_size_mb;
use ad_report::output::preview_table_rows;
use ad_report::{generate_reports, ErrorKind, ReportError, ReportRun};
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

fn print_success(msg: &str) {
    println!("  {} {}", "✓".green(), msg.green());
}

fn print_info(msg: &str) {
    println!("  {} {}", "ℹ".blue(), msg.blue());
}

fn print_error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg.red());
}

fn exit_code_for(err: &ReportError) -> ExitCode {
    match err.kind() {
        ErrorKind::NotFound => ExitCode::from(1),
        ErrorKind::InvalidInput | ErrorKind::Aggregation | ErrorKind::Output => ExitCode::from(2),
    }
}

/// Print what was written plus a markdown preview of each ranking.
fn report_outputs(cli: &Cli, run: &ReportRun) {
    print_success(&format!("Aggregated {} campaigns", run.unique_campaigns));
    if run.skipped_rows > 0 {
        print_info(&format!("{} rows skipped (empty campaign_id)", run.skipped_rows));
    }
    print_success(&format!("Written: {}", run.ctr_path.display()));
    print_success(&format!("Written: {}", run.cpa_path.display()));

    if cli.preview > 0 {
        println!("\nTop Campaigns by CTR");
        println!("(Highest click-through rate first)\n");
        preview_table_rows(&run.top_ctr, cli.preview);
        println!("Top Campaigns by CPA");
        println!("(Lowest cost per acquisition first, converting campaigns only)\n");
        preview_table_rows(&run.top_cpa, cli.preview);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.default_log_filter()),
    )
    .target(env_logger::Target::Stderr)
    .init();

    println!();
    println!("  {}", "Ad Performance Aggregator".cyan().bold());
    println!("  {}", "=========================".cyan());
    println!();

    let mut bench = Benchmarker::new();
    let outcome = {
        let mut scope = bench.scope();
        if cli.verbose {
            print_info(&format!("Reading input file: {}", cli.input.display()));
        }
        let outcome = generate_reports(&cli.input, &cli.output);
        if let Ok(run) = &outcome {
            // Diagnostic only.
            let size = file_size_mb(&cli.input).unwrap_or(0.0);
            scope.set_metadata(size, run.rows_processed, run.unique_campaigns);
        }
        outcome
    };

    let run = match outcome {
        Ok(run) => run,
        Err(e) => {
            print_error(&e.to_string());
            return exit_code_for(&e);
        }
    };

    report_outputs(&cli, &run);
    print_success("Processing complete!");

    if cli.benchmark {
        let result = bench.result();
        if cli.json {
            match serde_json::to_string_pretty(result) {
                Ok(s) => println!("{}", s),
                Err(e) => eprintln!("Benchmark serialization error: {}", e),
            }
        } else {
            println!("{}", result.display());
        }
    }
    ExitCode::SUCCESS
}
