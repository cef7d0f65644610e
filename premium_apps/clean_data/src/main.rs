use premiumml::WorkflowConfig;
use premiumml::workflow::run_cleaning;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = WorkflowConfig::default();
    let Some(report) = run_cleaning(&config)? else {
        return Ok(());
    };

    println!("Original shape: ({}, {})", report.rows_before, report.columns);
    println!("Duplicate rows removed: {}", report.duplicates_removed);
    println!("Missing values filled: {}", report.missing_filled);
    println!("Final shape: ({}, {})", report.rows_after, report.columns);
    println!("Cleaned data saved to {}", config.cleaned_data_path().display());

    Ok(())
}
