use premiumml::WorkflowConfig;
use premiumml::workflow::run_training;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = WorkflowConfig::default();
    let Some(report) = run_training(&config)? else {
        return Ok(());
    };

    println!("Training on {} rows. Testing on {} rows.", report.n_train, report.n_test);

    println!("\n--- Report Card ---");
    println!("Average Error (MAE): {:.2}", report.evaluation.mae);
    println!("Accuracy Score (R2): {:.2} (1.0 is perfect)", report.evaluation.r2);

    println!("\n--- Learned Coefficients ---");
    println!("{:<20} {:>12.2}", "intercept", report.intercept);
    for (name, weight) in &report.coefficients {
        println!("{:<20} {:>12.2}", name, weight);
    }

    println!(
        "\nModel saved to {} (JSON, not the pickled {})",
        config.model_path().display(),
        config.pickled_model_path().display()
    );
    Ok(())
}
