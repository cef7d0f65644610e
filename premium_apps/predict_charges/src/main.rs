use premiumml::workflow::run_inference;
use premiumml::{Record, WorkflowConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = WorkflowConfig::default();

    // A new customer to price
    let new_person = Record::new()
        .with("age", 30)
        .with("sex", "male")
        .with("bmi", 30.5)
        .with("children", 0)
        .with("smoker", "yes")
        .with("region", "southwest");

    let Some(predictions) = run_inference(&config, std::slice::from_ref(&new_person))? else {
        return Ok(());
    };

    println!("Predicting for: {}", new_person);
    println!("Estimated insurance cost: ${:.2}", predictions[0]);

    Ok(())
}
