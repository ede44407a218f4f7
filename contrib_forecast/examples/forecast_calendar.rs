use chrono::NaiveDate;
use contrib_forecast::config::ForecastConfig;
use contrib_forecast::pipelines::{
    ForecastContext, ForecastPipeline, MonthlyTotalForecast, NextGapForecast,
    WeeklyTotalForecast, YearlyTotalForecast,
};
use contrib_forecast::ContributionCalendar;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Contrib Forecast: Calendar Example");
    println!("==================================\n");

    // Load the bundled snapshot
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/examples/data/calendar.json");
    let calendar = ContributionCalendar::from_json_file(path)?;
    println!(
        "Loaded {} days ({} contributions) from {:?} to {:?}\n",
        calendar.len(),
        calendar.total_contributions(),
        calendar.first_date(),
        calendar.last_date()
    );

    let config = ForecastConfig {
        max_degree: 8,
        ..ForecastConfig::default()
    };
    let today = NaiveDate::from_ymd_opt(2024, 6, 8).ok_or("invalid date")?;
    let context = ForecastContext::new(today);

    // Next active day
    let next_gap = NextGapForecast::train(&calendar, config.clone(), context)?;
    let next = next_gap.predict_next()?;
    println!("Next active day: {} ({} idle days)", next.date, next.days);

    // Weekly total
    let weekly = WeeklyTotalForecast::train(&calendar, config.clone(), context)?;
    let week = weekly.predict_current_week()?;
    println!(
        "Week of {}: {} contributions (max observed {})",
        week.weekdate,
        week.total_predicted_contribution,
        weekly.max_observed()
    );

    // Monthly totals
    let monthly = MonthlyTotalForecast::train(&calendar, config.clone(), context)?;
    println!("\nMonthly forecasts:");
    for month in 1..=12 {
        let result = monthly.predict_month(month)?;
        println!("  {:>2}: {}", result.month, result.total_predicted_contribution);
    }

    // Yearly total
    let yearly = YearlyTotalForecast::from_monthly(monthly);
    let year = yearly.predict()?;
    println!(
        "\nYear {}: {} contributions (trained: {})",
        year.year,
        year.total_predicted_contribution,
        yearly.is_trained()
    );

    Ok(())
}
