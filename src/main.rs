use delta_hedge::hedge::{report, simulator};
use delta_hedge::{config, errors};

fn main() {
    // Structured logging to stderr; the report itself goes to stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("delta hedge simulation starting");

    let cfg = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cfg) {
        tracing::error!(error = %e, "simulation failed");
        std::process::exit(1);
    }
}

fn run(cfg: &config::AppConfig) -> errors::PricerResult<()> {
    let params = cfg.market_parameters()?;
    let schedule = cfg.schedule()?;

    tracing::info!(
        spot = params.value.spot,
        strike = params.value.strike,
        volatility = params.value.volatility,
        shares = params.value.shares,
        "market parameters loaded"
    );

    let report = simulator::run(params, schedule)?;

    for advisory in &report.advisories {
        tracing::warn!("{advisory}");
    }

    println!("{}", report::render(&report, cfg.report_format)?);

    tracing::info!(
        run_id = %report.run_id,
        pnl = report.cumulative_profit_loss,
        rebalance = report.cumulative_rebalancing_cost,
        "simulation complete"
    );
    Ok(())
}
