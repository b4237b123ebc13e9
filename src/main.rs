use clap::Parser;
use tradesim::cli::{Cli, Commands};
use tradesim::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;
    tradesim::telemetry::init_logging(&config.telemetry.log_level)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("starting backtest");
            args.execute(&config)?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Data: {}", config.data.path.display());
            println!("  Initial funds: {}", config.backtest.initial_funds);
            println!(
                "  Fee: multiplier={} deposit_pct={}",
                config.fee.multiplier, config.fee.deposit_pct
            );
            println!(
                "  Overspend: rate={} fatal={}",
                config.backtest.overspend_rate, config.backtest.fail_on_overspend
            );
            println!("  Strategy: {:?}", config.strategy);
        }
    }

    Ok(())
}
