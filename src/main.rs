use anyhow::{Context, Result};
use pv_yield_sim::catalog::Catalogs;
use pv_yield_sim::config::Config;
use pv_yield_sim::domain::types::SimulationInput;
use pv_yield_sim::simulation::Engine;
use pv_yield_sim::telemetry::init_tracing;
use tracing::info;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load()?;

    let input_path = std::env::args()
        .nth(1)
        .context("usage: pv-yield-sim <input.json>")?;
    let raw = std::fs::read_to_string(&input_path)
        .with_context(|| format!("reading input file {input_path}"))?;
    let input: SimulationInput =
        serde_json::from_str(&raw).with_context(|| format!("parsing {input_path}"))?;

    info!(data_dir = %cfg.data.dir.display(), "loading catalogs");
    let catalogs = Catalogs::load(&cfg.data.dir);
    let engine = Engine::new(catalogs).with_default_buy_price(cfg.economics.default_buy_price);

    let result = engine.run(&input);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
