use solar_system::SolarSystem;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let game = SolarSystem::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"));
    orrery_native::run(game).inspect_err(|e| log::error!("Fatal: {e}"))?;
    Ok(())
}
