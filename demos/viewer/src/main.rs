use retro_pc::ViewerConfig;

// RETRO_PC_VARIANT=compact cargo run
fn main() -> anyhow::Result<()> {
    let config = ViewerConfig::from_env()?;
    retro_pc::flow::run(config)
}
