use glitter_ngin::{config::RendererConfig, flow};

/// `glitter [config.toml]`
fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => RendererConfig::load(path)?,
        None => RendererConfig::default(),
    };
    flow::run(config)
}
