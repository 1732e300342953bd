use blade_config::{BladeConfig, ConfigLoader};
use blade_runtime::{BehaviorRegistry, BladeService, builtin_factories};

pub(super) async fn cmd_start(
    mut config: BladeConfig,
    name: Option<String>,
) -> blade_core::Result<()> {
    if let Some(name) = name {
        config.blade.name = name;
        ConfigLoader::check(&config)?;
    }

    println!("blade v{}", env!("CARGO_PKG_VERSION"));
    println!("   Name: {}", config.blade.name);
    println!("   Requests: {}", config.remote.requests_url);
    println!("   Responses: {}", config.remote.responses_url);
    println!(
        "   Update: {}ms, poll: {}ms",
        config.schedule.update_ms, config.schedule.remote_poll_ms
    );
    println!();

    let service = BladeService::new(config, &builtin_factories())?;

    // Blocks until ctrl-c
    service.run().await
}

pub(super) fn cmd_behaviors(config: &BladeConfig) -> blade_core::Result<()> {
    let registry = BehaviorRegistry::discover(&builtin_factories(), &config.behaviors.disabled);

    if registry.entries().is_empty() {
        println!("No behaviors found.");
        return Ok(());
    }

    println!("{:<16} {:>8}  {:<8} CAPABILITIES", "NAME", "PRIORITY", "ENABLED");
    for entry in registry.entries() {
        let caps: Vec<&str> = entry.capabilities().iter().map(|c| c.as_str()).collect();
        println!(
            "{:<16} {:>8}  {:<8} {}",
            entry.name(),
            entry.priority(),
            if entry.is_enabled() { "yes" } else { "no" },
            caps.join(", ")
        );
    }
    println!();
    println!(
        "{} behaviors, {} list entries",
        registry.entries().len(),
        registry.total()
    );
    Ok(())
}
