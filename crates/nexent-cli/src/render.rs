//! Plain-text output for the CLI.

use anyhow::Result;
use nexent_core::ResourceKind;
use nexent_deploy::DeploymentSession;
use nexent_marketplace::DisplayApp;

pub fn app_table(apps: &[DisplayApp]) {
    for app in apps {
        println!(
            "{icon} {name:<14} {category:<14} {price:>8}/mo  {install:<9} {id}",
            icon = app.icon,
            name = app.name,
            category = app.category,
            price = app.monthly_price.to_string(),
            install = app.install_time,
            id = app.id,
        );
        if !app.description.is_empty() {
            println!("   {}", app.description);
        }
    }
}

pub fn deployment(session: &DeploymentSession) -> Result<()> {
    let (Some(app), Some(config)) = (session.app(), session.config()) else {
        anyhow::bail!("no deployment in progress");
    };

    println!("Deploy {} {}", app.icon, app.name);
    println!("Estimated setup time: {}", app.install_time);
    if !config.app_name.is_empty() {
        println!("App name: {}", config.app_name);
    }
    println!(
        "HTTP access: {}",
        if config.http_access_enabled { "enabled" } else { "disabled" }
    );
    println!();

    for kind in ResourceKind::ALL {
        let bounds = session.slider_bounds(kind)?;
        println!(
            "{:<10} {:>6} {:<9} (min {}, max {})",
            kind.label(),
            config.resources.get(kind),
            kind.unit(),
            bounds.min,
            bounds.max
        );
    }

    if !config.env_vars.is_empty() {
        println!();
        println!("Environment:");
        for var in &config.env_vars {
            match &var.description {
                Some(description) => println!("  {}={}  # {description}", var.key, var.value),
                None => println!("  {}={}", var.key, var.value),
            }
        }
    }

    println!();
    println!("{}", session.summary()?);
    Ok(())
}
