//! `nexent` - browse the app marketplace and estimate deployment costs.

mod render;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use nexent_core::config::{ApiEnvironment, NexentClientConfig};
use nexent_core::{AppId, ResourceKind};
use nexent_deploy::{
    Adjustment, CostBreakdown, DeployRoute, DeploymentSession, EnvVarField, PriceCalculator,
    RateTable,
};
use nexent_marketplace::{
    AppTemplate, CachedCatalog, Catalog, CatalogSource, MarketplaceClient, StaticCatalog,
    ALL_CATEGORIES, DEFAULT_FEATURED_COUNT,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Nexent marketplace catalog and cost estimator
#[derive(Parser)]
#[command(name = "nexent", version, about = "Browse Nexent marketplace apps and estimate monthly costs")]
struct Cli {
    /// Catalog API base URL
    #[arg(long, env = "NEXENT_API_URL")]
    api_url: Option<String>,

    /// Use the local development API
    #[arg(long, conflicts_with = "api_url")]
    dev: bool,

    /// Use the bundled catalog instead of the API
    #[arg(long)]
    static_catalog: bool,

    /// Account token; required to deploy
    #[arg(long, env = "NEXENT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List apps, most popular first
    Apps {
        /// Case-insensitive search over name, description and tags
        #[arg(short, long, default_value = "")]
        search: String,
        /// Category to restrict to
        #[arg(short, long, default_value = ALL_CATEGORIES)]
        category: String,
    },
    /// Show the most popular apps
    Featured {
        #[arg(short = 'n', long, default_value_t = DEFAULT_FEATURED_COUNT)]
        count: usize,
    },
    /// List app categories
    Categories,
    /// Price a resource configuration
    Price {
        #[arg(long, default_value_t = 1)]
        vcpu: u32,
        /// RAM in GB
        #[arg(long, default_value_t = 1)]
        ram: u32,
        /// Storage in GB
        #[arg(long, default_value_t = 20)]
        storage: u32,
        /// Bandwidth in GB per month
        #[arg(long, default_value_t = 1000)]
        bandwidth: u32,
        #[arg(long, value_enum, default_value_t = Table::Calculator)]
        table: Table,
    },
    /// Configure a deployment and show its cost
    Deploy {
        /// App identifier
        #[arg(long)]
        id: String,
        #[arg(long)]
        vcpu: Option<u32>,
        /// RAM in GB
        #[arg(long)]
        ram: Option<u32>,
        /// Storage in GB
        #[arg(long)]
        storage: Option<u32>,
        /// Bandwidth in GB per month
        #[arg(long)]
        bandwidth: Option<u32>,
        /// Environment variable, repeatable
        #[arg(short, long = "env", value_name = "KEY=VALUE")]
        env: Vec<String>,
        /// Application name
        #[arg(long)]
        name: Option<String>,
        /// Disable HTTP access
        #[arg(long)]
        no_http: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Table {
    Catalog,
    Calculator,
}

impl Table {
    const fn rates(self) -> RateTable {
        match self {
            Self::Catalog => RateTable::CATALOG,
            Self::Calculator => RateTable::CALCULATOR,
        }
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let directive = if verbose { "nexent=debug" } else { "nexent=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn client_config(cli: &Cli) -> Result<NexentClientConfig> {
    let mut config = match (&cli.api_url, cli.dev) {
        (Some(url), _) => NexentClientConfig::new(url.as_str())
            .with_context(|| format!("invalid API URL `{url}`"))?,
        (None, true) => NexentClientConfig::for_environment(ApiEnvironment::Development),
        (None, false) => NexentClientConfig::for_environment(ApiEnvironment::Production),
    };
    if let Some(token) = &cli.token {
        config = config.with_api_token(token.as_str());
    }
    Ok(config)
}

fn catalog_source(cli: &Cli) -> Result<Box<dyn CatalogSource>> {
    if cli.static_catalog {
        return Ok(Box::new(StaticCatalog::bundled()));
    }
    let config = client_config(cli)?;
    let client = MarketplaceClient::from_config(&config).context("failed to build catalog client")?;
    debug!(base_url = %client.base_url(), "Using remote catalog");
    Ok(Box::new(CachedCatalog::new(client, config.catalog_cache)))
}

/// Fetch the catalog, reporting a failure inline and continuing empty.
async fn fetch_templates(source: &dyn CatalogSource, featured_only: bool) -> Vec<AppTemplate> {
    match source.fetch(featured_only).await {
        Ok(templates) => templates,
        Err(err) => {
            let report = err.report();
            warn!(code = report.code, error = %err, "Catalog unavailable");
            eprintln!("{} [{}]; try again later.", report.message, report.code);
            Vec::new()
        }
    }
}

fn parse_env_pair(pair: &str) -> Result<(&str, &str)> {
    match pair.split_once('=') {
        Some((key, value)) => Ok((key, value)),
        None => bail!("environment variable `{pair}` is not KEY=VALUE"),
    }
}

fn price(spec_args: [u32; 4], table: Table) -> CostBreakdown {
    let [vcpu, ram, storage, bandwidth] = spec_args;
    let mut calculator = PriceCalculator::new().with_rates(table.rates());
    for (kind, value) in ResourceKind::ALL.into_iter().zip([vcpu, ram, storage, bandwidth]) {
        let stored = calculator.set(kind, value);
        if stored != value {
            println!("{} adjusted to {} {}", kind.label(), stored, kind.unit());
        }
    }
    calculator.breakdown()
}

async fn deploy(
    cli: &Cli,
    source: &dyn CatalogSource,
    id: &str,
    resources: [Option<u32>; 4],
    env: &[String],
    name: Option<&str>,
    no_http: bool,
) -> Result<()> {
    let templates = fetch_templates(source, false).await;
    let app_id = AppId::new(id);
    let route = DeployRoute::default().open(&app_id);

    let mut session = DeploymentSession::new();
    if let Err(err) = session.sync_route(&route, &templates) {
        let report = err.report();
        bail!("cannot deploy `{id}`: {} [{}]", report.message, report.code);
    }

    for (kind, value) in ResourceKind::ALL.into_iter().zip(resources) {
        let Some(value) = value else { continue };
        if let Adjustment::Clamped { requested, floor } = session.set_resource(kind, value)? {
            println!(
                "{} raised from {requested} to the minimum of {floor} {}",
                kind.label(),
                kind.unit()
            );
        }
    }

    for pair in env {
        let (key, value) = parse_env_pair(pair)?;
        let index = session.add_env_var()?;
        session.update_env_var(index, EnvVarField::Key, key)?;
        session.update_env_var(index, EnvVarField::Value, value)?;
    }
    if let Some(name) = name {
        session.set_app_name(name)?;
    }
    if no_http {
        session.set_http_access(false)?;
    }

    render::deployment(&session)?;
    println!();
    println!("Deploy link: ?{}", route.to_query_string());
    if !session.deploy_ready(cli.token.is_some()) {
        println!("Sign in (--token) to deploy.");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match &cli.command {
        Commands::Apps { search, category } => {
            let source = catalog_source(&cli)?;
            let catalog = Catalog::from_templates(&fetch_templates(source.as_ref(), false).await);
            let apps = catalog.search(search, category);
            if apps.is_empty() {
                println!("No apps match.");
            }
            render::app_table(&apps);
        }
        Commands::Featured { count } => {
            let source = catalog_source(&cli)?;
            let catalog = Catalog::from_templates(&fetch_templates(source.as_ref(), true).await);
            render::app_table(&catalog.featured(*count));
        }
        Commands::Categories => {
            let source = catalog_source(&cli)?;
            let catalog = Catalog::from_templates(&fetch_templates(source.as_ref(), false).await);
            for category in catalog.categories() {
                println!("{category}");
            }
        }
        Commands::Price {
            vcpu,
            ram,
            storage,
            bandwidth,
            table,
        } => {
            let breakdown = price([*vcpu, *ram, *storage, *bandwidth], *table);
            println!("{breakdown}");
        }
        Commands::Deploy {
            id,
            vcpu,
            ram,
            storage,
            bandwidth,
            env,
            name,
            no_http,
        } => {
            let source = catalog_source(&cli)?;
            deploy(
                &cli,
                source.as_ref(),
                id,
                [*vcpu, *ram, *storage, *bandwidth],
                env,
                name.as_deref(),
                *no_http,
            )
            .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexent_core::Money;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_deploy_command() {
        let cli = Cli::try_parse_from([
            "nexent",
            "--static-catalog",
            "deploy",
            "--id",
            "ghost",
            "--vcpu",
            "2",
            "-e",
            "PORT=2368",
            "--env",
            "MODE=prod",
        ])
        .unwrap();

        assert!(cli.static_catalog);
        match cli.command {
            Commands::Deploy { id, vcpu, env, .. } => {
                assert_eq!(id, "ghost");
                assert_eq!(vcpu, Some(2));
                assert_eq!(env, vec!["PORT=2368", "MODE=prod"]);
            }
            _ => panic!("expected deploy"),
        }
    }

    #[test]
    fn dev_conflicts_with_api_url() {
        assert!(Cli::try_parse_from([
            "nexent",
            "--dev",
            "--api-url",
            "http://localhost",
            "categories"
        ])
        .is_err());
    }

    #[tokio::test]
    async fn unreachable_catalog_yields_empty_listing_and_no_deploy() {
        use nexent_core::client::RetryPolicy;
        use nexent_marketplace::MarketplaceClientBuilder;

        let client = MarketplaceClientBuilder::new("http://127.0.0.1:9/v1")
            .unwrap()
            .with_retry_policy(RetryPolicy::no_retry())
            .build()
            .unwrap();

        let templates = fetch_templates(&client, false).await;
        assert!(templates.is_empty());

        let route = DeployRoute::default().open(&AppId::new("wordpress"));
        let mut session = DeploymentSession::new();
        let err = session.sync_route(&route, &templates).unwrap_err();
        assert_eq!(err.error_code(), "TEMPLATE_NOT_FOUND");
        assert!(!session.is_open());
    }

    #[tokio::test]
    async fn static_catalog_flag_serves_bundled_apps() {
        let cli = Cli::try_parse_from(["nexent", "--static-catalog", "apps"]).unwrap();
        let source = catalog_source(&cli).unwrap();
        assert_eq!(fetch_templates(source.as_ref(), false).await.len(), 10);
    }

    #[test]
    fn env_pairs_split_on_first_equals() {
        assert_eq!(parse_env_pair("A=b=c").unwrap(), ("A", "b=c"));
        assert_eq!(parse_env_pair("EMPTY=").unwrap(), ("EMPTY", ""));
        assert!(parse_env_pair("NOPE").is_err());
    }

    #[test]
    fn price_uses_selected_table() {
        let breakdown = price([2, 0, 0, 0], Table::Catalog);
        // RAM is raised to the calculator's lower bound of 1 GB, storage to 20 and bandwidth to 1000.
        assert_eq!(breakdown.total, Money::from_cents(2000 + 500 + 1000 + 5000));

        let breakdown = price([1, 1, 20, 1000], Table::Calculator);
        assert_eq!(breakdown.total, Money::from_cents(2400));
    }

    #[test]
    fn config_follows_flags() {
        let cli = Cli::try_parse_from(["nexent", "--dev", "--token", "t0k", "categories"]).unwrap();
        let config = client_config(&cli).unwrap();
        assert_eq!(config.api_url, ApiEnvironment::Development.base_url());
        assert_eq!(config.api_token.as_deref(), Some("t0k"));

        let cli = Cli::try_parse_from(["nexent", "--api-url", "not a url", "categories"]).unwrap();
        assert!(client_config(&cli).is_err());
    }
}
