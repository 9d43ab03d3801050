use anyhow::Result;
use auth_gate::{ConfigError, GateConfig, SigningSecret, VerificationGate};
use clap::{Args, Parser, Subcommand};
use jsonwebtoken::Algorithm;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "auth-gate")]
#[command(about = "HTTP credential verification gate")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server with protected routes behind the gate
    Serve {
        /// Bind address, e.g. 0.0.0.0:3000
        #[arg(long, default_value = "0.0.0.0:3000")]
        bind: String,
        #[command(flatten)]
        gate: GateArgs,
    },
    /// Validate gate configuration and exit
    CheckConfig {
        #[command(flatten)]
        gate: GateArgs,
    },
}

#[derive(Args)]
struct GateArgs {
    /// Shared secret used to verify credential signatures
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    secret: Option<String>,
    /// Header checked first for the credential
    #[arg(long, default_value = auth_gate::auth::DEFAULT_HEADER_NAME)]
    header_name: String,
    /// Cookie checked when the header is absent
    #[arg(long, default_value = auth_gate::auth::DEFAULT_COOKIE_NAME)]
    cookie_name: String,
    /// Pinned signing algorithm (repeatable): HS256, HS384 or HS512
    #[arg(long = "algorithm", value_parser = parse_algorithm, default_value = "HS256")]
    algorithms: Vec<Algorithm>,
    /// Clock skew tolerated on exp/nbf, in seconds
    #[arg(long, default_value_t = 0)]
    leeway_seconds: u64,
    /// Expected issuer claim
    #[arg(long, env = "JWT_ISSUER")]
    issuer: Option<String>,
    /// Expected audience claim
    #[arg(long, env = "JWT_AUDIENCE")]
    audience: Option<String>,
    /// Reject credentials without an exp claim
    #[arg(long, default_value_t = false)]
    require_exp: bool,
}

fn parse_algorithm(value: &str) -> Result<Algorithm, String> {
    value
        .to_ascii_uppercase()
        .parse::<Algorithm>()
        .map_err(|_| format!("unknown algorithm `{}`", value))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("auth_gate=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, gate } => {
            let (config, secret) = build_gate_config(gate)?;
            info!("Starting auth gate server on {}", bind);
            auth_gate::start_http(&bind, config, secret).await?;
        }
        Commands::CheckConfig { gate } => {
            let (config, secret) = build_gate_config(gate)?;
            VerificationGate::new(config.clone(), &secret)?;

            print!("{}", config_summary(&config, &secret));
        }
    }

    Ok(())
}

/// Human-readable summary of the gate configuration. Reports the secret's
/// length only.
fn config_summary(config: &GateConfig, secret: &SigningSecret) -> String {
    let mut out = String::from("Configuration OK\n\n");
    out.push_str(&format!("  Header:      {}\n", config.header_name));
    out.push_str(&format!("  Cookie:      {}\n", config.cookie_name));
    out.push_str(&format!("  Algorithms:  {:?}\n", config.algorithms));
    out.push_str(&format!("  Leeway:      {}s\n", config.leeway_seconds));
    out.push_str(&format!("  Require exp: {}\n", config.require_exp));
    out.push_str(&format!(
        "  Issuer:      {}\n",
        config.issuer.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!(
        "  Audience:    {}\n",
        config.audience.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!("  Secret:      configured ({} bytes)\n", secret.byte_len()));
    out
}

/// Build gate configuration and key material from CLI arguments.
fn build_gate_config(args: GateArgs) -> Result<(GateConfig, SigningSecret), ConfigError> {
    let secret = SigningSecret::new(args.secret.ok_or(ConfigError::MissingSecret)?)?;

    let config = GateConfig {
        header_name: args.header_name,
        cookie_name: args.cookie_name,
        algorithms: args.algorithms,
        leeway_seconds: args.leeway_seconds,
        require_exp: args.require_exp,
        issuer: args.issuer,
        audience: args.audience,
    };

    if config.require_exp {
        info!("Credentials without an exp claim will be rejected");
    }

    config.validate()?;

    Ok((config, secret))
}
