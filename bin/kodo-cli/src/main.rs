//! Kodo CLI - offline token and path generation
//!
//! Produces encoded entries, operation paths, authorization headers, signed
//! download URLs and upload tokens without talking to the service.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use http::Method;
use kodo_auth::{
    Operation, OperationSpec, PutPolicyBuilder, QiniuRequest, encode_entry, encode_operations,
    management_authorization, qiniu_authorization,
};
use kodo_client::{Client, Config};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "kodo-cli")]
#[command(about = "Kodo signing CLI")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "kodo.toml")]
    config: String,

    /// Access key (overrides the config file)
    #[arg(long, env = "QINIU_ACCESS_KEY")]
    access_key: Option<String>,

    /// Secret key (overrides the config file)
    #[arg(long, env = "QINIU_SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the EncodedEntryURI of a bucket or object
    Entry {
        /// Bucket name
        bucket: String,
        /// Object key
        key: Option<String>,
    },
    /// Encode operation descriptors (JSON) into a `;`-joined path list
    Ops {
        /// Descriptors such as '{"_type":"stat","bucket":"b","fileName":"k"}'
        #[arg(required = true)]
        descriptors: Vec<String>,
    },
    /// Print a `QBox` Authorization header
    ManageToken {
        /// Request path including query
        path: String,
        /// Raw form body
        #[arg(short, long)]
        body: Option<String>,
    },
    /// Print a `Qiniu` Authorization header
    QiniuToken {
        /// HTTP method
        #[arg(short, long, default_value = "GET")]
        method: String,
        /// Host header value
        #[arg(long)]
        host: String,
        /// Request path including query
        path: String,
        /// Content-Type header value
        #[arg(long)]
        content_type: Option<String>,
        /// Request body
        #[arg(short, long)]
        body: Option<String>,
    },
    /// Print a signed private download URL
    DownloadUrl {
        /// Resource URL
        url: String,
        /// Validity in seconds (config default when omitted)
        #[arg(short, long)]
        expires: Option<u64>,
    },
    /// Print an upload token
    UploadToken {
        /// Bucket name
        bucket: String,
        /// Restrict the token to a single key
        #[arg(short, long)]
        key: Option<String>,
        /// Validity in seconds
        #[arg(short, long, default_value = "3600")]
        expires: u64,
        /// Refuse to overwrite existing objects
        #[arg(long)]
        insert_only: bool,
    },
}

fn parse_operation(descriptor: &str) -> Result<Operation> {
    let spec: OperationSpec = serde_json::from_str(descriptor)
        .with_context(|| format!("invalid operation descriptor: {descriptor}"))?;
    Ok(Operation::try_from(spec)?)
}

fn load_client(args: &Args) -> Result<Client> {
    let mut config = Config::load(&args.config)
        .with_context(|| format!("failed to load config file {}", args.config))?;

    // CLI and environment take precedence over the file
    if let Some(access_key) = &args.access_key {
        config.credentials.access_key.clone_from(access_key);
    }
    if let Some(secret_key) = &args.secret_key {
        config.credentials.secret_key.clone_from(secret_key);
    }

    Ok(Client::from_config(config)?)
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &args.command {
        Commands::Entry { bucket, key } => {
            println!("{}", encode_entry(bucket, key.as_deref())?);
        }
        Commands::Ops { descriptors } => {
            let operations = descriptors
                .iter()
                .map(|d| parse_operation(d))
                .collect::<Result<Vec<_>>>()?;
            println!("{}", encode_operations(&operations)?);
        }
        Commands::ManageToken { path, body } => {
            let client = load_client(&args)?;
            let header = management_authorization(
                client.credential(),
                path,
                body.as_deref().map(str::as_bytes),
            );
            println!("{header}");
        }
        Commands::QiniuToken {
            method,
            host,
            path,
            content_type,
            body,
        } => {
            let client = load_client(&args)?;
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .with_context(|| format!("invalid HTTP method: {method}"))?;
            let mut request = QiniuRequest::new(method, host.as_str(), path.as_str());
            if let Some(content_type) = content_type {
                request = request.content_type(content_type.as_str());
            }
            if let Some(body) = body {
                request = request.body(body.as_bytes());
            }
            println!("{}", qiniu_authorization(client.credential(), &request));
        }
        Commands::DownloadUrl { url, expires } => {
            let client = load_client(&args)?;
            let url = client.download_url(url, expires.map(Duration::from_secs))?;
            println!("{url}");
        }
        Commands::UploadToken {
            bucket,
            key,
            expires,
            insert_only,
        } => {
            let client = load_client(&args)?;
            let expires_in = Duration::from_secs(*expires);
            let mut builder = match key {
                Some(key) => PutPolicyBuilder::new_for_object(bucket, key, client.clock(), expires_in)?,
                None => PutPolicyBuilder::new_for_bucket(bucket, client.clock(), expires_in)?,
            };
            if *insert_only {
                builder = builder.insert_only();
            }
            let policy = builder.build();
            info!(scope = %policy.scope, deadline = policy.deadline, "issuing upload token");
            println!("{}", client.upload_token(&policy)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "kodo-cli",
            "--access-key",
            "ak",
            "download-url",
            "http://x.com/a",
            "--expires",
            "60",
        ])
        .unwrap();
        assert_eq!(args.access_key.as_deref(), Some("ak"));
        assert!(matches!(
            args.command,
            Commands::DownloadUrl { expires: Some(60), .. }
        ));
    }

    #[test]
    fn test_parse_operation() {
        let op = parse_operation(r#"{"_type":"delete","bucket":"b","fileName":"k1"}"#).unwrap();
        assert_eq!(op, Operation::delete("b", "k1"));
        assert!(parse_operation(r#"{"_type":"rename","bucket":"b"}"#).is_err());
        assert!(parse_operation("not json").is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::try_parse_from([
            "kodo-cli",
            "--config",
            "/nonexistent/kodo.toml",
            "--access-key",
            "ak",
            "--secret-key",
            "sk",
            "entry",
            "b",
        ])
        .unwrap();
        let client = load_client(&args).unwrap();
        assert_eq!(client.credential().access_key(), "ak");
    }
}
