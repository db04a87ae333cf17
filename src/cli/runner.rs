//! CLI runner - executes commands

use crate::auth::WsseSigner;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{ClientConfig, ENV_STAGING, MOCK_URL};
use crate::error::{Error, Result, ResultExt};
use crate::http::{ApiRequest, Client};
use crate::types::{Credentials, JsonValue};
use std::io::Write;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Wsse => self.wsse(),
            Commands::Get { path, query } => {
                let request = query
                    .iter()
                    .fold(ApiRequest::get(path), |req, (k, v)| req.query(k, v));
                self.call(&request).await
            }
            Commands::Post { path, body } => {
                // Validate locally, then send the caller's bytes untouched
                serde_json::from_str::<JsonValue>(body)
                    .with_context(|| format!("Invalid body JSON for {path}"))?;
                self.call(&ApiRequest::post(path).raw_body(body.clone()))
                    .await
            }
        }
    }

    /// Credentials from flags or environment
    fn credentials(&self) -> Result<Credentials> {
        let user = self
            .cli
            .user
            .as_ref()
            .ok_or_else(|| Error::config("User not specified (use --user or EMARSYS_USER)"))?;
        let secret = self
            .cli
            .secret
            .as_ref()
            .ok_or_else(|| Error::config("Secret not specified (use --secret or EMARSYS_SECRET)"))?;
        Ok(Credentials::new(user, secret))
    }

    /// Build the client config from the parsed arguments
    fn build_config(&self) -> Result<ClientConfig> {
        self.build_config_with(ENV_STAGING)
    }

    /// Build the client config, reading the staging flag from `staging_var`
    /// unless `--staging` was given
    fn build_config_with(&self, staging_var: &str) -> Result<ClientConfig> {
        let credentials = self.credentials()?;
        let mut builder =
            ClientConfig::builder().credentials(credentials.identity, credentials.secret);
        builder = if self.cli.staging {
            builder.staging(true)
        } else {
            builder.staging_from_env(staging_var)
        };

        if self.cli.mock {
            builder = builder.base_url(MOCK_URL);
        } else if let Some(url) = &self.cli.base_url {
            builder = builder.base_url(url);
        }
        if let Some(retries) = self.cli.max_retries {
            builder = builder.max_retries(retries);
        }

        Ok(builder.build())
    }

    /// Print a signed header value
    fn wsse(&self) -> Result<()> {
        let signer = WsseSigner::new(self.credentials()?);
        println!("{}", signer.header_value());
        Ok(())
    }

    /// Execute a request and print its data
    async fn call(&self, request: &ApiRequest) -> Result<()> {
        let client = Client::new(self.build_config()?)?;
        let data: JsonValue = client.execute(request).await.inspect_err(|e| {
            if let Error::Api(api) = e {
                debug!("Response body: {}", api.body_text());
            }
        })?;
        self.output_message(&data)
    }

    /// Output a message
    fn output_message(&self, msg: &JsonValue) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(msg)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(msg)?,
        };
        writeln!(std::io::stdout().lock(), "{text}")?;
        Ok(())
    }
}
