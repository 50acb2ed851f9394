use std::time::Duration;

use wcmeta_common::auth::{AuthServerUrls, InstitutionContext, Principal, TokenClient, WsKey};
use wcmeta_domain::{AccessToken, Credentials};

use crate::cli::{AuthArgs, AuthCommand, Cli};
use crate::error::CliError;

pub async fn run(cli: &Cli, command: &AuthCommand) -> Result<Vec<String>, CliError> {
    let credentials = wcmeta_infra::config::load()?;
    let timeout = Duration::from_secs(cli.timeout_secs);

    match command {
        AuthCommand::LoginUrl(args) => {
            let client = token_client(&credentials, args, timeout)?;
            Ok(vec![client.login_url(&institutions(args))?])
        }
        AuthCommand::Token { code, auth } => {
            let client = token_client(&credentials, auth, timeout)?;
            let token = client.exchange_code(code, &institutions(auth)).await?;
            Ok(describe(&token))
        }
        AuthCommand::ClientToken(args) => {
            let client = token_client(&credentials, args, timeout)?;
            let principal =
                Principal::new(credentials.principal_id.clone(), credentials.principal_idns.clone());
            let token = client.client_credentials(&institutions(args), Some(principal)).await?;
            Ok(describe(&token))
        }
    }
}

fn token_client(
    credentials: &Credentials,
    args: &AuthArgs,
    timeout: Duration,
) -> Result<TokenClient, CliError> {
    let mut wskey = WsKey::new(credentials.key.clone(), credentials.secret.clone())
        .with_services(args.services.iter().filter(|s| !s.trim().is_empty()).cloned());
    if let Some(redirect_uri) = &args.redirect_uri {
        wskey = wskey.with_redirect_uri(redirect_uri.clone());
    }
    Ok(TokenClient::with_urls(wskey, AuthServerUrls::default(), timeout)?)
}

fn institutions(args: &AuthArgs) -> InstitutionContext {
    let context = args.context_inst.clone().unwrap_or_else(|| args.auth_inst.clone());
    InstitutionContext::new(args.auth_inst.clone(), context)
}

fn describe(token: &AccessToken) -> Vec<String> {
    let mut lines = vec![
        format!("access_token={}", token.value),
        format!("expires_at={}", token.expires_at.to_rfc3339()),
        format!("scope={}", token.scope),
    ];
    if let Some(id) = &token.principal_id {
        lines.push(format!("principalID={id}"));
    }
    if let Some(idns) = &token.principal_idns {
        lines.push(format!("principalIDNS={idns}"));
    }
    lines
}
