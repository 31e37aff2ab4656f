use crate::api::{self, AuthConfig};
use crate::cli::actions::Action;
use anyhow::{anyhow, Result};
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            jwt_secret,
            cookie_secure,
            cookie_same_site,
        } => {
            let parsed = Url::parse(&dsn)?;
            if parsed.scheme() != "postgres" && parsed.scheme() != "postgresql" {
                return Err(anyhow!("unsupported dsn scheme: {}", parsed.scheme()));
            }

            let config = AuthConfig::new(jwt_secret)
                .with_cookie_secure(cookie_secure)
                .with_cookie_same_site(cookie_same_site);

            api::new(port, dsn, config).await?;
        }
    }

    Ok(())
}
