use secrecy::SecretString;

pub mod server;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        jwt_secret: SecretString,
        cookie_secure: bool,
        cookie_same_site: Option<String>,
    },
}
