use std::num::ParseIntError;

/// Builds the bind address for the API server from the HOST and PORT env vars.
/// Defaults to 127.0.0.1:3000.
pub fn get_api_bind_addr() -> Result<String, ParseIntError> {
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()?;
    Ok(format!("{}:{}", host, port))
}
