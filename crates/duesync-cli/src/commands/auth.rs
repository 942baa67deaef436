//! Credential management for the calendar integration.

use clap::Subcommand;
use duesync_core::credentials;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store an access token for a service
    SetToken {
        /// Service name (google)
        service: String,
        /// Bearer token
        token: String,
    },
    /// Show connection status
    Status,
    /// Remove stored credentials for a service
    Disconnect {
        /// Service name (google)
        service: String,
    },
}

fn validate_service(service: &str) -> Result<&str, Box<dyn std::error::Error>> {
    if service.eq_ignore_ascii_case(credentials::GOOGLE) {
        Ok(credentials::GOOGLE)
    } else {
        Err(format!("Unknown service: {service}. Valid services: google").into())
    }
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::SetToken { service, token } => {
            let service = validate_service(&service)?;
            credentials::set_access_token(service, &token)?;
            println!("Stored token for {service}");
        }
        AuthAction::Status => {
            if credentials::is_connected(credentials::GOOGLE) {
                println!("google: connected");
            } else {
                println!("google: not connected");
            }
        }
        AuthAction::Disconnect { service } => {
            let service = validate_service(&service)?;
            credentials::disconnect(service)?;
            println!("Disconnected {service}");
        }
    }

    Ok(())
}
