//! Basic example demonstrating the Pterodactyl API client.
//!
//! Run with:
//! ```
//! PTERODACTYL_URL=https://panel.example.com \
//! PTERODACTYL_CLIENT_KEY=ptlc_... \
//! PTERODACTYL_APPLICATION_KEY=ptla_... \
//! cargo run --example basic
//! ```

use pteroapi::{ApplicationScope, ClientScope, ClientServer, List, Location, User};

#[tokio::main]
async fn main() -> pteroapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Client scope: what the key's owner can see
    println!("Creating client scope...");
    let client = ClientScope::from_env()?;
    println!("Connected to: {}", client.base_url());

    let account = client.account().await?;
    println!("Signed in as {} <{}>", account.username, account.email);

    println!("\n--- Servers ---");
    let servers = ClientServer::list(&client, &()).await?;
    println!("Found {} servers", servers.len());
    for server in servers.iter().take(5) {
        let status = client.server_status(&server.id).await?;
        println!(
            "  - {} [{}] {} MiB / {} MiB",
            server, status.state, status.memory.used, server.limits.memory
        );
        for allocation in &server.allocations {
            println!("      {}:{}", allocation.ip, allocation.port);
        }
    }

    // Application scope: needs an administrator key
    let admin = match ApplicationScope::from_env() {
        Ok(admin) => admin,
        Err(e) => {
            println!("\nSkipping application scope: {}", e);
            return Ok(());
        }
    };

    println!("\n--- Users ---");
    let users = User::list(&admin, &()).await?;
    println!("Found {} users", users.len());
    for user in users.iter().take(10) {
        let role = if user.root_admin { "admin" } else { "user" };
        println!("  - {} ({}) {}", user.username, user.full_name(), role);
    }

    println!("\n--- Locations ---");
    for location in Location::list(&admin, &()).await? {
        println!(
            "  - {}: {}",
            location.short,
            location.long.as_deref().unwrap_or("-")
        );
    }

    println!("\nDone!");
    Ok(())
}
