use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;

const SECRET_BYTES: usize = 64;

/// A random base64 secret for signing access tokens.
pub fn generate_secret() -> String {
    let mut secret = [0u8; SECRET_BYTES];
    rand::thread_rng().fill_bytes(&mut secret);
    general_purpose::STANDARD.encode(secret)
}

pub fn handle_generate_secret_command() {
    println!("🔐 Generated JWT Secret:");
    println!();
    println!("jwt:");
    println!("  secret: \"{}\"", generate_secret());
    println!("  expiration_days: 7");
    println!();
    println!("Add this to config/{{environment}}.yaml or set APP__JWT__SECRET.");
}
