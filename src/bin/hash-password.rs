use bcrypt::{hash, DEFAULT_COST};
use clap::Parser;
use uuid::Uuid;

/// Hash a password and print a statement that seeds an admin profile with it.
#[derive(Parser, Debug)]
#[command(name = "hash-password", version, about)]
struct Args {
    password: String,

    /// Email of the profile to seed
    #[arg(long, env = "ADMIN_EMAIL", default_value = "admin@example.com")]
    email: String,

    #[arg(long, env = "BCRYPT_COST", default_value_t = DEFAULT_COST)]
    cost: u32,
}

fn main() {
    let args = Args::parse();

    match hash(&args.password, args.cost) {
        Ok(hashed) => {
            println!("\nEmail    : {}", args.email);
            println!("Cost     : {}", args.cost);
            println!("Hash     : {}\n", hashed);
            println!("-- Seed the admin profile:");
            println!(
                "INSERT INTO profiles (user_id, email, full_name, role, password_hash) \
                 VALUES ('{}', '{}', 'Administrator', 'admin', '{}');",
                Uuid::new_v4(),
                args.email.replace('\'', "''"),
                hashed
            );
        }
        Err(e) => {
            eprintln!("Error hashing password: {}", e);
            std::process::exit(1);
        }
    }
}
