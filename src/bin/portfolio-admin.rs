//! Command-line access to the portfolio API through the data-access client.

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Map};
use tracing_subscriber::EnvFilter;

use portfolio_site::client::{
    decode_session, ApiClient, ApiResult, AuthContext, ClientConfig, Query, Resource,
};
use portfolio_site::db::models::{BlogPost, PortfolioProject, SiteSettings};

#[derive(Parser, Debug)]
#[command(name = "portfolio-admin", version, about, long_about = None)]
struct Cli {
    /// API base URL, including the /api prefix
    #[arg(long, env = "PORTFOLIO_API_URL", default_value = portfolio_site::client::DEFAULT_API_URL)]
    url: String,

    /// Bearer token from a previous `login`
    #[arg(long, env = "PORTFOLIO_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and print the issued token
    Login {
        #[arg(long, env = "ADMIN_EMAIL")]
        email: String,
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show who the current token belongs to
    Whoami,

    /// Print the site settings
    Settings,

    /// List portfolio projects
    Projects {
        /// Include unpublished projects (requires a token)
        #[arg(long)]
        admin: bool,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        featured: bool,
    },

    /// List blog posts
    Posts {
        /// Include drafts and archived posts (requires a token)
        #[arg(long)]
        admin: bool,
        #[arg(long)]
        status: Option<String>,
    },

    /// Set a post's status to published
    PublishPost { id: String },

    DeleteProject { id: String },

    DeletePost { id: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("portfolio-admin: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> ApiResult<()> {
    let auth = match cli.token {
        Some(token) => AuthContext::with_token(token),
        None => AuthContext::new(),
    };
    let client = ApiClient::new(ClientConfig::new(cli.url), auth)?;

    match cli.command {
        Command::Login { email, password } => {
            let user = client.sign_in_with_password(&email, &password).await?;
            eprintln!("Signed in as {} ({})", user.email, user.id);
            if let Some(token) = client.auth().token().await {
                println!("{token}");
            }
        }
        Command::Whoami => match client.auth().token().await {
            Some(token) => print_json(&decode_session(&token)?)?,
            None => eprintln!("Not signed in"),
        },
        Command::Settings => {
            let settings = client
                .single::<SiteSettings>(&Query::new(Resource::SiteSettings))
                .await?;
            print_json(&settings)?;
        }
        Command::Projects {
            admin,
            category,
            featured,
        } => {
            let mut query = Query::new(Resource::PortfolioProjects).order("sort_order", true);
            if admin {
                query = query.admin();
            }
            if let Some(category) = category {
                query = query.eq("category", category);
            }
            if featured {
                query = query.eq("featured", true);
            }
            let projects = client.fetch::<PortfolioProject>(&query).await?;
            print_json(&projects)?;
        }
        Command::Posts { admin, status } => {
            let mut query = Query::new(Resource::BlogPosts).order("created_at", false);
            if admin {
                query = query.admin();
            }
            if let Some(status) = status {
                query = query.eq("status", status);
            }
            let posts = client.fetch::<BlogPost>(&query).await?;
            print_json(&posts)?;
        }
        Command::PublishPost { id } => {
            let mut patch = Map::new();
            patch.insert("status".to_string(), json!("published"));
            let post = client.update::<BlogPost>(&id, patch).await?;
            print_json(&post)?;
        }
        Command::DeleteProject { id } => {
            client.delete(Resource::PortfolioProjects, &id).await?;
            eprintln!("Deleted project {id}");
        }
        Command::DeletePost { id } => {
            client.delete(Resource::BlogPosts, &id).await?;
            eprintln!("Deleted post {id}");
        }
    }

    Ok(())
}

fn print_json(value: &impl Serialize) -> ApiResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
