use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "address-cli")]
#[command(about = "Command-line client for the address book service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all addresses, ordered by id
    List,
    /// Show one address
    Get { id: u64 },
    /// Create an address
    Add {
        #[arg(long, default_value = "")]
        first: String,
        #[arg(long, default_value = "")]
        last: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Replace every field of an address
    Update {
        id: u64,
        #[arg(long, default_value = "")]
        first: String,
        #[arg(long, default_value = "")]
        last: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Delete an address
    Delete { id: u64 },
    /// Download the address book as CSV
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Upload a CSV file into the address book
    Import { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = format!("{}/address", cli.url.trim_end_matches('/'));

    match cli.command {
        Commands::List => {
            let res = client.get(&base).send().await?;
            print_json(res).await?;
        }
        Commands::Get { id } => {
            let res = client.get(format!("{}/{}", base, id)).send().await?;
            print_json(res).await?;
        }
        Commands::Add { first, last, email, phone } => {
            let body = json!({ "first": first, "last": last, "email": email, "phone": phone });
            let res = client.post(&base).json(&body).send().await?;
            print_json(res).await?;
        }
        Commands::Update { id, first, last, email, phone } => {
            let body = json!({ "first": first, "last": last, "email": email, "phone": phone });
            let res = client.put(format!("{}/{}", base, id)).json(&body).send().await?;
            print_json(res).await?;
        }
        Commands::Delete { id } => {
            let res = client.delete(format!("{}/{}", base, id)).send().await?;
            if check_status(&res) {
                println!("Deleted {}", id);
            }
        }
        Commands::Export { output } => {
            let res = client.get(format!("{}/export", base)).send().await?;
            if check_status(&res) {
                let csv = res.text().await?;
                match output {
                    Some(path) => {
                        std::fs::write(&path, csv)?;
                        println!("Wrote {}", path.display());
                    }
                    None => print!("{}", csv),
                }
            }
        }
        Commands::Import { file } => {
            let csv = std::fs::read_to_string(&file)?;
            let res = client
                .post(format!("{}/import", base))
                .header(reqwest::header::CONTENT_TYPE, "text/csv")
                .body(csv)
                .send()
                .await?;
            if check_status(&res) {
                println!("{}", res.text().await?);
            }
        }
    }

    Ok(())
}

fn check_status(res: &reqwest::Response) -> bool {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: address book returned status {}", status);
        return false;
    }
    true
}

async fn print_json(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    if !check_status(&res) {
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
