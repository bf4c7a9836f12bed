use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use assetctl::api::model::CheckOutRequest;
use assetctl::api::{unwrap_envelope, ApiClient, AssetService};
use assetctl::config;
use assetctl::model::{warranty_expire_from, AssetDraft};
use assetctl::notify::{LogNotifier, Notifier};
use assetctl::refdata::ReferenceData;
use assetctl::wizard::AssetWizard;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all assets
    Assets,
    /// Show one asset by id
    Asset {
        #[arg(long)]
        id: i64,
    },
    /// Run the two-step creation wizard from a draft YAML file
    Create {
        #[arg(long)]
        draft: PathBuf,
    },
    /// Delete an asset by id
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Assign an asset to an employee
    Checkout {
        #[arg(long)]
        asset_id: i64,
        #[arg(long)]
        employee_id: i64,
    },
    /// Return a checked-out asset
    Checkin {
        #[arg(long)]
        asset_id: i64,
    },
    /// Show assets grouped by status
    Status,
    /// Show asset counts per category
    Counts,
    /// List categories
    Categories,
    /// List subcategories
    Subcategories,
    /// List locations (with their sites)
    Locations,
    /// List computer detail records
    Computers,
    /// List external-equipment detail records
    Externals,
    /// List employees
    Employees,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config)).context("failed to load configuration")?;
    let api = ApiClient::from_config(&cfg).context("invalid API configuration")?;
    let notifier = LogNotifier;

    match args.command {
        Command::Assets => {
            let assets = api.list_assets().await?;
            println!("{}", serde_json::to_string_pretty(&assets)?);
        }
        Command::Asset { id } => {
            let body = api.get_asset_by_id(id).await?;
            println!("{}", serde_json::to_string_pretty(&unwrap_envelope(body))?);
        }
        Command::Create { draft } => {
            run_create(&api, &notifier, &draft).await?;
        }
        Command::Delete { id } => {
            api.delete_asset(id).await?;
            notifier.success("Delete asset", &format!("asset {} deleted", id));
        }
        Command::Checkout {
            asset_id,
            employee_id,
        } => {
            let req = CheckOutRequest {
                asset_id,
                employee_id: Some(employee_id),
                check_out: true,
            };
            // A failed assignment gets no compensation; report it and
            // leave the record as the server has it.
            match api.check_out(&req).await {
                Ok(_) => notifier.success(
                    "Check out",
                    &format!("asset {} assigned to employee {}", asset_id, employee_id),
                ),
                Err(err) => notifier.error("Check out", &err.to_string()),
            }
        }
        Command::Checkin { asset_id } => {
            let req = CheckOutRequest {
                asset_id,
                employee_id: None,
                check_out: false,
            };
            match api.check_out(&req).await {
                Ok(_) => notifier.success("Check in", &format!("asset {} returned", asset_id)),
                Err(err) => notifier.error("Check in", &err.to_string()),
            }
        }
        Command::Status => {
            let body = api.assets_by_status().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Command::Counts => {
            for row in api.counts_by_category().await? {
                println!("{:>6}  {}", row.count, row.category);
            }
        }
        Command::Categories => {
            for category in api.list_categories().await? {
                println!("{:>4}  {}", category.id, category.name);
            }
        }
        Command::Subcategories => {
            for sub in api.list_sub_categories().await? {
                println!("{:>4}  {} (category {})", sub.id, sub.name, sub.category_id);
            }
        }
        Command::Locations => {
            for location in api.list_locations().await? {
                println!("{:>4}  {} @ {}", location.id, location.location, location.site);
            }
        }
        Command::Computers => {
            let body = api.list_computer_details().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Command::Externals => {
            let body = api.list_external_details().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Command::Employees => {
            for employee in api.list_employees().await? {
                println!(
                    "{:>4}  {}",
                    employee.id,
                    employee.name.unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}

/// Drive the creation wizard end to end from a draft file.
async fn run_create(api: &ApiClient, notifier: &dyn Notifier, draft_path: &Path) -> Result<()> {
    let text = tokio::fs::read_to_string(draft_path)
        .await
        .with_context(|| format!("failed to read draft {}", draft_path.display()))?;
    let mut draft: AssetDraft = serde_yaml::from_str(&text).context("invalid draft YAML")?;

    // A draft may give warrantyMonths instead of an explicit expiry date.
    if let Some(computer) = draft.computer.as_mut() {
        if computer.warranty_expire.trim().is_empty() {
            if let Some(months) = computer.warranty_months {
                if let Some(expire) = warranty_expire_from(&computer.warranty_start, months) {
                    info!(%expire, "derived warranty expiry from warrantyMonths");
                    computer.warranty_expire = expire;
                }
            }
        }
    }

    let load = ReferenceData::load(api).await;
    for failure in &load.failures {
        notifier.error(
            "Reference data",
            &format!("failed to load {}: {}", failure.list.as_str(), failure.error),
        );
    }

    let mut wizard = AssetWizard::new();
    if let Err(err) = wizard.submit_step1(api, &load.data, &draft).await {
        notifier.error("Create asset", &err.to_string());
        return Ok(());
    }
    match wizard.submit_step2(api, &draft).await {
        Ok(asset_id) => notifier.success("Create asset", &format!("asset {} created", asset_id)),
        Err(err) => notifier.error("Create asset", &err.to_string()),
    }
    Ok(())
}
