use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    config::{load_settings, load_settings_from, Settings},
    CustomerFormController, FieldEdit, HttpListRepository, Notice, NoticeKind, SubmitOutcome,
};
use shared::domain::{Customer, CustomerId};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "customers", about = "Browse, add and edit customer records")]
struct Cli {
    /// Settings file; defaults to ./customers.toml
    #[arg(long)]
    config: Option<PathBuf>,
    /// Site hosting the customer list
    #[arg(long)]
    site: Option<String>,
    /// Title of the customer list
    #[arg(long)]
    list: Option<String>,
    /// Bearer token for the list service; ACCESS_TOKEN is read otherwise
    #[arg(long)]
    access_token: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every customer in the list
    List,
    /// Create a customer
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Change fields of an existing customer
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[command(flatten)]
        fields: FieldArgs,
    },
}

#[derive(Args, Debug, Default)]
struct FieldArgs {
    #[arg(long)]
    rigs: Option<String>,
    #[arg(long)]
    jack_ups: Option<String>,
    #[arg(long)]
    modus: Option<String>,
    /// Customer web site; pass an empty string to clear it
    #[arg(long)]
    site_url: Option<String>,
}

impl FieldArgs {
    fn into_edits(self) -> Vec<FieldEdit> {
        [
            self.rigs.map(FieldEdit::RigCount),
            self.jack_ups.map(FieldEdit::JackUpCount),
            self.modus.map(FieldEdit::ModuCount),
            self.site_url.map(FieldEdit::SiteUrl),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn resolve_settings(cli: &Cli) -> Settings {
    let mut settings = match &cli.config {
        Some(path) => load_settings_from(path),
        None => load_settings(),
    };
    if let Some(site) = &cli.site {
        settings.site_url = site.clone();
    }
    if let Some(list) = &cli.list {
        settings.list_name = list.clone();
    }
    if let Some(token) = &cli.access_token {
        settings.access_token = Some(token.clone());
    }
    settings
}

fn print_customer(customer: &Customer) {
    let id = customer
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{id:>6}  {:<32} rigs={:<3} jack-ups={:<3} modus={:<3} {}",
        customer.name,
        customer.rig_count,
        customer.jack_up_count,
        customer.modu_count,
        customer.site_url.as_deref().unwrap_or("")
    );
    for line in customer.address.lines() {
        println!("{:>8}{line}", "");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let settings = resolve_settings(&cli);
    tracing::debug!(
        site_url = %settings.site_url,
        list = %settings.list_name,
        "cli: settings resolved"
    );

    let context = settings.host_context();
    let repository = HttpListRepository::with_timeout(
        &settings.site_url,
        &settings.list_name,
        &context,
        settings.request_timeout(),
    )
    .with_context(|| format!("failed to bind customer list '{}'", settings.list_name))?;
    let mut controller = CustomerFormController::new(Arc::new(repository));
    controller.load().await?;

    match cli.command {
        Command::List => {
            println!("{}", context.caption);
            for customer in controller.records() {
                print_customer(customer);
            }
            println!("{} customer(s)", controller.records().len());
        }
        Command::Add {
            name,
            address,
            fields,
        } => {
            controller.enter_add_mode();
            controller.set_name(&name);
            controller.set_address(&address);
            for edit in fields.into_edits() {
                controller.apply_edit(edit);
            }
            let outcome = controller.submit().await?;
            report(&controller, &outcome)?;
        }
        Command::Edit {
            id,
            name,
            address,
            fields,
        } => {
            if !controller.select_existing(CustomerId(id)) {
                bail!(
                    "no customer with id {id} in list '{}'",
                    settings.list_name
                );
            }
            if let Some(name) = name {
                controller.set_name(&name);
            }
            if let Some(address) = address {
                controller.set_address(&address);
            }
            for edit in fields.into_edits() {
                controller.apply_edit(edit);
            }
            let outcome = controller.submit().await?;
            report(&controller, &outcome)?;
        }
    }

    Ok(())
}

fn report(controller: &CustomerFormController, outcome: &SubmitOutcome) -> Result<()> {
    if let SubmitOutcome::Created(created) = outcome {
        print_customer(created);
    }
    check_notice(controller.notice())
}

/// A save can succeed while the reload after it fails; the error notice left
/// behind still fails the command.
fn check_notice(notice: Option<&Notice>) -> Result<()> {
    match notice {
        Some(notice) if notice.kind == NoticeKind::Error => bail!("{}", notice.text),
        Some(notice) => {
            println!("{}", notice.text);
            Ok(())
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_flags_become_edits_in_form_order() {
        let cli = Cli::try_parse_from([
            "customers",
            "add",
            "--name",
            "Acme",
            "--address",
            "1 Dock Rd",
            "--site-url",
            "",
            "--rigs",
            "2",
        ])
        .expect("parse");

        let Command::Add { fields, .. } = cli.command else {
            panic!("expected add command");
        };
        assert_eq!(
            fields.into_edits(),
            vec![
                FieldEdit::RigCount("2".into()),
                FieldEdit::SiteUrl(String::new()),
            ]
        );
    }

    #[test]
    fn edit_requires_numeric_id() {
        assert!(Cli::try_parse_from(["customers", "edit", "seven"]).is_err());
        let cli = Cli::try_parse_from(["customers", "edit", "7", "--address", "9 New Wharf"])
            .expect("parse");
        assert!(matches!(
            cli.command,
            Command::Edit { id: 7, address: Some(_), name: None, .. }
        ));
    }

    #[test]
    fn flags_override_site_and_list() {
        let cli = Cli::try_parse_from([
            "customers",
            "--site",
            "https://contoso.example/sites/ops",
            "--list",
            "Rig Customers",
            "list",
        ])
        .expect("parse");

        let settings = resolve_settings(&cli);
        assert_eq!(settings.site_url, "https://contoso.example/sites/ops");
        assert_eq!(settings.list_name, "Rig Customers");
    }

    #[test]
    fn error_notice_after_save_fails_the_command() {
        let reload_failed = Notice::new(
            NoticeKind::Error,
            "Error loading customers: not authorized to access the customer list",
        );
        let err = check_notice(Some(&reload_failed)).expect_err("must fail");
        assert!(err.to_string().starts_with("Error loading customers"));

        assert!(check_notice(Some(&Notice::success("Customer added successfully!"))).is_ok());
        assert!(check_notice(None).is_ok());
    }
}
