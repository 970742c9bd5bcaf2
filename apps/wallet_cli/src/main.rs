use std::{process::ExitCode, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared::{
    domain::{element, ActionKind, RecipientId, TransferToken, WalletAddress},
    protocol::{ChildAccountForm, NewAccountForm, ParentAccountForm, TransferForm},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wallet_client::{
    ActionError, ButtonState, Credentials, FormActionController, HttpTransport, TransportOptions,
};

mod config;
mod console;

use config::{load_settings, normalize_server_url};
use console::ConsolePage;

#[derive(Parser, Debug)]
#[command(about = "Run StakeUp wallet form actions against a wallet server")]
struct Args {
    /// Overrides the server url from wallet.toml and the environment.
    #[arg(long)]
    server_url: Option<String>,
    /// Sign in as a parent.
    #[arg(long, conflicts_with = "account_name")]
    email: Option<String>,
    /// Sign in as a child.
    #[arg(long)]
    account_name: Option<String>,
    #[arg(long)]
    password: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send tokens to an address.
    Transfer {
        #[arg(long, default_value = "STP")]
        token: TransferToken,
        /// Destination address, or a family member's email/name with --lookup.
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: u64,
        /// Resolve --to through the family address lookup first.
        #[arg(long)]
        lookup: bool,
        /// Password confirming the transfer; defaults to --password.
        #[arg(long)]
        tx_password: Option<String>,
    },
    AddChild {
        #[arg(long)]
        name: String,
        #[arg(long)]
        child_password: String,
    },
    AddParent {
        #[arg(long)]
        name: String,
        #[arg(long)]
        parent_email: String,
        #[arg(long)]
        parent_password: String,
    },
    /// Print the wallet address of a family member.
    ResolveAddress {
        #[arg(long)]
        id: String,
    },
    /// Register a parent account; runs without signing in.
    CreateAccount {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        account_password: String,
        /// Import an existing wallet instead of generating one.
        #[arg(long)]
        private_key: Option<String>,
    },
}

impl Args {
    fn credentials(&self) -> Result<Credentials> {
        let Some(password) = self.password.clone() else {
            bail!("--password is required to sign in");
        };
        match (&self.email, &self.account_name) {
            (Some(email), None) => Ok(Credentials::Parent {
                email: email.clone(),
                password,
            }),
            (None, Some(name)) => Ok(Credentials::Child {
                name: name.clone(),
                password,
            }),
            _ => bail!("pass exactly one of --email or --account-name"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();

    let mut settings = load_settings()?;
    if let Some(url) = &args.server_url {
        settings.server_url = normalize_server_url(url);
    }
    info!(server_url = %settings.server_url, "using wallet server");

    let transport = Arc::new(
        HttpTransport::with_options(
            &settings.server_url,
            TransportOptions {
                timeout: settings.request_timeout(),
            },
        )
        .context("failed to set up http transport")?,
    );

    if let Command::CreateAccount {
        email,
        name,
        account_password,
        private_key,
    } = &args.command
    {
        let form = NewAccountForm {
            email: email.clone(),
            password: account_password.clone(),
            name: name.clone(),
            private_key: private_key.clone(),
        };
        transport
            .create_account(&form)
            .await
            .context("account creation failed")?;
        println!("account {email} created; sign in with --email");
        return Ok(ExitCode::SUCCESS);
    }

    transport
        .login(&args.credentials()?)
        .await
        .context("sign-in failed")?;

    let controller = FormActionController::new(transport.clone());
    let page = ConsolePage::new();
    let outcome = run(&controller, &page, &args).await;

    if let Err(err) = transport.logout().await {
        warn!(error = %err, "sign-out failed");
    }

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err @ ActionError::Application { .. }) => {
            info!(error = %err, "action rejected");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err).context("form action failed"),
    }
}

async fn run(
    controller: &FormActionController,
    page: &ConsolePage,
    args: &Args,
) -> std::result::Result<(), ActionError> {
    match &args.command {
        Command::Transfer {
            token,
            to,
            amount,
            lookup,
            tx_password,
        } => {
            if *lookup {
                controller
                    .resolve_address(&RecipientId(to.clone()), page)
                    .await?;
            }
            let to_address = page
                .snapshot()
                .inputs
                .get(element::TO_ADDRESS_INPUT)
                .cloned()
                .unwrap_or_else(|| to.clone());
            let form = TransferForm {
                to_address: WalletAddress(to_address),
                amount: *amount,
                password: tx_password
                    .clone()
                    .or_else(|| args.password.clone())
                    .unwrap_or_default(),
            };
            let button = trigger_for(ActionKind::Transfer);
            let receipt = controller.transfer(*token, &form, &button, page).await?;
            if let Some(tx) = receipt.transaction {
                println!("transaction {tx} (status {})", receipt.tx_status.unwrap_or_default());
            }
        }
        Command::AddChild {
            name,
            child_password,
        } => {
            let form = ChildAccountForm {
                name: name.clone(),
                password: child_password.clone(),
            };
            let button = trigger_for(ActionKind::AddChild);
            controller.add_child(&form, &button, page).await?;
        }
        Command::AddParent {
            name,
            parent_email,
            parent_password,
        } => {
            let form = ParentAccountForm {
                name: name.clone(),
                email: parent_email.clone(),
                password: parent_password.clone(),
            };
            let button = trigger_for(ActionKind::AddParent);
            controller.add_parent(&form, &button, page).await?;
        }
        Command::ResolveAddress { id } => {
            controller
                .resolve_address(&RecipientId(id.clone()), page)
                .await?;
        }
        // Handled in main before sign-in.
        Command::CreateAccount { .. } => {}
    }
    Ok(())
}

fn trigger_for(kind: ActionKind) -> ButtonState {
    ButtonState::for_action(kind).unwrap_or_else(|| ButtonState::new(kind.name(), kind.name()))
}
