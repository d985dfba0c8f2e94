//! Subcommands and their execution against a [`NetworkManager`].

use anyhow::{bail, Context};
use clap::{ArgAction, Args, Subcommand};
use fabric::{
    is_supported_mtu, is_supported_rate_limit, is_valid_service_level, parse_pkey, Field,
    IBNetwork, PKey, Strategy, MAX_SERVICE_LEVEL,
};
use manager::NetworkManager;

use crate::output::{self, OutputFormat};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the UFM release version.
    Version,

    /// List all IB networks.
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Show one IB network.
    Describe {
        #[arg(long, value_parser = parse_pkey)]
        pkey: PKey,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Show one IB network and its member ports. The default pkey shows every
    /// port in the fabric.
    View {
        #[arg(long, value_parser = parse_pkey)]
        pkey: PKey,
    },

    /// Create an IB network, then apply its QoS.
    Create {
        #[arg(long, value_parser = parse_pkey)]
        pkey: PKey,

        #[command(flatten)]
        settings: NetworkArgs,
    },

    /// Delete an IB network.
    Delete {
        #[arg(long, value_parser = parse_pkey)]
        pkey: PKey,
    },

    /// Update the members or QoS of an existing IB network.
    Patch {
        #[arg(long, value_parser = parse_pkey)]
        pkey: PKey,

        /// qos or guid.
        #[arg(long, default_value = "guid", value_parser = parse_field)]
        field: Field,

        /// add, delete or set. `set` on guids adds without removing others.
        #[arg(long, default_value = "add", value_parser = parse_strategy)]
        strategy: Strategy,

        #[command(flatten)]
        settings: NetworkArgs,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Version => "version",
            Command::List { .. } => "list",
            Command::Describe { .. } => "describe",
            Command::View { .. } => "view",
            Command::Create { .. } => "create",
            Command::Delete { .. } => "delete",
            Command::Patch { .. } => "patch",
        }
    }
}

/// Desired state of a partition, as given on the command line.
#[derive(Args, Debug, Clone)]
pub struct NetworkArgs {
    /// Comma separated member GUIDs.
    #[arg(long, value_delimiter = ',')]
    pub guids: Vec<String>,

    /// MTU of the partition: 2048 or 4096.
    #[arg(long, default_value_t = 2048, value_parser = parse_mtu)]
    pub mtu: i32,

    #[arg(long = "ip-over-ib", default_value_t = true, action = ArgAction::Set)]
    pub ip_over_ib: bool,

    /// Store the pkey at index 0 of each member's pkey table.
    #[arg(long)]
    pub index0: bool,

    #[arg(long = "service-level", default_value_t = 0, value_parser = parse_service_level)]
    pub service_level: i32,

    #[arg(long = "rate-limit", default_value_t = 2.5, value_parser = parse_rate_limit)]
    pub rate_limit: f64,

    #[arg(long = "enable-sharp")]
    pub enable_sharp: bool,
}

impl NetworkArgs {
    pub fn into_network(self, pkey: PKey) -> IBNetwork {
        IBNetwork {
            guids: self.guids,
            mtu: self.mtu,
            ip_over_ib: self.ip_over_ib,
            index0: self.index0,
            service_level: self.service_level,
            rate_limit: self.rate_limit,
            enable_sharp: self.enable_sharp,
            ..IBNetwork::new(pkey)
        }
    }
}

// ---------------------------------------------------------------------------
// Value parsers
// ---------------------------------------------------------------------------

fn parse_field(value: &str) -> fabric::Result<Field> {
    value.parse()
}

fn parse_strategy(value: &str) -> fabric::Result<Strategy> {
    value.parse()
}

fn parse_mtu(value: &str) -> Result<i32, String> {
    let mtu: i32 = value.parse().map_err(|e| format!("{e}"))?;
    if !is_supported_mtu(mtu) {
        return Err(format!("unsupported mtu {mtu}, expected 2048 or 4096"));
    }
    Ok(mtu)
}

fn parse_service_level(value: &str) -> Result<i32, String> {
    let level: i32 = value.parse().map_err(|e| format!("{e}"))?;
    if !is_valid_service_level(level) {
        return Err(format!(
            "service level {level} out of range 0 - {MAX_SERVICE_LEVEL}"
        ));
    }
    Ok(level)
}

fn parse_rate_limit(value: &str) -> Result<f64, String> {
    let rate: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if !is_supported_rate_limit(rate) {
        return Err(format!("unsupported rate limit {rate}"));
    }
    Ok(rate)
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Runs `command` and returns the text to print on stdout.
pub async fn execute(manager: &NetworkManager, command: Command) -> anyhow::Result<String> {
    match command {
        Command::Version => {
            let version = manager
                .version()
                .await
                .context("Failed to get UFM version")?;
            Ok(format!("UFM Version: {version}\n"))
        }

        Command::List { output: format } => {
            let networks = manager
                .list()
                .await
                .context("Failed to list IB networks")?;
            match format {
                OutputFormat::Table => Ok(output::network_table(&networks)),
                OutputFormat::Json => output::json(&networks),
            }
        }

        Command::Describe {
            pkey,
            output: format,
        } => {
            let ib = manager
                .get(pkey)
                .await
                .context("Failed to get IB network")?;
            match format {
                OutputFormat::Table => Ok(output::network_detail(&ib)),
                OutputFormat::Json => output::json(&ib),
            }
        }

        Command::View { pkey } => {
            let ib = manager
                .get(pkey)
                .await
                .context("Failed to get IB network")?;
            let ports = if pkey.is_default() {
                manager.list_ports(None).await
            } else {
                manager.list_ports(Some(ib.guids.as_slice())).await
            }
            .context("Failed to list ports")?;
            Ok(format!(
                "{}\n{}",
                output::network_detail(&ib),
                output::port_table(&ports)
            ))
        }

        Command::Create { pkey, settings } => {
            if settings.guids.is_empty() {
                bail!("Failed to create IB network: at least one guid is required");
            }
            let ib = settings.into_network(pkey);
            manager
                .create(&ib)
                .await
                .context("Failed to create IB network")?;
            // The partition is live from here on; a QoS failure leaves it with
            // the service defaults.
            manager
                .patch(&ib, Field::Qos, Strategy::Set)
                .await
                .with_context(|| format!("IB network {pkey} created but its QoS was not applied"))?;
            Ok(format!("IB network {pkey} created\n"))
        }

        Command::Delete { pkey } => {
            manager
                .delete(pkey)
                .await
                .context("Failed to delete IB network")?;
            Ok(format!("IB network {pkey} deleted\n"))
        }

        Command::Patch {
            pkey,
            field,
            strategy,
            settings,
        } => {
            manager
                .get(pkey)
                .await
                .context("Failed to get IB network")?;
            let ib = settings.into_network(pkey);
            manager
                .patch(&ib, field, strategy)
                .await
                .context("Failed to patch IB network")?;
            Ok(format!("IB network {pkey} patched\n"))
        }
    }
}
