//! Console rendering of partitions and ports.

use std::fmt;

use clap::ValueEnum;
use fabric::{IBNetwork, Port};

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// One row per partition under a fixed-width header.
pub fn network_table(networks: &[IBNetwork]) -> String {
    NetworkTable(networks).to_string()
}

/// `label: value` lines for one partition, GUIDs one per line.
pub fn network_detail(ib: &IBNetwork) -> String {
    NetworkDetail(ib).to_string()
}

pub fn port_table(ports: &[Port]) -> String {
    PortTable(ports).to_string()
}

struct NetworkTable<'a>(&'a [IBNetwork]);

impl fmt::Display for NetworkTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<15}{:<10}{:<10}{:<10}{:<10}{:<10}{:<10}{:<10}",
            "Name", "Pkey", "IPoIB", "SHARP", "MTU", "Rate", "Level", "GUIDs"
        )?;
        for ib in self.0 {
            writeln!(
                f,
                "{:<15}0x{:04x}    {:<10}{:<10}{:<10}{:<10.2}{:<10}{:<10}",
                ib.name,
                ib.pkey.as_u16(),
                ib.ip_over_ib,
                ib.enable_sharp,
                ib.mtu,
                ib.rate_limit,
                ib.service_level,
                ib.guids.len(),
            )?;
        }
        Ok(())
    }
}

struct NetworkDetail<'a>(&'a IBNetwork);

impl fmt::Display for NetworkDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ib = self.0;
        writeln!(f, "{:<15}: {}", "Name", ib.name)?;
        writeln!(f, "{:<15}: {}", "Pkey", ib.pkey)?;
        writeln!(f, "{:<15}: {}", "IPoIB", ib.ip_over_ib)?;
        writeln!(f, "{:<15}: {}", "SHARP", ib.enable_sharp)?;
        writeln!(f, "{:<15}: {}", "MTU", ib.mtu)?;
        writeln!(f, "{:<15}: {:.2}", "Rate Limit", ib.rate_limit)?;
        writeln!(f, "{:<15}: {}", "Service Level", ib.service_level)?;
        writeln!(f, "{:<15}: {}", "Index0", ib.index0)?;
        match ib.guids.split_first() {
            None => writeln!(f, "{:<15}: -", "GUIDs"),
            Some((first, rest)) => {
                writeln!(f, "{:<15}: {}", "GUIDs", first)?;
                for guid in rest {
                    writeln!(f, "{:<15}  {}", "", guid)?;
                }
                Ok(())
            }
        }
    }
}

struct PortTable<'a>(&'a [Port]);

impl fmt::Display for PortTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<20}{:<20}{:<20}{:<8}{:<12}{:<12}",
            "Name", "GUID", "System", "LID", "Logical", "Physical"
        )?;
        for port in self.0 {
            writeln!(
                f,
                "{:<20}{:<20}{:<20}{:<8}{:<12}{:<12}",
                port.name,
                port.guid,
                port.system_name,
                port.lid,
                port.logical_state,
                port.physical_state,
            )?;
        }
        Ok(())
    }
}

pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
