use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Container lifecycle status as reported by the inventory service.
///
/// Only `running` and `exited` carry meaning for sorting and action gating;
/// every other value is kept verbatim so it can still be displayed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContainerStatus {
    Running,
    Exited,
    Other(String),
}

impl ContainerStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "running" => ContainerStatus::Running,
            "exited" => ContainerStatus::Exited,
            other => ContainerStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ContainerStatus::Running => "running",
            ContainerStatus::Exited => "exited",
            ContainerStatus::Other(s) => s,
        }
    }

    /// Sort rank: running=1, exited=2, anything else=0.
    pub fn rank(&self) -> u8 {
        match self {
            ContainerStatus::Running => 1,
            ContainerStatus::Exited => 2,
            ContainerStatus::Other(_) => 0,
        }
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContainerStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ContainerStatus::parse(&raw))
    }
}

impl Serialize for ContainerStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PortMapping {
    pub host_port: String,
    pub container_port: String,
    #[serde(default)]
    pub link: String,
}

impl PortMapping {
    /// Host port as an integer, using the leading-digits rule (`"8080/udp"`
    /// gives 8080). Returns `None` when the string has no leading digits.
    pub fn host_port_number(&self) -> Option<i64> {
        leading_int(&self.host_port)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Container {
    pub name: String,
    pub server: String,
    #[serde(default)]
    pub image: String,
    pub status: ContainerStatus,
    #[serde(default)]
    pub compose_project: Option<String>,
    #[serde(default)]
    pub ports: Vec<PortMapping>,
}

impl Container {
    pub fn id(&self) -> RowId {
        RowId::new(&self.server, &self.name)
    }

    /// Compose project name, or the "Ungrouped" bucket when absent or empty.
    pub fn project(&self) -> &str {
        match self.compose_project.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => UNGROUPED,
        }
    }

    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(&self.server, self.project())
    }

    /// Sort key for the ports column: first host port, 0 when there are none.
    pub fn first_host_port(&self) -> i64 {
        self.ports
            .first()
            .and_then(PortMapping::host_port_number)
            .unwrap_or(0)
    }
}

pub const UNGROUPED: &str = "Ungrouped";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ServerStatus {
    #[default]
    Active,
    Inactive,
}

impl<'de> Deserialize<'de> for ServerStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw == "inactive" {
            ServerStatus::Inactive
        } else {
            ServerStatus::Active
        })
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Server {
    pub name: String,
    #[serde(default)]
    pub status: ServerStatus,
    #[serde(default)]
    pub order: i64,
}

impl Server {
    pub fn is_active(&self) -> bool {
        self.status == ServerStatus::Active
    }
}

/// Full inventory as of the last successful fetch.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub servers: Vec<Server>,
    #[serde(default)]
    pub containers: Vec<Container>,
}

impl Snapshot {
    pub fn server(&self, name: &str) -> Option<&Server> {
        self.servers.iter().find(|s| s.name == name)
    }

    pub fn has_active_server(&self) -> bool {
        self.servers.iter().any(Server::is_active)
    }
}

/// Row identity: (server, container name).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId {
    pub server: String,
    pub name: String,
}

impl RowId {
    pub fn new(server: &str, name: &str) -> Self {
        Self {
            server: server.to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.server, self.name)
    }
}

/// Collapsible group identity, rendered as `server::project`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn new(server: &str, project: &str) -> Self {
        Self(format!("{}::{}", server, project))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse the leading run of ASCII digits (after optional whitespace and sign).
/// Values past `i64` saturate.
pub fn leading_int(s: &str) -> Option<i64> {
    let trimmed = s.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit);
    let mut value: i64 = 0;
    let mut any = false;
    for d in digits {
        any = true;
        let d = i64::from(d - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(d)
        } else {
            value.saturating_mul(10).saturating_add(d)
        };
    }
    any.then_some(value)
}
