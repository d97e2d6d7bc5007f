//! JSON export of the containers currently on display.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

use crate::dispatcher::ConfirmPrompt;
use crate::error::Result;
use crate::model::{Container, PortMapping, leading_int};

pub const EMPTY_EXPORT: &str = "No data to export.";

#[derive(Debug, Serialize)]
pub struct ExportDocument {
    pub meta: ExportMeta,
    pub containers: Vec<ExportContainer>,
}

#[derive(Debug, Serialize)]
pub struct ExportMeta {
    pub generated: String,
}

#[derive(Debug, Serialize)]
pub struct ExportContainer {
    pub name: String,
    pub status: String,
    pub server: String,
    pub ports: Vec<ExportPort>,
}

#[derive(Debug, Serialize)]
pub struct ExportPort {
    pub mapping: String,
    pub accessible_at: String,
    pub host_port: Option<i64>,
    pub container_port: String,
}

impl From<&PortMapping> for ExportPort {
    fn from(p: &PortMapping) -> Self {
        Self {
            mapping: format!("{}:{}", p.host_port, p.container_port),
            accessible_at: p.link.clone(),
            host_port: leading_int(&p.host_port),
            container_port: strip_tcp(&p.container_port).to_string(),
        }
    }
}

fn strip_tcp(port: &str) -> &str {
    port.strip_suffix("/tcp").unwrap_or(port)
}

pub fn prompt() -> ConfirmPrompt {
    ConfirmPrompt {
        title: "Export to JSON".to_string(),
        message: "Are you sure you want to download the currently displayed container data as a JSON file?"
            .to_string(),
        confirm_label: "Download".to_string(),
    }
}

pub fn build(containers: &[Container], now: DateTime<Utc>) -> ExportDocument {
    ExportDocument {
        meta: ExportMeta {
            generated: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        },
        containers: containers
            .iter()
            .map(|c| ExportContainer {
                name: c.name.clone(),
                status: c.status.to_string(),
                server: c.server.clone(),
                ports: c.ports.iter().map(ExportPort::from).collect(),
            })
            .collect(),
    }
}

pub fn file_name(now: DateTime<Utc>) -> String {
    format!("dockpeek_export_{}.json", now.format("%Y-%m-%d"))
}

/// Write the document into `dir`, returning the path written.
pub fn write(dir: &Path, doc: &ExportDocument, now: DateTime<Utc>) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name(now));
    fs::write(&path, serde_json::to_string_pretty(doc)?)?;
    info!(path = %path.display(), containers = doc.containers.len(), "export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::model::ContainerStatus;

    fn web() -> Container {
        Container {
            name: "web".into(),
            server: "h1".into(),
            image: "nginx".into(),
            status: ContainerStatus::Running,
            compose_project: None,
            ports: vec![
                PortMapping {
                    host_port: "8080".into(),
                    container_port: "80/tcp".into(),
                    link: "http://h1:8080".into(),
                },
                PortMapping {
                    host_port: "n/a".into(),
                    container_port: "53/udp".into(),
                    link: String::new(),
                },
            ],
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn ports_are_flattened_with_tcp_stripped() {
        let doc = build(&[web()], at());
        let ports = &doc.containers[0].ports;
        assert_eq!(ports[0].mapping, "8080:80/tcp");
        assert_eq!(ports[0].container_port, "80");
        assert_eq!(ports[0].host_port, Some(8080));
        assert_eq!(ports[0].accessible_at, "http://h1:8080");
        assert_eq!(ports[1].container_port, "53/udp");
        assert_eq!(ports[1].host_port, None);
    }

    #[test]
    fn generated_is_utc_with_millis() {
        let doc = build(&[], at());
        assert_eq!(doc.meta.generated, "2024-03-09T14:05:07.000Z");
        assert_eq!(file_name(at()), "dockpeek_export_2024-03-09.json");
    }

    #[test]
    fn written_json_has_expected_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), &build(&[web()], at()), at()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["containers"][0]["status"], "running");
        assert_eq!(value["containers"][0]["ports"][1]["host_port"], serde_json::Value::Null);
        assert!(value["containers"][0].get("image").is_none());
    }
}
