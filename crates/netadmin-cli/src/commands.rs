use std::path::Path;

use anyhow::Context;
use colored::Colorize;

use netadmin_server::{NetAdminServer, ServerConfig};
use netadmin_vlan::{FileVlanStore, Vlan, VlanStore};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Check(args) => cmd_check(&args.store, &cli.format),
        Command::List(args) => cmd_list(&args.store, &cli.format),
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args, |key| std::env::var(key).ok())?;
    let server = NetAdminServer::new(config).context("failed to initialise API server")?;
    server.serve().await.context("API server failed")
}

/// Defaults, then the config file, then the environment, then flags.
fn resolve_config<F>(args: &ServeArgs, env: F) -> anyhow::Result<ServerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    config.apply_env_from(env)?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(store) = &args.store {
        config.store_path = store.clone();
    }
    Ok(config)
}

fn open_store(path: &Path) -> anyhow::Result<FileVlanStore> {
    FileVlanStore::open(path).with_context(|| format!("failed to load store {}", path.display()))
}

fn cmd_check(path: &Path, format: &OutputFormat) -> anyhow::Result<()> {
    let store = open_store(path)?;
    match format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "store": path.display().to_string(),
                "records": store.len(),
                "valid": true,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!(
                "{} {} holds {} valid records",
                "✓".green().bold(),
                path.display().to_string().bold(),
                store.len().to_string().bold()
            );
        }
    }
    Ok(())
}

fn cmd_list(path: &Path, format: &OutputFormat) -> anyhow::Result<()> {
    // Listing is read-only; unlike `check` it never bootstraps a file.
    if !path.try_exists().with_context(|| format!("failed to stat {}", path.display()))? {
        anyhow::bail!("store {} does not exist", path.display());
    }
    let vlans = open_store(path)?.list();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&vlans)?),
        OutputFormat::Text if vlans.is_empty() => println!("No VLANs."),
        OutputFormat::Text => print!("{}", render_table(&vlans)),
    }
    Ok(())
}

fn render_table(vlans: &[Vlan]) -> String {
    let mut out = format!(
        "{:<36}  {:>4}  {:<20}  {:<20}  {:<16}  {}\n",
        "ID".bold(),
        "VID".bold(),
        "NAME".bold(),
        "SUBNET".bold(),
        "GATEWAY".bold(),
        "STATUS".bold()
    );
    for vlan in vlans {
        let status = match vlan.status.as_str() {
            "enabled" => vlan.status.green(),
            "disabled" => vlan.status.dimmed(),
            _ => vlan.status.yellow(),
        };
        out.push_str(&format!(
            "{:<36}  {:>4}  {:<20}  {:<20}  {:<16}  {}\n",
            vlan.id.to_string().cyan(),
            vlan.tag,
            vlan.name,
            vlan.subnet.to_string(),
            vlan.gateway.to_string(),
            status
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use netadmin_vlan::VlanId;

    fn serve_args(config: Option<&Path>, bind: Option<&str>, store: Option<&str>) -> ServeArgs {
        ServeArgs {
            config: config.map(Path::to_path_buf),
            bind: bind.map(|b| b.parse().unwrap()),
            store: store.map(Into::into),
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn config_defaults() {
        let config = resolve_config(&serve_args(None, None, None), no_env).unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.store_path, Path::new("vlans.json"));
    }

    #[test]
    fn config_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("netadmin.toml");
        std::fs::write(
            &file,
            "bind_addr = \"127.0.0.1:7000\"\nstore_path = \"/from/file.json\"\n",
        )
        .unwrap();

        let from_file = resolve_config(&serve_args(Some(&file), None, None), no_env).unwrap();
        assert_eq!(from_file.bind_addr, "127.0.0.1:7000".parse().unwrap());
        assert_eq!(from_file.store_path, Path::new("/from/file.json"));

        let env = |key: &str| match key {
            "PORT" => Some("7100".to_string()),
            "VLAN_STORE_PATH" => Some("/from/env.json".to_string()),
            _ => None,
        };
        let from_env = resolve_config(&serve_args(Some(&file), None, None), env).unwrap();
        assert_eq!(from_env.bind_addr, "127.0.0.1:7100".parse().unwrap());
        assert_eq!(from_env.store_path, Path::new("/from/env.json"));

        let args = serve_args(Some(&file), Some("0.0.0.0:7200"), Some("/from/flag.json"));
        let from_flags = resolve_config(&args, env).unwrap();
        assert_eq!(from_flags.bind_addr, "0.0.0.0:7200".parse().unwrap());
        assert_eq!(from_flags.store_path, Path::new("/from/flag.json"));
    }

    #[test]
    fn config_rejects_bad_port() {
        let env = |key: &str| (key == "PORT").then(|| "http".to_string());
        let err = resolve_config(&serve_args(None, None, None), env).unwrap_err();
        assert!(err.to_string().contains("invalid API server port"), "{err}");
    }

    #[test]
    fn config_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(resolve_config(&serve_args(Some(&missing), None, None), no_env).is_err());
    }

    #[test]
    fn check_bootstraps_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vlans.json");
        cmd_check(&path, &OutputFormat::Json).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn check_fails_on_invalid_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vlans.json");
        std::fs::write(&path, "not json").unwrap();
        let err = cmd_check(&path, &OutputFormat::Text).unwrap_err();
        assert!(err.to_string().starts_with("failed to load store"), "{err}");
    }

    #[test]
    fn list_missing_store_fails_without_creating_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vlans.json");
        let err = cmd_list(&path, &OutputFormat::Json).unwrap_err();
        assert!(err.to_string().contains("does not exist"), "{err}");
        assert!(!path.exists());
    }

    #[test]
    fn list_existing_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vlans.json");
        std::fs::write(&path, "[]\n").unwrap();
        cmd_list(&path, &OutputFormat::Text).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn table_has_a_row_per_record() {
        colored::control::set_override(false);
        let vlans = vec![
            Vlan {
                id: VlanId::new(),
                tag: 10,
                name: "eng".into(),
                subnet: "10.0.0.0/24".parse().unwrap(),
                gateway: "10.0.0.1".parse().unwrap(),
                status: "enabled".into(),
            },
            Vlan {
                id: VlanId::new(),
                tag: 20,
                name: "lab".into(),
                subnet: "10.0.1.0/24".parse().unwrap(),
                gateway: "10.0.1.1".parse().unwrap(),
                status: "disabled".into(),
            },
        ];
        let table = render_table(&vlans);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("10.0.0.0/24"));
        assert!(lines[2].contains(&vlans[1].id.to_string()));
    }
}
