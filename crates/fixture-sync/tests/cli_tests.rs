use clap::Parser;
use domain::scene::{AuxDefinition, Parent};
use domain::{DomainError, Fixture, InventoryClient, SceneDocument, SceneStore};
use fixture_sync::cli::{Cli, Command, PurgeKind};
use fixture_sync::commands;
use infrastructure::{AppConfig, FileInventory, MvrSceneStore};
use std::net::Ipv4Addr;
use std::path::Path;

fn venue() -> SceneDocument {
    let mut doc = SceneDocument::new();
    doc.aux.classes.push(AuxDefinition::new("C-SPOT", "Spot"));
    let layer = doc.add_layer("L1", "Truss");
    doc.add_fixture(
        Parent::Layer(layer),
        Fixture::new("U1", "Spot 1")
            .with_ipv4(Ipv4Addr::new(10, 0, 0, 5))
            .with_class("C-SPOT"),
    )
    .unwrap();
    doc.add_fixture(Parent::Layer(layer), Fixture::new("U2", "Dimmer"))
        .unwrap();
    doc
}

fn config_for(state_file: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.inventory.state_file = state_file.display().to_string();
    config.inventory.username = "admin".to_string();
    config.inventory.password = "secret".to_string();
    config
}

#[test]
fn test_sync_flags_parse() {
    let cli = Cli::parse_from([
        "fixture-sync",
        "--config-dir",
        "/etc/fixture-sync",
        "sync",
        "venue.mvr",
        "--tags-only",
        "--layers",
        "--state-file",
        "/tmp/inv.json",
    ]);

    assert_eq!(cli.config_dir, "/etc/fixture-sync");
    let Command::Sync(args) = cli.command else {
        panic!("expected sync command");
    };
    assert!(args.tags_only);
    assert!(args.layers);
    assert!(!args.classes);

    let mut config = AppConfig::default();
    config.tags.positions = true;
    args.apply(&mut config);
    assert!(config.tags.layers);
    assert!(config.tags.positions);
    assert_eq!(config.inventory.state_file, "/tmp/inv.json");
}

#[test]
fn test_step_flags_conflict() {
    let result = Cli::try_parse_from([
        "fixture-sync",
        "sync",
        "venue.mvr",
        "--tags-only",
        "--monitors-only",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_discover_overrides() {
    let cli = Cli::parse_from([
        "fixture-sync",
        "discover",
        "--bind-ip",
        "192.168.1.10",
        "--timeout",
        "3",
        "-o",
        "nodes.mvr",
    ]);
    let Command::Discover(args) = cli.command else {
        panic!("expected discover command");
    };

    let mut config = AppConfig::default();
    args.apply(&mut config);
    assert_eq!(config.discovery.bind_ip, Ipv4Addr::new(192, 168, 1, 10));
    assert_eq!(config.discovery.timeout_secs, 3.0);
    assert_eq!(config.discovery.output, "nodes.mvr");
    assert_eq!(config.discovery.port, 6454);
}

#[tokio::test]
async fn test_discover_rejects_infinite_timeout() {
    let cli = Cli::parse_from(["fixture-sync", "discover", "--timeout", "inf"]);
    let err = commands::execute(cli.command, AppConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DomainError>(),
        Some(DomainError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_purge_target_parses() {
    let cli = Cli::parse_from(["fixture-sync", "purge", "tags"]);
    assert!(matches!(
        cli.command,
        Command::Purge {
            target: PurgeKind::Tags,
            ..
        }
    ));
}

#[tokio::test]
async fn test_sync_command_fills_file_inventory() {
    let dir = tempfile::tempdir().unwrap();
    let scene_path = dir.path().join("venue.mvr");
    let state_path = dir.path().join("inventory.json");
    MvrSceneStore::new().save(&venue(), &scene_path).unwrap();

    let args = ["fixture-sync", "sync", scene_path.to_str().unwrap(), "--classes"];
    let cli = Cli::parse_from(args);
    commands::execute(cli.command, config_for(&state_path))
        .await
        .unwrap();

    // Second run must not add anything
    let cli = Cli::parse_from(args);
    commands::execute(cli.command, config_for(&state_path))
        .await
        .unwrap();

    let inventory = FileInventory::new(&state_path);
    inventory.login("admin", "secret").await.unwrap();
    let monitors = inventory.list_monitors().await.unwrap();
    assert_eq!(monitors.len(), 1);
    assert!(monitors[0].tracks("U1"));
    assert_eq!(monitors[0].tags, vec!["Spot".to_string()]);
    assert_eq!(inventory.list_tags().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_purge_command_empties_inventory() {
    let dir = tempfile::tempdir().unwrap();
    let scene_path = dir.path().join("venue.mvr");
    let state_path = dir.path().join("inventory.json");
    MvrSceneStore::new().save(&venue(), &scene_path).unwrap();

    let cli = Cli::parse_from(["fixture-sync", "sync", scene_path.to_str().unwrap(), "--classes"]);
    commands::execute(cli.command, config_for(&state_path))
        .await
        .unwrap();

    for target in ["monitors", "tags"] {
        let cli = Cli::parse_from(["fixture-sync", "purge", target]);
        commands::execute(cli.command, config_for(&state_path))
            .await
            .unwrap();
    }

    let inventory = FileInventory::new(&state_path);
    inventory.login("admin", "secret").await.unwrap();
    assert!(inventory.list_monitors().await.unwrap().is_empty());
    assert!(inventory.list_tags().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_merge_command_reports_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let venue_path = dir.path().join("venue.mvr");
    let empty_path = dir.path().join("empty.mvr");
    let output = dir.path().join("merged.mvr");
    let store = MvrSceneStore::new();
    store.save(&venue(), &venue_path).unwrap();
    store.save(&SceneDocument::new(), &empty_path).unwrap();

    let cli = Cli::parse_from([
        "fixture-sync",
        "merge",
        empty_path.to_str().unwrap(),
        venue_path.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ]);
    let err = commands::execute(cli.command, AppConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DomainError>(),
        Some(DomainError::Correspondence(_))
    ));
    assert!(!output.exists());
}
