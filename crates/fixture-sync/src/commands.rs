use anyhow::{Context, Result};
use application::DiscoveryService;
use application::scene::{FlattenedScene, SceneFlattener, SceneMerger};
use application::sync::{InventoryLogin, PurgeTarget, SyncOptions, SyncReport, SyncService, SyncSteps};
use domain::{InventorySnapshot, SceneStore, TagAxis};
use infrastructure::{AppConfig, ArtNetDiscovery, FileInventory, MvrSceneStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::cli::{Command, PurgeKind, SyncArgs};

pub async fn execute(command: Command, mut config: AppConfig) -> Result<()> {
    match command {
        Command::Discover(args) => {
            args.apply(&mut config);
            discover(&config).await
        }
        Command::Merge(args) => {
            let output = args
                .output
                .unwrap_or_else(|| PathBuf::from(&config.merge.output));
            merge(&args.source, &args.target, &output)
        }
        Command::Show { scene } => show(&scene),
        Command::Inventory(args) => {
            args.apply(&mut config);
            list_inventory(&config).await
        }
        Command::Sync(args) => {
            args.apply(&mut config);
            sync(&args, &config).await
        }
        Command::Purge { target, inventory } => {
            inventory.apply(&mut config);
            purge(target, &config).await
        }
    }
}

async fn discover(config: &AppConfig) -> Result<()> {
    let discovery = ArtNetDiscovery::new(config.discovery.artnet());
    let service = DiscoveryService::new(Arc::new(discovery), Arc::new(MvrSceneStore::new()));
    let output = PathBuf::from(&config.discovery.output);
    let timeout = config.discovery.timeout()?;

    info!(
        bind = %config.discovery.bind_ip,
        broadcast = %config.discovery.broadcast,
        port = config.discovery.port,
        "Polling lighting network"
    );
    let (mut devices, _) = service
        .discover_to_file(timeout, &output)
        .await?;

    devices.sort_by_key(|d| d.reported_ip);
    for device in &devices {
        println!(
            "{:<15}  {:<18}  {}  (from {})",
            device.reported_ip, device.short_name, device.long_name, device.source_ip
        );
    }
    println!("{} device(s) written to {}", devices.len(), output.display());
    Ok(())
}

fn merge(source: &Path, target: &Path, output: &Path) -> Result<()> {
    let store = MvrSceneStore::new();
    let summary = SceneMerger::merge_files(&store, source, target, output)
        .with_context(|| format!("merging {} into {}", source.display(), target.display()))?;
    println!(
        "{} fixture(s) merged into {}, {} name mismatch(es)",
        summary.fixtures,
        output.display(),
        summary.name_mismatches.len()
    );
    for mismatch in &summary.name_mismatches {
        println!("  {mismatch}");
    }
    Ok(())
}

fn load_flattened(path: &Path) -> Result<FlattenedScene> {
    let document = MvrSceneStore::new()
        .load(path)
        .with_context(|| format!("reading scene {}", path.display()))?;
    Ok(SceneFlattener::flatten(&document))
}

fn show(path: &Path) -> Result<()> {
    let scene = load_flattened(path)?;

    for layer in &scene.layers {
        println!("Layer {} ({})", layer.layer.name, layer.layer.uuid);
        for fixture in &layer.fixtures {
            let ip = fixture
                .first_ipv4()
                .map(|ip| ip.to_string())
                .unwrap_or_else(|| "-".to_string());
            let dmx = fixture
                .dmx
                .first()
                .map(|a| a.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("  {:<24} {:<38} {:<15} {}", fixture.name, fixture.uuid, ip, dmx);
        }
    }

    for axis in TagAxis::ALL {
        let names: Vec<&str> = scene.tags.axis(axis).iter().map(|t| t.name.as_str()).collect();
        println!("{axis} tags: {}", names.join(", "));
    }
    Ok(())
}

fn sync_service(config: &AppConfig) -> SyncService {
    if !config.inventory.url.is_empty() {
        info!(url = %config.inventory.url, "Configured inventory URL");
    }
    info!(state_file = %config.inventory.state_file, "Using file-backed inventory");

    let client = FileInventory::new(&config.inventory.state_file);
    let options = SyncOptions {
        layers: config.tags.layers,
        classes: config.tags.classes,
        positions: config.tags.positions,
    };
    SyncService::new(
        Arc::new(client),
        InventoryLogin {
            username: config.inventory.username.clone(),
            password: config.inventory.password.clone(),
        },
        config.inventory.call_timeout(),
        options,
    )
}

async fn list_inventory(config: &AppConfig) -> Result<()> {
    let snapshot = sync_service(config).fetch_snapshot().await?;
    print_snapshot(&snapshot);
    Ok(())
}

fn print_snapshot(snapshot: &InventorySnapshot) {
    println!("Monitors ({}):", snapshot.monitors.len());
    for m in &snapshot.monitors {
        println!(
            "  {:>5}  {:<24} {:<38} [{}]",
            m.id,
            m.name,
            m.description.as_deref().unwrap_or("-"),
            m.tags.join(", ")
        );
    }
    println!("Tags ({}):", snapshot.tags.len());
    for t in &snapshot.tags {
        println!(
            "  {:>5}  {:<24} {}",
            t.id,
            t.name,
            t.color.as_deref().unwrap_or("")
        );
    }
}

async fn sync(args: &SyncArgs, config: &AppConfig) -> Result<()> {
    let scene = load_flattened(&args.scene)?;
    let steps = if args.tags_only {
        SyncSteps::TagsOnly
    } else if args.monitors_only {
        SyncSteps::MonitorsOnly
    } else {
        SyncSteps::All
    };

    let service = sync_service(config);
    if service.options().enabled_axes().next().is_none() {
        warn!("No tag axis enabled, monitors will be created without tags");
    }
    let report = service.run(&scene, steps).await?;
    print_report(&report);
    Ok(())
}

async fn purge(kind: PurgeKind, config: &AppConfig) -> Result<()> {
    let target = match kind {
        PurgeKind::Monitors => PurgeTarget::Monitors,
        PurgeKind::Tags => PurgeTarget::Tags,
    };
    let report = sync_service(config).purge(target).await?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &SyncReport) {
    print!("{report}");
}
