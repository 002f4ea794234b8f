use clap::{Args, Parser, Subcommand, ValueEnum};
use infrastructure::AppConfig;
use std::net::Ipv4Addr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Keep a monitoring inventory in step with a venue's fixtures", long_about = None)]
pub struct Cli {
    /// Path to config directory
    #[arg(long, default_value = "config")]
    pub config_dir: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Poll the lighting network and write the answering devices to a scene file
    Discover(DiscoverArgs),
    /// Copy discovered addresses onto the fixtures of an authored scene
    Merge(MergeArgs),
    /// Print the layers, fixtures and tags of a scene file
    Show {
        scene: PathBuf,
    },
    /// List monitors and tags held by the inventory
    Inventory(InventoryArgs),
    /// Create missing tags and monitors for a scene file
    Sync(SyncArgs),
    /// Delete every monitor or every tag from the inventory
    Purge {
        target: PurgeKind,
        #[command(flatten)]
        inventory: InventoryArgs,
    },
}

#[derive(Args, Debug, Default)]
pub struct DiscoverArgs {
    /// Local address to bind
    #[arg(long)]
    pub bind_ip: Option<Ipv4Addr>,
    /// Broadcast address the poll is sent to
    #[arg(long)]
    pub broadcast: Option<Ipv4Addr>,
    #[arg(long)]
    pub port: Option<u16>,
    /// Listening window in seconds
    #[arg(long)]
    pub timeout: Option<f64>,
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Scene produced by discovery (addresses)
    pub source: PathBuf,
    /// Authored scene (fixture identity)
    pub target: PathBuf,
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct InventoryArgs {
    /// Inventory state file
    #[arg(long)]
    pub state_file: Option<String>,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    /// Per-call timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    pub scene: PathBuf,
    /// Only create missing tags
    #[arg(long, conflicts_with = "monitors_only")]
    pub tags_only: bool,
    /// Only create monitors and attach existing tags
    #[arg(long)]
    pub monitors_only: bool,
    /// Use layer names as tags
    #[arg(long)]
    pub layers: bool,
    /// Use fixture classes as tags
    #[arg(long)]
    pub classes: bool,
    /// Use fixture positions as tags
    #[arg(long)]
    pub positions: bool,
    #[command(flatten)]
    pub inventory: InventoryArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurgeKind {
    Monitors,
    Tags,
}

impl DiscoverArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(ip) = self.bind_ip {
            config.discovery.bind_ip = ip;
        }
        if let Some(ip) = self.broadcast {
            config.discovery.broadcast = ip;
        }
        if let Some(port) = self.port {
            config.discovery.port = port;
        }
        if let Some(timeout) = self.timeout {
            config.discovery.timeout_secs = timeout;
        }
        if let Some(output) = &self.output {
            config.discovery.output = output.display().to_string();
        }
    }
}

impl InventoryArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.state_file {
            config.inventory.state_file = path.clone();
        }
        if let Some(user) = &self.username {
            config.inventory.username = user.clone();
        }
        if let Some(password) = &self.password {
            config.inventory.password = password.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.inventory.timeout_secs = secs;
        }
    }
}

impl SyncArgs {
    /// Flags only switch axes on; configured axes stay enabled.
    pub fn apply(&self, config: &mut AppConfig) {
        self.inventory.apply(config);
        config.tags.layers |= self.layers;
        config.tags.classes |= self.classes;
        config.tags.positions |= self.positions;
    }
}
