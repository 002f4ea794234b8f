mod service;

pub use service::DiscoveryService;
