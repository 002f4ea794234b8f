mod file_inventory;
mod memory_inventory;
mod state;

pub use file_inventory::FileInventory;
pub use memory_inventory::{InMemoryInventory, InventoryCall};
pub use state::{Credentials, InventoryState};
