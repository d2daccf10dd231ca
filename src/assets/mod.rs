pub mod coalescer;
pub mod ddragon;

pub use coalescer::{AssetInfo, AssetRequestCoalescer, AssetSource, PerkId};
pub use ddragon::DataDragonRunes;
