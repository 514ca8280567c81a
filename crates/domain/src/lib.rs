pub mod fees;
pub mod inflation;
pub mod network;
pub mod properties;
pub mod repositories;

pub use fees::{FeeMultiplierStats, RentalFees, TransactionFeeStats};
pub use inflation::{InflationPointView, InflationSchedule, InflectionPoint};
pub use network::{NetworkIdentity, NetworkProperties};
pub use properties::{PropertyDocument, PropertySection};
pub use repositories::BlockRepository;
