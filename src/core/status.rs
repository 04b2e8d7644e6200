//! Lifecycle status of a vehicle record.

use crate::state_enum;

state_enum! {
    /// Lifecycle stage of a vehicle.
    ///
    /// Serialized as the bare variant name (`"New"`, `"Dealer"`, ...), which is
    /// the `status` field of the record wire format.
    #[derive(Copy, Eq, Hash)]
    pub enum VehicleStatus {
        /// Built and still held by the manufacturer.
        New,
        /// Transferred to a dealer.
        Dealer,
        /// Sold and registered to a customer.
        Customer,
        /// Taken off the road for good.
        Scrapped,
    }
    final: [Scrapped]
}
