// Domain layer: calendar dates, ledger entities and ports (interfaces).

pub mod model;
pub mod ports;
