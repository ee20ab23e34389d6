// qrkit state managers
// Managers own persisted state: the QR history log.

pub mod history_store;
