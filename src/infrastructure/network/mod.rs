pub mod connectivity;
pub mod probe;

pub use connectivity::ConnectivitySignal;
pub use probe::HttpConnectivityProbe;
