pub mod fetcher;
pub mod remote;

pub use fetcher::{EventFetcher, FetchOutcome, fetch_query};
pub use remote::{FetchError, HttpRemoteEvents, RemoteEvents};
