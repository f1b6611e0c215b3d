pub mod extract;
pub mod fetcher;
pub mod normalize;
pub mod orchestrator;
pub mod page;
pub mod search;
pub mod store;
pub mod structure;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod translate;
