pub mod cookies;
pub mod logging;
pub mod responses;

// Make test utilities available for both unit tests and integration tests
#[cfg(any(test, feature = "testing"))]
pub mod test_helpers;
