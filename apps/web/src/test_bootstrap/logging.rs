#![cfg(test)]

/// Route unit-test logs through the shared test subscriber.
pub fn init() {
    web_test_support::test_logging::init();
}
