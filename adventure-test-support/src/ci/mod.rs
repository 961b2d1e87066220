//! Environment-driven tuning shared by the workspace's property suites.

pub mod property_test_profile;
