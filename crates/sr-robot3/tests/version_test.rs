//! 版本号测试

use semver::Version;

#[test]
fn test_version_is_semver() {
    let version = Version::parse(sr_robot3::VERSION).unwrap();
    assert_eq!(version.to_string(), sr_robot3::VERSION);
}

#[test]
fn test_version_matches_package() {
    assert_eq!(sr_robot3::VERSION, env!("CARGO_PKG_VERSION"));
}
