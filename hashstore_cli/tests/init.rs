use hashstore_core::AnyEmptyResult;

mod common;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::hashstore_cmd(tmp.path())
		.arg("init")
		.assert()
		.success()
		.stdout(predicates::str::contains("Created"));

	let config_content = std::fs::read_to_string(tmp.path().join("hashstore.toml"))?;
	assert!(config_content.contains("cache_file = \".hashstore.json\""));
	assert!(config_content.contains("# [[targets]]"));

	// The sample config must itself be valid.
	let config = hashstore_core::HashstoreConfig::from_toml(&config_content)?;
	assert!(config.targets.is_empty());

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join("hashstore.toml");
	std::fs::write(&config_path, "existing config")?;

	common::hashstore_cmd(tmp.path())
		.arg("init")
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	assert_eq!(std::fs::read_to_string(&config_path)?, "existing config");

	Ok(())
}
