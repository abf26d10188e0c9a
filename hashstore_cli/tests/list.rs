use hashstore_core::AnyEmptyResult;

mod common;

#[test]
fn list_without_snapshot() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::hashstore_cmd(tmp.path())
		.arg("list")
		.assert()
		.success()
		.stdout(predicates::str::contains("No cached outputs found."));

	Ok(())
}

#[test]
fn list_shows_recorded_outputs() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path());
	common::hashstore_cmd(tmp.path()).arg("sync").assert().success();

	common::hashstore_cmd(tmp.path())
		.arg("list")
		.assert()
		.success()
		.stdout(predicates::str::contains("Cached outputs:"))
		.stdout(predicates::str::is_match(r"README\.md  [0-9a-f]{32}")?);

	Ok(())
}

#[test]
fn info_summarizes_project() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path());

	common::hashstore_cmd(tmp.path())
		.arg("info")
		.assert()
		.success()
		.stdout(predicates::str::contains("hashstore.toml"))
		.stdout(predicates::str::contains(".hashstore.json (missing)"))
		.stdout(predicates::str::is_match(r"Targets:\s+1")?);

	common::hashstore_cmd(tmp.path()).arg("sync").assert().success();
	common::hashstore_cmd(tmp.path())
		.arg("info")
		.assert()
		.success()
		.stdout(predicates::str::is_match(r"Cached outputs:\s+1")?);

	Ok(())
}

#[test]
fn custom_cache_file_is_respected() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path());
	let config = std::fs::read_to_string(tmp.path().join("hashstore.toml"))?;
	std::fs::write(
		tmp.path().join("hashstore.toml"),
		format!("cache_file = \"build/cache/hashes.json\"\n\n{config}"),
	)?;

	common::hashstore_cmd(tmp.path()).arg("sync").assert().success();

	assert!(tmp.path().join("build/cache/hashes.json").is_file());
	assert!(!tmp.path().join(".hashstore.json").exists());

	Ok(())
}
