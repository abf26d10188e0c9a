use std::path::Path;

use assert_cmd::Command;

pub fn hashstore_cmd(root: &Path) -> Command {
	let mut cmd = Command::cargo_bin("hashstore").unwrap_or_else(|e| panic!("binary: {e}"));
	cmd.env("NO_COLOR", "1")
		.env_remove("HASHSTORE_LOG")
		.arg("--path")
		.arg(root);
	cmd
}

pub fn write_project(root: &Path) {
	std::fs::create_dir_all(root.join("templates")).unwrap_or_else(|e| panic!("mkdir: {e}"));
	std::fs::write(root.join("templates/readme.md"), "# Hello\n")
		.unwrap_or_else(|e| panic!("write: {e}"));
	std::fs::write(
		root.join("hashstore.toml"),
		"[[targets]]\ntemplate = \"templates/readme.md\"\noutput = \"README.md\"\n",
	)
	.unwrap_or_else(|e| panic!("write: {e}"));
}
