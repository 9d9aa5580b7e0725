use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TestDir {
    root: PathBuf,
}

impl TestDir {
    fn new(prefix: &str, config: &str) -> Self {
        let root = unique_temp_dir(prefix);
        fs::create_dir_all(root.join("nested")).expect("create test dir");
        fs::write(root.join(".depviz.toml"), config).expect("write config");
        fs::write(
            root.join("app.json"),
            r#"{
  "app": {"name": "app", "size": 1024, "requires_resolved": ["glibc", "perl-libs", "perl-Carp"]},
  "glibc": {"name": "glibc", "size": 2048},
  "perl-libs": {"name": "perl-libs", "size": 100, "requires_resolved": ["glibc", "perl-Carp"]},
  "perl-Carp": {"name": "perl-Carp", "size": 50, "requires_resolved": ["perl-libs"]}
}"#,
        )
        .expect("write snapshot");
        Self { root }
    }

    fn depviz_in(&self, dir: &str, args: &[&str]) -> Output {
        Command::new(depviz_bin())
            .current_dir(self.root.join(dir))
            .env_remove("DEPVIZ_CONFIG")
            .arg("--no-color")
            .args(args)
            .output()
            .expect("run depviz")
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn depviz_bin() -> PathBuf {
    PathBuf::from(
        std::env::var("CARGO_BIN_EXE_depviz")
            .expect("CARGO_BIN_EXE_depviz is not set for integration test"),
    )
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_nanos();
    let pid = std::process::id();
    std::env::temp_dir().join(format!("depviz-{prefix}-{pid}-{nanos}"))
}

fn output_text(output: &Output) -> (String, String) {
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

#[test]
fn configured_groups_are_discovered_from_parent_directory() {
    let dir = TestDir::new(
        "config-groups",
        r#"
[groups.perl]
pattern = "^perl-"

[groups.libc]
packages = ["glibc"]
"#,
    );

    let output = dir.depviz_in("nested", &["graph", "../app.json", "--sizes"]);
    let (stdout, stderr) = output_text(&output);
    assert!(output.status.success(), "stdout:\n{stdout}\nstderr:\n{stderr}");

    assert!(
        stdout.contains("\"app (1.0 kB)\" -> {\n    \"libc (2.0 kB)\"\n    \"perl (150.0 B)\"\n};"),
        "{stdout}"
    );
    assert!(
        stdout.contains("\"perl (150.0 B)\" -> {\n    \"libc (2.0 kB)\"\n};"),
        "{stdout}"
    );
    assert!(!stdout.contains("perl-Carp"), "{stdout}");
}

#[test]
fn explicit_config_flag_overrides_discovered_file() {
    let dir = TestDir::new(
        "config-explicit",
        r#"
[groups.perl]
pattern = "^perl-"
"#,
    );
    fs::write(dir.root.join("empty.toml"), "").expect("write empty config");

    let output = dir.depviz_in(".", &["--config", "empty.toml", "graph", "app.json"]);
    let (stdout, stderr) = output_text(&output);
    assert!(output.status.success(), "stdout:\n{stdout}\nstderr:\n{stderr}");
    assert!(stdout.contains("\"perl-Carp\" -> {"), "{stdout}");
}

#[test]
fn invalid_group_config_is_reported() {
    let dir = TestDir::new(
        "config-invalid",
        r#"
[groups.broken]
packages = ["glibc"]
pattern = "^glibc"
"#,
    );

    let output = dir.depviz_in(".", &["graph", "app.json"]);
    let (_, stderr) = output_text(&output);
    assert!(!output.status.success());
    assert!(
        stderr.contains("group 'broken' must set exactly one of target, packages or pattern"),
        "{stderr}"
    );
}

#[cfg(unix)]
#[test]
fn svg_output_runs_layout_stages_and_embeds_highlighting() {
    let dir = TestDir::new(
        "layout-svg",
        r#"
[layout]
timeout_secs = 10

[[layout.stages]]
program = "sh"
args = ["-c", "grep -c -- '->' >/dev/null; printf '<svg>\n<g class=\"node\"/>\n</svg>\n'"]
"#,
    );

    let output = dir.depviz_in(".", &["graph", "app.json", "-f", "svg", "-o", "graph.svg"]);
    let (stdout, stderr) = output_text(&output);
    assert!(output.status.success(), "stdout:\n{stdout}\nstderr:\n{stderr}");

    let svg = fs::read_to_string(dir.root.join("graph.svg")).expect("read svg");
    assert!(svg.starts_with("<svg>"), "{svg}");
    assert!(svg.contains("<script type=\"text/javascript\"><![CDATA["), "{svg}");
    assert!(svg.trim_end().ends_with("</svg>"), "{svg}");
}

#[cfg(unix)]
#[test]
fn failing_layout_stage_aborts_without_output() {
    let dir = TestDir::new(
        "layout-failure",
        r#"
[[layout.stages]]
program = "sh"
args = ["-c", "cat >/dev/null; echo 'gvmap: cannot open display' >&2; exit 2"]
"#,
    );

    let output = dir.depviz_in(".", &["graph", "app.json", "-f", "svg", "-o", "graph.svg"]);
    let (_, stderr) = output_text(&output);
    assert!(!output.status.success());
    assert!(stderr.contains("sh failed: exited with status 2"), "{stderr}");
    assert!(stderr.contains("cannot open display"), "{stderr}");
    assert!(!dir.root.join("graph.svg").exists());
}
