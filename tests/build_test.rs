//! Integration tests for `stackpack build`
//!
//! - Extracts the project and builds `<home>/extract/<project>`
//! - Image tag defaults to the project name, `--tag` overrides it
//! - `--docker-options` are forwarded between `-t` and `-f`
//! - Options overriding `-t`/`-f` are rejected before the runtime runs
//! - Dry run prints the command and no confirmation
//! - Runtime failures produce a non-zero exit

mod common;

use common::{stderr, stdout, TestProject};

fn dry_run_line(
    project: &TestProject,
    runtime: &str,
    tag: &str,
    name: &str,
    options: &str,
) -> String {
    let context = project.context_dir(name);
    let dockerfile = context.join("Dockerfile");
    format!(
        "Dry run - skipping command: {runtime} build -t {tag} {options}-f {} {}",
        dockerfile.display(),
        context.display()
    )
}

#[test]
fn test_dry_run_prints_command_with_project_name_tag() {
    let project = TestProject::with_name("myapp");

    let output = project.run(&["--dry-run", "build"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(
        out.contains(&dry_run_line(&project, "docker", "myapp", "myapp", "")),
        "stdout: {out}"
    );
    assert!(!out.contains("Built docker image"));
}

#[test]
fn test_dry_run_does_not_extract() {
    let project = TestProject::with_name("myapp");

    let output = project.run(&["--dry-run", "build"]);

    assert!(output.status.success());
    assert!(!project.context_dir("myapp").exists());
}

#[test]
fn test_tag_overrides_project_name() {
    let project = TestProject::with_name("myapp");

    let output = project.run(&["--dry-run", "build", "--tag", "custom:v1"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains(&dry_run_line(&project, "docker", "custom:v1", "myapp", "")));
}

#[test]
fn test_short_tag_flag() {
    let project = TestProject::with_name("myapp");

    let output = project.run(&["--dry-run", "build", "-t", "registry.local/app:1.2"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("-t registry.local/app:1.2 -f"));
}

#[test]
fn test_docker_options_are_forwarded_in_order() {
    let project = TestProject::with_name("myapp");

    let output = project.run(&[
        "--dry-run",
        "build",
        "--docker-options",
        " --build-arg FOO=bar --no-cache ",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains(&dry_run_line(
        &project,
        "docker",
        "myapp",
        "myapp",
        "--build-arg FOO=bar --no-cache "
    )));
}

#[test]
fn test_tag_in_docker_options_is_rejected() {
    let project = TestProject::with_name("myapp");

    let output = project.run(&["build", "--docker-options", "-t evil"]);

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("-t is not allowed in --docker-options"));
    assert!(!stdout(&output).contains("Built docker image"));
}

#[test]
fn test_file_with_value_in_docker_options_is_rejected() {
    let project = TestProject::with_name("myapp");

    let output = project.run(&["build", "--docker-options=--pull --file=Other.Dockerfile"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("--file=Other.Dockerfile is not allowed in --docker-options"));
}

#[test]
fn test_lookalike_options_are_allowed() {
    let project = TestProject::with_name("myapp");

    let output = project.run(&["--dry-run", "build", "--docker-options", "--target prod"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("-t myapp --target prod -f"));
}

#[test]
fn test_name_falls_back_to_directory() {
    let project = TestProject::new();
    project.create_file("stackpack.toml", "");
    project.create_file("Dockerfile", common::SAMPLE_DOCKERFILE);
    let expected = project
        .path()
        .canonicalize()
        .unwrap()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .to_lowercase();

    let output = project.run(&["--dry-run", "build"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let tag = stackpack::core::project::normalize_name(&expected);
    assert!(stdout(&output).contains(&format!("build -t {tag}")));
}

#[test]
fn test_build_outside_project_fails() {
    let project = TestProject::new();

    let output = project.run(&["--dry-run", "build"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("stackpack.toml"));
}

#[test]
fn test_missing_dockerfile_fails() {
    let project = TestProject::new();
    project.create_file("stackpack.toml", "[project]\nname = \"myapp\"\n");

    let output = project.run(&["--dry-run", "build"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Dockerfile not found"));
}

#[test]
fn test_runtime_flag_selects_podman() {
    let project = TestProject::with_name("myapp");

    let output = project.run(&["--dry-run", "build", "--runtime", "podman"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains(&dry_run_line(&project, "podman", "myapp", "myapp", "")));
}

#[test]
fn test_runtime_from_global_config() {
    let project = TestProject::with_name("myapp");
    project.write_global_config("[build]\nruntime = \"podman\"\n");

    let output = project.run(&["--dry-run", "build"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("skipping command: podman build"));
}

#[test]
fn test_unknown_runtime_fails() {
    let project = TestProject::with_name("myapp");

    let output = project.run(&["--dry-run", "build", "--runtime", "buildah"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown container runtime 'buildah'"));
}

#[test]
fn test_malformed_global_config_fails() {
    let project = TestProject::with_name("myapp");
    project.write_global_config("[build\nruntime =");

    let output = project.run(&["--dry-run", "build"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to load global config"));
}

#[test]
fn test_verbose_dry_run_reports_command_once() {
    let project = TestProject::with_name("myapp");

    let output = project.run(&["-vv", "--dry-run", "build"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let combined = format!("{}{}", stdout(&output), stderr(&output));
    assert_eq!(combined.matches("Dry run - skipping command").count(), 1, "{combined}");
}

#[test]
fn test_quiet_dry_run_prints_nothing() {
    let project = TestProject::with_name("myapp");

    let output = project.run(&["--quiet", "--dry-run", "build"]);

    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
}

#[cfg(unix)]
mod with_fake_runtime {
    use super::common::{fake_runtime, stderr, stdout, TestProject};
    use tempfile::TempDir;

    #[test]
    fn test_build_runs_runtime_and_confirms() {
        let project = TestProject::with_name("myapp");
        project.create_file("src/app.txt", "hello");
        let bin = TempDir::new().unwrap();
        fake_runtime(bin.path(), "docker", 0);

        let output = project.run_with_path(
            &["build", "--docker-options", "--build-arg FOO=bar"],
            Some(bin.path()),
        );

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let out = stdout(&output);
        let context = project.context_dir("myapp");
        let expected_args = [
            "build".to_string(),
            "-t".to_string(),
            "myapp".to_string(),
            "--build-arg".to_string(),
            "FOO=bar".to_string(),
            "-f".to_string(),
            context.join("Dockerfile").display().to_string(),
            context.display().to_string(),
        ];
        let lines: Vec<&str> = out
            .lines()
            .filter_map(|l| l.strip_prefix("[Docker] arg:"))
            .collect();
        assert_eq!(lines, expected_args);
        assert!(out.contains("[Docker] fake build log"));
        assert!(out.contains("✓ Built docker image myapp"));

        assert!(context.join("Dockerfile").is_file());
        assert!(context.join("src/app.txt").is_file());
    }

    #[test]
    fn test_repeated_spaces_forward_empty_argument() {
        let project = TestProject::with_name("myapp");
        let bin = TempDir::new().unwrap();
        fake_runtime(bin.path(), "docker", 0);

        let output = project.run_with_path(
            &["build", "--docker-options", "--pull  --no-cache"],
            Some(bin.path()),
        );

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let out = stdout(&output);
        let lines: Vec<&str> = out
            .lines()
            .filter_map(|l| l.strip_prefix("[Docker] arg:"))
            .collect();
        assert_eq!(&lines[3..6], &["--pull", "", "--no-cache"]);
    }

    #[test]
    fn test_runtime_failure_exits_non_zero() {
        let project = TestProject::with_name("myapp");
        let bin = TempDir::new().unwrap();
        fake_runtime(bin.path(), "docker", 3);

        let output = project.run_with_path(&["build"], Some(bin.path()));

        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).contains("docker build failed with exit code 3"));
        assert!(!stdout(&output).contains("Built docker image"));
    }

    #[test]
    fn test_quiet_hides_runtime_output() {
        let project = TestProject::with_name("myapp");
        let bin = TempDir::new().unwrap();
        fake_runtime(bin.path(), "podman", 0);

        let output =
            project.run_with_path(&["-q", "build", "--runtime", "podman"], Some(bin.path()));

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(stdout(&output).is_empty());
    }

    #[test]
    fn test_verbose_traces_runtime_output() {
        let project = TestProject::with_name("myapp");
        let bin = TempDir::new().unwrap();
        fake_runtime(bin.path(), "docker", 0);

        let output = project.run_with_path(&["-vv", "build"], Some(bin.path()));

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(stdout(&output).contains("[Docker] fake build log"));
        let err = stderr(&output);
        assert!(
            err.lines()
                .any(|l| l.contains("stackpack::runtime") && l.contains("fake build log")),
            "stderr: {err}"
        );
    }

    #[test]
    fn test_default_verbosity_does_not_trace_runtime_output() {
        let project = TestProject::with_name("myapp");
        let bin = TempDir::new().unwrap();
        fake_runtime(bin.path(), "docker", 0);

        let output = project.run_with_path(&["build"], Some(bin.path()));

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(!stderr(&output).contains("fake build log"));
    }
}
