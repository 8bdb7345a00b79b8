//! Integration tests for tfscout.
//!
//! These tests cover the scanner on fixture files, the project resolver on
//! temporary directory trees, and the CLI end to end.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tfscout::{Config, ProjectDetector};

/// Get the path to the test fixtures directory.
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

mod scanner_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tfscout::{scan, scan_file, SourceType};

    #[test]
    fn test_scan_fixture_modules() {
        let result = scan_file(&fixtures_path().join("scan/main.tf")).unwrap();

        let modules: Vec<_> = result
            .modules
            .iter()
            .map(|m| (m.name.as_str(), m.source.as_str(), m.source_type, m.version.as_deref(), m.line))
            .collect();
        assert_eq!(
            modules,
            vec![
                ("vpc", "terraform-aws-modules/vpc/aws", SourceType::Registry, Some("5.1.0"), 26),
                ("app", "./modules/app", SourceType::Local, None, 35),
            ]
        );
    }

    #[test]
    fn test_scan_fixture_providers() {
        let result = scan_file(&fixtures_path().join("scan/main.tf")).unwrap();

        let providers: Vec<_> = result
            .providers
            .iter()
            .map(|p| (p.name.as_str(), p.source.as_str(), p.version.as_str()))
            .collect();
        assert_eq!(
            providers,
            vec![
                ("aws", "hashicorp/aws", "~> 5.0"),
                ("random", "hashicorp/random", "latest"),
                ("google", "hashicorp/google", "latest"),
            ]
        );
    }

    #[test]
    fn test_scan_fixture_resources() {
        let result = scan_file(&fixtures_path().join("scan/main.tf")).unwrap();

        let resources: Vec<_> = result
            .resources
            .iter()
            .map(|r| (r.address(), r.line))
            .collect();
        assert_eq!(
            resources,
            vec![
                ("aws_instance.web".to_string(), 41),
                ("aws_s3_bucket.logs".to_string(), 45),
            ]
        );
    }

    #[test]
    fn test_unclosed_block_keeps_later_declarations() {
        let result = scan_file(&fixtures_path().join("scan/broken.tf")).unwrap();

        assert_eq!(result.modules.len(), 1);
        assert_eq!(result.modules[0].source_type, SourceType::Git);
        assert_eq!(result.resources.len(), 1);
        assert_eq!(result.resources[0].line, 4);
    }

    #[test]
    fn test_scan_tolerates_arbitrary_text() {
        let inputs = [
            "",
            "}}}{{{",
            "module \"x\" {",
            "module \"é\" { source = \"./ü\" }\nresource \"a\" \"ö\" {}",
            "terraform { required_providers { aws = { source = \"x\"",
            "\"unterminated string { module \"y\" {}",
            "/* open comment module \"z\" {}",
            "provider \"aws\"\nprovider \"aws\"\n",
        ];
        for input in inputs {
            let result = scan(input);
            for resource in &result.resources {
                assert!(resource.line >= 1);
            }
            assert!(result.providers.iter().all(|p| !p.name.is_empty()));
        }
    }

    #[test]
    fn test_scan_missing_file_is_io_error() {
        let result = scan_file(&fixtures_path().join("scan/missing.tf"));
        assert!(matches!(result, Err(tfscout::TfScoutError::Io { .. })));
    }
}

mod project_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn test_no_indicators_resolves_to_file_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a").join("b");
        write(&dir.join("main.tf"), "resource \"null_resource\" \"x\" {}\n");

        let detector = ProjectDetector::new(&Config::default());
        let root = detector.resolve_project_root(&dir.join("main.tf")).unwrap();
        assert_eq!(root, dir);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("live").join("prod");
        write(&root.join(".terraform.lock.hcl"), "");
        write(&root.join("network").join("vpc").join("main.tf"), "");

        let detector = ProjectDetector::new(&Config::default());
        let first = detector
            .resolve_project_root(&root.join("network/vpc/main.tf"))
            .unwrap();
        let second = detector.resolve_project_root(&first).unwrap();
        assert_eq!(first, root);
        assert_eq!(second, first);
    }

    #[test]
    fn test_descriptor_combines_metadata() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("prod");
        write(
            &root.join("terraform.tfstate"),
            r#"{"version": 4, "terraform_version": "1.6.2", "resources": []}"#,
        );
        write(
            &root.join(".terraform/modules/modules.json"),
            r#"{"Modules":[{"Key":"","Source":"","Dir":"."},{"Key":"vpc","Source":"registry.terraform.io/terraform-aws-modules/vpc/aws","Version":"5.1.0","Dir":".terraform/modules/vpc"}]}"#,
        );
        write(
            &root.join("backend.tf"),
            "terraform {\n  required_version = \">= 1.5\"\n  backend \"azurerm\" {}\n}\n",
        );
        write(&root.join("main.tf"), "module \"vpc\" { source = \"terraform-aws-modules/vpc/aws\" }\n");

        let detector = ProjectDetector::new(&Config::default());
        let project = detector.detect(&root.join("main.tf")).unwrap();

        assert_eq!(project.root_path, root);
        assert_eq!(project.name, "prod");
        assert_eq!(project.terraform_version.as_deref(), Some("1.6.2"));
        assert_eq!(project.backend.as_deref(), Some("azurerm"));
        assert_eq!(project.modules.len(), 2);
        assert_eq!(project.modules[1].version.as_deref(), Some("5.1.0"));
        assert!(project.initialized());
        assert_eq!(
            project.tf_files(),
            vec![root.join("backend.tf"), root.join("main.tf")]
        );
        assert_eq!(project.primary_file(), Some(root.join("backend.tf")));

        let info = project.info();
        assert_eq!(info.module_count, 2);
        assert!(info.initialized);
    }

    #[test]
    fn test_get_or_create_identity_until_refresh() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("stack");
        write(&root.join("terragrunt.hcl"), "");
        write(&root.join("main.tf"), "");

        let detector = ProjectDetector::new(&Config::default());
        let first = detector.get_or_create_project(&root).unwrap();
        let second = detector.get_or_create_project(&root).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        detector.refresh_all(&[tmp.path()]);
        let third = detector.get_or_create_project(&root).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
    }

    #[test]
    fn test_get_or_create_missing_root() {
        let tmp = TempDir::new().unwrap();
        let detector = ProjectDetector::new(&Config::default());
        let result = detector.get_or_create_project(&tmp.path().join("gone"));
        assert!(matches!(
            result,
            Err(tfscout::TfScoutError::DirectoryNotFound { .. })
        ));
        assert!(detector.projects().is_empty());
    }

    #[test]
    fn test_refresh_all_walk_order_and_pruning() {
        let workspace = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();

        let dev = workspace.path().join("live").join("dev");
        let prod = workspace.path().join("live").join("prod");
        write(&dev.join("main.tf"), "terraform {\n  backend \"local\" {}\n}\n");
        write(&prod.join("main.tf"), "");
        write(&prod.join("terraform.tfstate"), "{}");
        // installed module copies are never projects
        write(
            &prod.join(".terraform/modules/vpc/main.tf"),
            "terraform {\n  backend \"s3\" {}\n}\n",
        );
        // reusable modules without indicators are not roots
        write(
            &workspace.path().join("modules/vpc/main.tf"),
            "resource \"aws_vpc\" \"this\" {}\n",
        );
        let solo = other.path().join("solo");
        write(&solo.join("main.tf"), "");
        write(&solo.join(".terraform.lock.hcl"), "");

        let detector = ProjectDetector::new(&Config::default());
        let projects = detector.refresh_all(&[workspace.path(), other.path()]);

        let roots: Vec<_> = projects.iter().map(|p| p.root_path.clone()).collect();
        assert_eq!(roots, vec![dev.clone(), prod.clone(), solo.clone()]);

        let cached: Vec<_> = detector.projects().iter().map(|p| p.root_path.clone()).collect();
        assert_eq!(cached, roots);

        // cached roots answer detection for files beneath them
        let found = detector.detect(&prod.join("outputs.tf")).unwrap();
        assert!(Arc::ptr_eq(&found, &projects[1]));
    }

    #[test]
    fn test_configured_root_modules_from_yaml() {
        let tmp = TempDir::new().unwrap();
        let live = tmp.path().join("live");
        let nested = live.join("app");
        write(&nested.join("terraform.tfstate"), "{}");
        write(&nested.join("main.tf"), "");

        let yaml = format!(
            "project:\n  root_modules:\n    - {}\n",
            live.display()
        );
        let config = Config::from_yaml(&yaml).unwrap();
        let detector = ProjectDetector::new(&config);

        let root = detector.resolve_project_root(&nested.join("main.tf")).unwrap();
        assert_eq!(root, live);
    }

    #[test]
    fn test_excluded_roots_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let stack = tmp.path().join("stack");
        let shared = stack.join("shared");
        write(&stack.join("terraform.tfstate"), "{}");
        write(&shared.join(".terraform.lock.hcl"), "");
        write(&shared.join("main.tf"), "");

        let config = Config::from_yaml("project:\n  exclude_root_modules:\n    - /shared\n").unwrap();
        let detector = ProjectDetector::new(&config);
        let root = detector.resolve_project_root(&shared.join("main.tf")).unwrap();
        assert_eq!(root, stack);
    }

    #[test]
    fn test_relative_path_is_rejected() {
        let detector = ProjectDetector::new(&Config::default());
        let result = detector.resolve_project_root(Path::new("live/main.tf"));
        assert!(matches!(result, Err(tfscout::TfScoutError::InvalidPath { .. })));
    }

    #[test]
    fn test_detector_is_shareable_across_threads() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("prod");
        write(&root.join("terraform.tfstate"), "{}");
        write(&root.join("main.tf"), "");

        let detector = Arc::new(ProjectDetector::new(&Config::default()));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let detector = Arc::clone(&detector);
                let file = root.join("main.tf");
                std::thread::spawn(move || detector.detect(&file).unwrap())
            })
            .collect();
        let projects: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(projects.iter().all(|p| Arc::ptr_eq(p, &projects[0])));
        assert_eq!(detector.projects().len(), 1);
    }
}

mod cli_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use assert_cmd::Command;
    use predicates::prelude::*;

    /// A `tfscout` command running in `dir` with a plain-output config.
    fn tfscout(dir: &Path) -> Command {
        let config = dir.join("test-config.yaml");
        fs::write(&config, "output:\n  colored: false\n").unwrap();
        let mut cmd = Command::cargo_bin("tfscout").unwrap();
        cmd.current_dir(dir)
            .env("TFSCOUT_CONFIG", &config)
            .env_remove("RUST_LOG");
        cmd
    }

    #[test]
    fn test_scan_text() {
        let tmp = TempDir::new().unwrap();
        tfscout(tmp.path())
            .arg("scan")
            .arg(fixtures_path().join("scan/main.tf"))
            .assert()
            .success()
            .stdout(predicate::str::contains("terraform-aws-modules/vpc/aws"))
            .stdout(predicate::str::contains("aws_instance.web"))
            .stdout(predicate::str::contains("1 files | 2 modules | 3 providers | 2 resources"));
    }

    #[test]
    fn test_scan_json_sections() {
        let tmp = TempDir::new().unwrap();
        let output = tfscout(tmp.path())
            .arg("scan")
            .arg(fixtures_path().join("scan/main.tf"))
            .args(["--format", "json", "--providers"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(parsed["summary"]["files"], 1);
        let file = &parsed["files"][0];
        assert!(file.get("modules").is_none());
        assert_eq!(file["providers"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_scan_missing_file() {
        let tmp = TempDir::new().unwrap();
        tfscout(tmp.path())
            .args(["scan", "missing.tf"])
            .assert()
            .code(14)
            .stderr(predicate::str::contains("missing.tf"));

        tfscout(tmp.path())
            .arg("scan")
            .arg(fixtures_path().join("scan/broken.tf"))
            .arg("missing.tf")
            .arg("--continue-on-error")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("null_resource.after"));
    }

    #[test]
    fn test_root_command() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("live");
        write(&root.join("terraform.tfstate"), "{}");
        write(&root.join("network").join("main.tf"), "");

        tfscout(tmp.path())
            .args(["root", "live/network/main.tf"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                fs::canonicalize(&root).unwrap().display().to_string(),
            ));
    }

    #[test]
    fn test_status_json() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("prod");
        write(&root.join("terraform.tfstate"), r#"{"terraform_version": "1.7.0"}"#);
        write(&root.join("main.tf"), "terraform {\n  backend \"gcs\" {}\n}\n");

        let output = tfscout(tmp.path())
            .arg("status")
            .arg(root.join("main.tf"))
            .args(["--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(parsed["name"], "prod");
        assert_eq!(parsed["terraform_version"], "1.7.0");
        assert_eq!(parsed["backend"], "gcs");
        assert_eq!(parsed["initialized"], false);
    }

    #[test]
    fn test_projects_json() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("ws/a/main.tf"), "terraform {\n  backend \"local\" {}\n}\n");
        write(&tmp.path().join("ws/b/main.tf"), "");
        write(&tmp.path().join("ws/b/terragrunt.hcl"), "");
        write(&tmp.path().join("ws/lib/main.tf"), "variable \"x\" {}\n");

        let output = tfscout(tmp.path())
            .args(["projects", "ws", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(parsed["total"], 2);
        assert_eq!(parsed["projects"][0]["name"], "a");
        assert_eq!(parsed["projects"][1]["name"], "b");
    }

    #[test]
    fn test_init_and_validate() {
        let tmp = TempDir::new().unwrap();
        tfscout(tmp.path())
            .arg("init")
            .assert()
            .success()
            .stdout(predicate::str::contains("tfscout.yaml"));
        assert!(tmp.path().join("tfscout.yaml").exists());

        tfscout(tmp.path()).arg("init").assert().failure();

        tfscout(tmp.path())
            .args(["validate", "tfscout.yaml"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration is valid"));
    }

    #[test]
    fn test_validate_rejects_relative_root_module() {
        let tmp = TempDir::new().unwrap();
        write(
            &tmp.path().join("bad.yaml"),
            "project:\n  root_modules:\n    - relative/dir\n",
        );

        tfscout(tmp.path())
            .args(["validate", "bad.yaml"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Configuration error"));
    }
}
