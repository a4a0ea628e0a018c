//! Integration tests for the scaffolding workflow
//!
//! These tests drive the complete workflow against a fake process runner and
//! check the files left on disk and the commands issued.

mod common;

use common::{is_requirements_install, is_venv_creation, FakeRunner, Sandbox};
use pyseed_projects::prompt::{Prompter, ScriptedInput};
use pyseed_projects::runner::Invocation;
use pyseed_projects::venv::EnvironmentState;
use pyseed_projects::{
    Error, FeatureFlags, ScaffoldConfig, ScaffoldRequest, ScaffoldTemplates, Scaffolder,
};

fn all_features() -> FeatureFlags {
    FeatureFlags {
        jupyter: true,
        pre_commit: true,
        requirements: true,
        git: true,
    }
}

fn no_features() -> FeatureFlags {
    FeatureFlags {
        jupyter: false,
        pre_commit: false,
        requirements: false,
        git: false,
    }
}

fn request(sandbox: &Sandbox, name: &str, flags: FeatureFlags) -> ScaffoldRequest {
    ScaffoldRequest {
        name: name.to_string(),
        python: "python3".to_string(),
        flags,
        working_dir: sandbox.work.clone(),
    }
}

fn position(calls: &[Invocation], pred: impl Fn(&Invocation) -> bool) -> usize {
    calls
        .iter()
        .position(|c| pred(c))
        .unwrap_or_else(|| panic!("no matching call in {:?}", calls))
}

async fn scaffold(
    runner: &FakeRunner,
    config: &ScaffoldConfig,
    request: &ScaffoldRequest,
) -> pyseed_projects::Result<pyseed_projects::ScaffoldReport> {
    let templates = ScaffoldTemplates::embedded();
    Scaffolder::new(runner, config, &templates).run(request).await
}

#[tokio::test]
async fn test_full_scaffold_creates_all_artifacts() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new();
    let config = sandbox.config();
    let templates = ScaffoldTemplates::embedded();

    let report = scaffold(&runner, &config, &request(&sandbox, "demo", all_features()))
        .await
        .unwrap();

    let project = sandbox.work.join("demo");
    assert!(project.is_dir());
    assert!(project.join("src").is_dir());
    assert!(project.join("requirements.txt").is_file());
    assert!(project.join("workbook.ipynb").is_file());
    assert_eq!(
        std::fs::read_to_string(project.join("venv.sh")).unwrap(),
        "source ./venv/bin/activate\n"
    );
    assert!(std::fs::symlink_metadata(project.join("venv"))
        .unwrap()
        .file_type()
        .is_symlink());
    assert_eq!(
        std::fs::read_link(project.join("venv")).unwrap(),
        sandbox.venvs.join("demo").as_std_path()
    );

    assert_eq!(
        std::fs::read_to_string(project.join(".pre-commit-config.yaml")).unwrap(),
        format!("{}{}", templates.pre_commit_config, templates.pre_commit_notebook)
    );

    assert_eq!(report.environment, EnvironmentState::Created);
    assert!(report.tree_alias);
    assert_eq!(report.hooks_registered, Some(true));
    assert!(report.notebook);
    assert_eq!(report.requirements.attempts, 1);
    assert_eq!(report.requirements.editor_launches, 1);
}

#[tokio::test]
async fn test_steps_run_in_order() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new();

    scaffold(&runner, &sandbox.config(), &request(&sandbox, "demo", all_features()))
        .await
        .unwrap();

    let calls = runner.log.all();
    let venv = position(&calls, is_venv_creation);
    let upgrade = position(&calls, |c| c.has_arg("--upgrade"));
    let editor = position(&calls, |c| c.program == "code");
    let install = position(&calls, is_requirements_install);
    let git_init = position(&calls, |c| c.program == "git" && c.has_arg("init"));
    let alias = position(&calls, |c| c.program == "git" && c.has_arg("alias.tree"));
    let hooks = position(&calls, |c| c.has_arg("pre_commit"));
    let kernel = position(&calls, |c| c.has_arg("kernel"));
    let pairing = position(&calls, |c| c.has_arg("jupytext") && c.has_arg("--set-formats"));

    let order = [venv, upgrade, editor, install, git_init, alias, hooks, kernel, pairing];
    assert!(
        order.windows(2).all(|w| w[0] < w[1]),
        "unexpected order: {:?}",
        calls
    );
}

#[tokio::test]
async fn test_rerun_reuses_existing_environment() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new();
    let env_dir = sandbox.venvs.join("demo");
    std::fs::create_dir_all(env_dir.join("bin")).unwrap();

    let report = scaffold(&runner, &sandbox.config(), &request(&sandbox, "demo", no_features()))
        .await
        .unwrap();

    assert_eq!(report.environment, EnvironmentState::Reused);
    assert_eq!(runner.log.count(is_venv_creation), 0);
    assert_eq!(
        std::fs::read_link(sandbox.work.join("demo").join("venv")).unwrap(),
        env_dir.as_std_path()
    );
    assert!(sandbox.work.join("demo").join("venv").join("bin").is_dir());
}

#[tokio::test]
async fn test_requirements_retry_until_success() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new().with_install_codes(&[1, 1, 0]);
    let flags = FeatureFlags {
        requirements: true,
        ..no_features()
    };

    let report = scaffold(&runner, &sandbox.config(), &request(&sandbox, "demo", flags))
        .await
        .unwrap();

    assert_eq!(runner.log.count(is_requirements_install), 3);
    assert_eq!(runner.log.calls_to("code").len(), 3);
    assert_eq!(report.requirements.attempts, 3);
    assert_eq!(report.requirements.editor_launches, 3);

    let install = runner
        .log
        .calls_to("pip")
        .into_iter()
        .find(is_requirements_install)
        .unwrap();
    assert_eq!(install.args, vec!["install", "-r", "requirements.txt"]);
    assert_eq!(install.cwd.as_deref(), Some(sandbox.work.join("demo").as_path()));
}

#[tokio::test]
async fn test_requirements_attempt_cap() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new().with_install_codes(&[1, 1, 1, 1]);
    let mut config = sandbox.config();
    config.requirements.max_attempts = Some(2);
    let flags = FeatureFlags {
        requirements: true,
        ..no_features()
    };

    let err = scaffold(&runner, &config, &request(&sandbox, "demo", flags))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InstallAttemptsExhausted { attempts: 2 }));
    assert_eq!(runner.log.count(is_requirements_install), 2);
    // No rollback: the directory and link stay for manual cleanup
    assert!(sandbox.work.join("demo").is_dir());
}

#[tokio::test]
async fn test_non_blocking_installs_once_without_editor() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new();

    let report = scaffold(&runner, &sandbox.config(), &request(&sandbox, "demo", no_features()))
        .await
        .unwrap();

    assert_eq!(runner.log.count(is_requirements_install), 1);
    runner.log.assert_not_called("code");
    runner.log.assert_not_called("nano");
    assert_eq!(report.requirements.editor_launches, 0);
    assert!(sandbox.work.join("demo").join("requirements.txt").is_file());
}

#[tokio::test]
async fn test_non_blocking_failure_is_fatal() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new().with_install_codes(&[1]);

    let err = scaffold(&runner, &sandbox.config(), &request(&sandbox, "demo", no_features()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::CommandFailed { .. }));
    assert_eq!(runner.log.count(is_requirements_install), 1);
    assert!(!sandbox.work.join("demo").join("venv.sh").exists());
}

#[tokio::test]
async fn test_editor_falls_back_when_preferred_missing() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new().with_missing(&["code"]);
    let flags = FeatureFlags {
        requirements: true,
        ..no_features()
    };

    scaffold(&runner, &sandbox.config(), &request(&sandbox, "demo", flags))
        .await
        .unwrap();

    runner.log.assert_called("nano");
    runner.log.assert_not_called("code");
}

#[tokio::test]
async fn test_failing_fallback_editor_is_not_fatal() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new()
        .with_missing(&["code"])
        .failing_when(|c| c.program == "nano", 1);
    let flags = FeatureFlags {
        requirements: true,
        ..no_features()
    };

    let report = scaffold(&runner, &sandbox.config(), &request(&sandbox, "demo", flags))
        .await
        .unwrap();

    assert_eq!(report.requirements.editor_launches, 1);
    assert_eq!(runner.log.count(is_requirements_install), 1);
}

#[tokio::test]
async fn test_failing_preferred_editor_is_fatal() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new().failing_when(|c| c.program == "code", 1);
    let flags = FeatureFlags {
        requirements: true,
        ..no_features()
    };

    let err = scaffold(&runner, &sandbox.config(), &request(&sandbox, "demo", flags))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::EditorFailed { .. }));
    assert_eq!(runner.log.count(is_requirements_install), 0);
}

#[tokio::test]
async fn test_no_editor_leaves_manifest_unedited() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new().with_missing(&["code", "nano"]);
    let flags = FeatureFlags {
        requirements: true,
        ..no_features()
    };

    let report = scaffold(&runner, &sandbox.config(), &request(&sandbox, "demo", flags))
        .await
        .unwrap();

    assert_eq!(report.requirements.editor_launches, 0);
    assert_eq!(report.requirements.attempts, 1);
    assert_eq!(
        std::fs::read_to_string(sandbox.work.join("demo").join("requirements.txt")).unwrap(),
        ""
    );
}

#[tokio::test]
async fn test_gitignore_is_fixed_regardless_of_features() {
    let sandbox = Sandbox::new();
    let expected = "venv\n.gitignore\n.pre-commit-config.yaml\n.cache\n";

    let variants = [
        ("plain", FeatureFlags { git: true, ..no_features() }),
        ("hooks", FeatureFlags { git: true, pre_commit: true, ..no_features() }),
        ("everything", all_features()),
    ];

    for (name, flags) in variants {
        let runner = FakeRunner::new();
        scaffold(&runner, &sandbox.config(), &request(&sandbox, name, flags))
            .await
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(sandbox.work.join(name).join(".gitignore")).unwrap(),
            expected,
            "{}",
            name
        );
    }
}

#[tokio::test]
async fn test_hooks_without_notebook_have_base_set_only() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new();
    let flags = FeatureFlags {
        git: true,
        pre_commit: true,
        ..no_features()
    };

    scaffold(&runner, &sandbox.config(), &request(&sandbox, "demo", flags))
        .await
        .unwrap();

    let written =
        std::fs::read_to_string(sandbox.work.join("demo").join(".pre-commit-config.yaml")).unwrap();
    assert_eq!(written, ScaffoldTemplates::embedded().pre_commit_config);
    assert!(!written.contains("jupytext"));
}

#[tokio::test]
async fn test_without_git_no_repository_or_ignore_file() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new();

    let report = scaffold(&runner, &sandbox.config(), &request(&sandbox, "demo", no_features()))
        .await
        .unwrap();

    runner.log.assert_not_called("git");
    assert!(!report.tree_alias);
    assert!(!sandbox.work.join("demo").join(".gitignore").exists());
    assert!(!sandbox.work.join("demo").join(".pre-commit-config.yaml").exists());
    assert!(!sandbox.work.join("demo").join("workbook.ipynb").exists());
}

#[tokio::test]
async fn test_tree_alias_can_be_disabled() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new();
    let mut config = sandbox.config();
    config.git.tree_alias = false;
    let flags = FeatureFlags {
        git: true,
        ..no_features()
    };

    let report = scaffold(&runner, &config, &request(&sandbox, "demo", flags))
        .await
        .unwrap();

    assert!(!report.tree_alias);
    assert_eq!(runner.log.count(|c| c.has_arg("alias.tree")), 0);
    runner.log.assert_called("git");
}

#[tokio::test]
async fn test_missing_interpreter_fails_before_side_effects() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new().with_missing(&["python3"]);

    let err = scaffold(&runner, &sandbox.config(), &request(&sandbox, "demo", no_features()))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(!sandbox.work.join("demo").exists());
    assert!(runner.log.all().is_empty());
}

#[tokio::test]
async fn test_missing_git_fails_before_side_effects() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new().with_missing(&["git"]);
    let flags = FeatureFlags {
        git: true,
        ..no_features()
    };

    let err = scaffold(&runner, &sandbox.config(), &request(&sandbox, "demo", flags))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(!sandbox.work.join("demo").exists());
}

#[tokio::test]
async fn test_existing_project_directory_aborts() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new();
    std::fs::create_dir_all(sandbox.work.join("demo")).unwrap();

    let err = scaffold(&runner, &sandbox.config(), &request(&sandbox, "demo", no_features()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ProjectExists { .. }));
    assert!(runner.log.all().is_empty());
    assert!(!sandbox.venvs.join("demo").exists());
}

#[tokio::test]
async fn test_resolved_request_drives_scaffold() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new();
    let config = sandbox.config();
    let mut prompter = Prompter::new(ScriptedInput::new(["what?", "yes", "no"]));
    let args = ["notebooks", "python3.11", "--no-requirements", "nogit"];

    let request =
        ScaffoldRequest::resolve(&args, None, &config, &mut prompter, &sandbox.work).unwrap();
    assert_eq!(request.python, "python3.11");
    assert!(request.flags.jupyter);
    assert!(!request.flags.pre_commit);

    let report = scaffold(&runner, &config, &request).await.unwrap();

    assert!(report.notebook);
    assert_eq!(report.hooks_registered, None);
    assert_eq!(runner.log.calls_to("python3.11").len(), 1);
    assert!(sandbox.work.join("notebooks").join("workbook.ipynb").is_file());
}

#[tokio::test]
async fn test_relative_venv_home_links_to_created_environment() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new();
    let mut config = sandbox.config();
    config.venv_home = "rel_envs".to_string();

    scaffold(&runner, &config, &request(&sandbox, "demo", no_features()))
        .await
        .unwrap();

    let env_dir = sandbox.work.join("rel_envs").join("demo");
    let link = sandbox.work.join("demo").join("venv");
    assert_eq!(std::fs::read_link(&link).unwrap(), env_dir.as_std_path());
    assert!(link.join("bin").is_dir(), "venv link does not resolve");

    let creation = runner.log.all().into_iter().find(is_venv_creation).unwrap();
    assert_eq!(creation.args.last().map(String::as_str), Some(env_dir.as_str()));
}

// ─── Fatal notebook and hook steps ───────────────────────────────────────────

#[tokio::test]
async fn test_kernel_registration_failure_aborts() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new().failing_when(|c| c.program.ends_with("ipython"), 1);
    let flags = FeatureFlags {
        jupyter: true,
        ..no_features()
    };

    let err = scaffold(&runner, &sandbox.config(), &request(&sandbox, "demo", flags))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::CommandFailed { .. }));
    assert!(!sandbox.work.join("demo").join("workbook.ipynb").exists());
    assert_eq!(runner.log.count(|c| c.has_arg("jupytext") && c.has_arg("--set-formats")), 0);
}

#[tokio::test]
async fn test_notebook_pairing_failure_aborts() {
    let sandbox = Sandbox::new();
    let runner =
        FakeRunner::new().failing_when(|c| c.has_arg("jupytext") && c.has_arg("--set-formats"), 2);
    let flags = FeatureFlags {
        jupyter: true,
        ..no_features()
    };

    let err = scaffold(&runner, &sandbox.config(), &request(&sandbox, "demo", flags))
        .await
        .unwrap_err();

    match err {
        Error::CommandFailed { command, code } => {
            assert!(command.contains("--set-formats"));
            assert_eq!(code, "2");
        }
        other => panic!("unexpected error: {}", other),
    }
    // No rollback: the notebook written before pairing stays
    assert!(sandbox.work.join("demo").join("workbook.ipynb").is_file());
}

#[tokio::test]
async fn test_pre_commit_install_failure_aborts() {
    let sandbox = Sandbox::new();
    let runner = FakeRunner::new()
        .failing_when(|c| c.program.ends_with("pip") && c.has_arg("pre-commit"), 1);

    let err = scaffold(&runner, &sandbox.config(), &request(&sandbox, "demo", all_features()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::CommandFailed { .. }));
    assert!(!sandbox.work.join("demo").join(".pre-commit-config.yaml").exists());
    assert_eq!(runner.log.count(|c| c.has_arg("pre_commit")), 0);
    assert_eq!(runner.log.count(|c| c.has_arg("kernel")), 0);
}
