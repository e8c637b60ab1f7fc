// src/system/shell.rs

use crate::{
    constants::{
        DEFAULT_PROBE_TIMEOUT, DIRECTORY_INIT_FILENAME, ENV_COMMAND, SHELL_PATH_PREFERENCE,
        SOURCE_FLAGS,
    },
    core::{
        composer,
        env_cache::EnvironmentCache,
        env_parser,
        locator::{LocatorError, ShellLocator},
        platform::PlatformPolicy,
    },
    models::{EnvLookup, EnvSource, ShellEnvironment, process_env_lookup},
    system::{
        executor::{self, ExecutionError},
        preferences::PreferenceStore,
        probe::{FileProbe, SystemProbe},
    },
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Child, Stdio};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by [`ShellExecutable`].
#[derive(Error, Debug)]
pub enum ShellError {
    /// No usable shell executable.
    #[error(transparent)]
    Locator(#[from] LocatorError),
    /// The child process could not be started or waited on.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Owns the resolved shell path and the cached shell environment, and starts
/// processes through a login shell.
///
/// Construct one at startup and share it (by reference or `Arc`) with
/// everything that launches commands. Both caches are invalidated together
/// by [`ShellExecutable::set_override`] and [`ShellExecutable::invalidate`].
pub struct ShellExecutable {
    policy: PlatformPolicy,
    locator: ShellLocator,
    environment: EnvironmentCache,
    preferences: Arc<dyn PreferenceStore>,
    probe: Arc<dyn FileProbe>,
    probe_timeout: Duration,
}

impl std::fmt::Debug for ShellExecutable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellExecutable")
            .field("policy", &self.policy)
            .field("locator", &self.locator)
            .field("environment", &self.environment)
            .field("probe_timeout", &self.probe_timeout)
            .finish_non_exhaustive()
    }
}

/// Configures a [`ShellExecutable`]. Everything but the preference store has
/// a system default.
pub struct ShellExecutableBuilder {
    preferences: Arc<dyn PreferenceStore>,
    policy: PlatformPolicy,
    probe: Arc<dyn FileProbe>,
    env_lookup: EnvLookup,
    probe_timeout: Duration,
}

impl std::fmt::Debug for ShellExecutableBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellExecutableBuilder")
            .field("policy", &self.policy)
            .field("probe_timeout", &self.probe_timeout)
            .finish_non_exhaustive()
    }
}

impl ShellExecutableBuilder {
    /// Platform rules to search and launch with.
    pub fn policy(mut self, policy: PlatformPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Filesystem access used while locating the shell.
    pub fn probe(mut self, probe: Arc<dyn FileProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Variable lookup used to expand candidate location templates.
    pub fn env_lookup(mut self, lookup: EnvLookup) -> Self {
        self.env_lookup = lookup;
        self
    }

    /// Upper bound on each environment probe.
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Creates the [`ShellExecutable`] with empty caches.
    pub fn build(self) -> ShellExecutable {
        ShellExecutable {
            policy: self.policy,
            locator: ShellLocator::new(
                self.policy,
                self.probe.clone(),
                self.preferences.clone(),
                self.env_lookup,
            ),
            environment: EnvironmentCache::new(),
            preferences: self.preferences,
            probe: self.probe,
            probe_timeout: self.probe_timeout,
        }
    }
}

impl ShellExecutable {
    /// Starts a builder with the current platform, the real filesystem and
    /// the process environment.
    pub fn builder(preferences: Arc<dyn PreferenceStore>) -> ShellExecutableBuilder {
        ShellExecutableBuilder {
            preferences,
            policy: PlatformPolicy::current(),
            probe: Arc::new(SystemProbe),
            env_lookup: process_env_lookup(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// A [`ShellExecutable`] with every system default.
    pub fn new(preferences: Arc<dyn PreferenceStore>) -> Self {
        Self::builder(preferences).build()
    }

    /// The platform rules in effect.
    pub fn policy(&self) -> PlatformPolicy {
        self.policy
    }

    /// Path of the shell executable, located on first use.
    ///
    /// # Errors
    /// [`LocatorError::NotFound`] if neither the preference nor the search
    /// turned up an executable.
    pub fn resolve(&self) -> Result<PathBuf, ShellError> {
        Ok(self.locator.resolve()?)
    }

    /// The raw override stored in preferences, if any.
    pub fn override_path(&self) -> Option<String> {
        self.preferences.get(SHELL_PATH_PREFERENCE)
    }

    /// Stores (or with `None`, removes) the shell override and drops both the
    /// cached path and the cached environment. A failed flush is logged; the
    /// in-memory change still applies.
    pub fn set_override(&self, path: Option<&Path>) {
        match path {
            Some(path) => self
                .preferences
                .set(SHELL_PATH_PREFERENCE, &path.to_string_lossy()),
            None => self.preferences.remove(SHELL_PATH_PREFERENCE),
        }
        if let Err(e) = self.preferences.flush() {
            log::error!("Saving preferences failed: {}", e);
        }
        self.invalidate();
    }

    /// Drops the cached shell path and environment together.
    pub fn invalidate(&self) {
        self.locator.invalidate();
        self.environment.invalidate();
    }

    /// The filtered environment of a fresh login shell, computed once.
    ///
    /// Never fails: if the shell can't be found or `env` can't be run, the
    /// error is logged and an empty map is cached.
    pub fn environment(&self) -> ShellEnvironment {
        self.environment.get_or_compute(|| match self.probe_environment() {
            Ok(env) => env,
            Err(e) => {
                log::error!("Get shell environment failed: {}", e);
                ShellEnvironment::new()
            }
        })
    }

    /// Like [`Self::environment`], but when `dir` contains `.rvmrc` (and the
    /// platform supports it) that file is sourced first. Such snapshots are
    /// directory specific and are never cached.
    pub fn environment_for_directory(&self, dir: Option<&Path>) -> ShellEnvironment {
        if let Some(dir) = dir.filter(|_| self.policy.supports_directory_sourcing()) {
            if self.probe.is_file(&dir.join(DIRECTORY_INIT_FILENAME)) {
                match self.probe_directory_environment(dir) {
                    Ok(Some(env)) => return env,
                    Ok(None) => log::debug!(
                        "Sourcing {} in '{}' produced no environment; using the shell default.",
                        DIRECTORY_INIT_FILENAME,
                        dir.display()
                    ),
                    Err(e) => log::error!("Get shell environment failed: {}", e),
                }
            }
        }
        self.environment()
    }

    /// Wraps `command` in a login-shell invocation.
    ///
    /// Returned unchanged when called from the thread that is currently
    /// resolving the shell, so processes started during resolution don't
    /// recurse into it.
    pub fn to_shell_command<S: AsRef<str>>(&self, command: &[S]) -> Result<Vec<String>, ShellError> {
        if self.locator.is_resolving_on_current_thread() {
            return Ok(command.iter().map(|s| s.as_ref().to_string()).collect());
        }
        let shell = self.locator.resolve()?;
        Ok(composer::wrap_in_login_shell(&shell, command))
    }

    /// [`Self::to_shell_command`] for a command name followed by arguments.
    pub fn to_shell_command_with_args<S: AsRef<str>>(
        &self,
        command: &str,
        arguments: &[S],
    ) -> Result<Vec<String>, ShellError> {
        self.to_shell_command(&prepend(command, arguments))
    }

    /// Starts `command` through the login shell, merging `environment` (when
    /// non-empty) into the inherited environment.
    pub fn run<S: AsRef<str>>(
        &self,
        command: &[S],
        working_dir: Option<&Path>,
        environment: Option<&HashMap<String, String>>,
    ) -> Result<Child, ShellError> {
        self.launch(command, working_dir, &EnvSource::merge(environment))
    }

    /// Starts `command` through the login shell with exactly the `KEY=VALUE`
    /// entries in `envp` as its environment.
    pub fn run_with_envp<S: AsRef<str>>(
        &self,
        command: &[S],
        working_dir: Option<&Path>,
        envp: &[String],
    ) -> Result<Child, ShellError> {
        self.launch(command, working_dir, &EnvSource::Replace(envp.to_vec()))
    }

    /// [`Self::run`] for a command name followed by arguments.
    pub fn run_command<S: AsRef<str>>(
        &self,
        command: &str,
        working_dir: Option<&Path>,
        environment: Option<&HashMap<String, String>>,
        arguments: &[S],
    ) -> Result<Child, ShellError> {
        self.run(&prepend(command, arguments), working_dir, environment)
    }

    /// [`Self::run`] for an executable path followed by arguments.
    pub fn run_executable<S: AsRef<str>>(
        &self,
        executable: &Path,
        working_dir: Option<&Path>,
        environment: Option<&HashMap<String, String>>,
        arguments: &[S],
    ) -> Result<Child, ShellError> {
        self.run_command(
            &executable.to_string_lossy(),
            working_dir,
            environment,
            arguments,
        )
    }

    /// Starts `command` through the login shell with the caller's stdin
    /// attached, for interactive use. Stdout and stderr are still piped.
    pub fn run_attached<S: AsRef<str>>(
        &self,
        command: &[S],
        working_dir: Option<&Path>,
        env: &EnvSource,
    ) -> Result<Child, ShellError> {
        let argv = self.to_shell_command(command)?;
        Ok(executor::spawn_process(
            &argv,
            working_dir,
            env,
            Stdio::inherit(),
        )?)
    }

    fn launch<S: AsRef<str>>(
        &self,
        command: &[S],
        working_dir: Option<&Path>,
        env: &EnvSource,
    ) -> Result<Child, ShellError> {
        let argv = self.to_shell_command(command)?;
        Ok(executor::spawn_process(
            &argv,
            working_dir,
            env,
            Stdio::piped(),
        )?)
    }

    /// Runs `env` through the login shell. A non-zero exit is a failure even
    /// if something was printed.
    fn probe_environment(&self) -> Result<ShellEnvironment, ShellError> {
        let argv = self.to_shell_command(&[ENV_COMMAND])?;
        let stdout =
            executor::capture_output(&argv, None, self.probe_timeout)?.into_success(&argv)?;
        Ok(env_parser::parse(&stdout))
    }

    /// Runs `source .rvmrc && env` in `dir`. `Ok(None)` means the shell ran
    /// but exited non-zero or printed nothing.
    fn probe_directory_environment(&self, dir: &Path) -> Result<Option<ShellEnvironment>, ShellError> {
        let shell = self.locator.resolve()?;
        let argv = vec![
            shell.to_string_lossy().into_owned(),
            SOURCE_FLAGS.to_string(),
            format!("source {} && {}", DIRECTORY_INIT_FILENAME, ENV_COMMAND),
        ];
        log::debug!("Sourcing {} in '{}'", DIRECTORY_INIT_FILENAME, dir.display());

        let output = executor::capture_output(&argv, Some(dir), self.probe_timeout)?;
        if !output.status.success() || output.stdout.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(env_parser::parse(&output.stdout)))
    }
}

fn prepend<S: AsRef<str>>(command: &str, arguments: &[S]) -> Vec<String> {
    std::iter::once(command.to_string())
        .chain(arguments.iter().map(|s| s.as_ref().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::{preferences::MemoryPreferenceStore, probe::testing::FakeProbe};
    use std::sync::{Mutex, OnceLock};

    fn build(probe: FakeProbe, prefs: Arc<MemoryPreferenceStore>) -> ShellExecutable {
        ShellExecutable::builder(prefs)
            .policy(PlatformPolicy::Posix)
            .probe(Arc::new(probe))
            .env_lookup(Arc::new(|_: &str| None))
            .build()
    }

    fn prefs_with_override(path: &str) -> Arc<MemoryPreferenceStore> {
        let prefs = Arc::new(MemoryPreferenceStore::new());
        prefs.set(SHELL_PATH_PREFERENCE, path);
        prefs
    }

    #[test]
    fn test_to_shell_command_wraps_and_escapes() {
        let shell = build(
            FakeProbe::default().with_executable("/opt/bin/bash"),
            prefs_with_override("/opt/bin/bash"),
        );

        let argv = shell
            .to_shell_command(&["echo", r#"it's "ok""#])
            .unwrap();

        assert_eq!(
            argv,
            vec!["/opt/bin/bash", "--login", "-c", r#"echo it\'s \"ok\""#]
        );
    }

    #[test]
    fn test_to_shell_command_with_args_prepends_command() {
        let shell = build(
            FakeProbe::default().with_executable("/opt/bin/bash"),
            prefs_with_override("/opt/bin/bash"),
        );

        let argv = shell.to_shell_command_with_args("ls", &["-la", "/tmp"]).unwrap();
        assert_eq!(argv[3], "ls -la /tmp");
    }

    #[test]
    fn test_run_surfaces_not_found() {
        let shell = build(FakeProbe::default(), Arc::new(MemoryPreferenceStore::new()));

        let err = shell.run(&["true"], None, None).unwrap_err();
        assert!(matches!(err, ShellError::Locator(LocatorError::NotFound)));
    }

    #[test]
    fn test_environment_degrades_to_empty_when_shell_missing() {
        let shell = build(FakeProbe::default(), Arc::new(MemoryPreferenceStore::new()));

        assert!(shell.environment().is_empty());
        assert!(shell.environment.is_cached());
    }

    #[test]
    fn test_set_override_persists_and_invalidates_path() {
        let probe = FakeProbe::default()
            .with_executable("/first/bash")
            .with_executable("/second/bash");
        let prefs = prefs_with_override("/first/bash");
        let shell = build(probe, prefs.clone());

        assert_eq!(shell.resolve().unwrap(), PathBuf::from("/first/bash"));

        shell.set_override(Some(Path::new("/second/bash")));
        assert_eq!(prefs.flush_count(), 1);
        assert_eq!(shell.override_path().as_deref(), Some("/second/bash"));
        assert_eq!(shell.resolve().unwrap(), PathBuf::from("/second/bash"));

        shell.set_override(None);
        assert_eq!(shell.override_path(), None);
    }

    #[test]
    fn test_set_override_applies_even_if_flush_fails() {
        let prefs = Arc::new(MemoryPreferenceStore::new().failing_flush());
        prefs.set(SHELL_PATH_PREFERENCE, "/first/bash");
        let shell = build(
            FakeProbe::default()
                .with_executable("/first/bash")
                .with_executable("/second/bash"),
            prefs,
        );
        shell.resolve().unwrap();

        shell.set_override(Some(Path::new("/second/bash")));

        assert_eq!(shell.resolve().unwrap(), PathBuf::from("/second/bash"));
    }

    #[test]
    fn test_commands_built_during_resolution_are_not_wrapped() {
        let cell: Arc<OnceLock<Arc<ShellExecutable>>> = Arc::new(OnceLock::new());
        let seen: Arc<Mutex<Vec<Vec<String>>>> = Arc::new(Mutex::new(Vec::new()));

        let hook_cell = cell.clone();
        let hook_seen = seen.clone();
        let probe = FakeProbe::default()
            .with_path_dir("/bin")
            .with_executable("/bin/bash")
            .with_search_hook(move || {
                if let Some(shell) = hook_cell.get() {
                    let argv = shell.to_shell_command(&["cygpath", "-w", "/"]).unwrap();
                    hook_seen.lock().unwrap().push(argv);
                }
            });
        let shell = Arc::new(build(probe, Arc::new(MemoryPreferenceStore::new())));
        let _ = cell.set(shell.clone());

        let wrapped = shell.to_shell_command(&["env"]).unwrap();

        assert_eq!(wrapped.len(), 4);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![vec!["cygpath".to_string(), "-w".to_string(), "/".to_string()]]
        );
    }

    #[cfg(unix)]
    mod with_stub_shell {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::{TempDir, tempdir};

        /// Writes a fake shell that answers `--login -c env` with a fixed
        /// snapshot tagged `tag`, runs any other `--login -c CMD` through
        /// `/bin/sh`, and handles the `-cl` directory probe with `dir_branch`.
        fn write_stub(dir: &TempDir, name: &str, tag: &str, dir_branch: &str) -> PathBuf {
            let path = dir.path().join(name);
            let body = format!(
                "#!/bin/sh\n\
                 case \"$1\" in\n\
                 -cl) {dir_branch} ;;\n\
                 --login)\n\
                 shift 2\n\
                 if [ \"$1\" = \"env\" ]; then\n\
                 echo \"MARKER={tag}\"\n\
                 echo \"_=/usr/bin/env\"\n\
                 echo \"TMP=/tmp\"\n\
                 echo \"APP_ICON_1234=x\"\n\
                 exit 0\n\
                 fi\n\
                 exec /bin/sh -c \"$1\" ;;\n\
                 esac\n"
            );
            fs::write(&path, body).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn stub_shell(path: &Path) -> ShellExecutable {
            build(
                FakeProbe::default().with_executable(path.to_path_buf()),
                prefs_with_override(&path.to_string_lossy()),
            )
        }

        const SOURCED: &str = "echo MARKER=directory; echo \"SEEN_PWD=$(pwd)\"; exit 0";

        #[test]
        fn test_environment_is_parsed_filtered_and_cached() {
            let dir = tempdir().unwrap();
            let stub = write_stub(&dir, "stub", "global", SOURCED);
            let shell = stub_shell(&stub);

            let env = shell.environment();

            assert_eq!(env.get("MARKER").map(String::as_str), Some("global"));
            assert!(!env.contains_key("_"));
            assert!(!env.contains_key("TMP"));
            assert!(!env.keys().any(|k| k.starts_with("APP_ICON")));

            fs::remove_file(&stub).unwrap();
            assert_eq!(shell.environment(), env);
        }

        #[test]
        fn test_set_override_recomputes_environment() {
            let dir = tempdir().unwrap();
            let first = write_stub(&dir, "first", "first", SOURCED);
            let second = write_stub(&dir, "second", "second", SOURCED);
            let shell = build(
                FakeProbe::default()
                    .with_executable(first.clone())
                    .with_executable(second.clone()),
                prefs_with_override(&first.to_string_lossy()),
            );

            assert_eq!(
                shell.environment().get("MARKER").map(String::as_str),
                Some("first")
            );

            shell.set_override(Some(&second));

            assert_eq!(shell.resolve().unwrap(), second);
            assert_eq!(
                shell.environment().get("MARKER").map(String::as_str),
                Some("second")
            );
        }

        #[test]
        fn test_directory_with_init_file_is_sourced_and_not_cached() {
            let dir = tempdir().unwrap();
            let stub = write_stub(&dir, "stub", "global", SOURCED);
            let project = tempdir().unwrap();
            let rvmrc = project.path().join(".rvmrc");
            fs::write(&rvmrc, "rvm use 3.2\n").unwrap();

            let shell = build(
                FakeProbe::default()
                    .with_executable(stub.clone())
                    .with_file(rvmrc),
                prefs_with_override(&stub.to_string_lossy()),
            );

            let env = shell.environment_for_directory(Some(project.path()));

            assert_eq!(env.get("MARKER").map(String::as_str), Some("directory"));
            assert!(env.contains_key("SEEN_PWD"));
            assert!(!shell.environment.is_cached());
            assert_eq!(
                shell.environment().get("MARKER").map(String::as_str),
                Some("global")
            );
        }

        #[test]
        fn test_directory_without_init_file_uses_global_snapshot() {
            let dir = tempdir().unwrap();
            let stub = write_stub(&dir, "stub", "global", SOURCED);
            let shell = stub_shell(&stub);
            let project = tempdir().unwrap();

            let env = shell.environment_for_directory(Some(project.path()));
            assert_eq!(env.get("MARKER").map(String::as_str), Some("global"));

            let env = shell.environment_for_directory(None);
            assert_eq!(env.get("MARKER").map(String::as_str), Some("global"));
        }

        #[test]
        fn test_failed_sourcing_falls_back_to_global_snapshot() {
            let dir = tempdir().unwrap();
            let stub = write_stub(&dir, "stub", "global", "echo MARKER=directory; exit 3");
            let project = tempdir().unwrap();
            let rvmrc = project.path().join(".rvmrc");
            fs::write(&rvmrc, "broken\n").unwrap();

            let shell = build(
                FakeProbe::default()
                    .with_executable(stub.clone())
                    .with_file(rvmrc),
                prefs_with_override(&stub.to_string_lossy()),
            );

            let env = shell.environment_for_directory(Some(project.path()));
            assert_eq!(env.get("MARKER").map(String::as_str), Some("global"));
        }

        #[test]
        fn test_windows_policy_never_sources_init_file() {
            let dir = tempdir().unwrap();
            let stub = write_stub(&dir, "stub", "global", SOURCED);
            let project = tempdir().unwrap();
            let rvmrc = project.path().join(".rvmrc");
            fs::write(&rvmrc, "rvm use 3.2\n").unwrap();

            let shell = ShellExecutable::builder(prefs_with_override(&stub.to_string_lossy()))
                .policy(PlatformPolicy::Windows)
                .probe(Arc::new(
                    FakeProbe::default()
                        .with_executable(stub.clone())
                        .with_file(rvmrc),
                ))
                .env_lookup(Arc::new(|_: &str| None))
                .build();

            let env = shell.environment_for_directory(Some(project.path()));
            assert_eq!(env.get("MARKER").map(String::as_str), Some("global"));
        }

        #[test]
        fn test_slow_probe_times_out_to_empty_environment() {
            let dir = tempdir().unwrap();
            let stub = dir.path().join("slow");
            fs::write(&stub, "#!/bin/sh\nsleep 5\n").unwrap();
            fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).unwrap();

            let shell = ShellExecutable::builder(prefs_with_override(&stub.to_string_lossy()))
                .policy(PlatformPolicy::Posix)
                .probe(Arc::new(FakeProbe::default().with_executable(stub.clone())))
                .env_lookup(Arc::new(|_: &str| None))
                .probe_timeout(Duration::from_millis(200))
                .build();

            assert!(shell.environment().is_empty());
        }

        fn script_shell(dir: &TempDir, body: &str, timeout: Duration) -> ShellExecutable {
            let stub = dir.path().join("script");
            fs::write(&stub, format!("#!/bin/sh\n{body}\n")).unwrap();
            fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).unwrap();

            ShellExecutable::builder(prefs_with_override(&stub.to_string_lossy()))
                .policy(PlatformPolicy::Posix)
                .probe(Arc::new(FakeProbe::default().with_executable(stub.clone())))
                .env_lookup(Arc::new(|_: &str| None))
                .probe_timeout(timeout)
                .build()
        }

        #[test]
        fn test_failing_env_yields_empty_environment_despite_output() {
            let dir = tempdir().unwrap();
            let shell = script_shell(&dir, "echo PARTIAL=1; exit 2", Duration::from_secs(5));

            assert!(shell.environment().is_empty());
            assert!(shell.environment.is_cached());
        }

        #[test]
        fn test_background_process_holding_output_does_not_outlive_timeout() {
            let dir = tempdir().unwrap();
            let shell = script_shell(
                &dir,
                "echo A=1; sleep 5 & exit 0",
                Duration::from_millis(300),
            );

            let started = std::time::Instant::now();
            let env = shell.environment();

            assert!(env.is_empty());
            assert!(started.elapsed() < Duration::from_secs(3));
        }

        #[test]
        fn test_run_attached_inherits_stdin() {
            let dir = tempdir().unwrap();
            let stub = write_stub(&dir, "stub", "global", SOURCED);
            let shell = stub_shell(&stub);

            let child = shell
                .run_attached(&["echo", "attached"], None, &EnvSource::Inherit)
                .unwrap();
            assert!(child.stdin.is_none());

            let output = child.wait_with_output().unwrap();
            assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "attached");
        }

        #[test]
        fn test_run_executes_through_shell_with_merged_env() {
            let dir = tempdir().unwrap();
            let stub = write_stub(&dir, "stub", "global", SOURCED);
            let shell = stub_shell(&stub);
            let work = tempdir().unwrap();

            let mut vars = HashMap::new();
            vars.insert("GREETING".to_string(), "hello".to_string());

            let child = shell
                .run(&["echo", "$GREETING", "it's", "&&", "pwd"], Some(work.path()), Some(&vars))
                .unwrap();
            let output = child.wait_with_output().unwrap();
            let stdout = String::from_utf8_lossy(&output.stdout);
            let mut lines = stdout.lines();

            assert!(output.status.success());
            assert_eq!(lines.next(), Some("hello it's"));
            let printed_dir = PathBuf::from(lines.next().unwrap());
            assert_eq!(
                fs::canonicalize(printed_dir).unwrap(),
                fs::canonicalize(work.path()).unwrap()
            );
        }

        #[test]
        fn test_run_with_envp_replaces_environment() {
            let dir = tempdir().unwrap();
            let stub = write_stub(&dir, "stub", "global", SOURCED);
            let shell = stub_shell(&stub);

            let envp = vec!["ONLY_VAR=42".to_string()];
            let child = shell
                .run_with_envp(&["echo", "${ONLY_VAR}-${HOME:-unset}"], None, &envp)
                .unwrap();
            let output = child.wait_with_output().unwrap();

            assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "42-unset");
        }

        #[test]
        fn test_run_executable_passes_arguments() {
            let dir = tempdir().unwrap();
            let stub = write_stub(&dir, "stub", "global", SOURCED);
            let shell = stub_shell(&stub);

            let child = shell
                .run_executable(Path::new("/bin/echo"), None, None, &["a", "b"])
                .unwrap();
            let output = child.wait_with_output().unwrap();

            assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "a b");
        }
    }
}
