// src/constants.rs

use std::time::Duration;

/// The name of the shellenv configuration directory (under the system config dir).
pub const CONFIG_DIR_NAME: &str = "shellenv";

/// Environment variable that overrides the configuration directory.
pub const CONFIG_DIR_ENV_VAR: &str = "SHELLENV_CONFIG_DIR";

/// The name of the preferences file (inside the configuration directory).
pub const PREFERENCES_FILENAME: &str = "preferences.toml";

/// Preference key holding the user's shell executable override.
pub const SHELL_PATH_PREFERENCE: &str = "shell_executable_path";

/// Default shell executable name on the Windows family.
pub const WINDOWS_SHELL_NAME: &str = "sh.exe";

/// Default shell executable name everywhere else.
pub const POSIX_SHELL_NAME: &str = "bash";

/// Directories probed for `sh.exe` on Windows, in order.
/// Expanded with `${VAR}` syntax against the process environment.
pub const WINDOWS_SHELL_LOCATIONS: &[&str] = &[
    "${ProgramW6432}\\Git\\bin",
    "${ProgramFiles}\\Git\\bin",
    "${ProgramFiles(x86)}\\Git\\bin",
];

/// Variables stripped from every captured shell environment.
/// A trailing `*` turns the rule into a prefix match.
pub const ENV_FILTER: &[&str] = &[
    "_",
    "TMP",
    "APP_ICON*",
    "JAVA_MAIN_CLASS*",
    "JAVA_STARTED_ON_FIRST_THREAD*",
];

/// Per-directory init script sourced before a directory-scoped snapshot.
pub const DIRECTORY_INIT_FILENAME: &str = ".rvmrc";

/// Flag that asks the shell to behave as a login shell.
pub const LOGIN_FLAG: &str = "--login";

/// Flag that makes the shell read the command from the next argument.
pub const COMMAND_FLAG: &str = "-c";

/// Flags for the directory-scoped probe: read the command from the next
/// argument and run as a login shell.
pub const SOURCE_FLAGS: &str = "-cl";

/// Command used to dump the shell's environment.
pub const ENV_COMMAND: &str = "env";

/// Separator used in `PATH`-like variables produced by the shell.
pub const PATH_SEPARATOR: &str = ":";

/// How long an environment probe may run before it is killed.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);
