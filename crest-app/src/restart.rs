use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

/// The executable and argument vector a restarted instance should get:
/// the current binary with the current command line.
pub fn restart_command() -> (PathBuf, Vec<OsString>) {
    let exe = std::env::current_exe().unwrap_or_else(|_| {
        PathBuf::from(std::env::args_os().next().unwrap_or_default())
    });
    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    (exe, args)
}

/// Replace the current process with a fresh instance. Must only be called
/// after the main window reported a completed close.
///
/// On unix this execs in place and only returns on failure. Elsewhere it
/// spawns the new instance and exits this one; again it only returns on
/// failure.
pub fn replace_process() -> std::io::Error {
    let (exe, args) = restart_command();
    log::info!("restarting as {} {:?}", exe.display(), args);

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        Command::new(exe).args(args).exec()
    }

    #[cfg(not(unix))]
    {
        match Command::new(exe).args(args).spawn() {
            Ok(_) => std::process::exit(0),
            Err(e) => e,
        }
    }
}
