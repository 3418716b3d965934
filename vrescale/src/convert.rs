/// `clip.mp4` becomes `clip_720p.mp4` next to the input. Only the last
/// extension is kept, and an input without one yields an output without one.
pub fn output_path(input: &std::path::Path, rung: &crate::ladder::Rung) -> std::path::PathBuf {
    let mut name = input
        .file_stem()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(format!("_{}p", rung.label));
    if let Some(extension) = input.extension() {
        name.push(".");
        name.push(extension);
    }
    input.with_file_name(name)
}

pub fn convert_args(
    config: &crate::Config,
    input: &std::path::Path,
    rung: &crate::ladder::Rung,
    output: &std::path::Path,
) -> Vec<std::ffi::OsString> {
    let mut args = vec![
        std::ffi::OsString::from("-i"),
        input.as_os_str().to_owned(),
        std::ffi::OsString::from("-vf"),
        std::ffi::OsString::from(format!("scale={}:{}", rung.label, rung.height)),
    ];
    args.extend(config.encoder.ffmpeg_args.iter().map(std::ffi::OsString::from));
    args.push(output.as_os_str().to_owned());
    args
}

/// Renders a command for logs and `--dry-run` so that it can be pasted into
/// a POSIX shell.
pub fn command_line(program: &str, args: &[std::ffi::OsString]) -> String {
    let mut line = shell_quote(program);
    for arg in args {
        line.push(' ');
        line.push_str(&shell_quote(&arg.to_string_lossy()));
    }
    line
}

fn shell_quote(word: &str) -> String {
    let plain = |c: char| c.is_ascii_alphanumeric() || "_./:=,-".contains(c);
    if !word.is_empty() && word.chars().all(plain) {
        word.to_owned()
    } else {
        format!("'{}'", word.replace('\'', "'\\''"))
    }
}

pub async fn convert(
    config: &crate::Config,
    input: &std::path::Path,
    rung: &crate::ladder::Rung,
    output: &std::path::Path,
) -> Result<(), anyhow::Error> {
    use anyhow::Context as _;

    let program = &config.tools.ffmpeg;
    let args = convert_args(config, input, rung, output);
    log::debug!("{}", command_line(program, &args));

    let status = tokio::process::Command::new(program)
        .args(&args)
        .status()
        .await
        .with_context(|| format!("failed to run {}", program))?;
    if !status.success() {
        anyhow::bail!("{} exited with {}", program, status);
    }
    Ok(())
}
