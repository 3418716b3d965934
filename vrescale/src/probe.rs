#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn orientation(&self) -> crate::ladder::Orientation {
        crate::ladder::Orientation::of(*self)
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("{} does not exist", .0.display())]
    MissingInput(std::path::PathBuf),
    #[error("failed to run {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("unexpected probe output {0:?}")]
    UnexpectedOutput(String),
}

/// Arguments for asking the prober for the first video stream's dimensions,
/// printed as a single `<width>x<height>` line.
pub fn probe_args(input: &std::path::Path) -> Vec<std::ffi::OsString> {
    let mut args: Vec<std::ffi::OsString> = [
        "-v",
        "error",
        "-select_streams",
        "v:0",
        "-show_entries",
        "stream=width,height",
        "-of",
        "csv=s=x:p=0",
    ]
    .iter()
    .map(std::ffi::OsString::from)
    .collect();
    args.push(input.as_os_str().to_owned());
    args
}

pub fn parse_probe_output(output: &str) -> Result<Resolution, ProbeError> {
    let line = output.trim().lines().next().unwrap_or_default().trim();
    let unexpected = || ProbeError::UnexpectedOutput(output.to_owned());

    let (width, height) = line.split_once('x').ok_or_else(unexpected)?;
    let width = width.parse().map_err(|_| unexpected())?;
    let height = height.parse().map_err(|_| unexpected())?;
    Ok(Resolution { width, height })
}

pub async fn probe_resolution(
    config: &crate::Config,
    input: &std::path::Path,
) -> Result<Resolution, ProbeError> {
    if !input.exists() {
        return Err(ProbeError::MissingInput(input.to_owned()));
    }

    let program = &config.tools.ffprobe;
    let args = probe_args(input);
    log::debug!("{}", crate::convert::command_line(program, &args));

    let output = tokio::process::Command::new(program)
        .args(&args)
        .stdin(std::process::Stdio::null())
        .output()
        .await
        .map_err(|source| ProbeError::Spawn {
            program: program.clone(),
            source,
        })?;
    if !output.status.success() {
        return Err(ProbeError::Failed {
            program: program.clone(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        });
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
}
