/// Re-encode a video into a ladder of smaller resolutions
#[derive(clap::Parser)]
#[command(version, about)]
struct Args {
    /// Input video
    input: std::path::PathBuf,
    /// TOML config overriding tools and resolutions (default: ./vrescale.toml if present)
    #[arg(long, value_name = "PATH")]
    config: Option<std::path::PathBuf>,
    /// Print the transcoder commands instead of running them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = <Args as clap::Parser>::parse();
    let config = vrescale::load_config(args.config.as_deref())?;
    let report = vrescale::rescale(&config, &args.input, args.dry_run).await?;
    if !report.all_succeeded() {
        anyhow::bail!(
            "{} of {} conversions failed",
            report.failures(),
            report.outcomes.len()
        );
    }
    Ok(())
}
