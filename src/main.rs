use anyhow::Result;
use clap::Parser;
use cspstalker::{Args, CspStalkerEngine, CspStalkerError};
use log::{error, info, warn};

const BANNER: &str = r#"
 ██████╗███████╗██████╗     ███████╗████████╗ █████╗ ██╗     ██╗  ██╗███████╗██████╗
██╔════╝██╔════╝██╔══██╗    ██╔════╝╚══██╔══╝██╔══██╗██║     ██║ ██╔╝██╔════╝██╔══██╗
██║     ███████╗██████╔╝    ███████╗   ██║   ███████║██║     █████╔╝ █████╗  ██████╔╝
██║     ╚════██║██╔═══╝     ╚════██║   ██║   ██╔══██║██║     ██╔═██╗ ██╔══╝  ██╔══██╗
╚██████╗███████║██║         ███████║   ██║   ██║  ██║███████╗██║  ██╗███████╗██║  ██║
 ╚═════╝╚══════╝╚═╝         ╚══════╝   ╚═╝   ╚═╝  ╚═╝╚══════╝╚═╝  ╚═╝╚══════╝╚═╝  ╚═╝
        CSPStalker - Extract Apex Domains and Subdomains
"#;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(args.log_level())
        .init();

    if !args.silent {
        println!("{}", BANNER);
    }

    if args.url.is_none() && args.file.is_none() {
        println!("Please specify either a URL (-u) or a file (-f).");
        return Ok(());
    }

    let engine = CspStalkerEngine::new(&args)?;

    let stats = if let Some(url) = &args.url {
        engine.process_single_url(url).await
    } else if let Some(file) = &args.file {
        match engine.process_url_list(file).await {
            Ok(stats) => stats,
            Err(CspStalkerError::InputError { path, source }) if source.kind() == std::io::ErrorKind::NotFound => {
                println!("File not found: {}", path.display());
                return Ok(());
            }
            Err(e) => {
                error!("{}", e);
                return Ok(());
            }
        }
    } else {
        return Ok(());
    };

    info!(
        "Finished {} URLs: {} apex domains, {} subdomains, {} files written in {:.2}s",
        stats.processed_urls.len(),
        stats.apex_domains,
        stats.subdomains_found,
        stats.files_written,
        stats.duration.as_secs_f64()
    );
    if stats.incomplete_enumerations > 0 {
        warn!("{} apex domains have partial results", stats.incomplete_enumerations);
    }
    if stats.write_failures > 0 {
        error!("{} result files could not be written", stats.write_failures);
    }

    Ok(())
}
