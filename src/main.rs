use classmap::algorithm::AssignmentReport;
use classmap::async_io::{default_mirror_dir, source_from_config};
use classmap::{
    DrilldownSession, InteractionMode, LevelView, LocationField, LoggingView, MapConfig, MapSync,
    Result, TopologyCache, load_records,
};
use itertools::Itertools;
use log::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = MapConfig::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("sync") => {
            let output = args
                .get(1)
                .map_or_else(|| default_mirror_dir(&config.base_url), Into::into);
            let report = MapSync::new(&config, output)?.run().await?;
            info!(
                "Mirror updated: {} downloaded, {} refused, {} failed",
                report.downloaded.len(),
                report.skipped.len(),
                report.failed.len()
            );
            Ok(())
        }
        Some("drill") => {
            let Some(province) = args.get(1) else {
                warn!("Usage: classmap drill <province-code>");
                return Ok(());
            };
            let session = open_session(&config).await?;
            session.drill_into(province).await?;
            print_level(&session.controller().current_view());
            if let Some(report) = session.controller().city_report() {
                print_unmatched(report, LocationField::City);
            }
            Ok(())
        }
        _ => {
            let session = open_session(&config).await?;
            print_level(&session.controller().current_view());
            print_unmatched(session.controller().country_report(), LocationField::Province);
            Ok(())
        }
    }
}

async fn open_session(config: &MapConfig) -> Result<DrilldownSession<LoggingView>> {
    let records = load_records(config).await?;
    let cache = TopologyCache::new(source_from_config(config)?, config.failure_policy);
    DrilldownSession::initialize(
        cache,
        &config.root_code,
        &records,
        InteractionMode::Precise,
        LoggingView,
    )
    .await
}

fn print_level(view: &LevelView) {
    println!("{} ({} people)", view.title, view.total());
    for region in view
        .regions
        .iter()
        .filter(|region| region.value > 0)
        .sorted_by(|a, b| b.value.cmp(&a.value).then_with(|| a.id.cmp(&b.id)))
    {
        let people = region.members.iter().map(|person| person.name.as_str()).join(", ");
        println!("  {:<8} {:>4}  {people}", region.name, region.value);
    }
}

fn print_unmatched(report: &AssignmentReport, field: LocationField) {
    if report.is_complete() {
        return;
    }
    println!("Unmatched ({}):", report.unmatched.len());
    for record in &report.unmatched {
        println!("  {} ({})", record.name, field.value_of(record));
    }
}
