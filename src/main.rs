use incident_dash::{init_tracing, stats, Config, Dashboard, Pager};
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env();
    info!("post monitor backend {}", config.post_monitor_url);
    info!("click detection backend {}", config.click_detection_url);

    let dashboard = Dashboard::start(config);
    let (post_online, click_online) = dashboard.check_backends().await;
    info!("backends reachable: post={post_online} click={click_online}");

    let mut pager = Pager::default();
    let mut ticker = interval(Duration::from_secs(5));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => print_summary(&dashboard, &mut pager),
        }
    }

    info!("shutting down");
    Ok(())
}

fn print_summary(dashboard: &Dashboard, pager: &mut Pager) {
    let requests = dashboard.requests().state();
    let status = if requests.is_online { "online" } else { "offline" };

    if let Some(records) = &requests.data {
        pager.clamp(records.len());
        let page = pager.slice(records);
        info!(
            "incident log [{status}]: {} records, showing page {} of {} ({} rows), {} unique hosts",
            records.len(),
            pager.page(),
            pager.total_pages(records.len()),
            page.len(),
            stats::unique_hostnames(records),
        );
    } else {
        info!("incident log [{status}]: no data yet");
    }

    if let Some(classification) = dashboard.classification().data() {
        info!(
            "classification: {} total, {} human, {} bot, detection rate {}%",
            classification.total_requests,
            classification.human_requests,
            classification.bot_requests,
            stats::detection_rate_label(&classification),
        );
    }

    if let Some(clicks) = dashboard.click_stats().data() {
        let (legitimate, suspicious) = stats::click_share(&clicks);
        info!(
            "clicks: {} total ({legitimate:.0}% legitimate, {suspicious:.0}% suspicious)",
            clicks.total_clicks,
        );
    }

    info!("sync metrics: {}", dashboard.metrics_json());
}
