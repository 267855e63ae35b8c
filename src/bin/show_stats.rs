/// Show white-streak and hourly statistics from a saved history snapshot
use chrono::Utc;
use roulette_tracker::config::load_config_or_default;
use roulette_tracker::data::HistoryStore;
use roulette_tracker::stats::{hourly_distribution, white_streak_stats};
use roulette_tracker::time::CivilZone;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let config = load_config_or_default(&config_path)?;
    let zone = CivilZone::from_config(config.utc_offset_minutes, config.iana_zone.as_deref())?;

    let history_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.history_path.clone());

    println!("🎰 Roulette History Stats");
    println!("=========================\n");

    if !std::path::Path::new(&history_file).exists() {
        println!("❌ No history snapshot found at {}", history_file);
        println!("\n💡 Start the tracker to begin collecting results:");
        println!("   cargo run --release");
        return Ok(());
    }

    let content = tokio::fs::read_to_string(&history_file).await?;
    let store = match HistoryStore::try_load(&content) {
        Ok(store) => store,
        Err(e) => {
            println!("⚠️  Snapshot at {} is unreadable: {}", history_file, e);
            return Ok(());
        }
    };

    let history = store.snapshot(None);
    let now = Utc::now();
    let today = zone.today(now);

    println!("📈 Summary:");
    println!("   Results stored: {}", history.len());
    if let (Some(newest), Some(oldest)) = (history.first(), history.last()) {
        println!(
            "   Span: {} {} -> {} {}",
            oldest.iso_date,
            oldest.timestamp.format("%H:%M"),
            newest.iso_date,
            newest.timestamp.format("%H:%M")
        );
    }

    let streak = white_streak_stats(&history, now, &zone);
    println!("\n⚪ White Streak:");
    println!("   Rounds since white: {}", streak.rounds_since_white);
    println!("   Minutes since white: {}", streak.minutes_since_white);
    println!("   Max rounds between whites: {}", streak.max_rounds_between_whites);

    let hourly = hourly_distribution(&history, today);
    println!("\n🕐 Hourly Distribution for {}:", today);
    println!("   Hour   Red  Black  White");
    for (hour, counts) in hourly.iter().filter(|(_, c)| c.total() > 0) {
        println!(
            "   {}h  {:>5}  {:>5}  {:>5}",
            hour, counts.red, counts.black, counts.white
        );
    }
    if hourly.values().all(|c| c.total() == 0) {
        println!("   (no results yet today)");
    }

    println!("\n✅ Done!");

    Ok(())
}
