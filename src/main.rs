use feed_sim::dispatch::worker::Dispatcher;
use feed_sim::store::feed::FeedStore;
use feed_sim::timeline::engine::ViewEngine;
use feed_sim::timeline::sink::CaptureSink;
use feed_sim::traffic::generator::{poster_loop, seed_star, seed_users, viewer_loop};

use std::sync::Arc;
use std::time::Duration;

struct SimConfig {
    users: usize,
    stars: usize,
    fanout: usize,
    workers: usize,
    queue_capacity: usize,
    run_secs: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            users: 10,
            stars: 2,
            fanout: 7,
            workers: 2,
            queue_capacity: 100,
            run_secs: 10,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut config = SimConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--users" => {
                config.users = args[i + 1].parse()?;
                i += 2;
            }
            "--stars" => {
                config.stars = args[i + 1].parse()?;
                i += 2;
            }
            "--fanout" => {
                config.fanout = args[i + 1].parse()?;
                i += 2;
            }
            "--workers" => {
                config.workers = args[i + 1].parse()?;
                i += 2;
            }
            "--queue-capacity" => {
                config.queue_capacity = args[i + 1].parse()?;
                i += 2;
            }
            "--run-secs" => {
                config.run_secs = args[i + 1].parse()?;
                i += 2;
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: {} [--users N] [--stars N] [--fanout N] [--workers N] \
                     [--queue-capacity N] [--run-secs N]",
                    args[0]
                );
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    tracing::info!(
        "simulation: {} users, {} stars (fanout {}), {} workers, queue {}, {}s",
        config.users,
        config.stars,
        config.fanout,
        config.workers,
        config.queue_capacity,
        config.run_secs
    );

    // 1. Store and engines:
    let store = FeedStore::new();
    let sink = Arc::new(CaptureSink::new());
    let engine = ViewEngine::new(store.clone(), sink.clone());

    // 2. Population: plain users first, then stars each pre-wired with
    //    `fanout` followers.
    let followers = seed_users(&store, config.users).await;
    let mut stars = Vec::with_capacity(config.stars);
    for s in 0..config.stars {
        let fanout = config.fanout.min(followers.len());
        let star = seed_star(&store, &format!("star{}", s), &followers[..fanout]).await?;
        stars.push(star);
    }
    let population = store.user_count().await as u64;

    // 3. Dispatch workers over the bounded queue:
    let (dispatcher, tx) = Dispatcher::new(
        store.clone(),
        engine,
        config.queue_capacity,
        config.workers,
    );
    let worker_handles = dispatcher.start();

    // 4. Traffic generators:
    let poster = tokio::spawn(poster_loop(
        tx.clone(),
        stars,
        Duration::from_millis(500),
    ));
    let viewer = tokio::spawn(viewer_loop(
        tx.clone(),
        population,
        Duration::from_millis(250),
    ));

    // 5. Periodic stats reporter:
    let stats_store = store.clone();
    let stats_sink = sink.clone();
    let reporter = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(2));
        loop {
            interval.tick().await;
            tracing::info!(
                "stats: {} posts stored, {} posts delivered",
                stats_store.post_count().await,
                stats_sink.delivered_count()
            );
        }
    });

    // 6. Timed run, then graceful drain. Stopping the generators drops
    //    their sender clones; once ours goes too the queue closes, and the
    //    workers finish whatever is already enqueued before exiting.
    tokio::time::sleep(Duration::from_secs(config.run_secs)).await;
    tracing::info!("run window over, draining");

    reporter.abort();
    poster.abort();
    viewer.abort();
    let _ = poster.await;
    let _ = viewer.await;

    drop(tx);
    for handle in worker_handles {
        handle.await?;
    }

    tracing::info!(
        "done: {} users, {} posts stored, {} posts delivered",
        store.user_count().await,
        store.post_count().await,
        sink.delivered_count()
    );

    Ok(())
}
